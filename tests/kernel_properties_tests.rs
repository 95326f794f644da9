use std::sync::Arc;
use std::thread;

use approx::assert_relative_eq;
use kernel_core::{
    kernel_matrix, EuclideanDistance, ExponentialKernel, Kernel, SparseVector,
    SquaredEuclideanDistance,
};

const BANDWIDTHS: [f64; 6] = [0.05, 0.5, 1.0, 2.0, 10.0, 1e3];

fn sample_points() -> Vec<Vec<f64>> {
    vec![
        vec![0.0, 0.0, 0.0],
        vec![1.0, -2.0, 0.5],
        vec![-3.5, 4.0, 1.0],
        vec![0.25, 0.25, -0.25],
        vec![10.0, 0.0, -7.0],
    ]
}

// ============================================================================
// Range and identity
// ============================================================================

#[test]
fn identical_points_score_one_for_every_bandwidth() {
    for bandwidth in BANDWIDTHS {
        let k = ExponentialKernel::new(bandwidth);
        for p in sample_points() {
            assert_eq!(k.evaluate(&p, &p).unwrap(), 1.0);
        }
    }
}

#[test]
fn values_lie_in_unit_interval() {
    for bandwidth in BANDWIDTHS {
        let k = ExponentialKernel::new(bandwidth);
        for a in sample_points() {
            for b in sample_points() {
                let v = k.evaluate(&a, &b).unwrap();
                assert!(v <= 1.0, "{v} > 1 for bandwidth {bandwidth}");
                assert!(v >= 0.0, "{v} < 0 for bandwidth {bandwidth}");
            }
        }
    }
}

#[test]
fn moderate_distances_stay_strictly_positive() {
    let k = ExponentialKernel::default();
    assert!(k.evaluate(&[0.0], &[100.0]).unwrap() > 0.0);
}

#[test]
fn huge_distances_underflow_to_zero() {
    let k = ExponentialKernel::new(0.01);
    assert_eq!(k.evaluate(&[0.0], &[1e6]).unwrap(), 0.0);
}

// ============================================================================
// Shape
// ============================================================================

#[test]
fn strictly_decreasing_in_distance() {
    for bandwidth in BANDWIDTHS {
        let k = ExponentialKernel::new(bandwidth);
        let origin = [0.0, 0.0];
        let mut last = k.evaluate(&origin, &origin).unwrap();
        for step in 1..20 {
            let v = k.evaluate(&origin, &[0.1 * step as f64, 0.0]).unwrap();
            assert!(v < last || last == 0.0, "not decreasing at step {step}");
            last = v;
        }
    }
}

#[test]
fn wider_bandwidth_decays_slower() {
    let a = [0.0, 0.0];
    let b = [2.0, 0.0];
    let narrow = ExponentialKernel::new(1.0).evaluate(&a, &b).unwrap();
    let wide = ExponentialKernel::new(2.0).evaluate(&a, &b).unwrap();
    assert!(wide > narrow);
}

#[test]
fn symmetric_in_arguments() {
    let k = ExponentialKernel::new(1.7);
    for a in sample_points() {
        for b in sample_points() {
            assert_eq!(k.evaluate(&a, &b).unwrap(), k.evaluate(&b, &a).unwrap());
        }
    }
}

// ============================================================================
// Overload consistency
// ============================================================================

#[test]
fn vector_and_distance_overloads_agree() {
    for bandwidth in BANDWIDTHS {
        let k = ExponentialKernel::new(bandwidth);
        for a in sample_points() {
            for b in sample_points() {
                let d = SquaredEuclideanDistance::evaluate(&a, &b).unwrap().sqrt();
                assert_eq!(k.evaluate(&a, &b).unwrap(), k.evaluate_distance(d));
                assert_eq!(d, EuclideanDistance::evaluate(&a, &b).unwrap());
            }
        }
    }
}

#[test]
fn gamma_matches_bandwidth() {
    for bandwidth in BANDWIDTHS {
        let k = ExponentialKernel::new(bandwidth);
        assert_relative_eq!(k.gamma(), -1.0 / (2.0 * k.bandwidth().powi(2)));
        assert!(k.gamma() < 0.0);
    }
}

#[test]
fn documented_scenarios() {
    let a = [0.0, 0.0];
    let b = [2.0, 0.0];

    let k = ExponentialKernel::default();
    assert_eq!(k.evaluate(&a, &a).unwrap(), 1.0);
    assert_relative_eq!(k.evaluate(&a, &b).unwrap(), 0.36787944117144233);

    let k = ExponentialKernel::new(2.0);
    assert_eq!(k.gamma(), -0.125);
    assert_relative_eq!(k.evaluate(&a, &b).unwrap(), 0.7788007830714049);

    for bandwidth in BANDWIDTHS {
        assert_eq!(ExponentialKernel::new(bandwidth).evaluate_distance(0.0), 1.0);
    }
}

// ============================================================================
// Containers
// ============================================================================

#[test]
fn accepts_mixed_containers() {
    let k = ExponentialKernel::default();
    let dense = vec![0.0, 3.0, 0.0, 0.0];
    let array = [0.0, 3.0, 0.0, 0.0];
    let sparse = SparseVector::new(4, vec![1, 3], vec![3.0, 4.0]).unwrap();

    assert_eq!(k.evaluate(&dense, &array).unwrap(), 1.0);
    assert_eq!(k.evaluate(dense.as_slice(), &array).unwrap(), 1.0);
    assert_relative_eq!(k.evaluate(&dense, &sparse).unwrap(), (-0.5f64 * 4.0).exp());
}

#[test]
fn mismatched_lengths_surface_as_errors() {
    let k = ExponentialKernel::default();
    assert!(k.evaluate(&[0.0, 1.0], &[0.0, 1.0, 2.0]).is_err());
    assert!(k.evaluate(&SparseVector::zeros(3), &[0.0; 2]).is_err());
}

// ============================================================================
// Sharing
// ============================================================================

fn total_similarity<K: Kernel>(kernel: &K, points: &[Vec<f64>]) -> f64 {
    let m = kernel_matrix(kernel, points).unwrap();
    (0..m.len()).map(|i| m.row(i).iter().sum::<f64>()).sum()
}

#[test]
fn shared_across_threads() {
    let kernel = Arc::new(ExponentialKernel::new(1.5));
    let expected = total_similarity(kernel.as_ref(), &sample_points());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let kernel = Arc::clone(&kernel);
            thread::spawn(move || total_similarity(kernel.as_ref(), &sample_points()))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
