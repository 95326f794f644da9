use std::sync::OnceLock;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

static INITIALISED: OnceLock<()> = OnceLock::new();

/// Installs the global subscriber once per process. Logs go to stderr so
/// stdout only carries session entries. `RUST_LOG` overrides the `info`
/// default.
pub fn init_tracing() {
    if INITIALISED.set(()).is_err() {
        return;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    if let Err(e) = Registry::default().with(filter).with(fmt_layer).try_init() {
        eprintln!("failed to initialise tracing subscriber: {e}");
    }
}
