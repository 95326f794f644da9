use std::error::Error;
use std::path::PathBuf;

use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::{error, info};

use kernel_core::config::KernelConfig;
use kernel_core::session::{KernelSession, SessionEntry};
use kernel_core::session_input::SessionInput;
use kernel_core::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    telemetry::init_tracing();

    let config = KernelConfig::discover(std::env::args().nth(1).map(PathBuf::from))?;
    let mut session = KernelSession::new(config)?;
    info!(
        bandwidth = session.kernel().bandwidth(),
        gamma = session.kernel().gamma(),
        "kernel ready"
    );

    // Channel from stdin loop -> session loop
    let (input_tx, input_rx) = mpsc::channel::<SessionInput>(64);
    // Channel from session loop -> output
    let (entry_tx, mut entry_rx) = mpsc::channel::<SessionEntry>(64);

    let input_handle = tokio::spawn(async move {
        let stdin = BufReader::new(tokio::io::stdin());
        if let Err(e) = SessionInput::input_loop(stdin, input_tx).await {
            error!("input loop error: {e}");
        }
    });

    let core_handle = tokio::spawn(async move {
        if let Err(e) = session.core_loop(input_rx, entry_tx).await {
            error!("session loop error: {e}");
        }
    });

    while let Some(entry) = entry_rx.recv().await {
        log_entry(&entry);
    }

    let _ = input_handle.await;
    let _ = core_handle.await;

    Ok(())
}

fn log_entry(entry: &SessionEntry) {
    match serde_json::to_string(entry) {
        Ok(line) => println!("{line}"),
        Err(e) => error!("failed to encode session entry: {e}"),
    }
}
