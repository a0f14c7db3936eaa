//! Replay command implementation

use ecsim_host::script::{Op, Transaction};
use ecsim_host::{open_ec, HostConfig, Script};
use std::fs;
use std::path::Path;

/// Format one executed transaction for display
fn format_transaction(transaction: &Transaction) -> String {
    match (transaction.step.op, transaction.value) {
        (Op::Write { port, value }, _) => {
            format!("w 0x{:02X} 0x{:02X}", port, value)
        }
        (Op::Read { port, .. }, Some(value)) if value.is_ascii_graphic() => {
            format!("r 0x{:02X} = 0x{:02X} '{}'", port, value, value as char)
        }
        (Op::Read { port, .. }, value) => {
            format!("r 0x{:02X} = 0x{:02X}", port, value.unwrap_or(0))
        }
    }
}

/// Run a transaction script and print every access
pub fn cmd_replay(config: &HostConfig, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read script {}: {}", path.display(), e))?;
    let script = Script::parse(&text)?;
    log::info!("Loaded {} transactions from {}", script.steps().len(), path.display());

    let mut ec = open_ec(config);
    let result = script.run(&mut ec);
    ec.shutdown();

    let transactions = result?;
    for transaction in &transactions {
        println!("{}", format_transaction(transaction));
    }
    log::info!("Replayed {} transactions", transactions.len());

    Ok(())
}
