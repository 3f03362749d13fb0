use crate::cli::output::OutputFormatter;
use crate::config::{CONFIG_FILE, Config};
use crate::error::{DeskError, Result};
use crate::storage::FileStorage;
use serde_json::json;
use std::path::Path;

/// Create the data directory and write a default configuration
///
/// An existing `config.yaml` is only replaced with `force`. Ticket, reply and
/// audit data are never touched.
pub fn handle_init(data_dir: &Path, force: bool, formatter: &OutputFormatter) -> Result<()> {
    let config_path = data_dir.join(CONFIG_FILE);
    if config_path.exists() && !force {
        return Err(DeskError::InvalidInput(format!(
            "{} already exists. Use --force to overwrite it",
            config_path.display()
        )));
    }

    FileStorage::new(data_dir).ensure_directories()?;
    Config::default().save(data_dir)?;
    tracing::info!(dir = %data_dir.display(), "initialized data directory");

    if formatter.is_json() {
        formatter.print_json(&json!({
            "status": "initialized",
            "dataDir": data_dir,
            "config": config_path,
        }))?;
    } else {
        formatter.success(&format!("Initialized campus desk in {}", data_dir.display()));
    }
    Ok(())
}
