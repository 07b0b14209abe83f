use crate::cli::{load_ledger, output_path};
use crate::error::Result;
use crate::exporter::{export_ledger, write_export, LEDGER_FILE_NAME};
use crate::settings::load_settings;

pub fn run(file: &str, output: Option<String>) -> Result<()> {
    let settings = load_settings();
    let ledger = load_ledger(file, &settings)?;
    let path = output_path(output, &settings, LEDGER_FILE_NAME);
    let written = write_export(&export_ledger(&ledger)?, &path)?;
    println!("Exported {} value streams to {}", ledger.len(), written.display());
    Ok(())
}
