pub mod config;
pub mod dashboard;
pub mod export;
pub mod show;
pub mod simulate;
pub mod stream_form;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::Result;
use crate::importer::read_file;
use crate::ledger::Ledger;
use crate::settings::{shellexpand_path, Settings};

/// Import `file` into a fresh ledger configured from `settings`.
pub(crate) fn load_ledger(file: &str, settings: &Settings) -> Result<Ledger> {
    let path = PathBuf::from(shellexpand_path(file));
    let table = read_file(&path)?;
    let mut ledger = Ledger::new(settings.ledger_options());
    ledger.bulk_import(&table)?;
    Ok(ledger)
}

/// Explicit `--output`, or the file name under the configured export directory.
pub(crate) fn output_path(output: Option<String>, settings: &Settings, file_name: &str) -> PathBuf {
    output
        .map(|o| PathBuf::from(shellexpand_path(&o)))
        .unwrap_or_else(|| settings.export_path(file_name))
}

#[derive(Parser)]
#[command(name = "lean", about = "Lean accounting: value stream profitability ledger.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive dashboard.
    Dashboard {
        /// Spreadsheet (CSV/XLSX) to load into the session
        #[arg(long)]
        file: Option<String>,
    },
    /// Print the value streams in a spreadsheet with their metrics.
    Show {
        /// Path to CSV or XLSX file with Flujo, Ingresos, Costos Directos, Costos Indirectos
        file: String,
    },
    /// Project income under a percentage change or a named scenario.
    Simulate {
        /// Path to CSV or XLSX file
        file: String,
        /// Income change in percent, between -50 and 50
        #[arg(long, allow_negative_numbers = true, conflicts_with = "scenario")]
        percent: Option<String>,
        /// Scenario: base, optimistic, pessimistic
        #[arg(long)]
        scenario: Option<String>,
        /// Write the projection to escenario_<label>.csv
        #[arg(long)]
        export: bool,
        /// Output file path (implies --export)
        #[arg(long)]
        output: Option<String>,
    },
    /// Export a spreadsheet as CSV with derived columns.
    Export {
        /// Path to CSV or XLSX file
        file: String,
        /// Output file path (default: <export_dir>/flujos_lean_accounting.csv)
        #[arg(long)]
        output: Option<String>,
    },
    /// Show or change settings.
    Config {
        /// Reject zero income and duplicate names
        #[arg(long, action = clap::ArgAction::Set)]
        strict: Option<bool>,
        /// Include ratio, cost, risk and date columns
        #[arg(long, action = clap::ArgAction::Set)]
        extended: Option<bool>,
        /// Directory for exported files
        #[arg(long = "export-dir")]
        export_dir: Option<String>,
        /// Name used in the dashboard greeting
        #[arg(long = "user-name")]
        user_name: Option<String>,
    },
}
