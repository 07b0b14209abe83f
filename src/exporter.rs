use std::path::{Path, PathBuf};

use crate::error::{LedgerError, Result};
use crate::ledger::Ledger;
use crate::models::{Column, ValueStreamRecord};
use crate::simulation::{Adjustment, SimulatedLedger};

pub const LEDGER_FILE_NAME: &str = "flujos_lean_accounting.csv";

const RATIO_DP: u32 = 4;

pub fn scenario_file_name(adjustment: &Adjustment) -> String {
    format!("escenario_{}.csv", adjustment.label())
}

fn cell(record: &ValueStreamRecord, column: Column) -> String {
    match column {
        Column::Name => record.name.clone(),
        Column::Income => record.income.normalize().to_string(),
        Column::DirectCosts => record.direct_costs.normalize().to_string(),
        Column::IndirectCosts => record.indirect_costs.normalize().to_string(),
        Column::Profit => record.profit().normalize().to_string(),
        Column::ProfitRatio => record.profit_ratio().round_dp(RATIO_DP).normalize().to_string(),
        Column::TotalCost => record.total_cost().normalize().to_string(),
        Column::AverageCost => record.average_cost().round_dp(RATIO_DP).normalize().to_string(),
        Column::Risk => record.risk_flag().label().to_string(),
        Column::CreatedDate => record
            .created_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
    }
}

/// Serialize records as CSV: a header row, then one row per record in order.
pub fn export_csv(records: &[ValueStreamRecord], columns: &[Column]) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(columns.iter().map(|c| c.header()))?;
    for record in records {
        wtr.write_record(columns.iter().map(|&c| cell(record, c)))?;
    }
    wtr.into_inner()
        .map_err(|e| LedgerError::Io(e.into_error()))
}

pub fn export_ledger(ledger: &Ledger) -> Result<Vec<u8>> {
    let columns = Column::set_for(ledger.options().extended_metrics);
    export_csv(ledger.records(), columns)
}

pub fn export_simulation(sim: &SimulatedLedger, extended_metrics: bool) -> Result<Vec<u8>> {
    export_csv(&sim.records(), Column::set_for(extended_metrics))
}

/// Write export bytes, creating parent directories. Returns the path written.
pub fn write_export(bytes: &[u8], path: &Path) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, bytes)?;
    log::info!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(path.to_path_buf())
}
