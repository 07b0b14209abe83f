use std::str::FromStr;

use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};
use rust_decimal::Decimal;

use crate::cli::show::{column_cell, totals_table};
use crate::cli::{load_ledger, output_path};
use crate::error::{LedgerError, Result};
use crate::exporter::{export_simulation, scenario_file_name, write_export};
use crate::fmt::money;
use crate::models::Column;
use crate::settings::load_settings;
use crate::simulation::{Adjustment, Scenario};

fn signed_money(amount: Decimal) -> String {
    if amount > Decimal::ZERO {
        format!("+{}", money(amount))
    } else {
        money(amount)
    }
}

pub(crate) fn parse_adjustment(
    percent: Option<&str>,
    scenario: Option<&str>,
) -> Result<Adjustment> {
    match (percent, scenario) {
        (Some(p), _) => {
            let p = p.trim().trim_end_matches('%');
            let value = Decimal::from_str(p)
                .map_err(|_| LedgerError::Other(format!("Invalid percent: {p}")))?;
            Adjustment::percent(value)
        }
        (None, Some(s)) => Scenario::parse(s).map(Adjustment::Scenario).ok_or_else(|| {
            LedgerError::Other(format!(
                "Unknown scenario: {s} (expected base, optimistic or pessimistic)"
            ))
        }),
        (None, None) => Ok(Adjustment::default()),
    }
}

pub fn run(
    file: &str,
    percent: Option<String>,
    scenario: Option<String>,
    export: bool,
    output: Option<String>,
) -> Result<()> {
    let adjustment = parse_adjustment(percent.as_deref(), scenario.as_deref())?;
    let settings = load_settings();
    let ledger = load_ledger(file, &settings)?;
    let sim = ledger.simulate(adjustment)?;

    let extended = ledger.options().extended_metrics;
    let mut columns = vec![Column::Income, Column::Profit];
    if extended {
        columns.extend([Column::ProfitRatio, Column::Risk]);
    }
    let mut header = vec![Column::Name.label(), "Base Income", "Change"];
    header.extend(columns.iter().map(|c| c.label()));

    let mut table = Table::new();
    table.set_header(header);
    for p in &sim.projected {
        let mut row = vec![
            column_cell(&p.record, Column::Name),
            Cell::new(money(p.base_income)).set_alignment(CellAlignment::Right),
            Cell::new(signed_money(p.income_delta())).set_alignment(CellAlignment::Right),
        ];
        row.extend(columns.iter().map(|&c| column_cell(&p.record, c)));
        table.add_row(row);
    }

    println!("{} {}\n{table}", "Scenario:".bold(), sim.adjustment);
    println!("\nSummary\n{}", totals_table(&sim.aggregates()));

    if export || output.is_some() {
        let path = output_path(output, &settings, &scenario_file_name(&sim.adjustment));
        let bytes = export_simulation(&sim, extended)?;
        let written = write_export(&bytes, &path)?;
        println!("Wrote {}", written.display());
    }
    Ok(())
}
