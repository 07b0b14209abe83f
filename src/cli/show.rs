use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};

use crate::cli::load_ledger;
use crate::error::Result;
use crate::fmt::{money, percent};
use crate::ledger::Aggregates;
use crate::models::{Column, RiskFlag, ValueStreamRecord};
use crate::settings::load_settings;

fn amount_cell(text: String, negative: bool) -> Cell {
    let text = if negative {
        text.red().to_string()
    } else {
        text
    };
    Cell::new(text).set_alignment(CellAlignment::Right)
}

pub(crate) fn column_cell(record: &ValueStreamRecord, column: Column) -> Cell {
    match column {
        Column::Name => Cell::new(&record.name),
        Column::Income => amount_cell(money(record.income), false),
        Column::DirectCosts => amount_cell(money(record.direct_costs), false),
        Column::IndirectCosts => amount_cell(money(record.indirect_costs), false),
        Column::Profit => amount_cell(money(record.profit()), record.profit().is_sign_negative()),
        Column::ProfitRatio => amount_cell(
            percent(record.profit_ratio()),
            record.profit_ratio().is_sign_negative(),
        ),
        Column::TotalCost => amount_cell(money(record.total_cost()), false),
        Column::AverageCost => amount_cell(percent(record.average_cost()), false),
        Column::Risk => match record.risk_flag() {
            RiskFlag::High => Cell::new("HIGH".red().bold()),
            RiskFlag::Ok => Cell::new("OK".green()),
        },
        Column::CreatedDate => Cell::new(
            record
                .created_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        ),
    }
}

pub(crate) fn records_table(records: &[ValueStreamRecord], columns: &[Column]) -> Table {
    let mut table = Table::new();
    table.set_header(columns.iter().map(|c| c.label()).collect::<Vec<_>>());
    for record in records {
        table.add_row(
            columns
                .iter()
                .map(|&c| column_cell(record, c))
                .collect::<Vec<_>>(),
        );
    }
    table
}

pub(crate) fn totals_table(agg: &Aggregates) -> Table {
    let profit = if agg.total_profit.is_sign_negative() {
        money(agg.total_profit).red().bold().to_string()
    } else {
        money(agg.total_profit).green().bold().to_string()
    };
    let mut table = Table::new();
    table.set_header(vec!["Total Income", "Total Cost", "Total Profit", "Streams", "At Risk"]);
    table.add_row(vec![
        Cell::new(money(agg.total_income)),
        Cell::new(money(agg.total_cost)),
        Cell::new(profit),
        Cell::new(agg.stream_count),
        Cell::new(agg.high_risk_count),
    ]);
    table
}

pub fn run(file: &str) -> Result<()> {
    let settings = load_settings();
    let ledger = load_ledger(file, &settings)?;

    if ledger.is_empty() {
        println!("No value streams in {file}.");
        return Ok(());
    }

    let columns = Column::set_for(ledger.options().extended_metrics);
    println!("Value Streams\n{}", records_table(ledger.records(), columns));
    println!("\nSummary\n{}", totals_table(&ledger.aggregates()));
    Ok(())
}
