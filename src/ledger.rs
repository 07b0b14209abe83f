use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{LedgerError, Result};
use crate::importer;
use crate::models::{RawTable, RiskFlag, ValueStreamRecord};
use crate::simulation::{Adjustment, SimulatedLedger};

/// Largest accepted income or cost, one quadrillion.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

/// Capability switches for the ledger. Both default to on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerOptions {
    /// Reject non-positive income and duplicate names.
    pub strict_validation: bool,
    /// Show and export ratio, cost, risk and date columns.
    pub extended_metrics: bool,
}

impl Default for LedgerOptions {
    fn default() -> Self {
        Self {
            strict_validation: true,
            extended_metrics: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregates {
    pub total_income: Decimal,
    pub total_profit: Decimal,
    pub total_cost: Decimal,
    pub stream_count: usize,
    pub high_risk_count: usize,
}

impl Aggregates {
    pub fn of(records: &[ValueStreamRecord]) -> Self {
        Self {
            total_income: records.iter().map(|r| r.income).sum(),
            total_profit: records.iter().map(|r| r.profit()).sum(),
            total_cost: records.iter().map(|r| r.total_cost()).sum(),
            stream_count: records.len(),
            high_risk_count: records
                .iter()
                .filter(|r| r.risk_flag() == RiskFlag::High)
                .count(),
        }
    }
}

/// In-memory, insertion-ordered list of value streams for one session.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    options: LedgerOptions,
    records: Vec<ValueStreamRecord>,
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

impl Ledger {
    pub fn new(options: LedgerOptions) -> Self {
        Self {
            options,
            records: Vec::new(),
        }
    }

    pub fn options(&self) -> LedgerOptions {
        self.options
    }

    pub fn records(&self) -> &[ValueStreamRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.iter().any(|r| r.name == name)
    }

    pub fn create(
        &mut self,
        name: &str,
        income: Decimal,
        direct_costs: Decimal,
        indirect_costs: Decimal,
    ) -> Result<&ValueStreamRecord> {
        self.create_on(name, income, direct_costs, indirect_costs, today())
    }

    pub fn create_on(
        &mut self,
        name: &str,
        income: Decimal,
        direct_costs: Decimal,
        indirect_costs: Decimal,
        date: NaiveDate,
    ) -> Result<&ValueStreamRecord> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::EmptyName);
        }
        let record =
            ValueStreamRecord::new(name, income, direct_costs, indirect_costs).with_date(date);
        check_amounts(&record)?;
        if self.options.strict_validation {
            check_strict(&record)?;
            if self.contains(name) {
                return Err(LedgerError::DuplicateName(name.to_string()));
            }
        }

        log::info!("created value stream '{}' (profit {})", name, record.profit());
        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    /// Replace the whole ledger with the rows of `table`. Destructive: every
    /// existing record is dropped. On error the ledger is left as it was.
    pub fn bulk_import(&mut self, table: &RawTable) -> Result<&[ValueStreamRecord]> {
        self.bulk_import_on(table, today())
    }

    pub fn bulk_import_on(
        &mut self,
        table: &RawTable,
        date: NaiveDate,
    ) -> Result<&[ValueStreamRecord]> {
        let batch = importer::reconcile(table, date)?;
        for record in &batch {
            check_amounts(record)?;
        }
        if self.options.strict_validation {
            let mut seen = HashSet::new();
            for record in &batch {
                check_strict(record)?;
                if !seen.insert(record.name.as_str()) {
                    return Err(LedgerError::DuplicateName(record.name.clone()));
                }
            }
        }

        log::info!(
            "replacing {} value streams with {} imported",
            self.records.len(),
            batch.len()
        );
        self.records = batch;
        Ok(&self.records)
    }

    pub fn aggregates(&self) -> Aggregates {
        Aggregates::of(&self.records)
    }

    /// Project the ledger under `adjustment` without touching it.
    pub fn simulate(&self, adjustment: Adjustment) -> Result<SimulatedLedger> {
        SimulatedLedger::project(&self.records, adjustment)
    }
}

fn check_amounts(record: &ValueStreamRecord) -> Result<()> {
    let fields = [
        ("Income", record.income),
        ("Direct costs", record.direct_costs),
        ("Indirect costs", record.indirect_costs),
    ];
    for (field, value) in fields {
        if value < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount {
                name: record.name.clone(),
                field,
            });
        }
        // Keeps sums, profits and the largest simulation factor inside Decimal range
        if value > Decimal::from(MAX_AMOUNT) {
            return Err(LedgerError::AmountTooLarge {
                name: record.name.clone(),
                field,
            });
        }
    }
    Ok(())
}

fn check_strict(record: &ValueStreamRecord) -> Result<()> {
    if record.income <= Decimal::ZERO {
        return Err(LedgerError::InvalidIncome(record.name.clone()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(v: i64) -> Decimal {
        Decimal::from(v)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn loose() -> Ledger {
        Ledger::new(LedgerOptions {
            strict_validation: false,
            extended_metrics: false,
        })
    }

    fn table(rows: &[[&str; 4]]) -> RawTable {
        RawTable {
            headers: vec![
                "Flujo".into(),
                "Ingresos".into(),
                "Costos Directos".into(),
                "Costos Indirectos".into(),
            ],
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_create_computes_metrics_and_stamps_date() {
        let mut ledger = Ledger::default();
        let r = ledger
            .create_on("Packaging", dec(10000), dec(4000), dec(1000), date())
            .unwrap();
        assert_eq!(r.profit(), dec(5000));
        assert_eq!(r.profit_ratio(), Decimal::new(5, 1));
        assert_eq!(r.risk_flag(), RiskFlag::Ok);
        assert_eq!(r.created_date, Some(date()));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_create_stamps_today() {
        let mut ledger = Ledger::default();
        let r = ledger.create("Packaging", dec(10), dec(1), dec(1)).unwrap();
        assert_eq!(r.created_date, Some(today()));
    }

    #[test]
    fn test_create_preserves_insertion_order() {
        let mut ledger = Ledger::default();
        ledger.create("Zeta", dec(100), dec(0), dec(0)).unwrap();
        ledger.create("Alpha", dec(100), dec(0), dec(0)).unwrap();
        let names: Vec<&str> = ledger.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn test_strict_rejects_zero_income() {
        let mut ledger = Ledger::default();
        let err = ledger.create("Idle", dec(0), dec(10), dec(0)).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidIncome(ref n) if n == "Idle"));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_strict_rejects_duplicate_name() {
        let mut ledger = Ledger::default();
        ledger.create("Packaging", dec(100), dec(10), dec(0)).unwrap();
        let err = ledger.create("Packaging", dec(200), dec(10), dec(0)).unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateName(_)));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.records()[0].income, dec(100));
    }

    #[test]
    fn test_duplicate_check_is_case_sensitive() {
        let mut ledger = Ledger::default();
        ledger.create("Packaging", dec(100), dec(10), dec(0)).unwrap();
        assert!(ledger.create("packaging", dec(100), dec(10), dec(0)).is_ok());
    }

    #[test]
    fn test_loose_accepts_zero_income_and_duplicates() {
        let mut ledger = loose();
        ledger.create("Idle", dec(0), dec(0), dec(0)).unwrap();
        ledger.create("Idle", dec(0), dec(0), dec(0)).unwrap();
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_create_rejects_empty_name_and_negative_costs() {
        let mut ledger = loose();
        assert!(matches!(
            ledger.create("   ", dec(1), dec(0), dec(0)),
            Err(LedgerError::EmptyName)
        ));
        assert!(matches!(
            ledger.create("Neg", dec(1), dec(-1), dec(0)),
            Err(LedgerError::NegativeAmount { field: "Direct costs", .. })
        ));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_create_rejects_amounts_above_maximum() {
        let mut ledger = loose();
        let over = Decimal::from(MAX_AMOUNT) + Decimal::ONE;
        assert!(matches!(
            ledger.create("Huge", over, dec(0), dec(0)),
            Err(LedgerError::AmountTooLarge { field: "Income", .. })
        ));
        assert!(matches!(
            ledger.create("Huge", dec(1), dec(0), over),
            Err(LedgerError::AmountTooLarge { field: "Indirect costs", .. })
        ));
        assert!(ledger.is_empty());
        ledger
            .create("Edge", Decimal::from(MAX_AMOUNT), dec(0), dec(0))
            .unwrap();
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_import_rejects_costs_that_would_overflow() {
        let mut ledger = loose();
        ledger.create("Keep", dec(10), dec(1), dec(1)).unwrap();
        let huge = "50000000000000000000000000000";
        let err = ledger
            .bulk_import_on(&table(&[["A", "1", huge, huge]]), date())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Direct costs for 'A' exceeds the maximum of 1,000,000,000,000,000"
        );
        assert!(ledger.contains("Keep"));

        let rich = "70000000000000000000000000000";
        assert!(matches!(
            ledger.bulk_import_on(&table(&[["A", rich, "0", "0"]]), date()),
            Err(LedgerError::AmountTooLarge { field: "Income", .. })
        ));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_aggregates_sum_income_and_profit() {
        let mut ledger = Ledger::default();
        ledger.create("Packaging", dec(10000), dec(4000), dec(1000)).unwrap();
        ledger.create("Shipping", dec(2000), dec(1500), dec(1000)).unwrap();
        let agg = ledger.aggregates();
        assert_eq!(agg.total_income, dec(12000));
        assert_eq!(agg.total_profit, dec(4500));
        assert_eq!(agg.total_cost, dec(7500));
        assert_eq!(agg.stream_count, 2);
        assert_eq!(agg.high_risk_count, 1);
    }

    #[test]
    fn test_aggregates_of_empty_ledger_are_zero() {
        let agg = Ledger::default().aggregates();
        assert_eq!(agg.total_income, Decimal::ZERO);
        assert_eq!(agg.total_profit, Decimal::ZERO);
    }

    #[test]
    fn test_bulk_import_replaces_ledger() {
        let mut ledger = Ledger::default();
        ledger.create("Old", dec(1), dec(0), dec(0)).unwrap();
        let imported = ledger
            .bulk_import_on(
                &table(&[
                    ["Packaging", "10000", "4000", "1000"],
                    ["Shipping", "2000", "1500", "1000"],
                ]),
                date(),
            )
            .unwrap();
        assert_eq!(imported.len(), 2);
        assert!(!ledger.contains("Old"));
        assert!(ledger.records().iter().all(|r| r.created_date == Some(date())));
    }

    #[test]
    fn test_bulk_import_failure_leaves_ledger_unchanged() {
        let mut ledger = Ledger::default();
        ledger.create("Old", dec(1), dec(0), dec(0)).unwrap();
        let err = ledger
            .bulk_import_on(&table(&[["Bad", "lots", "0", "0"]]), date())
            .unwrap_err();
        assert!(matches!(err, LedgerError::ImportParse(_)));
        assert_eq!(ledger.len(), 1);
        assert!(ledger.contains("Old"));
    }

    #[test]
    fn test_strict_import_rejects_duplicates_and_zero_income() {
        let mut ledger = Ledger::default();
        let err = ledger
            .bulk_import_on(&table(&[["A", "10", "0", "0"], ["A", "20", "0", "0"]]), date())
            .unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateName(ref n) if n == "A"));

        let err = ledger
            .bulk_import_on(&table(&[["A", "0", "0", "0"]]), date())
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidIncome(_)));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_loose_import_accepts_rows_as_is() {
        let mut ledger = loose();
        ledger
            .bulk_import_on(&table(&[["A", "0", "5", "0"], ["A", "20", "0", "0"]]), date())
            .unwrap();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.records()[0].risk_flag(), RiskFlag::High);
    }
}
