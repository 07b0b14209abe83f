use std::fmt;

use rust_decimal::Decimal;

use crate::error::{LedgerError, Result};
use crate::ledger::Aggregates;
use crate::models::ValueStreamRecord;

pub const MAX_PERCENT: i64 = 50;
pub const PERCENT_STEP: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    Base,
    Optimistic,
    Pessimistic,
}

pub const ALL_SCENARIOS: &[Scenario] = &[
    Scenario::Base,
    Scenario::Optimistic,
    Scenario::Pessimistic,
];

impl Scenario {
    /// Income multiplier: 1.0, 1.2 or 0.7.
    pub fn factor(&self) -> Decimal {
        match self {
            Self::Base => Decimal::ONE,
            Self::Optimistic => Decimal::new(12, 1),
            Self::Pessimistic => Decimal::new(7, 1),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Base => "Base",
            Self::Optimistic => "Optimistic (+20%)",
            Self::Pessimistic => "Pessimistic (-30%)",
        }
    }

    /// Used in export file names.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Optimistic => "optimista",
            Self::Pessimistic => "pesimista",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "base" => Some(Self::Base),
            "optimistic" | "optimista" => Some(Self::Optimistic),
            "pessimistic" | "pesimista" => Some(Self::Pessimistic),
            _ => None,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Self::Base => Self::Optimistic,
            Self::Optimistic => Self::Pessimistic,
            Self::Pessimistic => Self::Base,
        }
    }
}

/// How income is adjusted in a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    /// Percentage change in `[-50, 50]`.
    Percent(Decimal),
    Scenario(Scenario),
}

impl Default for Adjustment {
    fn default() -> Self {
        Self::Scenario(Scenario::Base)
    }
}

impl Adjustment {
    pub fn percent(p: Decimal) -> Result<Self> {
        let limit = Decimal::from(MAX_PERCENT);
        if p < -limit || p > limit {
            return Err(LedgerError::InvalidAdjustment(p));
        }
        Ok(Self::Percent(p))
    }

    pub fn factor(&self) -> Decimal {
        match self {
            Self::Percent(p) => Decimal::ONE + *p / Decimal::ONE_HUNDRED,
            Self::Scenario(s) => s.factor(),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Percent(p) => {
                let p = p.normalize();
                if p.is_sign_negative() {
                    format!("{p}pct")
                } else {
                    format!("+{p}pct")
                }
            }
            Self::Scenario(s) => s.label().to_string(),
        }
    }

    /// Step a percentage adjustment by `steps` increments of 5%, clamped to
    /// the allowed range. Scenarios start from 0%.
    pub fn nudged(&self, steps: i64) -> Self {
        let current = match self {
            Self::Percent(p) => *p,
            Self::Scenario(_) => Decimal::ZERO,
        };
        let limit = Decimal::from(MAX_PERCENT);
        let next = (current + Decimal::from(steps * PERCENT_STEP)).clamp(-limit, limit);
        Self::Percent(next)
    }
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percent(p) => {
                let p = p.normalize();
                if p.is_sign_negative() {
                    write!(f, "{p}% income")
                } else {
                    write!(f, "+{p}% income")
                }
            }
            Self::Scenario(s) => f.write_str(s.name()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedRecord {
    pub base_income: Decimal,
    pub record: ValueStreamRecord,
}

impl ProjectedRecord {
    pub fn income_delta(&self) -> Decimal {
        self.record.income - self.base_income
    }
}

/// Read-only projection of a ledger under an adjustment.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedLedger {
    pub adjustment: Adjustment,
    pub projected: Vec<ProjectedRecord>,
}

impl SimulatedLedger {
    pub fn project(records: &[ValueStreamRecord], adjustment: Adjustment) -> Result<Self> {
        if records.is_empty() {
            return Err(LedgerError::EmptyLedger);
        }
        let factor = adjustment.factor();
        let projected = records
            .iter()
            .map(|r| {
                let mut record = r.clone();
                record.income = r.income * factor;
                ProjectedRecord {
                    base_income: r.income,
                    record,
                }
            })
            .collect();
        log::debug!("projected {} streams at factor {}", records.len(), factor);
        Ok(Self {
            adjustment,
            projected,
        })
    }

    pub fn records(&self) -> Vec<ValueStreamRecord> {
        self.projected.iter().map(|p| p.record.clone()).collect()
    }

    pub fn aggregates(&self) -> Aggregates {
        Aggregates::of(&self.records())
    }
}
