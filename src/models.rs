use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskFlag {
    High,
    Ok,
}

impl RiskFlag {
    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Ok => "OK",
        }
    }
}

impl fmt::Display for RiskFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One value stream. Only the three amounts are stored; every metric is
/// derived from them on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueStreamRecord {
    pub name: String,
    pub income: Decimal,
    pub direct_costs: Decimal,
    pub indirect_costs: Decimal,
    pub created_date: Option<NaiveDate>,
}

impl ValueStreamRecord {
    pub fn new(
        name: impl Into<String>,
        income: Decimal,
        direct_costs: Decimal,
        indirect_costs: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            income,
            direct_costs,
            indirect_costs,
            created_date: None,
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.created_date = Some(date);
        self
    }

    pub fn total_cost(&self) -> Decimal {
        self.direct_costs + self.indirect_costs
    }

    pub fn profit(&self) -> Decimal {
        self.income - self.total_cost()
    }

    /// Profit over income; zero when there is no income.
    pub fn profit_ratio(&self) -> Decimal {
        if self.income > Decimal::ZERO {
            self.profit() / self.income
        } else {
            Decimal::ZERO
        }
    }

    /// Total cost per unit of income; zero when there is no income.
    pub fn average_cost(&self) -> Decimal {
        if self.income > Decimal::ZERO {
            self.total_cost() / self.income
        } else {
            Decimal::ZERO
        }
    }

    pub fn risk_flag(&self) -> RiskFlag {
        if self.profit() < Decimal::ZERO {
            RiskFlag::High
        } else {
            RiskFlag::Ok
        }
    }
}

/// Spreadsheet columns, in export order. Header names are the ones users'
/// workbooks already carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Name,
    Income,
    DirectCosts,
    IndirectCosts,
    Profit,
    ProfitRatio,
    TotalCost,
    AverageCost,
    Risk,
    CreatedDate,
}

pub const REQUIRED_COLUMNS: &[Column] = &[
    Column::Name,
    Column::Income,
    Column::DirectCosts,
    Column::IndirectCosts,
];

const BASE_COLUMNS: &[Column] = &[
    Column::Name,
    Column::Income,
    Column::DirectCosts,
    Column::IndirectCosts,
    Column::Profit,
];

const EXTENDED_COLUMNS: &[Column] = &[
    Column::Name,
    Column::Income,
    Column::DirectCosts,
    Column::IndirectCosts,
    Column::Profit,
    Column::ProfitRatio,
    Column::TotalCost,
    Column::AverageCost,
    Column::Risk,
    Column::CreatedDate,
];

impl Column {
    pub fn header(&self) -> &'static str {
        match self {
            Self::Name => "Flujo",
            Self::Income => "Ingresos",
            Self::DirectCosts => "Costos Directos",
            Self::IndirectCosts => "Costos Indirectos",
            Self::Profit => "Rentabilidad",
            Self::ProfitRatio => "Margen",
            Self::TotalCost => "Costo Total",
            Self::AverageCost => "Costo Promedio",
            Self::Risk => "Riesgo",
            Self::CreatedDate => "Fecha",
        }
    }

    /// Display label for tables.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Stream",
            Self::Income => "Income",
            Self::DirectCosts => "Direct Costs",
            Self::IndirectCosts => "Indirect Costs",
            Self::Profit => "Profit",
            Self::ProfitRatio => "Margin",
            Self::TotalCost => "Total Cost",
            Self::AverageCost => "Avg Cost",
            Self::Risk => "Risk",
            Self::CreatedDate => "Created",
        }
    }

    /// Alternate header accepted on import.
    pub fn alias(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Income => "income",
            Self::DirectCosts => "direct_costs",
            Self::IndirectCosts => "indirect_costs",
            Self::Profit => "profit",
            Self::ProfitRatio => "profit_ratio",
            Self::TotalCost => "total_cost",
            Self::AverageCost => "average_cost",
            Self::Risk => "risk_flag",
            Self::CreatedDate => "created_date",
        }
    }

    pub fn matches(&self, header: &str) -> bool {
        let h = header.trim();
        h == self.header() || h.eq_ignore_ascii_case(self.alias())
    }

    pub fn set_for(extended_metrics: bool) -> &'static [Column] {
        if extended_metrics {
            EXTENDED_COLUMNS
        } else {
            BASE_COLUMNS
        }
    }
}

/// Tabular payload as read from a spreadsheet, before reconciliation.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}
