use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Income for '{0}' must be greater than zero")]
    InvalidIncome(String),

    #[error("A value stream named '{0}' already exists")]
    DuplicateName(String),

    #[error("Name is required")]
    EmptyName,

    #[error("{field} for '{name}' cannot be negative")]
    NegativeAmount { name: String, field: &'static str },

    #[error("{field} for '{name}' exceeds the maximum of 1,000,000,000,000,000")]
    AmountTooLarge { name: String, field: &'static str },

    #[error("The file must contain the columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Could not read the file: {0}")]
    ImportParse(String),

    #[error("No value streams yet. Add or import some before simulating.")]
    EmptyLedger,

    #[error("Adjustment must be between -50% and 50% (got {0}%)")]
    InvalidAdjustment(rust_decimal::Decimal),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
