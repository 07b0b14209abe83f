use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{LedgerError, Result};
use crate::models::{Column, RawTable, ValueStreamRecord, REQUIRED_COLUMNS};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a spreadsheet money cell: `$1,234.56`, `"500"`, `(50.00)` for negatives.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let s = raw.replace([',', '"', '$'], "");
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(inner) = s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        return Decimal::from_str(inner.trim()).ok().map(|d| -d);
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Locate each required column in `headers`, reporting every one that is absent.
fn required_indices(headers: &[String]) -> Result<[usize; 4]> {
    let mut found = [0usize; 4];
    let mut missing = Vec::new();
    for (slot, column) in REQUIRED_COLUMNS.iter().enumerate() {
        match headers.iter().position(|h| column.matches(h)) {
            Some(idx) => found[slot] = idx,
            None => missing.push(column.header().to_string()),
        }
    }
    if missing.is_empty() {
        Ok(found)
    } else {
        Err(LedgerError::MissingColumns(missing))
    }
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

/// Turn a raw table into records, all stamped with `date`. Blank rows are
/// skipped; extra columns are ignored.
pub fn reconcile(table: &RawTable, date: NaiveDate) -> Result<Vec<ValueStreamRecord>> {
    let [i_name, i_income, i_direct, i_indirect] = required_indices(&table.headers)?;

    let mut records = Vec::with_capacity(table.rows.len());
    for (i, row) in table.rows.iter().enumerate() {
        // Header is line 1 of the sheet
        let line = i + 2;
        if row.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        let cell = |idx: usize| row.get(idx).map(String::as_str).unwrap_or("");

        let name = cell(i_name).trim();
        if name.is_empty() {
            return Err(LedgerError::ImportParse(format!(
                "row {line}: '{}' is empty",
                Column::Name.header()
            )));
        }
        let amount = |idx: usize, column: Column| -> Result<Decimal> {
            let raw = cell(idx);
            parse_amount(raw).ok_or_else(|| {
                LedgerError::ImportParse(format!(
                    "row {line}: '{}' value '{}' is not a number",
                    column.header(),
                    raw.trim()
                ))
            })
        };

        records.push(
            ValueStreamRecord::new(
                name,
                amount(i_income, Column::Income)?,
                amount(i_direct, Column::DirectCosts)?,
                amount(i_indirect, Column::IndirectCosts)?,
            )
            .with_date(date),
        );
    }
    log::debug!("reconciled {} rows", records.len());
    Ok(records)
}

// ---------------------------------------------------------------------------
// Readers
// ---------------------------------------------------------------------------

pub fn read_csv<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| LedgerError::ImportParse(e.to_string()))?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            // Spreadsheet apps like to prefix a BOM
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| LedgerError::ImportParse(e.to_string()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(RawTable { headers, rows })
}

#[cfg(feature = "xlsx")]
pub fn read_xlsx(file_path: &Path) -> Result<RawTable> {
    use calamine::{Data, Reader};

    let mut workbook = calamine::open_workbook_auto(file_path)
        .map_err(|e| LedgerError::ImportParse(format!("Failed to open workbook: {e}")))?;
    let Some(sheet) = workbook.sheet_names().first().cloned() else {
        return Err(LedgerError::ImportParse("workbook has no sheets".to_string()));
    };
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| LedgerError::ImportParse(format!("sheet '{sheet}': {e}")))?;

    let cell_text = |cell: &Data| -> String {
        match cell {
            Data::String(s) => s.clone(),
            Data::Float(f) => f.to_string(),
            Data::Int(i) => i.to_string(),
            Data::Empty => String::new(),
            other => other.to_string(),
        }
    };

    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|r| r.iter().map(|c| cell_text(c).trim().to_string()).collect())
        .unwrap_or_default();
    let rows = rows
        .map(|r| r.iter().map(|c| cell_text(c)).collect())
        .collect();
    Ok(RawTable { headers, rows })
}

fn is_workbook(file_path: &Path) -> bool {
    file_path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| {
            ["xlsx", "xlsm", "xls", "ods"]
                .iter()
                .any(|x| e.eq_ignore_ascii_case(x))
        })
}

/// Read a spreadsheet file into a raw table. Workbooks go through calamine;
/// anything else is treated as CSV.
pub fn read_file(file_path: &Path) -> Result<RawTable> {
    if is_workbook(file_path) {
        #[cfg(feature = "xlsx")]
        {
            return read_xlsx(file_path);
        }
        #[cfg(not(feature = "xlsx"))]
        {
            return Err(LedgerError::UnsupportedFormat(format!(
                "{} (workbook import requires the 'xlsx' feature)",
                file_path.display()
            )));
        }
    }
    let file = std::fs::File::open(file_path)?;
    read_csv(std::io::BufReader::new(file))
}
