use crossterm::event::KeyCode;
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};
use rust_decimal::Decimal;

use crate::error::{LedgerError, Result};
use crate::importer::parse_amount;
use crate::tui::BOLD;

// Field indices for Form::new_stream(); keep in sync with field order
const NAME_IDX: usize = 0;
const INCOME_IDX: usize = 1;
const DIRECT_IDX: usize = 2;
const INDIRECT_IDX: usize = 3;

pub enum FormAction {
    Continue,
    Cancel,
    Submit,
}

struct FormField {
    label: &'static str,
    value: String,
}

/// Text-field form rendered inline in the dashboard.
pub struct Form {
    pub title: &'static str,
    /// Shown under the title, e.g. a warning about destructive actions.
    pub note: Option<&'static str>,
    fields: Vec<FormField>,
    focused: usize,
}

#[derive(Debug, PartialEq)]
pub struct StreamInput {
    pub name: String,
    pub income: Decimal,
    pub direct_costs: Decimal,
    pub indirect_costs: Decimal,
}

impl Form {
    pub fn new_stream() -> Self {
        let field = |label| FormField {
            label,
            value: String::new(),
        };
        Self {
            title: "New value stream",
            note: None,
            fields: vec![
                field("Name"),
                field("Income ($)"),
                field("Direct costs ($)"),
                field("Indirect costs ($)"),
            ],
            focused: 0,
        }
    }

    pub fn new_import() -> Self {
        Self {
            title: "Import value streams from CSV/XLSX",
            note: Some("Importing replaces every value stream currently in the session."),
            fields: vec![FormField {
                label: "File path",
                value: String::new(),
            }],
            focused: 0,
        }
    }

    pub fn value(&self, idx: usize) -> &str {
        self.fields.get(idx).map(|f| f.value.trim()).unwrap_or("")
    }

    /// Parse the stream form. Blank amounts count as zero.
    pub fn stream_input(&self) -> Result<StreamInput> {
        let amount = |idx: usize| -> Result<Decimal> {
            let raw = self.value(idx);
            if raw.is_empty() {
                return Ok(Decimal::ZERO);
            }
            parse_amount(raw).ok_or_else(|| {
                LedgerError::Other(format!(
                    "{} must be a number",
                    self.fields[idx].label.trim_end_matches(" ($)")
                ))
            })
        };
        Ok(StreamInput {
            name: self.value(NAME_IDX).to_string(),
            income: amount(INCOME_IDX)?,
            direct_costs: amount(DIRECT_IDX)?,
            indirect_costs: amount(INDIRECT_IDX)?,
        })
    }

    pub fn handle_key(&mut self, code: KeyCode) -> FormAction {
        match code {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Enter => return FormAction::Submit,
            KeyCode::Tab | KeyCode::Down => {
                self.focused = (self.focused + 1) % self.fields.len();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focused = if self.focused == 0 {
                    self.fields.len() - 1
                } else {
                    self.focused - 1
                };
            }
            KeyCode::Char(c) => self.fields[self.focused].value.push(c),
            KeyCode::Backspace => {
                self.fields[self.focused].value.pop();
            }
            _ => {}
        }
        FormAction::Continue
    }

    pub fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(format!(" {}", self.title), BOLD)),
        ];
        if let Some(note) = self.note {
            lines.push(Line::from(Span::styled(
                format!(" {note}"),
                Style::default().fg(Color::Yellow),
            )));
        }
        lines.push(Line::from(""));

        for (i, field) in self.fields.iter().enumerate() {
            let is_focused = i == self.focused;
            let cursor = if is_focused { "_" } else { "" };
            lines.push(Line::from(vec![
                Span::styled(
                    format!("   {:<20} ", field.label),
                    if is_focused { BOLD } else { Style::default() },
                ),
                Span::styled(
                    format!("{}{cursor}", field.value),
                    if is_focused {
                        Style::default().fg(Color::Cyan)
                    } else {
                        Style::default()
                    },
                ),
            ]));
        }
        lines
    }
}
