use std::path::PathBuf;

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use rust_decimal::Decimal;

use crate::cli::stream_form::{Form, FormAction};
use crate::error::{LedgerError, Result};
use crate::exporter::{
    export_ledger, export_simulation, scenario_file_name, write_export, LEDGER_FILE_NAME,
};
use crate::fmt::{chart_value, money, percent};
use crate::importer::read_file;
use crate::ledger::Aggregates;
use crate::models::ValueStreamRecord;
use crate::session::{Nav, Screen, Session, ViewMode};
use crate::settings::{load_settings, shellexpand_path, Settings};
use crate::simulation::{Adjustment, Scenario, SimulatedLedger, ALL_SCENARIOS};
use crate::tui::{
    amount_style, money_span, percent_span, risk_span, run_app, separator, AppAction, TuiApp,
    BOLD, BORDER_STYLE, FOOTER_STYLE, HEADER_STYLE, STATUS_STYLE,
};

const MENU_ITEMS: &[&str] = &["Value streams", "Simulation", "Quit"];

const SHARE_STYLE: Style = Style::new().fg(Color::Cyan);

enum Overlay {
    AddStream(Form),
    Import(Form),
}

struct Dashboard {
    session: Session,
    settings: Settings,
    greeting: String,
    menu_selection: usize,
    table_state: TableState,
    overlay: Option<Overlay>,
    status_message: Option<String>,
}

/// Each value's share of the positive total. Negative values get no share.
fn shares(values: &[Decimal]) -> Vec<Decimal> {
    let total: Decimal = values.iter().filter(|v| **v > Decimal::ZERO).sum();
    values
        .iter()
        .map(|v| {
            if total > Decimal::ZERO && *v > Decimal::ZERO {
                *v / total
            } else {
                Decimal::ZERO
            }
        })
        .collect()
}

impl Dashboard {
    fn new(session: Session, settings: Settings) -> Self {
        let first_name = settings
            .user_name
            .split_whitespace()
            .next()
            .unwrap_or("")
            .to_string();
        let greeting = if first_name.is_empty() {
            "Lean Accounting: value streams at a glance.".to_string()
        } else {
            format!("Lean Accounting: hello, {first_name}.")
        };
        Self {
            session,
            settings,
            greeting,
            menu_selection: 0,
            table_state: TableState::default().with_selected(Some(0)),
            overlay: None,
            status_message: None,
        }
    }

    // -----------------------------------------------------------------------
    // Drawing
    // -----------------------------------------------------------------------

    /// Header, separator, content and hints rows. Returns the content area.
    fn draw_frame_chrome(&self, frame: &mut Frame, title: &str, hints: &str) -> Rect {
        let area = frame.area();
        let [header_area, sep, content_area, hints_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(format!(" {}  {title}", self.greeting)).style(HEADER_STYLE),
            header_area,
        );
        frame.render_widget(
            Paragraph::new(separator(area.width)).style(BORDER_STYLE),
            sep,
        );

        if let Some(msg) = &self.status_message {
            frame.render_widget(
                Paragraph::new(format!(" {msg}")).style(STATUS_STYLE),
                hints_area,
            );
        } else {
            frame.render_widget(
                Paragraph::new(format!(" {hints}")).style(FOOTER_STYLE),
                hints_area,
            );
        }
        content_area
    }

    fn draw_menu(&self, frame: &mut Frame) {
        let content = self.draw_frame_chrome(
            frame,
            Screen::Menu.title(),
            "Up/Down=navigate  Enter=select  q=quit",
        );
        let agg = self.session.ledger.aggregates();

        let mut lines = vec![
            Line::from(""),
            Line::from(vec![Span::raw(" Total income   "), money_span(agg.total_income)]),
            Line::from(vec![Span::raw(" Total profit   "), money_span(agg.total_profit)]),
            Line::from(format!(" Streams        {}", agg.stream_count)),
            Line::from(""),
            Line::from(Span::styled(" What would you like to do?", BOLD)),
        ];
        for (i, item) in MENU_ITEMS.iter().enumerate() {
            let marker = if i == self.menu_selection { ">" } else { " " };
            let style = if i == self.menu_selection { BOLD } else { Style::default() };
            lines.push(Line::from(Span::styled(format!(" {marker} {item}"), style)));
        }
        frame.render_widget(Paragraph::new(lines), content);
    }

    fn draw_cards(&self, frame: &mut Frame, area: Rect, agg: &Aggregates) {
        let [income, profit, risk] = Layout::horizontal([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .areas(area);
        let card = |title: &'static str| {
            Block::default()
                .title(title)
                .title_style(BOLD)
                .borders(Borders::ALL)
                .border_style(BORDER_STYLE)
        };
        frame.render_widget(
            Paragraph::new(Line::from(money_span(agg.total_income))).block(card(" Total Income ")),
            income,
        );
        frame.render_widget(
            Paragraph::new(Line::from(money_span(agg.total_profit))).block(card(" Total Profit ")),
            profit,
        );
        let risk_style = if agg.high_risk_count > 0 {
            amount_style(Decimal::NEGATIVE_ONE)
        } else {
            amount_style(Decimal::ZERO)
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!("{} of {}", agg.high_risk_count, agg.stream_count),
                risk_style,
            )))
            .block(card(" Streams at Risk ")),
            risk,
        );
    }

    /// Table of records. `base_income` adds the pre-adjustment column.
    fn draw_table(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        records: &[ValueStreamRecord],
        base_income: Option<&[Decimal]>,
    ) {
        let extended = self.session.ledger.options().extended_metrics;
        let mut header = vec!["Stream"];
        if base_income.is_some() {
            header.push("Base Income");
        }
        header.extend(["Income", "Direct", "Indirect", "Profit"]);
        if extended {
            header.extend(["Margin", "Risk"]);
        }

        let rows: Vec<Row> = records
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let mut cells = vec![Cell::from(r.name.clone())];
                if let Some(base) = base_income {
                    cells.push(Cell::from(money(base.get(i).copied().unwrap_or_default())));
                }
                cells.push(Cell::from(money(r.income)));
                cells.push(Cell::from(money(r.direct_costs)));
                cells.push(Cell::from(money(r.indirect_costs)));
                cells.push(Cell::from(money_span(r.profit())));
                if extended {
                    cells.push(Cell::from(percent_span(r.profit_ratio())));
                    cells.push(Cell::from(risk_span(r.risk_flag())));
                }
                Row::new(cells)
            })
            .collect();

        let widths: Vec<Constraint> = std::iter::once(Constraint::Fill(2))
            .chain(std::iter::repeat(Constraint::Fill(1)).take(header.len() - 1))
            .collect();
        let table = Table::new(rows, widths)
            .header(
                Row::new(header)
                    .style(Style::new().fg(Color::DarkGray).add_modifier(Modifier::BOLD)),
            )
            .row_highlight_style(Style::default().bg(Color::Rgb(40, 40, 60)));
        frame.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn draw_compact(&self, frame: &mut Frame, area: Rect, records: &[ValueStreamRecord]) {
        let selected = self.table_state.selected().unwrap_or(0);
        let mut lines = Vec::new();
        for (i, r) in records.iter().enumerate() {
            let marker = if i == selected { ">" } else { " " };
            lines.push(Line::from(vec![
                Span::styled(format!(" {marker} {}  ", r.name), BOLD),
                risk_span(r.risk_flag()),
            ]));
            lines.push(Line::from(vec![
                Span::raw(format!(
                    "     Income {}  Costs {}  Profit ",
                    money(r.income),
                    money(r.total_cost())
                )),
                money_span(r.profit()),
                Span::raw("  Margin "),
                percent_span(r.profit_ratio()),
            ]));
        }
        // Two lines per card; keep the selected one in view
        let visible = area.height as usize / 2;
        let offset = selected.saturating_sub(visible.saturating_sub(1)) * 2;
        frame.render_widget(Paragraph::new(lines).scroll((offset as u16, 0)), area);
    }

    fn draw_profit_chart(&self, frame: &mut Frame, area: Rect, records: &[ValueStreamRecord]) {
        let bars: Vec<Bar> = records
            .iter()
            .map(|r| {
                let profit = r.profit();
                Bar::default()
                    .value(chart_value(profit))
                    .text_value(money(profit))
                    .label(Line::from(r.name.clone()))
                    .style(amount_style(profit))
            })
            .collect();
        let n = bars.len().max(1) as u16;
        let bar_width = (area.width.saturating_sub(n) / n).clamp(1, 14);
        let chart = BarChart::default()
            .block(
                Block::default()
                    .title(" Profit per stream ")
                    .title_style(BOLD)
                    .borders(Borders::TOP)
                    .border_style(BORDER_STYLE),
            )
            .data(BarGroup::default().bars(&bars))
            .bar_width(bar_width)
            .bar_gap(1);
        frame.render_widget(chart, area);
    }

    fn draw_share_chart(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        names: &[&str],
        values: &[Decimal],
    ) {
        let bars: Vec<Bar> = names
            .iter()
            .zip(shares(values))
            .map(|(name, share)| {
                Bar::default()
                    .value(chart_value(share * Decimal::ONE_HUNDRED))
                    .text_value(percent(share))
                    .label(Line::from(name.to_string()))
                    .style(SHARE_STYLE)
            })
            .collect();
        let chart = BarChart::default()
            .block(
                Block::default()
                    .title(format!(" {title} "))
                    .title_style(BOLD)
                    .borders(Borders::TOP)
                    .border_style(BORDER_STYLE),
            )
            .direction(Direction::Horizontal)
            .data(BarGroup::default().bars(&bars))
            .bar_width(1)
            .bar_gap(0)
            .max(100);
        frame.render_widget(chart, area);
    }

    fn draw_ledger(&mut self, frame: &mut Frame) {
        let title = format!("{} ({})", Screen::Ledger.title(), self.session.ledger.len());
        let hints = "a=add  i=import  e=export  v=view  s=simulate  Esc=menu  q=quit";
        let content = self.draw_frame_chrome(frame, &title, hints);

        if let Some(Overlay::AddStream(form) | Overlay::Import(form)) = &self.overlay {
            frame.render_widget(Paragraph::new(form.lines()), content);
            return;
        }

        let records = self.session.ledger.records().to_vec();
        if records.is_empty() {
            frame.render_widget(
                Paragraph::new(vec![
                    Line::from(""),
                    Line::from(
                        " No value streams yet. Press 'a' to add one or 'i' to import a file.",
                    ),
                ]),
                content,
            );
            return;
        }

        let [cards, body, charts] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Percentage(40),
        ])
        .areas(content);
        self.draw_cards(frame, cards, &self.session.ledger.aggregates());

        match self.session.view_mode {
            ViewMode::Desktop => self.draw_table(frame, body, &records, None),
            ViewMode::Compact => self.draw_compact(frame, body, &records),
        }

        let [left, right] =
            Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                .areas(charts);
        self.draw_profit_chart(frame, left, &records);
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        let incomes: Vec<Decimal> = records.iter().map(|r| r.income).collect();
        self.draw_share_chart(frame, right, "Income share", &names, &incomes);
    }

    fn draw_simulation(&mut self, frame: &mut Frame) {
        let title = format!("{}: {}", Screen::Simulation.title(), self.session.adjustment);
        let hints = match self.session.adjustment {
            Adjustment::Percent(_) => {
                "Left/Right=-/+5%  m=scenarios  e=export  l=ledger  Esc=menu  q=quit"
            }
            Adjustment::Scenario(_) => {
                "Tab=next scenario  m=percent  e=export  l=ledger  Esc=menu  q=quit"
            }
        };
        let content = self.draw_frame_chrome(frame, &title, hints);

        let sim = match self.session.projection() {
            Ok(sim) => sim,
            Err(e) => {
                frame.render_widget(
                    Paragraph::new(vec![Line::from(""), Line::from(format!(" {e}"))]),
                    content,
                );
                return;
            }
        };

        let [selector, cards, body, charts] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Percentage(40),
        ])
        .areas(content);

        frame.render_widget(Paragraph::new(adjustment_line(self.session.adjustment)), selector);
        self.draw_cards(frame, cards, &sim.aggregates());

        let records = sim.records();
        let base: Vec<Decimal> = sim.projected.iter().map(|p| p.base_income).collect();
        self.draw_table(frame, body, &records, Some(&base));

        let [left, right] =
            Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                .areas(charts);
        self.draw_profit_chart(frame, left, &records);
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        let profits: Vec<Decimal> = records.iter().map(|r| r.profit()).collect();
        self.draw_share_chart(frame, right, "Profit share", &names, &profits);
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    fn submit_overlay(&mut self) {
        let Some(overlay) = self.overlay.take() else {
            return;
        };
        match overlay {
            Overlay::AddStream(form) => {
                let result = form.stream_input().and_then(|input| {
                    self.session
                        .ledger
                        .create(&input.name, input.income, input.direct_costs, input.indirect_costs)
                        .map(|r| r.name.clone())
                });
                match result {
                    Ok(name) => {
                        self.status_message = Some(format!("Value stream '{name}' added."));
                        self.table_state.select(Some(self.session.ledger.len() - 1));
                    }
                    Err(e) => {
                        // Keep the form open so the user can correct it
                        self.status_message = Some(e.to_string());
                        self.overlay = Some(Overlay::AddStream(form));
                    }
                }
            }
            Overlay::Import(form) => {
                let path = form.value(0).to_string();
                if path.is_empty() {
                    self.overlay = Some(Overlay::Import(form));
                    return;
                }
                match import_into(&mut self.session, &path) {
                    Ok(count) => {
                        self.status_message =
                            Some(format!("Imported {count} value streams (ledger replaced)."));
                        self.table_state.select(Some(0));
                    }
                    Err(e) => {
                        self.status_message = Some(e.to_string());
                        self.overlay = Some(Overlay::Import(form));
                    }
                }
            }
        }
    }

    fn export_ledger_csv(&mut self) {
        if self.session.ledger.is_empty() {
            self.status_message = Some("Nothing to export yet.".to_string());
            return;
        }
        let path = self.settings.export_path(LEDGER_FILE_NAME);
        let result =
            export_ledger(&self.session.ledger).and_then(|bytes| write_export(&bytes, &path));
        self.status_message = Some(export_status(result));
    }

    fn export_simulation_csv(&mut self, sim: &SimulatedLedger) {
        let path = self.settings.export_path(&scenario_file_name(&sim.adjustment));
        let extended = self.session.ledger.options().extended_metrics;
        let result = export_simulation(sim, extended).and_then(|bytes| write_export(&bytes, &path));
        self.status_message = Some(export_status(result));
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.session.ledger.len();
        if len == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1);
        self.table_state.select(Some(next as usize));
    }

    // -----------------------------------------------------------------------
    // Keys
    // -----------------------------------------------------------------------

    fn handle_menu_key(&mut self, code: KeyCode) -> AppAction {
        match code {
            KeyCode::Up => self.menu_selection = self.menu_selection.saturating_sub(1),
            KeyCode::Down => {
                self.menu_selection = (self.menu_selection + 1).min(MENU_ITEMS.len() - 1)
            }
            KeyCode::Char('q') | KeyCode::Esc => return AppAction::Quit,
            KeyCode::Enter => match self.menu_selection {
                0 => {
                    self.session.navigate(Nav::OpenLedger);
                }
                1 => {
                    self.session.navigate(Nav::OpenSimulation);
                }
                _ => return AppAction::Quit,
            },
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_overlay_key(&mut self, code: KeyCode) {
        let action = match &mut self.overlay {
            Some(Overlay::AddStream(form) | Overlay::Import(form)) => form.handle_key(code),
            None => return,
        };
        match action {
            FormAction::Continue => {}
            FormAction::Cancel => self.overlay = None,
            FormAction::Submit => self.submit_overlay(),
        }
    }

    fn handle_ledger_key(&mut self, code: KeyCode) -> AppAction {
        match code {
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Char('a') => self.overlay = Some(Overlay::AddStream(Form::new_stream())),
            KeyCode::Char('i') => self.overlay = Some(Overlay::Import(Form::new_import())),
            KeyCode::Char('e') => self.export_ledger_csv(),
            KeyCode::Char('v') => self.session.toggle_view(),
            KeyCode::Char('s') => {
                self.session.navigate(Nav::OpenSimulation);
            }
            KeyCode::Esc => {
                self.session.navigate(Nav::Back);
            }
            KeyCode::Char('q') => return AppAction::Quit,
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_simulation_key(&mut self, code: KeyCode) -> AppAction {
        let adjustment = self.session.adjustment;
        match code {
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Left => self.session.adjustment = adjustment.nudged(-1),
            KeyCode::Right => self.session.adjustment = adjustment.nudged(1),
            KeyCode::Char('m') => {
                self.session.adjustment = match adjustment {
                    Adjustment::Percent(_) => Adjustment::Scenario(Scenario::Base),
                    Adjustment::Scenario(_) => Adjustment::Percent(Decimal::ZERO),
                }
            }
            KeyCode::Tab => {
                self.session.adjustment = match adjustment {
                    Adjustment::Scenario(s) => Adjustment::Scenario(s.next()),
                    Adjustment::Percent(_) => Adjustment::Scenario(Scenario::Base),
                }
            }
            KeyCode::Char('e') => match self.session.projection() {
                Ok(sim) => self.export_simulation_csv(&sim),
                Err(e) => self.status_message = Some(e.to_string()),
            },
            KeyCode::Char('l') => {
                self.session.navigate(Nav::OpenLedger);
            }
            KeyCode::Esc => {
                self.session.navigate(Nav::Back);
            }
            KeyCode::Char('q') => return AppAction::Quit,
            _ => {}
        }
        AppAction::Continue
    }
}

impl TuiApp for Dashboard {
    fn draw(&mut self, frame: &mut Frame) {
        match self.session.screen {
            Screen::Menu => self.draw_menu(frame),
            Screen::Ledger => self.draw_ledger(frame),
            Screen::Simulation => self.draw_simulation(frame),
        }
    }

    fn handle_key(&mut self, code: KeyCode) -> AppAction {
        if self.overlay.is_some() {
            self.handle_overlay_key(code);
            return AppAction::Continue;
        }
        self.status_message = None;
        match self.session.screen {
            Screen::Menu => self.handle_menu_key(code),
            Screen::Ledger => self.handle_ledger_key(code),
            Screen::Simulation => self.handle_simulation_key(code),
        }
    }
}

fn adjustment_line(adjustment: Adjustment) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    match adjustment {
        Adjustment::Percent(p) => {
            spans.push(Span::raw("Income change  < "));
            let p = p.normalize();
            let shown = if p.is_sign_negative() { format!("{p}%") } else { format!("+{p}%") };
            spans.push(Span::styled(shown, BOLD));
            spans.push(Span::raw(" >  (factor "));
            spans.push(Span::raw(adjustment.factor().normalize().to_string()));
            spans.push(Span::raw(")"));
        }
        Adjustment::Scenario(current) => {
            spans.push(Span::raw("Scenario  "));
            for s in ALL_SCENARIOS {
                let style = if *s == current { BOLD.fg(Color::Cyan) } else { FOOTER_STYLE };
                spans.push(Span::styled(format!("[{}] ", s.name()), style));
            }
        }
    }
    Line::from(spans)
}

fn export_status(result: Result<PathBuf>) -> String {
    match result {
        Ok(path) => format!("Exported {}", path.display()),
        Err(e) => format!("Export failed: {e}"),
    }
}

/// Bulk import `path` into the session ledger, replacing it. Returns the row count.
fn import_into(session: &mut Session, path: &str) -> Result<usize> {
    let table = read_file(&PathBuf::from(shellexpand_path(path)))?;
    Ok(session.ledger.bulk_import(&table)?.len())
}

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

pub fn run(file: Option<String>) -> Result<()> {
    let settings = load_settings();
    let mut session = Session::new(settings.ledger_options());
    if let Some(path) = file {
        let count = import_into(&mut session, &path)?;
        log::info!("preloaded {count} value streams from {path}");
        session.navigate(Nav::OpenLedger);
    }

    let mut dashboard = Dashboard::new(session, settings);
    run_app(&mut dashboard)
        .map_err(|e| LedgerError::Other(format!("Dashboard error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::LedgerOptions;

    fn dashboard() -> Dashboard {
        let mut session = Session::new(LedgerOptions::default());
        session
            .ledger
            .create("Packaging", Decimal::from(10000), Decimal::from(4000), Decimal::from(1000))
            .unwrap();
        session
            .ledger
            .create("Shipping", Decimal::from(2000), Decimal::from(1500), Decimal::from(1000))
            .unwrap();
        let settings = Settings {
            export_dir: std::env::temp_dir().to_string_lossy().to_string(),
            ..Settings::default()
        };
        Dashboard::new(session, settings)
    }

    fn type_str(d: &mut Dashboard, s: &str) {
        for c in s.chars() {
            d.handle_key(KeyCode::Char(c));
        }
    }

    #[test]
    fn test_shares_ignore_negative_values() {
        let s = shares(&[Decimal::from(300), Decimal::from(-50), Decimal::from(100)]);
        assert_eq!(s, vec![Decimal::new(75, 2), Decimal::ZERO, Decimal::new(25, 2)]);
        assert_eq!(shares(&[Decimal::from(-1)]), vec![Decimal::ZERO]);
    }

    #[test]
    fn test_menu_navigation() {
        let mut d = dashboard();
        d.handle_key(KeyCode::Enter);
        assert_eq!(d.session.screen, Screen::Ledger);
        d.handle_key(KeyCode::Char('s'));
        assert_eq!(d.session.screen, Screen::Simulation);
        d.handle_key(KeyCode::Char('l'));
        assert_eq!(d.session.screen, Screen::Ledger);
        d.handle_key(KeyCode::Esc);
        assert_eq!(d.session.screen, Screen::Menu);
        assert!(matches!(d.handle_key(KeyCode::Char('q')), AppAction::Quit));
    }

    #[test]
    fn test_add_stream_through_form() {
        let mut d = dashboard();
        d.session.navigate(Nav::OpenLedger);
        d.handle_key(KeyCode::Char('a'));
        type_str(&mut d, "Assembly");
        d.handle_key(KeyCode::Tab);
        type_str(&mut d, "500");
        d.handle_key(KeyCode::Enter);
        assert!(d.overlay.is_none());
        assert_eq!(d.session.ledger.len(), 3);
        assert_eq!(d.status_message.as_deref(), Some("Value stream 'Assembly' added."));
    }

    #[test]
    fn test_duplicate_keeps_form_open() {
        let mut d = dashboard();
        d.session.navigate(Nav::OpenLedger);
        d.handle_key(KeyCode::Char('a'));
        type_str(&mut d, "Packaging");
        d.handle_key(KeyCode::Tab);
        type_str(&mut d, "1");
        d.handle_key(KeyCode::Enter);
        assert!(d.overlay.is_some());
        assert_eq!(d.session.ledger.len(), 2);
        assert!(d.status_message.unwrap().contains("already exists"));
    }

    #[test]
    fn test_simulation_keys_adjust() {
        let mut d = dashboard();
        d.session.navigate(Nav::OpenSimulation);
        d.handle_key(KeyCode::Tab);
        assert_eq!(d.session.adjustment, Adjustment::Scenario(Scenario::Optimistic));
        d.handle_key(KeyCode::Char('m'));
        assert_eq!(d.session.adjustment, Adjustment::Percent(Decimal::ZERO));
        d.handle_key(KeyCode::Right);
        d.handle_key(KeyCode::Right);
        assert_eq!(d.session.adjustment, Adjustment::Percent(Decimal::from(10)));
        // Projection never touches the stored ledger
        assert_eq!(d.session.ledger.records()[0].income, Decimal::from(10000));
    }

    #[test]
    fn test_import_replaces_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flujos.csv");
        std::fs::write(
            &path,
            "Flujo,Ingresos,Costos Directos,Costos Indirectos\nNew,100,10,10\n",
        )
        .unwrap();
        let mut d = dashboard();
        d.session.navigate(Nav::OpenLedger);
        d.handle_key(KeyCode::Char('i'));
        type_str(&mut d, &path.to_string_lossy());
        d.handle_key(KeyCode::Enter);
        assert!(d.overlay.is_none());
        assert_eq!(d.session.ledger.len(), 1);
        assert!(d.session.ledger.contains("New"));
    }

    #[test]
    fn test_simulation_export_writes_scenario_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut d = dashboard();
        d.settings.export_dir = dir.path().to_string_lossy().to_string();
        d.session.navigate(Nav::OpenSimulation);
        d.handle_key(KeyCode::Tab);
        d.handle_key(KeyCode::Tab);
        d.handle_key(KeyCode::Char('e'));
        let content = std::fs::read_to_string(dir.path().join("escenario_pesimista.csv")).unwrap();
        assert!(content.contains("Packaging,7000,"));
    }

    #[test]
    fn test_empty_ledger_export_is_refused() {
        let mut d = Dashboard::new(Session::new(LedgerOptions::default()), Settings::default());
        d.session.navigate(Nav::OpenLedger);
        d.handle_key(KeyCode::Char('e'));
        assert_eq!(d.status_message.as_deref(), Some("Nothing to export yet."));
    }
}
