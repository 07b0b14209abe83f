use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::Frame;
use rust_decimal::Decimal;

use crate::error::Result;
use crate::fmt::{money, percent};
use crate::models::RiskFlag;

pub const HEADER_STYLE: Style = Style::new()
    .fg(Color::Yellow)
    .add_modifier(Modifier::BOLD);

pub const FOOTER_STYLE: Style = Style::new().fg(Color::DarkGray);

pub const BORDER_STYLE: Style = Style::new().fg(Color::DarkGray);

pub const STATUS_STYLE: Style = Style::new().fg(Color::Yellow);

pub const AMOUNT_POS_STYLE: Style = Style::new().fg(Color::Rgb(80, 220, 100));
pub const AMOUNT_NEG_STYLE: Style = Style::new().fg(Color::Red);

pub const BOLD: Style = Style::new().add_modifier(Modifier::BOLD);

/// Format an amount as a colored Span, green when non-negative and red otherwise.
pub fn money_span(amount: Decimal) -> Span<'static> {
    Span::styled(money(amount), amount_style(amount))
}

pub fn percent_span(ratio: Decimal) -> Span<'static> {
    Span::styled(percent(ratio), amount_style(ratio))
}

pub fn risk_span(flag: RiskFlag) -> Span<'static> {
    match flag {
        RiskFlag::High => Span::styled("HIGH", AMOUNT_NEG_STYLE.add_modifier(Modifier::BOLD)),
        RiskFlag::Ok => Span::styled("OK", AMOUNT_POS_STYLE),
    }
}

pub fn amount_style(amount: Decimal) -> Style {
    if amount < Decimal::ZERO {
        AMOUNT_NEG_STYLE
    } else {
        AMOUNT_POS_STYLE
    }
}

/// Full-width heavy rule used between header and content.
pub fn separator(width: u16) -> String {
    "━".repeat(width as usize)
}

pub enum AppAction {
    Continue,
    Quit,
}

pub trait TuiApp {
    fn draw(&mut self, frame: &mut Frame);
    fn handle_key(&mut self, code: KeyCode) -> AppAction;
}

/// Run an interactive ratatui app. Sets up the terminal, event loop,
/// and panic hook, then restores the terminal on exit.
pub fn run_app(app: &mut dyn TuiApp) -> Result<()> {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        hook(info);
    }));

    let mut terminal = ratatui::init();

    let result: Result<()> = loop {
        if let Err(e) = terminal.draw(|frame| app.draw(frame)) {
            break Err(e.into());
        }

        match event::read() {
            Err(e) => break Err(e.into()),
            Ok(Event::Key(key)) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c')
                {
                    break Ok(());
                }
                match app.handle_key(key.code) {
                    AppAction::Quit => break Ok(()),
                    AppAction::Continue => {}
                }
            }
            _ => {}
        }
    };

    drop(terminal);
    ratatui::restore();
    result
}
