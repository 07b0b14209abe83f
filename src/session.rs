use crate::error::Result;
use crate::ledger::{Ledger, LedgerOptions};
use crate::simulation::{Adjustment, SimulatedLedger};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Ledger,
    Simulation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    OpenLedger,
    OpenSimulation,
    Back,
}

impl Screen {
    pub fn next(self, nav: Nav) -> Screen {
        match (self, nav) {
            (_, Nav::Back) => Screen::Menu,
            (_, Nav::OpenLedger) => Screen::Ledger,
            (_, Nav::OpenSimulation) => Screen::Simulation,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Menu => "Menu",
            Self::Ledger => "Value Streams",
            Self::Simulation => "Simulation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Full table layout.
    #[default]
    Desktop,
    /// One card per stream, for narrow terminals.
    Compact,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Desktop => Self::Compact,
            Self::Compact => Self::Desktop,
        }
    }
}

/// Everything one dashboard session owns. Passed explicitly to the UI.
#[derive(Debug, Clone)]
pub struct Session {
    pub ledger: Ledger,
    pub screen: Screen,
    pub view_mode: ViewMode,
    pub adjustment: Adjustment,
}

impl Session {
    pub fn new(options: LedgerOptions) -> Self {
        Self {
            ledger: Ledger::new(options),
            screen: Screen::Menu,
            view_mode: ViewMode::default(),
            adjustment: Adjustment::default(),
        }
    }

    pub fn navigate(&mut self, nav: Nav) -> Screen {
        let next = self.screen.next(nav);
        if next != self.screen {
            log::debug!("screen {:?} -> {:?}", self.screen, next);
        }
        self.screen = next;
        next
    }

    pub fn toggle_view(&mut self) {
        self.view_mode = self.view_mode.toggled();
    }

    pub fn projection(&self) -> Result<SimulatedLedger> {
        self.ledger.simulate(self.adjustment)
    }
}
