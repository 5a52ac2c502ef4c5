//! Tab navigation state
//!
//! The panel shows one of four pages, chosen by the tab bar along the bottom
//! edge. [`Navigator`] tracks which one is selected.

use crate::events::Event;

/// One page of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tab {
    /// Temperatures, positions and homing.
    #[default]
    Control,
    /// Print progress and print-time adjustments.
    Print,
    /// Message log and command keyboard.
    Console,
    /// Panel settings.
    Setup,
}

impl Tab {
    /// Tabs in tab-bar order.
    pub const ALL: [Tab; 4] = [Tab::Control, Tab::Print, Tab::Console, Tab::Setup];

    /// Position in the tab bar.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Tab bar caption.
    pub fn label(self) -> &'static str {
        match self {
            Tab::Control => "Control",
            Tab::Print => "Print",
            Tab::Console => "Console",
            Tab::Setup => "Setup",
        }
    }

    /// Event raised by this tab's button.
    pub fn event(self) -> Event {
        match self {
            Tab::Control => Event::TabControl,
            Tab::Print => Event::TabPrint,
            Tab::Console => Event::TabConsole,
            Tab::Setup => Event::TabSetup,
        }
    }

    /// The tab a tab-bar event selects.
    pub fn from_event(event: Event) -> Option<Tab> {
        Tab::ALL.into_iter().find(|t| t.event() == event)
    }
}

/// The tab whose page is shown.
#[derive(Debug, Default)]
pub struct Navigator {
    current: Tab,
}

impl Navigator {
    /// Start on the Control tab.
    pub fn new() -> Self {
        Navigator { current: Tab::Control }
    }

    /// The tab currently shown.
    #[must_use]
    pub fn current(&self) -> Tab {
        self.current
    }

    /// Switch to `tab`. Returns the previous tab when the selection changed.
    pub fn select(&mut self, tab: Tab) -> Option<Tab> {
        if self.current == tab {
            return None;
        }
        Some(core::mem::replace(&mut self.current, tab))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_starts_at_control() {
        let nav = Navigator::new();
        assert_eq!(nav.current(), Tab::Control);
        assert_eq!(Navigator::default().current(), Tab::Control);
    }

    #[test]
    fn test_nav_select_returns_previous() {
        let mut nav = Navigator::new();
        assert_eq!(nav.select(Tab::Print), Some(Tab::Control));
        assert_eq!(nav.select(Tab::Setup), Some(Tab::Print));
        assert_eq!(nav.current(), Tab::Setup);
    }

    #[test]
    fn test_nav_reselect_is_noop() {
        let mut nav = Navigator::new();
        assert_eq!(nav.select(Tab::Control), None);
        assert_eq!(nav.current(), Tab::Control);
    }

    #[test]
    fn test_tab_events_round_trip() {
        for tab in Tab::ALL {
            assert_eq!(Tab::from_event(tab.event()), Some(tab));
        }
        assert_eq!(Tab::from_event(Event::Yes), None);
        assert_eq!(Tab::Setup.index(), 3);
    }
}
