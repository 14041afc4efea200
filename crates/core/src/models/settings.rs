use serde::{Deserialize, Serialize};

/// A collapsible section of the main screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Price,
    Assets,
    Alerts,
}

/// User-facing toggles persisted with the portfolio. Three independent
/// flags, one per collapsible section; everything defaults to visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub show_price_section: bool,
    pub show_assets_section: bool,
    pub show_alerts_section: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_price_section: true,
            show_assets_section: true,
            show_alerts_section: true,
        }
    }
}

impl Settings {
    #[must_use]
    pub fn is_visible(&self, section: Section) -> bool {
        match section {
            Section::Price => self.show_price_section,
            Section::Assets => self.show_assets_section,
            Section::Alerts => self.show_alerts_section,
        }
    }

    pub fn set_visible(&mut self, section: Section, visible: bool) {
        match section {
            Section::Price => self.show_price_section = visible,
            Section::Assets => self.show_assets_section = visible,
            Section::Alerts => self.show_alerts_section = visible,
        }
    }
}
