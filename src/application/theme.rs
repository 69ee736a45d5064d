//! Light/dark colour scheme toggle

use std::fmt;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::infrastructure::storage::{SharedLocalStore, THEME_KEY};
use crate::support::errors::InfraError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Value of the root `data-bs-theme` attribute
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// The toggle button shows the scheme it switches to
    pub fn icon(&self) -> &'static str {
        match self {
            Theme::Light => "fas fa-moon me-1",
            Theme::Dark => "fas fa-sun me-1",
        }
    }

    pub fn flipped(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme: {}", other)),
        }
    }
}

/// Rendered state after mount or toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeView {
    pub theme: Theme,
    pub attribute: &'static str,
    pub icon: &'static str,
}

impl From<Theme> for ThemeView {
    fn from(theme: Theme) -> Self {
        Self {
            theme,
            attribute: theme.as_str(),
            icon: theme.icon(),
        }
    }
}

pub struct ThemeToggle {
    store: SharedLocalStore,
    current: Theme,
}

impl ThemeToggle {
    /// Read the saved preference; missing or unrecognised values fall back to light.
    pub fn mount(store: SharedLocalStore) -> Self {
        let current = match store.get_item(THEME_KEY) {
            Some(raw) => raw.parse().unwrap_or_else(|e: String| {
                warn!(error = %e, "Ignoring saved theme");
                Theme::Light
            }),
            None => Theme::Light,
        };
        debug!(theme = %current, "Theme mounted");
        Self { store, current }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    pub fn view(&self) -> ThemeView {
        self.current.into()
    }

    pub fn toggle(&mut self) -> Result<ThemeView, InfraError> {
        let next = self.current.flipped();
        self.store.set_item(THEME_KEY, next.as_str())?;
        self.current = next;
        debug!(theme = %next, "Theme toggled");
        Ok(self.view())
    }
}
