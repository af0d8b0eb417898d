//! Light/dark theme preference, persisted per page type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::storage::KeyValueStore;

/// Theme mode options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light theme
    #[default]
    Light,
    /// Dark theme
    Dark,
}

impl ThemeMode {
    #[must_use]
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Icon shown on the toggle button
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Light => "\u{2600}\u{fe0f}",
            Self::Dark => "\u{1f319}",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(Error::InvalidInput(format!("unknown theme '{other}'"))),
        }
    }
}

/// Theme preference of one page type, stored under its own key.
#[derive(Debug, Clone)]
pub struct ThemePreference<P: KeyValueStore> {
    store: P,
    key: &'static str,
}

impl<P: KeyValueStore> ThemePreference<P> {
    pub const fn new(store: P, key: &'static str) -> Self {
        Self { store, key }
    }

    pub const fn key(&self) -> &'static str {
        self.key
    }

    /// Stored mode; anything but `"dark"` reads as light.
    pub fn load(&self) -> ThemeMode {
        match self.store.get(self.key).as_deref() {
            Some("dark") => ThemeMode::Dark,
            _ => ThemeMode::Light,
        }
    }

    pub fn save(&self, mode: ThemeMode) -> Result<()> {
        self.store.set(self.key, mode.as_str())
    }

    /// Flip the mode currently shown and persist the result.
    ///
    /// `shown` may differ from the stored value after an unpersisted theme
    /// message was applied.
    pub fn toggle(&self, shown: ThemeMode) -> Result<ThemeMode> {
        let next = shown.toggled();
        self.save(next)?;
        Ok(next)
    }
}
