use std::path::Path;

use memento_core::storage::{KeyValueStore, IS_LOGIN_KEY, NOTES_THEME_KEY, PHOTOS_THEME_KEY};
use memento_core::theme::{ThemeMode, ThemePreference};
use serde::Serialize;

use crate::commands::common::open_state;
use crate::error::CliError;

/// What the persistent scope currently remembers.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub logged_in: bool,
    pub notes_theme: ThemeMode,
    pub photos_theme: ThemeMode,
}

pub fn status_report<P: KeyValueStore>(store: &P) -> StatusReport {
    StatusReport {
        logged_in: store.flag(IS_LOGIN_KEY),
        notes_theme: ThemePreference::new(store.clone(), NOTES_THEME_KEY).load(),
        photos_theme: ThemePreference::new(store.clone(), PHOTOS_THEME_KEY).load(),
    }
}

pub fn run_status(state_path: Option<&Path>) -> Result<(), CliError> {
    let store = open_state(state_path)?;
    let report = status_report(&store);

    println!("state:        {}", store.path().display());
    println!("logged in:    {}", if report.logged_in { "yes" } else { "no" });
    println!("notes theme:  {}", report.notes_theme);
    println!("photos theme: {}", report.photos_theme);
    Ok(())
}
