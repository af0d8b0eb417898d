//! Wire format of cross-frame messages.

use serde::{Deserialize, Serialize};

use crate::theme::ThemeMode;

/// Message exchanged between the navigation frame and content pages.
///
/// Serialized as a JSON object tagged by `type`, e.g.
/// `{"type":"syncPage","page":"memories"}`. There are no sequence numbers or
/// acknowledgements: every message is self-contained and applying it twice
/// has the same effect as applying it once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FrameMessage {
    /// Nav frame asks the content page to open another route.
    Navigate { page: String },
    /// Nav frame reports a confirmed logout.
    Logout,
    /// Theme change, sent in either direction.
    Theme { value: ThemeMode },
    /// Content page tells the nav frame which item to highlight.
    SyncPage { page: String },
}

impl FrameMessage {
    pub fn navigate(page: impl Into<String>) -> Self {
        Self::Navigate { page: page.into() }
    }

    pub fn sync_page(page: impl Into<String>) -> Self {
        Self::SyncPage { page: page.into() }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Navigate { .. } => "navigate",
            Self::Logout => "logout",
            Self::Theme { .. } => "theme",
            Self::SyncPage { .. } => "syncPage",
        }
    }

    /// Decode an inbound payload; anything unrecognized is ignored.
    pub fn decode(payload: &serde_json::Value) -> Option<Self> {
        match Self::deserialize(payload) {
            Ok(message) => Some(message),
            Err(error) => {
                tracing::debug!("Ignoring undecodable frame message: {}", error);
                None
            }
        }
    }

    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
