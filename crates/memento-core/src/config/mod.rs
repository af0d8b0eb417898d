//! Site layout configuration.
//!
//! Every route and resource path the pages use lives in `SiteConfig`. The
//! defaults match the stock site layout, so a config file is only needed
//! when a site moves things around.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::non_empty_trimmed;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Login page every failed check redirects to
    pub login_page: String,
    /// Content page opened after a successful login
    pub default_page: String,
    /// Notes content page
    pub notes_page: String,
    /// Photo gallery content page
    pub photos_page: String,
    /// Base64 credential list
    pub login_config_path: String,
    /// Notes catalog (`{"mdFiles": [...]}`)
    pub notes_index_path: String,
    /// Directory the notes catalog entries are relative to
    pub notes_dir: String,
    /// Photo catalog
    pub photos_config_path: String,
    /// Image shown when a photo has no `src` or fails to load
    pub default_image: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            login_page: "index.html".to_string(),
            default_page: "notes.html".to_string(),
            notes_page: "notes.html".to_string(),
            photos_page: "photos.html".to_string(),
            login_config_path: "config/login-config.json".to_string(),
            notes_index_path: "notes/files.json".to_string(),
            notes_dir: "notes".to_string(),
            photos_config_path: "photos/photos-config.json".to_string(),
            default_image: "images/default.jpg".to_string(),
        }
    }
}

impl SiteConfig {
    /// Load from a JSON file; a missing file yields the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let mut config = serde_json::from_str::<Self>(&raw)?;
        config.normalize()?;
        Ok(config)
    }

    /// Path of a note body inside the notes directory.
    pub fn note_path(&self, file_name: &str) -> String {
        let dir = self.notes_dir.trim_end_matches('/');
        if dir.is_empty() {
            file_name.to_string()
        } else {
            format!("{dir}/{file_name}")
        }
    }

    fn normalize(&mut self) -> Result<()> {
        let defaults = Self::default();
        for (field, value, fallback) in [
            ("login_page", &mut self.login_page, defaults.login_page),
            ("default_page", &mut self.default_page, defaults.default_page),
            ("notes_page", &mut self.notes_page, defaults.notes_page),
            ("photos_page", &mut self.photos_page, defaults.photos_page),
        ] {
            let trimmed = non_empty_trimmed(value).map(ToString::to_string);
            match trimmed {
                Some(trimmed) => *value = trimmed,
                None => {
                    tracing::warn!("Site config field '{}' is empty; using {}", field, fallback);
                    *value = fallback;
                }
            }
        }

        if self.login_page == self.default_page {
            return Err(Error::InvalidInput(
                "login_page and default_page must differ".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SiteConfig::load_from_path(&dir.path().join("site.json")).unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.json");
        std::fs::write(&path, r#"{ "notes_dir": "books/", "login_page": "  " }"#).unwrap();

        let config = SiteConfig::load_from_path(&path).unwrap();
        assert_eq!(config.note_path("a.md"), "books/a.md");
        assert_eq!(config.login_page, "index.html");
        assert_eq!(config.photos_page, "photos.html");
    }

    #[test]
    fn rejects_unknown_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.json");
        std::fs::write(&path, r#"{ "unexpected": true }"#).unwrap();

        let error = SiteConfig::load_from_path(&path).unwrap_err();
        assert!(error.to_string().contains("unknown field"));
    }

    #[test]
    fn rejects_login_page_as_default_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.json");
        std::fs::write(&path, r#"{ "default_page": "index.html" }"#).unwrap();

        assert!(SiteConfig::load_from_path(&path).is_err());
    }
}
