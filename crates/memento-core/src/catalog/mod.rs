//! Catalog loaders for the notes viewer and the photo gallery.
//!
//! Both catalogs are fetched once per page, cached for the page lifetime and
//! rendered from the cache afterwards. A missing or malformed catalog turns
//! into an error placeholder; an empty one into a distinct "nothing
//! configured" placeholder. Neither is retried automatically.

pub mod notes;
pub mod photos;

use serde_json::Value;

use crate::error::{Error, Result};

pub use notes::{NoteBody, NoteEntry, NotesCatalog, NotesPage, NotesView};
pub use photos::{CategoryView, GalleryView, Photo, PhotoCard, PhotoCatalog, PhotoGallery};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Error,
}

/// User-initiated retry offered by a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryAction {
    /// Reload the whole page (catalog failures).
    ReloadPage,
    /// Fetch one note body again.
    ReloadNote { path: String },
}

/// Fixed message shown in place of content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub tone: Tone,
    pub title: String,
    pub lines: Vec<String>,
    pub retry: Option<RetryAction>,
}

impl Placeholder {
    pub fn info(title: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            tone: Tone::Info,
            title: title.into(),
            lines,
            retry: None,
        }
    }

    pub fn error(title: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            tone: Tone::Error,
            title: title.into(),
            lines,
            retry: None,
        }
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryAction) -> Self {
        self.retry = Some(retry);
        self
    }

    pub const fn is_error(&self) -> bool {
        matches!(self.tone, Tone::Error)
    }
}

/// Outcome of the one catalog load a page performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogState<T> {
    Ready(T),
    Failed(Placeholder),
}

/// Take `field` out of a catalog document, requiring a JSON array.
pub(crate) fn require_array(document: &Value, field: &str, resource: &str) -> Result<Vec<Value>> {
    match document.get(field) {
        Some(Value::Array(items)) => Ok(items.clone()),
        _ => Err(Error::InvalidCatalog {
            resource: resource.to_string(),
            reason: format!("{field} must be an array"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn require_array_rejects_other_shapes() {
        let document = json!({"mdFiles": "a.md", "categories": []});
        assert!(require_array(&document, "mdFiles", "notes/files.json").is_err());
        assert!(require_array(&document, "missing", "notes/files.json").is_err());
        assert_eq!(
            require_array(&document, "categories", "photos.json").unwrap(),
            Vec::<Value>::new()
        );
    }

    #[test]
    fn placeholder_tone_and_retry() {
        let placeholder = Placeholder::error("Load failed", vec![]).with_retry(RetryAction::ReloadPage);
        assert!(placeholder.is_error());
        assert_eq!(placeholder.retry, Some(RetryAction::ReloadPage));
        assert!(!Placeholder::info("Nothing here", vec![]).is_error());
    }
}
