//! Markdown reading notes: `notes/files.json` catalog and note bodies.

use pulldown_cmark::{html, Options, Parser};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::OnceCell;

use crate::assets::AssetSource;
use crate::catalog::{require_array, CatalogState, Placeholder, RetryAction};
use crate::config::SiteConfig;
use crate::error::{Error, Result};
use crate::util::file_name;

const MD_FILES_FIELD: &str = "mdFiles";
const NOTE_TITLE_SUFFIX: &str = " Reading Notes";

/// Ordered list of Markdown file names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotesCatalog {
    pub files: Vec<String>,
}

impl NotesCatalog {
    /// Parse `{"mdFiles": ["a.md", ...]}`.
    pub fn parse(document: &Value, resource: &str) -> Result<Self> {
        let files = require_array(document, MD_FILES_FIELD, resource)?
            .into_iter()
            .map(|item| match item {
                Value::String(name) => Ok(name),
                other => Err(Error::InvalidCatalog {
                    resource: resource.to_string(),
                    reason: format!("{MD_FILES_FIELD} entries must be strings, found {other}"),
                }),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { files })
    }

    pub fn entries(&self, site: &SiteConfig) -> Vec<NoteEntry> {
        self.files
            .iter()
            .enumerate()
            .map(|(index, file)| NoteEntry {
                index,
                title: note_title(file),
                path: site.note_path(file),
            })
            .collect()
    }
}

/// Sidebar entry for one note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteEntry {
    pub index: usize,
    pub title: String,
    pub path: String,
}

/// Display title derived from a file name:
/// `little-prince.md` -> `Little prince Reading Notes`.
pub fn note_title(file: &str) -> String {
    let stem = file.strip_suffix(".md").unwrap_or(file);
    let spaced = stem.replace('-', " ");

    let mut chars = spaced.chars();
    let titled = match chars.next() {
        Some(first) if first.is_ascii_alphanumeric() || first == '_' => {
            let mut titled = first.to_ascii_uppercase().to_string();
            titled.push_str(chars.as_str());
            titled
        }
        _ => spaced,
    };
    format!("{titled}{NOTE_TITLE_SUFFIX}")
}

/// Render Markdown to HTML.
pub fn render_markdown(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES;
    let mut rendered = String::new();
    html::push_html(&mut rendered, Parser::new_ext(markdown, options));
    rendered
}

/// Content pane for the selected note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteBody {
    Rendered { path: String, html: String },
    /// Fetch failed; the placeholder's retry reloads this note only.
    Failed(Placeholder),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotesView {
    Failed(Placeholder),
    Empty(Placeholder),
    Ready {
        entries: Vec<NoteEntry>,
        selected: usize,
        body: NoteBody,
    },
}

/// Notes page after the guard passed.
pub struct NotesPage<A: AssetSource> {
    assets: A,
    site: SiteConfig,
    catalog: OnceCell<CatalogState<NotesCatalog>>,
}

impl<A: AssetSource> NotesPage<A> {
    pub fn new(assets: A, site: &SiteConfig) -> Self {
        Self {
            assets,
            site: site.clone(),
            catalog: OnceCell::new(),
        }
    }

    /// Catalog state, fetching it on first use only.
    pub async fn catalog(&self) -> &CatalogState<NotesCatalog> {
        self.catalog
            .get_or_init(|| async {
                let resource = &self.site.notes_index_path;
                match self.fetch_catalog(resource).await {
                    Ok(catalog) => {
                        tracing::info!("Notes catalog loaded ({} files)", catalog.files.len());
                        CatalogState::Ready(catalog)
                    }
                    Err(error) => {
                        tracing::error!("Failed to load notes catalog {}: {}", resource, error);
                        CatalogState::Failed(catalog_error(resource, &error))
                    }
                }
            })
            .await
    }

    async fn fetch_catalog(&self, resource: &str) -> Result<NotesCatalog> {
        let document = self.assets.fetch_json(resource).await?;
        NotesCatalog::parse(&document, resource)
    }

    /// Initial render: the first note is selected.
    pub async fn init(&self) -> NotesView {
        self.select(0).await
    }

    /// Select the note at `index` and fetch its body. The catalog itself is
    /// never fetched again.
    pub async fn select(&self, index: usize) -> NotesView {
        let entries = match self.catalog().await {
            CatalogState::Failed(placeholder) => return NotesView::Failed(placeholder.clone()),
            CatalogState::Ready(catalog) if catalog.files.is_empty() => {
                return NotesView::Empty(self.empty_placeholder());
            }
            CatalogState::Ready(catalog) => catalog.entries(&self.site),
        };

        let selected = index.min(entries.len() - 1);
        let body = self.load_body(&entries[selected].path).await;
        NotesView::Ready {
            entries,
            selected,
            body,
        }
    }

    /// Fetch and render one note body; failures stay scoped to that note.
    pub async fn load_body(&self, path: &str) -> NoteBody {
        match self.assets.fetch_text(path).await {
            Ok(markdown) => NoteBody::Rendered {
                path: path.to_string(),
                html: render_markdown(&markdown),
            },
            Err(error) => {
                tracing::error!("Failed to load note {}: {}", path, error);
                NoteBody::Failed(
                    Placeholder::error(
                        "Load failed",
                        vec![
                            format!(
                                "Could not read {} from the notes directory",
                                file_name(path)
                            ),
                            "Check that the file exists".to_string(),
                        ],
                    )
                    .with_retry(RetryAction::ReloadNote {
                        path: path.to_string(),
                    }),
                )
            }
        }
    }

    fn empty_placeholder(&self) -> Placeholder {
        Placeholder::info(
            "No reading notes yet",
            vec![
                format!(
                    "Add Markdown file names to {}",
                    self.site.notes_index_path
                ),
                r#"Example: {"mdFiles": ["hello.md", "little-prince.md"]}"#.to_string(),
            ],
        )
    }
}

fn catalog_error(resource: &str, error: &Error) -> Placeholder {
    Placeholder::error(
        "Initialization failed",
        vec![
            error.to_string(),
            format!("Check that {resource} exists and holds {{\"{MD_FILES_FIELD}\": [...]}}"),
        ],
    )
}
