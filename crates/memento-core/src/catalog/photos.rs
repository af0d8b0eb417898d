//! Photo gallery: `photos/photos-config.json` read once, categories rendered
//! from the cache.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tokio::sync::OnceCell;

use crate::assets::AssetSource;
use crate::catalog::{require_array, CatalogState, Placeholder, RetryAction};
use crate::config::SiteConfig;
use crate::error::{Error, Result};

const CATEGORIES_FIELD: &str = "categories";
const DEFAULT_IMG_FIELD: &str = "defaultImg";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoCategory {
    #[serde(default)]
    pub name: String,
    /// `None` when the category has no `photos` array.
    #[serde(default, deserialize_with = "photos_if_array")]
    pub photos: Option<Vec<Photo>>,
}

/// Keep `photos` only when it is an array. Entries that are not photo
/// objects become empty photos and render with the defaults.
fn photos_if_array<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<Photo>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .map(|item| serde_json::from_value(item).unwrap_or_default())
                .collect(),
        )),
        other => {
            if !other.is_null() {
                tracing::warn!("Ignoring non-array photos value: {}", other);
            }
            Ok(None)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoCatalog {
    pub default_img: Option<String>,
    pub categories: Vec<PhotoCategory>,
}

impl PhotoCatalog {
    /// Parse `{"defaultImg"?: "...", "categories": [...]}`.
    pub fn parse(document: &Value, resource: &str) -> Result<Self> {
        let categories = require_array(document, CATEGORIES_FIELD, resource)?
            .into_iter()
            .map(serde_json::from_value::<PhotoCategory>)
            .collect::<serde_json::Result<Vec<_>>>()
            .map_err(|error| Error::InvalidCatalog {
                resource: resource.to_string(),
                reason: error.to_string(),
            })?;
        let default_img = document
            .get(DEFAULT_IMG_FIELD)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(ToString::to_string);

        Ok(Self {
            default_img,
            categories,
        })
    }

    pub fn category(&self, name: &str) -> Option<&PhotoCategory> {
        self.categories.iter().find(|category| category.name == name)
    }

    pub fn category_names(&self) -> Vec<String> {
        self.categories
            .iter()
            .map(|category| category.name.clone())
            .collect()
    }
}

/// One rendered grid card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoCard {
    pub src: String,
    pub desc: String,
    /// Shown when `src` fails to load
    pub fallback_src: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryView {
    NotFound(Placeholder),
    NoPhotos(Placeholder),
    Grid(Vec<PhotoCard>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryView {
    Failed(Placeholder),
    Empty(Placeholder),
    Ready {
        categories: Vec<String>,
        selected: String,
        content: CategoryView,
    },
}

/// Render one category from an already-loaded catalog.
pub fn render_category(catalog: &PhotoCatalog, name: &str, default_image: &str) -> CategoryView {
    let Some(category) = catalog.category(name) else {
        return CategoryView::NotFound(Placeholder::info(
            "Category not found",
            vec![format!("No memories found in category \"{name}\"")],
        ));
    };

    let photos = category.photos.as_deref().unwrap_or_default();
    if photos.is_empty() {
        return CategoryView::NoPhotos(Placeholder::info(
            "No photos",
            vec![format!("Category \"{name}\" has no photos yet")],
        ));
    }

    let cards = photos
        .iter()
        .map(|photo| PhotoCard {
            src: photo
                .src
                .clone()
                .filter(|src| !src.is_empty())
                .unwrap_or_else(|| default_image.to_string()),
            desc: photo
                .desc
                .clone()
                .filter(|desc| !desc.is_empty())
                .unwrap_or_else(|| format!("{name} - memories")),
            fallback_src: default_image.to_string(),
        })
        .collect();
    CategoryView::Grid(cards)
}

/// Photo page after the guard passed.
pub struct PhotoGallery<A: AssetSource> {
    assets: A,
    site: SiteConfig,
    catalog: OnceCell<CatalogState<PhotoCatalog>>,
}

impl<A: AssetSource> PhotoGallery<A> {
    pub fn new(assets: A, site: &SiteConfig) -> Self {
        Self {
            assets,
            site: site.clone(),
            catalog: OnceCell::new(),
        }
    }

    /// Catalog state; the resource is read at most once per gallery.
    pub async fn catalog(&self) -> &CatalogState<PhotoCatalog> {
        self.catalog
            .get_or_init(|| async {
                let resource = &self.site.photos_config_path;
                match self.fetch_catalog(resource).await {
                    Ok(catalog) => {
                        tracing::info!(
                            "Photo catalog loaded and cached ({} categories)",
                            catalog.categories.len()
                        );
                        CatalogState::Ready(catalog)
                    }
                    Err(error) => {
                        tracing::error!("Failed to load photo catalog {}: {}", resource, error);
                        CatalogState::Failed(catalog_error(resource, &error))
                    }
                }
            })
            .await
    }

    async fn fetch_catalog(&self, resource: &str) -> Result<PhotoCatalog> {
        let document = self.assets.fetch_json(resource).await?;
        PhotoCatalog::parse(&document, resource)
    }

    /// Image used for photos without `src` and for broken images.
    pub async fn default_image(&self) -> String {
        match self.catalog().await {
            CatalogState::Ready(catalog) => catalog
                .default_img
                .clone()
                .unwrap_or_else(|| self.site.default_image.clone()),
            CatalogState::Failed(_) => self.site.default_image.clone(),
        }
    }

    /// Initial render: the first category is selected.
    pub async fn init(&self) -> GalleryView {
        let first = match self.catalog().await {
            CatalogState::Ready(catalog) => catalog.categories.first().map(|c| c.name.clone()),
            CatalogState::Failed(_) => None,
        };
        self.select(first.as_deref().unwrap_or_default()).await
    }

    /// Switch category. Reads the cached catalog only.
    pub async fn select(&self, name: &str) -> GalleryView {
        let default_image = self.default_image().await;
        match self.catalog().await {
            CatalogState::Failed(placeholder) => GalleryView::Failed(placeholder.clone()),
            CatalogState::Ready(catalog) if catalog.categories.is_empty() => {
                GalleryView::Empty(Placeholder::info(
                    "No memory categories yet",
                    vec![format!(
                        "Add categories and photos to {}",
                        self.site.photos_config_path
                    )],
                ))
            }
            CatalogState::Ready(catalog) => GalleryView::Ready {
                categories: catalog.category_names(),
                selected: name.to_string(),
                content: render_category(catalog, name, &default_image),
            },
        }
    }
}

fn catalog_error(resource: &str, error: &Error) -> Placeholder {
    Placeholder::error(
        "Initialization failed",
        vec![
            error.to_string(),
            format!("Check that {resource} exists"),
            format!(
                "Check that it is valid JSON with a \"{CATEGORIES_FIELD}\" array"
            ),
        ],
    )
    .with_retry(RetryAction::ReloadPage)
}
