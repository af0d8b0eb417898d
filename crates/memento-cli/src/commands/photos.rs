use memento_core::catalog::{CategoryView, GalleryView, PhotoCard, PhotoGallery};
use serde::Serialize;

use crate::commands::common::{format_placeholder, placeholder_error, SiteContext};
use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct PhotoListing {
    pub categories: Vec<String>,
    pub selected: String,
    pub cards: Vec<PhotoCard>,
    /// Placeholder title when the category shows no grid
    pub notice: Option<String>,
}

pub fn listing_from_view(view: GalleryView) -> Result<PhotoListing, CliError> {
    match view {
        GalleryView::Failed(placeholder) => Err(placeholder_error(&placeholder)),
        GalleryView::Empty(placeholder) => Ok(PhotoListing {
            categories: Vec::new(),
            selected: String::new(),
            cards: Vec::new(),
            notice: Some(placeholder.title),
        }),
        GalleryView::Ready {
            categories,
            selected,
            content,
        } => {
            let (cards, notice) = match content {
                CategoryView::Grid(cards) => (cards, None),
                CategoryView::NotFound(placeholder) | CategoryView::NoPhotos(placeholder) => {
                    (Vec::new(), Some(format_placeholder(&placeholder).join(" ")))
                }
            };
            Ok(PhotoListing {
                categories,
                selected,
                cards,
                notice,
            })
        }
    }
}

pub async fn run_photos_list(
    context: &SiteContext,
    category: Option<&str>,
    as_json: bool,
) -> Result<(), CliError> {
    let gallery = PhotoGallery::new(context.assets.clone(), &context.site);
    let view = match category.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => gallery.select(name).await,
        None => gallery.init().await,
    };
    let listing = listing_from_view(view)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    for name in &listing.categories {
        let marker = if *name == listing.selected { "*" } else { " " };
        println!("{marker} {name}");
    }
    if let Some(notice) = &listing.notice {
        println!("{notice}");
    }
    for card in &listing.cards {
        println!("    {}  {}", card.src, card.desc);
    }

    Ok(())
}
