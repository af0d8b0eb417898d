use memento_core::catalog::{CatalogState, NoteBody, NotesPage, NotesView};

use crate::commands::common::{format_placeholder, placeholder_error, SiteContext};
use crate::error::CliError;

pub async fn run_notes_list(context: &SiteContext, as_json: bool) -> Result<(), CliError> {
    let page = NotesPage::new(context.assets.clone(), &context.site);
    let entries = match page.catalog().await {
        CatalogState::Failed(placeholder) => {
            return Err(placeholder_error(placeholder));
        }
        CatalogState::Ready(catalog) => catalog.entries(&context.site),
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else if entries.is_empty() {
        // same wording the notes page shows
        if let NotesView::Empty(placeholder) = page.init().await {
            for line in format_placeholder(&placeholder) {
                println!("{line}");
            }
        }
    } else {
        for entry in &entries {
            println!("{:>3}  {}  ({})", entry.index + 1, entry.title, entry.path);
        }
    }

    Ok(())
}

pub async fn run_notes_show(context: &SiteContext, file: &str) -> Result<(), CliError> {
    let file = file.trim();
    if file.is_empty() {
        return Err(CliError::Catalog("note file name cannot be empty".to_string()));
    }

    let page = NotesPage::new(context.assets.clone(), &context.site);
    match page.load_body(&context.site.note_path(file)).await {
        NoteBody::Rendered { html, .. } => {
            print!("{html}");
            Ok(())
        }
        NoteBody::Failed(placeholder) => Err(placeholder_error(&placeholder)),
    }
}
