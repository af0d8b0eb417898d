use std::path::Path;

use memento_core::catalog::{CategoryView, GalleryView, NoteBody, NotesPage, NotesView, PhotoGallery};
use memento_core::content::{ContentPage, ContentReaction, PageKind, PageLoad};
use memento_core::guard::PageAddress;
use memento_core::login::{LoginOutcome, LoginPage};
use memento_core::messaging::FrameBus;
use memento_core::nav::{NavAction, NavFrame, LOGOUT_ITEM};
use memento_core::storage::{KeyValueStore, MemoryStore};
use memento_core::SessionStore;

use crate::commands::common::{open_state, SiteContext};
use crate::error::CliError;

type WalkStore<P> = SessionStore<P, MemoryStore>;

/// Drive one full visit: login, notes, nav switch to photos, theme toggle,
/// logout. Returns one line per step.
///
/// The session scope lives for this call only, like a browser tab.
pub async fn walk_session<P: KeyValueStore>(
    context: &SiteContext,
    persistent: P,
    username: &str,
    password: &str,
) -> Result<Vec<String>, CliError> {
    let mut steps = Vec::new();
    let store = SessionStore::new(persistent, MemoryStore::new());

    let mut login = LoginPage::new(context.assets.clone(), store.clone(), &context.site);
    let redirect = match login.submit(username, password).await? {
        LoginOutcome::Rejected { message, .. } => return Err(CliError::LoginRejected(message)),
        LoginOutcome::Accepted {
            redirect, delay, ..
        } => {
            steps.push(format!(
                "login: accepted, opening {} in {}ms",
                redirect.page(),
                delay.as_millis()
            ));
            redirect
        }
    };

    let bus = FrameBus::new();
    let mut nav = NavFrame::attach(&bus, store.clone());

    let first_kind = if redirect.page() == context.site.photos_page {
        PageKind::Photos
    } else {
        PageKind::Notes
    };
    let mut page = open_page(first_kind, context, &bus, &store, &redirect, &mut steps)?;
    steps.push(describe_page(first_kind, context).await);
    page.on_load();
    nav.pump();
    steps.push(describe_nav(&nav));

    let target = if first_kind == PageKind::Photos {
        PageKind::Notes
    } else {
        PageKind::Photos
    };
    if !matches!(nav.click(target.nav_id()), NavAction::Posted(_)) {
        return Err(CliError::Session(format!(
            "nav item '{}' did not post a message",
            target.nav_id()
        )));
    }
    let address = match page.pump()? {
        Some(ContentReaction::Navigate(address)) => address,
        other => {
            return Err(CliError::Session(format!(
                "expected navigation to {target}, got {other:?}"
            )));
        }
    };
    steps.push(format!(
        "nav: clicked {}, content frame loads {address}",
        target.nav_id()
    ));

    let mut page = open_page(target, context, &bus, &store, &address, &mut steps)?;
    steps.push(describe_page(target, context).await);
    page.on_load();
    nav.pump();
    steps.push(describe_nav(&nav));

    let mode = page.toggle_theme()?;
    nav.pump();
    steps.push(format!(
        "{target}: theme switched to {mode}, nav frame shows {}",
        nav.theme()
    ));

    match nav.click(LOGOUT_ITEM) {
        NavAction::ConfirmLogout => {
            nav.confirm_logout(true)?;
        }
        other => {
            return Err(CliError::Session(format!(
                "logout item answered {other:?}"
            )));
        }
    }
    match page.pump()? {
        Some(ContentReaction::RedirectToLogin(to)) => {
            steps.push(format!("nav: logout confirmed, content frame returns to {to}"));
        }
        other => {
            return Err(CliError::Session(format!(
                "expected redirect to login, got {other:?}"
            )));
        }
    }

    match ContentPage::open(target, &context.site, &bus, store, &address)? {
        PageLoad::Redirected { to, reason } => {
            steps.push(format!("{target}: reopening now redirects to {to} ({reason})"));
        }
        PageLoad::Ready { .. } => {
            return Err(CliError::Session(format!(
                "{target} page still opens after logout"
            )));
        }
    }

    Ok(steps)
}

fn open_page<P: KeyValueStore>(
    kind: PageKind,
    context: &SiteContext,
    bus: &FrameBus,
    store: &WalkStore<P>,
    address: &PageAddress,
    steps: &mut Vec<String>,
) -> Result<ContentPage<P, MemoryStore>, CliError> {
    match ContentPage::open(kind, &context.site, bus, store.clone(), address)? {
        PageLoad::Ready {
            page,
            replace_address,
        } => {
            match replace_address {
                Some(shown) => steps.push(format!("{kind}: token verified, address shown as {shown}")),
                None => steps.push(format!("{kind}: session already verified")),
            }
            Ok(page)
        }
        PageLoad::Redirected { to, reason } => Err(CliError::Session(format!(
            "{kind} page redirected to {to} ({reason})"
        ))),
    }
}

async fn describe_page(kind: PageKind, context: &SiteContext) -> String {
    match kind {
        PageKind::Notes => {
            match NotesPage::new(context.assets.clone(), &context.site).init().await {
                NotesView::Failed(placeholder) | NotesView::Empty(placeholder) => {
                    format!("notes: {}", placeholder.title)
                }
                NotesView::Ready {
                    entries,
                    selected,
                    body,
                } => {
                    let shown = match body {
                        NoteBody::Rendered { .. } => "rendered",
                        NoteBody::Failed(_) => "failed to load",
                    };
                    format!(
                        "notes: {} note(s), \"{}\" {shown}",
                        entries.len(),
                        entries[selected].title
                    )
                }
            }
        }
        PageKind::Photos => {
            match PhotoGallery::new(context.assets.clone(), &context.site).init().await {
                GalleryView::Failed(placeholder) | GalleryView::Empty(placeholder) => {
                    format!("photos: {}", placeholder.title)
                }
                GalleryView::Ready {
                    categories,
                    selected,
                    content,
                } => {
                    let shown = match content {
                        CategoryView::Grid(cards) => format!("{} photo(s)", cards.len()),
                        CategoryView::NotFound(placeholder) | CategoryView::NoPhotos(placeholder) => {
                            placeholder.title
                        }
                    };
                    format!(
                        "photos: {} categories, \"{selected}\" shows {shown}",
                        categories.len()
                    )
                }
            }
        }
    }
}

fn describe_nav<P: KeyValueStore>(nav: &NavFrame<P, MemoryStore>) -> String {
    format!(
        "nav: highlighting {}, {} theme",
        nav.highlight().active().unwrap_or("nothing"),
        nav.theme()
    )
}

pub async fn run_walk(
    context: &SiteContext,
    username: &str,
    password: &str,
    state_path: Option<&Path>,
) -> Result<(), CliError> {
    let persistent = open_state(state_path)?;
    println!("state: {}", persistent.path().display());

    for step in walk_session(context, persistent, username, password).await? {
        println!("{step}");
    }
    Ok(())
}
