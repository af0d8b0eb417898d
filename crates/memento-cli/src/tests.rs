use std::path::Path;

use clap::Parser;
use memento_core::catalog::{CategoryView, GalleryView, Placeholder, RetryAction};
use memento_core::storage::{KeyValueStore, MemoryStore, IS_LOGIN_KEY, PHOTOS_THEME_KEY};
use memento_core::theme::ThemeMode;
use pretty_assertions::assert_eq;

use crate::cli::{Cli, Commands, CompletionShell, NotesCommands};
use crate::commands::check::check_site;
use crate::commands::common::{format_placeholder, resolve_state_path, SiteAssets, SiteContext};
use crate::commands::completions::{completion_script, run_completions};
use crate::commands::encode::encode_user;
use crate::commands::photos::listing_from_view;
use crate::commands::status::{status_report, StatusReport};
use crate::commands::walk::walk_session;
use crate::error::CliError;

fn write_file(root: &Path, relative: &str, body: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, body).unwrap();
}

fn write_site(root: &Path) {
    write_file(
        root,
        "config/login-config.json",
        r#"{"users":[{"username":"YWRtaW4=","password":"MTIzNDU2"}],"tips":"ask the owner"}"#,
    );
    write_file(
        root,
        "notes/files.json",
        r#"{"mdFiles":["hello.md","little-prince.md"]}"#,
    );
    write_file(root, "notes/hello.md", "# Hello\n");
    write_file(root, "notes/little-prince.md", "*rose*\n");
    write_file(
        root,
        "photos/photos-config.json",
        r#"{"categories":[{"name":"Travel","photos":[{"src":"photos/1.jpg"},{"desc":"Harbor"}]}]}"#,
    );
}

fn local_context(root: &Path) -> SiteContext {
    SiteContext::new(root, None, None).unwrap()
}

#[test]
fn encode_user_trims_and_rejects_empty() {
    let record = encode_user(" admin ", "123456").unwrap();
    assert_eq!(record.username, "YWRtaW4=");
    assert_eq!(record.password, "MTIzNDU2");

    assert!(matches!(
        encode_user("admin", "   "),
        Err(CliError::EmptyCredentials)
    ));
}

#[test]
fn global_site_options_parse_after_subcommand() {
    let cli = Cli::try_parse_from([
        "memento",
        "notes",
        "list",
        "--json",
        "--site",
        "public",
    ])
    .unwrap();

    assert_eq!(cli.site, Path::new("public"));
    assert!(matches!(
        cli.command,
        Commands::Notes {
            command: NotesCommands::List { json: true }
        }
    ));
}

#[test]
fn completion_script_names_binary() {
    let script = String::from_utf8(completion_script(CompletionShell::Bash)).unwrap();
    assert!(script.contains("memento"));
    assert!(script.contains("walk"));
}

#[test]
fn completions_written_to_nested_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("completions/_memento");

    run_completions(CompletionShell::Zsh, Some(&path)).unwrap();

    let script = std::fs::read_to_string(path).unwrap();
    assert!(script.contains("#compdef memento"));
}

#[test]
fn site_context_picks_asset_source() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(local_context(dir.path()).assets, SiteAssets::Dir(_)));

    let remote = SiteContext::new(dir.path(), Some("https://example.com"), None).unwrap();
    assert!(matches!(remote.assets, SiteAssets::Http(_)));

    assert!(SiteContext::new(dir.path(), Some("example.com"), None).is_err());
}

#[test]
fn explicit_state_path_wins() {
    let resolved = resolve_state_path(Some(Path::new("/tmp/memento.json"))).unwrap();
    assert_eq!(resolved, Path::new("/tmp/memento.json"));
}

#[test]
fn placeholder_lines_are_indented_under_title() {
    let placeholder = Placeholder::error("Load failed", vec!["Check the file".to_string()])
        .with_retry(RetryAction::ReloadPage);
    assert_eq!(
        format_placeholder(&placeholder),
        vec!["! Load failed".to_string(), "  Check the file".to_string()]
    );
}

#[test]
fn photo_listing_reports_notice_for_empty_category() {
    let listing = listing_from_view(GalleryView::Ready {
        categories: vec!["Pets".to_string()],
        selected: "Pets".to_string(),
        content: CategoryView::NoPhotos(Placeholder::info("No photos", vec![])),
    })
    .unwrap();

    assert!(listing.cards.is_empty());
    assert_eq!(listing.notice.as_deref(), Some("- No photos"));
    assert!(listing_from_view(GalleryView::Failed(Placeholder::error("Broken", vec![]))).is_err());
}

#[test]
fn status_reads_login_flag_and_themes() {
    let store = MemoryStore::new();
    assert_eq!(
        status_report(&store),
        StatusReport {
            logged_in: false,
            notes_theme: ThemeMode::Light,
            photos_theme: ThemeMode::Light,
        }
    );

    store.set(IS_LOGIN_KEY, "true").unwrap();
    store.set(PHOTOS_THEME_KEY, "dark").unwrap();
    let report = status_report(&store);
    assert!(report.logged_in);
    assert_eq!(report.photos_theme, ThemeMode::Dark);
}

#[tokio::test(flavor = "current_thread")]
async fn check_passes_on_complete_site() {
    let dir = tempfile::tempdir().unwrap();
    write_site(dir.path());

    let report = check_site(&local_context(dir.path())).await;
    assert_eq!(report.problems, 0, "{:?}", report.lines);
    assert_eq!(report.lines.len(), 3);
}

#[tokio::test(flavor = "current_thread")]
async fn check_counts_missing_notes_and_bad_records() {
    let dir = tempfile::tempdir().unwrap();
    write_site(dir.path());
    std::fs::remove_file(dir.path().join("notes/hello.md")).unwrap();
    write_file(
        dir.path(),
        "config/login-config.json",
        r#"{"users":[{"username":"%%%","password":"MTIzNDU2"}]}"#,
    );

    let report = check_site(&local_context(dir.path())).await;
    assert_eq!(report.problems, 2, "{:?}", report.lines);
}

#[tokio::test(flavor = "current_thread")]
async fn walk_covers_login_navigation_and_logout() {
    let dir = tempfile::tempdir().unwrap();
    write_site(dir.path());
    let persistent = MemoryStore::new();

    let steps = walk_session(&local_context(dir.path()), persistent.clone(), "admin", "123456")
        .await
        .unwrap();

    assert_eq!(
        steps,
        vec![
            "login: accepted, opening notes.html in 400ms",
            "notes: token verified, address shown as notes.html",
            "notes: 2 note(s), \"Hello Reading Notes\" rendered",
            "nav: highlighting notes, light theme",
            "nav: clicked memories, content frame loads photos.html",
            "photos: session already verified",
            "photos: 1 categories, \"Travel\" shows 2 photo(s)",
            "nav: highlighting memories, light theme",
            "photos: theme switched to dark, nav frame shows dark",
            "nav: logout confirmed, content frame returns to index.html",
            "photos: reopening now redirects to index.html (login flag absent)",
        ]
    );
    assert!(persistent.is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn walk_stops_on_rejected_login() {
    let dir = tempfile::tempdir().unwrap();
    write_site(dir.path());
    let persistent = MemoryStore::new();

    let error = walk_session(&local_context(dir.path()), persistent.clone(), "admin", "wrong")
        .await
        .unwrap_err();

    assert_eq!(
        error.to_string(),
        "Login rejected: wrong username or password (ask the owner)"
    );
    assert!(persistent.is_empty());
}
