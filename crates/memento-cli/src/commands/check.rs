use std::collections::HashSet;

use memento_core::assets::AssetSource;
use memento_core::catalog::{NotesCatalog, PhotoCatalog};
use memento_core::login::LoginConfig;

use crate::commands::common::SiteContext;
use crate::error::CliError;

#[derive(Debug, Default)]
pub struct CheckReport {
    pub lines: Vec<String>,
    pub problems: usize,
}

impl CheckReport {
    fn ok(&mut self, line: String) {
        self.lines.push(format!("ok   {line}"));
    }

    fn problem(&mut self, line: String) {
        self.problems += 1;
        self.lines.push(format!("FAIL {line}"));
    }
}

pub async fn check_site(context: &SiteContext) -> CheckReport {
    let mut report = CheckReport::default();
    check_login_config(context, &mut report).await;
    check_notes(context, &mut report).await;
    check_photos(context, &mut report).await;
    report
}

async fn check_login_config(context: &SiteContext, report: &mut CheckReport) {
    let resource = &context.site.login_config_path;
    let config = match context.assets.fetch_json(resource).await {
        Ok(value) => match serde_json::from_value::<LoginConfig>(value) {
            Ok(config) => config,
            Err(error) => {
                report.problem(format!(
                    "{resource}: {error}; the built-in account applies"
                ));
                return;
            }
        },
        Err(error) => {
            report.problem(format!("{resource}: {error}; the built-in account applies"));
            return;
        }
    };

    if config.users.is_empty() {
        report.problem(format!("{resource}: no users configured, nobody can log in"));
        return;
    }
    let mut valid = 0;
    for (index, record) in config.users.iter().enumerate() {
        if record.decode().is_some() {
            valid += 1;
        } else {
            report.problem(format!(
                "{resource}: user #{} is not Base64-encoded UTF-8 text",
                index + 1
            ));
        }
    }
    report.ok(format!("{resource}: {valid} usable account(s)"));
}

async fn check_notes(context: &SiteContext, report: &mut CheckReport) {
    let resource = &context.site.notes_index_path;
    let catalog = match context.assets.fetch_json(resource).await {
        Ok(document) => NotesCatalog::parse(&document, resource),
        Err(error) => Err(error),
    };
    let catalog = match catalog {
        Ok(catalog) => catalog,
        Err(error) => {
            report.problem(format!("{resource}: {error}"));
            return;
        }
    };

    if catalog.files.is_empty() {
        report.ok(format!("{resource}: no notes listed"));
        return;
    }
    for entry in catalog.entries(&context.site) {
        if let Err(error) = context.assets.fetch_text(&entry.path).await {
            report.problem(format!("{}: {error}", entry.path));
        }
    }
    report.ok(format!("{resource}: {} note(s) listed", catalog.files.len()));
}

async fn check_photos(context: &SiteContext, report: &mut CheckReport) {
    let resource = &context.site.photos_config_path;
    let catalog = match context.assets.fetch_json(resource).await {
        Ok(document) => PhotoCatalog::parse(&document, resource),
        Err(error) => Err(error),
    };
    let catalog = match catalog {
        Ok(catalog) => catalog,
        Err(error) => {
            report.problem(format!("{resource}: {error}"));
            return;
        }
    };

    let mut seen = HashSet::new();
    for category in &catalog.categories {
        if !seen.insert(category.name.as_str()) {
            report.problem(format!(
                "{resource}: category \"{}\" is listed twice; only the first is shown",
                category.name
            ));
        }
    }
    let photos = catalog
        .categories
        .iter()
        .filter_map(|category| category.photos.as_ref())
        .map(Vec::len)
        .sum::<usize>();
    report.ok(format!(
        "{resource}: {} categories, {photos} photo(s)",
        catalog.categories.len()
    ));
}

pub async fn run_check(context: &SiteContext) -> Result<(), CliError> {
    let report = check_site(context).await;
    for line in &report.lines {
        println!("{line}");
    }

    if report.problems > 0 {
        return Err(CliError::CheckFailed(report.problems));
    }
    Ok(())
}
