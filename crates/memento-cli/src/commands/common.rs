use std::path::{Path, PathBuf};

use memento_core::assets::{AssetSource, DirAssets, HttpAssets};
use memento_core::catalog::Placeholder;
use memento_core::config::SiteConfig;
use memento_core::storage::FileStore;

use crate::cli::Cli;
use crate::error::CliError;

const STATE_FILE_NAME: &str = "persistent.json";

/// Where site resources are read from.
#[derive(Debug, Clone)]
pub enum SiteAssets {
    Dir(DirAssets),
    Http(HttpAssets),
}

impl AssetSource for SiteAssets {
    async fn fetch_text(&self, path: &str) -> memento_core::Result<String> {
        match self {
            Self::Dir(assets) => assets.fetch_text(path).await,
            Self::Http(assets) => assets.fetch_text(path).await,
        }
    }
}

/// Everything a site command needs: layout plus resource source.
#[derive(Debug, Clone)]
pub struct SiteContext {
    pub site: SiteConfig,
    pub assets: SiteAssets,
}

impl SiteContext {
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        Self::new(&cli.site, cli.base_url.as_deref(), cli.config.as_deref())
    }

    pub fn new(
        site_dir: &Path,
        base_url: Option<&str>,
        config_path: Option<&Path>,
    ) -> Result<Self, CliError> {
        let site = match config_path {
            Some(path) => SiteConfig::load_from_path(path)?,
            None => SiteConfig::default(),
        };
        let assets = match base_url.map(str::trim).filter(|url| !url.is_empty()) {
            Some(url) => SiteAssets::Http(HttpAssets::new(url)?),
            None => SiteAssets::Dir(DirAssets::new(site_dir)),
        };
        Ok(Self { site, assets })
    }
}

pub fn resolve_state_path(explicit: Option<&Path>) -> Result<PathBuf, CliError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    default_state_path()
}

pub fn default_state_path() -> Result<PathBuf, CliError> {
    dirs::config_dir()
        .map(|dir| dir.join("memento").join(STATE_FILE_NAME))
        .ok_or_else(|| CliError::Config("could not resolve the user config directory".to_string()))
}

pub fn open_state(explicit: Option<&Path>) -> Result<FileStore, CliError> {
    let path = resolve_state_path(explicit)?;
    Ok(FileStore::open(path)?)
}

/// Plain-text rendering of a placeholder, title first.
pub fn format_placeholder(placeholder: &Placeholder) -> Vec<String> {
    let marker = if placeholder.is_error() { "!" } else { "-" };
    let mut lines = vec![format!("{marker} {}", placeholder.title)];
    lines.extend(placeholder.lines.iter().map(|line| format!("  {line}")));
    lines
}

/// Error for a command whose only output would be a placeholder.
pub fn placeholder_error(placeholder: &Placeholder) -> CliError {
    CliError::Catalog(format_placeholder(placeholder).join("\n"))
}
