//! Login gate: Base64 credential list, form submission, session start.
//!
//! The credential list is a public JSON file and the encoding is plain
//! Base64. This hides content from casual navigation and nothing more.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::assets::AssetSource;
use crate::config::SiteConfig;
use crate::error::Result;
use crate::guard::PageAddress;
use crate::session::{AccessToken, SessionStore};
use crate::storage::KeyValueStore;

/// Cosmetic pause between a successful login and the redirect.
pub const REDIRECT_DELAY: Duration = Duration::from_millis(400);
/// How long a mismatch message stays visible.
pub const ERROR_TIP_TIMEOUT: Duration = Duration::from_secs(3);

const FALLBACK_USERNAME: &str = "YWRtaW4=";
const FALLBACK_PASSWORD: &str = "MTIzNDU2";
const FALLBACK_TIPS: &str = "default account: admin, default password: 123456";

const EMPTY_FIELDS_MESSAGE: &str = "username and password must not be empty";

/// One Base64-encoded username/password pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub username: String,
    pub password: String,
}

impl CredentialRecord {
    pub fn encode(username: &str, password: &str) -> Self {
        Self {
            username: STANDARD.encode(username),
            password: STANDARD.encode(password),
        }
    }

    /// Decoded `(username, password)`, or `None` when either side is not
    /// valid Base64 UTF-8 text.
    pub fn decode(&self) -> Option<(String, String)> {
        Some((decode_text(&self.username)?, decode_text(&self.password)?))
    }

    fn matches(&self, username: &str, password: &str) -> bool {
        self.decode()
            .is_some_and(|(user, pass)| user == username && pass == password)
    }
}

fn decode_text(encoded: &str) -> Option<String> {
    let bytes = match STANDARD.decode(encoded.trim()) {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::warn!("Failed to decode credential field: {}", error);
            return None;
        }
    };
    match String::from_utf8(bytes) {
        Ok(text) => Some(text),
        Err(error) => {
            tracing::warn!("Decoded credential field is not UTF-8: {}", error);
            None
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginConfig {
    #[serde(default)]
    pub users: Vec<CredentialRecord>,
    #[serde(default)]
    pub tips: String,
}

impl LoginConfig {
    /// Single built-in account used when the config resource is unavailable.
    pub fn fallback() -> Self {
        Self {
            users: vec![CredentialRecord {
                username: FALLBACK_USERNAME.to_string(),
                password: FALLBACK_PASSWORD.to_string(),
            }],
            tips: FALLBACK_TIPS.to_string(),
        }
    }

    /// Index of the first record matching the inputs exactly.
    pub fn find_match(&self, username: &str, password: &str) -> Option<usize> {
        self.users
            .iter()
            .position(|record| record.matches(username, password))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginRejection {
    EmptyFields,
    Mismatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Session started; navigate to `redirect` after `delay`.
    Accepted {
        redirect: PageAddress,
        token: AccessToken,
        delay: Duration,
    },
    /// Nothing stored; show `message` inline, hiding it after `hide_after`.
    Rejected {
        reason: LoginRejection,
        message: String,
        hide_after: Duration,
    },
}

/// State of the login page between load and submit.
pub struct LoginPage<A: AssetSource, P: KeyValueStore, S: KeyValueStore> {
    assets: A,
    store: SessionStore<P, S>,
    config_path: String,
    default_page: String,
    config: Option<LoginConfig>,
}

impl<A: AssetSource, P: KeyValueStore, S: KeyValueStore> LoginPage<A, P, S> {
    pub fn new(assets: A, store: SessionStore<P, S>, site: &SiteConfig) -> Self {
        Self {
            assets,
            store,
            config_path: site.login_config_path.clone(),
            default_page: site.default_page.clone(),
            config: None,
        }
    }

    pub const fn config(&self) -> Option<&LoginConfig> {
        self.config.as_ref()
    }

    /// Fetch the credential list, substituting the built-in account on any
    /// failure.
    pub async fn load_config(&mut self) -> &LoginConfig {
        let loaded = match self.fetch_config().await {
            Ok(config) => {
                tracing::info!("Login config loaded ({} users)", config.users.len());
                config
            }
            Err(error) => {
                tracing::warn!(
                    "Failed to load login config from {}: {}; using fallback account",
                    self.config_path,
                    error
                );
                LoginConfig::fallback()
            }
        };
        self.config.insert(loaded)
    }

    async fn fetch_config(&self) -> Result<LoginConfig> {
        let value = self.assets.fetch_json(&self.config_path).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Handle a form submission.
    ///
    /// Inputs are trimmed and compared exactly; the first matching record
    /// wins. A rejection never touches either store.
    pub async fn submit(&mut self, username: &str, password: &str) -> Result<LoginOutcome> {
        let username = username.trim();
        let password = password.trim();
        if username.is_empty() || password.is_empty() {
            return Ok(LoginOutcome::Rejected {
                reason: LoginRejection::EmptyFields,
                message: EMPTY_FIELDS_MESSAGE.to_string(),
                hide_after: ERROR_TIP_TIMEOUT,
            });
        }

        let needs_load = self
            .config
            .as_ref()
            .is_none_or(|config| config.users.is_empty());
        if needs_load {
            self.load_config().await;
        }
        let config = self.config.clone().unwrap_or_else(LoginConfig::fallback);

        if config.find_match(username, password).is_none() {
            tracing::info!("Login rejected for '{}'", username);
            return Ok(LoginOutcome::Rejected {
                reason: LoginRejection::Mismatch,
                message: format!("wrong username or password ({})", config.tips),
                hide_after: ERROR_TIP_TIMEOUT,
            });
        }

        let token = AccessToken::generate();
        self.store.login(&token)?;
        tracing::info!("Login accepted for '{}'", username);

        Ok(LoginOutcome::Accepted {
            redirect: PageAddress::with_token(&self.default_page, &token)?,
            token,
            delay: REDIRECT_DELAY,
        })
    }
}
