//! Access guard run by every protected page before anything else.

use std::fmt;

use url::Url;

use crate::config::SiteConfig;
use crate::error::{Error, Result};
use crate::session::{AccessToken, SessionStore};
use crate::storage::KeyValueStore;

/// Query parameter carrying the one-time token on the first post-login visit.
pub const TOKEN_PARAM: &str = "token";

const LOCAL_BASE: &str = "http://localhost/";

/// A page address as shown in the address bar.
///
/// Relative addresses (`notes.html?token=abc`) are resolved against a local
/// base and rendered back in relative form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageAddress {
    url: Url,
    relative: bool,
}

impl PageAddress {
    pub fn parse(raw: &str) -> Result<Self> {
        match Url::parse(raw.trim()) {
            Ok(url) => Ok(Self {
                url,
                relative: false,
            }),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let base = Url::parse(LOCAL_BASE)?;
                Ok(Self {
                    url: base.join(raw.trim())?,
                    relative: true,
                })
            }
            Err(error) => Err(Error::from(error)),
        }
    }

    /// Address of `page` with the token attached.
    pub fn with_token(page: &str, token: &AccessToken) -> Result<Self> {
        let mut address = Self::parse(page)?;
        address
            .url
            .query_pairs_mut()
            .append_pair(TOKEN_PARAM, token.as_str());
        Ok(address)
    }

    /// Non-empty `token` parameter, if present.
    pub fn token(&self) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == TOKEN_PARAM)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
    }

    /// Same address with every `token` parameter removed.
    #[must_use]
    pub fn without_token(&self) -> Self {
        let kept = self
            .url
            .query_pairs()
            .filter(|(key, _)| key != TOKEN_PARAM)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect::<Vec<_>>();

        let mut url = self.url.clone();
        if kept.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(kept);
        }
        Self {
            url,
            relative: self.relative,
        }
    }

    /// Last path segment (`/site/photos.html` -> `photos.html`).
    pub fn page(&self) -> &str {
        self.url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or_default()
    }
}

impl fmt::Display for PageAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.relative {
            return write!(f, "{}", self.url);
        }

        f.write_str(self.url.path().trim_start_matches('/'))?;
        if let Some(query) = self.url.query() {
            write!(f, "?{query}")?;
        }
        if let Some(fragment) = self.url.fragment() {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}

/// Why a page load was sent back to the login page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NotLoggedIn,
    MissingAddressToken,
    MissingSessionToken,
    TokenMismatch,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotLoggedIn => "login flag absent",
            Self::MissingAddressToken => "address carries no token",
            Self::MissingSessionToken => "session holds no token",
            Self::TokenMismatch => "address token does not match session token",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Continue page initialization. When set, the visible address must be
    /// replaced (without a new history entry) by `replace_address`.
    Proceed { replace_address: Option<PageAddress> },
    /// Stop initialization and navigate to the login page. Both stores have
    /// already been wiped.
    Redirect { to: PageAddress, reason: RejectReason },
}

impl GuardDecision {
    pub const fn is_proceed(&self) -> bool {
        matches!(self, Self::Proceed { .. })
    }
}

#[derive(Debug, Clone)]
pub struct AccessGuard {
    login_page: String,
}

impl AccessGuard {
    pub fn new(login_page: impl Into<String>) -> Self {
        Self {
            login_page: login_page.into(),
        }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(config.login_page.clone())
    }

    /// Validate the session for a page loaded at `address`.
    ///
    /// The token is compared at most once per session: after a match the
    /// verified flag alone admits later loads, whatever the address says.
    pub fn check<P: KeyValueStore, S: KeyValueStore>(
        &self,
        store: &SessionStore<P, S>,
        address: &PageAddress,
    ) -> Result<GuardDecision> {
        let state = store.state();

        if !state.is_login {
            return self.reject(store, RejectReason::NotLoggedIn);
        }
        if state.is_verified {
            return Ok(GuardDecision::Proceed {
                replace_address: None,
            });
        }

        let Some(address_token) = address.token() else {
            return self.reject(store, RejectReason::MissingAddressToken);
        };
        let Some(session_token) = state.access_token.filter(|token| !token.as_str().is_empty())
        else {
            return self.reject(store, RejectReason::MissingSessionToken);
        };
        if address_token != session_token.as_str() {
            return self.reject(store, RejectReason::TokenMismatch);
        }

        store.verify()?;
        tracing::info!("Session verified for {}", address.page());
        Ok(GuardDecision::Proceed {
            replace_address: Some(address.without_token()),
        })
    }

    fn reject<P: KeyValueStore, S: KeyValueStore>(
        &self,
        store: &SessionStore<P, S>,
        reason: RejectReason,
    ) -> Result<GuardDecision> {
        tracing::warn!("Access denied ({}); redirecting to {}", reason, self.login_page);
        store.logout()?;
        Ok(GuardDecision::Redirect {
            to: PageAddress::parse(&self.login_page)?,
            reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::session::SessionState;
    use crate::storage::{MemoryStore, NOTES_THEME_KEY};

    fn store() -> SessionStore<MemoryStore, MemoryStore> {
        SessionStore::new(MemoryStore::new(), MemoryStore::new())
    }

    fn guard() -> AccessGuard {
        AccessGuard::from_config(&SiteConfig::default())
    }

    fn address(raw: &str) -> PageAddress {
        PageAddress::parse(raw).unwrap()
    }

    fn assert_redirected(decision: &GuardDecision, expected: RejectReason) {
        match decision {
            GuardDecision::Redirect { to, reason } => {
                assert_eq!(to.to_string(), "index.html");
                assert_eq!(*reason, expected);
            }
            GuardDecision::Proceed { .. } => panic!("expected redirect, got {decision:?}"),
        }
    }

    #[test]
    fn page_address_round_trips_relative_form() {
        let token = AccessToken::from("abc123".to_string());
        let with_token = PageAddress::with_token("notes.html", &token).unwrap();
        assert_eq!(with_token.to_string(), "notes.html?token=abc123");
        assert_eq!(with_token.token().as_deref(), Some("abc123"));
        assert_eq!(with_token.page(), "notes.html");
    }

    #[test]
    fn without_token_keeps_other_parameters() {
        let stripped = address("photos.html?album=2024&token=abc&view=grid").without_token();
        assert_eq!(stripped.to_string(), "photos.html?album=2024&view=grid");

        let bare = address("notes.html?token=abc").without_token();
        assert_eq!(bare.to_string(), "notes.html");
        assert_eq!(bare.token(), None);
    }

    #[test]
    fn absolute_addresses_stay_absolute() {
        let stripped = address("https://example.com/site/notes.html?token=abc").without_token();
        assert_eq!(stripped.to_string(), "https://example.com/site/notes.html");
        assert_eq!(stripped.page(), "notes.html");
    }

    #[test]
    fn missing_login_flag_redirects_and_clears_everything() {
        let store = store();
        let token = AccessToken::generate();
        store.session().set("accessToken", token.as_str()).unwrap();
        store.verify().unwrap();
        store.persistent().set(NOTES_THEME_KEY, "dark").unwrap();

        let decision = guard()
            .check(&store, &PageAddress::with_token("notes.html", &token).unwrap())
            .unwrap();

        assert_redirected(&decision, RejectReason::NotLoggedIn);
        assert_eq!(store.state(), SessionState::default());
        assert!(store.persistent().is_empty());
        assert!(store.session().is_empty());
    }

    #[test]
    fn matching_token_verifies_and_strips_address() {
        let store = store();
        let token = AccessToken::generate();
        store.login(&token).unwrap();

        let decision = guard()
            .check(&store, &PageAddress::with_token("notes.html", &token).unwrap())
            .unwrap();

        assert_eq!(
            decision,
            GuardDecision::Proceed {
                replace_address: Some(address("notes.html")),
            }
        );
        assert!(store.state().is_verified);
    }

    #[test]
    fn wrong_or_missing_token_redirects() {
        let cases = [
            ("notes.html?token=forged", RejectReason::TokenMismatch),
            ("notes.html", RejectReason::MissingAddressToken),
            ("notes.html?token=", RejectReason::MissingAddressToken),
        ];

        for (raw, expected) in cases {
            let store = store();
            store.login(&AccessToken::generate()).unwrap();

            let decision = guard().check(&store, &address(raw)).unwrap();
            assert_redirected(&decision, expected);
            assert_eq!(store.state(), SessionState::default());
        }
    }

    #[test]
    fn missing_session_token_redirects() {
        let store = store();
        store.persistent().set("isLogin", "true").unwrap();

        let decision = guard()
            .check(&store, &address("notes.html?token=abc"))
            .unwrap();
        assert_redirected(&decision, RejectReason::MissingSessionToken);
    }

    #[test]
    fn verified_session_never_rechecks_token() {
        let store = store();
        let token = AccessToken::generate();
        store.login(&token).unwrap();
        store.verify().unwrap();

        for raw in ["photos.html", "photos.html?token=tampered", "notes.html"] {
            let decision = guard().check(&store, &address(raw)).unwrap();
            assert_eq!(
                decision,
                GuardDecision::Proceed {
                    replace_address: None
                }
            );
        }
        assert_eq!(store.state().access_token, Some(token));
    }
}
