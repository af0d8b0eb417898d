//! Session state spread over the persistent and session-scoped stores.

use std::fmt;

use uuid::Uuid;

use crate::error::Result;
use crate::storage::{
    KeyValueStore, ACCESS_TOKEN_KEY, FLAG_TRUE, IS_LOGIN_KEY, IS_VERIFIED_KEY,
};

/// Opaque one-time token minted at login.
///
/// Random but not cryptographically significant; collisions are accepted.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AccessToken(String);

impl AccessToken {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for AccessToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// Snapshot of every session flag a page looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Persistent login flag
    pub is_login: bool,
    /// Session-scoped access token
    pub access_token: Option<AccessToken>,
    /// Session-scoped "token already checked" marker
    pub is_verified: bool,
}

/// The two stores a page shares with its siblings.
#[derive(Debug, Clone)]
pub struct SessionStore<P: KeyValueStore, S: KeyValueStore> {
    persistent: P,
    session: S,
}

impl<P: KeyValueStore, S: KeyValueStore> SessionStore<P, S> {
    pub const fn new(persistent: P, session: S) -> Self {
        Self {
            persistent,
            session,
        }
    }

    pub const fn persistent(&self) -> &P {
        &self.persistent
    }

    pub const fn session(&self) -> &S {
        &self.session
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            is_login: self.persistent.flag(IS_LOGIN_KEY),
            access_token: self.session.get(ACCESS_TOKEN_KEY).map(AccessToken::from),
            is_verified: self.session.flag(IS_VERIFIED_KEY),
        }
    }

    /// Mark the browser as logged in and store a fresh token for this session.
    pub fn login(&self, token: &AccessToken) -> Result<()> {
        self.persistent.set(IS_LOGIN_KEY, FLAG_TRUE)?;
        self.session.set(ACCESS_TOKEN_KEY, token.as_str())
    }

    /// Record that the address token was checked for this session.
    pub fn verify(&self) -> Result<()> {
        self.session.set(IS_VERIFIED_KEY, FLAG_TRUE)
    }

    /// Wipe both scopes.
    pub fn logout(&self) -> Result<()> {
        self.persistent.clear()?;
        self.session.clear()
    }

    /// Drop only the login flag and token, leaving theme preferences alone.
    pub fn forget_login(&self) -> Result<()> {
        self.persistent.remove(IS_LOGIN_KEY)?;
        self.session.remove(ACCESS_TOKEN_KEY)
    }
}
