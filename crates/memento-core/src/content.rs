//! Protected content pages (notes, photos) and their side of the frame
//! protocol.

use std::fmt;

use crate::config::SiteConfig;
use crate::error::Result;
use crate::guard::{AccessGuard, GuardDecision, PageAddress, RejectReason};
use crate::messaging::{FrameBus, FrameInbox, FrameMessage, FrameRole};
use crate::nav::{MEMORIES_ITEM, NOTES_ITEM};
use crate::session::SessionStore;
use crate::storage::{KeyValueStore, NOTES_THEME_KEY, PHOTOS_THEME_KEY};
use crate::theme::{ThemeMode, ThemePreference};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    Notes,
    Photos,
}

impl PageKind {
    /// Resolve a nav item id (`notes`, `memories`) to a page.
    pub fn from_nav_id(id: &str) -> Option<Self> {
        match id {
            NOTES_ITEM => Some(Self::Notes),
            MEMORIES_ITEM => Some(Self::Photos),
            _ => None,
        }
    }

    pub const fn nav_id(self) -> &'static str {
        match self {
            Self::Notes => NOTES_ITEM,
            Self::Photos => MEMORIES_ITEM,
        }
    }

    /// Persistent key holding this page type's theme.
    pub const fn theme_key(self) -> &'static str {
        match self {
            Self::Notes => NOTES_THEME_KEY,
            Self::Photos => PHOTOS_THEME_KEY,
        }
    }

    pub fn route(self, site: &SiteConfig) -> &str {
        match self {
            Self::Notes => &site.notes_page,
            Self::Photos => &site.photos_page,
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Notes => f.write_str("notes"),
            Self::Photos => f.write_str("photos"),
        }
    }
}

/// How a content page responded to an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentReaction {
    /// Leave for another content route.
    Navigate(PageAddress),
    /// Session wiped; leave for the login page.
    RedirectToLogin(PageAddress),
    /// Theme applied to this document only.
    ThemeApplied(ThemeMode),
    Ignored,
}

impl ContentReaction {
    /// Whether the reaction discards the current page.
    pub const fn leaves_page(&self) -> bool {
        matches!(self, Self::Navigate(_) | Self::RedirectToLogin(_))
    }
}

/// Result of loading a protected page.
pub enum PageLoad<P: KeyValueStore, S: KeyValueStore> {
    /// Guard passed; the page is initialized. `replace_address` is the
    /// token-free address to show, when it changed.
    Ready {
        page: ContentPage<P, S>,
        replace_address: Option<PageAddress>,
    },
    /// Guard failed; nothing on the page was initialized.
    Redirected {
        to: PageAddress,
        reason: RejectReason,
    },
}

pub struct ContentPage<P: KeyValueStore, S: KeyValueStore> {
    kind: PageKind,
    site: SiteConfig,
    bus: FrameBus,
    inbox: FrameInbox,
    store: SessionStore<P, S>,
    theme_preference: ThemePreference<P>,
    theme: ThemeMode,
}

impl<P: KeyValueStore, S: KeyValueStore> ContentPage<P, S> {
    /// Run the access guard for `address`, then initialize the page.
    ///
    /// No inbox is registered and no theme is read unless the guard passes.
    pub fn open(
        kind: PageKind,
        site: &SiteConfig,
        bus: &FrameBus,
        store: SessionStore<P, S>,
        address: &PageAddress,
    ) -> Result<PageLoad<P, S>> {
        let decision = AccessGuard::from_config(site).check(&store, address)?;
        let replace_address = match decision {
            GuardDecision::Proceed { replace_address } => replace_address,
            GuardDecision::Redirect { to, reason } => {
                return Ok(PageLoad::Redirected { to, reason });
            }
        };

        let theme_preference = ThemePreference::new(store.persistent().clone(), kind.theme_key());
        let theme = theme_preference.load();
        tracing::debug!("Opened {} page with {} theme", kind, theme);

        Ok(PageLoad::Ready {
            page: Self {
                kind,
                site: site.clone(),
                bus: bus.clone(),
                inbox: bus.attach(FrameRole::Content),
                store,
                theme_preference,
                theme,
            },
            replace_address,
        })
    }

    pub const fn kind(&self) -> PageKind {
        self.kind
    }

    pub const fn theme(&self) -> ThemeMode {
        self.theme
    }

    /// Tell the nav frame which item to highlight and which theme to show.
    ///
    /// Sent once after the page finished loading. The nav frame may not exist
    /// yet; that is logged and ignored.
    pub fn on_load(&self) {
        self.bus
            .post(FrameRole::Nav, FrameMessage::sync_page(self.kind.nav_id()));
        self.bus
            .post(FrameRole::Nav, FrameMessage::Theme { value: self.theme });
    }

    /// Flip the displayed theme, persist it for this page type, then restyle
    /// the nav frame.
    pub fn toggle_theme(&mut self) -> Result<ThemeMode> {
        self.theme = self.theme_preference.toggle(self.theme)?;
        self.bus
            .post(FrameRole::Nav, FrameMessage::Theme { value: self.theme });
        Ok(self.theme)
    }

    pub fn handle(&mut self, message: &FrameMessage) -> Result<ContentReaction> {
        match message {
            FrameMessage::Logout => {
                self.store.logout()?;
                tracing::info!("Logged out from {} page", self.kind);
                Ok(ContentReaction::RedirectToLogin(PageAddress::parse(
                    &self.site.login_page,
                )?))
            }
            FrameMessage::Navigate { page } => match PageKind::from_nav_id(page) {
                Some(target) => Ok(ContentReaction::Navigate(PageAddress::parse(
                    target.route(&self.site),
                )?)),
                None => {
                    tracing::debug!("Ignoring navigate to unknown page '{}'", page);
                    Ok(ContentReaction::Ignored)
                }
            },
            FrameMessage::Theme { value } => {
                self.theme = *value;
                Ok(ContentReaction::ThemeApplied(*value))
            }
            FrameMessage::SyncPage { .. } => Ok(ContentReaction::Ignored),
        }
    }

    /// Apply queued messages until one leaves the page.
    ///
    /// Returns the leaving reaction, if any; messages queued after it are
    /// discarded along with the page.
    pub fn pump(&mut self) -> Result<Option<ContentReaction>> {
        while let Some(message) = self.inbox.try_recv() {
            let reaction = self.handle(&message)?;
            if reaction.leaves_page() {
                return Ok(Some(reaction));
            }
        }
        Ok(None)
    }
}
