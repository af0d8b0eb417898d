//! Navigation frame: highlighted item, click handling, inbound sync.
//!
//! The nav frame is a separate document from the content page, so the active
//! item is derived purely from messages and never read from shared storage.

use crate::error::Result;
use crate::messaging::{FrameBus, FrameInbox, FrameMessage, FrameRole};
use crate::session::SessionStore;
use crate::storage::KeyValueStore;
use crate::theme::ThemeMode;

pub const NOTES_ITEM: &str = "notes";
pub const MEMORIES_ITEM: &str = "memories";
pub const RESERVED_ITEM: &str = "reserved";
pub const THEME_ITEM: &str = "theme";
pub const LOGOUT_ITEM: &str = "logout";

/// Items of the stock navigation bar, in display order.
pub const STANDARD_ITEMS: [&str; 5] = [
    NOTES_ITEM,
    MEMORIES_ITEM,
    RESERVED_ITEM,
    THEME_ITEM,
    LOGOUT_ITEM,
];

const RESERVED_NOTICE: &str = "This feature is still being planned, stay tuned";
const THEME_NOTICE: &str = "Theme settings are coming soon: day, night and meteor shower";
const UNKNOWN_NOTICE: &str = "This feature is not configured yet, please contact the developer";

/// Which nav item is highlighted. At most one item is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavHighlight {
    items: Vec<String>,
    active: Option<usize>,
}

impl Default for NavHighlight {
    fn default() -> Self {
        Self::new(STANDARD_ITEMS)
    }
}

impl NavHighlight {
    pub fn new<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            active: None,
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Clear every highlight, then mark `id` if it names an item.
    ///
    /// Returns whether an item is now active.
    pub fn activate(&mut self, id: &str) -> bool {
        self.active = self.items.iter().position(|item| item == id);
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&str> {
        self.active.map(|index| self.items[index].as_str())
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active() == Some(id)
    }
}

/// What the nav frame does in response to a click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    /// A message was posted to the content page.
    Posted(FrameMessage),
    /// Ask the user to confirm before logging out.
    ConfirmLogout,
    /// Show an informational notice; nothing else happens.
    Notice(&'static str),
}

pub struct NavFrame<P: KeyValueStore, S: KeyValueStore> {
    bus: FrameBus,
    inbox: FrameInbox,
    store: SessionStore<P, S>,
    highlight: NavHighlight,
    theme: ThemeMode,
}

impl<P: KeyValueStore, S: KeyValueStore> NavFrame<P, S> {
    /// Register a nav frame with the standard items on `bus`.
    pub fn attach(bus: &FrameBus, store: SessionStore<P, S>) -> Self {
        Self::with_items(bus, store, NavHighlight::default())
    }

    pub fn with_items(bus: &FrameBus, store: SessionStore<P, S>, highlight: NavHighlight) -> Self {
        Self {
            bus: bus.clone(),
            inbox: bus.attach(FrameRole::Nav),
            store,
            highlight,
            theme: ThemeMode::default(),
        }
    }

    pub const fn highlight(&self) -> &NavHighlight {
        &self.highlight
    }

    pub const fn theme(&self) -> ThemeMode {
        self.theme
    }

    /// Handle a click on item `id`. Every click moves the highlight to the
    /// clicked item first, including notice and logout items.
    pub fn click(&mut self, id: &str) -> NavAction {
        self.highlight.activate(id);
        match id {
            NOTES_ITEM | MEMORIES_ITEM => {
                let message = FrameMessage::navigate(id);
                self.bus.post(FrameRole::Content, message.clone());
                NavAction::Posted(message)
            }
            LOGOUT_ITEM => NavAction::ConfirmLogout,
            RESERVED_ITEM => NavAction::Notice(RESERVED_NOTICE),
            THEME_ITEM => NavAction::Notice(THEME_NOTICE),
            _ => NavAction::Notice(UNKNOWN_NOTICE),
        }
    }

    /// Answer to `NavAction::ConfirmLogout`. Returns whether a logout was sent.
    pub fn confirm_logout(&mut self, confirmed: bool) -> Result<bool> {
        if !confirmed {
            return Ok(false);
        }
        self.bus.post(FrameRole::Content, FrameMessage::Logout);
        self.store.forget_login()?;
        Ok(true)
    }

    /// Apply one inbound message.
    pub fn handle(&mut self, message: &FrameMessage) {
        match message {
            FrameMessage::SyncPage { page } => {
                if !self.highlight.activate(page) {
                    tracing::debug!("syncPage for unknown nav item '{}'", page);
                }
            }
            FrameMessage::Theme { value } => self.theme = *value,
            FrameMessage::Navigate { .. } | FrameMessage::Logout => {
                tracing::debug!("Nav frame ignores '{}' message", message.kind());
            }
        }
    }

    /// Apply every queued message; returns how many were processed.
    pub fn pump(&mut self) -> usize {
        let messages = self.inbox.drain();
        for message in &messages {
            self.handle(message);
        }
        messages.len()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::session::AccessToken;
    use crate::storage::{MemoryStore, NOTES_THEME_KEY};

    type Store = SessionStore<MemoryStore, MemoryStore>;

    fn store() -> Store {
        SessionStore::new(MemoryStore::new(), MemoryStore::new())
    }

    #[test]
    fn sync_page_activates_exactly_one_item() {
        let bus = FrameBus::new();
        let mut nav = NavFrame::attach(&bus, store());
        assert_eq!(nav.highlight().active(), None);

        bus.post(FrameRole::Nav, FrameMessage::sync_page("memories"));
        assert_eq!(nav.pump(), 1);

        assert!(nav.highlight().is_active("memories"));
        let active_count = nav
            .highlight()
            .items()
            .iter()
            .filter(|item| nav.highlight().is_active(item))
            .count();
        assert_eq!(active_count, 1);
    }

    #[test]
    fn sync_page_for_unknown_item_leaves_nothing_active() {
        let mut highlight = NavHighlight::default();
        highlight.activate(NOTES_ITEM);

        assert!(!highlight.activate("guestbook"));
        assert_eq!(highlight.active(), None);
    }

    #[test]
    fn repeated_sync_is_idempotent() {
        let mut highlight = NavHighlight::default();
        highlight.activate(MEMORIES_ITEM);
        let once = highlight.clone();
        highlight.activate(MEMORIES_ITEM);
        assert_eq!(highlight, once);
    }

    #[test]
    fn clicking_route_item_highlights_and_posts_navigate() {
        let bus = FrameBus::new();
        let mut content = bus.attach(FrameRole::Content);
        let mut nav = NavFrame::attach(&bus, store());

        let action = nav.click(MEMORIES_ITEM);
        assert_eq!(action, NavAction::Posted(FrameMessage::navigate("memories")));
        assert!(nav.highlight().is_active(MEMORIES_ITEM));
        assert_eq!(content.drain(), vec![FrameMessage::navigate("memories")]);
    }

    #[test]
    fn informational_items_only_show_notices() {
        let bus = FrameBus::new();
        let mut content = bus.attach(FrameRole::Content);
        let mut nav = NavFrame::attach(&bus, store());

        assert_eq!(nav.click(RESERVED_ITEM), NavAction::Notice(RESERVED_NOTICE));
        assert_eq!(nav.click(THEME_ITEM), NavAction::Notice(THEME_NOTICE));
        assert_eq!(nav.click("guestbook"), NavAction::Notice(UNKNOWN_NOTICE));
        assert!(content.drain().is_empty());
    }

    #[test]
    fn every_click_moves_the_highlight() {
        let bus = FrameBus::new();
        let mut nav = NavFrame::attach(&bus, store());

        nav.click(NOTES_ITEM);
        nav.click(RESERVED_ITEM);
        assert!(nav.highlight().is_active(RESERVED_ITEM));
        assert!(!nav.highlight().is_active(NOTES_ITEM));

        nav.click(THEME_ITEM);
        assert!(nav.highlight().is_active(THEME_ITEM));

        assert_eq!(nav.click(LOGOUT_ITEM), NavAction::ConfirmLogout);
        assert!(nav.highlight().is_active(LOGOUT_ITEM));

        nav.click("guestbook");
        assert_eq!(nav.highlight().active(), None);
    }

    #[test]
    fn logout_requires_confirmation() {
        let bus = FrameBus::new();
        let mut content = bus.attach(FrameRole::Content);
        let store = store();
        store.login(&AccessToken::generate()).unwrap();
        store.persistent().set(NOTES_THEME_KEY, "dark").unwrap();
        let mut nav = NavFrame::attach(&bus, store.clone());

        assert_eq!(nav.click(LOGOUT_ITEM), NavAction::ConfirmLogout);
        assert!(!nav.confirm_logout(false).unwrap());
        assert!(store.state().is_login);
        assert!(content.drain().is_empty());

        assert!(nav.confirm_logout(true).unwrap());
        assert!(!store.state().is_login);
        assert_eq!(store.state().access_token, None);
        assert_eq!(store.persistent().get(NOTES_THEME_KEY).as_deref(), Some("dark"));
        assert_eq!(content.drain(), vec![FrameMessage::Logout]);
    }

    #[test]
    fn logout_without_content_frame_still_clears_locally() {
        let bus = FrameBus::new();
        let store = store();
        store.login(&AccessToken::generate()).unwrap();
        let mut nav = NavFrame::attach(&bus, store.clone());

        assert!(nav.confirm_logout(true).unwrap());
        assert!(!store.state().is_login);
    }

    #[test]
    fn theme_messages_restyle_without_persisting() {
        let bus = FrameBus::new();
        let store = store();
        let mut nav = NavFrame::attach(&bus, store.clone());

        nav.handle(&FrameMessage::Theme {
            value: ThemeMode::Dark,
        });
        assert_eq!(nav.theme(), ThemeMode::Dark);
        assert!(store.persistent().is_empty());
    }
}
