//! Fire-and-forget messaging between frames, addressed by role.
//!
//! Frames register an inbox under a logical role instead of being reached by
//! their position in the document. Posting never fails: a missing or closed
//! target is logged and the message is dropped. Lost messages are harmless
//! because every message is idempotent and carries its full meaning.

mod message;

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;

pub use message::FrameMessage;

/// Logical role of a frame in the site layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameRole {
    /// Embedded navigation bar
    Nav,
    /// Page hosting the navigation frame (notes or photos)
    Content,
}

impl fmt::Display for FrameRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nav => f.write_str("nav"),
            Self::Content => f.write_str("content"),
        }
    }
}

type Routes = HashMap<FrameRole, mpsc::UnboundedSender<FrameMessage>>;

/// Registry of frame inboxes keyed by role. Clones share the registry.
#[derive(Debug, Clone, Default)]
pub struct FrameBus {
    routes: Arc<Mutex<Routes>>,
}

impl FrameBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a frame under `role`, replacing any previous registration.
    pub fn attach(&self, role: FrameRole) -> FrameInbox {
        let (sender, receiver) = mpsc::unbounded_channel();
        let replaced = self
            .routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(role, sender);
        if replaced.is_some() {
            tracing::debug!("Replaced {} frame registration", role);
        }
        FrameInbox { role, receiver }
    }

    pub fn detach(&self, role: FrameRole) {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&role);
    }

    /// Send `message` to the frame registered as `role`.
    ///
    /// Returns whether the message was handed to the transport. Failures are
    /// logged and otherwise ignored.
    pub fn post(&self, role: FrameRole, message: FrameMessage) -> bool {
        let sender = self
            .routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&role)
            .cloned();

        let Some(sender) = sender else {
            tracing::warn!("No {} frame to receive '{}' message", role, message.kind());
            return false;
        };

        match sender.send(message) {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(
                    "Failed to deliver '{}' message to {} frame: frame closed",
                    error.0.kind(),
                    role
                );
                false
            }
        }
    }

    /// Post a raw JSON payload; undecodable payloads are dropped.
    pub fn post_raw(&self, role: FrameRole, payload: &serde_json::Value) -> bool {
        FrameMessage::decode(payload).is_some_and(|message| self.post(role, message))
    }
}

/// Receiving end of a frame registration.
#[derive(Debug)]
pub struct FrameInbox {
    role: FrameRole,
    receiver: mpsc::UnboundedReceiver<FrameMessage>,
}

impl FrameInbox {
    pub const fn role(&self) -> FrameRole {
        self.role
    }

    /// Wait for the next message; `None` once the bus forgot this frame.
    pub async fn recv(&mut self) -> Option<FrameMessage> {
        self.receiver.recv().await
    }

    /// Next queued message without waiting.
    pub fn try_recv(&mut self) -> Option<FrameMessage> {
        self.receiver.try_recv().ok()
    }

    /// Every queued message, in arrival order.
    pub fn drain(&mut self) -> Vec<FrameMessage> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::theme::ThemeMode;

    #[test]
    fn post_without_target_is_dropped() {
        let bus = FrameBus::new();
        assert!(!bus.post(FrameRole::Nav, FrameMessage::sync_page("notes")));
    }

    #[test]
    fn post_to_closed_frame_is_dropped() {
        let bus = FrameBus::new();
        drop(bus.attach(FrameRole::Content));
        assert!(!bus.post(FrameRole::Content, FrameMessage::Logout));
    }

    #[test]
    fn messages_arrive_in_send_order() {
        let bus = FrameBus::new();
        let mut nav = bus.attach(FrameRole::Nav);

        assert!(bus.post(FrameRole::Nav, FrameMessage::sync_page("notes")));
        assert!(bus.post(
            FrameRole::Nav,
            FrameMessage::Theme {
                value: ThemeMode::Dark
            }
        ));

        assert_eq!(
            nav.drain(),
            vec![
                FrameMessage::sync_page("notes"),
                FrameMessage::Theme {
                    value: ThemeMode::Dark
                },
            ]
        );
        assert_eq!(nav.try_recv(), None);
    }

    #[test]
    fn reattach_replaces_previous_inbox() {
        let bus = FrameBus::new();
        let mut old = bus.attach(FrameRole::Content);
        let mut new = bus.attach(FrameRole::Content);

        bus.post(FrameRole::Content, FrameMessage::Logout);
        assert_eq!(old.try_recv(), None);
        assert_eq!(new.try_recv(), Some(FrameMessage::Logout));
    }

    #[test]
    fn raw_payloads_are_decoded_or_ignored() {
        let bus = FrameBus::new();
        let mut content = bus.attach(FrameRole::Content);

        assert!(!bus.post_raw(FrameRole::Content, &json!({"type": "bogus"})));
        assert!(bus.post_raw(
            FrameRole::Content,
            &json!({"type": "navigate", "page": "memories"})
        ));
        assert_eq!(content.drain(), vec![FrameMessage::navigate("memories")]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn recv_ends_after_detach() {
        let bus = FrameBus::new();
        let mut nav = bus.attach(FrameRole::Nav);
        bus.post(FrameRole::Nav, FrameMessage::Logout);
        bus.detach(FrameRole::Nav);

        assert_eq!(nav.recv().await, Some(FrameMessage::Logout));
        assert_eq!(nav.recv().await, None);
        assert_eq!(nav.role(), FrameRole::Nav);
    }
}
