pub mod slack;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::{Res, Void};

// Traits.

/// Generic "chat" trait that clients must implement.
///
/// This trait defines the core functionality for interacting with chat platforms
/// like Slack. Implementing this trait allows different chat services to be used
/// with the pr-bot.
#[async_trait]
pub trait GenericChatClient: Send + Sync + 'static {
    /// Start the chat client listener.
    ///
    /// This sets up command listeners for the chat platform and processes
    /// incoming commands until shutdown.
    async fn start(&self) -> Void;

    /// Post a message to a channel, visible to everyone in it.
    ///
    /// Fallback for announcements that cannot be sent as a command response.
    async fn post_message(&self, channel_id: &str, text: &str) -> Void;

    /// Get the role labels a member holds.
    ///
    /// Registration is gated on one of these matching the configured role.
    async fn member_roles(&self, user_id: &str) -> Res<Vec<String>>;
}

// Structs.

/// Chat client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<dyn GenericChatClient>,
}

impl Deref for ChatClient {
    type Target = dyn GenericChatClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ChatClient {
    pub fn new(inner: Arc<dyn GenericChatClient>) -> Self {
        Self { inner }
    }
}
