//! Runtime services and shared state for the pr-bot.

use tracing::{info, instrument};

use crate::{
    base::{
        config::Config,
        types::{Res, Void},
    },
    service::{chat::ChatClient, db::DbClient},
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the database client, chat client, and configuration.
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`. The store is released when the last
/// clone is dropped.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The PR store.
    pub db: DbClient,
    /// The chat client instance.
    pub chat: ChatClient,
}

impl Runtime {
    /// Create a new runtime instance.
    ///
    /// Opens and initializes the store before connecting to chat.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        // Initialize the database.
        let db = DbClient::surreal(&config).await?;

        // Initialize the chat client.
        let chat = ChatClient::slack(&config, db.clone()).await?;

        Ok(Self { config, db, chat })
    }

    /// Serve chat commands until shutdown.
    pub async fn start(self) -> Void {
        self.chat.start().await?;

        info!("Chat listener stopped; closing the store.");

        Ok(())
    }
}
