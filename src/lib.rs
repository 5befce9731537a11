//! Library root for `pr-bot`.
//!
//! PR-bot is a Slack bot for a fitness community, designed to:
//! - Register members who hold the required role
//! - Record personal records (PRs) for a fixed catalog of events
//! - Show per-event leaderboards, personal progress, and an overall leaderboard
//!
//! The bot integrates with Slack for chat and SurrealDB for storage. Timed
//! events rank lowest-first; everything else ranks highest-first. The
//! architecture is built around traits that allow for different
//! implementations of each service.

pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use rustls::crypto;
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the pr-bot runtime:
/// - Initializes the crypto provider
/// - Creates the runtime context with database and chat clients
/// - Serves slash commands until shutdown
pub async fn start(config: Config) -> Void {
    info!("Starting pr-bot ...");

    // Start the crypto provider.
    crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install the default crypto provider."))?;

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
