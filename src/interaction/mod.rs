//! Command handling and user interactions for pr-bot.
//!
//! This module provides functionality for handling chat commands:
//! - Parsing `/register`, `/pr`, `/progress`, `/leaderboard`, `/best`, and `/events`
//! - Running them against the store, including the registration role gate
//! - Formatting leaderboards and progress into replies

pub mod command;
pub mod dispatch;
pub mod format;
