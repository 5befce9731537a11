//! Core components, types, and utilities for the pr-bot.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - The fixed event catalog and its ranking orientation.
//! - Leaderboard ranking over raw PR submissions.
//! - Common types, errors, and result handling.

pub mod catalog;
pub mod config;
pub mod error;
pub mod leaderboard;
pub mod types;
