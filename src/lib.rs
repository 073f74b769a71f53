//! # Eslatma Bot
//!
//! A Telegram bot that turns short messages containing a clock time
//! ("12:00 da darsim bor") into reminders delivered back at that time.
//!
//! ## Features
//! - Time and task extraction, with an optional language model for
//!   command-style messages
//! - "Tomorrow?" confirmation when the time already passed today
//! - Persistent storage with SQLite, delivery that survives restarts
//! - Pending list with per-reminder cancel links

/// Telegram command handlers and update routing
pub mod bot;
/// Configuration management and environment variables
pub mod config;
/// Database models, connections, and migrations
pub mod database;
/// Error taxonomy of the reminder core
pub mod error;
/// Extraction, confirmation, delivery and health services
pub mod services;
/// Utility functions for time, formatting, feedback and logging
pub mod utils;
