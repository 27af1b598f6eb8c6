//! Bookkeeper - personal expense tracking
//!
//! This library provides the core of the bookkeeper application: a category
//! tree, expenses booked against categories, and day, week and month budgets
//! checked against what was actually spent.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path management, user settings and store configuration
//! - `error`: Custom error types
//! - `models`: Core data models (categories, expenses, budgets, money, periods)
//! - `storage`: Record stores (in memory and SQLite)
//! - `tree`: Indented text to category tree parsing
//! - `services`: Business logic layer
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the binary
//!
//! # Example
//!
//! ```rust,ignore
//! use bookkeeper::storage::Storage;
//!
//! let storage = Storage::in_memory();
//! let categories = storage.category_service();
//! categories.import_tree("food\n    meat\n    sweets\nbooks")?;
//! ```

use std::sync::Once;

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
pub mod tree;

pub use error::{BookkeeperError, BookkeeperResult};

static TRACING_INIT: Once = Once::new();

/// Install the stderr log subscriber once
///
/// Uses `RUST_LOG` when set, otherwise `bookkeeper=warn`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("bookkeeper=warn"));

        // another subscriber may already be installed by an embedding program
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
