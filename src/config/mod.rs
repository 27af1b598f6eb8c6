//! Configuration module for bookkeeper
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence
//! - Store connection parameters

pub mod paths;
pub mod settings;
pub mod store;

pub use paths::BookkeeperPaths;
pub use settings::Settings;
pub use store::StoreConfig;
