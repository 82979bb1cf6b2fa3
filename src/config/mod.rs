//! Configuration module for FeeDesk
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - Console settings persistence (school name, exchange rate, display)

pub mod paths;
pub mod settings;

pub use paths::FeeDeskPaths;
pub use settings::Settings;
