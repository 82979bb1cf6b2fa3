//! FeeDesk - School fee management console
//!
//! This library provides the core of the FeeDesk console: the student roster
//! and its filter, the fee structure, payments in US dollars and ZIG, and the
//! balance engine that turns those into per-student fee statements.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (students, fees, payments, terms, users)
//! - `storage`: JSON file storage layer
//! - `audit`: Audit logging system
//! - `services`: Roster filtering, balances and record operations
//! - `reports`: Payment, outstanding-balance and dashboard reports
//! - `display`: Terminal formatting
//! - `export`: CSV, JSON and YAML export
//! - `cli`: Command handlers for the `feedesk` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use feedesk_cli::services::{filter_students, StudentFilter};
//!
//! let filter = StudentFilter::new().search("kazi").class("2");
//! let matching = filter_students(&roster, &filter);
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::FeeDeskError;
