//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod export;
pub mod fee;
pub mod payment;
pub mod report;
pub mod student;
pub mod term;
pub mod user;

pub use export::{handle_export_command, ExportCommands};
pub use fee::{handle_fee_command, FeeCommands};
pub use payment::{handle_payment_command, PaymentCommands};
pub use report::{handle_report_command, ReportCommands};
pub use student::{handle_student_command, StudentCommands};
pub use term::{handle_term_command, TermCommands};
pub use user::{handle_user_command, UserCommands};

use chrono::NaiveDate;

use crate::error::{FeeDeskError, FeeDeskResult};
use crate::models::{Currency, Money, Term};
use crate::services::TermService;
use crate::storage::Storage;

/// Parse a YYYY-MM-DD argument
pub(crate) fn parse_date(value: &str) -> FeeDeskResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        FeeDeskError::Validation(format!(
            "Invalid date: '{}'. Use the format YYYY-MM-DD",
            value
        ))
    })
}

/// Parse an amount argument such as "250", "250.50" or "1,120,000"
pub(crate) fn parse_amount(value: &str) -> FeeDeskResult<Money> {
    Money::parse(value).map_err(|e| {
        FeeDeskError::Validation(format!("Invalid amount: '{}'. Error: {}", value, e))
    })
}

pub(crate) fn parse_currency(value: &str) -> FeeDeskResult<Currency> {
    Currency::parse(value).ok_or_else(|| {
        FeeDeskError::Validation(format!(
            "Invalid currency: '{}'. Valid currencies: usd, zig",
            value
        ))
    })
}

/// The named term, or the current one when no term is given
pub(crate) fn resolve_term(
    storage: &Storage,
    term: Option<&str>,
    today: NaiveDate,
) -> FeeDeskResult<Term> {
    let service = TermService::new(storage);
    match term {
        Some(id) => service.find(id),
        None => service.current(today)?.ok_or_else(|| {
            FeeDeskError::Validation(
                "No term has started yet. Pass --term or add one with 'feedesk term add'".into(),
            )
        }),
    }
}
