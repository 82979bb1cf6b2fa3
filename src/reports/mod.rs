//! Reports module for FeeDesk
//!
//! Payment listings, outstanding balances per term, receipts, and the
//! dashboard summary.

pub mod dashboard;
pub mod outstanding;
pub mod payment_report;
pub mod receipt;

pub use dashboard::DashboardSummary;
pub use outstanding::OutstandingReport;
pub use payment_report::{CurrencyTotal, PaymentReport, PaymentReportFilter, PaymentReportRow};
pub use receipt::PaymentReceipt;
