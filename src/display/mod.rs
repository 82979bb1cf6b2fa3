//! Display formatting for terminal output
//!
//! Plain-text tables and detail views for students, fees, payments, terms,
//! and staff accounts.

pub mod fee;
pub mod payment;
pub mod student;
pub mod term;
pub mod user;

pub use fee::format_fee_list;
pub use payment::{
    format_payment_details, format_payment_history, format_payment_list, format_payment_row,
};
pub use student::{format_statement, format_student_details, format_student_list};
pub use term::{format_term_details, format_term_list};
pub use user::{format_role_permissions, format_user_list};
