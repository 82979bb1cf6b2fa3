//! Core data models for FeeDesk
//!
//! This module contains the data structures of the fee-management domain:
//! students, fee items, payments, terms, users, and the derived fee balance.

pub mod balance;
pub mod fee;
pub mod ids;
pub mod money;
pub mod payment;
pub mod student;
pub mod term;
pub mod user;

pub use balance::{BalanceStatus, FeeBalance};
pub use fee::{BillingFrequency, FeeItem};
pub use ids::{FeeItemId, ReceiptNo, StudentId, TermId, UserId};
pub use money::{Currency, ExchangeRate, Money};
pub use payment::{Payment, PaymentMethod, VerificationStatus};
pub use student::{FeesStatus, Gender, Guardian, Relationship, Student};
pub use term::{Term, TermPhase};
pub use user::{Permission, Role, User};
