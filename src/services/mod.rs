//! Service layer for FeeDesk
//!
//! Business logic on top of the storage layer: validation, receipt numbering,
//! audit logging, and the roster filter and balance engine.

pub mod balance;
pub mod fees;
pub mod payments;
pub mod roster;
pub mod terms;
pub mod users;

pub use balance::{BalanceService, BalanceSummary, StudentStatement};
pub use fees::{FeeService, UpdateFeeInput};
pub use payments::{PaymentFilter, PaymentService, RecordPaymentInput};
pub use roster::{
    filter_students, ArrearsFilter, CreateStudentInput, RosterService, StudentFilter,
    UpdateStudentInput,
};
pub use terms::{TermProgress, TermService};
pub use users::UserService;
