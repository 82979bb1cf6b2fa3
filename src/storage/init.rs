//! Storage initialization
//!
//! Handles first-run setup: writes the school's starting fee structure,
//! terms, staff accounts, roster and payments when the data files are absent.

use chrono::NaiveDate;

use crate::config::paths::FeeDeskPaths;
use crate::error::FeeDeskError;
use crate::models::{
    BillingFrequency, Currency, FeeItem, FeesStatus, Gender, Guardian, Money, Payment,
    PaymentMethod, ReceiptNo, Relationship, Role, Student, StudentId, Term, TermId, User,
    VerificationStatus,
};

use super::file_io::write_json_atomic;

/// Initialize storage for a fresh installation
///
/// Each data file is seeded only if it does not exist yet, so running this
/// against an existing installation is a no-op.
pub fn initialize_storage(paths: &FeeDeskPaths) -> Result<(), FeeDeskError> {
    paths.ensure_directories()?;

    if !paths.fees_file().exists() {
        write_json_atomic(
            paths.fees_file(),
            &serde_json::json!({ "fees": default_fee_structure() }),
        )?;
    }
    if !paths.terms_file().exists() {
        write_json_atomic(
            paths.terms_file(),
            &serde_json::json!({ "terms": default_terms()? }),
        )?;
    }
    if !paths.users_file().exists() {
        write_json_atomic(
            paths.users_file(),
            &serde_json::json!({ "users": default_users()? }),
        )?;
    }
    if !paths.students_file().exists() {
        write_json_atomic(
            paths.students_file(),
            &serde_json::json!({ "students": default_students()? }),
        )?;
    }
    if !paths.payments_file().exists() {
        write_json_atomic(
            paths.payments_file(),
            &serde_json::json!({ "payments": default_payments()? }),
        )?;
    }

    Ok(())
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &FeeDeskPaths) -> bool {
    !paths.students_file().exists() || !paths.fees_file().exists()
}

fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate, FeeDeskError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        FeeDeskError::Validation(format!("Invalid date {}-{:02}-{:02}", year, month, day))
    })
}

fn default_fee_structure() -> Vec<FeeItem> {
    let rows = [
        ("Tuition Fee", 250, 875_000, BillingFrequency::PerTerm, true),
        ("Boarding Fee", 320, 1_120_000, BillingFrequency::PerTerm, false),
        ("Technology Fee", 35, 122_500, BillingFrequency::PerTerm, true),
        ("Sports Fee", 25, 87_500, BillingFrequency::PerTerm, true),
        ("School Uniform", 85, 297_500, BillingFrequency::OnceOff, false),
    ];

    rows.into_iter()
        .map(|(name, usd, zig, frequency, required)| {
            FeeItem::new(
                name,
                Money::from_units(usd),
                Money::from_units(zig),
                frequency,
                required,
            )
        })
        .collect()
}

fn default_terms() -> Result<Vec<Term>, FeeDeskError> {
    Ok(vec![
        Term::new(1, 2025, date(2025, 1, 15)?, date(2025, 4, 10)?),
        Term::new(3, 2024, date(2024, 9, 9)?, date(2024, 12, 5)?),
        Term::new(2, 2024, date(2024, 5, 14)?, date(2024, 8, 15)?),
        Term::new(1, 2024, date(2024, 1, 15)?, date(2024, 4, 12)?),
        Term::new(3, 2023, date(2023, 9, 11)?, date(2023, 12, 7)?),
    ])
}

fn default_users() -> Result<Vec<User>, FeeDeskError> {
    let rows = [
        ("John Moyo", "jmoyo", Role::SuperAdmin, true, date(2025, 5, 7)?),
        ("Tendai Ndlovu", "tndlovu", Role::SchoolHead, true, date(2025, 5, 7)?),
        ("Grace Sithole", "gsithole", Role::Clerk, true, date(2025, 5, 6)?),
        ("Blessing Moyo", "bmoyo", Role::Clerk, true, date(2025, 5, 5)?),
        ("Samuel Chirinda", "schirinda", Role::Clerk, false, date(2025, 3, 15)?),
    ];

    Ok(rows
        .into_iter()
        .map(|(name, username, role, active, last_login)| {
            let mut user = User::new(name, username, format!("{}@nhaka.edu.zw", username), role);
            user.active = active;
            user.last_login = Some(last_login);
            user
        })
        .collect())
}

fn default_students() -> Result<Vec<Student>, FeeDeskError> {
    let dob = date(2010, 3, 10)?;
    let rows = [
        ("2901", "Richi Rozario", Gender::Female, "1", "A", "1A-110, North Sydney", FeesStatus::Paid, 0),
        ("2902", "Kazi Fahim", Gender::Male, "2", "B", "59 street, North Sydney", FeesStatus::Partial, 150),
        ("2903", "Richi Rozario", Gender::Female, "1", "A", "1A-110, North Sydney", FeesStatus::Pending, 320),
        ("2904", "Kazi Fahim", Gender::Male, "2", "B", "59 street, North Sydney", FeesStatus::Paid, 0),
        ("2905", "Richi Rozario", Gender::Female, "1", "C", "90 Street, Heaxy, Reola", FeesStatus::Paid, 0),
    ];

    Ok(rows
        .into_iter()
        .map(|(id, name, gender, class, section, address, status, arrears)| {
            let mut student = Student::new(id, name, gender, class, section, dob);
            let parent = if gender == Gender::Male {
                "Mike Hussy"
            } else {
                "David Smith"
            };
            student.guardian = Guardian::new(parent, Relationship::Father);
            student.address = address.to_string();
            student.mobile = "+8812 00 5098".to_string();
            student.email = "ndisons@gmail.com".to_string();
            student.fees_status = status;
            student.arrears = Money::from_units(arrears);
            if status != FeesStatus::Paid {
                student.optional_fees = vec!["Boarding Fee".to_string()];
            }
            student
        })
        .collect())
}

fn default_payments() -> Result<Vec<Payment>, FeeDeskError> {
    use PaymentMethod::*;
    use VerificationStatus::*;

    let rows = [
        (76, "2902", Money::from_units(8_750), Currency::Zig, date(2025, 1, 15)?, MobileMoney, Verified, "J. Moyo"),
        (95, "2902", Money::from_units(250), Currency::Usd, date(2025, 4, 12)?, Cash, Verified, "T. Ndlovu"),
        (114, "2901", Money::from_units(310), Currency::Usd, date(2025, 5, 1)?, BankTransfer, Verified, "J. Moyo"),
        (115, "2904", Money::from_units(310), Currency::Usd, date(2025, 5, 2)?, Cash, Verified, "T. Ndlovu"),
        (116, "2903", Money::from_units(1_200_000), Currency::Zig, date(2025, 5, 4)?, MobileMoney, Pending, "T. Ndlovu"),
        (117, "2905", Money::from_units(275), Currency::Usd, date(2025, 5, 4)?, Cash, Verified, "T. Ndlovu"),
        (118, "2905", Money::from_units(122_500), Currency::Zig, date(2025, 5, 5)?, MobileMoney, Verified, "J. Moyo"),
        (122, "2902", Money::from_units(150), Currency::Usd, date(2025, 5, 5)?, BankTransfer, Verified, "J. Moyo"),
    ];

    Ok(rows
        .into_iter()
        .map(
            |(sequence, student, amount, currency, paid_on, method, status, recorded_by)| Payment {
                receipt_no: ReceiptNo::from_parts(2025, sequence),
                student_id: StudentId::new(student),
                term_id: TermId::from_parts(1, 2025),
                amount,
                currency,
                date: paid_on,
                method,
                status,
                recorded_by: recorded_by.to_string(),
                notes: String::new(),
            },
        )
        .collect())
}
