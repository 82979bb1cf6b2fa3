//! Payment service
//!
//! Recording fee payments, receipt numbering, verification, and payment
//! queries for histories and reports.

use chrono::{Datelike, NaiveDate};

use crate::audit::EntityType;
use crate::error::{FeeDeskError, FeeDeskResult};
use crate::models::{
    Currency, Money, Payment, PaymentMethod, ReceiptNo, StudentId, TermId, VerificationStatus,
};
use crate::storage::Storage;

/// Filter options for listing payments
#[derive(Debug, Clone, Default)]
pub struct PaymentFilter {
    pub student_id: Option<StudentId>,
    pub term_id: Option<TermId>,
    pub currency: Option<Currency>,
    pub status: Option<VerificationStatus>,
    /// Inclusive
    pub start_date: Option<NaiveDate>,
    /// Inclusive
    pub end_date: Option<NaiveDate>,
    pub limit: Option<usize>,
}

impl PaymentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn student(mut self, student_id: StudentId) -> Self {
        self.student_id = Some(student_id);
        self
    }

    pub fn term(mut self, term_id: TermId) -> Self {
        self.term_id = Some(term_id);
        self
    }

    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = Some(currency);
        self
    }

    pub fn status(mut self, status: VerificationStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Only payments on or after `start`
    pub fn since(mut self, start: NaiveDate) -> Self {
        self.start_date = Some(start);
        self
    }

    /// Only payments on or before `end`
    pub fn until(mut self, end: NaiveDate) -> Self {
        self.end_date = Some(end);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, payment: &Payment) -> bool {
        self.student_id.as_ref().map_or(true, |id| &payment.student_id == id)
            && self.term_id.as_ref().map_or(true, |id| &payment.term_id == id)
            && self.currency.map_or(true, |c| payment.currency == c)
            && self.status.map_or(true, |s| payment.status == s)
            && self.start_date.map_or(true, |d| payment.date >= d)
            && self.end_date.map_or(true, |d| payment.date <= d)
    }
}

/// Input for recording a payment
#[derive(Debug, Clone)]
pub struct RecordPaymentInput {
    pub student_id: StudentId,
    pub term_id: TermId,
    pub amount: Money,
    pub currency: Currency,
    pub date: NaiveDate,
    pub method: PaymentMethod,
    pub status: VerificationStatus,
    pub recorded_by: String,
    pub notes: String,
}

/// Newest first; receipts break ties within a day
pub fn sort_newest_first(payments: &mut [Payment]) {
    payments.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.receipt_no.parts().cmp(&a.receipt_no.parts()))
            .then_with(|| b.receipt_no.cmp(&a.receipt_no))
    });
}

/// Service for fee payments
pub struct PaymentService<'a> {
    storage: &'a Storage,
}

impl<'a> PaymentService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a payment and issue its receipt number
    pub fn record(&self, input: RecordPaymentInput) -> FeeDeskResult<Payment> {
        let student = self
            .storage
            .students
            .get(&input.student_id)?
            .ok_or_else(|| FeeDeskError::student_not_found(input.student_id.as_str()))?;

        if !self.storage.terms.exists(&input.term_id)? {
            return Err(FeeDeskError::term_not_found(input.term_id.as_str()));
        }

        let year = input.date.year();
        let sequence = self.storage.payments.next_sequence(year)?;

        let payment = Payment {
            receipt_no: ReceiptNo::from_parts(year, sequence),
            student_id: input.student_id,
            term_id: input.term_id,
            amount: input.amount,
            currency: input.currency,
            date: input.date,
            method: input.method,
            status: input.status,
            recorded_by: input.recorded_by.trim().to_string(),
            notes: input.notes,
        };

        payment.validate().map_err(FeeDeskError::Validation)?;

        self.storage.payments.upsert(payment.clone())?;
        self.storage.payments.save()?;

        self.storage.log_create(
            EntityType::Payment,
            payment.receipt_no.to_string(),
            Some(student.name),
            &payment,
        )?;

        Ok(payment)
    }

    /// Get a payment by receipt number (any case), failing if there is none
    pub fn find(&self, receipt_no: &str) -> FeeDeskResult<Payment> {
        self.storage
            .payments
            .get(&ReceiptNo::new(receipt_no.to_uppercase()))?
            .ok_or_else(|| FeeDeskError::payment_not_found(receipt_no))
    }

    /// Payments matching a filter, newest first
    pub fn list(&self, filter: &PaymentFilter) -> FeeDeskResult<Vec<Payment>> {
        let mut payments = self.storage.payments.get_all()?;
        payments.retain(|p| filter.matches(p));
        sort_newest_first(&mut payments);

        if let Some(limit) = filter.limit {
            payments.truncate(limit);
        }

        Ok(payments)
    }

    /// A student's payment history, newest first
    pub fn history(&self, student_id: &StudentId) -> FeeDeskResult<Vec<Payment>> {
        if !self.storage.students.exists(student_id)? {
            return Err(FeeDeskError::student_not_found(student_id.as_str()));
        }

        let mut payments = self.storage.payments.get_by_student(student_id)?;
        sort_newest_first(&mut payments);
        Ok(payments)
    }

    /// The most recent payments across the school
    pub fn recent(&self, count: usize) -> FeeDeskResult<Vec<Payment>> {
        self.list(&PaymentFilter::new().limit(count))
    }

    /// Mark a pending payment as verified
    pub fn verify(&self, receipt_no: &str) -> FeeDeskResult<Payment> {
        let before = self.find(receipt_no)?;
        if before.is_verified() {
            return Err(FeeDeskError::Validation(format!(
                "Payment {} is already verified",
                before.receipt_no
            )));
        }

        let mut payment = before.clone();
        payment.status = VerificationStatus::Verified;

        self.storage.payments.upsert(payment.clone())?;
        self.storage.payments.save()?;

        self.storage.log_update(
            EntityType::Payment,
            payment.receipt_no.to_string(),
            None,
            &before,
            &payment,
        )?;

        Ok(payment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FeeDeskPaths;
    use crate::storage::initialize_storage;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FeeDeskPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn input(student: &str, amount: Money, on: NaiveDate) -> RecordPaymentInput {
        RecordPaymentInput {
            student_id: StudentId::new(student),
            term_id: TermId::from_parts(1, 2025),
            amount,
            currency: Currency::Usd,
            date: on,
            method: PaymentMethod::Cash,
            status: VerificationStatus::Pending,
            recorded_by: "G. Sithole".into(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_record_issues_next_receipt() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PaymentService::new(&storage);

        let payment = service
            .record(input("2903", Money::from_units(100), date(2025, 5, 6)))
            .unwrap();
        assert_eq!(payment.receipt_no.as_str(), "RC-2025-0123");

        let next_year = service
            .record(input("2903", Money::from_units(100), date(2026, 1, 20)))
            .unwrap();
        assert_eq!(next_year.receipt_no.as_str(), "RC-2026-0001");

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].entity_name.as_deref(), Some("Richi Rozario"));
    }

    #[test]
    fn test_record_rejects_bad_input() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PaymentService::new(&storage);

        let zero = service.record(input("2903", Money::zero(), date(2025, 5, 6)));
        assert!(zero.unwrap_err().is_validation());

        let unknown = service.record(input("0000", Money::from_units(5), date(2025, 5, 6)));
        assert!(unknown.unwrap_err().is_not_found());

        let mut bad_term = input("2903", Money::from_units(5), date(2025, 5, 6));
        bad_term.term_id = TermId::new("term3-2030");
        assert!(service.record(bad_term).unwrap_err().is_not_found());

        let mut nobody = input("2903", Money::from_units(5), date(2025, 5, 6));
        nobody.recorded_by = " ".into();
        assert!(service.record(nobody).unwrap_err().is_validation());

        assert_eq!(storage.payments.count().unwrap(), 8);
    }

    #[test]
    fn test_history_newest_first() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PaymentService::new(&storage);

        let history = service.history(&StudentId::new("2902")).unwrap();
        let receipts: Vec<&str> = history.iter().map(|p| p.receipt_no.as_str()).collect();
        assert_eq!(receipts, vec!["RC-2025-0122", "RC-2025-0095", "RC-2025-0076"]);

        assert!(service
            .history(&StudentId::new("0000"))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_verify() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PaymentService::new(&storage);

        let verified = service.verify("rc-2025-0116").unwrap();
        assert!(verified.is_verified());
        assert!(service.find("RC-2025-0116").unwrap().is_verified());

        let again = service.verify("RC-2025-0116");
        assert!(again.unwrap_err().is_validation());

        let entry = &storage.audit().read_all().unwrap()[0];
        assert_eq!(
            entry.diff_summary.as_deref(),
            Some("status: \"pending\" -> \"verified\"")
        );
    }

    #[test]
    fn test_list_with_filter() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PaymentService::new(&storage);

        let zig = service
            .list(&PaymentFilter::new().currency(Currency::Zig))
            .unwrap();
        assert_eq!(zig.len(), 3);

        let may_verified = service
            .list(
                &PaymentFilter::new()
                    .status(VerificationStatus::Verified)
                    .since(date(2025, 5, 4))
                    .until(date(2025, 5, 5)),
            )
            .unwrap();
        let receipts: Vec<&str> = may_verified.iter().map(|p| p.receipt_no.as_str()).collect();
        assert_eq!(receipts, vec!["RC-2025-0122", "RC-2025-0118", "RC-2025-0117"]);

        let recent = service.recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].receipt_no.as_str(), "RC-2025-0122");
    }

    #[test]
    fn test_same_day_receipts_order_by_sequence() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PaymentService::new(&storage);
        let base = service.find("RC-2025-0122").unwrap();

        let mut payments: Vec<Payment> = [9_999, 10_000, 998]
            .into_iter()
            .map(|sequence| {
                let mut p = base.clone();
                p.receipt_no = ReceiptNo::from_parts(2025, sequence);
                p
            })
            .collect();
        sort_newest_first(&mut payments);

        let receipts: Vec<&str> = payments.iter().map(|p| p.receipt_no.as_str()).collect();
        assert_eq!(receipts, vec!["RC-2025-10000", "RC-2025-9999", "RC-2025-0998"]);
    }
}
