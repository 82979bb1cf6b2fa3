//! Balance service
//!
//! Builds fee statements: which fee items a student is billed for in a term,
//! how their verified payments cover those items, and the resulting totals.
//!
//! The arithmetic lives in plain functions ([`billed_items`], [`allocate`],
//! [`BalanceSummary::from_lines`]) that never fail; the service only gathers
//! the records they need.

use crate::error::{FeeDeskError, FeeDeskResult};
use crate::models::{
    BalanceStatus, BillingFrequency, Currency, ExchangeRate, FeeBalance, FeeItem, Money, Payment,
    Student, StudentId, Term, TermId,
};
use crate::storage::Storage;

/// Aggregate totals over a set of fee lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BalanceSummary {
    pub total_due: Money,
    pub total_paid: Money,
}

impl BalanceSummary {
    pub fn from_lines(lines: &[FeeBalance]) -> Self {
        Self {
            total_due: lines.iter().map(|l| l.billed).sum(),
            total_paid: lines.iter().map(|l| l.paid).sum(),
        }
    }

    pub fn outstanding(&self) -> Money {
        self.total_due - self.total_paid
    }

    /// Same three-way rule as a single line, applied to the totals
    pub fn status(&self) -> BalanceStatus {
        BalanceStatus::derive(self.total_due, self.total_paid)
    }

    /// Whole percent of the amount due that has been paid
    pub fn percent_paid(&self) -> u32 {
        self.total_paid.percent_of(self.total_due)
    }
}

impl std::ops::Add for BalanceSummary {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            total_due: self.total_due + rhs.total_due,
            total_paid: self.total_paid + rhs.total_paid,
        }
    }
}

impl std::iter::Sum for BalanceSummary {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, s| acc + s)
    }
}

/// Fee items billed to a student in a term, in fee structure order
///
/// Required items and the student's optional items are billed: per-term items
/// every term, annual items in the first term of the year, once-off items in
/// the term the student enrolled.
pub fn billed_items<'f>(fees: &'f [FeeItem], student: &Student, term: &Term) -> Vec<&'f FeeItem> {
    fees.iter()
        .filter(|fee| fee.required || student.takes_optional_fee(&fee.name))
        .filter(|fee| match fee.frequency {
            BillingFrequency::PerTerm => true,
            BillingFrequency::Annual => term.number == 1,
            BillingFrequency::OnceOff => student.enrolled_term.as_ref() == Some(&term.id),
        })
        .collect()
}

/// Spread a payment total over billed items in order
///
/// Each line takes at most its billed amount. Returns the lines and whatever
/// could not be allocated.
pub fn allocate(
    items: &[&FeeItem],
    currency: Currency,
    mut available: Money,
) -> (Vec<FeeBalance>, Money) {
    let mut lines = Vec::with_capacity(items.len());
    for fee in items {
        let billed = fee.amount(currency);
        let paid = if available.is_positive() {
            available.min(billed)
        } else {
            Money::zero()
        };
        available -= paid;
        lines.push(FeeBalance::new(fee.name.clone(), billed, paid));
    }
    (lines, available)
}

/// Sum of verified payments, converted into `currency`
pub fn verified_total<'p>(
    payments: impl IntoIterator<Item = &'p Payment>,
    currency: Currency,
    rate: &ExchangeRate,
) -> Money {
    payments
        .into_iter()
        .filter(|p| p.is_verified())
        .map(|p| rate.convert(p.amount, p.currency, currency))
        .sum()
}

/// One student's fee statement for one term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentStatement {
    pub student_id: StudentId,
    pub student_name: String,
    pub class_label: String,
    pub term_id: TermId,
    pub term_name: String,
    pub currency: Currency,
    pub lines: Vec<FeeBalance>,
    pub summary: BalanceSummary,
    /// Verified payments beyond what was billed
    pub unallocated: Money,
}

impl StudentStatement {
    /// Build a statement from a student's records
    pub fn build(
        student: &Student,
        term: &Term,
        fees: &[FeeItem],
        payments: &[Payment],
        currency: Currency,
        rate: &ExchangeRate,
    ) -> Self {
        let items = billed_items(fees, student, term);
        let received = verified_total(
            payments
                .iter()
                .filter(|p| p.student_id == student.id && p.term_id == term.id),
            currency,
            rate,
        );
        let (lines, unallocated) = allocate(&items, currency, received);

        Self {
            student_id: student.id.clone(),
            student_name: student.name.clone(),
            class_label: student.class_label(),
            term_id: term.id.clone(),
            term_name: term.name(),
            currency,
            summary: BalanceSummary::from_lines(&lines),
            lines,
            unallocated,
        }
    }

    pub fn total_due(&self) -> Money {
        self.summary.total_due
    }

    pub fn total_paid(&self) -> Money {
        self.summary.total_paid
    }

    pub fn outstanding(&self) -> Money {
        self.summary.outstanding()
    }

    pub fn status(&self) -> BalanceStatus {
        self.summary.status()
    }

    pub fn percent_paid(&self) -> u32 {
        self.summary.percent_paid()
    }
}

/// Service for fee statements
pub struct BalanceService<'a> {
    storage: &'a Storage,
    rate: ExchangeRate,
}

impl<'a> BalanceService<'a> {
    pub fn new(storage: &'a Storage, rate: ExchangeRate) -> Self {
        Self { storage, rate }
    }

    fn term(&self, term_id: &TermId) -> FeeDeskResult<Term> {
        self.storage
            .terms
            .get(term_id)?
            .ok_or_else(|| FeeDeskError::term_not_found(term_id.as_str()))
    }

    /// Statement for one student
    pub fn statement(
        &self,
        student_id: &StudentId,
        term_id: &TermId,
        currency: Currency,
    ) -> FeeDeskResult<StudentStatement> {
        let student = self
            .storage
            .students
            .get(student_id)?
            .ok_or_else(|| FeeDeskError::student_not_found(student_id.as_str()))?;
        let term = self.term(term_id)?;
        let fees = self.storage.fees.get_all()?;
        let payments = self.storage.payments.get_by_student(student_id)?;

        Ok(StudentStatement::build(
            &student, &term, &fees, &payments, currency, &self.rate,
        ))
    }

    /// Statements for every student on the roll, in roll order
    pub fn statements_for_term(
        &self,
        term_id: &TermId,
        currency: Currency,
    ) -> FeeDeskResult<Vec<StudentStatement>> {
        let term = self.term(term_id)?;
        let fees = self.storage.fees.get_all()?;
        let payments = self.storage.payments.get_by_term(term_id)?;

        Ok(self
            .storage
            .students
            .get_all()?
            .iter()
            .map(|student| {
                StudentStatement::build(student, &term, &fees, &payments, currency, &self.rate)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FeeDeskPaths;
    use crate::models::{Gender, PaymentMethod, ReceiptNo, VerificationStatus};
    use crate::storage::initialize_storage;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn usd(units: i64) -> Money {
        Money::from_units(units)
    }

    fn fee(name: &str, amount: i64, frequency: BillingFrequency, required: bool) -> FeeItem {
        FeeItem::new(name, usd(amount), usd(amount * 3_500), frequency, required)
    }

    fn structure() -> Vec<FeeItem> {
        vec![
            fee("Tuition Fee", 250, BillingFrequency::PerTerm, true),
            fee("Boarding Fee", 320, BillingFrequency::PerTerm, false),
            fee("Technology Fee", 35, BillingFrequency::PerTerm, true),
            fee("Sports Fee", 25, BillingFrequency::PerTerm, true),
            fee("School Uniform", 85, BillingFrequency::OnceOff, false),
            fee("Exam Fee", 40, BillingFrequency::Annual, true),
        ]
    }

    fn term(number: u8) -> Term {
        let start = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 4, 10).unwrap();
        Term::new(number, 2025, start, end)
    }

    fn boarder() -> Student {
        let mut s = Student::new(
            "2902",
            "Kazi Fahim",
            Gender::Male,
            "2",
            "B",
            NaiveDate::from_ymd_opt(2010, 3, 10).unwrap(),
        );
        s.optional_fees = vec!["Boarding Fee".into(), "School Uniform".into()];
        s
    }

    fn payment(amount: Money, currency: Currency, status: VerificationStatus) -> Payment {
        Payment {
            receipt_no: ReceiptNo::from_parts(2025, 1),
            student_id: StudentId::new("2902"),
            term_id: TermId::from_parts(2, 2025),
            amount,
            currency,
            date: NaiveDate::from_ymd_opt(2025, 5, 5).unwrap(),
            method: PaymentMethod::Cash,
            status,
            recorded_by: "J. Moyo".into(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_summary_example() {
        let lines = vec![
            FeeBalance::new("Tuition", usd(250), usd(250)),
            FeeBalance::new("Boarding", usd(320), usd(150)),
            FeeBalance::new("Technology", usd(35), Money::zero()),
            FeeBalance::new("Sports", usd(25), Money::from_units_cents(2, 50)),
        ];
        let summary = BalanceSummary::from_lines(&lines);

        assert_eq!(summary.total_due, usd(630));
        assert_eq!(summary.total_paid, Money::from_units_cents(402, 50));
        assert_eq!(summary.outstanding(), Money::from_units_cents(227, 50));
        assert_eq!(summary.status(), BalanceStatus::Partial);
        assert_eq!(summary.percent_paid(), 63);

        let statuses: Vec<BalanceStatus> = lines.iter().map(|l| l.status()).collect();
        assert_eq!(
            statuses,
            vec![
                BalanceStatus::Paid,
                BalanceStatus::Partial,
                BalanceStatus::Unpaid,
                BalanceStatus::Partial
            ]
        );
    }

    #[test]
    fn test_empty_summary_is_paid() {
        let summary = BalanceSummary::from_lines(&[]);
        assert_eq!(summary.outstanding(), Money::zero());
        assert_eq!(summary.status(), BalanceStatus::Paid);
        assert_eq!(summary.percent_paid(), 0);
    }

    #[test]
    fn test_billed_items_by_frequency() {
        let fees = structure();
        let mut student = boarder();

        let names = |items: Vec<&FeeItem>| -> Vec<String> {
            items.iter().map(|f| f.name.clone()).collect()
        };

        // Term 1, not the enrolment term: annual fee billed, uniform not
        assert_eq!(
            names(billed_items(&fees, &student, &term(1))),
            vec!["Tuition Fee", "Boarding Fee", "Technology Fee", "Sports Fee", "Exam Fee"]
        );

        // Enrolment term 2: uniform billed, annual fee not
        student.enrolled_term = Some(TermId::from_parts(2, 2025));
        assert_eq!(
            names(billed_items(&fees, &student, &term(2))),
            vec!["Tuition Fee", "Boarding Fee", "Technology Fee", "Sports Fee", "School Uniform"]
        );

        // Day scholar without optional fees
        student.optional_fees.clear();
        assert_eq!(
            names(billed_items(&fees, &student, &term(3))),
            vec!["Tuition Fee", "Technology Fee", "Sports Fee"]
        );
    }

    #[test]
    fn test_allocate_in_order_with_credit() {
        let fees = structure();
        let items: Vec<&FeeItem> = fees.iter().take(4).collect();

        let (lines, left) = allocate(&items, Currency::Usd, Money::from_units_cents(402, 50));
        let paid: Vec<Money> = lines.iter().map(|l| l.paid).collect();
        assert_eq!(
            paid,
            vec![usd(250), Money::from_units_cents(152, 50), Money::zero(), Money::zero()]
        );
        assert_eq!(left, Money::zero());

        let (lines, left) = allocate(&items, Currency::Usd, usd(700));
        assert!(lines.iter().all(|l| l.status() == BalanceStatus::Paid));
        assert_eq!(left, usd(70));
    }

    #[test]
    fn test_statement_converts_and_skips_pending() {
        let fees = structure();
        let student = boarder();
        let rate = ExchangeRate::default();
        let payments = vec![
            payment(usd(250), Currency::Usd, VerificationStatus::Verified),
            payment(usd(150), Currency::Usd, VerificationStatus::Verified),
            payment(usd(8_750), Currency::Zig, VerificationStatus::Verified),
            payment(usd(1_000), Currency::Usd, VerificationStatus::Pending),
        ];

        let statement =
            StudentStatement::build(&student, &term(2), &fees, &payments, Currency::Usd, &rate);

        assert_eq!(statement.total_due(), usd(630));
        assert_eq!(statement.total_paid(), Money::from_units_cents(402, 50));
        assert_eq!(statement.outstanding(), Money::from_units_cents(227, 50));
        assert_eq!(statement.status(), BalanceStatus::Partial);
        assert_eq!(statement.unallocated, Money::zero());

        // Same payments viewed in ZIG
        let in_zig =
            StudentStatement::build(&student, &term(2), &fees, &payments, Currency::Zig, &rate);
        assert_eq!(in_zig.total_due(), usd(630 * 3_500));
        assert_eq!(in_zig.total_paid(), usd(1_408_750));
    }

    #[test]
    fn test_verified_total() {
        let rate = ExchangeRate::default();
        let payments = vec![
            payment(usd(10), Currency::Usd, VerificationStatus::Verified),
            payment(usd(3_500), Currency::Zig, VerificationStatus::Verified),
            payment(usd(99), Currency::Usd, VerificationStatus::Pending),
        ];
        assert_eq!(verified_total(&payments, Currency::Usd, &rate), usd(11));
    }

    #[test]
    fn test_service_statement_from_seed_data() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FeeDeskPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        let service = BalanceService::new(&storage, ExchangeRate::default());
        let term_id = TermId::from_parts(1, 2025);

        let statement = service
            .statement(&StudentId::new("2902"), &term_id, Currency::Usd)
            .unwrap();
        assert_eq!(statement.total_due(), usd(630));
        assert_eq!(statement.total_paid(), Money::from_units_cents(402, 50));
        assert_eq!(statement.status(), BalanceStatus::Partial);

        let all = service.statements_for_term(&term_id, Currency::Usd).unwrap();
        assert_eq!(all.len(), 5);
        assert_eq!(all[0].status(), BalanceStatus::Paid);
        // 2903's only payment is still pending
        assert_eq!(all[2].status(), BalanceStatus::Unpaid);

        let missing = service.statement(&StudentId::new("0000"), &term_id, Currency::Usd);
        assert!(missing.unwrap_err().is_not_found());
    }
}
