//! Dashboard Summary
//!
//! The console's landing view: the term in session, collection figures for
//! that term, and the latest payments received.

use chrono::NaiveDate;

use crate::config::settings::Settings;
use crate::error::FeeDeskResult;
use crate::models::{Currency, Term, VerificationStatus};
use crate::services::{
    BalanceService, BalanceSummary, PaymentFilter, PaymentService, TermProgress, TermService,
};
use crate::storage::Storage;

use super::payment_report::{rows_for, PaymentReportRow};

/// Dashboard figures
#[derive(Debug, Clone)]
pub struct DashboardSummary {
    pub school_name: String,
    pub today: NaiveDate,
    /// Term in session (or the last one to start) and how far along it is
    pub current_term: Option<(Term, TermProgress)>,
    pub currency: Currency,
    pub student_count: usize,
    /// Due and collected for the current term, all students
    pub totals: BalanceSummary,
    /// Payments of the current term still awaiting verification
    pub pending_count: usize,
    /// Newest first
    pub recent_payments: Vec<PaymentReportRow>,
}

impl DashboardSummary {
    pub fn generate(
        storage: &Storage,
        settings: &Settings,
        today: NaiveDate,
    ) -> FeeDeskResult<Self> {
        let currency = settings.base_currency;
        let current = TermService::new(storage).current(today)?;
        let payments = PaymentService::new(storage);

        let (totals, pending_count) = match &current {
            Some(term) => {
                let statements = BalanceService::new(storage, settings.exchange_rate)
                    .statements_for_term(&term.id, currency)?;
                let pending = payments
                    .list(
                        &PaymentFilter::new()
                            .term(term.id.clone())
                            .status(VerificationStatus::Pending),
                    )?
                    .len();
                (statements.iter().map(|s| s.summary).sum(), pending)
            }
            None => (BalanceSummary::default(), 0),
        };

        let students = storage.students.get_all()?;
        let recent = payments.recent(settings.recent_payments)?;

        Ok(Self {
            school_name: settings.school_name.clone(),
            today,
            current_term: current.map(|term| {
                let progress = TermProgress::of(&term, today);
                (term, progress)
            }),
            currency,
            student_count: students.len(),
            totals,
            pending_count,
            recent_payments: rows_for(&recent, &students),
        })
    }

    /// Format the dashboard for terminal display
    pub fn format_terminal(&self, settings: &Settings) -> String {
        let mut output = String::new();
        let fmt = |m| self.currency.format(m);

        output.push_str(&format!("{} Fee Dashboard\n", self.school_name));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!("Today: {}\n\n", settings.format_date(self.today)));

        match &self.current_term {
            Some((term, progress)) => {
                output.push_str(&format!(
                    "Current Term:     {} ({} to {})\n",
                    term.name(),
                    settings.format_date(term.start_date),
                    settings.format_date(term.end_date)
                ));
                output.push_str(&format!(
                    "Term Progress:    {}% complete, {} days remaining\n",
                    progress.percent_complete, progress.days_remaining
                ));
            }
            None => output.push_str("Current Term:     none configured\n"),
        }
        output.push_str(&format!("Students:         {}\n\n", self.student_count));

        output.push_str(&format!("Total Due:        {:>20}\n", fmt(self.totals.total_due)));
        output.push_str(&format!("Collected:        {:>20}\n", fmt(self.totals.total_paid)));
        output.push_str(&format!(
            "Outstanding:      {:>20}\n",
            fmt(self.totals.outstanding())
        ));
        output.push_str(&format!(
            "Collection Rate:  {:>19}%\n",
            self.totals.percent_paid()
        ));
        if self.pending_count > 0 {
            output.push_str(&format!(
                "Awaiting verification: {} payment(s)\n",
                self.pending_count
            ));
        }

        output.push_str("\nRecent Payments\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');
        if self.recent_payments.is_empty() {
            output.push_str("No payments recorded.\n");
        }
        for row in &self.recent_payments {
            output.push_str(&format!(
                "{:<14} {:<18} {:>16}  {}\n",
                row.receipt_no,
                row.student_name,
                row.formatted_amount(),
                settings.format_date(row.date)
            ));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FeeDeskPaths;
    use crate::models::{BalanceStatus, Money};
    use crate::storage::initialize_storage;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FeeDeskPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_dashboard_in_term() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let today = NaiveDate::from_ymd_opt(2025, 2, 24).unwrap();

        let dashboard = DashboardSummary::generate(&storage, &settings, today).unwrap();

        let (term, progress) = dashboard.current_term.as_ref().unwrap();
        assert_eq!(term.id.as_str(), "term1-2025");
        assert_eq!(progress.days_remaining, 45);
        assert_eq!(dashboard.student_count, 5);
        assert_eq!(dashboard.totals.total_due, Money::from_units(2_190));
        assert_eq!(dashboard.totals.status(), BalanceStatus::Partial);
        assert_eq!(dashboard.totals.percent_paid(), 60);
        assert_eq!(dashboard.pending_count, 1);
        assert_eq!(dashboard.recent_payments.len(), 5);
        assert_eq!(dashboard.recent_payments[0].student_name, "Kazi Fahim");

        let output = dashboard.format_terminal(&settings);
        assert!(output.contains("Nhaka School Fee Dashboard"));
        assert!(output.contains("Term 1, 2025 (Jan 15, 2025 to Apr 10, 2025)"));
        assert!(output.contains("45 days remaining"));
        assert!(output.contains("$2,190.00"));
        assert!(output.contains("Awaiting verification: 1 payment(s)"));
    }

    #[test]
    fn test_dashboard_without_terms() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let today = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();

        let dashboard = DashboardSummary::generate(&storage, &settings, today).unwrap();
        assert!(dashboard.current_term.is_none());
        assert_eq!(dashboard.totals, BalanceSummary::default());
        assert!(dashboard
            .format_terminal(&settings)
            .contains("Current Term:     none configured"));
    }
}
