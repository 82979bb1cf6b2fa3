//! Outstanding Fees Report
//!
//! Per-student statements for one term, listing only students who still owe,
//! in roll order, with school-wide totals.

use std::io::Write;

use crate::error::FeeDeskResult;
use crate::models::{Currency, ExchangeRate, TermId};
use crate::services::{BalanceService, BalanceSummary, StudentStatement, TermService};
use crate::storage::Storage;

/// Outstanding fees report
#[derive(Debug, Clone)]
pub struct OutstandingReport {
    pub term_name: String,
    pub currency: Currency,
    /// Students with an outstanding balance, roll order
    pub rows: Vec<StudentStatement>,
    /// Totals over the whole roll, including students who have paid
    pub school_totals: BalanceSummary,
}

impl OutstandingReport {
    /// Generate the report
    pub fn generate(
        storage: &Storage,
        term_id: &TermId,
        currency: Currency,
        rate: ExchangeRate,
    ) -> FeeDeskResult<Self> {
        let term = TermService::new(storage).find(term_id.as_str())?;
        let statements =
            BalanceService::new(storage, rate).statements_for_term(term_id, currency)?;

        let school_totals = statements.iter().map(|s| s.summary).sum();
        let rows = statements
            .into_iter()
            .filter(|s| s.outstanding().is_positive())
            .collect();

        Ok(Self {
            term_name: term.name(),
            currency,
            rows,
            school_totals,
        })
    }

    /// Totals over the listed students only
    pub fn owing_totals(&self) -> BalanceSummary {
        self.rows.iter().map(|s| s.summary).sum()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();
        let fmt = |m| self.currency.format(m);

        output.push_str(&format!(
            "Outstanding Fees: {} ({})\n",
            self.term_name, self.currency
        ));
        output.push_str(&"=".repeat(92));
        output.push_str("\n\n");

        if self.rows.is_empty() {
            output.push_str("No outstanding balances.\n");
        } else {
            output.push_str(&format!(
                "{:<8} {:<20} {:<6} {:>17} {:>17} {:>17} {:<8}\n",
                "ID", "Student", "Class", "Due", "Paid", "Outstanding", "Status"
            ));
            output.push_str(&"-".repeat(92));
            output.push('\n');

            for row in &self.rows {
                output.push_str(&format!(
                    "{:<8} {:<20} {:<6} {:>17} {:>17} {:>17} {:<8}\n",
                    row.student_id,
                    row.student_name,
                    row.class_label,
                    fmt(row.total_due()),
                    fmt(row.total_paid()),
                    fmt(row.outstanding()),
                    row.status()
                ));
            }

            let owing = self.owing_totals();
            output.push_str(&"-".repeat(92));
            output.push('\n');
            output.push_str(&format!(
                "{:<36} {:>17} {:>17} {:>17}\n",
                format!("{} students owing", self.rows.len()),
                fmt(owing.total_due),
                fmt(owing.total_paid),
                fmt(owing.outstanding())
            ));
        }

        output.push_str(&format!(
            "\nSchool total due: {}  collected: {} ({}%)  outstanding: {}\n",
            fmt(self.school_totals.total_due),
            fmt(self.school_totals.total_paid),
            self.school_totals.percent_paid(),
            fmt(self.school_totals.outstanding())
        ));

        output
    }

    /// Export the report to CSV
    pub fn export_csv<W: Write>(&self, writer: W) -> FeeDeskResult<()> {
        let mut csv = csv::Writer::from_writer(writer);

        csv.write_record([
            "Student ID",
            "Student",
            "Class",
            "Term",
            "Currency",
            "Due",
            "Paid",
            "Outstanding",
            "Status",
        ])?;

        for row in &self.rows {
            csv.write_record([
                row.student_id.to_string(),
                row.student_name.clone(),
                row.class_label.clone(),
                row.term_name.clone(),
                row.currency.code().to_string(),
                row.total_due().format_plain(),
                row.total_paid().format_plain(),
                row.outstanding().format_plain(),
                row.status().to_string(),
            ])?;
        }

        csv.flush()?;
        Ok(())
    }
}
