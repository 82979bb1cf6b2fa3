//! Payment Report
//!
//! Lists payments with the student they came from, filtered by term, class,
//! currency, verification status, the student's fee status, a date range and
//! free text. Totals are kept per currency and never mixed.

use std::collections::HashMap;
use std::io::Write;

use chrono::NaiveDate;

use crate::error::FeeDeskResult;
use crate::models::{
    Currency, FeesStatus, Money, Payment, PaymentMethod, ReceiptNo, Student, StudentId, TermId,
    VerificationStatus,
};
use crate::services::payments::sort_newest_first;
use crate::storage::Storage;

/// Filter options for the payment report
#[derive(Debug, Clone, Default)]
pub struct PaymentReportFilter {
    pub term_id: Option<TermId>,
    /// Exact class of the paying student
    pub class: Option<String>,
    pub currency: Option<Currency>,
    pub status: Option<VerificationStatus>,
    /// Fee status recorded on the paying student
    pub fees_status: Option<FeesStatus>,
    /// Inclusive
    pub start_date: Option<NaiveDate>,
    /// Inclusive
    pub end_date: Option<NaiveDate>,
    /// Case-insensitive substring of the student's name or roll number
    pub student: Option<String>,
}

impl PaymentReportFilter {
    /// Check a payment (and the student it belongs to, if known)
    pub fn matches(&self, payment: &Payment, student: Option<&Student>) -> bool {
        if let Some(term_id) = &self.term_id {
            if &payment.term_id != term_id {
                return false;
            }
        }
        if let Some(currency) = self.currency {
            if payment.currency != currency {
                return false;
            }
        }
        if let Some(status) = self.status {
            if payment.status != status {
                return false;
            }
        }
        if let Some(start) = self.start_date {
            if payment.date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if payment.date > end {
                return false;
            }
        }

        // Student-based filters fail when the student is unknown
        if let Some(class) = &self.class {
            if student.map_or(true, |s| &s.class != class) {
                return false;
            }
        }
        if let Some(fees_status) = self.fees_status {
            if student.map_or(true, |s| s.fees_status != fees_status) {
                return false;
            }
        }
        if let Some(text) = &self.student {
            let text = text.to_lowercase();
            let hit = payment.student_id.as_str().to_lowercase().contains(&text)
                || student.map_or(false, |s| s.name.to_lowercase().contains(&text));
            if !hit {
                return false;
            }
        }

        true
    }
}

/// A single payment line of the report
#[derive(Debug, Clone)]
pub struct PaymentReportRow {
    pub receipt_no: ReceiptNo,
    pub student_id: StudentId,
    pub student_name: String,
    pub class_label: String,
    pub amount: Money,
    pub currency: Currency,
    pub date: NaiveDate,
    pub method: PaymentMethod,
    pub status: VerificationStatus,
    pub recorded_by: String,
}

impl PaymentReportRow {
    pub fn new(payment: &Payment, student: Option<&Student>) -> Self {
        Self {
            receipt_no: payment.receipt_no.clone(),
            student_id: payment.student_id.clone(),
            student_name: student.map_or_else(|| "Unknown".to_string(), |s| s.name.clone()),
            class_label: student.map(|s| s.class_label()).unwrap_or_default(),
            amount: payment.amount,
            currency: payment.currency,
            date: payment.date,
            method: payment.method,
            status: payment.status,
            recorded_by: payment.recorded_by.clone(),
        }
    }

    pub fn formatted_amount(&self) -> String {
        self.currency.format(self.amount)
    }
}

/// Count and sum of the payments in one currency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyTotal {
    pub currency: Currency,
    pub count: usize,
    pub total: Money,
}

/// Payment report
#[derive(Debug, Clone)]
pub struct PaymentReport {
    pub filter: PaymentReportFilter,
    /// Newest first
    pub rows: Vec<PaymentReportRow>,
    /// One entry per supported currency
    pub totals: Vec<CurrencyTotal>,
}

/// Report rows for a set of payments, looking up each payment's student
pub fn rows_for(payments: &[Payment], students: &[Student]) -> Vec<PaymentReportRow> {
    let by_id: HashMap<&StudentId, &Student> = students.iter().map(|s| (&s.id, s)).collect();
    payments
        .iter()
        .map(|p| PaymentReportRow::new(p, by_id.get(&p.student_id).copied()))
        .collect()
}

impl PaymentReport {
    /// Generate the report
    pub fn generate(storage: &Storage, filter: PaymentReportFilter) -> FeeDeskResult<Self> {
        let students = storage.students.get_all()?;
        let by_id: HashMap<&StudentId, &Student> = students.iter().map(|s| (&s.id, s)).collect();

        let mut payments = storage.payments.get_all()?;
        payments.retain(|p| filter.matches(p, by_id.get(&p.student_id).copied()));
        sort_newest_first(&mut payments);

        let rows = rows_for(&payments, &students);
        let totals = Currency::all()
            .into_iter()
            .map(|currency| {
                let in_currency = rows.iter().filter(|r| r.currency == currency);
                CurrencyTotal {
                    currency,
                    count: in_currency.clone().count(),
                    total: in_currency.map(|r| r.amount).sum(),
                }
            })
            .collect();

        Ok(Self {
            filter,
            rows,
            totals,
        })
    }

    /// Total received in one currency
    pub fn total_for(&self, currency: Currency) -> Money {
        self.totals
            .iter()
            .find(|t| t.currency == currency)
            .map(|t| t.total)
            .unwrap_or_default()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str("Payment Report\n");
        output.push_str(&"=".repeat(104));
        output.push('\n');

        let mut scope = Vec::new();
        if let Some(term_id) = &self.filter.term_id {
            scope.push(format!("Term: {}", term_id));
        }
        if let Some(class) = &self.filter.class {
            scope.push(format!("Class: {}", class));
        }
        if let Some(start) = self.filter.start_date {
            scope.push(format!("From: {}", start));
        }
        if let Some(end) = self.filter.end_date {
            scope.push(format!("To: {}", end));
        }
        if !scope.is_empty() {
            output.push_str(&scope.join("  "));
            output.push('\n');
        }
        output.push('\n');

        if self.rows.is_empty() {
            output.push_str("No payments found matching the selected filters.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<14} {:<20} {:<6} {:>18} {:<12} {:<14} {:<9} {}\n",
            "Receipt", "Student", "Class", "Amount", "Date", "Method", "Status", "Recorded By"
        ));
        output.push_str(&"-".repeat(104));
        output.push('\n');

        for row in &self.rows {
            let name = if row.student_name.chars().count() > 19 {
                let short: String = row.student_name.chars().take(16).collect();
                format!("{}...", short)
            } else {
                row.student_name.clone()
            };

            output.push_str(&format!(
                "{:<14} {:<20} {:<6} {:>18} {:<12} {:<14} {:<9} {}\n",
                row.receipt_no,
                name,
                row.class_label,
                row.formatted_amount(),
                row.date,
                row.method,
                row.status,
                row.recorded_by
            ));
        }

        output.push_str(&"-".repeat(104));
        output.push('\n');
        for total in &self.totals {
            output.push_str(&format!(
                "Total {} ({} payments): {}\n",
                total.currency,
                total.count,
                total.currency.format(total.total)
            ));
        }

        output
    }

    /// Export the report to CSV
    pub fn export_csv<W: Write>(&self, writer: W) -> FeeDeskResult<()> {
        let mut csv = csv::Writer::from_writer(writer);

        csv.write_record([
            "Receipt",
            "Student ID",
            "Student",
            "Class",
            "Amount",
            "Currency",
            "Date",
            "Method",
            "Status",
            "Recorded By",
        ])?;

        for row in &self.rows {
            csv.write_record([
                row.receipt_no.to_string(),
                row.student_id.to_string(),
                row.student_name.clone(),
                row.class_label.clone(),
                row.amount.format_plain(),
                row.currency.code().to_string(),
                row.date.to_string(),
                row.method.to_string(),
                row.status.to_string(),
                row.recorded_by.clone(),
            ])?;
        }

        csv.flush()?;
        Ok(())
    }
}
