//! Payment receipts
//!
//! The printable receipt for one payment, with the payer's balance for the
//! credited term in the currency the payment was made in.

use crate::config::settings::Settings;
use crate::error::{FeeDeskError, FeeDeskResult};
use crate::models::{BalanceStatus, Money, Payment};
use crate::services::{BalanceService, PaymentService};
use crate::storage::Storage;

const RECEIPT_WIDTH: usize = 48;

#[derive(Debug, Clone)]
pub struct PaymentReceipt {
    pub school_name: String,
    pub payment: Payment,
    pub student_name: String,
    pub class_label: String,
    pub term_name: String,
    /// Still owed for the term after verified payments, in the payment's currency
    pub term_outstanding: Money,
    pub term_status: BalanceStatus,
}

impl PaymentReceipt {
    pub fn generate(storage: &Storage, settings: &Settings, receipt_no: &str) -> FeeDeskResult<Self> {
        let payment = PaymentService::new(storage).find(receipt_no)?;

        let statement = BalanceService::new(storage, settings.exchange_rate)
            .statement(&payment.student_id, &payment.term_id, payment.currency)
            .map_err(|e| {
                if e.is_not_found() {
                    FeeDeskError::Validation(format!(
                        "Receipt {} refers to a record that no longer exists: {}",
                        payment.receipt_no, e
                    ))
                } else {
                    e
                }
            })?;

        Ok(Self {
            school_name: settings.school_name.clone(),
            student_name: statement.student_name.clone(),
            class_label: statement.class_label.clone(),
            term_name: statement.term_name.clone(),
            term_outstanding: statement.outstanding(),
            term_status: statement.status(),
            payment,
        })
    }

    /// Format the receipt for terminal display or printing
    pub fn format_terminal(&self, settings: &Settings) -> String {
        let payment = &self.payment;
        let currency = payment.currency;
        let mut output = String::new();

        output.push_str(&format!("{}\n", self.school_name));
        output.push_str("Official Fee Receipt\n");
        output.push_str(&"=".repeat(RECEIPT_WIDTH));
        output.push('\n');

        output.push_str(&format!("Receipt No:    {}\n", payment.receipt_no));
        output.push_str(&format!("Date:          {}\n", settings.format_date(payment.date)));
        output.push_str(&format!(
            "Received From: {} (#{})\n",
            self.student_name, payment.student_id
        ));
        output.push_str(&format!("Class:         {}\n", self.class_label));
        output.push_str(&format!("Term:          {}\n", self.term_name));
        output.push_str(&format!("Amount:        {}\n", currency.format(payment.amount)));
        output.push_str(&format!("Method:        {}\n", payment.method));
        output.push_str(&format!("Recorded By:   {}\n", payment.recorded_by));
        if !payment.notes.is_empty() {
            output.push_str(&format!("Notes:         {}\n", payment.notes));
        }

        output.push_str(&"-".repeat(RECEIPT_WIDTH));
        output.push('\n');
        output.push_str(&format!(
            "Term Balance:  {} ({})\n",
            currency.format(self.term_outstanding),
            self.term_status
        ));
        if !payment.is_verified() {
            output.push_str("Awaiting verification; not yet credited to the balance.\n");
        }

        output
    }
}
