//! Payment display formatting
//!
//! Payment registers, student histories and receipt views.

use crate::models::{Payment, VerificationStatus};

/// Format a single payment as a register row
pub fn format_payment_row(payment: &Payment) -> String {
    let status_icon = match payment.status {
        VerificationStatus::Verified => "✓",
        VerificationStatus::Pending => " ",
    };

    format!(
        "{} {:12} {} {:8} {:>20}  {:14} {}",
        status_icon,
        payment.receipt_no,
        payment.date.format("%Y-%m-%d"),
        payment.student_id,
        payment.formatted_amount(),
        payment.method,
        truncate(&payment.recorded_by, 16),
    )
}

/// Format payments as a register, one row per payment
pub fn format_payment_list(payments: &[Payment]) -> String {
    if payments.is_empty() {
        return "No payments found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:1} {:12} {:10} {:8} {:>20}  {:14} {}\n",
        "", "Receipt", "Date", "Student", "Amount", "Method", "Recorded By"
    ));
    output.push_str(&"-".repeat(90));
    output.push('\n');

    for payment in payments {
        output.push_str(&format_payment_row(payment));
        output.push('\n');
    }

    let pending = payments.iter().filter(|p| !p.is_verified()).count();
    output.push_str(&format!("\n{} payment(s)", payments.len()));
    if pending > 0 {
        output.push_str(&format!(", {} pending verification", pending));
    }
    output.push('\n');

    output
}

/// Format a student's payment history under a heading
pub fn format_payment_history(student_name: &str, payments: &[Payment]) -> String {
    let mut output = format!("Payment History: {}\n\n", student_name);
    if payments.is_empty() {
        output.push_str("No payments recorded.\n");
    } else {
        output.push_str(&format_payment_list(payments));
    }
    output
}

/// Format a payment as a receipt
pub fn format_payment_details(payment: &Payment, student_name: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Receipt:     {}\n", payment.receipt_no));
    output.push_str(&format!("Date:        {}\n", payment.date.format("%Y-%m-%d")));
    output.push_str(&format!("Student:     {} #{}\n", student_name, payment.student_id));
    output.push_str(&format!("Term:        {}\n", payment.term_id));
    output.push_str(&format!("Amount:      {}\n", payment.formatted_amount()));
    output.push_str(&format!("Method:      {}\n", payment.method));
    output.push_str(&format!("Status:      {}\n", payment.status));
    output.push_str(&format!("Recorded By: {}\n", payment.recorded_by));

    if !payment.notes.is_empty() {
        output.push_str(&format!("Notes:       {}\n", payment.notes));
    }

    output
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
