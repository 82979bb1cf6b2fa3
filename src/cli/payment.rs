//! Payment CLI commands

use chrono::NaiveDate;
use clap::Subcommand;

use super::{parse_amount, parse_currency, parse_date, resolve_term};
use crate::config::settings::Settings;
use crate::display::{format_payment_details, format_payment_history};
use crate::error::{FeeDeskError, FeeDeskResult};
use crate::models::{PaymentMethod, StudentId, VerificationStatus};
use crate::reports::PaymentReceipt;
use crate::services::{PaymentService, RecordPaymentInput, RosterService};
use crate::storage::Storage;

/// Payment subcommands
#[derive(Subcommand)]
pub enum PaymentCommands {
    /// Record a fee payment and issue a receipt
    Record {
        /// Roll number of the paying student
        student: String,
        /// Amount received (e.g. "250" or "1,200,000")
        amount: String,
        /// Currency of the payment (usd, zig)
        #[arg(short, long, default_value = "usd")]
        currency: String,
        /// Term to credit (defaults to the current term)
        #[arg(short, long)]
        term: Option<String>,
        /// Payment date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Payment method (cash, bank, mobile, check)
        #[arg(short, long, default_value = "cash")]
        method: String,
        /// Mark the payment as already verified
        #[arg(long)]
        verified: bool,
        /// Staff member recording the payment
        #[arg(long = "by", env = "FEEDESK_USER")]
        recorded_by: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Show a student's payment history
    History {
        /// Roll number
        student: String,
    },
    /// Print the receipt for a payment
    #[command(alias = "show")]
    Receipt {
        /// Receipt number, e.g. RC-2025-0122
        receipt: String,
    },
    /// Verify a pending payment
    Verify {
        /// Receipt number, e.g. RC-2025-0116
        receipt: String,
    },
}

/// Handle a payment command
pub fn handle_payment_command(
    storage: &Storage,
    settings: &Settings,
    today: NaiveDate,
    cmd: PaymentCommands,
) -> FeeDeskResult<()> {
    let service = PaymentService::new(storage);

    match cmd {
        PaymentCommands::Record {
            student,
            amount,
            currency,
            term,
            date,
            method,
            verified,
            recorded_by,
            notes,
        } => {
            let method = PaymentMethod::parse(&method).ok_or_else(|| {
                FeeDeskError::Validation(format!(
                    "Invalid payment method: '{}'. Valid methods: cash, bank, mobile, check",
                    method
                ))
            })?;
            let date = match date {
                Some(d) => parse_date(&d)?,
                None => today,
            };
            let term = resolve_term(storage, term.as_deref(), date)?;

            let payment = service.record(RecordPaymentInput {
                student_id: StudentId::new(student.trim()),
                term_id: term.id,
                amount: parse_amount(&amount)?,
                currency: parse_currency(&currency)?,
                date,
                method,
                status: if verified {
                    VerificationStatus::Verified
                } else {
                    VerificationStatus::Pending
                },
                recorded_by,
                notes: notes.unwrap_or_default(),
            })?;

            let student = RosterService::new(storage).find(payment.student_id.as_str())?;
            println!("Recorded payment");
            print!("{}", format_payment_details(&payment, &student.name));
        }

        PaymentCommands::History { student } => {
            let found = RosterService::new(storage).find(student.trim())?;
            let payments = service.history(&found.id)?;
            print!("{}", format_payment_history(&found.name, &payments));
        }

        PaymentCommands::Receipt { receipt } => {
            let receipt = PaymentReceipt::generate(storage, settings, receipt.trim())?;
            print!("{}", receipt.format_terminal(settings));
        }

        PaymentCommands::Verify { receipt } => {
            let payment = service.verify(receipt.trim())?;
            println!(
                "Verified payment {}: {}",
                payment.receipt_no,
                payment.formatted_amount()
            );
        }
    }

    Ok(())
}
