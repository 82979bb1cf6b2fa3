//! CLI commands for reports
//!
//! Payment listings and outstanding balances, printed or exported to CSV.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::Subcommand;

use super::{parse_currency, parse_date, resolve_term};
use crate::config::settings::Settings;
use crate::error::{FeeDeskError, FeeDeskResult};
use crate::models::{FeesStatus, TermId, VerificationStatus};
use crate::reports::{OutstandingReport, PaymentReport, PaymentReportFilter};
use crate::storage::Storage;

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// List payments matching the given filters
    Payments {
        /// Term ID, e.g. term1-2025
        #[arg(short, long)]
        term: Option<String>,

        /// Class of the paying student
        #[arg(short, long)]
        class: Option<String>,

        /// Currency (usd, zig)
        #[arg(long)]
        currency: Option<String>,

        /// Verification status (verified, pending)
        #[arg(long)]
        status: Option<String>,

        /// Fees status of the paying student (paid, partial, pending)
        #[arg(long)]
        fees_status: Option<String>,

        /// Start date (YYYY-MM-DD)
        #[arg(short, long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(short, long)]
        end: Option<String>,

        /// Student name or roll number (partial match)
        #[arg(long)]
        student: Option<String>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Students with an outstanding balance for a term
    Outstanding {
        /// Term ID (defaults to the current term)
        #[arg(short, long)]
        term: Option<String>,

        /// Statement currency (defaults to the configured base currency)
        #[arg(long)]
        currency: Option<String>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle report commands
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    today: NaiveDate,
    cmd: ReportCommands,
) -> FeeDeskResult<()> {
    match cmd {
        ReportCommands::Payments {
            term,
            class,
            currency,
            status,
            fees_status,
            start,
            end,
            student,
            output,
        } => {
            let filter = PaymentReportFilter {
                term_id: term.map(TermId::new),
                class,
                currency: currency.as_deref().map(parse_currency).transpose()?,
                status: status.as_deref().map(parse_status).transpose()?,
                fees_status: fees_status.as_deref().map(parse_fees_status).transpose()?,
                start_date: start.as_deref().map(parse_date).transpose()?,
                end_date: end.as_deref().map(parse_date).transpose()?,
                student,
            };

            let report = PaymentReport::generate(storage, filter)?;
            match output {
                Some(path) => {
                    report.export_csv(create_output(&path)?)?;
                    println!("Payment report exported to: {}", path.display());
                }
                None => println!("{}", report.format_terminal()),
            }
        }

        ReportCommands::Outstanding {
            term,
            currency,
            output,
        } => {
            let term = resolve_term(storage, term.as_deref(), today)?;
            let currency = match currency {
                Some(c) => parse_currency(&c)?,
                None => settings.base_currency,
            };

            let report =
                OutstandingReport::generate(storage, &term.id, currency, settings.exchange_rate)?;
            match output {
                Some(path) => {
                    report.export_csv(create_output(&path)?)?;
                    println!("Outstanding report exported to: {}", path.display());
                }
                None => println!("{}", report.format_terminal()),
            }
        }
    }

    Ok(())
}

fn parse_status(value: &str) -> FeeDeskResult<VerificationStatus> {
    VerificationStatus::parse(value).ok_or_else(|| {
        FeeDeskError::Validation(format!(
            "Invalid verification status: '{}'. Valid values: verified, pending",
            value
        ))
    })
}

fn parse_fees_status(value: &str) -> FeeDeskResult<FeesStatus> {
    FeesStatus::parse(value).ok_or_else(|| {
        FeeDeskError::Validation(format!(
            "Invalid fees status: '{}'. Valid values: paid, partial, pending",
            value
        ))
    })
}

/// Open a file for a CSV export
pub(crate) fn create_output(path: &Path) -> FeeDeskResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        FeeDeskError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}
