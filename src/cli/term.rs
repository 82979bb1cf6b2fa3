//! Term CLI commands

use chrono::NaiveDate;
use clap::Subcommand;

use super::parse_date;
use crate::display::{format_term_details, format_term_list};
use crate::error::FeeDeskResult;
use crate::services::TermService;
use crate::storage::Storage;

/// Term subcommands
#[derive(Subcommand)]
pub enum TermCommands {
    /// List all terms, newest first
    List,
    /// Show the term in session and its progress
    Current,
    /// Add a term to the calendar
    Add {
        /// Term number within the year (1-3)
        number: u8,
        /// Academic year
        year: i32,
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        start: String,
        /// Last day (YYYY-MM-DD)
        #[arg(long)]
        end: String,
    },
    /// Move a term's dates
    Edit {
        /// Term ID, e.g. term1-2025
        id: String,
        /// New first day (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        /// New last day (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
    },
    /// Remove a term with no payments or enrolments
    Delete {
        /// Term ID, e.g. term3-2023
        id: String,
    },
}

/// Handle a term command
pub fn handle_term_command(
    storage: &Storage,
    today: NaiveDate,
    cmd: TermCommands,
) -> FeeDeskResult<()> {
    let service = TermService::new(storage);

    match cmd {
        TermCommands::List => {
            let terms = service.list()?;
            println!("{}", format_term_list(&terms, today).trim_end());
        }

        TermCommands::Current => match service.current(today)? {
            Some(term) => {
                let progress = service.progress(&term, today);
                print!("{}", format_term_details(&term, &progress));
            }
            None => println!("No term has started yet."),
        },

        TermCommands::Add {
            number,
            year,
            start,
            end,
        } => {
            let term = service.create(number, year, parse_date(&start)?, parse_date(&end)?)?;
            println!("Added term: {}", term.name());
            println!("  ID:    {}", term.id);
            println!(
                "  Dates: {} to {} ({} weeks)",
                term.start_date,
                term.end_date,
                term.duration_weeks()
            );
        }

        TermCommands::Edit { id, start, end } => {
            if start.is_none() && end.is_none() {
                println!("No changes specified. Use --start or --end.");
                return Ok(());
            }

            let term = service.update(
                &id,
                start.as_deref().map(parse_date).transpose()?,
                end.as_deref().map(parse_date).transpose()?,
            )?;
            println!(
                "Updated term: {} ({} to {})",
                term.name(),
                term.start_date,
                term.end_date
            );
        }

        TermCommands::Delete { id } => {
            let term = service.delete(&id)?;
            println!("Deleted term: {}", term.name());
        }
    }

    Ok(())
}
