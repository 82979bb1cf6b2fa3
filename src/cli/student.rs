//! Student CLI commands
//!
//! Roster listing and filtering, enrolment, record changes, and fee
//! statements.

use chrono::NaiveDate;
use clap::Subcommand;

use super::{parse_amount, parse_currency, parse_date, resolve_term};
use crate::config::settings::Settings;
use crate::display::{format_statement, format_student_details, format_student_list};
use crate::error::{FeeDeskError, FeeDeskResult};
use crate::models::{FeesStatus, Gender, Guardian, Relationship, StudentId};
use crate::services::{
    ArrearsFilter, BalanceService, CreateStudentInput, RosterService, StudentFilter,
    UpdateStudentInput,
};
use crate::storage::Storage;

/// Student subcommands
#[derive(Subcommand)]
pub enum StudentCommands {
    /// List students, optionally filtered
    List {
        /// Text to find in the roll number, name or email
        #[arg(short, long)]
        search: Option<String>,
        /// Only this class
        #[arg(short, long)]
        class: Option<String>,
        /// Only this section
        #[arg(long)]
        section: Option<String>,
        /// Only this fees status (paid, partial, pending)
        #[arg(long)]
        status: Option<String>,
        /// Arrears constraint (any, with, without)
        #[arg(long)]
        arrears: Option<String>,
    },
    /// Show a student's record
    Show {
        /// Roll number
        id: String,
    },
    /// Enrol a new student
    Add {
        /// Roll number
        id: String,
        /// Full name
        name: String,
        /// Gender (male, female, other)
        #[arg(short, long)]
        gender: String,
        /// Class, e.g. "1" or "Form 3"
        #[arg(short, long)]
        class: String,
        /// Section within the class
        #[arg(long, default_value = "A")]
        section: String,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: String,
        /// Guardian's name
        #[arg(long)]
        guardian: String,
        /// Guardian's relationship (father, mother, guardian, other)
        #[arg(long, default_value = "guardian")]
        relationship: String,
        /// Guardian's phone number
        #[arg(long)]
        guardian_mobile: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        mobile: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Arrears carried from earlier terms
        #[arg(long, default_value = "0")]
        arrears: String,
        /// Optional fee the student takes (repeatable)
        #[arg(long = "optional-fee")]
        optional_fees: Vec<String>,
        /// Term of enrolment, e.g. term1-2025
        #[arg(long)]
        term: Option<String>,
    },
    /// Change a student's record
    Edit {
        /// Roll number
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        gender: Option<String>,
        #[arg(short, long)]
        class: Option<String>,
        #[arg(long)]
        section: Option<String>,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: Option<String>,
        /// Guardian's name
        #[arg(long)]
        guardian: Option<String>,
        #[arg(long)]
        relationship: Option<String>,
        #[arg(long)]
        guardian_mobile: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        mobile: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Fees status (paid, partial, pending)
        #[arg(long)]
        status: Option<String>,
        /// Arrears carried from earlier terms
        #[arg(long)]
        arrears: Option<String>,
        /// Replace the optional fees (repeatable)
        #[arg(long = "optional-fee", conflicts_with = "clear_optional_fees")]
        optional_fees: Vec<String>,
        /// Drop all optional fees
        #[arg(long)]
        clear_optional_fees: bool,
    },
    /// Remove a student with no recorded payments
    Delete {
        /// Roll number
        id: String,
    },
    /// Show a student's fee statement for a term
    Statement {
        /// Roll number
        id: String,
        /// Term ID (defaults to the current term)
        #[arg(short, long)]
        term: Option<String>,
        /// Statement currency (defaults to the configured base currency)
        #[arg(long)]
        currency: Option<String>,
    },
}

/// Handle a student command
pub fn handle_student_command(
    storage: &Storage,
    settings: &Settings,
    today: NaiveDate,
    cmd: StudentCommands,
) -> FeeDeskResult<()> {
    let service = RosterService::new(storage);

    match cmd {
        StudentCommands::List {
            search,
            class,
            section,
            status,
            arrears,
        } => {
            let mut filter = StudentFilter::new();
            if let Some(text) = search {
                filter = filter.search(text);
            }
            if let Some(class) = class {
                filter = filter.class(&class);
            }
            if let Some(section) = section {
                filter = filter.section(&section);
            }
            if let Some(status) = status {
                filter = filter.fees_status(parse_fees_status(&status)?);
            }
            if let Some(arrears) = arrears {
                let arrears = ArrearsFilter::parse(&arrears).ok_or_else(|| {
                    FeeDeskError::Validation(format!(
                        "Invalid arrears filter: '{}'. Valid values: any, with, without",
                        arrears
                    ))
                })?;
                filter = filter.arrears(arrears);
            }

            let students = service.list(&filter)?;
            println!("{}", format_student_list(&students).trim_end());
        }

        StudentCommands::Show { id } => {
            let student = service.find(&id)?;
            print!("{}", format_student_details(&student));
        }

        StudentCommands::Add {
            id,
            name,
            gender,
            class,
            section,
            dob,
            guardian,
            relationship,
            guardian_mobile,
            address,
            mobile,
            email,
            arrears,
            optional_fees,
            term,
        } => {
            let gender = parse_gender(&gender)?;
            let relationship = parse_relationship(&relationship)?;

            let mut guardian = Guardian::new(guardian.trim(), relationship);
            guardian.mobile = guardian_mobile.unwrap_or_default();

            let input = CreateStudentInput {
                id: StudentId::new(id.trim()),
                name,
                gender,
                class,
                section,
                date_of_birth: parse_date(&dob)?,
                guardian,
                address: address.unwrap_or_default(),
                mobile: mobile.unwrap_or_default(),
                email: email.unwrap_or_default(),
                arrears: parse_amount(&arrears)?,
                optional_fees,
                enrolled_term: term.map(Into::into),
            };

            let student = service.add(input)?;
            println!("Enrolled student: {}", student.name);
            println!("  ID:    {}", student.id);
            println!("  Class: {}", student.class_label());
            if student.has_arrears() {
                println!("  Arrears: {}", student.arrears);
            }
        }

        StudentCommands::Edit {
            id,
            name,
            gender,
            class,
            section,
            dob,
            guardian,
            relationship,
            guardian_mobile,
            address,
            mobile,
            email,
            status,
            arrears,
            optional_fees,
            clear_optional_fees,
        } => {
            let current = service.find(&id)?;

            let guardian = if guardian.is_some() || relationship.is_some() || guardian_mobile.is_some()
            {
                let mut updated = current.guardian.clone();
                if let Some(name) = guardian {
                    updated.name = name.trim().to_string();
                }
                if let Some(relationship) = relationship {
                    updated.relationship = parse_relationship(&relationship)?;
                }
                if let Some(mobile) = guardian_mobile {
                    updated.mobile = mobile;
                }
                Some(updated)
            } else {
                None
            };

            let changes = UpdateStudentInput {
                name,
                gender: gender.as_deref().map(parse_gender).transpose()?,
                class,
                section,
                date_of_birth: dob.as_deref().map(parse_date).transpose()?,
                guardian,
                address,
                mobile,
                email,
                fees_status: status.as_deref().map(parse_fees_status).transpose()?,
                arrears: arrears.as_deref().map(parse_amount).transpose()?,
                optional_fees: if clear_optional_fees {
                    Some(Vec::new())
                } else if optional_fees.is_empty() {
                    None
                } else {
                    Some(optional_fees)
                },
            };

            if changes.is_empty() {
                println!("No changes specified. Use --name, --class, --arrears, etc.");
                return Ok(());
            }

            let student = service.update(current.id.as_str(), changes)?;
            println!("Updated student: {} (#{})", student.name, student.id);
        }

        StudentCommands::Delete { id } => {
            let student = service.delete(&id)?;
            println!("Deleted student: {} (#{})", student.name, student.id);
        }

        StudentCommands::Statement { id, term, currency } => {
            let student = service.find(&id)?;
            let term = resolve_term(storage, term.as_deref(), today)?;
            let currency = match currency {
                Some(c) => parse_currency(&c)?,
                None => settings.base_currency,
            };

            let statement = BalanceService::new(storage, settings.exchange_rate).statement(
                &student.id,
                &term.id,
                currency,
            )?;
            print!("{}", format_statement(&statement));
        }
    }

    Ok(())
}

fn parse_gender(value: &str) -> FeeDeskResult<Gender> {
    Gender::parse(value).ok_or_else(|| {
        FeeDeskError::Validation(format!(
            "Invalid gender: '{}'. Valid values: male, female, other",
            value
        ))
    })
}

fn parse_relationship(value: &str) -> FeeDeskResult<Relationship> {
    Relationship::parse(value).ok_or_else(|| {
        FeeDeskError::Validation(format!(
            "Invalid relationship: '{}'. Valid values: father, mother, guardian, other",
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
