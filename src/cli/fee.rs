//! Fee structure CLI commands

use clap::Subcommand;

use super::parse_amount;
use crate::display::format_fee_list;
use crate::error::{FeeDeskError, FeeDeskResult};
use crate::models::{BillingFrequency, Currency};
use crate::services::{FeeService, UpdateFeeInput};
use crate::storage::Storage;

/// Fee subcommands
#[derive(Subcommand)]
pub enum FeeCommands {
    /// List the fee structure
    List {
        /// Only fees whose name contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Add a fee item
    Add {
        /// Fee name
        name: String,
        /// Price in US dollars
        #[arg(long)]
        usd: String,
        /// Price in ZIG
        #[arg(long)]
        zig: String,
        /// Billing frequency (term, annual, once)
        #[arg(short, long, default_value = "term")]
        frequency: String,
        /// Charge only students who opt in
        #[arg(long)]
        optional: bool,
    },
    /// Change a fee item
    Edit {
        /// Current fee name
        fee: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        #[arg(long)]
        usd: Option<String>,
        #[arg(long)]
        zig: Option<String>,
        /// Billing frequency (term, annual, once)
        #[arg(short, long)]
        frequency: Option<String>,
        /// Charge every student
        #[arg(long, conflicts_with = "optional")]
        required: bool,
        /// Charge only students who opt in
        #[arg(long)]
        optional: bool,
    },
    /// Remove a fee item no student has opted in to
    Delete {
        /// Fee name
        fee: String,
    },
}

/// Handle a fee command
pub fn handle_fee_command(storage: &Storage, cmd: FeeCommands) -> FeeDeskResult<()> {
    let service = FeeService::new(storage);

    match cmd {
        FeeCommands::List { search } => {
            let fees = match search {
                Some(query) => service.search(&query)?,
                None => service.list()?,
            };
            println!("{}", format_fee_list(&fees).trim_end());
        }

        FeeCommands::Add {
            name,
            usd,
            zig,
            frequency,
            optional,
        } => {
            let fee = service.add(
                &name,
                parse_amount(&usd)?,
                parse_amount(&zig)?,
                parse_frequency(&frequency)?,
                !optional,
            )?;

            println!("Added fee: {}", fee.name);
            println!("  USD:       {}", Currency::Usd.format(fee.amount_usd));
            println!("  ZIG:       {}", Currency::Zig.format(fee.amount_zig));
            println!("  Frequency: {}", fee.frequency);
            println!("  Required:  {}", if fee.required { "Yes" } else { "No" });
        }

        FeeCommands::Edit {
            fee,
            name,
            usd,
            zig,
            frequency,
            required,
            optional,
        } => {
            let changes = UpdateFeeInput {
                name,
                amount_usd: usd.as_deref().map(parse_amount).transpose()?,
                amount_zig: zig.as_deref().map(parse_amount).transpose()?,
                frequency: frequency.as_deref().map(parse_frequency).transpose()?,
                required: match (required, optional) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
            };

            if changes.is_empty() {
                println!("No changes specified. Use --name, --usd, --zig, --frequency or --optional.");
                return Ok(());
            }

            let updated = service.update(&fee, changes)?;
            println!("Updated fee: {}", updated.name);
            println!("  USD:       {}", Currency::Usd.format(updated.amount_usd));
            println!("  ZIG:       {}", Currency::Zig.format(updated.amount_zig));
        }

        FeeCommands::Delete { fee } => {
            let removed = service.delete(&fee)?;
            println!("Deleted fee: {}", removed.name);
        }
    }

    Ok(())
}

fn parse_frequency(value: &str) -> FeeDeskResult<BillingFrequency> {
    BillingFrequency::parse(value).ok_or_else(|| {
        FeeDeskError::Validation(format!(
            "Invalid frequency: '{}'. Valid values: term, annual, once",
            value
        ))
    })
}
