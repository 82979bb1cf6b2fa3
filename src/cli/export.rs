//! CLI commands for data export

use std::io::Write;
use std::path::PathBuf;

use clap::Subcommand;

use super::report::create_output;
use crate::error::FeeDeskResult;
use crate::export::{export_fees_csv, export_full_json, export_full_yaml, export_students_csv};
use crate::storage::Storage;

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export the full database to JSON
    Json {
        /// Output file path
        output: PathBuf,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Export the full database to YAML
    Yaml {
        /// Output file path
        output: PathBuf,
    },

    /// Export the roster to CSV
    Students {
        /// Output file path
        output: PathBuf,
    },

    /// Export the fee structure to CSV
    Fees {
        /// Output file path
        output: PathBuf,
    },
}

/// Handle export commands
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> FeeDeskResult<()> {
    match cmd {
        ExportCommands::Json { output, pretty } => {
            let mut writer = create_output(&output)?;
            export_full_json(storage, &mut writer, pretty)?;
            writer.flush()?;
            println!("Full database exported to: {}", output.display());
        }
        ExportCommands::Yaml { output } => {
            let mut writer = create_output(&output)?;
            export_full_yaml(storage, &mut writer)?;
            writer.flush()?;
            println!("Full database exported to: {}", output.display());
        }
        ExportCommands::Students { output } => {
            export_students_csv(storage, create_output(&output)?)?;
            println!("Students exported to: {}", output.display());
        }
        ExportCommands::Fees { output } => {
            export_fees_csv(storage, create_output(&output)?)?;
            println!("Fee structure exported to: {}", output.display());
        }
    }

    Ok(())
}
