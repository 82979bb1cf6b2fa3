use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use feedesk_cli::audit::EntityType;
use feedesk_cli::cli::{
    handle_export_command, handle_fee_command, handle_payment_command, handle_report_command,
    handle_student_command, handle_term_command, handle_user_command,
};
use feedesk_cli::config::{paths::FeeDeskPaths, settings::Settings};
use feedesk_cli::models::{Currency, ExchangeRate, Money};
use feedesk_cli::reports::DashboardSummary;
use feedesk_cli::storage::init::{initialize_storage, needs_initialization};
use feedesk_cli::storage::Storage;

#[derive(Parser)]
#[command(
    name = "feedesk",
    version,
    about = "Terminal-based school fee management console",
    long_about = "FeeDesk keeps a school's roll, fee structure and payments, and \
                  works out what every student owes each term in US dollars or ZIG."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data files with the sample school
    Init,

    /// Show or change configuration
    Config {
        /// School name shown on reports
        #[arg(long)]
        school: Option<String>,
        /// Currency statements are computed in (usd, zig)
        #[arg(long)]
        currency: Option<String>,
        /// ZIG per one USD
        #[arg(long)]
        rate: Option<String>,
    },

    /// Show the fee collection dashboard
    #[command(alias = "home")]
    Dashboard,

    /// Roster commands
    #[command(subcommand)]
    Student(feedesk_cli::cli::StudentCommands),

    /// Fee structure commands
    #[command(subcommand)]
    Fee(feedesk_cli::cli::FeeCommands),

    /// Payment commands
    #[command(subcommand, alias = "pay")]
    Payment(feedesk_cli::cli::PaymentCommands),

    /// Academic term commands
    #[command(subcommand)]
    Term(feedesk_cli::cli::TermCommands),

    /// Staff account commands
    #[command(subcommand)]
    User(feedesk_cli::cli::UserCommands),

    /// Reports
    #[command(subcommand)]
    Report(feedesk_cli::cli::ReportCommands),

    /// Export data
    #[command(subcommand)]
    Export(feedesk_cli::cli::ExportCommands),

    /// Show recent changes from the audit log
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
        /// Only changes to this record type (student, fee, payment, term, user)
        #[arg(short, long)]
        entity: Option<String>,
        /// Only changes to this record (requires --entity)
        #[arg(long, requires = "entity")]
        id: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = FeeDeskPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    let today = chrono::Local::now().date_naive();

    let command = match cli.command {
        Some(Commands::Init) => {
            println!("Initializing FeeDesk at: {}", paths.base_dir().display());
            initialize_storage(&paths)?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("The sample school has been created:");
            println!("  - 5 students across classes 1 and 2");
            println!("  - Fee structure: tuition, boarding, technology, sports, uniform");
            println!("  - Terms from 2023 to 2025 and 8 payments in Term 1, 2025");
            println!();
            println!("Run 'feedesk dashboard' to see the collection summary.");
            return Ok(());
        }
        Some(Commands::Config {
            school,
            currency,
            rate,
        }) => {
            let changed = school.is_some() || currency.is_some() || rate.is_some();
            if let Some(school) = school {
                settings.school_name = school.trim().to_string();
            }
            if let Some(currency) = currency {
                match Currency::parse(&currency) {
                    Some(c) => settings.base_currency = c,
                    None => bail!("Invalid currency: '{}'. Valid currencies: usd, zig", currency),
                }
            }
            if let Some(rate) = rate {
                let zig_per_usd = Money::parse(&rate)?;
                if !zig_per_usd.is_positive() {
                    bail!("Exchange rate must be positive, got {}", rate);
                }
                settings.exchange_rate = ExchangeRate::new(zig_per_usd, Some(today));
            }
            if changed {
                settings.save(&paths)?;
                println!("Settings saved.");
                println!();
            }

            println!("FeeDesk Configuration");
            println!("=====================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Data directory:  {}", paths.data_dir().display());
            println!("Audit log:       {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  School:        {}", settings.school_name);
            println!("  Currency:      {}", settings.base_currency);
            println!("  Exchange rate: {}", settings.exchange_rate);
            return Ok(());
        }
        Some(command) => command,
        None => {
            println!("FeeDesk - School fee management console");
            println!();
            println!("Run 'feedesk --help' for usage information.");
            println!("Run 'feedesk init' to create the sample school.");
            return Ok(());
        }
    };

    if needs_initialization(&paths) {
        bail!(
            "No FeeDesk data found at {}. Run 'feedesk init' first.",
            paths.base_dir().display()
        );
    }

    let mut storage = Storage::new(paths)?;
    storage.load_all()?;

    match command {
        Commands::Dashboard => {
            let summary = DashboardSummary::generate(&storage, &settings, today)?;
            print!("{}", summary.format_terminal(&settings));
        }
        Commands::Student(cmd) => handle_student_command(&storage, &settings, today, cmd)?,
        Commands::Fee(cmd) => handle_fee_command(&storage, cmd)?,
        Commands::Payment(cmd) => handle_payment_command(&storage, &settings, today, cmd)?,
        Commands::Term(cmd) => handle_term_command(&storage, today, cmd)?,
        Commands::User(cmd) => handle_user_command(&storage, cmd)?,
        Commands::Report(cmd) => handle_report_command(&storage, &settings, today, cmd)?,
        Commands::Export(cmd) => handle_export_command(&storage, cmd)?,
        Commands::Audit { limit, entity, id } => {
            let entries = match entity {
                Some(entity) => {
                    let Some(entity_type) = EntityType::parse(&entity) else {
                        bail!(
                            "Invalid record type: '{}'. Valid types: student, fee, payment, term, user",
                            entity
                        );
                    };
                    let mut history = storage.audit().read_history(entity_type, id.as_deref())?;
                    let start = history.len().saturating_sub(limit);
                    history.split_off(start)
                }
                None => storage.audit().read_recent(limit)?,
            };
            if entries.is_empty() {
                println!("No audit entries found.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        Commands::Init | Commands::Config { .. } => {}
    }

    Ok(())
}
