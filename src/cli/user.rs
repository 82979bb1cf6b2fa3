//! User CLI commands

use clap::Subcommand;

use crate::display::{format_role_permissions, format_user_list};
use crate::error::{FeeDeskError, FeeDeskResult};
use crate::models::Role;
use crate::services::UserService;
use crate::storage::Storage;

/// User subcommands
#[derive(Subcommand)]
pub enum UserCommands {
    /// List staff accounts
    List {
        /// Only users whose name, username or email contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Add a staff account
    Add {
        /// Full name
        name: String,
        /// Login name
        username: String,
        #[arg(short, long)]
        email: String,
        /// Role (admin, head, clerk)
        #[arg(short, long, default_value = "clerk")]
        role: String,
    },
    /// Change a staff account's name, email or role
    Edit {
        username: String,
        /// New full name
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
        /// Role (admin, head, clerk)
        #[arg(short, long)]
        role: Option<String>,
    },
    /// Show every role and its permissions
    Roles,
    /// Re-enable a staff account
    Activate {
        username: String,
    },
    /// Disable a staff account
    Deactivate {
        username: String,
    },
}

/// Handle a user command
pub fn handle_user_command(storage: &Storage, cmd: UserCommands) -> FeeDeskResult<()> {
    let service = UserService::new(storage);

    match cmd {
        UserCommands::List { search } => {
            let users = match search {
                Some(query) => service.search(&query)?,
                None => service.list()?,
            };
            println!("{}", format_user_list(&users).trim_end());
        }

        UserCommands::Add {
            name,
            username,
            email,
            role,
        } => {
            let user = service.add(&name, &username, &email, parse_role(&role)?)?;
            println!("Added user: {} ({})", user.full_name, user.username);
            println!("  Role: {}", user.role);
        }

        UserCommands::Edit {
            username,
            name,
            email,
            role,
        } => {
            if name.is_none() && email.is_none() && role.is_none() {
                println!("No changes specified. Use --name, --email or --role.");
                return Ok(());
            }

            let role = role.as_deref().map(parse_role).transpose()?;
            let user = service.update(&username, name.as_deref(), email.as_deref(), role)?;
            println!("Updated user: {} ({})", user.full_name, user.username);
            println!("  Role: {}", user.role);
        }

        UserCommands::Roles => {
            print!("{}", format_role_permissions());
        }

        UserCommands::Activate { username } => {
            let user = service.set_active(&username, true)?;
            println!("Activated user: {}", user.username);
        }

        UserCommands::Deactivate { username } => {
            let user = service.set_active(&username, false)?;
            println!("Deactivated user: {}", user.username);
        }
    }

    Ok(())
}

fn parse_role(value: &str) -> FeeDeskResult<Role> {
    Role::parse(value).ok_or_else(|| {
        FeeDeskError::Validation(format!(
            "Invalid role: '{}'. Valid roles: admin, head, clerk",
            value
        ))
    })
}
