//! User and role display formatting

use crate::models::{Role, User};

/// Format staff accounts as a table
pub fn format_user_list(users: &[User]) -> String {
    if users.is_empty() {
        return "No users found.".to_string();
    }

    let name_width = users.iter().map(|u| u.full_name.len()).max().unwrap_or(4).max(4);
    let username_width = users.iter().map(|u| u.username.len()).max().unwrap_or(8).max(8);
    let email_width = users.iter().map(|u| u.email.len()).max().unwrap_or(5).max(5);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<username_width$}  {:<email_width$}  {:<11}  {:<8}  {}\n",
        "Name",
        "Username",
        "Email",
        "Role",
        "Status",
        "Last Login",
        name_width = name_width,
        username_width = username_width,
        email_width = email_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<username_width$}  {:-<email_width$}  {:-<11}  {:-<8}  {:-<10}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
        username_width = username_width,
        email_width = email_width,
    ));

    for user in users {
        let last_login = user
            .last_login
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "Never".to_string());
        output.push_str(&format!(
            "{:<name_width$}  {:<username_width$}  {:<email_width$}  {:<11}  {:<8}  {}\n",
            user.full_name,
            user.username,
            user.email,
            user.role,
            user.status_label(),
            last_login,
            name_width = name_width,
            username_width = username_width,
            email_width = email_width,
        ));
    }

    output
}

/// Format every role with the permissions it grants
pub fn format_role_permissions() -> String {
    let mut output = String::new();
    for role in Role::all() {
        output.push_str(&format!("{}\n", role));
        for permission in role.permissions() {
            output.push_str(&format!("  - {}\n", permission));
        }
    }
    output
}
