//! User service
//!
//! Staff accounts and their roles. Sign-in is handled elsewhere; this service
//! only maintains the records.

use crate::audit::EntityType;
use crate::error::{FeeDeskError, FeeDeskResult};
use crate::models::{Role, User};
use crate::storage::Storage;

/// Service for staff accounts
pub struct UserService<'a> {
    storage: &'a Storage,
}

impl<'a> UserService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn list(&self) -> FeeDeskResult<Vec<User>> {
        self.storage.users.get_all()
    }

    /// Users whose name, username or email contains `query` (case-insensitive)
    pub fn search(&self, query: &str) -> FeeDeskResult<Vec<User>> {
        let query = query.to_lowercase();
        let mut users = self.storage.users.get_all()?;
        users.retain(|u| {
            u.full_name.to_lowercase().contains(&query)
                || u.username.to_lowercase().contains(&query)
                || u.email.to_lowercase().contains(&query)
        });
        Ok(users)
    }

    /// Get a user by username, failing if there is none
    pub fn find(&self, username: &str) -> FeeDeskResult<User> {
        self.storage
            .users
            .get_by_username(username)?
            .ok_or_else(|| FeeDeskError::user_not_found(username))
    }

    /// Create a new user account
    pub fn add(
        &self,
        full_name: &str,
        username: &str,
        email: &str,
        role: Role,
    ) -> FeeDeskResult<User> {
        let username = username.trim();
        if self.storage.users.get_by_username(username)?.is_some() {
            return Err(FeeDeskError::Duplicate {
                entity_type: "User",
                identifier: username.to_string(),
            });
        }

        let user = User::new(full_name.trim(), username, email.trim(), role);
        user.validate().map_err(FeeDeskError::Validation)?;

        self.storage.users.upsert(user.clone())?;
        self.storage.users.save()?;

        self.storage.log_create(
            EntityType::User,
            user.id.to_string(),
            Some(user.username.clone()),
            &user,
        )?;

        Ok(user)
    }

    /// Change an account's name, email or role
    pub fn update(
        &self,
        username: &str,
        full_name: Option<&str>,
        email: Option<&str>,
        role: Option<Role>,
    ) -> FeeDeskResult<User> {
        let before = self.find(username)?;
        let mut user = before.clone();

        if let Some(full_name) = full_name {
            user.full_name = full_name.trim().to_string();
        }
        if let Some(email) = email {
            user.email = email.trim().to_string();
        }
        if let Some(role) = role {
            user.role = role;
        }

        user.validate().map_err(FeeDeskError::Validation)?;
        if user == before {
            return Ok(user);
        }

        self.storage.users.upsert(user.clone())?;
        self.storage.users.save()?;

        self.storage.log_update(
            EntityType::User,
            user.id.to_string(),
            Some(user.username.clone()),
            &before,
            &user,
        )?;

        Ok(user)
    }

    /// Activate or deactivate an account
    ///
    /// Setting the state an account already has is a no-op and is not logged.
    pub fn set_active(&self, username: &str, active: bool) -> FeeDeskResult<User> {
        let before = self.find(username)?;
        if before.active == active {
            return Ok(before);
        }

        let mut user = before.clone();
        user.active = active;

        self.storage.users.upsert(user.clone())?;
        self.storage.users.save()?;

        self.storage.log_update(
            EntityType::User,
            user.id.to_string(),
            Some(user.username.clone()),
            &before,
            &user,
        )?;

        Ok(user)
    }
}
