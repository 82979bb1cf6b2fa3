//! User repository for JSON storage

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::FeeDeskError;
use crate::models::{User, UserId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct UserData {
    users: Vec<User>,
}

pub struct UserRepository {
    path: PathBuf,
    data: RwLock<Vec<User>>,
}

impl UserRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    pub fn load(&self) -> Result<(), FeeDeskError> {
        let file_data: UserData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            FeeDeskError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        *data = file_data.users;

        Ok(())
    }

    /// Save to disk
    ///
    /// A failed write reloads the in-memory data from the last saved file.
    pub fn save(&self) -> Result<(), FeeDeskError> {
        let result = self.write_file();
        if result.is_err() {
            let _ = self.load();
        }
        result
    }

    fn write_file(&self) -> Result<(), FeeDeskError> {
        let data = self.data.read().map_err(|e| {
            FeeDeskError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        write_json_atomic(&self.path, &UserData { users: data.clone() })
    }

    pub fn get(&self, id: UserId) -> Result<Option<User>, FeeDeskError> {
        let data = self.data.read().map_err(|e| {
            FeeDeskError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.iter().find(|u| u.id == id).cloned())
    }

    /// Get a user by username (case-insensitive)
    pub fn get_by_username(&self, username: &str) -> Result<Option<User>, FeeDeskError> {
        let data = self.data.read().map_err(|e| {
            FeeDeskError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let username_lower = username.trim().to_lowercase();
        Ok(data
            .iter()
            .find(|u| u.username.to_lowercase() == username_lower)
            .cloned())
    }

    /// Get all users in creation order
    pub fn get_all(&self) -> Result<Vec<User>, FeeDeskError> {
        let data = self.data.read().map_err(|e| {
            FeeDeskError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.clone())
    }

    pub fn upsert(&self, user: User) -> Result<(), FeeDeskError> {
        let mut data = self.data.write().map_err(|e| {
            FeeDeskError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        match data.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user,
            None => data.push(user),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use tempfile::TempDir;

    #[test]
    fn test_username_lookup() {
        let temp_dir = TempDir::new().unwrap();
        let repo = UserRepository::new(temp_dir.path().join("users.json"));

        let user = User::new("Grace Sithole", "gsithole", "grace@nhaka.edu.zw", Role::Clerk);
        let id = user.id;
        repo.upsert(user).unwrap();

        assert!(repo.get_by_username("GSithole").unwrap().is_some());
        assert!(repo.get_by_username("nobody").unwrap().is_none());

        repo.save().unwrap();
        let reloaded = UserRepository::new(temp_dir.path().join("users.json"));
        reloaded.load().unwrap();
        assert_eq!(reloaded.get(id).unwrap().unwrap().username, "gsithole");
    }
}
