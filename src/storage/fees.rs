//! Fee structure repository for JSON storage
//!
//! Fee items are stored in fee.json in structure order; statements allocate
//! payments to fee lines in this order.

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::FeeDeskError;
use crate::models::{FeeItem, FeeItemId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct FeeData {
    fees: Vec<FeeItem>,
}

pub struct FeeRepository {
    path: PathBuf,
    data: RwLock<Vec<FeeItem>>,
}

impl FeeRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    pub fn load(&self) -> Result<(), FeeDeskError> {
        let file_data: FeeData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            FeeDeskError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        *data = file_data.fees;

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

        write_json_atomic(&self.path, &FeeData { fees: data.clone() })
    }

    /// Get all fee items in structure order
    pub fn get_all(&self) -> Result<Vec<FeeItem>, FeeDeskError> {
        let data = self.data.read().map_err(|e| {
            FeeDeskError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.clone())
    }

    /// Get a fee item by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<FeeItem>, FeeDeskError> {
        let data = self.data.read().map_err(|e| {
            FeeDeskError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let name_lower = name.trim().to_lowercase();
        Ok(data
            .iter()
            .find(|f| f.name.to_lowercase() == name_lower)
            .cloned())
    }

    pub fn upsert(&self, fee: FeeItem) -> Result<(), FeeDeskError> {
        let mut data = self.data.write().map_err(|e| {
            FeeDeskError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        match data.iter_mut().find(|f| f.id == fee.id) {
            Some(existing) => *existing = fee,
            None => data.push(fee),
        }
        Ok(())
    }

    pub fn delete(&self, id: FeeItemId) -> Result<bool, FeeDeskError> {
        let mut data = self.data.write().map_err(|e| {
            FeeDeskError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let before = data.len();
        data.retain(|f| f.id != id);
        Ok(data.len() != before)
    }

    pub fn name_exists(&self, name: &str) -> Result<bool, FeeDeskError> {
        Ok(self.get_by_name(name)?.is_some())
    }
}
