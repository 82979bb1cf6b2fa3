//! Term repository for JSON storage

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::FeeDeskError;
use crate::models::{Term, TermId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TermData {
    terms: Vec<Term>,
}

pub struct TermRepository {
    path: PathBuf,
    data: RwLock<Vec<Term>>,
}

impl TermRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    pub fn load(&self) -> Result<(), FeeDeskError> {
        let file_data: TermData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            FeeDeskError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        *data = file_data.terms;

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

        write_json_atomic(&self.path, &TermData { terms: data.clone() })
    }

    pub fn get(&self, id: &TermId) -> Result<Option<Term>, FeeDeskError> {
        let data = self.data.read().map_err(|e| {
            FeeDeskError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.iter().find(|t| &t.id == id).cloned())
    }

    /// Get all terms, newest first
    pub fn get_all(&self) -> Result<Vec<Term>, FeeDeskError> {
        let data = self.data.read().map_err(|e| {
            FeeDeskError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut terms = data.clone();
        terms.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(terms)
    }

    pub fn upsert(&self, term: Term) -> Result<(), FeeDeskError> {
        let mut data = self.data.write().map_err(|e| {
            FeeDeskError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        match data.iter_mut().find(|t| t.id == term.id) {
            Some(existing) => *existing = term,
            None => data.push(term),
        }
        Ok(())
    }

    pub fn delete(&self, id: &TermId) -> Result<bool, FeeDeskError> {
        let mut data = self.data.write().map_err(|e| {
            FeeDeskError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let before = data.len();
        data.retain(|t| &t.id != id);
        Ok(data.len() != before)
    }

    pub fn exists(&self, id: &TermId) -> Result<bool, FeeDeskError> {
        let data = self.data.read().map_err(|e| {
            FeeDeskError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.iter().any(|t| &t.id == id))
    }
}
