//! Student repository for JSON storage
//!
//! Manages loading and saving the roll to students.json. Students are kept in
//! roll order (the order they were enrolled), which every roster view preserves.

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::FeeDeskError;
use crate::models::{Student, StudentId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct StudentData {
    students: Vec<Student>,
}

/// Repository for student persistence
pub struct StudentRepository {
    path: PathBuf,
    data: RwLock<Vec<Student>>,
}

impl StudentRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    /// Load students from disk
    pub fn load(&self) -> Result<(), FeeDeskError> {
        let file_data: StudentData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            FeeDeskError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        *data = file_data.students;

        Ok(())
    }

    /// Save students to disk
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

        let file_data = StudentData {
            students: data.clone(),
        };

        write_json_atomic(&self.path, &file_data)
    }

    /// Get a student by roll number
    pub fn get(&self, id: &StudentId) -> Result<Option<Student>, FeeDeskError> {
        let data = self.data.read().map_err(|e| {
            FeeDeskError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.iter().find(|s| &s.id == id).cloned())
    }

    /// Get all students in roll order
    pub fn get_all(&self) -> Result<Vec<Student>, FeeDeskError> {
        let data = self.data.read().map_err(|e| {
            FeeDeskError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.clone())
    }

    /// Insert a new student at the end of the roll, or replace one in place
    pub fn upsert(&self, student: Student) -> Result<(), FeeDeskError> {
        let mut data = self.data.write().map_err(|e| {
            FeeDeskError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        match data.iter_mut().find(|s| s.id == student.id) {
            Some(existing) => *existing = student,
            None => data.push(student),
        }
        Ok(())
    }

    /// Remove a student, returning whether one was removed
    pub fn delete(&self, id: &StudentId) -> Result<bool, FeeDeskError> {
        let mut data = self.data.write().map_err(|e| {
            FeeDeskError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let before = data.len();
        data.retain(|s| &s.id != id);
        Ok(data.len() != before)
    }

    pub fn exists(&self, id: &StudentId) -> Result<bool, FeeDeskError> {
        let data = self.data.read().map_err(|e| {
            FeeDeskError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.iter().any(|s| &s.id == id))
    }

    pub fn count(&self) -> Result<usize, FeeDeskError> {
        let data = self.data.read().map_err(|e| {
            FeeDeskError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.len())
    }
}
