//! Payment repository for JSON storage
//!
//! Payments are stored in payments.json in the order they were recorded and
//! keyed by receipt number. The repository also hands out the next receipt
//! sequence for a year.

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::FeeDeskError;
use crate::models::{Payment, ReceiptNo, StudentId, TermId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct PaymentData {
    payments: Vec<Payment>,
}

/// Repository for payment persistence
pub struct PaymentRepository {
    path: PathBuf,
    data: RwLock<Vec<Payment>>,
}

impl PaymentRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    /// Load payments from disk
    pub fn load(&self) -> Result<(), FeeDeskError> {
        let file_data: PaymentData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            FeeDeskError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        *data = file_data.payments;

        Ok(())
    }

    /// Save payments to disk
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

        let file_data = PaymentData {
            payments: data.clone(),
        };

        write_json_atomic(&self.path, &file_data)
    }

    /// Get a payment by receipt number
    pub fn get(&self, receipt_no: &ReceiptNo) -> Result<Option<Payment>, FeeDeskError> {
        let data = self.data.read().map_err(|e| {
            FeeDeskError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.iter().find(|p| &p.receipt_no == receipt_no).cloned())
    }

    /// Get all payments in recorded order
    pub fn get_all(&self) -> Result<Vec<Payment>, FeeDeskError> {
        let data = self.data.read().map_err(|e| {
            FeeDeskError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.clone())
    }

    /// Get all payments made by a student
    pub fn get_by_student(&self, student_id: &StudentId) -> Result<Vec<Payment>, FeeDeskError> {
        let data = self.data.read().map_err(|e| {
            FeeDeskError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data
            .iter()
            .filter(|p| &p.student_id == student_id)
            .cloned()
            .collect())
    }

    /// Get all payments credited to a term
    pub fn get_by_term(&self, term_id: &TermId) -> Result<Vec<Payment>, FeeDeskError> {
        let data = self.data.read().map_err(|e| {
            FeeDeskError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data
            .iter()
            .filter(|p| &p.term_id == term_id)
            .cloned()
            .collect())
    }

    /// Insert or update a payment
    pub fn upsert(&self, payment: Payment) -> Result<(), FeeDeskError> {
        let mut data = self.data.write().map_err(|e| {
            FeeDeskError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        match data
            .iter_mut()
            .find(|p| p.receipt_no == payment.receipt_no)
        {
            Some(existing) => *existing = payment,
            None => data.push(payment),
        }
        Ok(())
    }

    /// Next free receipt sequence for a year (1 when the year has none)
    pub fn next_sequence(&self, year: i32) -> Result<u32, FeeDeskError> {
        let data = self.data.read().map_err(|e| {
            FeeDeskError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let highest = data
            .iter()
            .filter_map(|p| p.receipt_no.parts())
            .filter(|(y, _)| *y == year)
            .map(|(_, seq)| seq)
            .max()
            .unwrap_or(0);

        Ok(highest + 1)
    }

    pub fn count(&self) -> Result<usize, FeeDeskError> {
        let data = self.data.read().map_err(|e| {
            FeeDeskError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.len())
    }
}
