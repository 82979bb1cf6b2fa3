//! JSON export
//!
//! Exports the complete database to JSON with a schema version.

use std::collections::HashSet;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FeeDeskError, FeeDeskResult};
use crate::models::{FeeItem, Payment, Student, Term, User};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full database export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub students: Vec<Student>,

    pub fees: Vec<FeeItem>,

    pub payments: Vec<Payment>,

    pub terms: Vec<Term>,

    pub users: Vec<User>,

    pub metadata: ExportMetadata,
}

/// Record counts and payment date range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub student_count: usize,
    pub fee_count: usize,
    pub payment_count: usize,
    pub term_count: usize,
    pub user_count: usize,
    pub earliest_payment: Option<String>,
    pub latest_payment: Option<String>,
}

impl FullExport {
    /// Snapshot every collection in storage
    pub fn from_storage(storage: &Storage) -> FeeDeskResult<Self> {
        let students = storage.students.get_all()?;
        let fees = storage.fees.get_all()?;
        let payments = storage.payments.get_all()?;
        let terms = storage.terms.get_all()?;
        let users = storage.users.get_all()?;

        let metadata = ExportMetadata {
            student_count: students.len(),
            fee_count: fees.len(),
            payment_count: payments.len(),
            term_count: terms.len(),
            user_count: users.len(),
            earliest_payment: payments.iter().map(|p| p.date).min().map(|d| d.to_string()),
            latest_payment: payments.iter().map(|p| p.date).max().map(|d| d.to_string()),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            students,
            fees,
            payments,
            terms,
            users,
            metadata,
        })
    }

    /// Check the schema version and that every reference resolves
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let student_ids: HashSet<_> = self.students.iter().map(|s| &s.id).collect();
        let term_ids: HashSet<_> = self.terms.iter().map(|t| &t.id).collect();
        let fee_names: HashSet<_> = self.fees.iter().map(|f| f.name.to_lowercase()).collect();

        for payment in &self.payments {
            if !student_ids.contains(&payment.student_id) {
                return Err(format!(
                    "Payment {} references unknown student {}",
                    payment.receipt_no, payment.student_id
                ));
            }
            if !term_ids.contains(&payment.term_id) {
                return Err(format!(
                    "Payment {} references unknown term {}",
                    payment.receipt_no, payment.term_id
                ));
            }
        }

        for student in &self.students {
            if let Some(fee) = student
                .optional_fees
                .iter()
                .find(|name| !fee_names.contains(&name.to_lowercase()))
            {
                return Err(format!(
                    "Student {} takes unknown fee {}",
                    student.id, fee
                ));
            }
        }

        Ok(())
    }
}

/// Export the full database to JSON
pub fn export_full_json<W: Write>(
    storage: &Storage,
    writer: &mut W,
    pretty: bool,
) -> FeeDeskResult<()> {
    let export = FullExport::from_storage(storage)?;
    export.validate().map_err(FeeDeskError::Export)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| FeeDeskError::Export(e.to_string()))?;

    Ok(())
}
