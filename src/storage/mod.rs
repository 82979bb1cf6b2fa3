//! Storage layer for FeeDesk
//!
//! Provides JSON file storage with atomic writes, one repository per record
//! type, and the audit log every mutation is written to.

pub mod fees;
pub mod file_io;
pub mod init;
pub mod payments;
pub mod students;
pub mod terms;
pub mod users;

pub use fees::FeeRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use payments::PaymentRepository;
pub use students::StudentRepository;
pub use terms::TermRepository;
pub use users::UserRepository;

use serde::Serialize;

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::paths::FeeDeskPaths;
use crate::error::FeeDeskError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: FeeDeskPaths,
    audit: AuditLogger,
    pub students: StudentRepository,
    pub fees: FeeRepository,
    pub payments: PaymentRepository,
    pub terms: TermRepository,
    pub users: UserRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: FeeDeskPaths) -> Result<Self, FeeDeskError> {
        paths.ensure_directories()?;

        Ok(Self {
            audit: AuditLogger::new(paths.audit_log()),
            students: StudentRepository::new(paths.students_file()),
            fees: FeeRepository::new(paths.fees_file()),
            payments: PaymentRepository::new(paths.payments_file()),
            terms: TermRepository::new(paths.terms_file()),
            users: UserRepository::new(paths.users_file()),
            paths,
        })
    }

    pub fn paths(&self) -> &FeeDeskPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), FeeDeskError> {
        self.students.load()?;
        self.fees.load()?;
        self.payments.load()?;
        self.terms.load()?;
        self.users.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), FeeDeskError> {
        self.students.save()?;
        self.fees.save()?;
        self.payments.save()?;
        self.terms.save()?;
        self.users.save()?;
        Ok(())
    }

    /// Check if storage has been initialized (settings written)
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    /// Record the creation of a record in the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), FeeDeskError> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Record a change to a record, with a summary of the changed fields
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Result<(), FeeDeskError> {
        let diff = match (serde_json::to_value(before), serde_json::to_value(after)) {
            (Ok(b), Ok(a)) => generate_diff(&b, &a),
            _ => None,
        };

        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff,
        ))
    }

    /// Record the removal of a record, keeping its last state
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), FeeDeskError> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }
}
