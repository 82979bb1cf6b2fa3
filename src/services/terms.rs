//! Term service
//!
//! Academic terms: listing, creating non-overlapping terms, and finding the
//! current term for a date.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{FeeDeskError, FeeDeskResult};
use crate::models::{Term, TermId, TermPhase};
use crate::storage::Storage;

/// Where a term stands on a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermProgress {
    pub phase: TermPhase,
    pub total_days: i64,
    pub days_elapsed: i64,
    pub days_remaining: i64,
    pub percent_complete: u32,
    pub duration_weeks: i64,
}

impl TermProgress {
    pub fn of(term: &Term, today: NaiveDate) -> Self {
        Self {
            phase: term.phase(today),
            total_days: term.total_days(),
            days_elapsed: term.days_elapsed(today),
            days_remaining: term.days_remaining(today),
            percent_complete: term.percent_complete(today),
            duration_weeks: term.duration_weeks(),
        }
    }
}

/// Service for academic terms
pub struct TermService<'a> {
    storage: &'a Storage,
}

impl<'a> TermService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// All terms, newest first
    pub fn list(&self) -> FeeDeskResult<Vec<Term>> {
        self.storage.terms.get_all()
    }

    /// Get a term by id, failing if there is none
    pub fn find(&self, id: &str) -> FeeDeskResult<Term> {
        self.storage
            .terms
            .get(&TermId::new(id))?
            .ok_or_else(|| FeeDeskError::term_not_found(id))
    }

    /// The term in session on `today`
    ///
    /// Between terms this is the most recent term that has already started,
    /// so holidays still report against the term just finished.
    pub fn current(&self, today: NaiveDate) -> FeeDeskResult<Option<Term>> {
        let terms = self.storage.terms.get_all()?;

        if let Some(term) = terms.iter().find(|t| t.contains(today)) {
            return Ok(Some(term.clone()));
        }

        Ok(terms.into_iter().find(|t| t.start_date <= today))
    }

    /// Create a new term
    pub fn create(
        &self,
        number: u8,
        year: i32,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> FeeDeskResult<Term> {
        let term = Term::new(number, year, start_date, end_date);
        term.validate().map_err(FeeDeskError::Validation)?;

        if self.storage.terms.exists(&term.id)? {
            return Err(FeeDeskError::Duplicate {
                entity_type: "Term",
                identifier: term.name(),
            });
        }

        self.check_overlap(&term)?;

        self.storage.terms.upsert(term.clone())?;
        self.storage.terms.save()?;

        self.storage
            .log_create(EntityType::Term, term.id.to_string(), Some(term.name()), &term)?;

        Ok(term)
    }

    /// Move a term's dates
    ///
    /// The term number and year identify the term and do not change.
    pub fn update(
        &self,
        id: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> FeeDeskResult<Term> {
        let before = self.find(id)?;
        let mut term = before.clone();

        if let Some(start_date) = start_date {
            term.start_date = start_date;
        }
        if let Some(end_date) = end_date {
            term.end_date = end_date;
        }

        term.validate().map_err(FeeDeskError::Validation)?;
        if term == before {
            return Ok(term);
        }
        self.check_overlap(&term)?;

        self.storage.terms.upsert(term.clone())?;
        self.storage.terms.save()?;

        self.storage.log_update(
            EntityType::Term,
            term.id.to_string(),
            Some(term.name()),
            &before,
            &term,
        )?;

        Ok(term)
    }

    /// Remove a term that nothing refers to
    pub fn delete(&self, id: &str) -> FeeDeskResult<Term> {
        let term = self.find(id)?;

        let payments = self.storage.payments.get_by_term(&term.id)?.len();
        if payments > 0 {
            return Err(FeeDeskError::Validation(format!(
                "Cannot delete {}: {} payment(s) are recorded against it",
                term.name(),
                payments
            )));
        }

        let enrolled = self
            .storage
            .students
            .get_all()?
            .into_iter()
            .filter(|s| s.enrolled_term.as_ref() == Some(&term.id))
            .count();
        if enrolled > 0 {
            return Err(FeeDeskError::Validation(format!(
                "Cannot delete {}: {} student(s) enrolled in it",
                term.name(),
                enrolled
            )));
        }

        self.storage.terms.delete(&term.id)?;
        self.storage.terms.save()?;

        self.storage
            .log_delete(EntityType::Term, term.id.to_string(), Some(term.name()), &term)?;

        Ok(term)
    }

    pub fn progress(&self, term: &Term, today: NaiveDate) -> TermProgress {
        TermProgress::of(term, today)
    }

    /// Terms may not share a day with any other term
    fn check_overlap(&self, term: &Term) -> FeeDeskResult<()> {
        if let Some(clash) = self
            .storage
            .terms
            .get_all()?
            .into_iter()
            .find(|t| t.id != term.id && t.overlaps(term))
        {
            return Err(FeeDeskError::Validation(format!(
                "{} ({} to {}) overlaps {} ({} to {})",
                term.name(),
                term.start_date,
                term.end_date,
                clash.name(),
                clash.start_date,
                clash.end_date
            )));
        }
        Ok(())
    }
}
