//! Fee structure service

use crate::audit::EntityType;
use crate::error::{FeeDeskError, FeeDeskResult};
use crate::models::{BillingFrequency, FeeItem, Money};
use crate::storage::Storage;

/// Changes to a fee item; `None` leaves a field as it is
#[derive(Debug, Clone, Default)]
pub struct UpdateFeeInput {
    pub name: Option<String>,
    pub amount_usd: Option<Money>,
    pub amount_zig: Option<Money>,
    pub frequency: Option<BillingFrequency>,
    pub required: Option<bool>,
}

impl UpdateFeeInput {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.amount_usd.is_none()
            && self.amount_zig.is_none()
            && self.frequency.is_none()
            && self.required.is_none()
    }
}

/// Service for the fee structure
pub struct FeeService<'a> {
    storage: &'a Storage,
}

impl<'a> FeeService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// All fee items in structure order
    pub fn list(&self) -> FeeDeskResult<Vec<FeeItem>> {
        self.storage.fees.get_all()
    }

    /// Fee items whose name contains `query` (case-insensitive)
    pub fn search(&self, query: &str) -> FeeDeskResult<Vec<FeeItem>> {
        let query = query.to_lowercase();
        let mut fees = self.storage.fees.get_all()?;
        fees.retain(|f| f.name.to_lowercase().contains(&query));
        Ok(fees)
    }

    pub fn get_by_name(&self, name: &str) -> FeeDeskResult<Option<FeeItem>> {
        self.storage.fees.get_by_name(name)
    }

    /// Add a fee item to the end of the structure
    pub fn add(
        &self,
        name: &str,
        amount_usd: Money,
        amount_zig: Money,
        frequency: BillingFrequency,
        required: bool,
    ) -> FeeDeskResult<FeeItem> {
        let name = name.trim();
        if self.storage.fees.name_exists(name)? {
            return Err(FeeDeskError::Duplicate {
                entity_type: "Fee item",
                identifier: name.to_string(),
            });
        }

        let fee = FeeItem::new(name, amount_usd, amount_zig, frequency, required);
        fee.validate().map_err(FeeDeskError::Validation)?;

        self.storage.fees.upsert(fee.clone())?;
        self.storage.fees.save()?;

        self.storage.log_create(
            EntityType::FeeItem,
            fee.id.to_string(),
            Some(fee.name.clone()),
            &fee,
        )?;

        Ok(fee)
    }

    /// Get a fee item by name, failing if there is none
    pub fn find(&self, name: &str) -> FeeDeskResult<FeeItem> {
        self.storage
            .fees
            .get_by_name(name)?
            .ok_or_else(|| FeeDeskError::fee_not_found(name))
    }

    /// Change a fee item in place
    ///
    /// A rename is carried to every student who opted in to the fee.
    pub fn update(&self, name: &str, changes: UpdateFeeInput) -> FeeDeskResult<FeeItem> {
        let before = self.find(name)?;
        let mut fee = before.clone();

        if let Some(new_name) = changes.name {
            let new_name = new_name.trim();
            if let Some(existing) = self.storage.fees.get_by_name(new_name)? {
                if existing.id != fee.id {
                    return Err(FeeDeskError::Duplicate {
                        entity_type: "Fee item",
                        identifier: new_name.to_string(),
                    });
                }
            }
            fee.name = new_name.to_string();
        }
        if let Some(amount_usd) = changes.amount_usd {
            fee.amount_usd = amount_usd;
        }
        if let Some(amount_zig) = changes.amount_zig {
            fee.amount_zig = amount_zig;
        }
        if let Some(frequency) = changes.frequency {
            fee.frequency = frequency;
        }
        if let Some(required) = changes.required {
            fee.required = required;
        }

        fee.validate().map_err(FeeDeskError::Validation)?;

        if fee == before {
            return Ok(fee);
        }

        self.storage.fees.upsert(fee.clone())?;
        self.storage.fees.save()?;

        self.storage.log_update(
            EntityType::FeeItem,
            fee.id.to_string(),
            Some(fee.name.clone()),
            &before,
            &fee,
        )?;

        if fee.name != before.name {
            self.rename_optional_fee(&before.name, &fee.name)?;
        }

        Ok(fee)
    }

    /// Remove a fee item from the structure
    ///
    /// Optional fees that students have opted in to cannot be removed.
    pub fn delete(&self, name: &str) -> FeeDeskResult<FeeItem> {
        let fee = self.find(name)?;

        let takers = self
            .storage
            .students
            .get_all()?
            .into_iter()
            .filter(|s| s.takes_optional_fee(&fee.name))
            .count();
        if takers > 0 {
            return Err(FeeDeskError::Validation(format!(
                "Cannot delete '{}': {} student(s) have opted in to it",
                fee.name, takers
            )));
        }

        self.storage.fees.delete(fee.id)?;
        self.storage.fees.save()?;

        self.storage.log_delete(
            EntityType::FeeItem,
            fee.id.to_string(),
            Some(fee.name.clone()),
            &fee,
        )?;

        Ok(fee)
    }

    fn rename_optional_fee(&self, old_name: &str, new_name: &str) -> FeeDeskResult<()> {
        let mut changed = Vec::new();
        for before in self.storage.students.get_all()? {
            if !before.takes_optional_fee(old_name) {
                continue;
            }
            let mut student = before.clone();
            for fee_name in student.optional_fees.iter_mut() {
                if fee_name.eq_ignore_ascii_case(old_name) {
                    *fee_name = new_name.to_string();
                }
            }
            self.storage.students.upsert(student.clone())?;
            changed.push((before, student));
        }

        if changed.is_empty() {
            return Ok(());
        }
        self.storage.students.save()?;

        for (before, student) in &changed {
            self.storage.log_update(
                EntityType::Student,
                student.id.to_string(),
                Some(student.name.clone()),
                before,
                student,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FeeDeskPaths;
    use crate::storage::initialize_storage;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FeeDeskPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_search() {
        let (_temp_dir, storage) = create_test_storage();
        let service = FeeService::new(&storage);

        let found = service.search("FEE").unwrap();
        assert_eq!(found.len(), 4);
        assert_eq!(service.search("uniform").unwrap()[0].name, "School Uniform");
        assert!(service.search("library").unwrap().is_empty());
    }

    #[test]
    fn test_add_fee() {
        let (_temp_dir, storage) = create_test_storage();
        let service = FeeService::new(&storage);

        let fee = service
            .add(
                " Exam Fee ",
                Money::from_units(40),
                Money::from_units(140_000),
                BillingFrequency::Annual,
                true,
            )
            .unwrap();
        assert_eq!(fee.name, "Exam Fee");
        assert_eq!(service.list().unwrap().last().unwrap().name, "Exam Fee");

        let dup = service.add(
            "exam fee",
            Money::from_units(1),
            Money::from_units(1),
            BillingFrequency::PerTerm,
            false,
        );
        assert!(matches!(dup, Err(FeeDeskError::Duplicate { .. })));

        let negative = service.add(
            "Library Fee",
            Money::from_units(-5),
            Money::zero(),
            BillingFrequency::PerTerm,
            false,
        );
        assert!(negative.unwrap_err().is_validation());

        let empty = service.add(
            "  ",
            Money::zero(),
            Money::zero(),
            BillingFrequency::PerTerm,
            false,
        );
        assert!(empty.unwrap_err().is_validation());
    }

    #[test]
    fn test_update_fee() {
        let (_temp_dir, storage) = create_test_storage();
        let service = FeeService::new(&storage);

        let fee = service
            .update(
                "sports fee",
                UpdateFeeInput {
                    amount_usd: Some(Money::from_units(30)),
                    amount_zig: Some(Money::from_units(105_000)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(fee.name, "Sports Fee");
        assert_eq!(fee.amount_usd, Money::from_units(30));

        // Position in the structure is kept
        assert_eq!(service.list().unwrap()[3].amount_usd, Money::from_units(30));

        let entry = &storage.audit().read_all().unwrap()[0];
        assert!(entry.diff_summary.as_deref().unwrap().contains("amount_usd"));

        let clash = service.update(
            "Sports Fee",
            UpdateFeeInput {
                name: Some("tuition fee".into()),
                ..Default::default()
            },
        );
        assert!(matches!(clash, Err(FeeDeskError::Duplicate { .. })));

        let negative = service.update(
            "Sports Fee",
            UpdateFeeInput {
                amount_zig: Some(Money::from_units(-1)),
                ..Default::default()
            },
        );
        assert!(negative.unwrap_err().is_validation());
    }

    #[test]
    fn test_rename_carries_to_students() {
        let (_temp_dir, storage) = create_test_storage();
        let service = FeeService::new(&storage);

        service
            .update(
                "Boarding Fee",
                UpdateFeeInput {
                    name: Some("Hostel Fee".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        let student = storage
            .students
            .get(&crate::models::StudentId::new("2902"))
            .unwrap()
            .unwrap();
        assert_eq!(student.optional_fees, vec!["Hostel Fee"]);
        assert!(service.find("Boarding Fee").unwrap_err().is_not_found());

        // One fee update plus one per student who opted in
        assert_eq!(storage.audit().entry_count().unwrap(), 3);
    }

    #[test]
    fn test_delete_fee() {
        let (_temp_dir, storage) = create_test_storage();
        let service = FeeService::new(&storage);

        let removed = service.delete("technology fee").unwrap();
        assert_eq!(removed.name, "Technology Fee");
        assert_eq!(service.list().unwrap().len(), 4);

        let in_use = service.delete("Boarding Fee").unwrap_err();
        assert!(in_use.is_validation());
        assert!(in_use.to_string().contains("2 student(s)"));

        assert!(service.delete("Library Fee").unwrap_err().is_not_found());

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, crate::audit::Operation::Delete);
    }
}
