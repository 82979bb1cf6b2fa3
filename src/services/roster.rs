//! Roster service
//!
//! Student filtering and roster management. The filter itself is a plain
//! value: [`filter_students`] takes a roster snapshot and a [`StudentFilter`]
//! and returns the matching students in roll order without touching storage.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{FeeDeskError, FeeDeskResult};
use crate::models::{FeesStatus, Gender, Guardian, Money, Student, StudentId, TermId};
use crate::storage::Storage;

/// Arrears constraint of a roster filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrearsFilter {
    #[default]
    Any,
    /// Arrears greater than zero
    WithArrears,
    /// No arrears
    WithoutArrears,
}

impl ArrearsFilter {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "any" | "all" => Some(Self::Any),
            "with" | "yes" | "owing" => Some(Self::WithArrears),
            "without" | "no" | "none" => Some(Self::WithoutArrears),
            _ => None,
        }
    }

    pub fn matches(&self, student: &Student) -> bool {
        match self {
            Self::Any => true,
            Self::WithArrears => student.has_arrears(),
            Self::WithoutArrears => !student.has_arrears(),
        }
    }
}

/// Filter options for the student roster
///
/// Every set field is a constraint; a student is listed only if it satisfies
/// all of them. `StudentFilter::default()` lists everyone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFilter {
    /// Case-insensitive substring of roll number, name or email
    pub search: String,
    /// Exact class
    pub class: Option<String>,
    /// Exact section
    pub section: Option<String>,
    pub fees_status: Option<FeesStatus>,
    pub arrears: ArrearsFilter,
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl StudentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    /// Filter by class; an empty value clears the constraint
    pub fn class(mut self, class: &str) -> Self {
        self.class = non_empty(class);
        self
    }

    /// Filter by section; an empty value clears the constraint
    pub fn section(mut self, section: &str) -> Self {
        self.section = non_empty(section);
        self
    }

    pub fn fees_status(mut self, status: FeesStatus) -> Self {
        self.fees_status = Some(status);
        self
    }

    pub fn arrears(mut self, arrears: ArrearsFilter) -> Self {
        self.arrears = arrears;
        self
    }

    /// True when no constraint is set
    pub fn is_unset(&self) -> bool {
        *self == Self::default()
    }

    /// Whether a single student satisfies every active constraint
    pub fn matches(&self, student: &Student) -> bool {
        self.matches_search(student)
            && self.class.as_ref().map_or(true, |c| &student.class == c)
            && self.section.as_ref().map_or(true, |s| &student.section == s)
            && self.fees_status.map_or(true, |s| student.fees_status == s)
            && self.arrears.matches(student)
    }

    fn matches_search(&self, student: &Student) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        student.id.as_str().to_lowercase().contains(&needle)
            || student.name.to_lowercase().contains(&needle)
            || student.email.to_lowercase().contains(&needle)
    }
}

/// Students matching `filter`, in their original order
pub fn filter_students<'s>(students: &'s [Student], filter: &StudentFilter) -> Vec<&'s Student> {
    students.iter().filter(|s| filter.matches(s)).collect()
}

/// Distinct classes present in a roster, sorted
pub fn class_options(students: &[Student]) -> Vec<String> {
    students
        .iter()
        .map(|s| s.class.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct sections present in a roster, sorted
pub fn section_options(students: &[Student]) -> Vec<String> {
    students
        .iter()
        .map(|s| s.section.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Input for enrolling a new student
#[derive(Debug, Clone)]
pub struct CreateStudentInput {
    pub id: StudentId,
    pub name: String,
    pub gender: Gender,
    pub class: String,
    pub section: String,
    pub date_of_birth: NaiveDate,
    pub guardian: Guardian,
    pub address: String,
    pub mobile: String,
    pub email: String,
    pub arrears: Money,
    pub optional_fees: Vec<String>,
    pub enrolled_term: Option<TermId>,
}

/// Changes to an enrolled student; `None` leaves a field as it is
#[derive(Debug, Clone, Default)]
pub struct UpdateStudentInput {
    pub name: Option<String>,
    pub gender: Option<Gender>,
    pub class: Option<String>,
    pub section: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub guardian: Option<Guardian>,
    pub address: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub fees_status: Option<FeesStatus>,
    pub arrears: Option<Money>,
    pub optional_fees: Option<Vec<String>>,
}

impl UpdateStudentInput {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.gender.is_none()
            && self.class.is_none()
            && self.section.is_none()
            && self.date_of_birth.is_none()
            && self.guardian.is_none()
            && self.address.is_none()
            && self.mobile.is_none()
            && self.email.is_none()
            && self.fees_status.is_none()
            && self.arrears.is_none()
            && self.optional_fees.is_none()
    }
}

/// Service for the student roster
pub struct RosterService<'a> {
    storage: &'a Storage,
}

impl<'a> RosterService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// List students matching a filter, in roll order
    pub fn list(&self, filter: &StudentFilter) -> FeeDeskResult<Vec<Student>> {
        let students = self.storage.students.get_all()?;
        Ok(filter_students(&students, filter)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn get(&self, id: &StudentId) -> FeeDeskResult<Option<Student>> {
        self.storage.students.get(id)
    }

    /// Get a student by roll number, failing if there is none
    pub fn find(&self, id: &str) -> FeeDeskResult<Student> {
        self.storage
            .students
            .get(&StudentId::new(id))?
            .ok_or_else(|| FeeDeskError::student_not_found(id))
    }

    pub fn class_options(&self) -> FeeDeskResult<Vec<String>> {
        Ok(class_options(&self.storage.students.get_all()?))
    }

    pub fn section_options(&self) -> FeeDeskResult<Vec<String>> {
        Ok(section_options(&self.storage.students.get_all()?))
    }

    /// Enrol a new student at the end of the roll
    pub fn add(&self, input: CreateStudentInput) -> FeeDeskResult<Student> {
        if self.storage.students.exists(&input.id)? {
            return Err(FeeDeskError::Duplicate {
                entity_type: "Student",
                identifier: input.id.to_string(),
            });
        }

        let optional_fees = self.resolve_optional_fees(&input.optional_fees)?;

        if let Some(term_id) = &input.enrolled_term {
            if !self.storage.terms.exists(term_id)? {
                return Err(FeeDeskError::term_not_found(term_id.as_str()));
            }
        }

        let mut student = Student::new(
            input.id,
            input.name.trim(),
            input.gender,
            input.class.trim(),
            input.section.trim(),
            input.date_of_birth,
        );
        student.guardian = input.guardian;
        student.address = input.address;
        student.mobile = input.mobile;
        student.email = input.email.trim().to_string();
        student.arrears = input.arrears;
        student.optional_fees = optional_fees;
        student.enrolled_term = input.enrolled_term;

        student
            .validate()
            .map_err(|e| FeeDeskError::Validation(e.to_string()))?;

        self.storage.students.upsert(student.clone())?;
        self.storage.students.save()?;

        self.storage.log_create(
            EntityType::Student,
            student.id.to_string(),
            Some(student.name.clone()),
            &student,
        )?;

        Ok(student)
    }

    /// Apply changes to an enrolled student
    pub fn update(&self, id: &str, changes: UpdateStudentInput) -> FeeDeskResult<Student> {
        let before = self.find(id)?;
        let mut student = before.clone();

        if let Some(name) = changes.name {
            student.name = name.trim().to_string();
        }
        if let Some(gender) = changes.gender {
            student.gender = gender;
        }
        if let Some(class) = changes.class {
            student.class = class.trim().to_string();
        }
        if let Some(section) = changes.section {
            student.section = section.trim().to_string();
        }
        if let Some(date_of_birth) = changes.date_of_birth {
            student.date_of_birth = date_of_birth;
        }
        if let Some(guardian) = changes.guardian {
            student.guardian = guardian;
        }
        if let Some(address) = changes.address {
            student.address = address;
        }
        if let Some(mobile) = changes.mobile {
            student.mobile = mobile;
        }
        if let Some(email) = changes.email {
            student.email = email.trim().to_string();
        }
        if let Some(fees_status) = changes.fees_status {
            student.fees_status = fees_status;
        }
        if let Some(arrears) = changes.arrears {
            student.arrears = arrears;
        }
        if let Some(optional_fees) = changes.optional_fees {
            student.optional_fees = self.resolve_optional_fees(&optional_fees)?;
        }

        student
            .validate()
            .map_err(|e| FeeDeskError::Validation(e.to_string()))?;

        if student == before {
            return Ok(student);
        }

        self.storage.students.upsert(student.clone())?;
        self.storage.students.save()?;

        self.storage.log_update(
            EntityType::Student,
            student.id.to_string(),
            Some(student.name.clone()),
            &before,
            &student,
        )?;

        Ok(student)
    }

    /// Remove a student from the roll
    ///
    /// Students with recorded payments are kept so receipts stay traceable.
    pub fn delete(&self, id: &str) -> FeeDeskResult<Student> {
        let student = self.find(id)?;

        let payments = self.storage.payments.get_by_student(&student.id)?;
        if !payments.is_empty() {
            return Err(FeeDeskError::Validation(format!(
                "Cannot delete student {} ({}): {} payment(s) are recorded against them",
                student.id,
                student.name,
                payments.len()
            )));
        }

        self.storage.students.delete(&student.id)?;
        self.storage.students.save()?;

        self.storage.log_delete(
            EntityType::Student,
            student.id.to_string(),
            Some(student.name.clone()),
            &student,
        )?;

        Ok(student)
    }

    /// Optional fees must name non-required items of the fee structure
    fn resolve_optional_fees(&self, names: &[String]) -> FeeDeskResult<Vec<String>> {
        let mut optional_fees = Vec::with_capacity(names.len());
        for name in names {
            let fee = self
                .storage
                .fees
                .get_by_name(name)?
                .ok_or_else(|| FeeDeskError::fee_not_found(name.as_str()))?;
            if fee.required {
                return Err(FeeDeskError::Validation(format!(
                    "'{}' is charged to every student and cannot be selected as optional",
                    fee.name
                )));
            }
            if !optional_fees.contains(&fee.name) {
                optional_fees.push(fee.name);
            }
        }
        Ok(optional_fees)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FeeDeskPaths;
    use crate::storage::initialize_storage;
    use tempfile::TempDir;

    fn dob() -> NaiveDate {
        NaiveDate::from_ymd_opt(2010, 3, 10).unwrap()
    }

    fn student(id: &str, name: &str, class: &str, section: &str) -> Student {
        let mut s = Student::new(id, name, Gender::Male, class, section, dob());
        s.email = "ndisons@gmail.com".into();
        s
    }

    /// The console's sample roster
    fn roster() -> Vec<Student> {
        let mut students = vec![
            student("2901", "Richi Rozario", "1", "A"),
            student("2902", "Kazi Fahim", "2", "B"),
            student("2903", "Richi Rozario", "1", "A"),
            student("2904", "Kazi Fahim", "2", "B"),
            student("2905", "Richi Rozario", "1", "C"),
        ];
        students[0].fees_status = FeesStatus::Paid;
        students[1].fees_status = FeesStatus::Partial;
        students[1].arrears = Money::from_units(150);
        students[2].fees_status = FeesStatus::Pending;
        students[2].arrears = Money::from_units(320);
        students[3].fees_status = FeesStatus::Paid;
        students[4].fees_status = FeesStatus::Paid;
        students
    }

    fn ids(students: &[&Student]) -> Vec<String> {
        students.iter().map(|s| s.id.to_string()).collect()
    }

    #[test]
    fn test_arrears_filter_parse() {
        assert_eq!(ArrearsFilter::parse("with"), Some(ArrearsFilter::WithArrears));
        assert_eq!(ArrearsFilter::parse("None"), Some(ArrearsFilter::WithoutArrears));
        assert_eq!(ArrearsFilter::parse("all"), Some(ArrearsFilter::Any));
        assert_eq!(ArrearsFilter::parse("some"), None);
    }

    #[test]
    fn test_unset_filter_returns_everyone_in_order() {
        let students = roster();
        let filter = StudentFilter::new();
        assert!(filter.is_unset());

        let result = filter_students(&students, &filter);
        assert_eq!(ids(&result), vec!["2901", "2902", "2903", "2904", "2905"]);
    }

    #[test]
    fn test_search_kazi() {
        let students = roster();
        let result = filter_students(&students, &StudentFilter::new().search("kazi"));
        assert_eq!(ids(&result), vec!["2902", "2904"]);
    }

    #[test]
    fn test_search_matches_id_name_and_email_only() {
        let mut students = roster();
        students[4].email = "rozario.family@example.com".into();
        students[3].address = "Kazi Road".into();

        for needle in ["290", "RICHI", "example.com", "zz-none", "road"] {
            let filter = StudentFilter::new().search(needle);
            let included = filter_students(&students, &filter);
            let lower = needle.to_lowercase();
            for s in &students {
                let hit = s.id.as_str().to_lowercase().contains(&lower)
                    || s.name.to_lowercase().contains(&lower)
                    || s.email.to_lowercase().contains(&lower);
                assert_eq!(included.iter().any(|i| i.id == s.id), hit, "{}", needle);
            }
        }
    }

    #[test]
    fn test_class_section_and_status_are_exact() {
        let students = roster();

        let by_class = filter_students(&students, &StudentFilter::new().class("1"));
        assert_eq!(ids(&by_class), vec!["2901", "2903", "2905"]);

        let by_both = StudentFilter::new().class("1").section("A");
        assert_eq!(ids(&filter_students(&students, &by_both)), vec!["2901", "2903"]);

        let paid = StudentFilter::new().fees_status(FeesStatus::Paid);
        assert_eq!(
            ids(&filter_students(&students, &paid)),
            vec!["2901", "2904", "2905"]
        );

        // An empty selection is no constraint
        assert!(StudentFilter::new().class("").section("  ").is_unset());
    }

    #[test]
    fn test_arrears_partition() {
        let students = roster();

        let with = filter_students(
            &students,
            &StudentFilter::new().arrears(ArrearsFilter::WithArrears),
        );
        let without = filter_students(
            &students,
            &StudentFilter::new().arrears(ArrearsFilter::WithoutArrears),
        );

        assert_eq!(ids(&with), vec!["2902", "2903"]);
        assert!(with.iter().all(|s| s.arrears.is_positive()));
        assert_eq!(with.len() + without.len(), students.len());
        assert!(without.iter().all(|s| s.arrears.is_zero()));
    }

    #[test]
    fn test_filters_compose() {
        let students = roster();
        let f1 = StudentFilter::new().search("richi");
        let f2 = StudentFilter::new().section("A").arrears(ArrearsFilter::WithoutArrears);
        let both = StudentFilter::new()
            .search("richi")
            .section("A")
            .arrears(ArrearsFilter::WithoutArrears);

        let combined = ids(&filter_students(&students, &both));

        let first: Vec<Student> = filter_students(&students, &f1).into_iter().cloned().collect();
        let chained = ids(&filter_students(&first, &f2));

        let reversed_first: Vec<Student> =
            filter_students(&students, &f2).into_iter().cloned().collect();
        let reversed = ids(&filter_students(&reversed_first, &f1));

        assert_eq!(combined, vec!["2901"]);
        assert_eq!(combined, chained);
        assert_eq!(combined, reversed);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let students = roster();
        let filter = StudentFilter::new().class("1").search("kazi");
        assert!(filter_students(&students, &filter).is_empty());
    }

    #[test]
    fn test_options_are_distinct_and_sorted() {
        let students = roster();
        assert_eq!(class_options(&students), vec!["1", "2"]);
        assert_eq!(section_options(&students), vec!["A", "B", "C"]);
    }

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FeeDeskPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn input(id: &str) -> CreateStudentInput {
        CreateStudentInput {
            id: StudentId::new(id),
            name: "Tatenda Moyo".into(),
            gender: Gender::Male,
            class: "3".into(),
            section: "A".into(),
            date_of_birth: dob(),
            guardian: Guardian::new("Rudo Moyo", crate::models::Relationship::Mother),
            address: String::new(),
            mobile: String::new(),
            email: "tatenda@example.com".into(),
            arrears: Money::zero(),
            optional_fees: vec!["boarding fee".into()],
            enrolled_term: Some(TermId::from_parts(1, 2025)),
        }
    }

    #[test]
    fn test_add_student_appends_to_roll() {
        let (_temp_dir, storage) = create_test_storage();
        let service = RosterService::new(&storage);

        let student = service.add(input("2906")).unwrap();
        assert_eq!(student.optional_fees, vec!["Boarding Fee"]);

        let all = service.list(&StudentFilter::new()).unwrap();
        assert_eq!(all.last().unwrap().id.as_str(), "2906");
        assert_eq!(storage.audit().entry_count().unwrap(), 1);
    }

    #[test]
    fn test_add_student_rejects_bad_input() {
        let (_temp_dir, storage) = create_test_storage();
        let service = RosterService::new(&storage);

        let dup = service.add(input("2901")).unwrap_err();
        assert!(matches!(dup, FeeDeskError::Duplicate { .. }));

        let mut required = input("2907");
        required.optional_fees = vec!["Tuition Fee".into()];
        assert!(service.add(required).unwrap_err().is_validation());

        let mut unknown_term = input("2908");
        unknown_term.enrolled_term = Some(TermId::new("term9-1999"));
        assert!(service.add(unknown_term).unwrap_err().is_not_found());

        let mut no_name = input("2909");
        no_name.name = "  ".into();
        assert!(service.add(no_name).unwrap_err().is_validation());
    }

    #[test]
    fn test_find() {
        let (_temp_dir, storage) = create_test_storage();
        let service = RosterService::new(&storage);

        assert_eq!(service.find("2902").unwrap().name, "Kazi Fahim");
        assert!(service.find("9999").unwrap_err().is_not_found());
        assert_eq!(service.class_options().unwrap(), vec!["1", "2"]);
    }

    #[test]
    fn test_update_student() {
        let (_temp_dir, storage) = create_test_storage();
        let service = RosterService::new(&storage);

        let updated = service
            .update(
                "2904",
                UpdateStudentInput {
                    section: Some(" C ".into()),
                    arrears: Some(Money::from_units(75)),
                    optional_fees: Some(vec!["school uniform".into(), "School Uniform".into()]),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.section, "C");
        assert_eq!(updated.arrears, Money::from_units(75));
        assert_eq!(updated.optional_fees, vec!["School Uniform"]);

        let entry = &storage.audit().read_all().unwrap()[0];
        assert_eq!(entry.operation, crate::audit::Operation::Update);
        assert!(entry.diff_summary.as_deref().unwrap().contains("section"));

        // Roll position is kept
        let ids: Vec<String> = service
            .list(&StudentFilter::new())
            .unwrap()
            .iter()
            .map(|s| s.id.to_string())
            .collect();
        assert_eq!(ids, vec!["2901", "2902", "2903", "2904", "2905"]);
    }

    #[test]
    fn test_update_student_rejects_bad_changes() {
        let (_temp_dir, storage) = create_test_storage();
        let service = RosterService::new(&storage);

        let negative = UpdateStudentInput {
            arrears: Some(Money::from_units(-1)),
            ..Default::default()
        };
        assert!(service.update("2901", negative).unwrap_err().is_validation());

        let required = UpdateStudentInput {
            optional_fees: Some(vec!["Tuition Fee".into()]),
            ..Default::default()
        };
        assert!(service.update("2901", required).unwrap_err().is_validation());

        let missing = service.update("9999", UpdateStudentInput::default());
        assert!(missing.unwrap_err().is_not_found());

        // Unchanged records write no audit entry
        let same = UpdateStudentInput {
            name: Some("Richi Rozario".into()),
            ..Default::default()
        };
        service.update("2901", same).unwrap();
        assert_eq!(storage.audit().entry_count().unwrap(), 0);
        assert_eq!(service.find("2901").unwrap().arrears, Money::zero());
    }

    #[test]
    fn test_delete_student() {
        let (_temp_dir, storage) = create_test_storage();
        let service = RosterService::new(&storage);

        service.add(input("2906")).unwrap();
        let removed = service.delete("2906").unwrap();
        assert_eq!(removed.name, "Tatenda Moyo");
        assert!(service.find("2906").unwrap_err().is_not_found());

        let entries = storage.audit().read_all().unwrap();
        let last = entries.last().unwrap();
        assert_eq!(last.operation, crate::audit::Operation::Delete);
        assert_eq!(last.entity_id, "2906");
    }

    #[test]
    fn test_delete_student_with_payments_is_refused() {
        let (_temp_dir, storage) = create_test_storage();
        let service = RosterService::new(&storage);

        let err = service.delete("2902").unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("3 payment(s)"));
        assert!(service.find("2902").is_ok());
        assert_eq!(storage.students.count().unwrap(), 5);

        assert!(service.delete("9999").unwrap_err().is_not_found());
    }
}
