//! Student model
//!
//! A student on the school roll, with guardian contact details and the fee
//! standing recorded at enrolment.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{StudentId, TermId};
use super::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Some(Self::Male),
            "female" | "f" => Some(Self::Female),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        };
        f.pad(label)
    }
}

/// Fee standing of a student as recorded on the roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeesStatus {
    Paid,
    Partial,
    #[default]
    Pending,
}

impl FeesStatus {
    pub fn all() -> [FeesStatus; 3] {
        [Self::Paid, Self::Partial, Self::Pending]
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "paid" => Some(Self::Paid),
            "partial" => Some(Self::Partial),
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }
}

impl fmt::Display for FeesStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Paid => "Paid",
            Self::Partial => "Partial",
            Self::Pending => "Pending",
        };
        f.pad(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    Father,
    Mother,
    #[default]
    Guardian,
    Other,
}

impl Relationship {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "father" => Some(Self::Father),
            "mother" => Some(Self::Mother),
            "guardian" => Some(Self::Guardian),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Father => "Father",
            Self::Mother => "Mother",
            Self::Guardian => "Guardian",
            Self::Other => "Other",
        };
        f.pad(label)
    }
}

/// Parent or guardian responsible for a student
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Guardian {
    pub name: String,

    #[serde(default)]
    pub relationship: Relationship,

    #[serde(default)]
    pub mobile: String,

    #[serde(default)]
    pub email: String,
}

impl Guardian {
    pub fn new(name: impl Into<String>, relationship: Relationship) -> Self {
        Self {
            name: name.into(),
            relationship,
            mobile: String::new(),
            email: String::new(),
        }
    }
}

/// A student on the roll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Roll number, unique and stable
    pub id: StudentId,

    pub name: String,

    pub gender: Gender,

    pub guardian: Guardian,

    /// Class (grade or form), e.g. "1" or "Form 3"
    pub class: String,

    pub section: String,

    #[serde(default)]
    pub address: String,

    pub date_of_birth: NaiveDate,

    #[serde(default)]
    pub mobile: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub fees_status: FeesStatus,

    /// Overdue amount carried from earlier billing cycles (never negative)
    #[serde(default)]
    pub arrears: Money,

    /// Names of optional fee items the student is enrolled in
    #[serde(default)]
    pub optional_fees: Vec<String>,

    /// Term of enrolment; once-off fees are billed in this term
    #[serde(default)]
    pub enrolled_term: Option<TermId>,
}

impl Student {
    /// Create a student with the required fields; everything else defaults
    pub fn new(
        id: impl Into<StudentId>,
        name: impl Into<String>,
        gender: Gender,
        class: impl Into<String>,
        section: impl Into<String>,
        date_of_birth: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            gender,
            guardian: Guardian::default(),
            class: class.into(),
            section: section.into(),
            address: String::new(),
            date_of_birth,
            mobile: String::new(),
            email: String::new(),
            fees_status: FeesStatus::default(),
            arrears: Money::zero(),
            optional_fees: Vec::new(),
            enrolled_term: None,
        }
    }

    pub fn has_arrears(&self) -> bool {
        self.arrears.is_positive()
    }

    /// Whether the student takes the named optional fee (case-insensitive)
    pub fn takes_optional_fee(&self, fee_name: &str) -> bool {
        self.optional_fees
            .iter()
            .any(|name| name.eq_ignore_ascii_case(fee_name))
    }

    /// Class and section joined the way rosters print them, e.g. "Form 4B"
    pub fn class_label(&self) -> String {
        format!("{}{}", self.class, self.section)
    }

    pub fn validate(&self) -> Result<(), StudentValidationError> {
        if self.id.is_empty() {
            return Err(StudentValidationError::EmptyId);
        }
        if self.name.trim().is_empty() {
            return Err(StudentValidationError::EmptyName);
        }
        if self.class.trim().is_empty() {
            return Err(StudentValidationError::EmptyClass);
        }
        if self.arrears.is_negative() {
            return Err(StudentValidationError::NegativeArrears(self.arrears));
        }
        if !self.email.is_empty() && !self.email.contains('@') {
            return Err(StudentValidationError::InvalidEmail(self.email.clone()));
        }
        Ok(())
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.id, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentValidationError {
    EmptyId,
    EmptyName,
    EmptyClass,
    NegativeArrears(Money),
    InvalidEmail(String),
}

impl fmt::Display for StudentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "Student ID cannot be empty"),
            Self::EmptyName => write!(f, "Student name cannot be empty"),
            Self::EmptyClass => write!(f, "Student class cannot be empty"),
            Self::NegativeArrears(amount) => {
                write!(f, "Arrears cannot be negative: {}", amount)
            }
            Self::InvalidEmail(email) => write!(f, "Invalid email address: {}", email),
        }
    }
}

impl std::error::Error for StudentValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn dob() -> NaiveDate {
        NaiveDate::from_ymd_opt(2010, 3, 10).unwrap()
    }

    #[test]
    fn test_new_student_defaults() {
        let student = Student::new("2901", "Richi Rozario", Gender::Female, "1", "A", dob());
        assert_eq!(student.fees_status, FeesStatus::Pending);
        assert!(!student.has_arrears());
        assert_eq!(student.class_label(), "1A");
        assert!(student.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let mut student = Student::new("2901", " ", Gender::Male, "1", "A", dob());
        assert_eq!(student.validate(), Err(StudentValidationError::EmptyName));

        student.name = "Kazi Fahim".into();
        student.arrears = Money::from_units(-5);
        assert!(matches!(
            student.validate(),
            Err(StudentValidationError::NegativeArrears(_))
        ));

        student.arrears = Money::zero();
        student.email = "not-an-email".into();
        assert!(matches!(
            student.validate(),
            Err(StudentValidationError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_optional_fee_lookup() {
        let mut student = Student::new("2902", "Kazi Fahim", Gender::Male, "2", "B", dob());
        student.optional_fees.push("Boarding Fee".into());
        assert!(student.takes_optional_fee("boarding fee"));
        assert!(!student.takes_optional_fee("School Uniform"));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(FeesStatus::parse("PAID"), Some(FeesStatus::Paid));
        assert_eq!(FeesStatus::parse("unknown"), None);
        assert_eq!(Gender::parse("f"), Some(Gender::Female));
        assert_eq!(Relationship::parse("Mother"), Some(Relationship::Mother));
    }

    #[test]
    fn test_serialization() {
        let student = Student::new("2903", "Richi Rozario", Gender::Female, "1", "A", dob());
        let json = serde_json::to_string(&student).unwrap();
        let back: Student = serde_json::from_str(&json).unwrap();
        assert_eq!(back, student);
    }
}
