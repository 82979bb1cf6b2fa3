//! Strongly-typed ID wrappers for all entity types
//!
//! Using newtype wrappers prevents accidentally mixing up IDs from different
//! entity types at compile time. Students, receipts and terms carry the
//! human-readable codes the school already uses ("2901", "RC-2025-0122",
//! "term1-2025"); fee items and users get generated UUIDs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Macro to generate UUID-backed ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, &self.0.to_string()[..8])
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

/// Macro to generate code-backed ID newtype wrappers
macro_rules! define_code {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing code, trimming surrounding whitespace
            pub fn new(code: impl Into<String>) -> Self {
                Self(code.into().trim().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(code: &str) -> Self {
                Self::new(code)
            }
        }

        impl From<String> for $name {
            fn from(code: String) -> Self {
                Self::new(code)
            }
        }
    };
}

define_id!(FeeItemId, "fee-");
define_id!(UserId, "usr-");

define_code!(StudentId);
define_code!(ReceiptNo);
define_code!(TermId);

impl ReceiptNo {
    /// Build a receipt number from its year and sequence, e.g. "RC-2025-0122"
    pub fn from_parts(year: i32, sequence: u32) -> Self {
        Self(format!("RC-{}-{:04}", year, sequence))
    }

    /// Split a receipt number back into (year, sequence)
    pub fn parts(&self) -> Option<(i32, u32)> {
        let rest = self.0.strip_prefix("RC-")?;
        let (year, sequence) = rest.split_once('-')?;
        Some((year.parse().ok()?, sequence.parse().ok()?))
    }
}

impl TermId {
    /// Build a term slug, e.g. "term1-2025"
    pub fn from_parts(number: u8, year: i32) -> Self {
        Self(format!("term{}-{}", number, year))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_id_display() {
        let id = UserId::new();
        let display = format!("{}", id);
        assert!(display.starts_with("usr-"));
        assert_eq!(display.len(), 12);
    }

    #[test]
    fn test_uuid_id_parse() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id: FeeItemId = uuid_str.parse().unwrap();
        assert_eq!(id.as_uuid().to_string(), uuid_str);
    }

    #[test]
    fn test_code_trims() {
        let id = StudentId::new("  2901 ");
        assert_eq!(id.as_str(), "2901");
        assert_eq!(id, StudentId::from("2901"));
    }

    #[test]
    fn test_receipt_parts() {
        let receipt = ReceiptNo::from_parts(2025, 122);
        assert_eq!(receipt.as_str(), "RC-2025-0122");
        assert_eq!(receipt.parts(), Some((2025, 122)));
        assert_eq!(ReceiptNo::new("bogus").parts(), None);
    }

    #[test]
    fn test_term_id() {
        assert_eq!(TermId::from_parts(1, 2025).as_str(), "term1-2025");
    }

    #[test]
    fn test_code_serialization() {
        let id = StudentId::new("2902");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"2902\"");
        let back: StudentId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
