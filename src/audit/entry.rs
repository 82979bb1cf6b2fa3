//! Audit entry data structures
//!
//! Defines the operation and entity types recorded in the audit log and the
//! entry format itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// Types of records that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Student,
    FeeItem,
    Payment,
    Term,
    User,
}

impl EntityType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "student" => Some(Self::Student),
            "fee" | "feeitem" => Some(Self::FeeItem),
            "payment" | "receipt" => Some(Self::Payment),
            "term" => Some(Self::Term),
            "user" => Some(Self::User),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Student => write!(f, "Student"),
            EntityType::FeeItem => write!(f, "FeeItem"),
            EntityType::Payment => write!(f, "Payment"),
            EntityType::Term => write!(f, "Term"),
            EntityType::User => write!(f, "User"),
        }
    }
}

/// A single audit log entry
///
/// Records one operation on a record with optional before/after snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    /// Roll number, receipt number, term id or generated id
    pub entity_id: String,

    /// Human-readable label (e.g., student name)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    /// Human-readable diff summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    /// Create a new audit entry for a create operation
    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Create,
            entity_type,
            entity_id: entity_id.into(),
            entity_name,
            before: None,
            after: serde_json::to_value(entity).ok(),
            diff_summary: None,
        }
    }

    /// Create a new audit entry for an update operation
    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Update,
            entity_type,
            entity_id: entity_id.into(),
            entity_name,
            before: serde_json::to_value(before).ok(),
            after: serde_json::to_value(after).ok(),
            diff_summary,
        }
    }

    /// Create a new audit entry for a delete operation, keeping the removed record
    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Delete,
            entity_type,
            entity_id: entity_id.into(),
            entity_name,
            before: serde_json::to_value(entity).ok(),
            after: None,
            diff_summary: None,
        }
    }

    /// Whether this entry is about the given record type (and id, if given)
    ///
    /// Ids compare case-insensitively; receipt numbers and roll numbers are
    /// typed by hand.
    pub fn concerns(&self, entity_type: EntityType, entity_id: Option<&str>) -> bool {
        self.entity_type == entity_type
            && entity_id.map_or(true, |id| self.entity_id.eq_ignore_ascii_case(id.trim()))
    }

    /// Format the entry as a single line (plus changes, if any)
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entity_type_display() {
        assert_eq!(EntityType::Student.to_string(), "Student");
        assert_eq!(EntityType::FeeItem.to_string(), "FeeItem");
        assert_eq!(Operation::Update.to_string(), "UPDATE");
    }

    #[test]
    fn test_entity_type_parse() {
        assert_eq!(EntityType::parse("fee-item"), Some(EntityType::FeeItem));
        assert_eq!(EntityType::parse("Receipt"), Some(EntityType::Payment));
        assert_eq!(EntityType::parse("account"), None);
    }

    #[test]
    fn test_concerns() {
        let entry = AuditEntry::create(EntityType::Payment, "RC-2025-0116", None, &json!({}));
        assert!(entry.concerns(EntityType::Payment, None));
        assert!(entry.concerns(EntityType::Payment, Some("rc-2025-0116")));
        assert!(!entry.concerns(EntityType::Payment, Some("RC-2025-0117")));
        assert!(!entry.concerns(EntityType::Student, None));
    }

    #[test]
    fn test_create_entry() {
        let data = json!({"id": "2901", "name": "Richi Rozario"});
        let entry = AuditEntry::create(
            EntityType::Student,
            "2901",
            Some("Richi Rozario".to_string()),
            &data,
        );

        assert_eq!(entry.operation, Operation::Create);
        assert_eq!(entry.entity_type, EntityType::Student);
        assert!(entry.before.is_none());
        assert!(entry.after.is_some());
    }

    #[test]
    fn test_update_entry() {
        let before = json!({"status": "pending"});
        let after = json!({"status": "verified"});

        let entry = AuditEntry::update(
            EntityType::Payment,
            "RC-2025-0116",
            None,
            &before,
            &after,
            Some("status: \"pending\" -> \"verified\"".to_string()),
        );

        assert_eq!(entry.operation, Operation::Update);
        assert!(entry.before.is_some());
        assert!(entry.diff_summary.unwrap().contains("verified"));
    }

    #[test]
    fn test_delete_entry_keeps_removed_record() {
        let entry = AuditEntry::delete(
            EntityType::Student,
            "2905",
            Some("Richi Rozario".to_string()),
            &json!({"id": "2905"}),
        );

        assert_eq!(entry.operation, Operation::Delete);
        assert_eq!(entry.before.as_ref().unwrap()["id"], "2905");
        assert!(entry.after.is_none());
        assert!(entry
            .format_human_readable()
            .contains("DELETE Student 2905"));
    }

    #[test]
    fn test_serialization() {
        let entry = AuditEntry::create(EntityType::FeeItem, "fee-1234", None, &json!({}));
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"fee_item\""));

        let deserialized: AuditEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.entity_type, EntityType::FeeItem);
    }

    #[test]
    fn test_human_readable_format() {
        let entry = AuditEntry::create(
            EntityType::Term,
            "term2-2025",
            Some("Term 2, 2025".to_string()),
            &json!({"number": 2}),
        );

        let formatted = entry.format_human_readable();
        assert!(formatted.contains("CREATE Term term2-2025 (Term 2, 2025)"));
    }
}
