//! Todo model and its write payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::errors::{AppError, FieldErrors};

/// Priority level of a todo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "todo_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// Todo row. Every field is visible to its owner, so the full row serializes.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Todo {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payload. The server assigns id, owner, and `completed = false`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTodo {
    #[validate(length(
        min = 1,
        max = 255,
        message = "title is required and must be at most 255 characters"
    ))]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl CreateTodo {
    /// Derive constraints plus the date-range invariant, collected per field.
    pub fn validate_fields(&self) -> Result<(), AppError> {
        collect_field_errors(self.validate(), self.start_date, self.end_date).into_result()
    }
}

/// Update payload — the full editable field set plus an optional completion flag.
/// `id`, `user_id`, and `created_at` are never client-writable.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTodo {
    #[validate(length(
        min = 1,
        max = 255,
        message = "title is required and must be at most 255 characters"
    ))]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub completed: Option<bool>,
}

impl UpdateTodo {
    /// Derive constraints plus the date-range invariant, collected per field.
    pub fn validate_fields(&self) -> Result<(), AppError> {
        collect_field_errors(self.validate(), self.start_date, self.end_date).into_result()
    }
}

/// Merge derive-level errors with the `end_date >= start_date` check.
fn collect_field_errors(
    derive_result: Result<(), validator::ValidationErrors>,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
) -> FieldErrors {
    let mut fields = derive_result.err().map(FieldErrors::from).unwrap_or_default();
    if end_date < start_date {
        fields.push("end_date", "end date must be on or after start date");
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn valid_create() -> CreateTodo {
        CreateTodo {
            title: "Write report".to_string(),
            description: None,
            priority: Priority::Medium,
            start_date: date(2025, 5, 5),
            end_date: date(2025, 5, 10),
        }
    }

    #[test]
    fn priority_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"high\"");
        let parsed: Priority = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(parsed, Priority::Low);
    }

    #[test]
    fn priority_defaults_to_medium() {
        assert_eq!(Priority::default(), Priority::Medium);

        // Omitted priority in a create payload falls back to medium.
        let input: CreateTodo = serde_json::from_str(
            r#"{"title": "t", "start_date": "2025-05-05T12:00:00Z", "end_date": "2025-05-06T12:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(input.priority, Priority::Medium);
    }

    #[test]
    fn unknown_priority_is_rejected_at_parse_time() {
        let result = serde_json::from_str::<Priority>("\"urgent\"");
        assert!(result.is_err());
    }

    #[test]
    fn valid_payload_passes() {
        assert!(valid_create().validate_fields().is_ok());
    }

    #[test]
    fn empty_title_rejected() {
        let input = CreateTodo {
            title: String::new(),
            ..valid_create()
        };
        let err = input.validate_fields().unwrap_err();
        match err {
            AppError::Validation(fields) => assert!(fields.get("title").is_some()),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn overlong_title_rejected() {
        let input = CreateTodo {
            title: "x".repeat(256),
            ..valid_create()
        };
        assert!(input.validate_fields().is_err());
    }

    #[test]
    fn end_before_start_rejected_on_end_date_field() {
        let input = CreateTodo {
            start_date: date(2025, 5, 10),
            end_date: date(2025, 5, 5),
            ..valid_create()
        };
        let err = input.validate_fields().unwrap_err();
        match err {
            AppError::Validation(fields) => {
                assert_eq!(
                    fields.get("end_date").unwrap()[0],
                    "end date must be on or after start date"
                );
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn equal_start_and_end_allowed() {
        let input = CreateTodo {
            start_date: date(2025, 5, 5),
            end_date: date(2025, 5, 5),
            ..valid_create()
        };
        assert!(input.validate_fields().is_ok());
    }

    #[test]
    fn update_collects_all_offending_fields() {
        let input = UpdateTodo {
            title: String::new(),
            description: None,
            priority: Priority::Low,
            start_date: date(2025, 5, 10),
            end_date: date(2025, 5, 5),
            completed: Some(true),
        };
        let err = input.validate_fields().unwrap_err();
        match err {
            AppError::Validation(fields) => {
                assert!(fields.get("title").is_some());
                assert!(fields.get("end_date").is_some());
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
