//! Error type for the document boundary.
//!
//! Scheduling itself never fails: bad dates and dangling references degrade
//! into logged fallbacks and [`Diagnostic`](crate::models::Diagnostic)s.
//! Only loading, migrating and strictly validating documents return errors.

use crate::validation::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum GanttError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid date in {field}: {value:?}")]
    InvalidDate { field: String, value: String },

    #[error("Validation failed with {} problem(s)", .0.len())]
    Validation(Vec<ValidationError>),

    #[error("Unsupported document version {found} (latest supported is {supported})")]
    UnsupportedVersion { found: u64, supported: u64 },

    #[error("Malformed document: {0}")]
    Malformed(String),
}

impl From<Vec<ValidationError>> for GanttError {
    fn from(errors: Vec<ValidationError>) -> Self {
        GanttError::Validation(errors)
    }
}

pub type Result<T> = std::result::Result<T, GanttError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_display() {
        let err = GanttError::InvalidDate {
            field: "today".into(),
            value: "31/02".into(),
        };
        assert_eq!(err.to_string(), "Invalid date in today: \"31/02\"");

        let err: GanttError = vec![ValidationError {
            kind: ValidationErrorKind::DuplicateId,
            message: "x".into(),
        }]
        .into();
        assert_eq!(err.to_string(), "Validation failed with 1 problem(s)");
    }

    #[test]
    fn test_json_conversion() {
        let err: GanttError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, GanttError::Json(_)));
    }
}
