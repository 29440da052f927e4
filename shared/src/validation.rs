//! Input validation helpers
//!
//! Form-level rules checked before anything is sent to the backend.
//! A failure names the offending field so the caller can surface it inline.

use serde::Serialize;
use thiserror::Error;

use crate::models::{MaterialRequestLine, ScheduleStatus};

/// Remarks and resolution notes
pub const MAX_REMARK_LEN: usize = 500;

/// Field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::new(field, format!("{field} must not be empty")));
    }
    if value.chars().count() > max_len {
        return Err(FieldError::new(
            field,
            format!("{field} is too long ({} chars, max {max_len})", value.chars().count()),
        ));
    }
    Ok(())
}

/// A schedule moving to `PAUSED` or `COMPLETED` must explain why.
pub fn validate_schedule_transition(
    new_status: ScheduleStatus,
    remark: Option<&str>,
) -> Result<(), FieldError> {
    match remark {
        Some(text) if new_status.requires_remark() => {
            validate_required_text(text, "remark", MAX_REMARK_LEN)
        }
        None if new_status.requires_remark() => Err(FieldError::new(
            "remark",
            format!("remark is required when status is {new_status}"),
        )),
        Some(text) if text.chars().count() > MAX_REMARK_LEN => Err(FieldError::new(
            "remark",
            format!("remark is too long (max {MAX_REMARK_LEN})"),
        )),
        _ => Ok(()),
    }
}

/// Every line needs an item and a positive quantity; codes may not repeat.
pub fn validate_request_lines(lines: &[MaterialRequestLine]) -> Result<(), FieldError> {
    if lines.is_empty() {
        return Err(FieldError::new("items", "at least one item is required"));
    }
    for (idx, line) in lines.iter().enumerate() {
        if line.item_code.trim().is_empty() {
            return Err(FieldError::new(
                format!("items[{idx}].itemCode"),
                "item must be selected",
            ));
        }
        if line.quantity == 0 {
            return Err(FieldError::new(
                format!("items[{idx}].quantity"),
                "quantity must be greater than zero",
            ));
        }
        if lines[..idx].iter().any(|l| l.item_code == line.item_code) {
            return Err(FieldError::new(
                format!("items[{idx}].itemCode"),
                format!("{} is listed twice", line.item_code),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pause_without_remark_is_rejected() {
        let err = validate_schedule_transition(ScheduleStatus::Paused, Some("   ")).unwrap_err();
        assert_eq!(err.field, "remark");
        assert!(validate_schedule_transition(ScheduleStatus::Completed, None).is_err());
    }

    #[test]
    fn test_start_without_remark_is_fine() {
        assert!(validate_schedule_transition(ScheduleStatus::Started, None).is_ok());
        assert!(validate_schedule_transition(ScheduleStatus::Paused, Some("No parts")).is_ok());
    }

    #[test]
    fn test_overlong_remark_is_rejected_for_any_status() {
        let long = "x".repeat(MAX_REMARK_LEN + 1);
        assert!(validate_schedule_transition(ScheduleStatus::Started, Some(&long)).is_err());
    }

    #[test]
    fn test_request_lines() {
        let line = |code: &str, quantity| MaterialRequestLine {
            item_code: code.into(),
            quantity,
        };
        assert!(validate_request_lines(&[]).is_err());
        assert!(validate_request_lines(&[line("LAMP", 2)]).is_ok());

        let err = validate_request_lines(&[line("LAMP", 0)]).unwrap_err();
        assert_eq!(err.field, "items[0].quantity");

        let err = validate_request_lines(&[line("LAMP", 1), line("LAMP", 3)]).unwrap_err();
        assert_eq!(err.field, "items[1].itemCode");
    }
}
