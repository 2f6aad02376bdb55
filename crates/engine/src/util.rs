//! Internal helpers for input validation and normalization.
//!
//! These utilities are **not** part of the public API. They centralize
//! parsing of raw form values so every operation rejects bad input the same
//! way, before anything is written.

use chrono::NaiveDate;

use crate::{EngineError, ResultEngine};

pub(crate) const DESCRIPTION_MAX_CHARS: usize = 140;
pub(crate) const NAME_MAX_CHARS: usize = 80;

/// Parse an ISO `YYYY-MM-DD` date as sent by an HTML date input.
pub(crate) fn parse_date(raw: &str) -> ResultEngine<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidDate("empty date".to_string()));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| EngineError::InvalidDate(format!("invalid date: {trimmed}")))
}

pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} name must not be empty"
        )));
    }
    if trimmed.chars().count() > NAME_MAX_CHARS {
        return Err(EngineError::InvalidName(format!(
            "{label} name must be at most {NAME_MAX_CHARS} characters"
        )));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn ensure_description_len(description: &str) -> ResultEngine<()> {
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(EngineError::InvalidDescription(format!(
            "description must be at most {DESCRIPTION_MAX_CHARS} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_dates_only() {
        assert_eq!(
            parse_date(" 2024-01-31 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
        );
        assert!(parse_date("").is_err());
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("31/01/2024").is_err());
    }

    #[test]
    fn names_are_trimmed_and_required() {
        assert_eq!(
            normalize_required_name("  Groceries ", "category").unwrap(),
            "Groceries"
        );
        assert!(normalize_required_name("   ", "category").is_err());
        assert!(normalize_required_name(&"x".repeat(81), "category").is_err());
    }
}
