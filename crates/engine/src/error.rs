//! The module contains the error the engine can throw.
//!
//! Validation errors ([`InvalidAmount`], [`InvalidDate`], ...) are raised
//! before anything is written and name the field at fault. [`KeyNotFound`]
//! covers rows that are absent or owned by someone else. [`Database`] wraps
//! store failures; a failed batch is rolled back, so retrying is safe.
//!
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidDate`]: EngineError::InvalidDate
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid installments: {0}")]
    InvalidInstallments(String),
    #[error("Invalid description: {0}")]
    InvalidDescription(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Invalid kind: {0}")]
    InvalidKind(String),
    #[error("Invalid status: {0}")]
    InvalidStatus(String),
    #[error("Unknown {0}")]
    InvalidReference(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Name of the input field a validation error refers to.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidAmount(_) => Some("amount"),
            Self::InvalidDate(_) => Some("date"),
            Self::InvalidInstallments(_) => Some("installments"),
            Self::InvalidDescription(_) => Some("description"),
            Self::InvalidName(_) => Some("name"),
            Self::InvalidKind(_) => Some("kind"),
            Self::InvalidStatus(_) => Some("status"),
            Self::InvalidReference(field) => Some(field.as_str()),
            Self::KeyNotFound(_) | Self::ExistingKey(_) | Self::Database(_) => None,
        }
    }

    /// `true` for errors caused by the caller's input.
    pub fn is_validation(&self) -> bool {
        self.field().is_some()
    }

    /// `true` when the same request may succeed if sent again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidDate(a), Self::InvalidDate(b)) => a == b,
            (Self::InvalidInstallments(a), Self::InvalidInstallments(b)) => a == b,
            (Self::InvalidDescription(a), Self::InvalidDescription(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::InvalidKind(a), Self::InvalidKind(b)) => a == b,
            (Self::InvalidStatus(a), Self::InvalidStatus(b)) => a == b,
            (Self::InvalidReference(a), Self::InvalidReference(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_name_their_field() {
        assert_eq!(
            EngineError::InvalidAmount("x".to_string()).field(),
            Some("amount")
        );
        assert_eq!(
            EngineError::InvalidReference("account".to_string()).field(),
            Some("account")
        );
        assert!(EngineError::InvalidDate("x".to_string()).is_validation());
        assert!(!EngineError::KeyNotFound("x".to_string()).is_validation());
    }

    #[test]
    fn only_store_failures_are_retryable() {
        assert!(EngineError::Database(DbErr::Custom("boom".to_string())).is_retryable());
        assert!(!EngineError::ExistingKey("x".to_string()).is_retryable());
        assert!(!EngineError::InvalidInstallments("x".to_string()).is_retryable());
    }
}
