//! Command structs for engine operations.
//!
//! These types carry the raw values of a transaction form. Amount and date are
//! kept as text: parsing them is part of the operation, so a malformed value
//! is rejected by the engine with the field at fault.

use uuid::Uuid;

use crate::TransactionStatus;

/// Create a transaction, optionally split into monthly installments.
#[derive(Clone, Debug)]
pub struct NewTransactionCmd {
    pub owner: String,
    pub account_id: Uuid,
    pub category_id: Uuid,
    pub amount: String,
    /// Date of the (first) entry, `YYYY-MM-DD`.
    pub date: String,
    pub description: String,
    pub status: TransactionStatus,
    /// Number of installments; `1` creates a single entry.
    pub installments: i64,
    /// Only honored for single entries.
    pub is_fixed: bool,
}

impl NewTransactionCmd {
    #[must_use]
    pub fn new(
        owner: impl Into<String>,
        account_id: Uuid,
        category_id: Uuid,
        amount: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            account_id,
            category_id,
            amount: amount.into(),
            date: date.into(),
            description: String::new(),
            status: TransactionStatus::Pending,
            installments: 1,
            is_fixed: false,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn installments(mut self, installments: i64) -> Self {
        self.installments = installments;
        self
    }

    #[must_use]
    pub fn fixed(mut self, is_fixed: bool) -> Self {
        self.is_fixed = is_fixed;
        self
    }
}

/// Replace the editable fields of an existing transaction.
///
/// Group, installment and fixed fields are not editable.
#[derive(Clone, Debug)]
pub struct EditTransactionCmd {
    pub owner: String,
    pub account_id: Uuid,
    pub category_id: Uuid,
    pub amount: String,
    pub date: String,
    pub description: String,
    pub status: TransactionStatus,
}

impl EditTransactionCmd {
    #[must_use]
    pub fn new(
        owner: impl Into<String>,
        account_id: Uuid,
        category_id: Uuid,
        amount: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            account_id,
            category_id,
            amount: amount.into(),
            date: date.into(),
            description: String::new(),
            status: TransactionStatus::Pending,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }
}
