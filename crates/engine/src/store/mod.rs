//! Persistence boundary.
//!
//! The engine only talks to storage through [`LedgerStore`]. [`SqlStore`] is
//! the sea-orm implementation used by the binaries and the tests.

use std::{collections::HashMap, future::Future};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    Account, Category, CategoryKind, EngineError, EntryRow, Money, NewTransaction, Period,
    ResultEngine, Transaction, TransactionStatus, recurrence::FixedEntryKey,
};

mod sql;

pub use sql::SqlStore;

/// Owner-scoped selection of transactions.
///
/// `from` is inclusive and `to` is exclusive (`[from, to)`).
#[derive(Clone, Debug, Default)]
pub struct TransactionFilter {
    pub owner: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub kind: Option<CategoryKind>,
    pub status: Option<TransactionStatus>,
    pub account_id: Option<Uuid>,
    /// Only fixed entries outside installment groups.
    pub fixed_only: bool,
    pub limit: Option<u64>,
}

impl TransactionFilter {
    pub fn for_owner(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            ..Self::default()
        }
    }

    pub fn period(mut self, period: Period) -> ResultEngine<Self> {
        let (from, to) = period.date_range()?;
        self.from = Some(from);
        self.to = Some(to);
        Ok(self)
    }

    #[must_use]
    pub fn since(mut self, from: NaiveDate) -> Self {
        self.from = Some(from);
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: CategoryKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn status(mut self, status: TransactionStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn account(mut self, account_id: Uuid) -> Self {
        self.account_id = Some(account_id);
        self
    }

    #[must_use]
    pub fn fixed_only(mut self) -> Self {
        self.fixed_only = true;
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub(crate) fn validate(&self) -> ResultEngine<()> {
        if let (Some(from), Some(to)) = (self.from, self.to)
            && from >= to
        {
            return Err(EngineError::InvalidDate(
                "invalid range: from must be < to".to_string(),
            ));
        }
        if self.limit == Some(0) {
            return Err(EngineError::InvalidAmount(
                "limit must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// New values for the editable fields of a transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionPatch {
    pub date: NaiveDate,
    pub description: String,
    pub account_id: Uuid,
    pub category_id: Uuid,
    pub amount: Money,
    pub status: TransactionStatus,
}

/// Storage operations needed by the engine.
///
/// Implementations must make [`create_transactions`] all-or-nothing and must
/// report uniqueness violations as [`EngineError::ExistingKey`].
///
/// [`create_transactions`]: LedgerStore::create_transactions
pub trait LedgerStore: Send + Sync {
    fn user_password(
        &self,
        username: &str,
    ) -> impl Future<Output = ResultEngine<Option<String>>> + Send;

    fn create_user(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = ResultEngine<()>> + Send;

    fn accounts_by_owner(
        &self,
        owner: &str,
    ) -> impl Future<Output = ResultEngine<Vec<Account>>> + Send;

    fn account(&self, id: Uuid) -> impl Future<Output = ResultEngine<Option<Account>>> + Send;

    fn create_account(&self, account: &Account) -> impl Future<Output = ResultEngine<()>> + Send;

    /// Sum of all transaction amounts per account of `owner`.
    fn account_movements(
        &self,
        owner: &str,
    ) -> impl Future<Output = ResultEngine<HashMap<Uuid, Money>>> + Send;

    /// Categories ordered by name, optionally restricted to one kind.
    fn categories(
        &self,
        kind: Option<CategoryKind>,
    ) -> impl Future<Output = ResultEngine<Vec<Category>>> + Send;

    fn category(&self, id: Uuid) -> impl Future<Output = ResultEngine<Option<Category>>> + Send;

    fn find_or_create_category(
        &self,
        name: &str,
        kind: CategoryKind,
    ) -> impl Future<Output = ResultEngine<Category>> + Send;

    /// Rows matching `filter`, newest first.
    fn transactions(
        &self,
        filter: &TransactionFilter,
    ) -> impl Future<Output = ResultEngine<Vec<EntryRow>>> + Send;

    /// A transaction on one of `owner`'s accounts.
    fn transaction(
        &self,
        owner: &str,
        id: Uuid,
    ) -> impl Future<Output = ResultEngine<Option<Transaction>>> + Send;

    /// Inserts every row or none of them.
    fn create_transactions(
        &self,
        rows: &[NewTransaction],
    ) -> impl Future<Output = ResultEngine<Vec<Uuid>>> + Send;

    fn update_transaction(
        &self,
        id: Uuid,
        patch: &TransactionPatch,
    ) -> impl Future<Output = ResultEngine<()>> + Send;

    fn set_status(
        &self,
        id: Uuid,
        status: TransactionStatus,
    ) -> impl Future<Output = ResultEngine<()>> + Send;

    fn delete_transaction(&self, id: Uuid) -> impl Future<Output = ResultEngine<()>> + Send;

    /// Whether a fixed, non-installment entry with exactly these fields exists.
    fn fixed_entry_exists(
        &self,
        key: &FixedEntryKey,
    ) -> impl Future<Output = ResultEngine<bool>> + Send;
}
