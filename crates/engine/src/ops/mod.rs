use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::{
    Account, Category, EngineError, ResultEngine,
    store::{LedgerStore, SqlStore},
};

mod catalog;
mod entries;
mod recurrence;
mod reports;

pub use reports::{CategorySection, Dashboard, RECENT_ENTRIES};

/// The ledger engine.
///
/// Every operation takes the owner explicitly and only ever touches rows of
/// that owner's accounts.
#[derive(Debug)]
pub struct Engine<S = SqlStore> {
    store: S,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

impl<S: LedgerStore> Engine<S> {
    /// Build an engine over any store implementation.
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// An account of `owner`. Unknown and foreign accounts look the same.
    async fn owned_account(&self, owner: &str, account_id: Uuid) -> ResultEngine<Account> {
        match self.store.account(account_id).await? {
            Some(account) if account.owner == owner => Ok(account),
            _ => Err(EngineError::InvalidReference("account".to_string())),
        }
    }

    async fn known_category(&self, category_id: Uuid) -> ResultEngine<Category> {
        self.store
            .category(category_id)
            .await?
            .ok_or_else(|| EngineError::InvalidReference("category".to_string()))
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        self.database.ping().await?;
        Ok(Engine {
            store: SqlStore::new(self.database),
        })
    }
}
