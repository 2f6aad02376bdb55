pub use accounts::{Account, AccountBalance};
pub use categories::{Category, CategoryKind};
pub use commands::{EditTransactionCmd, NewTransactionCmd};
pub use error::EngineError;
pub use money::Money;
pub use ops::{CategorySection, Dashboard, Engine, EngineBuilder, RECENT_ENTRIES};
pub use period::Period;
pub use store::{LedgerStore, SqlStore, TransactionFilter, TransactionPatch};
pub use summary::{CategoryTotal, MonthlySummary, aggregate};
pub use transactions::{EntryRow, LedgerEntry, NewTransaction, Transaction, TransactionStatus};

mod accounts;
mod categories;
mod commands;
mod error;
pub mod installments;
mod money;
mod ops;
mod period;
pub mod recurrence;
mod store;
pub mod summary;
mod transactions;
mod users;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
