use crate::{
    CategoryKind, EngineError, LedgerEntry, Period, ResultEngine,
    recurrence::{FixedEntryKey, rollover_candidate},
    store::{LedgerStore, TransactionFilter},
};

use super::Engine;

impl<S: LedgerStore> Engine<S> {
    /// Copies last month's fixed entries of `kind` into `year`-`month`.
    ///
    /// Entries already copied are skipped, so calling this twice for the same
    /// month creates nothing the second time. Returns the number of rows
    /// created.
    pub async fn import_fixed(
        &self,
        owner: &str,
        kind: CategoryKind,
        year: i32,
        month: u32,
    ) -> ResultEngine<u64> {
        let target = Period::new(year, month)?;
        let source = target.previous()?;

        let filter = TransactionFilter::for_owner(owner)
            .period(source)?
            .kind(kind)
            .fixed_only();
        let rows = self.store.transactions(&filter).await?;

        let mut created = 0;
        for row in rows {
            let id = row.transaction.id;
            let entry = match LedgerEntry::try_from(row) {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(transaction = %id, "skipping unreadable fixed entry: {err}");
                    continue;
                }
            };
            let Some(candidate) = rollover_candidate(&entry.transaction, target) else {
                tracing::warn!(transaction = %id, %target, "fixed entry cannot roll over");
                continue;
            };

            let key = FixedEntryKey::from(&candidate);
            if self.store.fixed_entry_exists(&key).await? {
                continue;
            }
            match self
                .store
                .create_transactions(std::slice::from_ref(&candidate))
                .await
            {
                Ok(_) => created += 1,
                Err(EngineError::ExistingKey(_)) => {
                    tracing::debug!(transaction = %id, "fixed entry imported concurrently");
                }
                Err(err) => return Err(err),
            }
        }

        tracing::info!(owner, kind = kind.as_str(), %target, created, "fixed entries imported");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Mutex};

    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::{
        Account, Category, EntryRow, Money, NewTransaction, Transaction, TransactionStatus,
        categories, store::TransactionPatch, transactions,
    };

    /// Serves fixed source rows and refuses to insert `taken` as if another
    /// import had written it first.
    struct RolloverStore {
        rows: Vec<EntryRow>,
        taken: &'static str,
        inserted: Mutex<Vec<NewTransaction>>,
    }

    fn source_row(description: &str, status: &str) -> EntryRow {
        let now = Utc::now();
        EntryRow {
            transaction: transactions::Model {
                id: Uuid::new_v4(),
                date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
                description: description.to_string(),
                account_id: Uuid::nil(),
                category_id: Uuid::nil(),
                amount_minor: -25_00,
                status: status.to_string(),
                created_at: now,
                updated_at: now,
                group_id: None,
                installment_no: None,
                installment_count: None,
                is_fixed: true,
            },
            category: Some(categories::Model {
                id: Uuid::nil(),
                name: "Home".to_string(),
                kind: "expense".to_string(),
            }),
        }
    }

    impl LedgerStore for RolloverStore {
        async fn user_password(&self, _: &str) -> ResultEngine<Option<String>> {
            unreachable!()
        }

        async fn create_user(&self, _: &str, _: &str) -> ResultEngine<()> {
            unreachable!()
        }

        async fn accounts_by_owner(&self, _: &str) -> ResultEngine<Vec<Account>> {
            unreachable!()
        }

        async fn account(&self, _: Uuid) -> ResultEngine<Option<Account>> {
            unreachable!()
        }

        async fn create_account(&self, _: &Account) -> ResultEngine<()> {
            unreachable!()
        }

        async fn account_movements(&self, _: &str) -> ResultEngine<HashMap<Uuid, Money>> {
            unreachable!()
        }

        async fn categories(&self, _: Option<CategoryKind>) -> ResultEngine<Vec<Category>> {
            unreachable!()
        }

        async fn category(&self, _: Uuid) -> ResultEngine<Option<Category>> {
            unreachable!()
        }

        async fn find_or_create_category(
            &self,
            _: &str,
            _: CategoryKind,
        ) -> ResultEngine<Category> {
            unreachable!()
        }

        async fn transactions(&self, _: &TransactionFilter) -> ResultEngine<Vec<EntryRow>> {
            Ok(self.rows.clone())
        }

        async fn transaction(&self, _: &str, _: Uuid) -> ResultEngine<Option<Transaction>> {
            unreachable!()
        }

        async fn create_transactions(&self, rows: &[NewTransaction]) -> ResultEngine<Vec<Uuid>> {
            if rows.iter().any(|row| row.description == self.taken) {
                return Err(EngineError::ExistingKey(self.taken.to_string()));
            }
            let mut inserted = self.inserted.lock().unwrap();
            inserted.extend_from_slice(rows);
            Ok(rows.iter().map(|row| row.id).collect())
        }

        async fn update_transaction(&self, _: Uuid, _: &TransactionPatch) -> ResultEngine<()> {
            unreachable!()
        }

        async fn set_status(&self, _: Uuid, _: TransactionStatus) -> ResultEngine<()> {
            unreachable!()
        }

        async fn delete_transaction(&self, _: Uuid) -> ResultEngine<()> {
            unreachable!()
        }

        async fn fixed_entry_exists(&self, _: &FixedEntryKey) -> ResultEngine<bool> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn unreadable_and_concurrently_imported_rows_are_skipped() {
        let store = RolloverStore {
            rows: vec![
                source_row("Rent", "paid"),
                source_row("Broken", "settled"),
                source_row("Gym", "pending"),
                source_row("Water", "pending"),
            ],
            taken: "Gym",
            inserted: Mutex::new(Vec::new()),
        };
        let engine = Engine::with_store(store);

        let created = engine
            .import_fixed("alice", CategoryKind::Expense, 2024, 2)
            .await
            .unwrap();
        assert_eq!(created, 2);

        let inserted = engine.store().inserted.lock().unwrap();
        let names: Vec<_> = inserted.iter().map(|row| row.description.as_str()).collect();
        assert_eq!(names, vec!["Rent", "Water"]);
        assert!(inserted.iter().all(|row| {
            row.date == NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
                && row.status == TransactionStatus::Pending
        }));
    }
}
