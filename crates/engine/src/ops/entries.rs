use uuid::Uuid;

use crate::{
    EngineError, LedgerEntry, Money, ResultEngine, Transaction, TransactionStatus,
    commands::{EditTransactionCmd, NewTransactionCmd},
    installments::{EntryTemplate, MAX_INSTALLMENTS, plan_installments},
    store::{LedgerStore, TransactionFilter, TransactionPatch},
    util::{ensure_description_len, parse_date},
};

use super::Engine;

fn parse_installments(value: i64) -> ResultEngine<u32> {
    u32::try_from(value)
        .ok()
        .filter(|n| (1..=MAX_INSTALLMENTS).contains(n))
        .ok_or_else(|| {
            EngineError::InvalidInstallments(format!(
                "installments must be between 1 and {MAX_INSTALLMENTS}, got {value}"
            ))
        })
}

impl<S: LedgerStore> Engine<S> {
    /// Creates a transaction, split into `cmd.installments` monthly rows.
    ///
    /// The amount sign follows the category kind: a positive expense is
    /// negated, a negative income is rejected. Every input is validated before
    /// the rows are written, and the rows are written all together or not at
    /// all.
    ///
    /// Returns the ids of the created rows, in installment order.
    pub async fn split_and_create(&self, cmd: &NewTransactionCmd) -> ResultEngine<Vec<Uuid>> {
        let count = parse_installments(cmd.installments)?;
        let amount: Money = cmd.amount.parse()?;
        let date = parse_date(&cmd.date)?;

        let account = self.owned_account(&cmd.owner, cmd.account_id).await?;
        let category = self.known_category(cmd.category_id).await?;
        let amount = category.kind.normalize_amount(amount)?;

        let template = EntryTemplate {
            account_id: account.id,
            category_id: category.id,
            category_name: category.name,
            description: cmd.description.clone(),
            status: cmd.status,
            is_fixed: cmd.is_fixed,
        };
        let rows = plan_installments(amount, count, date, &template)?;
        let ids = self.store.create_transactions(&rows).await?;

        tracing::info!(
            owner = %cmd.owner,
            account = %account.id,
            installments = count,
            %amount,
            "transaction created"
        );
        Ok(ids)
    }

    /// Replaces the editable fields of one of `owner`'s transactions.
    ///
    /// Group, installment and fixed fields keep their values.
    pub async fn update_transaction(&self, id: Uuid, cmd: &EditTransactionCmd) -> ResultEngine<()> {
        self.owned_transaction(&cmd.owner, id).await?;

        let amount: Money = cmd.amount.parse()?;
        let date = parse_date(&cmd.date)?;
        let description = cmd.description.trim().to_string();
        ensure_description_len(&description)?;

        let account = self.owned_account(&cmd.owner, cmd.account_id).await?;
        let category = self.known_category(cmd.category_id).await?;
        let amount = category.kind.normalize_amount(amount)?;

        let patch = TransactionPatch {
            date,
            description,
            account_id: account.id,
            category_id: category.id,
            amount,
            status: cmd.status,
        };
        self.store.update_transaction(id, &patch).await?;

        tracing::info!(owner = %cmd.owner, transaction = %id, "transaction updated");
        Ok(())
    }

    /// Deletes a single row. Other installments of its group are kept.
    pub async fn delete_transaction(&self, owner: &str, id: Uuid) -> ResultEngine<()> {
        self.owned_transaction(owner, id).await?;
        self.store.delete_transaction(id).await?;
        tracing::info!(owner, transaction = %id, "transaction deleted");
        Ok(())
    }

    /// Flips the status between pending and paid, returning the new one.
    pub async fn toggle_status(&self, owner: &str, id: Uuid) -> ResultEngine<TransactionStatus> {
        let transaction = self.owned_transaction(owner, id).await?;
        let status = transaction.status.toggled();
        self.store.set_status(id, status).await?;
        tracing::debug!(owner, transaction = %id, status = status.as_str(), "status toggled");
        Ok(status)
    }

    /// Lists `filter.owner`'s transactions with their category, newest first.
    pub async fn list_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> ResultEngine<Vec<LedgerEntry>> {
        filter.validate()?;
        self.store
            .transactions(filter)
            .await?
            .into_iter()
            .map(LedgerEntry::try_from)
            .collect()
    }

    pub async fn transaction(&self, owner: &str, id: Uuid) -> ResultEngine<Transaction> {
        self.owned_transaction(owner, id).await
    }

    async fn owned_transaction(&self, owner: &str, id: Uuid) -> ResultEngine<Transaction> {
        self.store
            .transaction(owner, id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))
    }
}
