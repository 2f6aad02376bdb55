use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseConnection, JoinType, QueryFilter, QueryOrder, QuerySelect, SqlErr,
    TransactionTrait, prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    Account, Category, CategoryKind, EngineError, EntryRow, Money, NewTransaction, ResultEngine,
    Transaction, TransactionStatus, accounts, categories, recurrence::FixedEntryKey, transactions,
    users,
};

use super::{LedgerStore, TransactionFilter, TransactionPatch};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

/// [`LedgerStore`] backed by a sea-orm connection.
#[derive(Clone, Debug)]
pub struct SqlStore {
    database: DatabaseConnection,
}

impl SqlStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

/// Maps a uniqueness violation to [`EngineError::ExistingKey`].
fn conflict(err: DbErr, key: impl Into<String>) -> EngineError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => EngineError::ExistingKey(key.into()),
        _ => EngineError::Database(err),
    }
}

/// Maps an update that matched no row to [`EngineError::KeyNotFound`].
fn missing(err: DbErr) -> EngineError {
    match err {
        DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => {
            EngineError::KeyNotFound("transaction not exists".to_string())
        }
        err => EngineError::Database(err),
    }
}

impl LedgerStore for SqlStore {
    async fn user_password(&self, username: &str) -> ResultEngine<Option<String>> {
        let user = users::Entity::find_by_id(username.to_string())
            .one(&self.database)
            .await?;
        Ok(user.map(|u| u.password))
    }

    async fn create_user(&self, username: &str, password: &str) -> ResultEngine<()> {
        let user = users::ActiveModel {
            username: ActiveValue::Set(username.to_string()),
            password: ActiveValue::Set(password.to_string()),
        };
        users::Entity::insert(user)
            .exec_without_returning(&self.database)
            .await
            .map_err(|err| conflict(err, username))?;
        Ok(())
    }

    async fn accounts_by_owner(&self, owner: &str) -> ResultEngine<Vec<Account>> {
        let models = accounts::Entity::find()
            .filter(accounts::Column::Owner.eq(owner))
            .order_by_asc(accounts::Column::Name)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Account::from).collect())
    }

    async fn account(&self, id: Uuid) -> ResultEngine<Option<Account>> {
        let model = accounts::Entity::find_by_id(id)
            .one(&self.database)
            .await?;
        Ok(model.map(Account::from))
    }

    async fn create_account(&self, account: &Account) -> ResultEngine<()> {
        let model: accounts::ActiveModel = account.into();
        accounts::Entity::insert(model)
            .exec_without_returning(&self.database)
            .await
            .map_err(|err| conflict(err, account.name.as_str()))?;
        Ok(())
    }

    async fn account_movements(&self, owner: &str) -> ResultEngine<HashMap<Uuid, Money>> {
        let rows: Vec<(Uuid, Option<i64>)> = transactions::Entity::find()
            .select_only()
            .column(transactions::Column::AccountId)
            .column_as(
                Expr::col((transactions::Entity, transactions::Column::AmountMinor)).sum(),
                "total",
            )
            .join(JoinType::InnerJoin, transactions::Relation::Account.def())
            .filter(accounts::Column::Owner.eq(owner))
            .group_by(transactions::Column::AccountId)
            .into_tuple()
            .all(&self.database)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(account_id, total)| (account_id, Money::new(total.unwrap_or(0))))
            .collect())
    }

    async fn categories(&self, kind: Option<CategoryKind>) -> ResultEngine<Vec<Category>> {
        let mut query = categories::Entity::find();
        if let Some(kind) = kind {
            query = query.filter(categories::Column::Kind.eq(kind.as_str()));
        }
        let models = query
            .order_by_asc(categories::Column::Name)
            .all(&self.database)
            .await?;
        models.into_iter().map(Category::try_from).collect()
    }

    async fn category(&self, id: Uuid) -> ResultEngine<Option<Category>> {
        categories::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .map(Category::try_from)
            .transpose()
    }

    async fn find_or_create_category(
        &self,
        name: &str,
        kind: CategoryKind,
    ) -> ResultEngine<Category> {
        with_tx!(self, |db_tx| {
            let existing = categories::Entity::find()
                .filter(categories::Column::Kind.eq(kind.as_str()))
                .filter(categories::Column::Name.eq(name))
                .one(&db_tx)
                .await?;
            if let Some(model) = existing {
                return Category::try_from(model);
            }

            let category = Category::new(name.to_string(), kind);
            let model: categories::ActiveModel = (&category).into();
            categories::Entity::insert(model)
                .exec_without_returning(&db_tx)
                .await
                .map_err(|err| conflict(err, name))?;
            Ok(category)
        })
    }

    async fn transactions(&self, filter: &TransactionFilter) -> ResultEngine<Vec<EntryRow>> {
        let mut query = transactions::Entity::find()
            .find_also_related(categories::Entity)
            .join(JoinType::InnerJoin, transactions::Relation::Account.def())
            .filter(accounts::Column::Owner.eq(filter.owner.as_str()));

        if let Some(from) = filter.from {
            query = query.filter(transactions::Column::Date.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(transactions::Column::Date.lt(to));
        }
        if let Some(kind) = filter.kind {
            query = query.filter(categories::Column::Kind.eq(kind.as_str()));
        }
        if let Some(status) = filter.status {
            query = query.filter(transactions::Column::Status.eq(status.as_str()));
        }
        if let Some(account_id) = filter.account_id {
            query = query.filter(transactions::Column::AccountId.eq(account_id));
        }
        if filter.fixed_only {
            query = query
                .filter(transactions::Column::IsFixed.eq(true))
                .filter(transactions::Column::InstallmentCount.is_null());
        }
        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }

        let rows = query
            .order_by_desc(transactions::Column::Date)
            .order_by_desc(transactions::Column::CreatedAt)
            .order_by_desc(transactions::Column::Id)
            .all(&self.database)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(transaction, category)| EntryRow {
                transaction,
                category,
            })
            .collect())
    }

    async fn transaction(&self, owner: &str, id: Uuid) -> ResultEngine<Option<Transaction>> {
        transactions::Entity::find_by_id(id)
            .join(JoinType::InnerJoin, transactions::Relation::Account.def())
            .filter(accounts::Column::Owner.eq(owner))
            .one(&self.database)
            .await?
            .map(Transaction::try_from)
            .transpose()
    }

    async fn create_transactions(&self, rows: &[NewTransaction]) -> ResultEngine<Vec<Uuid>> {
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            let mut ids = Vec::with_capacity(rows.len());
            for row in rows {
                let model = row.clone().into_active_model(now)?;
                transactions::Entity::insert(model)
                    .exec_without_returning(&db_tx)
                    .await
                    .map_err(|err| {
                        let key = if row.rolls_over() {
                            FixedEntryKey::from(row).to_string()
                        } else {
                            row.id.to_string()
                        };
                        conflict(err, key)
                    })?;
                ids.push(row.id);
            }
            Ok(ids)
        })
    }

    async fn update_transaction(&self, id: Uuid, patch: &TransactionPatch) -> ResultEngine<()> {
        let model = transactions::ActiveModel {
            id: ActiveValue::Unchanged(id),
            date: ActiveValue::Set(patch.date),
            description: ActiveValue::Set(patch.description.clone()),
            account_id: ActiveValue::Set(patch.account_id),
            category_id: ActiveValue::Set(patch.category_id),
            amount_minor: ActiveValue::Set(patch.amount.cents()),
            status: ActiveValue::Set(patch.status.as_str().to_string()),
            updated_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        };
        model.update(&self.database).await.map_err(|err| match err {
            DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => missing(err),
            err => conflict(err, id.to_string()),
        })?;
        Ok(())
    }

    async fn set_status(&self, id: Uuid, status: TransactionStatus) -> ResultEngine<()> {
        let model = transactions::ActiveModel {
            id: ActiveValue::Unchanged(id),
            status: ActiveValue::Set(status.as_str().to_string()),
            updated_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        };
        model.update(&self.database).await.map_err(missing)?;
        Ok(())
    }

    async fn delete_transaction(&self, id: Uuid) -> ResultEngine<()> {
        let result = transactions::Entity::delete_by_id(id)
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound(
                "transaction not exists".to_string(),
            ));
        }
        Ok(())
    }

    async fn fixed_entry_exists(&self, key: &FixedEntryKey) -> ResultEngine<bool> {
        let found = transactions::Entity::find()
            .filter(transactions::Column::Date.eq(key.date))
            .filter(transactions::Column::AccountId.eq(key.account_id))
            .filter(transactions::Column::CategoryId.eq(key.category_id))
            .filter(transactions::Column::Description.eq(key.description.as_str()))
            .filter(transactions::Column::AmountMinor.eq(key.amount.cents()))
            .filter(transactions::Column::IsFixed.eq(true))
            .filter(transactions::Column::InstallmentCount.is_null())
            .one(&self.database)
            .await?;
        Ok(found.is_some())
    }
}
