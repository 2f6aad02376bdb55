//! Uniqueness of fixed (recurring) entries.
//!
//! Two fixed entries with the same account, date, category, description and
//! amount are the same rollover. The index is partial: installment members and
//! one-off entries are never constrained.

use sea_orm::ConnectionTrait;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const INDEX_NAME: &str = "idx-transactions-fixed-entry-unique";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // sea-query has no partial index builder, so this one is raw SQL.
        manager
            .get_connection()
            .execute_unprepared(&format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS \"{INDEX_NAME}\" \
                 ON transactions (account_id, date, category_id, description, amount_minor) \
                 WHERE is_fixed = 1 AND installment_count IS NULL;"
            ))
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(&format!("DROP INDEX IF EXISTS \"{INDEX_NAME}\";"))
            .await?;
        Ok(())
    }
}
