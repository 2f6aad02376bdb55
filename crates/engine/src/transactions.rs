//! Transaction primitives.
//!
//! A `Transaction` is one dated ledger line on an account. It is either a
//! standalone entry, a member of an installment group (`group_id` plus
//! installment counters) or a fixed entry that rolls over every month.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Category, EngineError, Money, ResultEngine,
    categories::{self, CategoryKind},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    #[default]
    Pending,
    Paid,
}

impl TransactionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }

    /// Paid becomes pending and pending becomes paid.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Pending => Self::Paid,
            Self::Paid => Self::Pending,
        }
    }

    /// Lenient parsing for form input: a missing or unknown value is pending.
    pub fn from_form(value: Option<&str>) -> Self {
        value
            .map(str::trim)
            .and_then(|raw| Self::try_from(raw).ok())
            .unwrap_or_default()
    }
}

impl TryFrom<&str> for TransactionStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            other => Err(EngineError::InvalidStatus(format!(
                "invalid transaction status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub id: Uuid,
    pub date: NaiveDate,
    pub description: String,
    pub account_id: Uuid,
    pub category_id: Uuid,
    pub amount: Money,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub group_id: Option<Uuid>,
    pub installment_no: Option<u32>,
    pub installment_count: Option<u32>,
    pub is_fixed: bool,
}

impl Transaction {
    /// Whether the entry is copied forward by the monthly rollover.
    pub fn rolls_over(&self) -> bool {
        self.is_fixed && self.installment_count.is_none()
    }
}

/// A row ready to be inserted. Timestamps are set by the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTransaction {
    pub id: Uuid,
    pub date: NaiveDate,
    pub description: String,
    pub account_id: Uuid,
    pub category_id: Uuid,
    pub amount: Money,
    pub status: TransactionStatus,
    pub group_id: Option<Uuid>,
    pub installment_no: Option<u32>,
    pub installment_count: Option<u32>,
    pub is_fixed: bool,
}

impl NewTransaction {
    /// Whether the row is covered by the one-per-month fixed entry index.
    pub fn rolls_over(&self) -> bool {
        self.is_fixed && self.installment_count.is_none()
    }
}

/// A transaction together with its category, as read for reports.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    pub transaction: Transaction,
    pub category: Category,
}

impl LedgerEntry {
    pub fn kind(&self) -> CategoryKind {
        self.category.kind
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub date: Date,
    pub description: String,
    pub account_id: Uuid,
    pub category_id: Uuid,
    pub amount_minor: i64,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub group_id: Option<Uuid>,
    pub installment_no: Option<i32>,
    pub installment_count: Option<i32>,
    pub is_fixed: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Account,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Category,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

fn stored_counter(value: Option<u32>) -> ResultEngine<Option<i32>> {
    value
        .map(|n| {
            i32::try_from(n)
                .map_err(|_| EngineError::InvalidInstallments(format!("{n} is out of range")))
        })
        .transpose()
}

fn loaded_counter(value: Option<i32>, label: &str) -> ResultEngine<Option<u32>> {
    value
        .map(|n| {
            u32::try_from(n).map_err(|_| {
                EngineError::InvalidInstallments(format!("stored {label} is negative: {n}"))
            })
        })
        .transpose()
}

impl NewTransaction {
    pub(crate) fn into_active_model(self, now: DateTime<Utc>) -> ResultEngine<ActiveModel> {
        Ok(ActiveModel {
            id: ActiveValue::Set(self.id),
            date: ActiveValue::Set(self.date),
            description: ActiveValue::Set(self.description),
            account_id: ActiveValue::Set(self.account_id),
            category_id: ActiveValue::Set(self.category_id),
            amount_minor: ActiveValue::Set(self.amount.cents()),
            status: ActiveValue::Set(self.status.as_str().to_string()),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            group_id: ActiveValue::Set(self.group_id),
            installment_no: ActiveValue::Set(stored_counter(self.installment_no)?),
            installment_count: ActiveValue::Set(stored_counter(self.installment_count)?),
            is_fixed: ActiveValue::Set(self.is_fixed),
        })
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            date: model.date,
            description: model.description,
            account_id: model.account_id,
            category_id: model.category_id,
            amount: Money::new(model.amount_minor),
            status: TransactionStatus::try_from(model.status.as_str())?,
            created_at: model.created_at,
            updated_at: model.updated_at,
            group_id: model.group_id,
            installment_no: loaded_counter(model.installment_no, "installment_no")?,
            installment_count: loaded_counter(model.installment_count, "installment_count")?,
            is_fixed: model.is_fixed,
        })
    }
}

/// A transaction row joined with its category row.
#[derive(Clone, Debug)]
pub struct EntryRow {
    pub transaction: Model,
    pub category: Option<categories::Model>,
}

impl TryFrom<EntryRow> for LedgerEntry {
    type Error = EngineError;

    fn try_from(row: EntryRow) -> Result<Self, Self::Error> {
        let category = row
            .category
            .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))?;
        Ok(Self {
            transaction: Transaction::try_from(row.transaction)?,
            category: Category::try_from(category)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Transaction {
        let now = Utc::now();
        Transaction {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            description: "Rent".to_string(),
            account_id: Uuid::new_v4(),
            category_id: Uuid::new_v4(),
            amount: Money::new(-1_200_00),
            status: TransactionStatus::Pending,
            created_at: now,
            updated_at: now,
            group_id: None,
            installment_no: None,
            installment_count: None,
            is_fixed: false,
        }
    }

    #[test]
    fn status_toggles_and_parses_leniently() {
        assert_eq!(TransactionStatus::Pending.toggled(), TransactionStatus::Paid);
        assert_eq!(TransactionStatus::Paid.toggled(), TransactionStatus::Pending);
        assert_eq!(
            TransactionStatus::from_form(Some("paid")),
            TransactionStatus::Paid
        );
        assert_eq!(
            TransactionStatus::from_form(Some("bogus")),
            TransactionStatus::Pending
        );
        assert_eq!(TransactionStatus::from_form(None), TransactionStatus::Pending);
        assert!(TransactionStatus::try_from("PAG").is_err());
    }

    #[test]
    fn only_fixed_non_installment_entries_roll_over() {
        assert!(!sample().rolls_over());

        let fixed = Transaction {
            is_fixed: true,
            ..sample()
        };
        assert!(fixed.rolls_over());

        let member = Transaction {
            is_fixed: true,
            group_id: Some(Uuid::new_v4()),
            installment_no: Some(2),
            installment_count: Some(3),
            ..sample()
        };
        assert!(!member.rolls_over());
    }
}
