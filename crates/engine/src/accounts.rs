//! The module contains `Account` struct and its storage model.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{EngineError, Money};

/// An account.
///
/// An account is where money is kept: a wallet, a bank account, a card. It is
/// owned by exactly one user and every transaction belongs to one account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    /// Username of the owner.
    pub owner: String,
    pub initial_balance: Money,
}

impl Account {
    pub fn new(name: String, owner: String, initial_balance: Money) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            owner,
            initial_balance,
        }
    }
}

/// Current balance of an account: initial balance plus every transaction,
/// paid or not.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AccountBalance {
    pub account: Account,
    pub balance: Money,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub owner: String,
    pub initial_balance_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::Owner",
        to = "super::users::Column::Username",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Account> for ActiveModel {
    fn from(account: &Account) -> Self {
        Self {
            id: ActiveValue::Set(account.id),
            name: ActiveValue::Set(account.name.clone()),
            owner: ActiveValue::Set(account.owner.clone()),
            initial_balance_minor: ActiveValue::Set(account.initial_balance.cents()),
        }
    }
}

impl From<Model> for Account {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            owner: model.owner,
            initial_balance: Money::new(model.initial_balance_minor),
        }
    }
}

impl AccountBalance {
    pub(crate) fn new(account: Account, movements: Money) -> Result<Self, EngineError> {
        let balance = account
            .initial_balance
            .checked_add(movements)
            .ok_or_else(|| EngineError::InvalidAmount("account balance overflow".to_string()))?;
        Ok(Self { account, balance })
    }
}
