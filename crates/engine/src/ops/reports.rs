use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    AccountBalance, Category, CategoryKind, EngineError, LedgerEntry, Money, Period,
    ResultEngine,
    store::{LedgerStore, TransactionFilter},
    summary::{MonthlySummary, aggregate},
};

use super::Engine;

/// Number of entries shown in [`Dashboard::recent`].
pub const RECENT_ENTRIES: usize = 10;

/// The month at a glance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub period: String,
    pub summary: MonthlySummary,
    /// Latest entries of the month, newest first.
    pub recent: Vec<LedgerEntry>,
    pub balances: Vec<AccountBalance>,
}

/// One category with its entries of a month.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategorySection {
    pub category: Category,
    pub entries: Vec<LedgerEntry>,
    /// Signed sum of `entries`.
    pub total: Money,
}

impl<S: LedgerStore> Engine<S> {
    pub async fn dashboard(&self, owner: &str, period: Period) -> ResultEngine<Dashboard> {
        let filter = TransactionFilter::for_owner(owner).period(period)?;
        let entries = self.list_transactions(&filter).await?;
        let summary = aggregate(&entries);
        let recent = entries.into_iter().take(RECENT_ENTRIES).collect();
        let balances = self.account_balances(owner).await?;

        Ok(Dashboard {
            period: period.to_string(),
            summary,
            recent,
            balances,
        })
    }

    /// Initial balance plus every transaction of each account, in name order.
    pub async fn account_balances(&self, owner: &str) -> ResultEngine<Vec<AccountBalance>> {
        let accounts = self.store.accounts_by_owner(owner).await?;
        let movements = self.store.account_movements(owner).await?;

        accounts
            .into_iter()
            .map(|account| {
                let moved = movements.get(&account.id).copied().unwrap_or(Money::ZERO);
                AccountBalance::new(account, moved)
            })
            .collect()
    }

    /// Every category of `kind` with the month's entries filed under it.
    ///
    /// Categories without entries are included with a zero total.
    pub async fn category_sections(
        &self,
        owner: &str,
        kind: CategoryKind,
        period: Period,
    ) -> ResultEngine<Vec<CategorySection>> {
        let categories = self.store.categories(Some(kind)).await?;
        let filter = TransactionFilter::for_owner(owner)
            .period(period)?
            .kind(kind);
        let entries = self.list_transactions(&filter).await?;

        let mut by_category: HashMap<Uuid, Vec<LedgerEntry>> = HashMap::new();
        for entry in entries {
            by_category
                .entry(entry.category.id)
                .or_default()
                .push(entry);
        }

        Ok(categories
            .into_iter()
            .map(|category| {
                let entries = by_category.remove(&category.id).unwrap_or_default();
                let total = entries.iter().map(|e| e.transaction.amount).sum();
                CategorySection {
                    category,
                    entries,
                    total,
                }
            })
            .collect())
    }

    /// The categories `owner` used most in the `days` before `today`.
    ///
    /// Ties keep the most recently used category first.
    pub async fn recent_categories(
        &self,
        owner: &str,
        today: NaiveDate,
        days: u64,
        limit: usize,
    ) -> ResultEngine<Vec<Category>> {
        let out_of_range = || EngineError::InvalidDate(format!("invalid window: {days} days"));
        let from = today
            .checked_sub_days(Days::new(days))
            .ok_or_else(out_of_range)?;
        let to = today.checked_add_days(Days::new(1)).ok_or_else(out_of_range)?;

        let mut filter = TransactionFilter::for_owner(owner).since(from);
        filter.to = Some(to);
        let entries = self.list_transactions(&filter).await?;

        let mut ranked: Vec<(Category, usize)> = Vec::new();
        let mut index: HashMap<Uuid, usize> = HashMap::new();
        for entry in entries {
            match index.get(&entry.category.id) {
                Some(&i) => ranked[i].1 += 1,
                None => {
                    index.insert(entry.category.id, ranked.len());
                    ranked.push((entry.category, 1));
                }
            }
        }
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        Ok(ranked
            .into_iter()
            .take(limit)
            .map(|(category, _)| category)
            .collect())
    }
}
