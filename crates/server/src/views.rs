//! Conversions between engine values and API payloads.

use api_types::{
    CategoryKind as ApiKind, PeriodQuery,
    account::AccountBalanceView,
    category::CategoryView,
    transaction::TransactionView,
};
use engine::{AccountBalance, Category, CategoryKind, LedgerEntry, Period};

use crate::ServerError;

pub(crate) fn engine_kind(kind: ApiKind) -> CategoryKind {
    match kind {
        ApiKind::Income => CategoryKind::Income,
        ApiKind::Expense => CategoryKind::Expense,
    }
}

pub(crate) fn api_kind(kind: CategoryKind) -> ApiKind {
    match kind {
        CategoryKind::Income => ApiKind::Income,
        CategoryKind::Expense => ApiKind::Expense,
    }
}

/// Resolves a `year`/`month` pair, defaulting to the current month.
pub(crate) fn period(query: PeriodQuery) -> Result<Period, ServerError> {
    match selected_period(query)? {
        Some(period) => Ok(period),
        None => Ok(Period::current()?),
    }
}

/// The month named by `year`/`month`, or `None` when neither is given.
pub(crate) fn selected_period(query: PeriodQuery) -> Result<Option<Period>, ServerError> {
    match (query.year, query.month) {
        (Some(year), Some(month)) => Ok(Some(Period::new(year, month)?)),
        (None, None) => Ok(None),
        _ => Err(ServerError::Generic(
            "year and month must be given together".to_string(),
        )),
    }
}

pub(crate) fn entry_view(entry: LedgerEntry) -> TransactionView {
    let tx = entry.transaction;
    TransactionView {
        id: tx.id,
        date: tx.date,
        description: tx.description,
        account_id: tx.account_id,
        category_id: tx.category_id,
        category: entry.category.name,
        kind: api_kind(entry.category.kind),
        amount_minor: tx.amount.cents(),
        status: tx.status.as_str().to_string(),
        group_id: tx.group_id,
        installment_no: tx.installment_no,
        installment_count: tx.installment_count,
        is_fixed: tx.is_fixed,
    }
}

pub(crate) fn category_view(category: Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        kind: api_kind(category.kind),
    }
}

pub(crate) fn balance_view(balance: AccountBalance) -> AccountBalanceView {
    AccountBalanceView {
        id: balance.account.id,
        name: balance.account.name,
        initial_balance_minor: balance.account.initial_balance.cents(),
        balance_minor: balance.balance.cents(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_requires_both_fields() {
        let query = PeriodQuery {
            year: Some(2024),
            month: None,
        };
        assert!(matches!(period(query), Err(ServerError::Generic(_))));

        let query = PeriodQuery {
            year: Some(2024),
            month: Some(13),
        };
        assert!(matches!(period(query), Err(ServerError::Engine(_))));

        let query = PeriodQuery {
            year: Some(2024),
            month: Some(2),
        };
        assert!(matches!(period(query), Ok(p) if p.to_string() == "2024-02"));
    }

    #[test]
    fn missing_month_selects_nothing() {
        assert!(matches!(selected_period(PeriodQuery::default()), Ok(None)));
        assert!(period(PeriodQuery::default()).is_ok());

        let query = PeriodQuery {
            year: None,
            month: Some(4),
        };
        assert!(matches!(
            selected_period(query),
            Err(ServerError::Generic(_))
        ));
    }

    #[test]
    fn kinds_map_both_ways() {
        for kind in [CategoryKind::Income, CategoryKind::Expense] {
            assert_eq!(engine_kind(api_kind(kind)), kind);
        }
    }
}
