use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Income or expense.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Income,
    Expense,
}

/// Calendar month selector. When both fields are missing the current month
/// is used.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct PeriodQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

pub mod account {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountBalanceView {
        pub id: Uuid,
        pub name: String,
        pub initial_balance_minor: i64,
        /// Initial balance plus every transaction, paid or not.
        pub balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountsResponse {
        pub accounts: Vec<AccountBalanceView>,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        pub kind: CategoryKind,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryQuery {
        pub kind: Option<CategoryKind>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
        pub kind: CategoryKind,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoriesResponse {
        pub categories: Vec<CategoryView>,
    }

    /// A category with the month's entries filed under it.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategorySectionView {
        pub category: CategoryView,
        pub entries: Vec<super::transaction::TransactionView>,
        pub total_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SectionsResponse {
        pub period: String,
        pub sections: Vec<CategorySectionView>,
    }
}

pub mod transaction {
    use super::*;

    /// Request body for a new transaction.
    ///
    /// `amount` is decimal text (`"12.50"` or `"12,50"`); its sign is fixed by
    /// the category kind. `installments` greater than one splits the amount
    /// over as many months.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub account_id: Uuid,
        pub category_id: Uuid,
        pub amount: String,
        /// `YYYY-MM-DD`
        pub date: String,
        pub description: Option<String>,
        /// `pending` or `paid`; anything else is `pending`.
        pub status: Option<String>,
        pub installments: Option<i64>,
        pub is_fixed: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionCreated {
        pub ids: Vec<Uuid>,
    }

    /// Request body for editing a transaction.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub account_id: Uuid,
        pub category_id: Uuid,
        pub amount: String,
        pub date: String,
        pub description: Option<String>,
        pub status: Option<String>,
    }

    /// Listing filters. Without `year`/`month` every transaction is listed.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionListQuery {
        pub year: Option<i32>,
        pub month: Option<u32>,
        pub kind: Option<CategoryKind>,
        pub status: Option<String>,
        pub account_id: Option<Uuid>,
        /// Maximum number of rows, newest first.
        pub limit: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub date: NaiveDate,
        pub description: String,
        pub account_id: Uuid,
        pub category_id: Uuid,
        pub category: String,
        pub kind: CategoryKind,
        pub amount_minor: i64,
        pub status: String,
        pub group_id: Option<Uuid>,
        pub installment_no: Option<u32>,
        pub installment_count: Option<u32>,
        pub is_fixed: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        /// `YYYY-MM`, absent for an unbounded listing.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub period: Option<String>,
        pub transactions: Vec<TransactionView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StatusToggled {
        pub status: String,
    }
}

pub mod fixed {
    use super::*;

    /// Copy the previous month's fixed entries of `kind` into `year`/`month`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct FixedImport {
        pub kind: CategoryKind,
        pub year: i32,
        pub month: u32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FixedImported {
        pub created: u64,
    }
}

pub mod dashboard {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryTotalView {
        pub name: String,
        pub total_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SummaryView {
        pub total_income_minor: i64,
        pub total_expenses_minor: i64,
        pub total_expenses_abs_minor: i64,
        pub net_minor: i64,
        pub total_income_paid_minor: i64,
        pub total_expenses_paid_minor: i64,
        pub total_expenses_paid_abs_minor: i64,
        pub net_paid_minor: i64,
        pub expense_by_category: Vec<CategoryTotalView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DashboardResponse {
        pub period: String,
        pub summary: SummaryView,
        pub recent: Vec<super::transaction::TransactionView>,
        pub balances: Vec<super::account::AccountBalanceView>,
    }
}
