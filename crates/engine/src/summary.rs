//! Monthly aggregation for the dashboard.

use std::collections::HashMap;

use serde::Serialize;

use crate::{CategoryKind, LedgerEntry, Money, TransactionStatus};

/// Absolute expense total of one category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub name: String,
    pub total: Money,
}

/// Income/expense totals of a set of entries.
///
/// Expenses are signed (negative), `*_abs` fields carry their magnitude and
/// `net` is income plus signed expense. The `*_paid` fields only count paid
/// entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MonthlySummary {
    pub total_in: Money,
    pub total_ex: Money,
    pub total_ex_abs: Money,
    pub net: Money,
    pub total_in_paid: Money,
    pub total_ex_paid: Money,
    pub total_ex_paid_abs: Money,
    pub net_paid: Money,
    /// Expense totals per category name, largest first, zero totals omitted.
    pub expense_by_category: Vec<CategoryTotal>,
}

#[derive(Default)]
struct KindTotals {
    income: Money,
    expense: Money,
}

impl KindTotals {
    fn add(&mut self, entry: &LedgerEntry) {
        match entry.kind() {
            CategoryKind::Income => self.income += entry.transaction.amount,
            CategoryKind::Expense => self.expense += entry.transaction.amount,
        }
    }
}

/// Aggregates `entries` into a [`MonthlySummary`].
///
/// An empty slice yields all zeros.
pub fn aggregate(entries: &[LedgerEntry]) -> MonthlySummary {
    let mut all = KindTotals::default();
    let mut paid = KindTotals::default();

    let mut by_category: Vec<CategoryTotal> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for entry in entries {
        all.add(entry);
        if entry.transaction.status == TransactionStatus::Paid {
            paid.add(entry);
        }

        if entry.kind() == CategoryKind::Expense {
            let name = entry.category.name.as_str();
            match index.get(name) {
                Some(&i) => by_category[i].total += entry.transaction.amount,
                None => {
                    index.insert(name, by_category.len());
                    by_category.push(CategoryTotal {
                        name: name.to_string(),
                        total: entry.transaction.amount,
                    });
                }
            }
        }
    }

    let mut expense_by_category: Vec<CategoryTotal> = by_category
        .into_iter()
        .filter(|c| !c.total.is_zero())
        .map(|c| CategoryTotal {
            total: c.total.abs(),
            ..c
        })
        .collect();
    expense_by_category.sort_by(|a, b| b.total.cmp(&a.total));

    MonthlySummary {
        total_in: all.income,
        total_ex: all.expense,
        total_ex_abs: all.expense.abs(),
        net: all.income + all.expense,
        total_in_paid: paid.income,
        total_ex_paid: paid.expense,
        total_ex_paid_abs: paid.expense.abs(),
        net_paid: paid.income + paid.expense,
        expense_by_category,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::{Category, Transaction};

    fn entry(kind: CategoryKind, name: &str, cents: i64, status: TransactionStatus) -> LedgerEntry {
        let now = Utc::now();
        let category = Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            kind,
        };
        LedgerEntry {
            transaction: Transaction {
                id: Uuid::new_v4(),
                date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                description: String::new(),
                account_id: Uuid::new_v4(),
                category_id: category.id,
                amount: Money::new(cents),
                status,
                created_at: now,
                updated_at: now,
                group_id: None,
                installment_no: None,
                installment_count: None,
                is_fixed: false,
            },
            category,
        }
    }

    #[test]
    fn empty_input_is_all_zeros() {
        let summary = aggregate(&[]);
        assert_eq!(summary, MonthlySummary::default());
        assert_eq!(summary.net, Money::ZERO);
        assert!(summary.expense_by_category.is_empty());
    }

    #[test]
    fn paid_totals_only_count_paid_entries() {
        let summary = aggregate(&[
            entry(CategoryKind::Income, "Salary", 500_00, TransactionStatus::Paid),
            entry(CategoryKind::Expense, "Food", -120_00, TransactionStatus::Pending),
        ]);
        assert_eq!(summary.total_in, Money::new(500_00));
        assert_eq!(summary.total_ex, Money::new(-120_00));
        assert_eq!(summary.total_ex_abs, Money::new(120_00));
        assert_eq!(summary.net, Money::new(380_00));
        assert_eq!(summary.total_in_paid, Money::new(500_00));
        assert_eq!(summary.total_ex_paid, Money::ZERO);
        assert_eq!(summary.total_ex_paid_abs, Money::ZERO);
        assert_eq!(summary.net_paid, Money::new(500_00));
    }

    #[test]
    fn expense_breakdown_is_sorted_and_skips_zero_totals() {
        let summary = aggregate(&[
            entry(CategoryKind::Expense, "Food", -50_00, TransactionStatus::Paid),
            entry(CategoryKind::Expense, "Rent", -900_00, TransactionStatus::Pending),
            entry(CategoryKind::Expense, "Food", -25_50, TransactionStatus::Pending),
            entry(CategoryKind::Expense, "Refunds", -10_00, TransactionStatus::Paid),
            entry(CategoryKind::Expense, "Refunds", 10_00, TransactionStatus::Paid),
            entry(CategoryKind::Income, "Salary", 3_000_00, TransactionStatus::Paid),
        ]);
        assert_eq!(
            summary.expense_by_category,
            vec![
                CategoryTotal {
                    name: "Rent".to_string(),
                    total: Money::new(900_00)
                },
                CategoryTotal {
                    name: "Food".to_string(),
                    total: Money::new(75_50)
                },
            ]
        );
    }
}
