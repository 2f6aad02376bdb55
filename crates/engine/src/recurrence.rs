//! Monthly rollover of fixed entries.
//!
//! A fixed entry of one month is copied into the next month on the same day
//! (clamped to the last day of shorter months) as a new pending entry. The
//! copy is identified by [`FixedEntryKey`]: a second rollover of the same month
//! finds the key already present and creates nothing.

use std::fmt;

use chrono::{Months, NaiveDate};
use uuid::Uuid;

use crate::{Money, NewTransaction, Period, Transaction, TransactionStatus};

/// The field tuple that identifies a fixed entry within a month.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FixedEntryKey {
    pub date: NaiveDate,
    pub account_id: Uuid,
    pub category_id: Uuid,
    pub description: String,
    pub amount: Money,
}

impl From<&NewTransaction> for FixedEntryKey {
    fn from(row: &NewTransaction) -> Self {
        Self {
            date: row.date,
            account_id: row.account_id,
            category_id: row.category_id,
            description: row.description.clone(),
            amount: row.amount,
        }
    }
}

impl fmt::Display for FixedEntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fixed entry \"{}\" of {} on {}",
            self.description, self.amount, self.date
        )
    }
}

/// Builds the copy of `source` for `target`.
///
/// Returns `None` when `source` does not roll over or its date cannot be moved
/// into `target`, i.e. it is not in the month right before it.
pub fn rollover_candidate(source: &Transaction, target: Period) -> Option<NewTransaction> {
    if !source.rolls_over() {
        return None;
    }
    let date = source.date.checked_add_months(Months::new(1))?;
    if !target.contains(date) {
        return None;
    }
    Some(NewTransaction {
        id: Uuid::new_v4(),
        date,
        description: source.description.clone(),
        account_id: source.account_id,
        category_id: source.category_id,
        amount: source.amount,
        status: TransactionStatus::Pending,
        group_id: None,
        installment_no: None,
        installment_count: None,
        is_fixed: true,
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fixed_on(day: NaiveDate) -> Transaction {
        let now = Utc::now();
        Transaction {
            id: Uuid::new_v4(),
            date: day,
            description: "Internet".to_string(),
            account_id: Uuid::new_v4(),
            category_id: Uuid::new_v4(),
            amount: Money::new(-99_90),
            status: TransactionStatus::Paid,
            created_at: now,
            updated_at: now,
            group_id: None,
            installment_no: None,
            installment_count: None,
            is_fixed: true,
        }
    }

    #[test]
    fn copies_fields_and_resets_status() {
        let source = fixed_on(date(2024, 4, 10));
        let target = Period::new(2024, 5).unwrap();
        let copy = rollover_candidate(&source, target).unwrap();

        assert_ne!(copy.id, source.id);
        assert_eq!(copy.date, date(2024, 5, 10));
        assert_eq!(copy.description, source.description);
        assert_eq!(copy.account_id, source.account_id);
        assert_eq!(copy.category_id, source.category_id);
        assert_eq!(copy.amount, source.amount);
        assert_eq!(copy.status, TransactionStatus::Pending);
        assert!(copy.is_fixed);
        assert_eq!(copy.group_id, None);
        assert_eq!(copy.installment_count, None);
    }

    #[test]
    fn clamps_to_the_last_day_of_the_target_month() {
        let source = fixed_on(date(2024, 1, 31));
        let copy = rollover_candidate(&source, Period::new(2024, 2).unwrap()).unwrap();
        assert_eq!(copy.date, date(2024, 2, 29));

        let source = fixed_on(date(2023, 1, 31));
        let copy = rollover_candidate(&source, Period::new(2023, 2).unwrap()).unwrap();
        assert_eq!(copy.date, date(2023, 2, 28));
    }

    #[test]
    fn ignores_non_fixed_entries_and_wrong_months() {
        let mut source = fixed_on(date(2024, 4, 10));
        assert!(rollover_candidate(&source, Period::new(2024, 6).unwrap()).is_none());

        source.installment_count = Some(3);
        assert!(rollover_candidate(&source, Period::new(2024, 5).unwrap()).is_none());

        source.installment_count = None;
        source.is_fixed = false;
        assert!(rollover_candidate(&source, Period::new(2024, 5).unwrap()).is_none());
    }

    #[test]
    fn key_matches_the_candidate_fields() {
        let source = fixed_on(date(2024, 4, 10));
        let copy = rollover_candidate(&source, Period::new(2024, 5).unwrap()).unwrap();
        let key = FixedEntryKey::from(&copy);
        assert_eq!(key.date, copy.date);
        assert_eq!(key.amount, copy.amount);
        assert_eq!(key.description, "Internet");
        assert_eq!(key.to_string(), "fixed entry \"Internet\" of -99.90 on 2024-05-10");
    }
}
