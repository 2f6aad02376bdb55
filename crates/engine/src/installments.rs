//! Installment splitting.
//!
//! A total is divided into `N` monthly slices. The slice is the total divided
//! by `N`, truncated to the cent; the cents lost by truncation are handed back
//! one at a time to the first installments. The slices therefore sum exactly
//! to the total and never differ from each other by more than one cent.

use chrono::{Months, NaiveDate};
use uuid::Uuid;

use crate::{
    EngineError, Money, NewTransaction, ResultEngine, TransactionStatus, util::ensure_description_len,
};

/// Upper bound for `N` (the installment columns are small integers).
pub const MAX_INSTALLMENTS: u32 = 32_767;

/// Fields shared by every line item of a split.
#[derive(Clone, Debug)]
pub struct EntryTemplate {
    pub account_id: Uuid,
    pub category_id: Uuid,
    /// Used for the installment descriptions when `description` is blank.
    pub category_name: String,
    pub description: String,
    pub status: TransactionStatus,
    pub is_fixed: bool,
}

/// Splits `total` into `count` amounts that sum exactly to `total`.
///
/// ```rust
/// use engine::{Money, installments::split_amount};
///
/// let parts = split_amount(Money::new(-100_00), 3).unwrap();
/// assert_eq!(parts, vec![Money::new(-33_34), Money::new(-33_33), Money::new(-33_33)]);
/// ```
pub fn split_amount(total: Money, count: u32) -> ResultEngine<Vec<Money>> {
    if count == 0 {
        return Err(EngineError::InvalidInstallments(
            "installments must be at least 1".to_string(),
        ));
    }
    let n = i64::from(count);
    let base = total
        .div_trunc(n)
        .ok_or_else(|| EngineError::InvalidInstallments("division by zero".to_string()))?;
    let remainder = total - base * n;
    // |remainder| < n, so each of the first |remainder| slices takes one cent.
    let extra = remainder.cents().unsigned_abs();
    let step = Money::new(remainder.signum());

    Ok((0..u64::from(count))
        .map(|i| if i < extra { base + step } else { base })
        .collect())
}

/// Plans the rows created for one transaction request.
///
/// With `count == 1` the result is a single standalone (or fixed) entry. With
/// `count > 1` every row shares a fresh group id, is dated one calendar month
/// after the previous one (clamped to the last day of shorter months) and only
/// the first one keeps the requested status.
pub fn plan_installments(
    total: Money,
    count: u32,
    start: NaiveDate,
    template: &EntryTemplate,
) -> ResultEngine<Vec<NewTransaction>> {
    if count == 0 || count > MAX_INSTALLMENTS {
        return Err(EngineError::InvalidInstallments(format!(
            "installments must be between 1 and {MAX_INSTALLMENTS}, got {count}"
        )));
    }

    let description = template.description.trim();

    if count == 1 {
        ensure_description_len(description)?;
        return Ok(vec![NewTransaction {
            id: Uuid::new_v4(),
            date: start,
            description: description.to_string(),
            account_id: template.account_id,
            category_id: template.category_id,
            amount: total,
            status: template.status,
            group_id: None,
            installment_no: None,
            installment_count: None,
            is_fixed: template.is_fixed,
        }]);
    }

    let base_description = if description.is_empty() {
        template.category_name.trim()
    } else {
        description
    };
    let group_id = Uuid::new_v4();
    let amounts = split_amount(total, count)?;

    let mut rows = Vec::with_capacity(amounts.len());
    for (i, amount) in (0..count).zip(amounts) {
        let date = start.checked_add_months(Months::new(i)).ok_or_else(|| {
            EngineError::InvalidDate(format!("installment {} is out of range", i + 1))
        })?;
        let description = format!("{base_description} ({}/{count})", i + 1);
        ensure_description_len(&description)?;

        rows.push(NewTransaction {
            id: Uuid::new_v4(),
            date,
            description,
            account_id: template.account_id,
            category_id: template.category_id,
            amount,
            status: if i == 0 {
                template.status
            } else {
                TransactionStatus::Pending
            },
            group_id: Some(group_id),
            installment_no: Some(i + 1),
            installment_count: Some(count),
            is_fixed: false,
        });
    }

    Ok(rows)
}
