//! Proportional allocation of horse-level amounts across ownership shares.
//!
//! All splitting goes through [`split_proportionally`] so that a horse-level
//! amount always distributes to exactly its total: naive per-buyer rounding
//! would drift by a cent whenever the percentages do not divide evenly.

use crate::constants::{CENT, MONEY_SCALE};
use crate::models::{BillingPeriod, OwnershipShare, Transaction, TransactionKind};
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

/// Rounds to money scale, half away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Largest-remainder split of `total` over `(buyer_id, percentage)` pairs.
///
/// Raw shares are truncated to two decimals, then the residual cents are
/// handed out one at a time to the largest fractional remainders (ties broken
/// by percentage, descending) until the per-buyer sum equals `round_money(total)`
/// exactly. Returns one `(buyer_id, amount)` row per input pair, input order
/// preserved.
pub fn split_proportionally(total: Decimal, shares: &[(Uuid, Decimal)]) -> Vec<(Uuid, Decimal)> {
    if shares.is_empty() {
        return Vec::new();
    }
    let target = round_money(total);

    struct Row {
        index: usize,
        floor: Decimal,
        remainder: Decimal,
        percentage: Decimal,
    }

    let mut rows: Vec<Row> = shares
        .iter()
        .enumerate()
        .map(|(index, (_, percentage))| {
            let raw = total * *percentage / Decimal::ONE_HUNDRED;
            let floor = raw.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::ToZero);
            Row {
                index,
                floor,
                remainder: raw - floor,
                percentage: *percentage,
            }
        })
        .collect();

    let floored: Decimal = rows.iter().map(|r| r.floor).sum();
    let residual_cents = ((target - floored) / CENT).to_i64().unwrap_or(0);

    rows.sort_by(|a, b| {
        b.remainder
            .cmp(&a.remainder)
            .then(b.percentage.cmp(&a.percentage))
    });

    let mut amounts: Vec<Decimal> = vec![Decimal::ZERO; shares.len()];
    for row in &rows {
        amounts[row.index] = row.floor;
    }
    for i in 0..residual_cents.max(0) as usize {
        let index = rows[i % rows.len()].index;
        amounts[index] += CENT;
    }

    shares
        .iter()
        .zip(amounts)
        .map(|((buyer_id, _), amount)| (*buyer_id, amount))
        .collect()
}

/// Active `(buyer_id, percentage)` pairs of a share list, the shape the
/// splitter consumes.
pub fn active_split_inputs(shares: &[OwnershipShare]) -> Vec<(Uuid, Decimal)> {
    shares
        .iter()
        .filter(|s| s.active)
        .map(|s| (s.buyer_id, s.percentage))
        .collect()
}

/// A buyer's monetary share of one ledger event.
///
/// EXPENSE and PRIZE split over the *current* active shares; INCOME and
/// INTER_ACCOUNT_PAYMENT belong to their buyer in full; anything else is
/// zero.
pub fn share_of(buyer_id: Uuid, transaction: &Transaction, shares: &[OwnershipShare]) -> Decimal {
    match transaction.kind {
        TransactionKind::Expense | TransactionKind::Prize => {
            if transaction.horse_id.is_none() {
                return Decimal::ZERO;
            }
            let inputs = active_split_inputs(shares);
            split_proportionally(transaction.amount, &inputs)
                .into_iter()
                .find(|(id, _)| *id == buyer_id)
                .map(|(_, amount)| amount)
                .unwrap_or(Decimal::ZERO)
        }
        TransactionKind::Income | TransactionKind::InterAccountPayment => {
            if transaction.buyer_id == Some(buyer_id) {
                transaction.amount
            } else {
                Decimal::ZERO
            }
        }
    }
}

/// Whether a PRIZE counts toward balances as of `today`. Prizes become
/// effective the month after their effective date, mirroring the installment
/// schedule offset.
pub fn prize_effective(transaction: &Transaction, today: NaiveDate) -> bool {
    match (transaction.kind, transaction.effective_date) {
        (TransactionKind::Prize, Some(effective)) => {
            BillingPeriod::from_date(effective.date_naive()).next()
                <= BillingPeriod::from_date(today)
        }
        _ => false,
    }
}
