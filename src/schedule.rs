//! Installment schedule generation.
//!
//! Run once per horse, at registration. Produces the fixed batch of
//! installments plus per-buyer rows; afterwards only the payment processor
//! and the overdue sweeper touch installment state.

use crate::allocation::{active_split_inputs, round_money, split_proportionally};
use crate::models::{BillingPeriod, BuyerInstallment, Horse, Installment, PaymentStatus};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Due period for installment `number` (1-indexed): the starting billing
/// month advanced by `number` months, so the first charged month is the
/// month after the configured start.
pub fn due_period(start: BillingPeriod, number: u32) -> BillingPeriod {
    start.plus_months(number)
}

/// Per-installment horse amount, fixed-point at two decimals.
pub fn installment_amount(total_value: Decimal, installment_count: u32) -> Decimal {
    round_money(total_value / Decimal::from(installment_count))
}

/// Generates the full schedule for a horse: `installment_count` installments,
/// each split across the active shares so the buyer rows sum to the horse
/// amount exactly.
pub fn generate_installments(
    horse: &Horse,
    now: DateTime<Utc>,
) -> (Vec<Installment>, Vec<BuyerInstallment>) {
    let horse_amount = installment_amount(horse.total_value, horse.installment_count);
    let inputs = active_split_inputs(&horse.shares);

    let mut installments = Vec::with_capacity(horse.installment_count as usize);
    let mut buyer_rows = Vec::with_capacity(horse.installment_count as usize * inputs.len());

    for number in 1..=horse.installment_count {
        let due = due_period(horse.start, number);
        let due_date = due.last_day();
        let installment = Installment {
            id: Uuid::new_v4(),
            horse_id: horse.id,
            number,
            due,
            due_date,
            horse_amount,
            created_at: now,
        };

        for (buyer_id, amount) in split_proportionally(horse_amount, &inputs) {
            buyer_rows.push(BuyerInstallment {
                id: Uuid::new_v4(),
                installment_id: installment.id,
                horse_id: horse.id,
                buyer_id,
                due,
                due_date,
                amount,
                amount_paid: Decimal::ZERO,
                status: PaymentStatus::Pending,
                last_payment_date: None,
                created_at: now,
                updated_at: now,
            });
        }

        installments.push(installment);
    }

    (installments, buyer_rows)
}
