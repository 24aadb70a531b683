use super::period::BillingPeriod;
use crate::error::SyndicateError;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Pending,
    Partial,
    Paid,
    Overdue,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Partial => "PARTIAL",
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Overdue => "OVERDUE",
        };
        write!(f, "{}", s)
    }
}

/// One scheduled monthly billing unit for a horse. Created in a single batch
/// when the horse is registered, never deleted.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Installment {
    pub id: Uuid,
    pub horse_id: Uuid,
    /// 1..=installment_count
    pub number: u32,
    pub due: BillingPeriod,
    pub due_date: NaiveDate,
    pub horse_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// One buyer's independently payable portion of an installment.
///
/// The per-installment sum of `amount` over all buyer rows equals
/// `horse_amount` exactly; the scheduler guarantees it at creation and
/// nothing afterwards may change `amount`.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct BuyerInstallment {
    pub id: Uuid,
    pub installment_id: Uuid,
    pub horse_id: Uuid,
    pub buyer_id: Uuid,
    pub due: BillingPeriod,
    pub due_date: NaiveDate,
    pub amount: Decimal,
    pub amount_paid: Decimal,
    pub status: PaymentStatus,
    pub last_payment_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BuyerInstallment {
    pub fn remaining(&self) -> Decimal {
        self.amount - self.amount_paid
    }

    /// Applies one payment against this row.
    ///
    /// Storage invokes this under the row lock, so the overpay check and the
    /// increment are a single atomic step: racing partial payments can never
    /// jointly exceed `amount`.
    pub fn register_payment(
        &mut self,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<(), SyndicateError> {
        if amount <= Decimal::ZERO {
            return Err(SyndicateError::NonPositiveAmount(amount));
        }
        if self.status == PaymentStatus::Paid {
            return Err(SyndicateError::AlreadyPaid(self.id.to_string()));
        }
        let remaining = self.remaining();
        if amount > remaining {
            return Err(SyndicateError::Overpayment {
                attempted: amount,
                remaining,
            });
        }

        self.amount_paid += amount;
        self.last_payment_date = Some(now);
        self.updated_at = now;
        self.status = if self.amount_paid == self.amount {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Partial
        };
        Ok(())
    }

    /// Transitions Pending/Partial past the due date into Overdue. Returns
    /// whether the row changed; Paid rows never change, and re-running with
    /// the same `today` is a no-op.
    pub fn mark_overdue_if_due(&mut self, today: NaiveDate) -> bool {
        let sweepable = matches!(self.status, PaymentStatus::Pending | PaymentStatus::Partial);
        if sweepable && self.due_date < today {
            self.status = PaymentStatus::Overdue;
            return true;
        }
        false
    }
}
