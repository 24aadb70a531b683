use super::period::BillingPeriod;
use crate::error::SyndicateError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    /// A buyer's direct contribution. Credited to the buyer, never split.
    Income,
    /// Horse-level cost, split across active buyers by percentage.
    Expense,
    /// Horse-level gain, split across active buyers; takes effect the month
    /// after `effective_date`.
    Prize,
    /// Admin-initiated transfer between an administrative account and a
    /// buyer. Never split.
    InterAccountPayment,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransactionKind::Income => "INCOME",
            TransactionKind::Expense => "EXPENSE",
            TransactionKind::Prize => "PRIZE",
            TransactionKind::InterAccountPayment => "INTER_ACCOUNT_PAYMENT",
        };
        write!(f, "{}", s)
    }
}

/// An appended ledger event. Immutable once recorded except for `settled`.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Transaction {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub concept: String,
    pub amount: Decimal,
    pub period: BillingPeriod,
    pub horse_id: Option<Uuid>,
    pub buyer_id: Option<Uuid>,
    pub payment_date: Option<DateTime<Utc>>,
    pub effective_date: Option<DateTime<Utc>>,
    pub settled: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The caller-supplied portion of a transaction; `record_transaction` turns
/// an accepted draft into a ledger row.
#[derive(Clone, Debug)]
pub struct TransactionDraft {
    pub kind: TransactionKind,
    pub concept: String,
    pub amount: Decimal,
    pub period: BillingPeriod,
    pub horse_id: Option<Uuid>,
    pub buyer_id: Option<Uuid>,
    pub payment_date: Option<DateTime<Utc>>,
    pub effective_date: Option<DateTime<Utc>>,
    pub settled: Option<bool>,
    pub notes: Option<String>,
}

impl TransactionDraft {
    /// Per-kind required-field validation. INCOME needs buyer, horse and a
    /// payment date; EXPENSE needs horse and a settled flag; PRIZE needs
    /// horse and an effective date; INTER_ACCOUNT_PAYMENT needs buyer and
    /// horse.
    pub fn validate(&self) -> Result<(), SyndicateError> {
        if self.amount <= Decimal::ZERO {
            return Err(SyndicateError::NonPositiveAmount(self.amount));
        }
        if !self.period.is_valid() {
            return Err(SyndicateError::InvalidPeriod(self.period.month));
        }

        let missing = |field: &str| SyndicateError::MissingRequiredField {
            kind: self.kind.to_string(),
            field: field.to_string(),
        };

        match self.kind {
            TransactionKind::Income => {
                if self.buyer_id.is_none() {
                    return Err(missing("buyer_id"));
                }
                if self.horse_id.is_none() {
                    return Err(missing("horse_id"));
                }
                if self.payment_date.is_none() {
                    return Err(missing("payment_date"));
                }
            }
            TransactionKind::Expense => {
                if self.horse_id.is_none() {
                    return Err(missing("horse_id"));
                }
                if self.settled.is_none() {
                    return Err(missing("settled"));
                }
            }
            TransactionKind::Prize => {
                if self.horse_id.is_none() {
                    return Err(missing("horse_id"));
                }
                if self.effective_date.is_none() {
                    return Err(missing("effective_date"));
                }
            }
            TransactionKind::InterAccountPayment => {
                if self.buyer_id.is_none() {
                    return Err(missing("buyer_id"));
                }
                if self.horse_id.is_none() {
                    return Err(missing("horse_id"));
                }
            }
        }
        Ok(())
    }

    pub fn into_transaction(self, now: DateTime<Utc>) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            kind: self.kind,
            concept: self.concept,
            amount: self.amount,
            period: self.period,
            horse_id: self.horse_id,
            buyer_id: self.buyer_id,
            payment_date: self.payment_date,
            effective_date: self.effective_date,
            settled: self.settled.unwrap_or(false),
            notes: self.notes,
            created_at: now,
        }
    }
}
