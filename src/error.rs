use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Serialize)]
pub enum SyndicateError {
    /// Active ownership percentages must sum to exactly 100
    #[error("Active share percentages sum to {0}, expected exactly 100")]
    InvalidShareSum(Decimal),

    /// A single share percentage is outside (0, 100]
    #[error("Invalid share percentage: {0}")]
    InvalidPercentage(Decimal),

    /// Horse must be billed in at least one installment
    #[error("Invalid installment count: {0}")]
    InvalidInstallmentCount(i64),

    /// A type-specific required transaction field is absent
    #[error("Field `{field}` is required for {kind} transactions")]
    MissingRequiredField { kind: String, field: String },

    /// Billing month outside 1..=12
    #[error("Invalid billing month: {0}")]
    InvalidPeriod(u32),

    /// Money amounts entering the core must be strictly positive
    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// Payment would push amount_paid past the installment amount
    #[error("Payment of {attempted} exceeds the remaining {remaining}")]
    Overpayment {
        attempted: Decimal,
        remaining: Decimal,
    },

    /// PAID is terminal; no further payment accepted
    #[error("Installment {0} is already paid")]
    AlreadyPaid(String),

    /// INCOME must come from a buyer holding an active share of the horse
    #[error("Buyer {buyer_id} holds no active share of horse {horse_id}")]
    NotHorseBuyer { buyer_id: String, horse_id: String },

    /// Email is already registered to another buyer
    #[error("Email {0} already registered")]
    EmailAlreadyRegistered(String),

    /// Email format is invalid
    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    #[error("Buyer {0} not found")]
    BuyerNotFound(String),

    #[error("Horse {0} not found")]
    HorseNotFound(String),

    #[error("Installment {0} not found")]
    InstallmentNotFound(String),

    #[error("Transaction {0} not found")]
    TransactionNotFound(String),

    /// Infrastructure fault; callers should retry
    #[error("Storage error: {0}")]
    StorageError(String),
}
