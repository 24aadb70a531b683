use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::SyndicateError;
use crate::models::{
    BillingPeriod, Buyer, BuyerInstallment, Horse, Installment, OwnershipShare, PaymentStatus,
    Transaction, TransactionKind,
};

/// Typed query parameters for ledger listings.
#[derive(Clone, Copy, Debug, Default)]
pub struct TransactionFilter {
    pub horse_id: Option<Uuid>,
    pub buyer_id: Option<Uuid>,
    pub period: Option<BillingPeriod>,
    pub kind: Option<TransactionKind>,
}

/// Typed query parameters for installment listings.
#[derive(Clone, Copy, Debug, Default)]
pub struct InstallmentFilter {
    pub horse_id: Option<Uuid>,
    pub buyer_id: Option<Uuid>,
    pub period: Option<BillingPeriod>,
    pub status: Option<PaymentStatus>,
}

/// The single logical shared resource behind the service. Implementations
/// must give each mutating call per-entity atomicity: a buyer installment is
/// the unit of write contention for payments, a horse's share list for share
/// updates.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn save_buyer(&self, buyer: Buyer) -> Result<(), SyndicateError>;
    async fn get_buyer(&self, buyer_id: Uuid) -> Result<Option<Buyer>, SyndicateError>;
    async fn get_buyer_by_email(&self, email: &str) -> Result<Option<Buyer>, SyndicateError>;
    async fn list_buyers(&self) -> Result<Vec<Buyer>, SyndicateError>;
    /// Adds a manual correction to the buyer's stored adjustment balance.
    async fn add_buyer_adjustment(
        &self,
        buyer_id: Uuid,
        delta: Decimal,
        now: DateTime<Utc>,
    ) -> Result<Buyer, SyndicateError>;

    async fn save_horse(&self, horse: Horse) -> Result<(), SyndicateError>;
    async fn get_horse(&self, horse_id: Uuid) -> Result<Option<Horse>, SyndicateError>;
    async fn list_horses(&self) -> Result<Vec<Horse>, SyndicateError>;
    async fn update_horse_shares(
        &self,
        horse_id: Uuid,
        shares: Vec<OwnershipShare>,
    ) -> Result<Horse, SyndicateError>;

    /// Persists a freshly generated schedule in one batch.
    async fn save_schedule(
        &self,
        installments: Vec<Installment>,
        buyer_rows: Vec<BuyerInstallment>,
    ) -> Result<(), SyndicateError>;
    async fn list_installments(&self, horse_id: Uuid) -> Result<Vec<Installment>, SyndicateError>;
    async fn get_buyer_installment(
        &self,
        id: Uuid,
    ) -> Result<Option<BuyerInstallment>, SyndicateError>;
    async fn list_buyer_installments(
        &self,
        filter: InstallmentFilter,
    ) -> Result<Vec<BuyerInstallment>, SyndicateError>;
    /// Runs the overpay check and the increment as one atomic step against
    /// the stored row; two racing partial payments can never jointly exceed
    /// the installment amount.
    async fn apply_installment_payment(
        &self,
        id: Uuid,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<BuyerInstallment, SyndicateError>;
    /// Transitions every Pending/Partial row past its due date to Overdue.
    /// Returns the number of rows changed; idempotent for a fixed `today`.
    async fn sweep_overdue(&self, today: NaiveDate) -> Result<u64, SyndicateError>;

    async fn save_transaction(&self, transaction: Transaction) -> Result<(), SyndicateError>;
    async fn get_transaction(&self, id: Uuid) -> Result<Option<Transaction>, SyndicateError>;
    async fn set_transaction_settled(
        &self,
        id: Uuid,
        settled: bool,
    ) -> Result<Transaction, SyndicateError>;
    async fn list_transactions(
        &self,
        filter: TransactionFilter,
    ) -> Result<Vec<Transaction>, SyndicateError>;
}

pub mod in_memory;
