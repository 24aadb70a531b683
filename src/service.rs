use crate::allocation::{prize_effective, share_of};
use crate::error::SyndicateError;
use crate::logger::AuditLogger;
use crate::models::*;
use crate::schedule;
use crate::storage::{InstallmentFilter, Storage, TransactionFilter};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

/// A horse with its resolved schedule, the shape the detail endpoint serves.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct HorseDetail {
    pub horse: Horse,
    pub installments: Vec<Installment>,
    pub buyer_installments: Vec<BuyerInstallment>,
}

/// Outstanding installment debt of one buyer on one horse.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct HorseOutstanding {
    pub horse_id: Uuid,
    pub outstanding: Decimal,
}

/// A buyer's resolved balance, recomputed from the ledger and the
/// installment tables on every call.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct BuyerBalance {
    pub buyer_id: Uuid,
    /// Net figure: income + inter-account + effective prize shares
    /// − unsettled expense shares − remaining installment debt + adjustment.
    pub balance: Decimal,
    pub income_total: Decimal,
    pub inter_account_total: Decimal,
    pub prize_total: Decimal,
    pub unsettled_expense_total: Decimal,
    pub pending_installment_total: Decimal,
    pub total_paid: Decimal,
    pub adjustment: Decimal,
    pub horse_balances: Vec<HorseOutstanding>,
}

pub struct SyndicateService<S: Storage, L: AuditLogger> {
    storage: S,
    audit: L,
}

impl<S: Storage, L: AuditLogger> SyndicateService<S, L> {
    pub fn new(storage: S, audit: L) -> Self {
        info!("Initializing SyndicateService");
        SyndicateService { storage, audit }
    }

    // BUYER MANAGEMENT

    pub async fn create_buyer(
        &self,
        name: String,
        email: String,
        is_admin: bool,
    ) -> Result<Buyer, SyndicateError> {
        info!("Creating buyer with email: {}", email);
        if !email.contains('@') {
            warn!("Rejected malformed email: {}", email);
            return Err(SyndicateError::InvalidEmail(email));
        }

        let now = Utc::now();
        let buyer = Buyer::new(name, email, is_admin, now);
        self.storage.save_buyer(buyer.clone()).await?;
        debug!("Buyer created with ID: {}", buyer.id);

        self.audit
            .log(AuditLogEntry::new(
                Some(buyer.id),
                AuditAction::CreateBuyer,
                &json!({ "buyer_id": buyer.id }),
                now,
            ))
            .await?;

        Ok(buyer)
    }

    pub async fn get_buyer(&self, buyer_id: Uuid) -> Result<Option<Buyer>, SyndicateError> {
        self.storage.get_buyer(buyer_id).await
    }

    pub async fn list_buyers(&self) -> Result<Vec<Buyer>, SyndicateError> {
        self.storage.list_buyers().await
    }

    /// Manual balance correction; feeds the stored adjustment term of the
    /// balance aggregation.
    pub async fn adjust_buyer_balance(
        &self,
        buyer_id: Uuid,
        delta: Decimal,
        reason: Option<String>,
    ) -> Result<Buyer, SyndicateError> {
        info!("Adjusting balance of buyer {} by {}", buyer_id, delta);
        let now = Utc::now();
        let buyer = self
            .storage
            .add_buyer_adjustment(buyer_id, delta, now)
            .await?;

        self.audit
            .log(AuditLogEntry::new(
                Some(buyer_id),
                AuditAction::AdjustBuyerBalance,
                &json!({ "buyer_id": buyer_id, "delta": delta, "reason": reason }),
                now,
            ))
            .await?;

        Ok(buyer)
    }

    // SYNDICATE REGISTRY

    pub async fn create_horse(
        &self,
        name: String,
        information: Option<String>,
        total_value: Decimal,
        installment_count: i64,
        start: BillingPeriod,
        shares: Vec<ShareSpec>,
    ) -> Result<Horse, SyndicateError> {
        info!(
            "Creating horse '{}' valued {} over {} installments starting {}",
            name, total_value, installment_count, start
        );
        if installment_count <= 0 {
            warn!("Rejected installment count {}", installment_count);
            return Err(SyndicateError::InvalidInstallmentCount(installment_count));
        }
        if total_value <= Decimal::ZERO {
            return Err(SyndicateError::NonPositiveAmount(total_value));
        }
        if !start.is_valid() {
            return Err(SyndicateError::InvalidPeriod(start.month));
        }
        self.validate_shares(&shares).await?;

        let now = Utc::now();
        let horse = Horse {
            id: Uuid::new_v4(),
            name,
            information,
            total_value,
            installment_count: installment_count as u32,
            start,
            shares: shares.into_iter().map(|s| s.into_share(now)).collect(),
            created_at: now,
        };

        let (installments, buyer_rows) = schedule::generate_installments(&horse, now);
        self.storage.save_horse(horse.clone()).await?;
        self.storage.save_schedule(installments, buyer_rows).await?;
        debug!("Horse created with ID: {}", horse.id);

        self.audit
            .log(AuditLogEntry::new(
                None,
                AuditAction::CreateHorse,
                &json!({ "horse_id": horse.id, "total_value": horse.total_value }),
                now,
            ))
            .await?;

        Ok(horse)
    }

    pub async fn get_horse(&self, horse_id: Uuid) -> Result<Option<Horse>, SyndicateError> {
        self.storage.get_horse(horse_id).await
    }

    pub async fn list_horses(&self) -> Result<Vec<Horse>, SyndicateError> {
        self.storage.list_horses().await
    }

    pub async fn horse_detail(
        &self,
        horse_id: Uuid,
    ) -> Result<Option<HorseDetail>, SyndicateError> {
        let Some(horse) = self.storage.get_horse(horse_id).await? else {
            return Ok(None);
        };
        let installments = self.storage.list_installments(horse_id).await?;
        let buyer_installments = self
            .storage
            .list_buyer_installments(InstallmentFilter {
                horse_id: Some(horse_id),
                ..Default::default()
            })
            .await?;
        Ok(Some(HorseDetail {
            horse,
            installments,
            buyer_installments,
        }))
    }

    /// Replaces a horse's share list. The sum-to-100 invariant is
    /// re-validated before anything commits; existing installments keep the
    /// amounts they were generated with.
    pub async fn update_shares(
        &self,
        horse_id: Uuid,
        shares: Vec<ShareSpec>,
    ) -> Result<Horse, SyndicateError> {
        info!("Updating shares of horse {}", horse_id);
        if self.storage.get_horse(horse_id).await?.is_none() {
            return Err(SyndicateError::HorseNotFound(horse_id.to_string()));
        }
        self.validate_shares(&shares).await?;

        let now = Utc::now();
        let horse = self
            .storage
            .update_horse_shares(
                horse_id,
                shares.into_iter().map(|s| s.into_share(now)).collect(),
            )
            .await?;
        debug!("Shares updated for horse {}", horse_id);

        self.audit
            .log(AuditLogEntry::new(
                None,
                AuditAction::UpdateShares,
                &json!({ "horse_id": horse_id }),
                now,
            ))
            .await?;

        Ok(horse)
    }

    // TRANSACTION LEDGER

    pub async fn record_transaction(
        &self,
        draft: TransactionDraft,
    ) -> Result<Transaction, SyndicateError> {
        info!(
            "Recording {} transaction of {} for period {}",
            draft.kind, draft.amount, draft.period
        );
        draft.validate()?;

        let horse = match draft.horse_id {
            Some(horse_id) => Some(
                self.storage
                    .get_horse(horse_id)
                    .await?
                    .ok_or_else(|| SyndicateError::HorseNotFound(horse_id.to_string()))?,
            ),
            None => None,
        };
        if let Some(buyer_id) = draft.buyer_id {
            if self.storage.get_buyer(buyer_id).await?.is_none() {
                return Err(SyndicateError::BuyerNotFound(buyer_id.to_string()));
            }
        }

        // An income is a contribution against a specific horse; the payer
        // must hold an active share of it.
        if draft.kind == TransactionKind::Income {
            if let (Some(horse), Some(buyer_id)) = (&horse, draft.buyer_id) {
                if horse.share_for(buyer_id).is_none() {
                    warn!(
                        "Income from {} rejected: no active share of horse {}",
                        buyer_id, horse.id
                    );
                    return Err(SyndicateError::NotHorseBuyer {
                        buyer_id: buyer_id.to_string(),
                        horse_id: horse.id.to_string(),
                    });
                }
            }
        }

        let now = Utc::now();
        let transaction = draft.into_transaction(now);
        self.storage.save_transaction(transaction.clone()).await?;
        debug!("Transaction recorded with ID: {}", transaction.id);

        self.audit
            .log(AuditLogEntry::new(
                transaction.buyer_id,
                AuditAction::RecordTransaction,
                &json!({
                    "transaction_id": transaction.id,
                    "kind": transaction.kind,
                    "amount": transaction.amount,
                }),
                now,
            ))
            .await?;

        Ok(transaction)
    }

    pub async fn mark_settled(&self, transaction_id: Uuid) -> Result<Transaction, SyndicateError> {
        info!("Marking transaction {} settled", transaction_id);
        let transaction = self
            .storage
            .set_transaction_settled(transaction_id, true)
            .await?;

        self.audit
            .log(AuditLogEntry::new(
                transaction.buyer_id,
                AuditAction::MarkSettled,
                &json!({ "transaction_id": transaction_id }),
                Utc::now(),
            ))
            .await?;

        Ok(transaction)
    }

    pub async fn get_transaction(
        &self,
        transaction_id: Uuid,
    ) -> Result<Option<Transaction>, SyndicateError> {
        self.storage.get_transaction(transaction_id).await
    }

    pub async fn list_transactions(
        &self,
        filter: TransactionFilter,
    ) -> Result<Vec<Transaction>, SyndicateError> {
        self.storage.list_transactions(filter).await
    }

    pub async fn list_buyer_installments(
        &self,
        filter: InstallmentFilter,
    ) -> Result<Vec<BuyerInstallment>, SyndicateError> {
        self.storage.list_buyer_installments(filter).await
    }

    // PAYMENT PROCESSOR

    /// Applies `amount` against one buyer installment. With
    /// `deduct_from_balance` the ledger also receives the matching debit so
    /// the balance aggregation sees the money leave the buyer's account.
    pub async fn pay_installment(
        &self,
        buyer_installment_id: Uuid,
        amount: Decimal,
        deduct_from_balance: bool,
    ) -> Result<BuyerInstallment, SyndicateError> {
        info!(
            "Paying {} against installment {}",
            amount, buyer_installment_id
        );
        let now = Utc::now();
        let row = self
            .storage
            .apply_installment_payment(buyer_installment_id, amount, now)
            .await?;
        debug!(
            "Installment {} now {} with {} paid",
            row.id, row.status, row.amount_paid
        );

        if deduct_from_balance {
            // Built directly rather than routed through record_transaction:
            // the public ledger API rejects non-positive amounts, while this
            // internal debit is negative by construction.
            let debit = Transaction {
                id: Uuid::new_v4(),
                kind: TransactionKind::InterAccountPayment,
                concept: "installment payment".to_string(),
                amount: -amount,
                period: BillingPeriod::from_date(now.date_naive()),
                horse_id: Some(row.horse_id),
                buyer_id: Some(row.buyer_id),
                payment_date: Some(now),
                effective_date: None,
                settled: true,
                notes: None,
                created_at: now,
            };
            self.storage.save_transaction(debit).await?;
        }

        self.audit
            .log(AuditLogEntry::new(
                Some(row.buyer_id),
                AuditAction::PayInstallment,
                &json!({
                    "buyer_installment_id": row.id,
                    "amount": amount,
                    "status": row.status,
                    "deduct_from_balance": deduct_from_balance,
                }),
                now,
            ))
            .await?;

        Ok(row)
    }

    // OVERDUE SWEEPER

    /// Marks every unpaid installment past its due date overdue. Idempotent
    /// for a fixed `today`; racing invocations converge on the same state.
    pub async fn sweep_overdue(&self, today: NaiveDate) -> Result<u64, SyndicateError> {
        let swept = self.storage.sweep_overdue(today).await?;
        if swept > 0 {
            info!("Swept {} installments into OVERDUE as of {}", swept, today);
            self.audit
                .log(AuditLogEntry::new(
                    None,
                    AuditAction::SweepOverdue,
                    &json!({ "today": today, "swept": swept }),
                    Utc::now(),
                ))
                .await?;
        }
        Ok(swept)
    }

    // BALANCE AGGREGATOR

    pub async fn buyer_balance(&self, buyer_id: Uuid) -> Result<BuyerBalance, SyndicateError> {
        self.buyer_balance_as_of(buyer_id, Utc::now().date_naive())
            .await
    }

    /// Derives the buyer's net balance from a storage snapshot. Nothing is
    /// written; the same snapshot and `today` always produce the same figure.
    pub async fn buyer_balance_as_of(
        &self,
        buyer_id: Uuid,
        today: NaiveDate,
    ) -> Result<BuyerBalance, SyndicateError> {
        debug!("Aggregating balance for buyer {} as of {}", buyer_id, today);
        let buyer = self
            .storage
            .get_buyer(buyer_id)
            .await?
            .ok_or_else(|| SyndicateError::BuyerNotFound(buyer_id.to_string()))?;

        // Buyer-direct events: income and inter-account payments carry the
        // buyer id themselves and are never split.
        let direct = self
            .storage
            .list_transactions(TransactionFilter {
                buyer_id: Some(buyer_id),
                ..Default::default()
            })
            .await?;
        let income_total: Decimal = direct
            .iter()
            .filter(|tx| tx.kind == TransactionKind::Income)
            .map(|tx| tx.amount)
            .sum();
        let inter_account_total: Decimal = direct
            .iter()
            .filter(|tx| tx.kind == TransactionKind::InterAccountPayment)
            .map(|tx| tx.amount)
            .sum();

        // Horse-level events split over the current active shares.
        let mut prize_total = Decimal::ZERO;
        let mut unsettled_expense_total = Decimal::ZERO;
        for horse in self.storage.list_horses().await? {
            if horse.share_for(buyer_id).is_none() {
                continue;
            }
            let horse_transactions = self
                .storage
                .list_transactions(TransactionFilter {
                    horse_id: Some(horse.id),
                    ..Default::default()
                })
                .await?;
            for tx in &horse_transactions {
                match tx.kind {
                    TransactionKind::Prize if prize_effective(tx, today) => {
                        prize_total += share_of(buyer_id, tx, &horse.shares);
                    }
                    TransactionKind::Expense if !tx.settled => {
                        unsettled_expense_total += share_of(buyer_id, tx, &horse.shares);
                    }
                    _ => {}
                }
            }
        }

        let rows = self
            .storage
            .list_buyer_installments(InstallmentFilter {
                buyer_id: Some(buyer_id),
                ..Default::default()
            })
            .await?;
        let pending_installment_total: Decimal = rows.iter().map(|r| r.remaining()).sum();
        let total_paid: Decimal = rows.iter().map(|r| r.amount_paid).sum();

        let mut horse_balances: Vec<HorseOutstanding> = Vec::new();
        for row in &rows {
            match horse_balances
                .iter_mut()
                .find(|h| h.horse_id == row.horse_id)
            {
                Some(entry) => entry.outstanding += row.remaining(),
                None => horse_balances.push(HorseOutstanding {
                    horse_id: row.horse_id,
                    outstanding: row.remaining(),
                }),
            }
        }

        let balance = income_total + inter_account_total + prize_total
            - unsettled_expense_total
            - pending_installment_total
            + buyer.adjustment;

        Ok(BuyerBalance {
            buyer_id,
            balance,
            income_total,
            inter_account_total,
            prize_total,
            unsettled_expense_total,
            pending_installment_total,
            total_paid,
            adjustment: buyer.adjustment,
            horse_balances,
        })
    }

    // AUDIT TRAIL

    pub async fn audit_entries(&self) -> Result<Vec<AuditLogEntry>, SyndicateError> {
        self.audit.entries().await
    }

    // VALIDATION HELPERS

    /// Each percentage must sit in (0, 100] and the active ones must sum to
    /// exactly 100 — an exact fixed-point check, no tolerance.
    async fn validate_shares(&self, shares: &[ShareSpec]) -> Result<(), SyndicateError> {
        for spec in shares {
            if spec.percentage <= Decimal::ZERO || spec.percentage > Decimal::ONE_HUNDRED {
                warn!("Rejected share percentage {}", spec.percentage);
                return Err(SyndicateError::InvalidPercentage(spec.percentage));
            }
        }
        let active_total: Decimal = shares
            .iter()
            .filter(|s| s.active)
            .map(|s| s.percentage)
            .sum();
        if active_total != Decimal::ONE_HUNDRED {
            warn!("Active share percentages sum to {}", active_total);
            return Err(SyndicateError::InvalidShareSum(active_total));
        }
        for spec in shares {
            if self.storage.get_buyer(spec.buyer_id).await?.is_none() {
                return Err(SyndicateError::BuyerNotFound(spec.buyer_id.to_string()));
            }
        }
        Ok(())
    }
}
