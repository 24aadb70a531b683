use crate::error::SyndicateError;
use crate::models::{
    Buyer, BuyerInstallment, Horse, Installment, OwnershipShare, Transaction,
};
use crate::storage::{InstallmentFilter, Storage, TransactionFilter};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

pub struct InMemoryStorage {
    buyers: Mutex<HashMap<Uuid, Buyer>>,
    emails: Mutex<HashMap<String, Uuid>>, // email -> buyer_id
    horses: Mutex<HashMap<Uuid, Horse>>,
    installments: Mutex<HashMap<Uuid, Installment>>,
    buyer_installments: Mutex<HashMap<Uuid, BuyerInstallment>>,
    transactions: Mutex<HashMap<Uuid, Transaction>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        InMemoryStorage {
            buyers: Mutex::new(HashMap::new()),
            emails: Mutex::new(HashMap::new()),
            horses: Mutex::new(HashMap::new()),
            installments: Mutex::new(HashMap::new()),
            buyer_installments: Mutex::new(HashMap::new()),
            transactions: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn save_buyer(&self, buyer: Buyer) -> Result<(), SyndicateError> {
        let mut emails = self.emails.lock().await;
        if emails.contains_key(&buyer.email) {
            return Err(SyndicateError::EmailAlreadyRegistered(buyer.email));
        }
        emails.insert(buyer.email.clone(), buyer.id);
        let mut buyers = self.buyers.lock().await;
        buyers.insert(buyer.id, buyer);
        Ok(())
    }

    async fn get_buyer(&self, buyer_id: Uuid) -> Result<Option<Buyer>, SyndicateError> {
        Ok(self.buyers.lock().await.get(&buyer_id).cloned())
    }

    async fn get_buyer_by_email(&self, email: &str) -> Result<Option<Buyer>, SyndicateError> {
        // For production: use a database index on email
        let buyer_id = self.emails.lock().await.get(email).copied();
        Ok(match buyer_id {
            Some(id) => self.buyers.lock().await.get(&id).cloned(),
            None => None,
        })
    }

    async fn list_buyers(&self) -> Result<Vec<Buyer>, SyndicateError> {
        Ok(self.buyers.lock().await.values().cloned().collect())
    }

    async fn add_buyer_adjustment(
        &self,
        buyer_id: Uuid,
        delta: Decimal,
        now: DateTime<Utc>,
    ) -> Result<Buyer, SyndicateError> {
        let mut buyers = self.buyers.lock().await;
        let buyer = buyers
            .get_mut(&buyer_id)
            .ok_or_else(|| SyndicateError::BuyerNotFound(buyer_id.to_string()))?;
        buyer.adjustment += delta;
        buyer.updated_at = now;
        Ok(buyer.clone())
    }

    async fn save_horse(&self, horse: Horse) -> Result<(), SyndicateError> {
        self.horses.lock().await.insert(horse.id, horse);
        Ok(())
    }

    async fn get_horse(&self, horse_id: Uuid) -> Result<Option<Horse>, SyndicateError> {
        Ok(self.horses.lock().await.get(&horse_id).cloned())
    }

    async fn list_horses(&self) -> Result<Vec<Horse>, SyndicateError> {
        Ok(self.horses.lock().await.values().cloned().collect())
    }

    async fn update_horse_shares(
        &self,
        horse_id: Uuid,
        shares: Vec<OwnershipShare>,
    ) -> Result<Horse, SyndicateError> {
        // The horse's share list is the unit of write contention; the swap
        // happens under the map lock.
        let mut horses = self.horses.lock().await;
        let horse = horses
            .get_mut(&horse_id)
            .ok_or_else(|| SyndicateError::HorseNotFound(horse_id.to_string()))?;
        horse.shares = shares;
        Ok(horse.clone())
    }

    async fn save_schedule(
        &self,
        installments: Vec<Installment>,
        buyer_rows: Vec<BuyerInstallment>,
    ) -> Result<(), SyndicateError> {
        let mut stored = self.installments.lock().await;
        let mut stored_rows = self.buyer_installments.lock().await;
        for installment in installments {
            stored.insert(installment.id, installment);
        }
        for row in buyer_rows {
            stored_rows.insert(row.id, row);
        }
        Ok(())
    }

    async fn list_installments(&self, horse_id: Uuid) -> Result<Vec<Installment>, SyndicateError> {
        let mut installments: Vec<Installment> = self
            .installments
            .lock()
            .await
            .values()
            .filter(|i| i.horse_id == horse_id)
            .cloned()
            .collect();
        installments.sort_by_key(|i| i.number);
        Ok(installments)
    }

    async fn get_buyer_installment(
        &self,
        id: Uuid,
    ) -> Result<Option<BuyerInstallment>, SyndicateError> {
        Ok(self.buyer_installments.lock().await.get(&id).cloned())
    }

    async fn list_buyer_installments(
        &self,
        filter: InstallmentFilter,
    ) -> Result<Vec<BuyerInstallment>, SyndicateError> {
        let mut rows: Vec<BuyerInstallment> = self
            .buyer_installments
            .lock()
            .await
            .values()
            .filter(|row| {
                filter.horse_id.is_none_or(|id| row.horse_id == id)
                    && filter.buyer_id.is_none_or(|id| row.buyer_id == id)
                    && filter.period.is_none_or(|p| row.due == p)
                    && filter.status.is_none_or(|s| row.status == s)
            })
            .cloned()
            .collect();
        rows.sort_by_key(|row| (row.due, row.buyer_id));
        Ok(rows)
    }

    async fn apply_installment_payment(
        &self,
        id: Uuid,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<BuyerInstallment, SyndicateError> {
        // Check and increment run under one lock acquisition: the row cannot
        // move between the overpay validation and the write.
        let mut rows = self.buyer_installments.lock().await;
        let row = rows
            .get_mut(&id)
            .ok_or_else(|| SyndicateError::InstallmentNotFound(id.to_string()))?;
        row.register_payment(amount, now)?;
        Ok(row.clone())
    }

    async fn sweep_overdue(&self, today: NaiveDate) -> Result<u64, SyndicateError> {
        let mut rows = self.buyer_installments.lock().await;
        let mut swept = 0;
        for row in rows.values_mut() {
            if row.mark_overdue_if_due(today) {
                swept += 1;
            }
        }
        Ok(swept)
    }

    async fn save_transaction(&self, transaction: Transaction) -> Result<(), SyndicateError> {
        self.transactions
            .lock()
            .await
            .insert(transaction.id, transaction);
        Ok(())
    }

    async fn get_transaction(&self, id: Uuid) -> Result<Option<Transaction>, SyndicateError> {
        Ok(self.transactions.lock().await.get(&id).cloned())
    }

    async fn set_transaction_settled(
        &self,
        id: Uuid,
        settled: bool,
    ) -> Result<Transaction, SyndicateError> {
        let mut transactions = self.transactions.lock().await;
        let transaction = transactions
            .get_mut(&id)
            .ok_or_else(|| SyndicateError::TransactionNotFound(id.to_string()))?;
        transaction.settled = settled;
        Ok(transaction.clone())
    }

    async fn list_transactions(
        &self,
        filter: TransactionFilter,
    ) -> Result<Vec<Transaction>, SyndicateError> {
        let mut rows: Vec<Transaction> = self
            .transactions
            .lock()
            .await
            .values()
            .filter(|tx| {
                filter.horse_id.is_none_or(|id| tx.horse_id == Some(id))
                    && filter.buyer_id.is_none_or(|id| tx.buyer_id == Some(id))
                    && filter.period.is_none_or(|p| tx.period == p)
                    && filter.kind.is_none_or(|k| tx.kind == k)
            })
            .cloned()
            .collect();
        rows.sort_by_key(|tx| (tx.period, tx.created_at));
        Ok(rows)
    }
}
