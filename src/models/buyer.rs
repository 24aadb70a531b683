use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A fractional owner of one or more horses.
///
/// `adjustment` holds manual balance corrections entered by an administrator;
/// everything else in a buyer's balance is recomputed from the ledger and the
/// installment tables on every read.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Buyer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub adjustment: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Buyer {
    pub fn new(name: String, email: String, is_admin: bool, now: DateTime<Utc>) -> Self {
        Buyer {
            id: Uuid::new_v4(),
            name,
            email,
            is_admin,
            adjustment: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }
}
