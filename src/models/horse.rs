use super::period::BillingPeriod;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// One buyer's stake in a horse. Deactivated shares stay on the horse for
/// history but are excluded from the sum-to-100 invariant and from all
/// proportional splits.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct OwnershipShare {
    pub buyer_id: Uuid,
    pub percentage: Decimal,
    pub active: bool,
    pub join_date: DateTime<Utc>,
}

/// The jointly owned asset being billed against.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Horse {
    pub id: Uuid,
    pub name: String,
    pub information: Option<String>,
    pub total_value: Decimal,
    pub installment_count: u32,
    /// The configured starting billing month; the first installment falls due
    /// the month after this.
    pub start: BillingPeriod,
    pub shares: Vec<OwnershipShare>,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied share line for horse creation and share updates.
#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct ShareSpec {
    pub buyer_id: Uuid,
    pub percentage: Decimal,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl ShareSpec {
    pub fn into_share(self, join_date: DateTime<Utc>) -> OwnershipShare {
        OwnershipShare {
            buyer_id: self.buyer_id,
            percentage: self.percentage,
            active: self.active,
            join_date,
        }
    }
}

impl Horse {
    pub fn active_shares(&self) -> impl Iterator<Item = &OwnershipShare> {
        self.shares.iter().filter(|s| s.active)
    }

    /// Sum of active percentages. Must equal exactly 100 at every mutating
    /// operation.
    pub fn active_percentage_total(&self) -> Decimal {
        self.active_shares().map(|s| s.percentage).sum()
    }

    pub fn share_for(&self, buyer_id: Uuid) -> Option<&OwnershipShare> {
        self.active_shares().find(|s| s.buyer_id == buyer_id)
    }
}
