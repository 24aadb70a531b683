use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    CreateBuyer,
    AdjustBuyerBalance,
    CreateHorse,
    UpdateShares,
    RecordTransaction,
    MarkSettled,
    PayInstallment,
    SweepOverdue,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AuditLogEntry {
    pub id: Uuid,
    /// The buyer or admin the action concerns, when there is one.
    pub actor_id: Option<Uuid>,
    pub action: AuditAction,
    pub payload: String,
    pub created_at: DateTime<Utc>,
}

impl AuditLogEntry {
    // Create audit log entry with structured JSON payload
    pub fn new<T: Serialize>(
        actor_id: Option<Uuid>,
        action: AuditAction,
        payload: &T,
        created_at: DateTime<Utc>,
    ) -> Self {
        AuditLogEntry {
            id: Uuid::new_v4(),
            actor_id,
            action,
            payload: serde_json::to_string(payload).unwrap_or_default(),
            created_at,
        }
    }
}
