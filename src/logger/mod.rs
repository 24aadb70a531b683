pub mod in_memory;

use crate::error::SyndicateError;
use crate::models::AuditLogEntry;
use async_trait::async_trait;

/// Domain audit trail, separate from diagnostic tracing: one entry per
/// committed mutation, with a structured JSON payload.
#[async_trait]
pub trait AuditLogger: Send + Sync {
    async fn log(&self, entry: AuditLogEntry) -> Result<(), SyndicateError>;
    async fn entries(&self) -> Result<Vec<AuditLogEntry>, SyndicateError>;
}
