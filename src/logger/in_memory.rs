use crate::error::SyndicateError;
use crate::logger::AuditLogger;
use crate::models::AuditLogEntry;
use async_trait::async_trait;

pub struct InMemoryAuditLogger {
    entries: tokio::sync::Mutex<Vec<AuditLogEntry>>,
}

impl InMemoryAuditLogger {
    pub fn new() -> Self {
        InMemoryAuditLogger {
            entries: tokio::sync::Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryAuditLogger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditLogger for InMemoryAuditLogger {
    async fn log(&self, entry: AuditLogEntry) -> Result<(), SyndicateError> {
        // For production: use a logging queue or batch writes
        self.entries.lock().await.push(entry);
        Ok(())
    }

    async fn entries(&self) -> Result<Vec<AuditLogEntry>, SyndicateError> {
        Ok(self.entries.lock().await.clone())
    }
}
