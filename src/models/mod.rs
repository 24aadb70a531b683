pub mod audit;
pub mod buyer;
pub mod horse;
pub mod installment;
pub mod period;
pub mod transaction;

pub use audit::{AuditAction, AuditLogEntry};
pub use buyer::Buyer;
pub use horse::{Horse, OwnershipShare, ShareSpec};
pub use installment::{BuyerInstallment, Installment, PaymentStatus};
pub use period::BillingPeriod;
pub use transaction::{Transaction, TransactionDraft, TransactionKind};
