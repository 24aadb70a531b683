mod balance_tests;
mod registry_tests;

use crate::logger::in_memory::InMemoryAuditLogger;
use crate::models::{BillingPeriod, Buyer, Horse, ShareSpec};
use crate::service::SyndicateService;
use crate::storage::in_memory::InMemoryStorage;
use rust_decimal::Decimal;

pub fn create_test_service() -> SyndicateService<InMemoryStorage, InMemoryAuditLogger> {
    let storage = InMemoryStorage::new();
    let audit = InMemoryAuditLogger::new();
    SyndicateService::new(storage, audit)
}

pub async fn create_test_buyer(
    service: &SyndicateService<InMemoryStorage, InMemoryAuditLogger>,
    name: &str,
) -> Buyer {
    service
        .create_buyer(
            name.to_string(),
            format!("{}@example.com", name.to_lowercase()),
            false,
        )
        .await
        .unwrap()
}

/// Two buyers splitting a horse `pct_a`/`pct_b`, billed over `count`
/// installments starting from `start`.
pub async fn create_test_syndicate(
    service: &SyndicateService<InMemoryStorage, InMemoryAuditLogger>,
    total_value: Decimal,
    count: i64,
    start: BillingPeriod,
    pct_a: Decimal,
    pct_b: Decimal,
) -> (Buyer, Buyer, Horse) {
    let alice = create_test_buyer(service, "Alice").await;
    let bob = create_test_buyer(service, "Bob").await;
    let horse = service
        .create_horse(
            "Relampago".to_string(),
            None,
            total_value,
            count,
            start,
            vec![
                ShareSpec {
                    buyer_id: alice.id,
                    percentage: pct_a,
                    active: true,
                },
                ShareSpec {
                    buyer_id: bob.id,
                    percentage: pct_b,
                    active: true,
                },
            ],
        )
        .await
        .unwrap();
    (alice, bob, horse)
}
