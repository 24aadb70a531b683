use super::{create_test_buyer, create_test_service, create_test_syndicate};
use crate::error::SyndicateError;
use crate::models::{BillingPeriod, ShareSpec};
use rust_decimal_macros::dec;
use uuid::Uuid;

#[tokio::test]
async fn create_buyer_rejects_duplicate_email() {
    let service = create_test_service();
    create_test_buyer(&service, "Alice").await;

    let result = service
        .create_buyer("Alice Again".to_string(), "alice@example.com".to_string(), false)
        .await;
    assert!(matches!(
        result,
        Err(SyndicateError::EmailAlreadyRegistered(_))
    ));
}

#[tokio::test]
async fn create_buyer_rejects_malformed_email() {
    let service = create_test_service();
    let result = service
        .create_buyer("Alice".to_string(), "not-an-email".to_string(), false)
        .await;
    assert!(matches!(result, Err(SyndicateError::InvalidEmail(_))));
}

#[tokio::test]
async fn create_horse_succeeds_when_active_shares_sum_to_100() {
    let service = create_test_service();
    let (_, _, horse) = create_test_syndicate(
        &service,
        dec!(12000),
        12,
        BillingPeriod::new(1, 2024),
        dec!(70),
        dec!(30),
    )
    .await;

    assert_eq!(horse.installment_count, 12);
    assert_eq!(horse.active_percentage_total(), dec!(100));

    let detail = service.horse_detail(horse.id).await.unwrap().unwrap();
    assert_eq!(detail.installments.len(), 12);
    assert_eq!(detail.buyer_installments.len(), 24);
}

#[tokio::test]
async fn create_horse_rejects_share_sum_other_than_100() {
    let service = create_test_service();
    let alice = create_test_buyer(&service, "Alice").await;
    let bob = create_test_buyer(&service, "Bob").await;

    let result = service
        .create_horse(
            "Tornado".to_string(),
            None,
            dec!(5000),
            10,
            BillingPeriod::new(3, 2024),
            vec![
                ShareSpec {
                    buyer_id: alice.id,
                    percentage: dec!(60),
                    active: true,
                },
                ShareSpec {
                    buyer_id: bob.id,
                    percentage: dec!(30),
                    active: true,
                },
            ],
        )
        .await;
    assert!(matches!(
        result,
        Err(SyndicateError::InvalidShareSum(total)) if total == dec!(90)
    ));
}

#[tokio::test]
async fn inactive_shares_do_not_count_toward_the_sum() {
    let service = create_test_service();
    let alice = create_test_buyer(&service, "Alice").await;
    let bob = create_test_buyer(&service, "Bob").await;

    // 50 active + 50 inactive: the active total is 50, not 100.
    let result = service
        .create_horse(
            "Tornado".to_string(),
            None,
            dec!(5000),
            10,
            BillingPeriod::new(3, 2024),
            vec![
                ShareSpec {
                    buyer_id: alice.id,
                    percentage: dec!(50),
                    active: true,
                },
                ShareSpec {
                    buyer_id: bob.id,
                    percentage: dec!(50),
                    active: false,
                },
            ],
        )
        .await;
    assert!(matches!(result, Err(SyndicateError::InvalidShareSum(_))));
}

#[tokio::test]
async fn create_horse_rejects_non_positive_installment_count() {
    let service = create_test_service();
    let alice = create_test_buyer(&service, "Alice").await;
    let shares = vec![ShareSpec {
        buyer_id: alice.id,
        percentage: dec!(100),
        active: true,
    }];

    let result = service
        .create_horse(
            "Tornado".to_string(),
            None,
            dec!(5000),
            0,
            BillingPeriod::new(3, 2024),
            shares.clone(),
        )
        .await;
    assert!(matches!(
        result,
        Err(SyndicateError::InvalidInstallmentCount(0))
    ));

    let result = service
        .create_horse(
            "Tornado".to_string(),
            None,
            dec!(5000),
            -3,
            BillingPeriod::new(3, 2024),
            shares,
        )
        .await;
    assert!(matches!(
        result,
        Err(SyndicateError::InvalidInstallmentCount(-3))
    ));
}

#[tokio::test]
async fn create_horse_rejects_unknown_buyers() {
    let service = create_test_service();
    let result = service
        .create_horse(
            "Tornado".to_string(),
            None,
            dec!(5000),
            10,
            BillingPeriod::new(3, 2024),
            vec![ShareSpec {
                buyer_id: Uuid::new_v4(),
                percentage: dec!(100),
                active: true,
            }],
        )
        .await;
    assert!(matches!(result, Err(SyndicateError::BuyerNotFound(_))));
}

#[tokio::test]
async fn update_shares_revalidates_before_committing() {
    let service = create_test_service();
    let (alice, bob, horse) = create_test_syndicate(
        &service,
        dec!(12000),
        12,
        BillingPeriod::new(1, 2024),
        dec!(70),
        dec!(30),
    )
    .await;

    let result = service
        .update_shares(
            horse.id,
            vec![ShareSpec {
                buyer_id: alice.id,
                percentage: dec!(80),
                active: true,
            }],
        )
        .await;
    assert!(matches!(result, Err(SyndicateError::InvalidShareSum(_))));

    // The rejected update must not have touched the stored shares.
    let stored = service.get_horse(horse.id).await.unwrap().unwrap();
    assert_eq!(stored.share_for(alice.id).unwrap().percentage, dec!(70));
    assert_eq!(stored.share_for(bob.id).unwrap().percentage, dec!(30));
}

#[tokio::test]
async fn update_shares_replaces_the_share_list_but_not_the_schedule() {
    let service = create_test_service();
    let (alice, bob, horse) = create_test_syndicate(
        &service,
        dec!(12000),
        12,
        BillingPeriod::new(1, 2024),
        dec!(70),
        dec!(30),
    )
    .await;

    let updated = service
        .update_shares(
            horse.id,
            vec![
                ShareSpec {
                    buyer_id: alice.id,
                    percentage: dec!(50),
                    active: true,
                },
                ShareSpec {
                    buyer_id: bob.id,
                    percentage: dec!(50),
                    active: true,
                },
            ],
        )
        .await
        .unwrap();
    assert_eq!(updated.share_for(alice.id).unwrap().percentage, dec!(50));

    // Installment amounts were fixed at generation time.
    let detail = service.horse_detail(horse.id).await.unwrap().unwrap();
    let alice_amounts: Vec<_> = detail
        .buyer_installments
        .iter()
        .filter(|row| row.buyer_id == alice.id)
        .map(|row| row.amount)
        .collect();
    assert!(alice_amounts.iter().all(|amount| *amount == dec!(700.00)));
}

#[tokio::test]
async fn update_shares_rejects_unknown_horse() {
    let service = create_test_service();
    let alice = create_test_buyer(&service, "Alice").await;
    let result = service
        .update_shares(
            Uuid::new_v4(),
            vec![ShareSpec {
                buyer_id: alice.id,
                percentage: dec!(100),
                active: true,
            }],
        )
        .await;
    assert!(matches!(result, Err(SyndicateError::HorseNotFound(_))));
}
