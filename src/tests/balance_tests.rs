use super::{create_test_service, create_test_syndicate};
use crate::error::SyndicateError;
use crate::models::{BillingPeriod, TransactionDraft, TransactionKind};
use crate::storage::InstallmentFilter;
use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal_macros::dec;
use uuid::Uuid;

fn mid_2024() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn expense(horse_id: Uuid, amount: rust_decimal::Decimal) -> TransactionDraft {
    TransactionDraft {
        kind: TransactionKind::Expense,
        concept: "vet".to_string(),
        amount,
        period: BillingPeriod::new(5, 2024),
        horse_id: Some(horse_id),
        buyer_id: None,
        payment_date: None,
        effective_date: None,
        settled: Some(false),
        notes: None,
    }
}

#[tokio::test]
async fn balance_subtracts_remaining_installment_debt() {
    let service = create_test_service();
    let (alice, bob, _) = create_test_syndicate(
        &service,
        dec!(12000),
        12,
        BillingPeriod::new(1, 2024),
        dec!(70),
        dec!(30),
    )
    .await;

    let alice_balance = service.buyer_balance_as_of(alice.id, mid_2024()).await.unwrap();
    assert_eq!(alice_balance.pending_installment_total, dec!(8400.00));
    assert_eq!(alice_balance.balance, dec!(-8400.00));

    let bob_balance = service.buyer_balance_as_of(bob.id, mid_2024()).await.unwrap();
    assert_eq!(bob_balance.pending_installment_total, dec!(3600.00));
    assert_eq!(bob_balance.balance, dec!(-3600.00));
}

#[tokio::test]
async fn unsettled_expenses_split_proportionally_until_settled() {
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

    let recorded = service
        .record_transaction(expense(horse.id, dec!(500)))
        .await
        .unwrap();

    let alice_balance = service.buyer_balance_as_of(alice.id, mid_2024()).await.unwrap();
    assert_eq!(alice_balance.unsettled_expense_total, dec!(350.00));
    assert_eq!(alice_balance.balance, dec!(-8750.00));

    let bob_balance = service.buyer_balance_as_of(bob.id, mid_2024()).await.unwrap();
    assert_eq!(bob_balance.unsettled_expense_total, dec!(150.00));

    service.mark_settled(recorded.id).await.unwrap();

    let alice_balance = service.buyer_balance_as_of(alice.id, mid_2024()).await.unwrap();
    assert_eq!(alice_balance.unsettled_expense_total, dec!(0));
    assert_eq!(alice_balance.balance, dec!(-8400.00));
}

#[tokio::test]
async fn income_credits_the_buyer_in_full() {
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

    service
        .record_transaction(TransactionDraft {
            kind: TransactionKind::Income,
            concept: "contribution".to_string(),
            amount: dec!(1000),
            period: BillingPeriod::new(5, 2024),
            horse_id: Some(horse.id),
            buyer_id: Some(alice.id),
            payment_date: Some(Utc::now()),
            effective_date: None,
            settled: None,
            notes: None,
        })
        .await
        .unwrap();

    let alice_balance = service.buyer_balance_as_of(alice.id, mid_2024()).await.unwrap();
    assert_eq!(alice_balance.income_total, dec!(1000));
    assert_eq!(alice_balance.balance, dec!(-7400.00));

    // Never split: the other buyer sees nothing of it.
    let bob_balance = service.buyer_balance_as_of(bob.id, mid_2024()).await.unwrap();
    assert_eq!(bob_balance.income_total, dec!(0));
}

#[tokio::test]
async fn prizes_take_effect_the_month_after_their_effective_date() {
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

    service
        .record_transaction(TransactionDraft {
            kind: TransactionKind::Prize,
            concept: "derby".to_string(),
            amount: dec!(600),
            period: BillingPeriod::new(1, 2024),
            horse_id: Some(horse.id),
            buyer_id: None,
            payment_date: None,
            effective_date: Some(Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()),
            settled: None,
            notes: None,
        })
        .await
        .unwrap();

    // Still January: the prize has not reached its effective month.
    let eod_january = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    let alice_balance = service
        .buyer_balance_as_of(alice.id, eod_january)
        .await
        .unwrap();
    assert_eq!(alice_balance.prize_total, dec!(0));

    let february = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    let alice_balance = service.buyer_balance_as_of(alice.id, february).await.unwrap();
    assert_eq!(alice_balance.prize_total, dec!(420.00));

    let bob_balance = service.buyer_balance_as_of(bob.id, february).await.unwrap();
    assert_eq!(bob_balance.prize_total, dec!(180.00));
}

#[tokio::test]
async fn paying_from_balance_records_the_matching_debit() {
    let service = create_test_service();
    let (alice, _, horse) = create_test_syndicate(
        &service,
        dec!(12000),
        12,
        BillingPeriod::new(1, 2024),
        dec!(70),
        dec!(30),
    )
    .await;

    let before = service.buyer_balance_as_of(alice.id, mid_2024()).await.unwrap();

    let row = service
        .list_buyer_installments(InstallmentFilter {
            horse_id: Some(horse.id),
            buyer_id: Some(alice.id),
            ..Default::default()
        })
        .await
        .unwrap()
        .into_iter()
        .next()
        .unwrap();
    service.pay_installment(row.id, dec!(700.00), true).await.unwrap();

    let after = service.buyer_balance_as_of(alice.id, mid_2024()).await.unwrap();
    // The debt shrank by 700 and the ledger debited 700: the net figure is
    // unchanged.
    assert_eq!(after.pending_installment_total, dec!(7700.00));
    assert_eq!(after.inter_account_total, dec!(-700.00));
    assert_eq!(after.balance, before.balance);
    assert_eq!(after.total_paid, dec!(700.00));
}

#[tokio::test]
async fn paying_without_deduction_raises_the_balance() {
    let service = create_test_service();
    let (alice, _, horse) = create_test_syndicate(
        &service,
        dec!(12000),
        12,
        BillingPeriod::new(1, 2024),
        dec!(70),
        dec!(30),
    )
    .await;

    let row = service
        .list_buyer_installments(InstallmentFilter {
            horse_id: Some(horse.id),
            buyer_id: Some(alice.id),
            ..Default::default()
        })
        .await
        .unwrap()
        .into_iter()
        .next()
        .unwrap();
    service.pay_installment(row.id, dec!(700.00), false).await.unwrap();

    let after = service.buyer_balance_as_of(alice.id, mid_2024()).await.unwrap();
    assert_eq!(after.pending_installment_total, dec!(7700.00));
    assert_eq!(after.inter_account_total, dec!(0));
    assert_eq!(after.balance, dec!(-7700.00));
}

#[tokio::test]
async fn manual_adjustments_feed_the_balance() {
    let service = create_test_service();
    let (alice, _, _) = create_test_syndicate(
        &service,
        dec!(12000),
        12,
        BillingPeriod::new(1, 2024),
        dec!(70),
        dec!(30),
    )
    .await;

    service
        .adjust_buyer_balance(alice.id, dec!(50), Some("rounding correction".to_string()))
        .await
        .unwrap();

    let balance = service.buyer_balance_as_of(alice.id, mid_2024()).await.unwrap();
    assert_eq!(balance.adjustment, dec!(50));
    assert_eq!(balance.balance, dec!(-8350.00));
}

#[tokio::test]
async fn outstanding_debt_is_reported_per_horse() {
    let service = create_test_service();
    let (alice, _, horse) = create_test_syndicate(
        &service,
        dec!(12000),
        12,
        BillingPeriod::new(1, 2024),
        dec!(70),
        dec!(30),
    )
    .await;

    let balance = service.buyer_balance_as_of(alice.id, mid_2024()).await.unwrap();
    assert_eq!(balance.horse_balances.len(), 1);
    assert_eq!(balance.horse_balances[0].horse_id, horse.id);
    assert_eq!(balance.horse_balances[0].outstanding, dec!(8400.00));
}

#[tokio::test]
async fn balance_for_unknown_buyer_fails() {
    let service = create_test_service();
    let result = service.buyer_balance_as_of(Uuid::new_v4(), mid_2024()).await;
    assert!(matches!(result, Err(SyndicateError::BuyerNotFound(_))));
}
