mod common;

use assert_matches::assert_matches;
use autoparts_store::{
    entities::OrderStatus,
    errors::ServiceError,
    services::PaymentOutcome,
};
use common::TestDb;
use rust_decimal_macros::dec;
use tokio::task::JoinSet;

#[tokio::test]
async fn exact_payment_marks_order_paid() {
    let t = TestDb::new().await;
    let customer = t.seed_customer().await;
    let order = t.seed_order(customer.id, dec!(150.00)).await;

    let outcome = t
        .state
        .payment_service()
        .process_order_payment(order.id, dec!(150.00))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        PaymentOutcome::Paid {
            order_id: order.id,
            total: dec!(150.00),
            payment: dec!(150.00),
        }
    );
    let stored = t.state.order_service().get_order(order.id).await.unwrap();
    assert_eq!(stored.status, OrderStatus::Paid);
}

#[tokio::test]
async fn overpayment_also_settles_the_order() {
    let t = TestDb::new().await;
    let customer = t.seed_customer().await;
    let order = t.seed_order(customer.id, dec!(150.00)).await;

    let outcome = t
        .state
        .payment_service()
        .process_order_payment(order.id, dec!(200))
        .await
        .unwrap();

    assert!(outcome.is_paid());
    let stored = t.state.order_service().get_order(order.id).await.unwrap();
    assert_eq!(stored.status, OrderStatus::Paid);
    assert_eq!(stored.total_amount, dec!(150.00));
}

#[tokio::test]
async fn short_payment_leaves_order_untouched() {
    let t = TestDb::new().await;
    let customer = t.seed_customer().await;
    let order = t.seed_order(customer.id, dec!(150.00)).await;

    let outcome = t
        .state
        .payment_service()
        .process_order_payment(order.id, dec!(100.00))
        .await
        .unwrap();

    assert_matches!(outcome, PaymentOutcome::Insufficient { order_id, .. } if order_id == order.id);
    let stored = t.state.order_service().get_order(order.id).await.unwrap();
    assert_eq!(stored, order);
}

#[tokio::test]
async fn unknown_order_is_not_found() {
    let t = TestDb::new().await;

    let err = t
        .state
        .payment_service()
        .process_order_payment(4_242, dec!(10))
        .await
        .unwrap_err();

    assert_matches!(err, ServiceError::NotFound(_));
}

#[tokio::test]
async fn negative_payment_is_rejected_without_touching_the_order() {
    let t = TestDb::new().await;
    let customer = t.seed_customer().await;
    let order = t.seed_order(customer.id, dec!(10)).await;

    let err = t
        .state
        .payment_service()
        .process_order_payment(order.id, dec!(-10))
        .await
        .unwrap_err();

    assert_matches!(err, ServiceError::InvalidInput(_));
    let stored = t.state.order_service().get_order(order.id).await.unwrap();
    assert_eq!(stored.status, OrderStatus::Pending);
}

#[tokio::test]
async fn concurrent_payments_on_one_order_are_serialized() {
    let t = TestDb::new().await;
    let customer = t.seed_customer().await;
    let order = t.seed_order(customer.id, dec!(150.00)).await;
    let payments = t.state.payment_service();
    let order_id = order.id;

    let mut tasks = JoinSet::new();
    for i in 0..8 {
        let payments = payments.clone();
        let amount = if i % 2 == 0 { dec!(150.00) } else { dec!(99.99) };
        tasks.spawn(async move { payments.process_order_payment(order_id, amount).await });
    }

    let mut paid = 0;
    let mut insufficient = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined.unwrap().unwrap() {
            PaymentOutcome::Paid { total, .. } => {
                assert_eq!(total, dec!(150.00));
                paid += 1;
            }
            PaymentOutcome::Insufficient { .. } => insufficient += 1,
        }
    }

    assert_eq!(paid, 4);
    assert_eq!(insufficient, 4);
    let stored = t.state.order_service().get_order(order.id).await.unwrap();
    assert_eq!(stored.status, OrderStatus::Paid);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_payments_wait_for_the_write_lock_on_a_shared_file() {
    let t = TestDb::file_backed(8).await;
    let customer = t.seed_customer().await;
    let payments = t.state.payment_service();
    let orders = t.state.order_service();

    for round in 0..10 {
        let order_id = t.seed_order(customer.id, dec!(150.00)).await.id;

        let mut tasks = JoinSet::new();
        for i in 0..8 {
            let payments = payments.clone();
            let amount = if i % 2 == 0 { dec!(150.00) } else { dec!(100.00) };
            tasks.spawn(async move { payments.process_order_payment(order_id, amount).await });
        }

        let mut paid = 0;
        let mut insufficient = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined.unwrap() {
                Ok(PaymentOutcome::Paid { .. }) => paid += 1,
                Ok(PaymentOutcome::Insufficient { .. }) => insufficient += 1,
                Err(e) => panic!("round {round}: payment failed: {e}"),
            }
        }

        assert_eq!(paid, 4, "round {round}");
        assert_eq!(insufficient, 4, "round {round}");
        let stored = orders.get_order(order_id).await.unwrap();
        assert_eq!(stored.status, OrderStatus::Paid);
    }
}

#[tokio::test]
async fn payment_does_not_affect_other_orders() {
    let t = TestDb::new().await;
    let customer = t.seed_customer().await;
    let paid = t.seed_order(customer.id, dec!(30)).await;
    let untouched = t.seed_order(customer.id, dec!(30)).await;

    t.state
        .payment_service()
        .process_order_payment(paid.id, dec!(30))
        .await
        .unwrap();

    let other = t.state.order_service().get_order(untouched.id).await.unwrap();
    assert_eq!(other.status, OrderStatus::Pending);
}
