mod common;

use autoparts_store::entities::{customer_order, OrderStatus};
use chrono::Utc;
use common::TestDb;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, IntoActiveModel, Set};

#[tokio::test]
async fn view_joins_orders_with_customer_names() {
    let t = TestDb::new().await;
    let alice = t.seed_customer().await;
    let bob = t.seed_customer().await;
    let a1 = t.seed_order(alice.id, dec!(120.50)).await;
    let b1 = t.seed_order(bob.id, dec!(15)).await;
    let a2 = t.seed_order(alice.id, dec!(60)).await;

    let rows = t.state.order_service().customer_orders(None).await.unwrap();
    let ids: Vec<i32> = rows.iter().map(|r| r.order_id).collect();
    assert_eq!(ids, vec![a1.id, b1.id, a2.id]);

    let first = &rows[0];
    assert_eq!(first.customer_id, alice.id);
    assert_eq!(first.first_name, alice.first_name);
    assert_eq!(first.last_name, alice.last_name);
    assert_eq!(first.order_date, Utc::now().date_naive());
    assert_eq!(first.total_amount, dec!(120.50));
    assert_eq!(first.status, OrderStatus::Pending);
}

#[tokio::test]
async fn view_can_be_filtered_by_customer() {
    let t = TestDb::new().await;
    let alice = t.seed_customer().await;
    let bob = t.seed_customer().await;
    t.seed_order(alice.id, dec!(10)).await;
    let b1 = t.seed_order(bob.id, dec!(20)).await;

    let rows = t.state.order_service().customer_orders(Some(bob.id)).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].order_id, b1.id);
    assert_eq!(rows[0].last_name, bob.last_name);

    let none = t.state.order_service().customer_orders(Some(9_999)).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn view_reflects_base_table_changes() {
    let t = TestDb::new().await;
    let customer = t.seed_customer().await;
    let order = t.seed_order(customer.id, dec!(45)).await;

    t.state
        .payment_service()
        .process_order_payment(order.id, dec!(45))
        .await
        .unwrap();

    let rows = t.state.order_service().customer_orders(Some(customer.id)).await.unwrap();
    assert_eq!(rows[0].status, OrderStatus::Paid);

    t.state.order_service().delete_order(order.id).await.unwrap();
    let rows = t.state.order_service().customer_orders(Some(customer.id)).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn writes_through_the_view_are_refused() {
    let t = TestDb::new().await;
    let customer = t.seed_customer().await;
    t.seed_order(customer.id, dec!(45)).await;

    let row = t
        .state
        .order_service()
        .customer_orders(Some(customer.id))
        .await
        .unwrap()
        .remove(0);

    let mut active = row.into_active_model();
    active.first_name = Set("Mallory".into());
    assert!(active.update(&*t.state.db).await.is_err());

    let rows = t.state.order_service().customer_orders(Some(customer.id)).await.unwrap();
    assert_eq!(rows[0].first_name, customer.first_name);
}

#[test]
fn view_model_serializes_for_output() {
    let row = customer_order::Model {
        order_id: 7,
        customer_id: 3,
        first_name: "Jordan".into(),
        last_name: "Lee".into(),
        order_date: chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        total_amount: dec!(150.00),
        status: OrderStatus::Shipped,
    };
    let json = serde_json::to_value(&row).unwrap();
    assert_eq!(json["status"], "Shipped");
    assert_eq!(json["order_id"], 7);
}
