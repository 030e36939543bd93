mod common;

use common::TestDb;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[tokio::test]
async fn discounts_apply_per_line_item() {
    let t = TestDb::new().await;
    let fx = t.seed_catalog().await;
    let customer = t.seed_customer().await;
    let order = t.seed_order(customer.id, dec!(150)).await;
    t.seed_line_item(order.id, fx.product.id, dec!(100.00), dec!(10)).await;
    t.seed_line_item(order.id, fx.product.id, dec!(50.00), dec!(0)).await;

    let total = t
        .state
        .pricing_service()
        .calculate_discounted_total(order.id)
        .await
        .unwrap();

    assert_eq!(total, dec!(140.00));
}

#[tokio::test]
async fn order_without_line_items_totals_zero() {
    let t = TestDb::new().await;
    let customer = t.seed_customer().await;
    let order = t.seed_order(customer.id, dec!(75)).await;
    let pricing = t.state.pricing_service();

    assert_eq!(pricing.calculate_discounted_total(order.id).await.unwrap(), Decimal::ZERO);
    assert_eq!(pricing.calculate_discounted_total(31_337).await.unwrap(), Decimal::ZERO);
}

#[tokio::test]
async fn total_is_rounded_to_cents() {
    let t = TestDb::new().await;
    let fx = t.seed_catalog().await;
    let customer = t.seed_customer().await;
    let order = t.seed_order(customer.id, dec!(19.99)).await;
    t.seed_line_item(order.id, fx.product.id, dec!(19.99), dec!(15)).await;

    let total = t
        .state
        .pricing_service()
        .calculate_discounted_total(order.id)
        .await
        .unwrap();

    assert_eq!(total, dec!(16.99));
}

#[tokio::test]
async fn only_the_requested_order_is_summed() {
    let t = TestDb::new().await;
    let fx = t.seed_catalog().await;
    let customer = t.seed_customer().await;
    let order = t.seed_order(customer.id, dec!(80)).await;
    let other = t.seed_order(customer.id, dec!(500)).await;
    t.seed_line_item(order.id, fx.product.id, dec!(80), dec!(100)).await;
    t.seed_line_item(other.id, fx.product.id, dec!(500), dec!(50)).await;

    let pricing = t.state.pricing_service();
    assert_eq!(pricing.calculate_discounted_total(order.id).await.unwrap(), Decimal::ZERO);
    assert_eq!(pricing.calculate_discounted_total(other.id).await.unwrap(), dec!(250));
}
