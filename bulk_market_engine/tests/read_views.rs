//! Tests of the seller- and buyer-facing read views against a real SQLite database.
use bmx_common::Money;
use bulk_market_engine::{
    db_types::{BulkOrder, BulkOrderStatus, Buyer, NewBulkOrder, OfferTerms, Rfq, RfqStatus, Shop},
    events::EventProducers,
    test_utils::{prepare_test_env, random_db_path, seed},
    MarketQueryApi,
    NegotiationApi,
    SqliteDatabase,
};

const CATEGORY: &str = "ceramics";

struct Market {
    db: SqliteDatabase,
    buyer: Buyer,
    shop_a: Shop,
    shop_b: Shop,
}

async fn setup_market() -> Market {
    let url = random_db_path();
    prepare_test_env(&url).await;
    let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error connecting to test database");
    let buyer = seed::seed_buyer(db.pool(), "Nadia", Some("nadia@example.com")).await;
    let shop_a = seed::seed_shop(db.pool(), "Kiln House", Some("hello@kiln.example")).await;
    let shop_b = seed::seed_shop(db.pool(), "Glaze Studio", Some("team@glaze.example")).await;
    seed::seed_product(db.pool(), shop_a.id, "Stoneware mug", CATEGORY, Some(4.0)).await;
    seed::seed_product(db.pool(), shop_b.id, "Porcelain vase", CATEGORY, Some(3.0)).await;
    Market { db, buyer, shop_a, shop_b }
}

fn negotiation(db: &SqliteDatabase) -> NegotiationApi<SqliteDatabase> {
    NegotiationApi::new(db.clone(), EventProducers::default())
}

fn queries(db: &SqliteDatabase) -> MarketQueryApi<SqliteDatabase> {
    MarketQueryApi::new(db.clone())
}

async fn create_order(market: &Market) -> (BulkOrder, Vec<Rfq>) {
    let order = NewBulkOrder::new(market.buyer.id, "Espresso cups", 1_000, CATEGORY);
    negotiation(&market.db).create_bulk_order(order).await.expect("Creation failed")
}

fn terms(price_units: i64) -> OfferTerms {
    OfferTerms {
        price: Money::from_units(price_units),
        delivery_time: Some("4 weeks".to_string()),
        ..Default::default()
    }
}

fn rfq_for_shop(rfqs: &[Rfq], shop_id: i64) -> Rfq {
    rfqs.iter().find(|r| r.shop_id == shop_id).cloned().expect("No RFQ for shop")
}

#[tokio::test]
async fn seller_view_carries_order_buyer_and_offer_summary() {
    let market = setup_market().await;
    let (order, rfqs) = create_order(&market).await;
    let rfq = rfq_for_shop(&rfqs, market.shop_a.id);
    negotiation(&market.db).submit_offer(rfq.id, terms(2_400)).await.unwrap();

    let view = queries(&market.db).rfqs_for_shop(market.shop_a.id).await.unwrap();
    assert_eq!(view.len(), 1);
    let entry = &view[0];
    assert_eq!(entry.rfq.id, rfq.id);
    assert_eq!(entry.bulk_order.id, order.id);
    assert_eq!(entry.buyer.id, market.buyer.id);
    assert_eq!(entry.buyer.email.as_deref(), Some("nadia@example.com"));
    assert_eq!(entry.offer.price, Some(Money::from_units(2_400)));
    assert_eq!(entry.offer.status, RfqStatus::OfferSubmitted);
}

#[tokio::test]
async fn buyer_offer_list_excludes_slots_without_a_quote() {
    let market = setup_market().await;
    let (order, rfqs) = create_order(&market).await;
    let quoted = rfq_for_shop(&rfqs, market.shop_b.id);
    negotiation(&market.db).submit_offer(quoted.id, terms(2_000)).await.unwrap();

    let offers = queries(&market.db).offers_for_bulk_order(order.id).await.unwrap();
    assert_eq!(offers.len(), 1);
    assert_eq!(offers[0].rfq.id, quoted.id);
    assert_eq!(offers[0].shop.id, market.shop_b.id);

    // A bulk order that received no quotes yields an empty list, not an error.
    let (bare_order, _) = create_order(&market).await;
    let offers = queries(&market.db).offers_for_bulk_order(bare_order.id).await.unwrap();
    assert!(offers.is_empty());
}

#[tokio::test]
async fn offer_details_average_the_shops_product_ratings() {
    let market = setup_market().await;
    // Ratings 4.0, unrated (counts as 0) and 5.0 average to 3.0.
    seed::seed_product(market.db.pool(), market.shop_a.id, "Butter dish", CATEGORY, None).await;
    seed::seed_product(market.db.pool(), market.shop_a.id, "Serving bowl", CATEGORY, Some(5.0)).await;

    let (order, rfqs) = create_order(&market).await;
    let rfq = rfq_for_shop(&rfqs, market.shop_a.id);
    negotiation(&market.db).submit_offer(rfq.id, terms(2_400)).await.unwrap();

    let details = queries(&market.db).offer_details(rfq.id).await.unwrap().expect("Offer details missing");
    assert_eq!(details.bulk_order.id, order.id);
    assert_eq!(details.shop.id, market.shop_a.id);
    assert_eq!(details.shop.rating, Some(3.0));
    assert_eq!(details.rfq.price, Some(Money::from_units(2_400)));
}

#[tokio::test]
async fn offer_details_rating_is_null_for_a_shop_without_products() {
    let market = setup_market().await;
    let (order, _) = create_order(&market).await;

    // A shop that lists no products can still end up holding an RFQ (its catalog may have been
    // emptied after fan-out). Simulate by removing the shop's products.
    sqlx::query("DELETE FROM products WHERE shop_id = $1")
        .bind(market.shop_a.id)
        .execute(market.db.pool())
        .await
        .unwrap();

    let rfqs = queries(&market.db).rfqs_for_shop(market.shop_a.id).await.unwrap();
    let rfq_id = rfqs[0].rfq.id;
    negotiation(&market.db).submit_offer(rfq_id, terms(2_400)).await.unwrap();

    let details = queries(&market.db).offer_details(rfq_id).await.unwrap().expect("Offer details missing");
    assert_eq!(details.bulk_order.id, order.id);
    assert_eq!(details.shop.rating, None);
}

#[tokio::test]
async fn offer_details_for_a_missing_rfq_is_none() {
    let market = setup_market().await;
    assert!(queries(&market.db).offer_details(404).await.unwrap().is_none());
}

#[tokio::test]
async fn buyer_order_lists_track_the_lifecycle() {
    let market = setup_market().await;
    let query = queries(&market.db);
    let api = negotiation(&market.db);

    let (order, rfqs) = create_order(&market).await;
    let all = query.bulk_orders_for_buyer(market.buyer.id).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, order.id);

    // Nothing in flight before acceptance.
    assert!(query.in_flight_orders_for_buyer(market.buyer.id).await.unwrap().is_empty());

    let rfq = rfq_for_shop(&rfqs, market.shop_b.id);
    api.submit_offer(rfq.id, terms(2_000)).await.unwrap();
    api.confirm_payment(rfq.id, "txn-9").await.unwrap();

    let in_flight = query.in_flight_orders_for_buyer(market.buyer.id).await.unwrap();
    assert_eq!(in_flight.len(), 1);
    let entry = &in_flight[0];
    assert_eq!(entry.bulk_order.status, BulkOrderStatus::Processing);
    assert_eq!(entry.offer.as_ref().map(|r| r.id), Some(rfq.id));
    assert_eq!(entry.shop.as_ref().map(|s| s.id), Some(market.shop_b.id));

    api.update_order_status(order.id, BulkOrderStatus::Delivered).await.unwrap();
    let in_flight = query.in_flight_orders_for_buyer(market.buyer.id).await.unwrap();
    assert_eq!(in_flight[0].bulk_order.status, BulkOrderStatus::Delivered);

    // An unknown buyer simply has no orders.
    assert!(query.bulk_orders_for_buyer(987_654).await.unwrap().is_empty());
}

#[tokio::test]
async fn accepted_view_lists_only_winning_rfqs() {
    let market = setup_market().await;
    let api = negotiation(&market.db);
    let query = queries(&market.db);

    let (_, rfqs) = create_order(&market).await;
    let rfq_a = rfq_for_shop(&rfqs, market.shop_a.id);
    let rfq_b = rfq_for_shop(&rfqs, market.shop_b.id);
    api.submit_offer(rfq_a.id, terms(2_400)).await.unwrap();
    api.submit_offer(rfq_b.id, terms(2_000)).await.unwrap();

    assert!(query.accepted_rfqs_for_shop(market.shop_a.id).await.unwrap().is_empty());

    api.confirm_payment(rfq_a.id, "txn-1").await.unwrap();

    let won = query.accepted_rfqs_for_shop(market.shop_a.id).await.unwrap();
    assert_eq!(won.len(), 1);
    assert_eq!(won[0].rfq.id, rfq_a.id);
    assert_eq!(won[0].rfq.status, RfqStatus::Accepted);
    // The declined sibling never shows up in the loser's accepted view.
    assert!(query.accepted_rfqs_for_shop(market.shop_b.id).await.unwrap().is_empty());
}
