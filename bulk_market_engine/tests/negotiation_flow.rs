//! End-to-end tests of the negotiation lifecycle against a real SQLite database.
use bmx_common::Money;
use bulk_market_engine::{
    db_types::{BulkOrder, BulkOrderStatus, Buyer, NewBulkOrder, OfferTerms, Rfq, RfqStatus, Shop},
    events::EventProducers,
    test_utils::{prepare_test_env, random_db_path, seed},
    MarketQueryApi,
    MarketplaceError,
    NegotiationApi,
    SqliteDatabase,
};

const CATEGORY: &str = "textiles";

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
    let buyer = seed::seed_buyer(db.pool(), "Amara", Some("amara@example.com")).await;
    let shop_a = seed::seed_shop(db.pool(), "Loom & Co", Some("orders@loom.example")).await;
    let shop_b = seed::seed_shop(db.pool(), "Fiber Works", None).await;
    seed::seed_product(db.pool(), shop_a.id, "Organic cotton tote", CATEGORY, Some(4.0)).await;
    seed::seed_product(db.pool(), shop_b.id, "Linen table runner", CATEGORY, Some(5.0)).await;
    Market { db, buyer, shop_a, shop_b }
}

fn negotiation(db: &SqliteDatabase) -> NegotiationApi<SqliteDatabase> {
    NegotiationApi::new(db.clone(), EventProducers::default())
}

fn queries(db: &SqliteDatabase) -> MarketQueryApi<SqliteDatabase> {
    MarketQueryApi::new(db.clone())
}

async fn create_textiles_order(market: &Market) -> (BulkOrder, Vec<Rfq>) {
    let api = negotiation(&market.db);
    let order = NewBulkOrder::new(market.buyer.id, "Tote bags", 500, CATEGORY).with_budget(Money::from_units(2_000));
    api.create_bulk_order(order).await.expect("Bulk order creation failed")
}

fn sample_terms() -> OfferTerms {
    OfferTerms {
        price: Money::from_units(1_800),
        price_per_unit: Some(Money::from_cents(360)),
        delivery_time: Some("3 weeks".to_string()),
        terms: Some("50% upfront, balance on delivery".to_string()),
        warranty: Some("6 months".to_string()),
        available_quantity: Some(500),
        expiration_date: None,
        packaging_details: Some("Cartons of 50".to_string()),
    }
}

fn rfq_for_shop(rfqs: &[Rfq], shop_id: i64) -> Rfq {
    rfqs.iter().find(|r| r.shop_id == shop_id).cloned().expect("No RFQ for shop")
}

#[tokio::test]
async fn fan_out_creates_one_pending_rfq_per_matching_shop() {
    let market = setup_market().await;
    let (order, rfqs) = create_textiles_order(&market).await;

    assert_eq!(order.status, BulkOrderStatus::Pending);
    assert_eq!(rfqs.len(), 2);
    let mut shop_ids = rfqs.iter().map(|r| r.shop_id).collect::<Vec<_>>();
    shop_ids.sort_unstable();
    assert_eq!(shop_ids, vec![market.shop_a.id, market.shop_b.id]);
    for rfq in &rfqs {
        assert_eq!(rfq.status, RfqStatus::Pending);
        assert_eq!(rfq.bulk_order_id, order.id);
        assert_eq!(rfq.buyer_id, market.buyer.id);
        assert!(rfq.price.is_none());
        assert!(rfq.delivery_time.is_none());
    }
}

#[tokio::test]
async fn fan_out_does_not_reach_shops_outside_the_category() {
    let market = setup_market().await;
    let outsider = seed::seed_shop(market.db.pool(), "Forge & Anvil", Some("sales@forge.example")).await;
    seed::seed_product(market.db.pool(), outsider.id, "Cast iron pan", "cookware", Some(4.5)).await;

    let (_, rfqs) = create_textiles_order(&market).await;
    assert_eq!(rfqs.len(), 2);
    assert!(rfqs.iter().all(|r| r.shop_id != outsider.id));
}

#[tokio::test]
async fn fan_out_retry_never_duplicates_a_pair() {
    use bulk_market_engine::MarketplaceDatabase;

    let market = setup_market().await;
    let (order, rfqs) = create_textiles_order(&market).await;

    let again = market.db.fan_out_rfqs(&order).await.expect("Fan-out retry failed");
    assert_eq!(again.len(), rfqs.len());
    let mut first = rfqs.iter().map(|r| r.id).collect::<Vec<_>>();
    let mut second = again.iter().map(|c| c.rfq.id).collect::<Vec<_>>();
    first.sort_unstable();
    second.sort_unstable();
    assert_eq!(first, second);
}

#[tokio::test]
async fn creating_an_order_without_a_buyer_is_rejected() {
    let market = setup_market().await;
    let api = negotiation(&market.db);
    let order = NewBulkOrder::new(0, "Tote bags", 500, CATEGORY);
    let err = api.create_bulk_order(order).await.expect_err("Expected a validation error");
    assert!(matches!(err, MarketplaceError::MissingRequester));
}

#[tokio::test]
async fn offer_submission_is_single_use() {
    let market = setup_market().await;
    let (_, rfqs) = create_textiles_order(&market).await;
    let rfq = rfq_for_shop(&rfqs, market.shop_a.id);
    let api = negotiation(&market.db);

    let submitted = api.submit_offer(rfq.id, sample_terms()).await.expect("First submission failed");
    assert_eq!(submitted.status, RfqStatus::OfferSubmitted);
    assert_eq!(submitted.price, Some(Money::from_units(1_800)));

    let mut second = sample_terms();
    second.price = Money::from_units(900);
    let err = api.submit_offer(rfq.id, second).await.expect_err("Second submission must fail");
    assert!(matches!(err, MarketplaceError::OfferAlreadySubmitted(_)));

    let stored = queries(&market.db).rfq_by_id(rfq.id).await.unwrap().unwrap();
    assert_eq!(stored.price, Some(Money::from_units(1_800)));
    assert_eq!(stored.terms, submitted.terms);
}

#[tokio::test]
async fn submitting_against_a_missing_rfq_is_not_found() {
    let market = setup_market().await;
    let api = negotiation(&market.db);
    let err = api.submit_offer(9999, sample_terms()).await.expect_err("Expected not-found");
    assert!(matches!(err, MarketplaceError::RfqNotFound(9999)));
}

#[tokio::test]
async fn acceptance_locks_the_order_and_declines_siblings() {
    let market = setup_market().await;
    let (order, rfqs) = create_textiles_order(&market).await;
    let rfq_a = rfq_for_shop(&rfqs, market.shop_a.id);
    let rfq_b = rfq_for_shop(&rfqs, market.shop_b.id);
    let api = negotiation(&market.db);

    api.submit_offer(rfq_a.id, sample_terms()).await.unwrap();
    api.submit_offer(rfq_b.id, sample_terms()).await.unwrap();

    let accepted = api.confirm_payment(rfq_a.id, "txn-4242").await.expect("Acceptance failed");
    assert_eq!(accepted.rfq.status, RfqStatus::Accepted);
    assert_eq!(accepted.bulk_order.status, BulkOrderStatus::Processing);
    assert_eq!(accepted.bulk_order.accepted_offer, Some(rfq_a.id));
    assert_eq!(accepted.bulk_order.payment_info.as_deref(), Some("txn-4242"));
    assert!(accepted.bulk_order.paid_at.is_some());
    assert_eq!(accepted.declined_siblings, 1);

    let query = queries(&market.db);
    let sibling = query.rfq_by_id(rfq_b.id).await.unwrap().unwrap();
    assert_eq!(sibling.status, RfqStatus::Declined);

    // Accepting the sibling afterwards must conflict, as must re-accepting the winner.
    let err = api.confirm_payment(rfq_b.id, "txn-4343").await.expect_err("Sibling acceptance must fail");
    assert!(matches!(err, MarketplaceError::OfferAlreadyAccepted(id) if id == order.id));
    let err = api.confirm_payment(rfq_a.id, "txn-4444").await.expect_err("Repeat acceptance must fail");
    assert!(matches!(err, MarketplaceError::OfferAlreadyAccepted(id) if id == order.id));

    // The losing calls changed nothing.
    let final_order = query.bulk_order_by_id(order.id).await.unwrap().unwrap();
    assert_eq!(final_order.payment_info.as_deref(), Some("txn-4242"));
    assert_eq!(final_order.accepted_offer, Some(rfq_a.id));
}

#[tokio::test]
async fn concurrent_acceptance_has_exactly_one_winner() {
    let market = setup_market().await;
    let (order, rfqs) = create_textiles_order(&market).await;
    let rfq_a = rfq_for_shop(&rfqs, market.shop_a.id);
    let rfq_b = rfq_for_shop(&rfqs, market.shop_b.id);
    let api = negotiation(&market.db);
    api.submit_offer(rfq_a.id, sample_terms()).await.unwrap();
    api.submit_offer(rfq_b.id, sample_terms()).await.unwrap();

    let api_1 = negotiation(&market.db);
    let api_2 = negotiation(&market.db);
    let (first, second) =
        tokio::join!(api_1.confirm_payment(rfq_a.id, "txn-1"), api_2.confirm_payment(rfq_b.id, "txn-2"));

    let winners = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one concurrent acceptance may succeed");
    for result in [first, second] {
        if let Err(e) = result {
            assert!(matches!(e, MarketplaceError::OfferAlreadyAccepted(_)), "loser saw: {e}");
        }
    }

    let query = queries(&market.db);
    let a = query.rfq_by_id(rfq_a.id).await.unwrap().unwrap();
    let b = query.rfq_by_id(rfq_b.id).await.unwrap().unwrap();
    let accepted = [&a, &b].iter().filter(|r| r.status == RfqStatus::Accepted).count();
    let declined = [&a, &b].iter().filter(|r| r.status == RfqStatus::Declined).count();
    assert_eq!((accepted, declined), (1, 1));
    let final_order = query.bulk_order_by_id(order.id).await.unwrap().unwrap();
    assert_eq!(final_order.status, BulkOrderStatus::Processing);
}

#[tokio::test]
async fn accepted_offers_are_immutable() {
    let market = setup_market().await;
    let (_, rfqs) = create_textiles_order(&market).await;
    let rfq = rfq_for_shop(&rfqs, market.shop_a.id);
    let api = negotiation(&market.db);
    api.submit_offer(rfq.id, sample_terms()).await.unwrap();
    api.confirm_payment(rfq.id, "txn-1").await.unwrap();

    let mut revised = sample_terms();
    revised.price = Money::from_units(1);
    let err = api.update_offer(rfq.id, revised).await.expect_err("Update of accepted offer must fail");
    assert!(matches!(err, MarketplaceError::OfferLocked(_)));
    let err = api.withdraw_offer(rfq.id).await.expect_err("Withdrawal of accepted offer must fail");
    assert!(matches!(err, MarketplaceError::OfferLocked(_)));

    let stored = queries(&market.db).rfq_by_id(rfq.id).await.unwrap().unwrap();
    assert_eq!(stored.status, RfqStatus::Accepted);
    assert_eq!(stored.price, Some(Money::from_units(1_800)));
}

#[tokio::test]
async fn offers_can_be_updated_and_withdrawn_before_acceptance() {
    let market = setup_market().await;
    let (_, rfqs) = create_textiles_order(&market).await;
    let rfq = rfq_for_shop(&rfqs, market.shop_a.id);
    let api = negotiation(&market.db);
    api.submit_offer(rfq.id, sample_terms()).await.unwrap();

    let mut revised = sample_terms();
    revised.price = Money::from_units(1_500);
    revised.delivery_time = Some("2 weeks".to_string());
    let updated = api.update_offer(rfq.id, revised).await.expect("Update failed");
    assert_eq!(updated.price, Some(Money::from_units(1_500)));
    assert_eq!(updated.delivery_time.as_deref(), Some("2 weeks"));
    // An edit never changes the status.
    assert_eq!(updated.status, RfqStatus::OfferSubmitted);

    api.withdraw_offer(rfq.id).await.expect("Withdrawal failed");
    assert!(queries(&market.db).rfq_by_id(rfq.id).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_cascades_before_acceptance_and_is_blocked_after() {
    let market = setup_market().await;
    let api = negotiation(&market.db);
    let query = queries(&market.db);

    // Pre-acceptance: the order and its RFQs go together.
    let (order, rfqs) = create_textiles_order(&market).await;
    let removed = api.delete_bulk_order(order.id).await.expect("Delete failed");
    assert_eq!(removed, rfqs.len() as u64);
    assert!(query.bulk_order_by_id(order.id).await.unwrap().is_none());
    for rfq in &rfqs {
        assert!(query.rfq_by_id(rfq.id).await.unwrap().is_none());
    }

    // Post-acceptance: the order is locked forever.
    let (order, rfqs) = create_textiles_order(&market).await;
    let rfq = rfq_for_shop(&rfqs, market.shop_a.id);
    api.submit_offer(rfq.id, sample_terms()).await.unwrap();
    api.confirm_payment(rfq.id, "txn-1").await.unwrap();
    let err = api.delete_bulk_order(order.id).await.expect_err("Delete of locked order must fail");
    assert!(matches!(err, MarketplaceError::BulkOrderLocked(_)));
    assert!(query.bulk_order_by_id(order.id).await.unwrap().is_some());
    assert!(query.rfq_by_id(rfq.id).await.unwrap().is_some());
}

#[tokio::test]
async fn deleting_a_missing_order_is_not_found() {
    let market = setup_market().await;
    let api = negotiation(&market.db);
    let err = api.delete_bulk_order(555).await.expect_err("Expected not-found");
    assert!(matches!(err, MarketplaceError::BulkOrderNotFound(555)));
}

#[tokio::test]
async fn fulfillment_accepts_only_the_closed_status_set() {
    let market = setup_market().await;
    let (order, rfqs) = create_textiles_order(&market).await;
    let rfq = rfq_for_shop(&rfqs, market.shop_a.id);
    let api = negotiation(&market.db);
    api.submit_offer(rfq.id, sample_terms()).await.unwrap();
    api.confirm_payment(rfq.id, "txn-1").await.unwrap();

    let err =
        api.update_order_status(order.id, BulkOrderStatus::Pending).await.expect_err("Pending must be rejected");
    assert!(matches!(err, MarketplaceError::InvalidStatus(_)));
    let unchanged = queries(&market.db).bulk_order_by_id(order.id).await.unwrap().unwrap();
    assert_eq!(unchanged.status, BulkOrderStatus::Processing);

    let shipping = api.update_order_status(order.id, BulkOrderStatus::Shipping).await.expect("Shipping failed");
    assert_eq!(shipping.status, BulkOrderStatus::Shipping);
    assert!(shipping.delivered_at.is_none());

    let delivered = api.update_order_status(order.id, BulkOrderStatus::Delivered).await.expect("Delivered failed");
    assert_eq!(delivered.status, BulkOrderStatus::Delivered);
    assert!(delivered.delivered_at.is_some());
}

#[tokio::test]
async fn fulfillment_update_on_a_missing_order_is_not_found() {
    let market = setup_market().await;
    let api = negotiation(&market.db);
    let err = api.update_order_status(808, BulkOrderStatus::Shipping).await.expect_err("Expected not-found");
    assert!(matches!(err, MarketplaceError::BulkOrderNotFound(808)));
}

#[tokio::test]
async fn rfq_created_events_fire_once_per_slot() {
    use std::{
        future::Future,
        pin::Pin,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
    };

    use bulk_market_engine::events::{EventHandlers, EventHooks};

    let market = setup_market().await;
    let count = Arc::new(AtomicUsize::new(0));
    let c = count.clone();
    let mut hooks = EventHooks::default();
    hooks.on_rfq_created(move |_ev| {
        let c = c.clone();
        Box::pin(async move {
            c.fetch_add(1, Ordering::SeqCst);
        }) as Pin<Box<dyn Future<Output = ()> + Send>>
    });
    let handlers = EventHandlers::new(16, hooks);
    let producers = handlers.producers();
    handlers.start_handlers().await;

    let api = NegotiationApi::new(market.db.clone(), producers);
    let order = NewBulkOrder::new(market.buyer.id, "Tote bags", 500, CATEGORY);
    let (_, rfqs) = api.create_bulk_order(order).await.expect("Creation failed");
    assert_eq!(rfqs.len(), 2);

    // The hooks run on detached tasks; give them a moment.
    tokio::time::sleep(tokio::time::Duration::from_millis(250)).await;
    assert_eq!(count.load(Ordering::SeqCst), 2);
}
