use actix_web::{http::StatusCode, web, web::ServiceConfig};
use bulk_market_engine::{
    db_types::{BulkOrderStatus, RfqStatus},
    events::EventProducers,
    market_objects::SellerRfq,
    traits::CreatedRfq,
    MarketQueryApi,
    MarketplaceError,
    NegotiationApi,
};

use super::{
    helpers::{bulk_order, buyer, delete_request, get_request, post_json, put_json, rfq, shop},
    mocks::MockMarketBackend,
};
use crate::routes::{
    CreateBulkOrderRoute,
    DeleteBulkOrderRoute,
    ShopOrdersRoute,
    UpdateOrderStatusRoute,
    UserOrdersRoute,
    UserProcessingOrdersRoute,
};

#[actix_web::test]
async fn create_returns_the_order_and_its_rfqs() {
    let body = serde_json::json!({
        "buyer_id": 7,
        "product_name": "Tote bags",
        "quantity": 500,
        "category": "textiles"
    });
    let (status, body) = post_json("/create", body, configure_create).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Bulk order created and RFQ sent to relevant shops.");
    assert_eq!(body["bulk_order"]["id"], 1);
    assert_eq!(body["rfqs"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn create_without_a_buyer_is_a_validation_failure() {
    let body = serde_json::json!({
        "product_name": "Tote bags",
        "quantity": 500,
        "category": "textiles"
    });
    let (status, body) = post_json("/create", body, configure_no_expectations).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("buyer id is required"));
}

#[actix_web::test]
async fn user_orders_returns_404_when_the_buyer_has_none() {
    let (status, body) = get_request("/user-orders/7", configure_empty_user_orders).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn user_orders_returns_the_buyers_orders() {
    let (status, body) = get_request("/user-orders/7", configure_user_orders).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["bulk_orders"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn processing_orders_returns_200_with_an_empty_list() {
    let (status, body) = get_request("/user-processing-orders/7", configure_empty_processing).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["processing_orders"].as_array().unwrap().len(), 0);
    assert_eq!(body["message"], "No processing orders found for this user");
}

#[actix_web::test]
async fn shop_orders_returns_404_when_the_shop_has_no_rfqs() {
    let (status, body) = get_request("/get-orders/2", configure_empty_shop_orders).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn shop_orders_nest_the_offer_summary() {
    let (status, body) = get_request("/get-orders/2", configure_shop_orders).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body["bulk_orders"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["offer"]["status"], "Offer Submitted");
    assert_eq!(entries[0]["buyer"]["name"], "Amara");
}

#[actix_web::test]
async fn status_update_rejects_values_outside_the_closed_set() {
    for bad in ["Cancelled", "Shipped", "pending", ""] {
        let body = serde_json::json!({ "status": bad });
        let (status, body) = put_json("/update-order-status/1", body, configure_no_expectations).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{bad} must be rejected");
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().contains("Invalid status"));
    }
}

#[actix_web::test]
async fn status_update_moves_the_order_forward() {
    let body = serde_json::json!({ "status": "Shipping" });
    let (status, body) = put_json("/update-order-status/1", body, configure_status_update).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Order status updated to Shipping");
    assert_eq!(body["bulk_order"]["status"], "Shipping");
}

#[actix_web::test]
async fn delete_is_blocked_once_an_offer_was_accepted() {
    let (status, body) = delete_request("/delete/1", configure_locked_delete).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("accepted"));
}

#[actix_web::test]
async fn delete_cascades_when_nothing_was_accepted() {
    let (status, body) = delete_request("/delete/1", configure_delete).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Bulk order and associated RFQs deleted successfully.");
}

// ---------------------------------------  Service configurations  ---------------------------------------------

fn negotiation_data(backend: MockMarketBackend) -> web::Data<NegotiationApi<MockMarketBackend>> {
    web::Data::new(NegotiationApi::new(backend, EventProducers::default()))
}

fn configure_create(cfg: &mut ServiceConfig) {
    let mut backend = MockMarketBackend::new();
    backend.expect_insert_bulk_order().returning(|_| Ok(bulk_order(1, BulkOrderStatus::Pending)));
    backend.expect_fan_out_rfqs().returning(|_| {
        Ok(vec![
            CreatedRfq { rfq: rfq(10, RfqStatus::Pending), shop: shop() },
            CreatedRfq { rfq: rfq(11, RfqStatus::Pending), shop: shop() },
        ])
    });
    cfg.service(CreateBulkOrderRoute::<MockMarketBackend>::new()).app_data(negotiation_data(backend));
}

fn configure_no_expectations(cfg: &mut ServiceConfig) {
    let backend = MockMarketBackend::new();
    cfg.service(CreateBulkOrderRoute::<MockMarketBackend>::new())
        .service(UpdateOrderStatusRoute::<MockMarketBackend>::new())
        .app_data(negotiation_data(backend));
}

fn configure_empty_user_orders(cfg: &mut ServiceConfig) {
    let mut backend = MockMarketBackend::new();
    backend.expect_bulk_orders_for_buyer().returning(|_| Ok(vec![]));
    let api = MarketQueryApi::new(backend);
    cfg.service(UserOrdersRoute::<MockMarketBackend>::new()).app_data(web::Data::new(api));
}

fn configure_user_orders(cfg: &mut ServiceConfig) {
    let mut backend = MockMarketBackend::new();
    backend.expect_bulk_orders_for_buyer().returning(|_| {
        Ok(vec![bulk_order(1, BulkOrderStatus::Pending), bulk_order(2, BulkOrderStatus::Processing)])
    });
    let api = MarketQueryApi::new(backend);
    cfg.service(UserOrdersRoute::<MockMarketBackend>::new()).app_data(web::Data::new(api));
}

fn configure_empty_processing(cfg: &mut ServiceConfig) {
    let mut backend = MockMarketBackend::new();
    backend.expect_in_flight_orders_for_buyer().returning(|_| Ok(vec![]));
    let api = MarketQueryApi::new(backend);
    cfg.service(UserProcessingOrdersRoute::<MockMarketBackend>::new()).app_data(web::Data::new(api));
}

fn configure_empty_shop_orders(cfg: &mut ServiceConfig) {
    let mut backend = MockMarketBackend::new();
    backend.expect_rfqs_for_shop().returning(|_| Ok(vec![]));
    let api = MarketQueryApi::new(backend);
    cfg.service(ShopOrdersRoute::<MockMarketBackend>::new()).app_data(web::Data::new(api));
}

fn configure_shop_orders(cfg: &mut ServiceConfig) {
    let mut backend = MockMarketBackend::new();
    backend.expect_rfqs_for_shop().returning(|_| {
        Ok(vec![SellerRfq::new(rfq(10, RfqStatus::OfferSubmitted), bulk_order(1, BulkOrderStatus::Pending), buyer())])
    });
    let api = MarketQueryApi::new(backend);
    cfg.service(ShopOrdersRoute::<MockMarketBackend>::new()).app_data(web::Data::new(api));
}

fn configure_status_update(cfg: &mut ServiceConfig) {
    let mut backend = MockMarketBackend::new();
    backend
        .expect_update_order_status()
        .returning(|id, status| Ok(bulk_order(id, status)));
    cfg.service(UpdateOrderStatusRoute::<MockMarketBackend>::new()).app_data(negotiation_data(backend));
}

fn configure_locked_delete(cfg: &mut ServiceConfig) {
    let mut backend = MockMarketBackend::new();
    backend.expect_delete_bulk_order().returning(|id| Err(MarketplaceError::BulkOrderLocked(id)));
    cfg.service(DeleteBulkOrderRoute::<MockMarketBackend>::new()).app_data(negotiation_data(backend));
}

fn configure_delete(cfg: &mut ServiceConfig) {
    let mut backend = MockMarketBackend::new();
    backend.expect_delete_bulk_order().returning(|_| Ok(2));
    cfg.service(DeleteBulkOrderRoute::<MockMarketBackend>::new()).app_data(negotiation_data(backend));
}
