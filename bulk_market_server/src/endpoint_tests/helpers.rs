use actix_web::{
    body::MessageBody,
    http::StatusCode,
    test,
    test::TestRequest,
    web::ServiceConfig,
    App,
};
use bmx_common::Money;
use bulk_market_engine::db_types::{BulkOrder, BulkOrderStatus, Buyer, Rfq, RfqStatus, Shop};
use chrono::{TimeZone, Utc};

pub async fn send_request(
    req: TestRequest,
    configure: fn(&mut ServiceConfig),
) -> (StatusCode, serde_json::Value) {
    let _ = env_logger::try_init();
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    let (_, res) = test::call_service(&service, req.to_request()).await.into_parts();
    let status = res.status();
    let bytes = res.into_body().try_into_bytes().unwrap();
    let body = serde_json::from_slice(&bytes).expect("Response body was not JSON");
    (status, body)
}

pub async fn get_request(path: &str, configure: fn(&mut ServiceConfig)) -> (StatusCode, serde_json::Value) {
    send_request(TestRequest::get().uri(path), configure).await
}

pub async fn post_json(
    path: &str,
    body: serde_json::Value,
    configure: fn(&mut ServiceConfig),
) -> (StatusCode, serde_json::Value) {
    send_request(TestRequest::post().uri(path).set_json(body), configure).await
}

pub async fn put_json(
    path: &str,
    body: serde_json::Value,
    configure: fn(&mut ServiceConfig),
) -> (StatusCode, serde_json::Value) {
    send_request(TestRequest::put().uri(path).set_json(body), configure).await
}

pub async fn delete_request(path: &str, configure: fn(&mut ServiceConfig)) -> (StatusCode, serde_json::Value) {
    send_request(TestRequest::delete().uri(path), configure).await
}

// ---------------------------------------  Fixtures  -----------------------------------------------------------

pub fn bulk_order(id: i64, status: BulkOrderStatus) -> BulkOrder {
    BulkOrder {
        id,
        buyer_id: 7,
        product_name: "Tote bags".to_string(),
        description: None,
        quantity: 500,
        category: "textiles".to_string(),
        reference_image: None,
        budget: Some(Money::from_units(2_000)),
        delivery_deadline: None,
        shipping_address: None,
        packaging_requirements: None,
        supplier_location_preference: None,
        status,
        accepted_offer: None,
        payment_info: None,
        paid_at: None,
        delivered_at: None,
        created_at: Utc.with_ymd_and_hms(2024, 8, 1, 12, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 8, 1, 12, 0, 0).unwrap(),
    }
}

pub fn rfq(id: i64, status: RfqStatus) -> Rfq {
    let price = match status {
        RfqStatus::Pending => None,
        _ => Some(Money::from_units(1_800)),
    };
    Rfq {
        id,
        bulk_order_id: 1,
        shop_id: 2,
        buyer_id: 7,
        price,
        price_per_unit: None,
        delivery_time: Some("3 weeks".to_string()),
        terms: None,
        warranty: None,
        available_quantity: None,
        expiration_date: None,
        packaging_details: None,
        status,
        created_at: Utc.with_ymd_and_hms(2024, 8, 1, 12, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 8, 1, 12, 0, 0).unwrap(),
    }
}

pub fn shop() -> Shop {
    Shop { id: 2, name: "Loom & Co".to_string(), email: Some("orders@loom.example".to_string()), phone: None }
}

pub fn buyer() -> Buyer {
    Buyer { id: 7, name: "Amara".to_string(), email: Some("amara@example.com".to_string()), phone: None }
}
