use actix_web::{http::StatusCode, web, web::ServiceConfig};
use bulk_market_engine::{
    db_types::{BulkOrderStatus, RfqStatus},
    events::EventProducers,
    market_objects::{OfferDetails, ShopProfile},
    traits::AcceptedOffer,
    MarketQueryApi,
    MarketplaceError,
    NegotiationApi,
};

use super::{
    helpers::{bulk_order, buyer, delete_request, get_request, post_json, put_json, rfq, shop},
    mocks::MockMarketBackend,
};
use crate::routes::{
    ConfirmPaymentRoute,
    DeleteOfferRoute,
    OfferDetailsRoute,
    OffersForOrderRoute,
    SubmitOfferRoute,
    UpdateOfferRoute,
};

fn offer_body() -> serde_json::Value {
    serde_json::json!({
        "price": 180_000,
        "price_per_unit": 360,
        "delivery_time": "3 weeks",
        "terms": "50% upfront"
    })
}

#[actix_web::test]
async fn submitting_an_offer_succeeds() {
    let (status, body) = post_json("/submit-offer/10", offer_body(), configure_submit).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Offer submitted successfully");
    assert_eq!(body["rfq"]["status"], "Offer Submitted");
}

#[actix_web::test]
async fn a_second_submission_conflicts() {
    let (status, body) = post_json("/submit-offer/10", offer_body(), configure_submit_conflict).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("already been submitted"));
}

#[actix_web::test]
async fn submitting_against_an_unknown_rfq_is_404() {
    let (status, body) = post_json("/submit-offer/99", offer_body(), configure_submit_missing).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn the_offer_list_is_200_even_when_empty() {
    let (status, body) = get_request("/offers/1", configure_empty_offers).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["offers"].as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn offer_details_carry_the_shop_rating() {
    let (status, body) = get_request("/offer-details/10", configure_offer_details).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["offer"]["shop"]["rating"], 3.5);
    assert_eq!(body["offer"]["rfq"]["id"], 10);
}

#[actix_web::test]
async fn missing_offer_details_are_404() {
    let (status, body) = get_request("/offer-details/99", configure_missing_offer_details).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Offer not found");
}

#[actix_web::test]
async fn updating_an_accepted_offer_conflicts() {
    let (status, body) = put_json("/update-offer/10", offer_body(), configure_update_locked).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("no longer be modified"));
}

#[actix_web::test]
async fn deleting_an_offer_succeeds() {
    let (status, body) = delete_request("/delete-offer/10", configure_delete_offer).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Offer deleted successfully");
}

#[actix_web::test]
async fn confirming_payment_accepts_the_offer() {
    let (status, body) = post_json(
        "/confirm-payment/10",
        serde_json::json!({ "payment_info": "txn-4242" }),
        configure_confirm,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Payment confirmed and offer accepted.");
    assert_eq!(body["rfq"]["status"], "Accepted");
    assert_eq!(body["bulk_order"]["status"], "Processing");
}

#[actix_web::test]
async fn a_second_acceptance_conflicts() {
    let (status, body) = post_json(
        "/confirm-payment/11",
        serde_json::json!({ "payment_info": "txn-4343" }),
        configure_confirm_conflict,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("already been accepted"));
}

// ---------------------------------------  Service configurations  ---------------------------------------------

fn negotiation_data(backend: MockMarketBackend) -> web::Data<NegotiationApi<MockMarketBackend>> {
    web::Data::new(NegotiationApi::new(backend, EventProducers::default()))
}

fn configure_submit(cfg: &mut ServiceConfig) {
    let mut backend = MockMarketBackend::new();
    backend.expect_submit_offer().returning(|id, _| Ok(rfq(id, RfqStatus::OfferSubmitted)));
    backend.expect_fetch_bulk_order().returning(|id| Ok(Some(bulk_order(id, BulkOrderStatus::Pending))));
    backend.expect_fetch_buyer().returning(|_| Ok(Some(buyer())));
    cfg.service(SubmitOfferRoute::<MockMarketBackend>::new()).app_data(negotiation_data(backend));
}

fn configure_submit_conflict(cfg: &mut ServiceConfig) {
    let mut backend = MockMarketBackend::new();
    backend.expect_submit_offer().returning(|id, _| Err(MarketplaceError::OfferAlreadySubmitted(id)));
    cfg.service(SubmitOfferRoute::<MockMarketBackend>::new()).app_data(negotiation_data(backend));
}

fn configure_submit_missing(cfg: &mut ServiceConfig) {
    let mut backend = MockMarketBackend::new();
    backend.expect_submit_offer().returning(|id, _| Err(MarketplaceError::RfqNotFound(id)));
    cfg.service(SubmitOfferRoute::<MockMarketBackend>::new()).app_data(negotiation_data(backend));
}

fn configure_empty_offers(cfg: &mut ServiceConfig) {
    let mut backend = MockMarketBackend::new();
    backend.expect_offers_for_bulk_order().returning(|_| Ok(vec![]));
    let api = MarketQueryApi::new(backend);
    cfg.service(OffersForOrderRoute::<MockMarketBackend>::new()).app_data(web::Data::new(api));
}

fn configure_offer_details(cfg: &mut ServiceConfig) {
    let mut backend = MockMarketBackend::new();
    backend.expect_offer_details().returning(|id| {
        Ok(Some(OfferDetails {
            rfq: rfq(id, RfqStatus::OfferSubmitted),
            bulk_order: bulk_order(1, BulkOrderStatus::Pending),
            shop: ShopProfile::new(shop(), Some(3.5)),
        }))
    });
    let api = MarketQueryApi::new(backend);
    cfg.service(OfferDetailsRoute::<MockMarketBackend>::new()).app_data(web::Data::new(api));
}

fn configure_missing_offer_details(cfg: &mut ServiceConfig) {
    let mut backend = MockMarketBackend::new();
    backend.expect_offer_details().returning(|_| Ok(None));
    let api = MarketQueryApi::new(backend);
    cfg.service(OfferDetailsRoute::<MockMarketBackend>::new()).app_data(web::Data::new(api));
}

fn configure_update_locked(cfg: &mut ServiceConfig) {
    let mut backend = MockMarketBackend::new();
    backend.expect_update_offer().returning(|id, _| Err(MarketplaceError::OfferLocked(id)));
    cfg.service(UpdateOfferRoute::<MockMarketBackend>::new()).app_data(negotiation_data(backend));
}

fn configure_delete_offer(cfg: &mut ServiceConfig) {
    let mut backend = MockMarketBackend::new();
    backend.expect_withdraw_offer().returning(|_| Ok(()));
    cfg.service(DeleteOfferRoute::<MockMarketBackend>::new()).app_data(negotiation_data(backend));
}

fn configure_confirm(cfg: &mut ServiceConfig) {
    let mut backend = MockMarketBackend::new();
    backend.expect_accept_offer().returning(|id, info| {
        let mut order = bulk_order(1, BulkOrderStatus::Processing);
        order.payment_info = Some(info.to_string());
        order.accepted_offer = Some(id);
        Ok(AcceptedOffer { bulk_order: order, rfq: rfq(id, RfqStatus::Accepted), declined_siblings: 1 })
    });
    backend.expect_fetch_shop().returning(|_| Ok(Some(shop())));
    cfg.service(ConfirmPaymentRoute::<MockMarketBackend>::new()).app_data(negotiation_data(backend));
}

fn configure_confirm_conflict(cfg: &mut ServiceConfig) {
    let mut backend = MockMarketBackend::new();
    backend.expect_accept_offer().returning(|_, _| Err(MarketplaceError::OfferAlreadyAccepted(1)));
    cfg.service(ConfirmPaymentRoute::<MockMarketBackend>::new()).app_data(negotiation_data(backend));
}
