//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current
//! thread will stop that worker from processing new requests. For this reason, any long,
//! non-cpu-bound operation (I/O, database queries, notification dispatch) must be expressed as a
//! future and awaited, never performed synchronously.
use std::str::FromStr;

use actix_web::{get, web, HttpResponse, Responder};
use bulk_market_engine::{
    db_types::{BulkOrderStatus, NewBulkOrder, OfferTerms},
    MarketQuery,
    MarketQueryApi,
    MarketplaceDatabase,
    NegotiationApi,
};
use log::*;

use crate::{
    data_objects::{
        AcceptedOrdersResponse,
        BulkOrderCreatedResponse,
        BuyerOrdersResponse,
        JsonResponse,
        OfferDetailsResponse,
        OfferResponse,
        OffersResponse,
        OrderStatusResponse,
        PaymentConfirmedResponse,
        PaymentParams,
        ProcessingOrdersResponse,
        SellerRfqsResponse,
        StatusUpdateParams,
    },
    errors::ServerError,
};

// Actix cannot handle generics in handlers, so the registration shim is generated manually using
// the `route!` macro.
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds +)+ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//--------------------------------------------  Create + fan-out  -----------------------------------------------
route!(create_bulk_order => Post "/create" impl MarketplaceDatabase, MarketQuery);
/// Create a bulk order and broadcast an RFQ slot to every shop selling in its category. The
/// reference image, if any, arrives as the stored file path; upload storage is handled upstream.
pub async fn create_bulk_order<A>(
    body: web::Json<NewBulkOrder>,
    api: web::Data<NegotiationApi<A>>,
) -> Result<HttpResponse, ServerError>
where
    A: MarketplaceDatabase + MarketQuery,
{
    let (bulk_order, rfqs) = api.create_bulk_order(body.into_inner()).await?;
    debug!("💻️ Bulk order #{} created with {} RFQs", bulk_order.id, rfqs.len());
    Ok(HttpResponse::Created().json(BulkOrderCreatedResponse {
        success: true,
        message: "Bulk order created and RFQ sent to relevant shops.".to_string(),
        bulk_order,
        rfqs,
    }))
}

//--------------------------------------------  Seller views  ---------------------------------------------------
route!(shop_orders => Get "/get-orders/{shop_id}" impl MarketQuery);
/// A shop's RFQ slots with the bulk order, buyer contact and offer summary attached. Responds
/// 404 when the shop has no slots at all.
pub async fn shop_orders<A: MarketQuery>(
    path: web::Path<i64>,
    api: web::Data<MarketQueryApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let shop_id = path.into_inner();
    debug!("💻️ GET RFQs for shop #{shop_id}");
    let bulk_orders = api.rfqs_for_shop(shop_id).await?;
    if bulk_orders.is_empty() {
        return Ok(HttpResponse::NotFound().json(JsonResponse::failure("No RFQs found for this shop.")));
    }
    Ok(HttpResponse::Ok().json(SellerRfqsResponse { success: true, bulk_orders }))
}

route!(accepted_orders => Get "/get-accepted-orders/{shop_id}" impl MarketQuery);
/// The shop's won RFQs only. Responds 404 when the shop has not won anything.
pub async fn accepted_orders<A: MarketQuery>(
    path: web::Path<i64>,
    api: web::Data<MarketQueryApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let shop_id = path.into_inner();
    debug!("💻️ GET accepted RFQs for shop #{shop_id}");
    let accepted_bulk_orders = api.accepted_rfqs_for_shop(shop_id).await?;
    if accepted_bulk_orders.is_empty() {
        return Ok(HttpResponse::NotFound()
            .json(JsonResponse::failure("No accepted bulk orders found for this shop.")));
    }
    Ok(HttpResponse::Ok().json(AcceptedOrdersResponse { success: true, accepted_bulk_orders }))
}

//--------------------------------------------  Offer lifecycle  ------------------------------------------------
route!(submit_offer => Post "/submit-offer/{rfq_id}" impl MarketplaceDatabase, MarketQuery);
pub async fn submit_offer<A>(
    path: web::Path<i64>,
    body: web::Json<OfferTerms>,
    api: web::Data<NegotiationApi<A>>,
) -> Result<HttpResponse, ServerError>
where
    A: MarketplaceDatabase + MarketQuery,
{
    let rfq_id = path.into_inner();
    debug!("💻️ Offer submission for RFQ #{rfq_id}");
    let rfq = api.submit_offer(rfq_id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(OfferResponse {
        success: true,
        message: "Offer submitted successfully".to_string(),
        rfq,
    }))
}

route!(update_offer => Put "/update-offer/{rfq_id}" impl MarketplaceDatabase, MarketQuery);
pub async fn update_offer<A>(
    path: web::Path<i64>,
    body: web::Json<OfferTerms>,
    api: web::Data<NegotiationApi<A>>,
) -> Result<HttpResponse, ServerError>
where
    A: MarketplaceDatabase + MarketQuery,
{
    let rfq_id = path.into_inner();
    debug!("💻️ Offer update for RFQ #{rfq_id}");
    let rfq = api.update_offer(rfq_id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(OfferResponse {
        success: true,
        message: "Offer updated successfully".to_string(),
        rfq,
    }))
}

route!(delete_offer => Delete "/delete-offer/{rfq_id}" impl MarketplaceDatabase, MarketQuery);
pub async fn delete_offer<A>(
    path: web::Path<i64>,
    api: web::Data<NegotiationApi<A>>,
) -> Result<HttpResponse, ServerError>
where
    A: MarketplaceDatabase + MarketQuery,
{
    let rfq_id = path.into_inner();
    debug!("💻️ Offer deletion for RFQ #{rfq_id}");
    api.withdraw_offer(rfq_id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Offer deleted successfully")))
}

//--------------------------------------------  Buyer views  ----------------------------------------------------
route!(user_orders => Get "/user-orders/{buyer_id}" impl MarketQuery);
/// All bulk orders the buyer has placed. Responds 404 when there are none.
pub async fn user_orders<A: MarketQuery>(
    path: web::Path<i64>,
    api: web::Data<MarketQueryApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let buyer_id = path.into_inner();
    debug!("💻️ GET bulk orders for buyer #{buyer_id}");
    let bulk_orders = api.bulk_orders_for_buyer(buyer_id).await?;
    if bulk_orders.is_empty() {
        return Ok(HttpResponse::NotFound().json(JsonResponse::failure("No bulk orders found for this user.")));
    }
    Ok(HttpResponse::Ok().json(BuyerOrdersResponse { success: true, bulk_orders }))
}

route!(offers_for_order => Get "/offers/{bulk_order_id}" impl MarketQuery);
/// The offers received for a bulk order. Unlike the other list views, an empty result here is a
/// normal 200 with an empty array; storefront clients poll this while offers trickle in.
pub async fn offers_for_order<A: MarketQuery>(
    path: web::Path<i64>,
    api: web::Data<MarketQueryApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let bulk_order_id = path.into_inner();
    debug!("💻️ GET offers for bulk order #{bulk_order_id}");
    let offers = api.offers_for_bulk_order(bulk_order_id).await?;
    Ok(HttpResponse::Ok().json(OffersResponse { success: true, offers }))
}

route!(offer_details => Get "/offer-details/{rfq_id}" impl MarketQuery);
pub async fn offer_details<A: MarketQuery>(
    path: web::Path<i64>,
    api: web::Data<MarketQueryApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let rfq_id = path.into_inner();
    debug!("💻️ GET offer details for RFQ #{rfq_id}");
    match api.offer_details(rfq_id).await? {
        Some(offer) => Ok(HttpResponse::Ok().json(OfferDetailsResponse { success: true, offer })),
        None => Ok(HttpResponse::NotFound().json(JsonResponse::failure("Offer not found"))),
    }
}

route!(user_processing_orders => Get "/user-processing-orders/{buyer_id}" impl MarketQuery);
/// The buyer's in-flight orders. An empty result is a normal 200 with an empty array.
pub async fn user_processing_orders<A: MarketQuery>(
    path: web::Path<i64>,
    api: web::Data<MarketQueryApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let buyer_id = path.into_inner();
    debug!("💻️ GET in-flight orders for buyer #{buyer_id}");
    let processing_orders = api.in_flight_orders_for_buyer(buyer_id).await?;
    let message =
        processing_orders.is_empty().then(|| "No processing orders found for this user".to_string());
    Ok(HttpResponse::Ok().json(ProcessingOrdersResponse { success: true, processing_orders, message }))
}

//--------------------------------------------  Acceptance + fulfillment  ---------------------------------------
route!(confirm_payment => Post "/confirm-payment/{rfq_id}" impl MarketplaceDatabase, MarketQuery);
pub async fn confirm_payment<A>(
    path: web::Path<i64>,
    body: web::Json<PaymentParams>,
    api: web::Data<NegotiationApi<A>>,
) -> Result<HttpResponse, ServerError>
where
    A: MarketplaceDatabase + MarketQuery,
{
    let rfq_id = path.into_inner();
    debug!("💻️ Payment confirmation for RFQ #{rfq_id}");
    let accepted = api.confirm_payment(rfq_id, &body.payment_info).await?;
    Ok(HttpResponse::Ok().json(PaymentConfirmedResponse {
        success: true,
        message: "Payment confirmed and offer accepted.".to_string(),
        rfq: accepted.rfq,
        bulk_order: accepted.bulk_order,
    }))
}

route!(update_order_status => Put "/update-order-status/{order_id}" impl MarketplaceDatabase, MarketQuery);
pub async fn update_order_status<A>(
    path: web::Path<i64>,
    body: web::Json<StatusUpdateParams>,
    api: web::Data<NegotiationApi<A>>,
) -> Result<HttpResponse, ServerError>
where
    A: MarketplaceDatabase + MarketQuery,
{
    let order_id = path.into_inner();
    let status = BulkOrderStatus::from_str(&body.status).map_err(|e| ServerError::ValidationError(e.to_string()))?;
    debug!("💻️ Status update for bulk order #{order_id} to {status}");
    let bulk_order = api.update_order_status(order_id, status).await?;
    Ok(HttpResponse::Ok().json(OrderStatusResponse {
        success: true,
        message: format!("Order status updated to {status}"),
        bulk_order,
    }))
}

route!(delete_bulk_order => Delete "/delete/{id}" impl MarketplaceDatabase, MarketQuery);
pub async fn delete_bulk_order<A>(
    path: web::Path<i64>,
    api: web::Data<NegotiationApi<A>>,
) -> Result<HttpResponse, ServerError>
where
    A: MarketplaceDatabase + MarketQuery,
{
    let id = path.into_inner();
    debug!("💻️ Delete request for bulk order #{id}");
    api.delete_bulk_order(id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Bulk order and associated RFQs deleted successfully.")))
}
