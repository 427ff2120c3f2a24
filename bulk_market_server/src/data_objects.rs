use std::fmt::Display;

use bulk_market_engine::{
    db_types::{BulkOrder, Rfq},
    market_objects::{BuyerOffer, InFlightOrder, OfferDetails, SellerRfq},
};
use serde::{Deserialize, Serialize};

/// The bare response envelope, used for failures and payload-free successes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentParams {
    pub payment_info: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateParams {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkOrderCreatedResponse {
    pub success: bool,
    pub message: String,
    pub bulk_order: BulkOrder,
    pub rfqs: Vec<Rfq>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellerRfqsResponse {
    pub success: bool,
    pub bulk_orders: Vec<SellerRfq>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferResponse {
    pub success: bool,
    pub message: String,
    pub rfq: Rfq,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuyerOrdersResponse {
    pub success: bool,
    pub bulk_orders: Vec<BulkOrder>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffersResponse {
    pub success: bool,
    pub offers: Vec<BuyerOffer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferDetailsResponse {
    pub success: bool,
    pub offer: OfferDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfirmedResponse {
    pub success: bool,
    pub message: String,
    pub rfq: Rfq,
    pub bulk_order: BulkOrder,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingOrdersResponse {
    pub success: bool,
    pub processing_orders: Vec<InFlightOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptedOrdersResponse {
    pub success: bool,
    pub accepted_bulk_orders: Vec<SellerRfq>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusResponse {
    pub success: bool,
    pub message: String,
    pub bulk_order: BulkOrder,
}
