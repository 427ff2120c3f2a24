use bmx_common::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db_types::{BulkOrder, Buyer, Rfq, RfqStatus, Shop};

/// The offer-field projection of an RFQ, nested under seller-facing views so that the storefront
/// can render the quote without picking it out of the full record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferView {
    pub price: Option<Money>,
    pub price_per_unit: Option<Money>,
    pub delivery_time: Option<String>,
    pub terms: Option<String>,
    pub warranty: Option<String>,
    pub available_quantity: Option<i64>,
    pub expiration_date: Option<DateTime<Utc>>,
    pub packaging_details: Option<String>,
    pub status: RfqStatus,
}

impl From<&Rfq> for OfferView {
    fn from(rfq: &Rfq) -> Self {
        Self {
            price: rfq.price,
            price_per_unit: rfq.price_per_unit,
            delivery_time: rfq.delivery_time.clone(),
            terms: rfq.terms.clone(),
            warranty: rfq.warranty.clone(),
            available_quantity: rfq.available_quantity,
            expiration_date: rfq.expiration_date,
            packaging_details: rfq.packaging_details.clone(),
            status: rfq.status,
        }
    }
}

/// A seller's view of one RFQ slot: the slot itself, its offer summary, the bulk order behind it
/// and the requesting buyer's contact details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellerRfq {
    pub rfq: Rfq,
    pub offer: OfferView,
    pub bulk_order: BulkOrder,
    pub buyer: Buyer,
}

impl SellerRfq {
    pub fn new(rfq: Rfq, bulk_order: BulkOrder, buyer: Buyer) -> Self {
        let offer = OfferView::from(&rfq);
        Self { rfq, offer, bulk_order, buyer }
    }
}

/// A buyer's view of one received offer: the quoting shop alongside the RFQ carrying the offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuyerOffer {
    pub rfq: Rfq,
    pub shop: Shop,
}

/// A shop's public profile as shown on the single-offer detail page: contact details plus the
/// average rating over the shop's products. `rating` is `None` for a shop with no products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopProfile {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub rating: Option<f64>,
}

impl ShopProfile {
    pub fn new(shop: Shop, rating: Option<f64>) -> Self {
        Self { id: shop.id, name: shop.name, email: shop.email, phone: shop.phone, rating }
    }
}

/// The enriched single-offer view: the RFQ, its bulk order, and the quoting shop's profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferDetails {
    pub rfq: Rfq,
    pub bulk_order: BulkOrder,
    pub shop: ShopProfile,
}

/// A buyer's order that is past acceptance, with the winning offer and its shop populated when
/// they still exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InFlightOrder {
    pub bulk_order: BulkOrder,
    pub offer: Option<Rfq>,
    pub shop: Option<Shop>,
}
