use crate::{
    bme_api::market_objects::{BuyerOffer, InFlightOrder, OfferDetails, SellerRfq},
    db_types::{BulkOrder, Buyer, Rfq, Shop},
};

use super::MarketQueryError;

/// Read views over the two ledgers. These are pure projections; nothing here mutates state.
#[allow(async_fn_in_trait)]
pub trait MarketQuery: Clone {
    async fn fetch_bulk_order(&self, id: i64) -> Result<Option<BulkOrder>, MarketQueryError>;

    async fn fetch_rfq(&self, id: i64) -> Result<Option<Rfq>, MarketQueryError>;

    async fn fetch_shop(&self, id: i64) -> Result<Option<Shop>, MarketQueryError>;

    async fn fetch_buyer(&self, id: i64) -> Result<Option<Buyer>, MarketQueryError>;

    /// Every RFQ slot targeting the given shop, enriched with the bulk order and the requesting
    /// buyer's contact details. Newest first.
    async fn rfqs_for_shop(&self, shop_id: i64) -> Result<Vec<SellerRfq>, MarketQueryError>;

    /// The subset of [`Self::rfqs_for_shop`] whose offers have been accepted.
    async fn accepted_rfqs_for_shop(&self, shop_id: i64) -> Result<Vec<SellerRfq>, MarketQueryError>;

    /// All bulk orders placed by the given buyer, newest first.
    async fn bulk_orders_for_buyer(&self, buyer_id: i64) -> Result<Vec<BulkOrder>, MarketQueryError>;

    /// The offers received for a bulk order: only RFQ slots that carry a price, each paired with
    /// the offering shop.
    async fn offers_for_bulk_order(&self, bulk_order_id: i64) -> Result<Vec<BuyerOffer>, MarketQueryError>;

    /// A single offer, enriched with its bulk order and the shop's profile including the average
    /// rating over the shop's products (missing ratings count as zero; a shop without products
    /// has no rating).
    async fn offer_details(&self, rfq_id: i64) -> Result<Option<OfferDetails>, MarketQueryError>;

    /// The buyer's orders that are past acceptance (`Processing`, `Shipping` or `Delivered`),
    /// with the accepted offer and its shop populated.
    async fn in_flight_orders_for_buyer(&self, buyer_id: i64) -> Result<Vec<InFlightOrder>, MarketQueryError>;
}
