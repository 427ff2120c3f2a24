use std::fmt::Debug;

use crate::{
    bme_api::market_objects::{BuyerOffer, InFlightOrder, OfferDetails, SellerRfq},
    db_types::{BulkOrder, Buyer, Rfq, Shop},
    traits::{MarketQuery, MarketQueryError},
};

/// The `MarketQueryApi` provides a unified API for the read views of the marketplace.
pub struct MarketQueryApi<B> {
    db: B,
}

impl<B: Debug> Debug for MarketQueryApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MarketQueryApi ({:?})", self.db)
    }
}

impl<B> MarketQueryApi<B>
where B: MarketQuery
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn bulk_order_by_id(&self, id: i64) -> Result<Option<BulkOrder>, MarketQueryError> {
        self.db.fetch_bulk_order(id).await
    }

    pub async fn rfq_by_id(&self, id: i64) -> Result<Option<Rfq>, MarketQueryError> {
        self.db.fetch_rfq(id).await
    }

    pub async fn shop_by_id(&self, id: i64) -> Result<Option<Shop>, MarketQueryError> {
        self.db.fetch_shop(id).await
    }

    pub async fn buyer_by_id(&self, id: i64) -> Result<Option<Buyer>, MarketQueryError> {
        self.db.fetch_buyer(id).await
    }

    /// Every RFQ slot targeting the shop, with bulk order and buyer contact attached.
    pub async fn rfqs_for_shop(&self, shop_id: i64) -> Result<Vec<SellerRfq>, MarketQueryError> {
        self.db.rfqs_for_shop(shop_id).await
    }

    /// The shop's won RFQs only.
    pub async fn accepted_rfqs_for_shop(&self, shop_id: i64) -> Result<Vec<SellerRfq>, MarketQueryError> {
        self.db.accepted_rfqs_for_shop(shop_id).await
    }

    pub async fn bulk_orders_for_buyer(&self, buyer_id: i64) -> Result<Vec<BulkOrder>, MarketQueryError> {
        self.db.bulk_orders_for_buyer(buyer_id).await
    }

    /// Offers received for a bulk order. Slots without a quoted price are not offers and are
    /// filtered out.
    pub async fn offers_for_bulk_order(&self, bulk_order_id: i64) -> Result<Vec<BuyerOffer>, MarketQueryError> {
        self.db.offers_for_bulk_order(bulk_order_id).await
    }

    /// A single offer with its bulk order and the quoting shop's rated profile.
    pub async fn offer_details(&self, rfq_id: i64) -> Result<Option<OfferDetails>, MarketQueryError> {
        self.db.offer_details(rfq_id).await
    }

    /// The buyer's orders that are past acceptance, winning offer and shop attached.
    pub async fn in_flight_orders_for_buyer(&self, buyer_id: i64) -> Result<Vec<InFlightOrder>, MarketQueryError> {
        self.db.in_flight_orders_for_buyer(buyer_id).await
    }
}
