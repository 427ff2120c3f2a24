use bulk_market_engine::{
    db_types::{BulkOrder, BulkOrderStatus, Buyer, NewBulkOrder, OfferTerms, Rfq, Shop},
    market_objects::{BuyerOffer, InFlightOrder, OfferDetails, SellerRfq},
    traits::{AcceptedOffer, CreatedRfq},
    MarketQuery,
    MarketQueryError,
    MarketplaceDatabase,
    MarketplaceError,
};
use mockall::mock;

mock! {
    pub MarketBackend {}

    impl Clone for MarketBackend {
        fn clone(&self) -> Self;
    }

    impl MarketplaceDatabase for MarketBackend {
        fn url(&self) -> &str;
        async fn insert_bulk_order(&self, order: NewBulkOrder) -> Result<BulkOrder, MarketplaceError>;
        async fn fan_out_rfqs(&self, order: &BulkOrder) -> Result<Vec<CreatedRfq>, MarketplaceError>;
        async fn submit_offer(&self, rfq_id: i64, terms: OfferTerms) -> Result<Rfq, MarketplaceError>;
        async fn update_offer(&self, rfq_id: i64, terms: OfferTerms) -> Result<Rfq, MarketplaceError>;
        async fn withdraw_offer(&self, rfq_id: i64) -> Result<(), MarketplaceError>;
        async fn accept_offer(&self, rfq_id: i64, payment_info: &str) -> Result<AcceptedOffer, MarketplaceError>;
        async fn update_order_status(&self, order_id: i64, status: BulkOrderStatus) -> Result<BulkOrder, MarketplaceError>;
        async fn delete_bulk_order(&self, order_id: i64) -> Result<u64, MarketplaceError>;
    }

    impl MarketQuery for MarketBackend {
        async fn fetch_bulk_order(&self, id: i64) -> Result<Option<BulkOrder>, MarketQueryError>;
        async fn fetch_rfq(&self, id: i64) -> Result<Option<Rfq>, MarketQueryError>;
        async fn fetch_shop(&self, id: i64) -> Result<Option<Shop>, MarketQueryError>;
        async fn fetch_buyer(&self, id: i64) -> Result<Option<Buyer>, MarketQueryError>;
        async fn rfqs_for_shop(&self, shop_id: i64) -> Result<Vec<SellerRfq>, MarketQueryError>;
        async fn accepted_rfqs_for_shop(&self, shop_id: i64) -> Result<Vec<SellerRfq>, MarketQueryError>;
        async fn bulk_orders_for_buyer(&self, buyer_id: i64) -> Result<Vec<BulkOrder>, MarketQueryError>;
        async fn offers_for_bulk_order(&self, bulk_order_id: i64) -> Result<Vec<BuyerOffer>, MarketQueryError>;
        async fn offer_details(&self, rfq_id: i64) -> Result<Option<OfferDetails>, MarketQueryError>;
        async fn in_flight_orders_for_buyer(&self, buyer_id: i64) -> Result<Vec<InFlightOrder>, MarketQueryError>;
    }
}
