//! `SqliteDatabase` is a concrete implementation of a Bulk Market Engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the
//! [`crate::traits`] module.
use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::{bulk_orders, catalog, db_url, new_pool, parties, rfqs};
use crate::{
    bme_api::market_objects::{BuyerOffer, InFlightOrder, OfferDetails, SellerRfq, ShopProfile},
    db_types::{BulkOrder, BulkOrderStatus, Buyer, NewBulkOrder, OfferTerms, Rfq, RfqStatus, Shop},
    traits::{
        AcceptedOffer,
        CreatedRfq,
        MarketQuery,
        MarketQueryError,
        MarketplaceDatabase,
        MarketplaceError,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using the URL from the environment, or the default.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl MarketplaceDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn insert_bulk_order(&self, order: NewBulkOrder) -> Result<BulkOrder, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let order = bulk_orders::insert_bulk_order(order, &mut conn).await?;
        debug!("🗃️ Bulk order #{} has been saved in the DB", order.id);
        Ok(order)
    }

    /// Each slot is inserted as its own unit of work. A failure partway leaves the earlier slots
    /// committed; retrying the fan-out fills in only the missing pairs.
    async fn fan_out_rfqs(&self, order: &BulkOrder) -> Result<Vec<CreatedRfq>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let shop_ids = catalog::sellers_for_category(&order.category, &mut conn).await?;
        trace!("🗃️ {} shops match category '{}' for bulk order #{}", shop_ids.len(), order.category, order.id);
        let mut result = Vec::with_capacity(shop_ids.len());
        for shop_id in shop_ids {
            let Some(shop) = parties::fetch_shop(shop_id, &mut conn).await? else {
                warn!("🗃️ Shop #{shop_id} sells in category '{}' but has no contact record. Skipping.", order.category);
                continue;
            };
            let (rfq, inserted) = rfqs::idempotent_insert(order.id, shop_id, order.buyer_id, &mut conn).await?;
            if !inserted {
                debug!("🗃️ RFQ for bulk order #{} and shop #{shop_id} already exists. Not creating a duplicate.", order.id);
            }
            result.push(CreatedRfq { rfq, shop });
        }
        Ok(result)
    }

    async fn submit_offer(&self, rfq_id: i64, terms: OfferTerms) -> Result<Rfq, MarketplaceError> {
        let mut tx = self.pool.begin().await?;
        let rfq = rfqs::fetch_rfq(rfq_id, &mut tx).await?.ok_or(MarketplaceError::RfqNotFound(rfq_id))?;
        if rfq.has_offer() {
            return Err(MarketplaceError::OfferAlreadySubmitted(rfq_id));
        }
        let rfq = rfqs::write_offer(rfq_id, &terms, Some(RfqStatus::OfferSubmitted), &mut tx)
            .await?
            .ok_or(MarketplaceError::RfqNotFound(rfq_id))?;
        tx.commit().await?;
        debug!("🗃️ Offer recorded against RFQ #{rfq_id}");
        Ok(rfq)
    }

    async fn update_offer(&self, rfq_id: i64, terms: OfferTerms) -> Result<Rfq, MarketplaceError> {
        let mut tx = self.pool.begin().await?;
        let rfq = rfqs::fetch_rfq(rfq_id, &mut tx).await?.ok_or(MarketplaceError::RfqNotFound(rfq_id))?;
        if rfq.status == RfqStatus::Accepted {
            return Err(MarketplaceError::OfferLocked(rfq_id));
        }
        let rfq = rfqs::write_offer(rfq_id, &terms, None, &mut tx)
            .await?
            .ok_or(MarketplaceError::RfqNotFound(rfq_id))?;
        tx.commit().await?;
        debug!("🗃️ Offer for RFQ #{rfq_id} overwritten");
        Ok(rfq)
    }

    async fn withdraw_offer(&self, rfq_id: i64) -> Result<(), MarketplaceError> {
        let mut tx = self.pool.begin().await?;
        let rfq = rfqs::fetch_rfq(rfq_id, &mut tx).await?.ok_or(MarketplaceError::RfqNotFound(rfq_id))?;
        if rfq.status == RfqStatus::Accepted {
            return Err(MarketplaceError::OfferLocked(rfq_id));
        }
        rfqs::delete_rfq(rfq_id, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ RFQ #{rfq_id} removed");
        Ok(())
    }

    /// The winner claim, the order lock and the sibling declines commit together. The claim is
    /// the first statement of the transaction, so concurrent acceptance attempts serialize on the
    /// database write lock; the one that runs second finds a sibling already `Accepted`, updates
    /// zero rows, and backs out without mutating anything.
    async fn accept_offer(&self, rfq_id: i64, payment_info: &str) -> Result<AcceptedOffer, MarketplaceError> {
        let mut tx = self.pool.begin().await?;
        let Some(winner) = rfqs::try_mark_accepted(rfq_id, &mut tx).await? else {
            // Claim failed: the RFQ is missing, or this bulk order already has a winner. The
            // rolled-back transaction has mutated nothing either way.
            let rfq = rfqs::fetch_rfq(rfq_id, &mut tx).await?.ok_or(MarketplaceError::RfqNotFound(rfq_id))?;
            bulk_orders::fetch_bulk_order(rfq.bulk_order_id, &mut tx)
                .await?
                .ok_or(MarketplaceError::BulkOrderNotFound(rfq.bulk_order_id))?;
            return Err(MarketplaceError::OfferAlreadyAccepted(rfq.bulk_order_id));
        };
        let order = bulk_orders::record_payment(winner.bulk_order_id, rfq_id, payment_info, &mut tx)
            .await?
            .ok_or(MarketplaceError::BulkOrderNotFound(winner.bulk_order_id))?;
        let declined = rfqs::decline_siblings(order.id, rfq_id, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ RFQ #{rfq_id} accepted for bulk order #{}. {declined} siblings declined.", order.id);
        Ok(AcceptedOffer { bulk_order: order, rfq: winner, declined_siblings: declined })
    }

    async fn update_order_status(
        &self,
        order_id: i64,
        status: BulkOrderStatus,
    ) -> Result<BulkOrder, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let order = bulk_orders::update_status(order_id, status, &mut conn)
            .await?
            .ok_or(MarketplaceError::BulkOrderNotFound(order_id))?;
        Ok(order)
    }

    async fn delete_bulk_order(&self, order_id: i64) -> Result<u64, MarketplaceError> {
        let mut tx = self.pool.begin().await?;
        let order =
            bulk_orders::fetch_bulk_order(order_id, &mut tx).await?.ok_or(MarketplaceError::BulkOrderNotFound(order_id))?;
        if rfqs::has_accepted_rfq(order.id, &mut tx).await? {
            return Err(MarketplaceError::BulkOrderLocked(order_id));
        }
        let removed = rfqs::delete_rfqs_for_bulk_order(order.id, &mut tx).await?;
        bulk_orders::delete_bulk_order(order.id, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Bulk order #{order_id} and {removed} RFQs deleted");
        Ok(removed)
    }

    async fn close(&mut self) -> Result<(), MarketplaceError> {
        self.pool.close().await;
        Ok(())
    }
}

impl MarketQuery for SqliteDatabase {
    async fn fetch_bulk_order(&self, id: i64) -> Result<Option<BulkOrder>, MarketQueryError> {
        let mut conn = self.pool.acquire().await?;
        let order = bulk_orders::fetch_bulk_order(id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_rfq(&self, id: i64) -> Result<Option<Rfq>, MarketQueryError> {
        let mut conn = self.pool.acquire().await?;
        let rfq = rfqs::fetch_rfq(id, &mut conn).await?;
        Ok(rfq)
    }

    async fn fetch_shop(&self, id: i64) -> Result<Option<Shop>, MarketQueryError> {
        let mut conn = self.pool.acquire().await?;
        let shop = parties::fetch_shop(id, &mut conn).await?;
        Ok(shop)
    }

    async fn fetch_buyer(&self, id: i64) -> Result<Option<Buyer>, MarketQueryError> {
        let mut conn = self.pool.acquire().await?;
        let buyer = parties::fetch_buyer(id, &mut conn).await?;
        Ok(buyer)
    }

    async fn rfqs_for_shop(&self, shop_id: i64) -> Result<Vec<SellerRfq>, MarketQueryError> {
        let mut conn = self.pool.acquire().await?;
        let rfqs = rfqs::fetch_rfqs_for_shop(shop_id, None, &mut conn).await?;
        let mut result = Vec::with_capacity(rfqs.len());
        for rfq in rfqs {
            let Some(order) = bulk_orders::fetch_bulk_order(rfq.bulk_order_id, &mut conn).await? else {
                warn!("🗃️ RFQ #{} references bulk order #{} which no longer exists", rfq.id, rfq.bulk_order_id);
                continue;
            };
            let Some(buyer) = parties::fetch_buyer(rfq.buyer_id, &mut conn).await? else {
                warn!("🗃️ RFQ #{} references buyer #{} which no longer exists", rfq.id, rfq.buyer_id);
                continue;
            };
            result.push(SellerRfq::new(rfq, order, buyer));
        }
        Ok(result)
    }

    async fn accepted_rfqs_for_shop(&self, shop_id: i64) -> Result<Vec<SellerRfq>, MarketQueryError> {
        let mut conn = self.pool.acquire().await?;
        let rfqs = rfqs::fetch_rfqs_for_shop(shop_id, Some(RfqStatus::Accepted), &mut conn).await?;
        let mut result = Vec::with_capacity(rfqs.len());
        for rfq in rfqs {
            let Some(order) = bulk_orders::fetch_bulk_order(rfq.bulk_order_id, &mut conn).await? else {
                warn!("🗃️ RFQ #{} references bulk order #{} which no longer exists", rfq.id, rfq.bulk_order_id);
                continue;
            };
            let Some(buyer) = parties::fetch_buyer(rfq.buyer_id, &mut conn).await? else {
                warn!("🗃️ RFQ #{} references buyer #{} which no longer exists", rfq.id, rfq.buyer_id);
                continue;
            };
            result.push(SellerRfq::new(rfq, order, buyer));
        }
        Ok(result)
    }

    async fn bulk_orders_for_buyer(&self, buyer_id: i64) -> Result<Vec<BulkOrder>, MarketQueryError> {
        let mut conn = self.pool.acquire().await?;
        let orders = bulk_orders::fetch_bulk_orders_for_buyer(buyer_id, &mut conn).await?;
        Ok(orders)
    }

    async fn offers_for_bulk_order(&self, bulk_order_id: i64) -> Result<Vec<BuyerOffer>, MarketQueryError> {
        let mut conn = self.pool.acquire().await?;
        let rfqs = rfqs::fetch_rfqs_for_bulk_order(bulk_order_id, true, &mut conn).await?;
        let mut result = Vec::with_capacity(rfqs.len());
        for rfq in rfqs {
            let Some(shop) = parties::fetch_shop(rfq.shop_id, &mut conn).await? else {
                warn!("🗃️ RFQ #{} references shop #{} which no longer exists", rfq.id, rfq.shop_id);
                continue;
            };
            result.push(BuyerOffer { rfq, shop });
        }
        Ok(result)
    }

    async fn offer_details(&self, rfq_id: i64) -> Result<Option<OfferDetails>, MarketQueryError> {
        let mut conn = self.pool.acquire().await?;
        let Some(rfq) = rfqs::fetch_rfq(rfq_id, &mut conn).await? else {
            return Ok(None);
        };
        let Some(order) = bulk_orders::fetch_bulk_order(rfq.bulk_order_id, &mut conn).await? else {
            warn!("🗃️ RFQ #{rfq_id} references bulk order #{} which no longer exists", rfq.bulk_order_id);
            return Ok(None);
        };
        let Some(shop) = parties::fetch_shop(rfq.shop_id, &mut conn).await? else {
            warn!("🗃️ RFQ #{rfq_id} references shop #{} which no longer exists", rfq.shop_id);
            return Ok(None);
        };
        let rating = catalog::average_rating_for_shop(shop.id, &mut conn).await?;
        Ok(Some(OfferDetails { rfq, bulk_order: order, shop: ShopProfile::new(shop, rating) }))
    }

    async fn in_flight_orders_for_buyer(&self, buyer_id: i64) -> Result<Vec<InFlightOrder>, MarketQueryError> {
        let mut conn = self.pool.acquire().await?;
        let orders = bulk_orders::fetch_in_flight_orders_for_buyer(buyer_id, &mut conn).await?;
        let mut result = Vec::with_capacity(orders.len());
        for order in orders {
            let offer = match order.accepted_offer {
                Some(rfq_id) => rfqs::fetch_rfq(rfq_id, &mut conn).await?,
                None => None,
            };
            let shop = match &offer {
                Some(rfq) => parties::fetch_shop(rfq.shop_id, &mut conn).await?,
                None => None,
            };
            result.push(InFlightOrder { bulk_order: order, offer, shop });
        }
        Ok(result)
    }
}
