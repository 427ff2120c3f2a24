use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{BulkOrder, BulkOrderStatus, NewBulkOrder, OfferTerms, Rfq},
    events::{EventProducers, OfferAcceptedEvent, OfferSubmittedEvent, RfqCreatedEvent},
    traits::{AcceptedOffer, CreatedRfq, MarketQuery, MarketplaceDatabase, MarketplaceError},
};

/// `NegotiationApi` is the primary API for the bulk-order negotiation lifecycle: buyers broadcast
/// requests, sellers quote against their RFQ slots, and the buyer accepts exactly one offer.
///
/// Every lifecycle transition that other parties care about is published on the event channels,
/// strictly after the state change has committed. Event publication is fire-and-forget: a missing
/// or failing subscriber never affects the result of the operation that produced the event.
pub struct NegotiationApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B> Debug for NegotiationApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NegotiationApi")
    }
}

impl<B> NegotiationApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }
}

impl<B> NegotiationApi<B>
where B: MarketplaceDatabase + MarketQuery
{
    /// Creates a new bulk order and fans RFQ slots out to every shop selling in the order's
    /// category.
    ///
    /// The order insert commits on its own; the fan-out runs afterwards, one idempotent insert
    /// per matching shop. If the fan-out dies partway, the order and the slots created so far
    /// remain (a documented degraded mode; a retry fills in only the missing slots and can never
    /// duplicate a (bulk order, shop) pair).
    ///
    /// For every created slot a [`RfqCreatedEvent`] is published so the seller can be notified.
    /// Returns the stored order and all of its RFQ slots.
    pub async fn create_bulk_order(&self, order: NewBulkOrder) -> Result<(BulkOrder, Vec<Rfq>), MarketplaceError> {
        if order.buyer_id <= 0 {
            return Err(MarketplaceError::MissingRequester);
        }
        let bulk_order = self.db.insert_bulk_order(order).await?;
        let created = self.db.fan_out_rfqs(&bulk_order).await?;
        debug!("🤝️📦️ Bulk order #{} created. {} RFQs fanned out.", bulk_order.id, created.len());
        self.call_rfq_created_hooks(&bulk_order, &created).await;
        let rfqs = created.into_iter().map(|c| c.rfq).collect();
        Ok((bulk_order, rfqs))
    }

    async fn call_rfq_created_hooks(&self, bulk_order: &BulkOrder, created: &[CreatedRfq]) {
        for emitter in &self.producers.rfq_created_producer {
            debug!("🤝️📦️ Notifying RFQ-created hook subscribers");
            for c in created {
                let event = RfqCreatedEvent::new(c.rfq.clone(), c.shop.clone(), bulk_order.clone());
                emitter.publish_event(event).await;
            }
        }
    }

    /// Records a seller's offer against an RFQ slot.
    ///
    /// Submission is single-use per slot: once a price is on record, further submissions fail
    /// with a conflict and the seller must go through [`Self::update_offer`].
    ///
    /// The parent order and its buyer are loaded after the write to address the notification. If
    /// either has vanished the caller sees a not-found error even though the offer itself has
    /// already committed; the next read of the slot will show the stored offer.
    pub async fn submit_offer(&self, rfq_id: i64, terms: OfferTerms) -> Result<Rfq, MarketplaceError> {
        let rfq = self.db.submit_offer(rfq_id, terms).await?;
        debug!("🤝️💬️ Offer submitted for RFQ #{rfq_id} on bulk order #{}", rfq.bulk_order_id);
        let bulk_order = self
            .db
            .fetch_bulk_order(rfq.bulk_order_id)
            .await?
            .ok_or(MarketplaceError::BulkOrderNotFound(rfq.bulk_order_id))?;
        let buyer =
            self.db.fetch_buyer(bulk_order.buyer_id).await?.ok_or(MarketplaceError::BuyerNotFound(bulk_order.buyer_id))?;
        for emitter in &self.producers.offer_submitted_producer {
            debug!("🤝️💬️ Notifying offer-submitted hook subscribers");
            let event = OfferSubmittedEvent::new(rfq.clone(), bulk_order.clone(), buyer.clone());
            emitter.publish_event(event).await;
        }
        Ok(rfq)
    }

    /// Accepts the given offer and records the buyer's payment.
    ///
    /// The winner claim, the order lock and the sibling declines commit in one transaction; a
    /// concurrent acceptance attempt for the same bulk order loses with a conflict and mutates
    /// nothing. The winning seller is notified after the commit.
    pub async fn confirm_payment(&self, rfq_id: i64, payment_info: &str) -> Result<AcceptedOffer, MarketplaceError> {
        let accepted = self.db.accept_offer(rfq_id, payment_info).await?;
        debug!(
            "🤝️✅️ Offer #{rfq_id} accepted for bulk order #{}. {} sibling RFQs declined.",
            accepted.bulk_order.id, accepted.declined_siblings
        );
        match self.db.fetch_shop(accepted.rfq.shop_id).await? {
            Some(shop) => {
                for emitter in &self.producers.offer_accepted_producer {
                    debug!("🤝️✅️ Notifying offer-accepted hook subscribers");
                    let event = OfferAcceptedEvent::new(accepted.rfq.clone(), accepted.bulk_order.clone(), shop.clone());
                    emitter.publish_event(event).await;
                }
            },
            None => {
                warn!("🤝️✅️ Offer #{rfq_id} accepted, but shop #{} no longer exists. No one to notify.", accepted.rfq.shop_id)
            },
        }
        Ok(accepted)
    }

    /// Seller-driven fulfillment progression. Only `Processing`, `Shipping` and `Delivered` are
    /// accepted; `Delivered` stamps the delivery timestamp.
    ///
    /// Backward transitions are not rejected here; the status set is the only constraint this
    /// operation enforces.
    pub async fn update_order_status(
        &self,
        order_id: i64,
        status: BulkOrderStatus,
    ) -> Result<BulkOrder, MarketplaceError> {
        if !status.is_fulfillment_status() {
            return Err(MarketplaceError::InvalidStatus(status.to_string()));
        }
        let order = self.db.update_order_status(order_id, status).await?;
        debug!("🤝️🚚️ Bulk order #{order_id} moved to {status}");
        Ok(order)
    }

    /// Replaces the offer fields on an RFQ that has not been accepted yet.
    pub async fn update_offer(&self, rfq_id: i64, terms: OfferTerms) -> Result<Rfq, MarketplaceError> {
        let rfq = self.db.update_offer(rfq_id, terms).await?;
        debug!("🤝️💬️ Offer for RFQ #{rfq_id} updated");
        Ok(rfq)
    }

    /// Withdraws (permanently removes) an RFQ that has not been accepted yet.
    pub async fn withdraw_offer(&self, rfq_id: i64) -> Result<(), MarketplaceError> {
        self.db.withdraw_offer(rfq_id).await?;
        debug!("🤝️🗑️ RFQ #{rfq_id} withdrawn");
        Ok(())
    }

    /// Deletes a bulk order and its RFQ slots, unless an offer has been accepted, in which case
    /// the order is locked forever.
    pub async fn delete_bulk_order(&self, order_id: i64) -> Result<u64, MarketplaceError> {
        let removed = self.db.delete_bulk_order(order_id).await?;
        debug!("🤝️🗑️ Bulk order #{order_id} deleted along with {removed} RFQs");
        Ok(removed)
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}
