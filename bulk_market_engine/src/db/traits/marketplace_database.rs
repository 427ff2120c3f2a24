use crate::db_types::{BulkOrder, BulkOrderStatus, NewBulkOrder, OfferTerms, Rfq};

use super::{AcceptedOffer, CreatedRfq, MarketplaceError};

/// This trait defines the mutation surface a backend must expose to support the negotiation
/// engine.
///
/// The behaviour includes:
/// * Persisting new bulk orders and fanning RFQ slots out to matching sellers.
/// * Recording seller offers and later edits or withdrawals.
/// * The exclusive-winner acceptance flow.
/// * Seller-driven fulfillment progression and the pre-acceptance cascade delete.
#[allow(async_fn_in_trait)]
pub trait MarketplaceDatabase: Clone {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Persists a brand-new bulk order with `Pending` status and returns the stored record.
    ///
    /// This is the first half of bulk-order creation. Fan-out is a separate call
    /// ([`Self::fan_out_rfqs`]) so that a fan-out failure never takes the committed order down
    /// with it; the degraded partial-fan-out mode is documented on that method.
    async fn insert_bulk_order(&self, order: NewBulkOrder) -> Result<BulkOrder, MarketplaceError>;

    /// Creates one `Pending` RFQ slot, with empty offer fields, for every shop that sells in the
    /// order's category.
    ///
    /// Each (bulk order, shop) insert is idempotent: retrying a partially-completed fan-out
    /// creates slots only for shops that do not have one yet, and never a duplicate pair. A
    /// failure partway leaves the already-created slots in place; callers must treat that as a
    /// documented degraded mode, not roll it back.
    ///
    /// Returns every slot that exists for the order after the call, paired with its shop.
    async fn fan_out_rfqs(&self, order: &BulkOrder) -> Result<Vec<CreatedRfq>, MarketplaceError>;

    /// Writes the seller's offer into an RFQ slot and moves it to `Offer Submitted`.
    ///
    /// Submission is single-use: if the slot already carries a price the call fails with
    /// [`MarketplaceError::OfferAlreadySubmitted`] and the stored offer is left untouched.
    /// Sellers change their terms through [`Self::update_offer`] instead.
    async fn submit_offer(&self, rfq_id: i64, terms: OfferTerms) -> Result<Rfq, MarketplaceError>;

    /// Overwrites the offer fields of an existing RFQ. The status is left unchanged.
    ///
    /// Fails with [`MarketplaceError::OfferLocked`] once the RFQ has been accepted.
    async fn update_offer(&self, rfq_id: i64, terms: OfferTerms) -> Result<Rfq, MarketplaceError>;

    /// Permanently removes an RFQ. Same preconditions as [`Self::update_offer`].
    async fn withdraw_offer(&self, rfq_id: i64) -> Result<(), MarketplaceError>;

    /// Accepts the given RFQ and records payment, in a single atomic transaction:
    /// * the bulk order moves to `Processing`, stores the payment reference, stamps `paid_at` and
    ///   points `accepted_offer` at the winning RFQ;
    /// * the winning RFQ moves to `Accepted`;
    /// * every sibling RFQ of the same bulk order moves to `Declined`.
    ///
    /// At most one RFQ per bulk order can ever win. Under concurrent acceptance attempts the
    /// claim is guarded so that the loser observes [`MarketplaceError::OfferAlreadyAccepted`] and
    /// mutates nothing; outside observers never see two accepted siblings, nor a `Processing`
    /// order without an accepted RFQ.
    async fn accept_offer(&self, rfq_id: i64, payment_info: &str) -> Result<AcceptedOffer, MarketplaceError>;

    /// Sets the fulfillment status of a bulk order. When the new status is `Delivered`, the
    /// delivery timestamp is stamped in the same statement.
    ///
    /// No forward-only check is made here; callers are responsible for restricting the status set.
    async fn update_order_status(&self, order_id: i64, status: BulkOrderStatus) -> Result<BulkOrder, MarketplaceError>;

    /// Deletes a bulk order and all of its RFQ slots in one transaction.
    ///
    /// Blocked with [`MarketplaceError::BulkOrderLocked`] as soon as any child RFQ has been
    /// accepted; a locked order can never be removed through this interface. Returns the number
    /// of RFQ slots that were removed.
    async fn delete_bulk_order(&self, order_id: i64) -> Result<u64, MarketplaceError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), MarketplaceError> {
        Ok(())
    }
}
