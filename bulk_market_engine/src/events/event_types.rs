use serde::{Deserialize, Serialize};

use crate::db_types::{BulkOrder, Buyer, Rfq, Shop};

/// Emitted once per RFQ slot created at fan-out time. Carries the targeted shop so subscribers
/// can address the seller directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RfqCreatedEvent {
    pub rfq: Rfq,
    pub shop: Shop,
    pub bulk_order: BulkOrder,
}

impl RfqCreatedEvent {
    pub fn new(rfq: Rfq, shop: Shop, bulk_order: BulkOrder) -> Self {
        Self { rfq, shop, bulk_order }
    }
}

/// Emitted when a seller submits an offer against an RFQ slot. Carries the requesting buyer so
/// subscribers can notify them of the new quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferSubmittedEvent {
    pub rfq: Rfq,
    pub bulk_order: BulkOrder,
    pub buyer: Buyer,
}

impl OfferSubmittedEvent {
    pub fn new(rfq: Rfq, bulk_order: BulkOrder, buyer: Buyer) -> Self {
        Self { rfq, bulk_order, buyer }
    }
}

/// Emitted after an offer has been accepted and payment recorded. Carries the winning shop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferAcceptedEvent {
    pub rfq: Rfq,
    pub bulk_order: BulkOrder,
    pub shop: Shop,
}

impl OfferAcceptedEvent {
    pub fn new(rfq: Rfq, bulk_order: BulkOrder, shop: Shop) -> Self {
        Self { rfq, bulk_order, shop }
    }
}
