use serde::{Deserialize, Serialize};

use crate::db_types::{BulkOrder, Rfq, Shop};

/// One RFQ slot created by the fan-out, together with the shop it targets. The shop is carried so
/// that the notification hook can address the seller without another lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedRfq {
    pub rfq: Rfq,
    pub shop: Shop,
}

/// The outcome of a successful acceptance: the locked bulk order, the winning RFQ, and the number
/// of sibling RFQs that were declined in the same transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptedOffer {
    pub bulk_order: BulkOrder,
    pub rfq: Rfq,
    pub declined_siblings: u64,
}
