//! # Database management and control.
//!
//! This module provides the interfaces that define the contracts of the negotiation engine
//! database *backends*.
//!
//! ## Ledgers
//! The marketplace keeps two ledgers: the bulk-order ledger (one record per buyer request) and
//! the RFQ ledger (one record per (bulk order, shop) pairing). All lifecycle state lives in these
//! ledgers; nothing is shared in memory across requests.
//!
//! ## Traits
//! * [`MarketplaceDatabase`] defines the mutation surface of the negotiation lifecycle: bulk-order
//!   creation, RFQ fan-out, offer submission and maintenance, exclusive-winner acceptance,
//!   fulfillment progression, and the cascade delete.
//! * [`MarketQuery`] defines the read views: seller- and buyer-facing projections of the two
//!   ledgers, including the enriched single-offer detail.
mod data_objects;
mod errors;
mod market_query;
mod marketplace_database;

pub use data_objects::{AcceptedOffer, CreatedRfq};
pub use errors::{MarketQueryError, MarketplaceError};
pub use market_query::MarketQuery;
pub use marketplace_database::MarketplaceDatabase;
