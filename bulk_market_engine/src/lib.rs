//! Bulk Market Engine
//!
//! The Bulk Market Engine is the backend for a bulk-order marketplace: buyers broadcast aggregate
//! purchase requests, matching sellers each receive a request-for-quotation (RFQ) slot, sellers
//! submit offers, and the buyer accepts exactly one offer, after which the order moves through
//! fulfillment. This library contains the core logic for that negotiation lifecycle. It is
//! transport-agnostic.
//!
//! The library is divided into two main sections:
//! 1. Database management and control ([`mod@db`]). SQLite is the supported backend. You should
//!    never need to access the database directly. Instead, use the public API provided by the
//!    engine. The exception is the data types used in the database. These are defined in the
//!    `db_types` module and are public.
//! 2. The engine public API ([`mod@bme_api`]). This provides the public-facing functionality of
//!    the negotiation engine: bulk-order creation and RFQ fan-out, offer submission and
//!    maintenance, acceptance with exclusive-winner selection, fulfillment progression, and the
//!    read views the storefront renders. Specific backends need to implement the traits in the
//!    [`mod@db`] module in order to act as a backend for the Bulk Market Server.
//!
//! The engine also provides a set of events that can be subscribed to. These events are emitted
//! when certain lifecycle transitions occur, for example when a seller submits an offer, an
//! `OfferSubmittedEvent` is emitted. A simple hook framework lets callers react to these events
//! (the server uses it to send notification mail) without ever blocking the transition itself.
mod db;

pub use db::traits;

pub mod db_types;
pub mod events;
mod bme_api;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use db::sqlite::SqliteDatabase;
pub use db::traits::{MarketQuery, MarketQueryError, MarketplaceDatabase, MarketplaceError};
pub use bme_api::{market_objects, market_query_api::MarketQueryApi, negotiation_api::NegotiationApi};
