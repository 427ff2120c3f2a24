//! # Bulk Market Engine public API
//!
//! The `bme_api` module exposes the programmatic API for the negotiation engine. The API is
//! modular, so that clients can pick and choose the functionality they want, and the mutation and
//! read paths could even be served by different backends.
//!
//! * [`negotiation_api`] is the primary API for the bulk-order lifecycle: creation and RFQ
//!   fan-out, offer submission and maintenance, acceptance with exclusive-winner selection, and
//!   fulfillment progression.
//! * [`market_query_api`] provides the seller- and buyer-facing read views over the ledgers.
//!
//! # API usage
//!
//! The pattern for using both APIs is the same. An API instance is created by supplying a database
//! backend that implements the backend traits required by the API.
//!
//! ```rust,ignore
//! use bulk_market_engine::{MarketQueryApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url("sqlite://data/market.db", 25).await?;
//! // SqliteDatabase implements MarketQuery
//! let api = MarketQueryApi::new(db);
//! let orders = api.bulk_orders_for_buyer(42).await?;
//! ```

pub mod market_objects;
pub mod market_query_api;
pub mod negotiation_api;
