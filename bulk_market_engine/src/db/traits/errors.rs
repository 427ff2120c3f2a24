use thiserror::Error;

/// Errors raised on the mutation paths of the negotiation lifecycle.
///
/// The variants fall into the four classes the server maps to HTTP responses: validation
/// (`MissingRequester`, `InvalidStatus`), not-found, state-machine conflicts
/// (`OfferAlreadySubmitted`, `OfferAlreadyAccepted`, `OfferLocked`, `BulkOrderLocked`) and
/// backend failure (`DatabaseError`).
#[derive(Debug, Clone, Error)]
pub enum MarketplaceError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("A buyer id is required to create a bulk order.")]
    MissingRequester,
    #[error("Invalid status value: {0}")]
    InvalidStatus(String),
    #[error("Bulk order {0} not found.")]
    BulkOrderNotFound(i64),
    #[error("RFQ {0} not found.")]
    RfqNotFound(i64),
    #[error("Shop {0} not found.")]
    ShopNotFound(i64),
    #[error("Buyer {0} not found.")]
    BuyerNotFound(i64),
    #[error("An offer has already been submitted for RFQ {0}.")]
    OfferAlreadySubmitted(i64),
    #[error("An offer for bulk order {0} has already been accepted.")]
    OfferAlreadyAccepted(i64),
    #[error("RFQ {0} has been accepted and can no longer be modified.")]
    OfferLocked(i64),
    #[error("Bulk order {0} has an accepted offer and cannot be deleted.")]
    BulkOrderLocked(i64),
}

impl From<sqlx::Error> for MarketplaceError {
    fn from(e: sqlx::Error) -> Self {
        Self::DatabaseError(e.to_string())
    }
}

impl MarketplaceError {
    /// True for the state-machine violations that are reported as conflicts rather than missing
    /// records or bad input.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::OfferAlreadySubmitted(_) |
                Self::OfferAlreadyAccepted(_) |
                Self::OfferLocked(_) |
                Self::BulkOrderLocked(_)
        )
    }
}

/// Errors raised on the read-view paths. Reads have no state-machine to violate, so the only
/// failure modes are backend trouble and malformed queries.
#[derive(Debug, Clone, Error)]
pub enum MarketQueryError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("User error constructing query: {0}")]
    QueryError(String),
}

impl From<sqlx::Error> for MarketQueryError {
    fn from(e: sqlx::Error) -> Self {
        Self::DatabaseError(e.to_string())
    }
}

impl From<MarketQueryError> for MarketplaceError {
    fn from(e: MarketQueryError) -> Self {
        match e {
            MarketQueryError::DatabaseError(s) => MarketplaceError::DatabaseError(s),
            MarketQueryError::QueryError(s) => MarketplaceError::DatabaseError(s),
        }
    }
}
