use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use bulk_market_engine::{MarketQueryError, MarketplaceError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            // State-machine violations are reported as plain bad requests, matching what the
            // storefront clients already handle.
            Self::Conflict(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "success": false, "message": self.to_string() }).to_string())
    }
}

impl From<MarketplaceError> for ServerError {
    fn from(e: MarketplaceError) -> Self {
        match &e {
            MarketplaceError::DatabaseError(_) => Self::BackendError(e.to_string()),
            MarketplaceError::MissingRequester | MarketplaceError::InvalidStatus(_) => {
                Self::ValidationError(e.to_string())
            },
            MarketplaceError::BulkOrderNotFound(_) |
            MarketplaceError::RfqNotFound(_) |
            MarketplaceError::ShopNotFound(_) |
            MarketplaceError::BuyerNotFound(_) => Self::NotFound(e.to_string()),
            MarketplaceError::OfferAlreadySubmitted(_) |
            MarketplaceError::OfferAlreadyAccepted(_) |
            MarketplaceError::OfferLocked(_) |
            MarketplaceError::BulkOrderLocked(_) => Self::Conflict(e.to_string()),
        }
    }
}

impl From<MarketQueryError> for ServerError {
    fn from(e: MarketQueryError) -> Self {
        Self::BackendError(e.to_string())
    }
}

#[cfg(test)]
mod test {
    use actix_web::{error::ResponseError, http::StatusCode};
    use bulk_market_engine::MarketplaceError;

    use super::ServerError;

    #[test]
    fn engine_errors_map_onto_the_taxonomy() {
        let cases = [
            (MarketplaceError::MissingRequester, StatusCode::BAD_REQUEST),
            (MarketplaceError::InvalidStatus("Cancelled".into()), StatusCode::BAD_REQUEST),
            (MarketplaceError::RfqNotFound(1), StatusCode::NOT_FOUND),
            (MarketplaceError::BulkOrderNotFound(1), StatusCode::NOT_FOUND),
            (MarketplaceError::OfferAlreadySubmitted(1), StatusCode::BAD_REQUEST),
            (MarketplaceError::OfferAlreadyAccepted(1), StatusCode::BAD_REQUEST),
            (MarketplaceError::OfferLocked(1), StatusCode::BAD_REQUEST),
            (MarketplaceError::BulkOrderLocked(1), StatusCode::BAD_REQUEST),
            (MarketplaceError::DatabaseError("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (engine_error, expected) in cases {
            let server_error = ServerError::from(engine_error);
            assert_eq!(server_error.status_code(), expected);
        }
    }

    #[test]
    fn failure_bodies_carry_the_envelope() {
        let err = ServerError::from(MarketplaceError::RfqNotFound(7));
        let body = err.error_response().into_body();
        let bytes = futures::executor::block_on(actix_web::body::to_bytes(body)).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(v["success"], false);
        assert!(v["message"].as_str().unwrap().contains("RFQ 7"));
    }
}
