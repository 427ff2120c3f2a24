use std::{fmt::Display, str::FromStr};

use bmx_common::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Invalid status: {0}")]
pub struct StatusConversionError(pub String);

//--------------------------------------  BulkOrderStatus  -----------------------------------------------------------
/// The aggregate status of a bulk order. The fulfillment progression is
/// `Pending → Processing → Shipping → Delivered`; `Processing` is only ever entered via payment
/// confirmation on an accepted offer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum BulkOrderStatus {
    /// The order has been created and is collecting offers.
    #[default]
    Pending,
    /// An offer was accepted and payment confirmed; the seller is fulfilling the order.
    Processing,
    /// The order has been handed to the carrier.
    Shipping,
    /// The order has arrived. There is no transition out of this status.
    Delivered,
}

impl Display for BulkOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BulkOrderStatus::Pending => write!(f, "Pending"),
            BulkOrderStatus::Processing => write!(f, "Processing"),
            BulkOrderStatus::Shipping => write!(f, "Shipping"),
            BulkOrderStatus::Delivered => write!(f, "Delivered"),
        }
    }
}

impl FromStr for BulkOrderStatus {
    type Err = StatusConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Processing" => Ok(Self::Processing),
            "Shipping" => Ok(Self::Shipping),
            "Delivered" => Ok(Self::Delivered),
            s => Err(StatusConversionError(s.to_string())),
        }
    }
}

impl BulkOrderStatus {
    /// The statuses a seller may set via the fulfillment progression endpoint. `Pending` is
    /// excluded; an order only leaves `Pending` through payment confirmation.
    pub fn is_fulfillment_status(&self) -> bool {
        matches!(self, Self::Processing | Self::Shipping | Self::Delivered)
    }
}

//--------------------------------------     RfqStatus     -----------------------------------------------------------
/// The status of a single RFQ slot. Created as `Pending` at fan-out; moves to `Offer Submitted`
/// when the seller responds; the acceptance operation moves exactly one sibling to `Accepted` and
/// all others to `Declined`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum RfqStatus {
    #[default]
    Pending,
    #[sqlx(rename = "Offer Submitted")]
    #[serde(rename = "Offer Submitted")]
    OfferSubmitted,
    Accepted,
    Declined,
}

impl Display for RfqStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RfqStatus::Pending => write!(f, "Pending"),
            RfqStatus::OfferSubmitted => write!(f, "Offer Submitted"),
            RfqStatus::Accepted => write!(f, "Accepted"),
            RfqStatus::Declined => write!(f, "Declined"),
        }
    }
}

impl FromStr for RfqStatus {
    type Err = StatusConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Offer Submitted" => Ok(Self::OfferSubmitted),
            "Accepted" => Ok(Self::Accepted),
            "Declined" => Ok(Self::Declined),
            s => Err(StatusConversionError(s.to_string())),
        }
    }
}

//--------------------------------------      BulkOrder    -----------------------------------------------------------
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct BulkOrder {
    pub id: i64,
    /// The buyer that placed the request.
    pub buyer_id: i64,
    pub product_name: String,
    pub description: Option<String>,
    pub quantity: i64,
    /// Category used for seller matching at fan-out. Exact-match semantics.
    pub category: String,
    /// Stored path of the optional reference image. Upload storage itself is handled upstream.
    pub reference_image: Option<String>,
    pub budget: Option<Money>,
    pub delivery_deadline: Option<DateTime<Utc>>,
    pub shipping_address: Option<String>,
    pub packaging_requirements: Option<String>,
    pub supplier_location_preference: Option<String>,
    pub status: BulkOrderStatus,
    /// Points at the single winning RFQ once an offer has been accepted.
    pub accepted_offer: Option<i64>,
    /// Opaque payment reference recorded at acceptance time.
    pub payment_info: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------    NewBulkOrder   -----------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBulkOrder {
    /// Defaults to zero when absent from a payload, which the engine rejects as a missing
    /// requester rather than a deserialization failure.
    #[serde(default)]
    pub buyer_id: i64,
    pub product_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub quantity: i64,
    pub category: String,
    #[serde(default)]
    pub reference_image: Option<String>,
    #[serde(default)]
    pub budget: Option<Money>,
    #[serde(default)]
    pub delivery_deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub shipping_address: Option<String>,
    #[serde(default)]
    pub packaging_requirements: Option<String>,
    #[serde(default)]
    pub supplier_location_preference: Option<String>,
}

impl NewBulkOrder {
    pub fn new<S1: Into<String>, S2: Into<String>>(
        buyer_id: i64,
        product_name: S1,
        quantity: i64,
        category: S2,
    ) -> Self {
        Self {
            buyer_id,
            product_name: product_name.into(),
            description: None,
            quantity,
            category: category.into(),
            reference_image: None,
            budget: None,
            delivery_deadline: None,
            shipping_address: None,
            packaging_requirements: None,
            supplier_location_preference: None,
        }
    }

    pub fn with_budget(mut self, budget: Money) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.delivery_deadline = Some(deadline);
        self
    }
}

//--------------------------------------        Rfq        -----------------------------------------------------------
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Rfq {
    pub id: i64,
    pub bulk_order_id: i64,
    /// The seller this slot was fanned out to. Exactly one RFQ exists per (bulk order, shop).
    pub shop_id: i64,
    /// Copy of the requesting buyer's id, taken at fan-out time. It is not kept in sync with
    /// later changes to the bulk order.
    pub buyer_id: i64,
    pub price: Option<Money>,
    pub price_per_unit: Option<Money>,
    pub delivery_time: Option<String>,
    pub terms: Option<String>,
    pub warranty: Option<String>,
    pub available_quantity: Option<i64>,
    pub expiration_date: Option<DateTime<Utc>>,
    pub packaging_details: Option<String>,
    pub status: RfqStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Rfq {
    /// An RFQ carries an offer once the seller has quoted a price.
    pub fn has_offer(&self) -> bool {
        self.price.is_some()
    }
}

//--------------------------------------     OfferTerms    -----------------------------------------------------------
/// The offer fields a seller writes into an RFQ slot, both on first submission and on subsequent
/// edits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OfferTerms {
    pub price: Money,
    #[serde(default)]
    pub price_per_unit: Option<Money>,
    #[serde(default)]
    pub delivery_time: Option<String>,
    #[serde(default)]
    pub terms: Option<String>,
    #[serde(default)]
    pub warranty: Option<String>,
    #[serde(default)]
    pub available_quantity: Option<i64>,
    #[serde(default)]
    pub expiration_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub packaging_details: Option<String>,
}

impl OfferTerms {
    pub fn new(price: Money) -> Self {
        Self { price, ..Default::default() }
    }
}

//--------------------------------------       Shop        -----------------------------------------------------------
/// Contact projection of a seller storefront. Account management lives outside the engine.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Shop {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

//--------------------------------------       Buyer       -----------------------------------------------------------
/// Contact projection of a buyer account.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Buyer {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

//--------------------------------------      Product      -----------------------------------------------------------
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub shop_id: i64,
    pub name: String,
    pub category: String,
    pub rating: Option<f64>,
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use super::{BulkOrderStatus, RfqStatus};

    #[test]
    fn bulk_order_status_round_trips_through_strings() {
        for status in
            [BulkOrderStatus::Pending, BulkOrderStatus::Processing, BulkOrderStatus::Shipping, BulkOrderStatus::Delivered]
        {
            let s = status.to_string();
            assert_eq!(BulkOrderStatus::from_str(&s).unwrap(), status);
        }
        assert!(BulkOrderStatus::from_str("Cancelled").is_err());
    }

    #[test]
    fn rfq_status_uses_the_wire_spelling() {
        assert_eq!(RfqStatus::OfferSubmitted.to_string(), "Offer Submitted");
        assert_eq!(RfqStatus::from_str("Offer Submitted").unwrap(), RfqStatus::OfferSubmitted);
        assert!(RfqStatus::from_str("Submitted").is_err());
    }

    #[test]
    fn only_post_acceptance_statuses_are_fulfillment_statuses() {
        assert!(!BulkOrderStatus::Pending.is_fulfillment_status());
        assert!(BulkOrderStatus::Processing.is_fulfillment_status());
        assert!(BulkOrderStatus::Shipping.is_fulfillment_status());
        assert!(BulkOrderStatus::Delivered.is_fulfillment_status());
    }
}
