//! Notification mail templates.
//!
//! Each template is a pure function from a lifecycle event to a rendered [`MailMessage`]. The
//! dispatcher owns all wording and markup; the negotiation engine never sees any of it.
use bmx_common::Money;
use bulk_market_engine::events::{OfferAcceptedEvent, OfferSubmittedEvent, RfqCreatedEvent};
use chrono::{DateTime, Utc};

use crate::mailer::MailMessage;

fn fmt_money(amount: Option<Money>) -> String {
    amount.map(|m| m.to_string()).unwrap_or_else(|| "-".to_string())
}

fn fmt_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_else(|| "-".to_string())
}

fn html_shell(title: &str, greeting: &str, intro: &str, rows: &[(&str, String)], outro: &str) -> String {
    let detail_rows = rows
        .iter()
        .map(|(label, value)| format!("      <tr><td><strong>{label}</strong></td><td>{value}</td></tr>"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="UTF-8"><title>{title}</title></head>
<body style="font-family: sans-serif; max-width: 600px; margin: 0 auto;">
  <h1>{title}</h1>
  <p>{greeting}</p>
  <p>{intro}</p>
  <table cellpadding="6">
{detail_rows}
  </table>
  <p>{outro}</p>
</body>
</html>"#
    )
}

/// "A new bulk order matches your catalog" — sent to each shop at fan-out.
pub fn new_bulk_order_mail(to: &str, event: &RfqCreatedEvent) -> MailMessage {
    let order = &event.bulk_order;
    let rows = [
        ("Product Name:", order.product_name.clone()),
        ("Quantity:", order.quantity.to_string()),
        ("Budget:", fmt_money(order.budget)),
        ("Delivery Deadline:", fmt_date(order.delivery_deadline)),
    ];
    let text = format!(
        "A new bulk order has been created for your product category. Please review the RFQ and \
         submit your offer.\nProduct Name: {}\nQuantity: {}\nBudget: {}\nDelivery Deadline: {}",
        order.product_name,
        order.quantity,
        fmt_money(order.budget),
        fmt_date(order.delivery_deadline),
    );
    let html = html_shell(
        "New Bulk Order Request",
        "Hello,",
        "A new bulk order has been created for your product category. Review the details below and \
         submit your offer if you're interested.",
        &rows,
        "Log in to your seller dashboard to view the complete RFQ and submit your offer.",
    );
    MailMessage {
        to: to.to_string(),
        subject: format!("New Bulk Order Request - {}", order.product_name),
        text,
        html,
    }
}

/// "A seller quoted your order" — sent to the buyer on offer submission.
pub fn new_offer_mail(to: &str, event: &OfferSubmittedEvent) -> MailMessage {
    let order = &event.bulk_order;
    let rfq = &event.rfq;
    let rows = [
        ("Product Name:", order.product_name.clone()),
        ("Offered Price:", fmt_money(rfq.price)),
        ("Delivery Time:", rfq.delivery_time.clone().unwrap_or_else(|| "-".to_string())),
        ("Terms:", rfq.terms.clone().unwrap_or_else(|| "-".to_string())),
    ];
    let text = format!(
        "Dear {},\n\nAn offer has been submitted for your bulk order:\n- Product Name: {}\n- Offered \
         Price: {}\n- Delivery Time: {}\n- Terms: {}\n\nPlease review the offer in your dashboard and \
         take the necessary actions.",
        event.buyer.name,
        order.product_name,
        fmt_money(rfq.price),
        rfq.delivery_time.as_deref().unwrap_or("-"),
        rfq.terms.as_deref().unwrap_or("-"),
    );
    let html = html_shell(
        "New Offer Received",
        &format!("Hello {},", event.buyer.name),
        "An offer has been submitted for your bulk order. Here are the details:",
        &rows,
        "Review the complete offer in your dashboard and accept it if it meets your requirements.",
    );
    MailMessage {
        to: to.to_string(),
        subject: format!("New Offer for Your Bulk Order - {}", order.product_name),
        text,
        html,
    }
}

/// "Your offer won" — sent to the shop whose offer was accepted and paid for.
pub fn offer_accepted_mail(to: &str, event: &OfferAcceptedEvent) -> MailMessage {
    let order = &event.bulk_order;
    let rfq = &event.rfq;
    let rows = [
        ("Product Name:", order.product_name.clone()),
        ("Accepted Price:", fmt_money(rfq.price)),
        ("Quantity:", order.quantity.to_string()),
        ("Delivery Deadline:", fmt_date(order.delivery_deadline)),
    ];
    let text = format!(
        "Dear {},\n\nCongratulations! Your offer for the bulk order has been accepted:\n- Product \
         Name: {}\n- Accepted Price: {}\n- Quantity: {}\n- Delivery Deadline: {}\n\nPlease proceed \
         with the necessary actions to fulfill this order.",
        event.shop.name,
        order.product_name,
        fmt_money(rfq.price),
        order.quantity,
        fmt_date(order.delivery_deadline),
    );
    let html = html_shell(
        "Offer Accepted!",
        &format!("Dear {},", event.shop.name),
        "Congratulations! Your offer has been accepted and payment has been confirmed. It's time to \
         begin order fulfillment.",
        &rows,
        "Update the order status as you progress, and ensure timely delivery according to the agreed terms.",
    );
    MailMessage {
        to: to.to_string(),
        subject: format!("Offer Accepted for Bulk Order - {}", order.product_name),
        text,
        html,
    }
}

#[cfg(test)]
mod test {
    use bmx_common::Money;
    use bulk_market_engine::{
        db_types::{BulkOrder, BulkOrderStatus, Buyer, Rfq, RfqStatus, Shop},
        events::{OfferAcceptedEvent, OfferSubmittedEvent, RfqCreatedEvent},
    };
    use chrono::{TimeZone, Utc};

    use super::{new_bulk_order_mail, new_offer_mail, offer_accepted_mail};

    fn order() -> BulkOrder {
        BulkOrder {
            id: 1,
            buyer_id: 7,
            product_name: "Tote bags".to_string(),
            description: None,
            quantity: 500,
            category: "textiles".to_string(),
            reference_image: None,
            budget: Some(Money::from_units(2_000)),
            delivery_deadline: Some(Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap()),
            shipping_address: None,
            packaging_requirements: None,
            supplier_location_preference: None,
            status: BulkOrderStatus::Pending,
            accepted_offer: None,
            payment_info: None,
            paid_at: None,
            delivered_at: None,
            created_at: Utc.with_ymd_and_hms(2024, 8, 1, 12, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 8, 1, 12, 0, 0).unwrap(),
        }
    }

    fn rfq(status: RfqStatus, price: Option<Money>) -> Rfq {
        Rfq {
            id: 3,
            bulk_order_id: 1,
            shop_id: 2,
            buyer_id: 7,
            price,
            price_per_unit: None,
            delivery_time: Some("3 weeks".to_string()),
            terms: Some("50% upfront".to_string()),
            warranty: None,
            available_quantity: None,
            expiration_date: None,
            packaging_details: None,
            status,
            created_at: Utc.with_ymd_and_hms(2024, 8, 1, 12, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 8, 1, 12, 0, 0).unwrap(),
        }
    }

    fn shop() -> Shop {
        Shop { id: 2, name: "Loom & Co".to_string(), email: Some("orders@loom.example".to_string()), phone: None }
    }

    fn buyer() -> Buyer {
        Buyer { id: 7, name: "Amara".to_string(), email: Some("amara@example.com".to_string()), phone: None }
    }

    #[test]
    fn fan_out_mail_carries_the_order_fields() {
        let event = RfqCreatedEvent::new(rfq(RfqStatus::Pending, None), shop(), order());
        let mail = new_bulk_order_mail("orders@loom.example", &event);
        assert_eq!(mail.to, "orders@loom.example");
        assert_eq!(mail.subject, "New Bulk Order Request - Tote bags");
        for needle in ["Tote bags", "500", "2000.00", "2024-09-01"] {
            assert!(mail.text.contains(needle), "text missing {needle}");
            assert!(mail.html.contains(needle), "html missing {needle}");
        }
    }

    #[test]
    fn offer_mail_addresses_the_buyer_by_name() {
        let event = OfferSubmittedEvent::new(
            rfq(RfqStatus::OfferSubmitted, Some(Money::from_units(1_800))),
            order(),
            buyer(),
        );
        let mail = new_offer_mail("amara@example.com", &event);
        assert!(mail.text.contains("Dear Amara"));
        assert!(mail.text.contains("1800.00"));
        assert!(mail.html.contains("3 weeks"));
        assert!(mail.html.contains("50% upfront"));
    }

    #[test]
    fn acceptance_mail_congratulates_the_shop() {
        let event =
            OfferAcceptedEvent::new(rfq(RfqStatus::Accepted, Some(Money::from_units(1_800))), order(), shop());
        let mail = offer_accepted_mail("orders@loom.example", &event);
        assert!(mail.subject.contains("Offer Accepted"));
        assert!(mail.text.contains("Loom & Co"));
        assert!(mail.text.contains("1800.00"));
    }
}
