//! Wires the engine's lifecycle events to the mail transport.
//!
//! Every hook follows the same discipline: missing address is a logged skip, a transport failure
//! is logged and swallowed. Nothing here can fail a lifecycle transition; by the time a hook
//! runs, the transition has already committed.
use bulk_market_engine::events::EventHooks;
use log::*;

use crate::{mailer::MailTransport, templates};

pub fn configure_hooks(mailer: MailTransport) -> EventHooks {
    let mut hooks = EventHooks::default();

    let transport = mailer.clone();
    hooks.on_rfq_created(move |event| {
        let mailer = transport.clone();
        Box::pin(async move {
            let Some(email) = event.shop.email.clone() else {
                warn!("📧️ No email defined for shop '{}'. Skipping RFQ notification.", event.shop.name);
                return;
            };
            let mail = templates::new_bulk_order_mail(&email, &event);
            match mailer.send(mail).await {
                Ok(()) => info!("📧️ New-bulk-order mail sent to {email}"),
                Err(e) => error!("📧️ Error sending new-bulk-order mail to {email}: {e}"),
            }
        })
    });

    let transport = mailer.clone();
    hooks.on_offer_submitted(move |event| {
        let mailer = transport.clone();
        Box::pin(async move {
            let Some(email) = event.buyer.email.clone() else {
                warn!("📧️ No email defined for buyer '{}'. Skipping offer notification.", event.buyer.name);
                return;
            };
            let mail = templates::new_offer_mail(&email, &event);
            match mailer.send(mail).await {
                Ok(()) => info!("📧️ New-offer mail sent to {email}"),
                Err(e) => error!("📧️ Error sending new-offer mail to {email}: {e}"),
            }
        })
    });

    let transport = mailer;
    hooks.on_offer_accepted(move |event| {
        let mailer = transport.clone();
        Box::pin(async move {
            let Some(email) = event.shop.email.clone() else {
                warn!("📧️ No email defined for shop '{}'. Skipping acceptance notification.", event.shop.name);
                return;
            };
            let mail = templates::offer_accepted_mail(&email, &event);
            match mailer.send(mail).await {
                Ok(()) => info!("📧️ Offer-accepted mail sent to {email}"),
                Err(e) => error!("📧️ Error sending offer-accepted mail to {email}: {e}"),
            }
        })
    });

    hooks
}
