use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{
    EventHandler,
    EventProducer,
    Handler,
    OfferAcceptedEvent,
    OfferSubmittedEvent,
    RfqCreatedEvent,
};

/// The producer ends of the event channels. Cloned into every [`crate::NegotiationApi`] instance;
/// an empty producer set means events are silently discarded.
#[derive(Default, Clone)]
pub struct EventProducers {
    pub rfq_created_producer: Vec<EventProducer<RfqCreatedEvent>>,
    pub offer_submitted_producer: Vec<EventProducer<OfferSubmittedEvent>>,
    pub offer_accepted_producer: Vec<EventProducer<OfferAcceptedEvent>>,
}

/// Owns the receiving ends. Build one from an [`EventHooks`], hand its [`EventHandlers::producers`]
/// to the APIs, then call [`EventHandlers::start_handlers`] to spawn the dispatch loops.
pub struct EventHandlers {
    pub on_rfq_created: Option<EventHandler<RfqCreatedEvent>>,
    pub on_offer_submitted: Option<EventHandler<OfferSubmittedEvent>>,
    pub on_offer_accepted: Option<EventHandler<OfferAcceptedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_rfq_created = hooks.on_rfq_created.map(|f| EventHandler::new(buffer_size, f));
        let on_offer_submitted = hooks.on_offer_submitted.map(|f| EventHandler::new(buffer_size, f));
        let on_offer_accepted = hooks.on_offer_accepted.map(|f| EventHandler::new(buffer_size, f));
        Self { on_rfq_created, on_offer_submitted, on_offer_accepted }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_rfq_created {
            result.rfq_created_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_offer_submitted {
            result.offer_submitted_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_offer_accepted {
            result.offer_accepted_producer.push(handler.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_rfq_created {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_offer_submitted {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_offer_accepted {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
    }
}

/// The set of hook functions a caller wants to attach. Each hook is an async closure receiving
/// the event by value.
#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_rfq_created: Option<Handler<RfqCreatedEvent>>,
    pub on_offer_submitted: Option<Handler<OfferSubmittedEvent>>,
    pub on_offer_accepted: Option<Handler<OfferAcceptedEvent>>,
}

impl EventHooks {
    pub fn on_rfq_created<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(RfqCreatedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_rfq_created = Some(Arc::new(f));
        self
    }

    pub fn on_offer_submitted<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(OfferSubmittedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_offer_submitted = Some(Arc::new(f));
        self
    }

    pub fn on_offer_accepted<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(OfferAcceptedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_offer_accepted = Some(Arc::new(f));
        self
    }
}
