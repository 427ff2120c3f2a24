//! Simple stateless pub-sub event handler
//!
//! This module provides a small hook system that lets components of the marketplace subscribe to
//! negotiation lifecycle events and react to them, the mail dispatcher being the primary
//! subscriber. The handlers are stateless: all they receive is the event itself, and they run on
//! detached tasks, so a slow or failing subscriber can never hold up, or roll back, the lifecycle
//! transition that produced the event.
mod channel;
mod event_types;
mod hooks;

pub use channel::{EventHandler, EventProducer, Handler};
pub use event_types::{OfferAcceptedEvent, OfferSubmittedEvent, RfqCreatedEvent};
pub use hooks::{EventHandlers, EventHooks, EventProducers};
