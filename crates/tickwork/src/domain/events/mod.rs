//! Events Module - Typed Events Delivered at Virtual Times
//!
//! ```text
//! domain/events/
//! ├── dispatcher.rs   EventType, EventDispatcher, Subscription
//! └── simulator.rs    EventSimulator (Scheduler + dispatcher), Emitter
//! ```

mod dispatcher;
mod simulator;

pub use dispatcher::{EventDispatcher, EventType, Subscription, SubscriptionId};
pub use simulator::{Emitter, EventSimulator};
