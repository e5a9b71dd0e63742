//! Event Dispatcher - Typed Publish/Subscribe Keyed by Integer Codes
//!
//! # Ownership Model
//!
//! ```text
//!   caller                           EventDispatcher
//!   Subscription ──Rc<Handler>──┐    EventType ─> [Entry, Entry, ..]
//!                               └────────────────── Weak<Handler>
//! ```
//!
//! The dispatcher never keeps a handler alive. Dropping the [`Subscription`]
//! guard turns its entry stale; stale entries are skipped by `send` and
//! removed by [`EventDispatcher::prune`].

use std::any::{type_name, Any, TypeId};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

type Handler = dyn Fn(&dyn Any);

/// Integral event code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventType(pub u32);

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Event({})", self.0)
    }
}

/// Subscription identifier, unique within one dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Get the raw numeric ID
    #[inline(always)]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

/// Keeps a subscription alive; dropping it unsubscribes
#[must_use = "dropping a Subscription unsubscribes the handler immediately"]
pub struct Subscription {
    id: SubscriptionId,
    event: EventType,
    _handler: Rc<Handler>,
}

impl Subscription {
    /// Subscription identity
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Event the handler listens to
    pub fn event(&self) -> EventType {
        self.event
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("event", &self.event)
            .finish_non_exhaustive()
    }
}

struct Entry {
    id: SubscriptionId,
    payload: TypeId,
    payload_name: &'static str,
    handler: Weak<Handler>,
}

impl Entry {
    fn is_live(&self) -> bool {
        self.handler.strong_count() > 0
    }
}

/// Routes event payloads to subscribers by [`EventType`]
///
/// # Example
///
/// ```rust
/// use tickwork::domain::events::{EventDispatcher, EventType};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// const SCORE: EventType = EventType(7);
///
/// let total = Rc::new(Cell::new(0));
/// let mut dispatcher = EventDispatcher::new();
///
/// let sink = Rc::clone(&total);
/// let subscription = dispatcher.subscribe(SCORE, move |points: &u32| sink.set(sink.get() + points));
///
/// dispatcher.send(SCORE, &5u32);
/// drop(subscription);
/// dispatcher.send(SCORE, &5u32);
///
/// assert_eq!(total.get(), 5);
/// ```
#[derive(Default)]
pub struct EventDispatcher {
    entries: BTreeMap<EventType, Vec<Entry>>,
    next_id: u64,
}

impl EventDispatcher {
    /// Create an empty dispatcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a handler to payloads of type `T` sent as `event`
    pub fn subscribe<T, F>(&mut self, event: EventType, handler: F) -> Subscription
    where
        T: 'static,
        F: Fn(&T) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;

        let handler: Rc<Handler> = Rc::new(move |args: &dyn Any| {
            if let Some(args) = args.downcast_ref::<T>() {
                handler(args);
            }
        });
        self.entries.entry(event).or_default().push(Entry {
            id,
            payload: TypeId::of::<T>(),
            payload_name: type_name::<T>(),
            handler: Rc::downgrade(&handler),
        });
        tracing::debug!(%event, subscription = id.0, payload = type_name::<T>(), "subscribed");

        Subscription {
            id,
            event,
            _handler: handler,
        }
    }

    /// Deliver a payload to every live subscriber of `event`
    ///
    /// Returns the number of handlers called.
    pub fn send<T: 'static>(&self, event: EventType, args: &T) -> usize {
        let handlers = self.handlers_for::<T>(event);
        for handler in &handlers {
            handler(args as &dyn Any);
        }
        handlers.len()
    }

    /// Live handlers for `event` accepting a `T`, in subscription order
    ///
    /// Collecting first lets a shared dispatcher release its borrow before
    /// any handler runs.
    pub(crate) fn handlers_for<T: 'static>(&self, event: EventType) -> Vec<Rc<Handler>> {
        let Some(entries) = self.entries.get(&event) else {
            return Vec::new();
        };

        let mut handlers = Vec::with_capacity(entries.len());
        for entry in entries {
            let Some(handler) = entry.handler.upgrade() else {
                continue;
            };
            if entry.payload != TypeId::of::<T>() {
                tracing::warn!(
                    %event,
                    subscription = entry.id.0,
                    expected = entry.payload_name,
                    got = type_name::<T>(),
                    "event payload type mismatch; handler skipped"
                );
                continue;
            }
            handlers.push(handler);
        }
        handlers
    }

    /// Remove entries whose [`Subscription`] was dropped
    ///
    /// Returns the number of entries removed.
    pub fn prune(&mut self) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, entries| {
            let before = entries.len();
            entries.retain(Entry::is_live);
            removed += before - entries.len();
            !entries.is_empty()
        });
        if removed > 0 {
            tracing::trace!(removed, "pruned stale subscriptions");
        }
        removed
    }

    /// Number of live subscribers for `event`
    pub fn subscriber_count(&self, event: EventType) -> usize {
        self.entries
            .get(&event)
            .map_or(0, |entries| entries.iter().filter(|e| e.is_live()).count())
    }

    /// Number of stored entries, stale ones included
    pub fn entry_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("events", &self.entries.len())
            .field("entries", &self.entry_count())
            .finish()
    }
}
