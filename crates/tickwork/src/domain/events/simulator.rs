//! Event Simulator - Timed Event Emission over the Scheduler
//!
//! ```text
//! EventSimulator<S>
//!   ├─ scheduler: Scheduler<S>
//!   └─ dispatcher: Rc<RefCell<EventDispatcher>>
//!
//! emit(event, args, delay)
//!   └─ run(|_| { dispatcher.send(event, &args); Done }, delay)
//! ```
//!
//! An emitted event is an ordinary routine, so it obeys the same ordering
//! as every other routine: earliest wake-time first, registration order on
//! ties.

use super::dispatcher::{EventDispatcher, EventType, Subscription};
use crate::domain::routine::Routine;
use crate::domain::scheduler::{Context, RoutineId, Scheduler, SleepTime, Step, VirtualTime};
use crate::domain::store::{HeapStore, WakeStore};
use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

/// Send through a shared dispatcher without holding its borrow while
/// handlers run, so a handler may subscribe or emit.
fn deliver<T: 'static>(dispatcher: &RefCell<EventDispatcher>, event: EventType, args: &T) -> usize {
    let handlers = dispatcher.borrow().handlers_for::<T>(event);
    for handler in &handlers {
        handler(args as &dyn Any);
    }
    tracing::trace!(%event, delivered = handlers.len(), "event delivered");
    handlers.len()
}

fn emit_body<T: 'static>(
    dispatcher: Rc<RefCell<EventDispatcher>>,
    event: EventType,
    args: T,
) -> impl FnMut(&mut Context<'_>) -> Step + 'static {
    move |_| {
        deliver(&dispatcher, event, &args);
        Step::Done
    }
}

/// Handle for emitting and subscribing from inside routine bodies
#[derive(Debug, Clone)]
pub struct Emitter {
    dispatcher: Rc<RefCell<EventDispatcher>>,
}

impl Emitter {
    /// Schedule `event` from a running body
    pub fn emit<T: 'static>(
        &self,
        ctx: &mut Context<'_>,
        event: EventType,
        args: T,
        delay: SleepTime,
    ) -> RoutineId {
        ctx.run(emit_body(Rc::clone(&self.dispatcher), event, args), delay)
    }

    /// Deliver `event` immediately, bypassing the scheduler
    pub fn send_now<T: 'static>(&self, event: EventType, args: &T) -> usize {
        deliver(&self.dispatcher, event, args)
    }

    /// Subscribe a handler
    pub fn subscribe<T, F>(&self, event: EventType, handler: F) -> Subscription
    where
        T: 'static,
        F: Fn(&T) + 'static,
    {
        self.dispatcher.borrow_mut().subscribe(event, handler)
    }
}

/// Scheduler plus event dispatcher
///
/// # Example
///
/// ```rust
/// use tickwork::domain::events::{EventSimulator, EventType};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// const SPAWN: EventType = EventType(1);
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let mut sim = EventSimulator::new();
///
/// let sink = Rc::clone(&seen);
/// let _sub = sim.subscribe(SPAWN, move |name: &&str| sink.borrow_mut().push(*name));
///
/// sim.emit(SPAWN, "goblin", 10);
/// sim.emit(SPAWN, "orc", 5);
///
/// while sim.process_events(5) {}
/// assert_eq!(*seen.borrow(), vec!["orc", "goblin"]);
/// ```
pub struct EventSimulator<S: WakeStore = HeapStore> {
    scheduler: Scheduler<S>,
    dispatcher: Rc<RefCell<EventDispatcher>>,
}

impl EventSimulator<HeapStore> {
    /// Create a simulator over a default scheduler
    pub fn new() -> Self {
        Self::with_scheduler(Scheduler::new())
    }
}

impl Default for EventSimulator<HeapStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: WakeStore> EventSimulator<S> {
    /// Create a simulator over an existing scheduler
    pub fn with_scheduler(scheduler: Scheduler<S>) -> Self {
        Self {
            scheduler,
            dispatcher: Rc::new(RefCell::new(EventDispatcher::new())),
        }
    }

    /// Schedule `event` with `args` to be delivered after `delay`
    pub fn emit<T: 'static>(&mut self, event: EventType, args: T, delay: SleepTime) -> RoutineId {
        let id = self
            .scheduler
            .run(emit_body(Rc::clone(&self.dispatcher), event, args), delay);
        tracing::debug!(%event, %id, "event emitted");
        id
    }

    /// Subscribe a handler to payloads of type `T`
    pub fn subscribe<T, F>(&mut self, event: EventType, handler: F) -> Subscription
    where
        T: 'static,
        F: Fn(&T) + 'static,
    {
        self.dispatcher.borrow_mut().subscribe(event, handler)
    }

    /// A cloneable handle for use inside routine bodies
    pub fn emitter(&self) -> Emitter {
        Emitter {
            dispatcher: Rc::clone(&self.dispatcher),
        }
    }

    /// Register a closure routine
    pub fn run<F>(&mut self, body: F, delay: SleepTime) -> RoutineId
    where
        F: FnMut(&mut Context<'_>) -> Step + 'static,
    {
        self.scheduler.run(body, delay)
    }

    /// Register any [`Routine`]
    pub fn run_routine<R>(&mut self, routine: R, delay: SleepTime) -> RoutineId
    where
        R: Routine + 'static,
    {
        self.scheduler.run_routine(routine, delay)
    }

    /// Cancel a routine or a pending emission
    pub fn cancel(&mut self, id: RoutineId) -> bool {
        self.scheduler.cancel(id)
    }

    /// Number of pending routines, emissions included
    pub fn proc_count(&self) -> usize {
        self.scheduler.proc_count()
    }

    /// Current virtual time
    pub fn now(&self) -> VirtualTime {
        self.scheduler.now()
    }

    /// Advance the clock, run due routines, then prune stale subscriptions
    pub fn process_events(&mut self, elapsed: SleepTime) -> bool {
        let pending = self.scheduler.process_events(elapsed);
        self.dispatcher.borrow_mut().prune();
        pending
    }

    /// The underlying scheduler
    pub fn scheduler(&self) -> &Scheduler<S> {
        &self.scheduler
    }

    /// Number of live subscribers for `event`
    pub fn subscriber_count(&self, event: EventType) -> usize {
        self.dispatcher.borrow().subscriber_count(event)
    }

    /// Number of stored subscription entries, stale ones included
    pub fn subscription_entries(&self) -> usize {
        self.dispatcher.borrow().entry_count()
    }
}
