//! Reentrancy Tests - Routines Mutating the Scheduler Mid-drain
//!
//! Bodies register and cancel routines through their `Context`. These
//! tests pin down when those effects become visible.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tickwork::domain::scheduler::{Context, Outcome, RoutineId, Scheduler, SchedulerBuilder, Step};
use tickwork::domain::store::{HeapStore, SortedStore, WakeStore};
use tickwork::{segmented, Yield};

type Slot = Rc<Cell<Option<RoutineId>>>;

fn spawn_children_from_a_routine<S: WakeStore>(store: S) {
    let history = Rc::new(Cell::new(0u32));
    let mut scheduler = Scheduler::with_store(store);

    let children = Rc::clone(&history);
    scheduler.run_routine(
        segmented(0u32, move |_segment, spawned, ctx| {
            if *spawned == 100 {
                return Yield::Finish;
            }
            let history = Rc::clone(&children);
            ctx.run(
                move |_| {
                    history.set(history.get() + 1);
                    Step::Done
                },
                50,
            );
            *spawned += 1;
            Yield::to(0, 10)
        }),
        10,
    );

    assert_eq!(history.get(), 0);
    assert_eq!(scheduler.proc_count(), 1);

    scheduler.process_events(5);
    assert_eq!(scheduler.proc_count(), 1);

    // The main routine runs and queues its first child.
    scheduler.process_events(5);
    assert_eq!(history.get(), 0);
    assert_eq!(scheduler.proc_count(), 2);

    // One invocation per call: the main routine does not catch up on the
    // four wake-times it slept through.
    scheduler.process_events(49);
    assert_eq!(history.get(), 0);
    assert_eq!(scheduler.proc_count(), 3);
    assert_eq!(scheduler.next_wake(), Some(60));

    scheduler.process_events(1);
    assert_eq!(history.get(), 1);
    assert_eq!(scheduler.proc_count(), 2);

    while scheduler.process_events(1000) {}

    assert_eq!(history.get(), 100);
    assert_eq!(scheduler.proc_count(), 0);
}

fn cancel_tied_routine_mid_drain<S: WakeStore>(store: S) {
    let ran = Rc::new(RefCell::new(Vec::new()));
    let target: Slot = Rc::default();
    let mut scheduler = Scheduler::with_store(store);

    let (log, victim) = (Rc::clone(&ran), Rc::clone(&target));
    scheduler.run(
        move |ctx| {
            log.borrow_mut().push("killer");
            let id = victim.get().unwrap();
            assert!(ctx.cancel(id));
            assert!(!ctx.cancel(id));
            Step::Done
        },
        5,
    );
    let log = Rc::clone(&ran);
    let id = scheduler.run(
        move |_| {
            log.borrow_mut().push("victim");
            Step::Done
        },
        5,
    );
    target.set(Some(id));

    assert!(!scheduler.process_events(5));
    assert_eq!(*ran.borrow(), vec!["killer"]);
    assert!(!scheduler.cancel(id));
}

fn cancel_future_routine_mid_drain<S: WakeStore>(store: S) {
    let target: Slot = Rc::default();
    let mut scheduler = Scheduler::with_store(store);

    let victim = Rc::clone(&target);
    scheduler.run(
        move |ctx| {
            ctx.cancel(victim.get().unwrap());
            Step::Done
        },
        0,
    );
    let id = scheduler.run(|_| panic!("canceled routine invoked"), 100);
    target.set(Some(id));

    assert_eq!(scheduler.proc_count(), 2);
    assert!(!scheduler.process_events(0));
    assert_eq!(scheduler.proc_count(), 0);
    assert!(scheduler.store().is_empty());
    scheduler.process_events(1000);
}

fn cancel_routine_spawned_in_same_drain<S: WakeStore>(store: S) {
    let mut scheduler = Scheduler::with_store(store);
    scheduler.run(
        |ctx| {
            let child = ctx.run(|_| panic!("canceled child invoked"), 0);
            assert!(ctx.cancel(child));
            assert!(!ctx.cancel(child));
            Step::Done
        },
        0,
    );

    assert!(!scheduler.process_events(0));
    scheduler.process_events(0);
}

fn cancel_rescheduled_routine_mid_drain<S: WakeStore>(store: S) {
    let calls = Rc::new(Cell::new(0u32));
    let target: Slot = Rc::default();
    let mut scheduler = Scheduler::with_store(store);

    let counter = Rc::clone(&calls);
    let id = scheduler.run(
        move |_| {
            counter.set(counter.get() + 1);
            Step::Sleep(0)
        },
        0,
    );
    target.set(Some(id));

    let victim = Rc::clone(&target);
    scheduler.run(
        move |ctx| {
            assert_eq!(ctx.proc_count(), 2);
            assert!(ctx.cancel(victim.get().unwrap()));
            assert_eq!(ctx.proc_count(), 1);
            Step::Done
        },
        0,
    );

    assert!(!scheduler.process_events(0));
    assert_eq!(calls.get(), 1);
    scheduler.process_events(10);
    assert_eq!(calls.get(), 1);
}

fn self_cancel_destroys_slot<S: WakeStore>(store: S) {
    let calls = Rc::new(Cell::new(0u32));
    let mut scheduler = SchedulerBuilder::new()
        .trace_capacity(8)
        .build_with_store(store)
        .unwrap();

    let counter = Rc::clone(&calls);
    let id = scheduler.run(
        move |ctx| {
            counter.set(counter.get() + 1);
            let me = ctx.id();
            assert!(ctx.cancel(me));
            assert_eq!(ctx.proc_count(), 0);
            Step::after(1)
        },
        0,
    );

    assert!(!scheduler.process_events(0));
    scheduler.process_events(5);
    assert_eq!(calls.get(), 1);

    let last = scheduler.trace().iter().last().copied().unwrap();
    assert_eq!(last.id, id);
    assert_eq!(last.outcome, Outcome::Canceled);
}

fn cancel_completed_routine_mid_drain<S: WakeStore>(store: S) {
    let first: Slot = Rc::default();
    let mut scheduler = Scheduler::with_store(store);

    let id = scheduler.run(|_| Step::Done, 0);
    first.set(Some(id));
    let done = Rc::clone(&first);
    scheduler.run(
        move |ctx: &mut Context<'_>| {
            assert!(!ctx.cancel(done.get().unwrap()));
            Step::Done
        },
        0,
    );

    assert!(!scheduler.process_events(0));
}

fn spawned_ties_run_after_existing<S: WakeStore>(store: S) {
    let order = Rc::new(RefCell::new(Vec::new()));
    let mut scheduler = Scheduler::with_store(store);

    let log = Rc::clone(&order);
    scheduler.run(
        move |ctx| {
            let child_log = Rc::clone(&log);
            ctx.run(
                move |_| {
                    child_log.borrow_mut().push("child");
                    Step::Done
                },
                10,
            );
            Step::Done
        },
        0,
    );
    let log = Rc::clone(&order);
    scheduler.run(
        move |_| {
            log.borrow_mut().push("elder");
            Step::Done
        },
        10,
    );

    scheduler.process_events(0);
    scheduler.process_events(10);
    assert_eq!(*order.borrow(), vec!["elder", "child"]);
}

macro_rules! backend_tests {
    ($module:ident, $store:expr) => {
        mod $module {
            use super::*;

            #[test]
            fn test_spawn_children_from_a_routine() {
                spawn_children_from_a_routine($store);
            }

            #[test]
            fn test_cancel_tied_routine_mid_drain() {
                cancel_tied_routine_mid_drain($store);
            }

            #[test]
            fn test_cancel_future_routine_mid_drain() {
                cancel_future_routine_mid_drain($store);
            }

            #[test]
            fn test_cancel_routine_spawned_in_same_drain() {
                cancel_routine_spawned_in_same_drain($store);
            }

            #[test]
            fn test_cancel_rescheduled_routine_mid_drain() {
                cancel_rescheduled_routine_mid_drain($store);
            }

            #[test]
            fn test_self_cancel_destroys_slot() {
                self_cancel_destroys_slot($store);
            }

            #[test]
            fn test_cancel_completed_routine_mid_drain() {
                cancel_completed_routine_mid_drain($store);
            }

            #[test]
            fn test_spawned_ties_run_after_existing() {
                spawned_ties_run_after_existing($store);
            }
        }
    };
}

backend_tests!(heap_store, HeapStore::new());
backend_tests!(sorted_store, SortedStore::new());
