//! Main Loop Tests - Fixed Steps Driving Virtual Time

use std::cell::RefCell;
use std::rc::Rc;
use tickwork::adapters::MainLoop;
use tickwork::domain::clock::{GameClock, ManualSource};
use tickwork::domain::events::{EventSimulator, EventType};
use tickwork::domain::scheduler::Step;
use tickwork::domain::store::SortedStore;
use tickwork::{Scheduler, SchedulerBuilder};

const TICK: EventType = EventType(1);

#[test]
fn test_uneven_frames_give_even_steps() {
    let wall = ManualSource::new();
    let mut main_loop = MainLoop::new(wall.clone(), 10).unwrap();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    main_loop.simulator_mut().run(
        move |ctx| {
            sink.borrow_mut().push(ctx.now());
            Step::after(10)
        },
        10,
    );

    for frame in [7, 16, 3, 25, 9] {
        wall.advance(frame);
        main_loop.frame();
    }

    assert_eq!(*seen.borrow(), vec![10, 20, 30, 40, 50, 60]);
    assert_eq!(main_loop.simulator().now(), 60);
}

#[test]
fn test_same_wall_readings_replay_identically() {
    fn play(frames: &[i64]) -> Vec<String> {
        let wall = ManualSource::new();
        let scheduler = SchedulerBuilder::new()
            .trace_capacity(256)
            .build_with_store(SortedStore::new())
            .unwrap();
        let clock = GameClock::new(wall.clone(), 16).unwrap();
        let mut main_loop = MainLoop::with_parts(clock, EventSimulator::with_scheduler(scheduler));

        let sim = main_loop.simulator_mut();
        for i in 0..10u32 {
            sim.emit(TICK, i, i64::from(i) * 13);
        }

        for frame in frames {
            wall.advance(*frame);
            main_loop.frame();
        }
        main_loop
            .simulator()
            .scheduler()
            .trace()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    let frames = [5, 33, 17, 1, 60, 12, 40];
    assert_eq!(play(&frames), play(&frames));
    assert_eq!(play(&frames).len(), 10);
}

#[test]
fn test_stall_is_bounded_by_max_lag() {
    let wall = ManualSource::new();
    let clock = GameClock::new(wall.clone(), 10).unwrap().with_max_lag(50).unwrap();
    let mut main_loop = MainLoop::with_parts(clock, EventSimulator::with_scheduler(Scheduler::new()));
    main_loop.simulator_mut().run(|_| Step::after(1), 0);

    wall.advance(60_000);
    let report = main_loop.frame();
    assert_eq!(report.updates, 5);
    assert!(report.pending);
    assert_eq!(main_loop.simulator().now(), 50);
}
