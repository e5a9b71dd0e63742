//! Built-in demonstrations

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tickwork::adapters::MainLoop;
use tickwork::domain::clock::ManualSource;
use tickwork::{segmented, EventType, Scheduler, Step, Yield};
use tracing::info;

/// A routine spawning one child every 10 units, a hundred times
pub fn spawn() {
    let finished = Rc::new(Cell::new(0u32));
    let mut scheduler = Scheduler::new();

    let counter = Rc::clone(&finished);
    scheduler.run_routine(
        segmented(0u32, move |_, spawned, ctx| {
            if *spawned == 100 {
                return Yield::Finish;
            }
            let counter = Rc::clone(&counter);
            let child = *spawned;
            ctx.run(
                move |ctx| {
                    counter.set(counter.get() + 1);
                    tracing::debug!(child, now = ctx.now(), "child finished");
                    Step::Done
                },
                50,
            );
            *spawned += 1;
            Yield::to(0, 10)
        }),
        10,
    );

    let mut ticks = 0u32;
    while scheduler.process_events(5) {
        ticks += 1;
        if ticks % 20 == 0 {
            info!(now = scheduler.now(), pending = scheduler.proc_count(), finished = finished.get(), "progress");
        }
    }
    println!("{} children finished at t={}", finished.get(), scheduler.now());
}

/// Two segmented routines interleaving with a plain one
pub fn segments() {
    let history = Rc::new(RefCell::new(String::new()));
    let mut scheduler = Scheduler::new();

    let out = Rc::clone(&history);
    scheduler.run_routine(
        segmented((), move |segment, _, ctx| {
            out.borrow_mut().push_str(&format!("[t={} C{}]", ctx.now(), segment));
            match segment {
                0 => Yield::to(1, 10),
                _ => Yield::Finish,
            }
        }),
        30,
    );
    let out = Rc::clone(&history);
    scheduler.run(
        move |ctx| {
            out.borrow_mut().push_str(&format!("[t={} D]", ctx.now()));
            Step::Done
        },
        35,
    );

    for _ in 0..12 {
        scheduler.process_events(5);
    }
    println!("{}", history.borrow());
}

/// Timed events delivered through a fixed-step main loop
pub fn events() {
    const ANNOUNCE: EventType = EventType(1);

    let wall = ManualSource::new();
    let mut main_loop = match MainLoop::new(wall.clone(), 16) {
        Ok(main_loop) => main_loop,
        Err(err) => {
            tracing::error!(%err, "could not build main loop");
            return;
        }
    };

    let sim = main_loop.simulator_mut();
    let _subscription = sim.subscribe(ANNOUNCE, |text: &String| println!("event: {text}"));
    for (i, delay) in [40, 5, 100, 16].into_iter().enumerate() {
        sim.emit(ANNOUNCE, format!("#{i} emitted for t={delay}"), delay);
    }

    for frame in [10, 20, 33, 17, 50] {
        wall.advance(frame);
        let report = main_loop.frame();
        info!(
            frame,
            updates = report.updates,
            remainder_ms = report.remainder.ms,
            pending = report.pending,
            "frame"
        );
    }
}
