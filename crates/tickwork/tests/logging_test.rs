//! Logging Tests - Structured Events Emitted by the Scheduler

use std::io;
use std::sync::{Arc, Mutex};
use tickwork::domain::scheduler::{Scheduler, Step};

/// Collects formatted log output in memory
#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn with_capture<F: FnOnce()>(f: F) -> String {
    let capture = Capture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    capture.contents()
}

#[test]
fn test_negative_interval_is_warned() {
    let output = with_capture(|| {
        let mut scheduler = Scheduler::new();
        scheduler.run(|_| Step::Done, -4);
        scheduler.process_events(0);
    });

    assert!(output.contains("WARN"));
    assert!(output.contains("negative interval normalized to zero"));
}

#[test]
fn test_lifecycle_is_logged() {
    let output = with_capture(|| {
        let mut scheduler = Scheduler::new();
        let id = scheduler.run(|_| Step::after(1), 0);
        scheduler.process_events(0);
        scheduler.cancel(id);
    });

    assert!(output.contains("routine registered"));
    assert!(output.contains("routine invoked"));
    assert!(output.contains("staging merged"));
    assert!(output.contains("routine canceled"));
}
