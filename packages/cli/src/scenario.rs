//! Scenario files: a scheduler configuration, routines and a tick script
//!
//! ```toml
//! ticks = [16, 16]
//! drain_step = 100          # optional: keep ticking until idle
//!
//! [scheduler]
//! trace_capacity = 1024
//!
//! [[routine]]
//! name = "a"
//! delay = 30
//! segments = [10, 5]        # continuation delays; runs len + 1 times
//! spawn = [50]              # children registered on the first invocation
//! cancel_at_tick = 1        # cancel before the tick with this index
//! ```

use anyhow::{bail, ensure, Context as _, Result};
use serde::Deserialize;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::rc::Rc;
use tickwork::domain::scheduler::{RoutineId, SchedulerConfig, SleepTime};
use tickwork::{segmented, HeapStore, Routine, Scheduler, Step, Yield};

/// Trace capacity used when the scenario leaves tracing off
const DEFAULT_TRACE_CAPACITY: usize = 4096;

/// Upper bound on ticks spent draining to idle
const MAX_DRAIN_TICKS: usize = 1_000_000;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    scheduler: SchedulerConfig,
    #[serde(default)]
    ticks: Vec<SleepTime>,
    drain_step: Option<SleepTime>,
    #[serde(default, rename = "routine")]
    routines: Vec<RoutineEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct RoutineEntry {
    name: String,
    #[serde(default)]
    delay: SleepTime,
    #[serde(default)]
    segments: Vec<SleepTime>,
    #[serde(default)]
    spawn: Vec<SleepTime>,
    cancel_at_tick: Option<usize>,
}

type Names = Rc<RefCell<BTreeMap<RoutineId, String>>>;

impl Scenario {
    /// Read and validate a scenario file
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::parse(&source).with_context(|| format!("invalid scenario {}", path.display()))
    }

    pub fn parse(source: &str) -> Result<Self> {
        let mut scenario: Self = toml::from_str(source)?;
        scenario.scheduler.validate()?;
        if scenario.scheduler.trace_capacity == 0 {
            scenario.scheduler.trace_capacity = DEFAULT_TRACE_CAPACITY;
        }

        let mut names = BTreeSet::new();
        for routine in &scenario.routines {
            ensure!(names.insert(routine.name.as_str()), "duplicate routine name {:?}", routine.name);
        }
        ensure!(
            !scenario.ticks.is_empty() || scenario.drain_step.is_some(),
            "scenario needs `ticks` or `drain_step`"
        );
        if let Some(step) = scenario.drain_step {
            ensure!(step > 0, "drain_step must be positive, got {step}");
        }
        Ok(scenario)
    }

    /// Run once and render the trace, one invocation per line
    pub fn replay(&self) -> Result<Vec<String>> {
        let mut scheduler = Scheduler::with_config(HeapStore::new(), &self.scheduler)?;
        let names: Names = Rc::default();

        let mut ids = Vec::with_capacity(self.routines.len());
        for entry in &self.routines {
            let id = scheduler.run_routine(routine_body(entry.clone(), Rc::clone(&names)), entry.delay);
            names.borrow_mut().insert(id, entry.name.clone());
            ids.push(id);
        }

        for (tick, elapsed) in self.ticks.iter().enumerate() {
            for (entry, id) in self.routines.iter().zip(&ids) {
                if entry.cancel_at_tick == Some(tick) && scheduler.cancel(*id) {
                    tracing::info!(routine = %entry.name, tick, "canceled by scenario");
                }
            }
            scheduler.process_events(*elapsed);
        }

        if let Some(step) = self.drain_step {
            let mut drained = 0;
            while scheduler.process_events(step) {
                drained += 1;
                if drained == MAX_DRAIN_TICKS {
                    bail!("scenario still busy after {MAX_DRAIN_TICKS} drain ticks");
                }
            }
        }

        if scheduler.trace().total_recorded() > scheduler.trace().len() as u64 {
            tracing::warn!(
                kept = scheduler.trace().len(),
                total = scheduler.trace().total_recorded(),
                "trace capacity exceeded; oldest invocations dropped"
            );
        }

        let names = names.borrow();
        Ok(scheduler
            .trace()
            .iter()
            .map(|record| match names.get(&record.id) {
                Some(name) => format!("{record} {name}"),
                None => record.to_string(),
            })
            .collect())
    }

    /// Replay `times` times and fail if any trace differs from the first
    pub fn replay_checked(&self, times: u32) -> Result<Vec<String>> {
        let first = self.replay()?;
        for attempt in 2..=times {
            let again = self.replay()?;
            if let Some(at) = first.iter().zip(&again).position(|(a, b)| a != b) {
                bail!("replay {attempt} diverged at invocation {at}: {:?} vs {:?}", first[at], again[at]);
            }
            ensure!(
                first.len() == again.len(),
                "replay {attempt} produced {} invocations, expected {}",
                again.len(),
                first.len()
            );
        }
        Ok(first)
    }
}

fn routine_body(entry: RoutineEntry, names: Names) -> impl Routine + 'static {
    segmented(0usize, move |segment, children, ctx| {
        if segment == 0 {
            for delay in &entry.spawn {
                *children += 1;
                let id = ctx.run(|_| Step::Done, *delay);
                names.borrow_mut().insert(id, format!("{}/child{}", entry.name, children));
            }
        }
        match entry.segments.get(segment as usize) {
            Some(delay) => Yield::to(segment + 1, *delay),
            None => Yield::Finish,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC: &str = r#"
        ticks = [16, 16]

        [[routine]]
        name = "a"
        delay = 30

        [[routine]]
        name = "b"
        delay = 20
    "#;

    #[test]
    fn test_replay_orders_by_wake_time() {
        let trace = Scenario::parse(BASIC).unwrap().replay().unwrap();
        assert_eq!(
            trace,
            vec!["t=32 Routine(1) COMPLETED b", "t=32 Routine(0) COMPLETED a"]
        );
    }

    #[test]
    fn test_segments_spawn_and_cancel() {
        let source = r#"
            ticks = [10, 10]
            drain_step = 10

            [[routine]]
            name = "main"
            delay = 10
            segments = [10]
            spawn = [5]

            [[routine]]
            name = "doomed"
            delay = 15
            cancel_at_tick = 1
        "#;
        let trace = Scenario::parse(source).unwrap().replay_checked(3).unwrap();
        assert_eq!(
            trace,
            vec![
                "t=10 Routine(0) RESCHEDULED(20) main",
                "t=20 Routine(2) COMPLETED main/child1",
                "t=20 Routine(0) COMPLETED main",
            ]
        );
    }

    #[test]
    fn test_bundled_demos_replay_deterministically() {
        let demos = [
            include_str!("../../../demos/basic.toml"),
            include_str!("../../../demos/sleepers.toml"),
            include_str!("../../../demos/spawner.toml"),
        ];
        for source in demos {
            let scenario = Scenario::parse(source).unwrap();
            assert!(!scenario.replay_checked(2).unwrap().is_empty());
        }
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let source = "ticks = [1]\n[[routine]]\nname = \"x\"\n[[routine]]\nname = \"x\"\n";
        assert!(Scenario::parse(source).is_err());
    }

    #[test]
    fn test_requires_ticks_or_drain() {
        assert!(Scenario::parse("[[routine]]\nname = \"x\"\n").is_err());
    }
}
