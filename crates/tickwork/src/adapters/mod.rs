//! Adapters Layer - Assembling Domain Pieces into Runnable Loops
//!
//! - `MainLoop`: `GameClock` (real time → fixed steps) driving an
//!   `EventSimulator` (virtual time → routines and events)

pub mod main_loop;

pub use main_loop::{FrameReport, MainLoop};
