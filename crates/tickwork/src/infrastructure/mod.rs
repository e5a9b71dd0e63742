//! Infrastructure Layer - Operating System Integrations
//!
//! Everything that touches the outside world lives here; the domain layer
//! never reads a wall clock or a file.
//!
//! # Responsibilities
//! - Monotonic wall clock (`MonotonicSource`)
//! - Configuration file loading (`load_config`)

pub mod config;
pub mod monotonic;

pub use config::load_config;
pub use monotonic::MonotonicSource;
