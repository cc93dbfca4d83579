// Bounded concurrent batch execution primitives
//
// This crate provides the fan-out/fan-in building blocks used by the API:
// - BatchExecutor: bounded-concurrency execution of N independent work items,
//   in blocking-offload or cooperative async-fanout mode
// - offload::run_blocking: thread-hop adapter for synchronous collaborators

pub mod batch;
pub mod config;
pub mod error;
pub mod executor;
pub mod offload;

pub use batch::{BatchOutcome, ItemFailure, ItemSuccess};
pub use config::BatchConfig;
pub use error::{BatchError, ItemError};
pub use executor::BatchExecutor;
pub use offload::run_blocking;
