//! Concurrent query engine.
//!
//! A run fans out one task per source, then consumes the results one at a
//! time in completion order. Every delivered result goes through a single
//! serial loop which deduplicates addresses, resolves their location and
//! redraws the progress line, so the run state needs no locking.

pub mod errors;
pub mod functions;
pub mod impls;
pub mod types;

pub use types::{CompletionPolicy, Pinger, RunMode, RunReport};
