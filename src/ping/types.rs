// Standard library
use std::sync::Arc;
use std::time::Duration;

// Project imports
use crate::geo::Locator;
use crate::sources::{IpFamily, IpSource};

/// When a run is considered complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionPolicy {
    /// Stop at the first usable address and cancel the other requests.
    First,
    /// Wait for every source to answer, fail or time out.
    All,
}

/// Immutable configuration of one run.
#[derive(Debug, Clone, Copy)]
pub struct RunMode {
    pub policy: CompletionPolicy,
    pub family: IpFamily,
    /// Print addresses only, without counts or locations.
    pub raw: bool,
    /// Time allowed to each source, measured from the start of the run.
    pub timeout: Duration,
}

/// A unique address and the text printed for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub address: String,
    pub label: String,
}

/// What a delivered result changed in the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    New,
    Duplicate,
    Nothing,
}

/// State of one run, owned by the pinger and never shared with the tasks.
#[derive(Debug, Default)]
pub struct AggregationState {
    /// Unique addresses in the order they arrived.
    pub seen: Vec<Entry>,
    /// Results delivered so far, whatever their outcome.
    pub completed: usize,
    pub last_rendered: String,
}

/// Summary returned once every task of a run has been joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub addresses: Vec<String>,
    pub completed: usize,
    pub total: usize,
    /// Tasks joined, including cancelled ones.
    pub delivered: usize,
    pub line: String,
}

/// Queries every source concurrently and prints the addresses as they arrive.
pub struct Pinger {
    pub sources: Vec<Arc<dyn IpSource>>,
    pub locator: Arc<dyn Locator>,
}

/// A single terminal line redrawn in place with carriage returns.
pub struct ProgressLine<W> {
    pub out: W,
    pub width: usize,
}
