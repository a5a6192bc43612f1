//! Progress events for long-running table computations.

use std::thread::JoinHandle;

use crossbeam_channel::Receiver;
use num_bigint::BigUint;

use crate::{error::BruteResult, generator::RunSummary};

/// An event to track the progress of a running table computation.
#[derive(Debug, Clone)]
pub enum Event {
    /// The run started. Carries the theoretical size of the candidate space.
    Started { total: BigUint },
    /// Candidates processed so far. Throttled, monotonically non-decreasing.
    Progress { processed: u64 },
    /// The run finished, with the final processed count.
    Finished { processed: u64 },
}

/// A handle on a table computation running in a background thread.
pub struct TableHandle {
    pub(crate) handle: JoinHandle<BruteResult<RunSummary>>,
    pub(crate) receiver: Receiver<Event>,
}

impl TableHandle {
    /// Returns the run summary.
    /// Blocks until the computation is finished.
    pub fn join(self) -> BruteResult<RunSummary> {
        self.handle.join().unwrap()
    }

    /// Blocks until an event is received.
    /// Returns `None` if the computation is finished.
    pub fn recv(&self) -> Option<Event> {
        self.receiver.recv().ok()
    }

    /// Returns the next event without blocking, if one is pending.
    pub fn try_recv(&self) -> Option<Event> {
        self.receiver.try_recv().ok()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
