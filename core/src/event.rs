use std::{
    ops::Range,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::JoinHandle,
};

use crossbeam_channel::{Receiver, TryRecvError};

use crate::{
    error::{PrismError, PrismResult},
    rainbow_table::RainbowTable,
};

/// An event to track the progress of the generation of a rainbow table.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The backend was checked against the sequential backend.
    Calibrated { backend: &'static str },
    /// The nth batch of chains is being computed.
    Batch {
        batch_number: u64,
        batch_count: u64,
        chains: Range<usize>,
    },
    /// Overall progress of the rainbow table generation in percent.
    Progress(f64),
    /// The generation was aborted after `chains` chains were inserted.
    Aborted { chains: u64 },
}

/// A handle to a rainbow table being generated on another thread.
pub struct RainbowTableHandle {
    pub(crate) handle: JoinHandle<PrismResult<RainbowTable>>,
    pub(crate) receiver: Receiver<Event>,
    pub(crate) abort: Arc<AtomicBool>,
}

impl RainbowTableHandle {
    /// Returns the generated rainbow table.
    /// Blocks until the table is finished.
    /// If the generation was aborted, the table holds the chains inserted so far.
    pub fn join(self) -> PrismResult<RainbowTable> {
        self.handle.join().map_err(|_| PrismError::WorkerPanicked)?
    }

    /// Blocks until an event is received.
    /// Returns `None` if the rainbow table is finished.
    pub fn recv(&self) -> Option<Event> {
        self.receiver.recv().ok()
    }

    /// Returns an event if one is available.
    /// Returns `None` if there is no pending event or the rainbow table is finished.
    pub fn try_recv(&self) -> Option<Event> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Asks the generation to stop after the batch being computed.
    pub fn abort(&self) {
        self.abort.store(true, Ordering::Relaxed);
    }

    /// Whether the generation thread has returned.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// A flag that aborts the generation when set, for use from another thread.
    pub fn abort_flag(&self) -> Arc<AtomicBool> {
        self.abort.clone()
    }
}
