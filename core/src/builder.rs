use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
};

use crossbeam_channel::{unbounded, Sender};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info, warn};

use crate::{
    backend::{verify_equivalence, Backend, BackendKind},
    ctx::RainbowTableCtx,
    error::{PrismError, PrismResult},
    event::{Event, RainbowTableHandle},
    rainbow_table::RainbowTable,
    scheduling::BatchIterator,
    DEFAULT_BATCH_SIZE,
};

/// The number of chains used to check a backend against the sequential backend.
const CALIBRATION_SAMPLE_SIZE: usize = 64;

/// The seed of the calibration sample. It is independent of the table seed
/// so that calibrating does not change the startpoints.
const CALIBRATION_SEED: u64 = 0x5052_4953_4d;

/// Generates rainbow tables.
///
/// Startpoints are drawn uniformly from the search space with a single random generator.
/// Two tables generated with the same seed therefore share their first startpoints,
/// whatever their number of chains.
pub struct TableBuilder {
    ctx: RainbowTableCtx,
    backend: Box<dyn Backend>,
    seed: Option<u64>,
    batch_size: usize,
}

impl TableBuilder {
    pub fn new(ctx: RainbowTableCtx) -> Self {
        Self {
            ctx,
            backend: BackendKind::default().backend(),
            seed: None,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Sets the backend used to compute the chains.
    pub fn backend(mut self, kind: BackendKind) -> Self {
        self.backend = kind.backend();

        self
    }

    /// Sets a custom backend used to compute the chains.
    pub fn with_backend(mut self, backend: Box<dyn Backend>) -> Self {
        self.backend = backend;

        self
    }

    /// Sets the seed of the startpoint generator, for reproducible tables.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);

        self
    }

    /// Sets the number of chains computed between two abort checks.
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;

        self
    }

    /// Generates the rainbow table on the current thread.
    pub fn build(self) -> PrismResult<RainbowTable> {
        self.build_impl(None, &AtomicBool::new(false))
    }

    /// Generates the rainbow table on another thread.
    /// The returned handle gives access to the generation events and can abort the generation.
    pub fn build_with_events(self) -> RainbowTableHandle {
        let (sender, receiver) = unbounded();
        let abort = Arc::new(AtomicBool::new(false));
        let thread_abort = abort.clone();

        let handle = thread::spawn(move || self.build_impl(Some(sender), &thread_abort));

        RainbowTableHandle {
            handle,
            receiver,
            abort,
        }
    }

    fn build_impl(
        self,
        sender: Option<Sender<Event>>,
        abort: &AtomicBool,
    ) -> PrismResult<RainbowTable> {
        let ctx = self.ctx;
        let chains_len = usize::try_from(ctx.chains()).map_err(|_| {
            PrismError::InvalidInput(format!("{} chains cannot be held in memory", ctx.chains()))
        })?;

        let emit = |event: Event| {
            if let Some(sender) = &sender {
                // the receiver may have been dropped, the generation goes on regardless
                let _ = sender.send(event);
            }
        };

        info!(
            backend = self.backend.name(),
            chains = chains_len,
            chain_length = ctx.chain_length(),
            hash = %ctx.hash_function(),
            "generating rainbow table"
        );

        if !self.backend.is_reference() {
            let mut rng = StdRng::seed_from_u64(CALIBRATION_SEED);
            let sample = (0..CALIBRATION_SAMPLE_SIZE)
                .map(|_| ctx.random_password(&mut rng))
                .collect::<Vec<_>>();

            verify_equivalence(self.backend.as_ref(), &ctx, &sample)?;
            emit(Event::Calibrated {
                backend: self.backend.name(),
            });
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut table = RainbowTable::with_capacity(ctx.clone(), chains_len.min(self.batch_size));
        let batches = BatchIterator::new(chains_len, self.batch_size);
        let batch_count = batches.len() as u64;

        for (batch_number, range) in batches.enumerate() {
            if abort.load(Ordering::Relaxed) {
                warn!(chains = table.chain_count(), "rainbow table generation aborted");
                emit(Event::Aborted {
                    chains: table.chain_count() as u64,
                });
                return Ok(table);
            }

            let batch_number = batch_number as u64 + 1;
            debug!(batch_number, batch_count, chains = range.len(), "computing batch");
            emit(Event::Batch {
                batch_number,
                batch_count,
                chains: range.clone(),
            });

            let startpoints = range.map(|_| ctx.random_password(&mut rng)).collect();
            for chain in self.backend.compute_chains(startpoints, &ctx)? {
                table.insert(chain);
            }

            emit(Event::Progress(batch_number as f64 / batch_count as f64 * 100.));
        }

        info!(
            endpoints = table.len(),
            chains = table.chain_count(),
            "rainbow table generated"
        );

        Ok(table)
    }
}
