//! Multithreaded CPU backend.

use rayon::prelude::*;

use crate::{
    chain::{ChainWalker, RainbowChain},
    ctx::RainbowTableCtx,
    error::PrismResult,
    password::Password,
};

use super::Backend;

/// Computes every chain of a batch on the rayon thread pool.
#[derive(Clone, Copy, Debug, Default)]
pub struct CpuBackend;

impl Backend for CpuBackend {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn compute_chains(
        &self,
        startpoints: Vec<Password>,
        ctx: &RainbowTableCtx,
    ) -> PrismResult<Vec<RainbowChain>> {
        let walker = ChainWalker::new(ctx);

        Ok(startpoints
            .into_par_iter()
            .map(|startpoint| walker.build_chain(startpoint))
            .collect())
    }
}
