//! Single-threaded reference backend.

use crate::{
    chain::{ChainWalker, RainbowChain},
    ctx::RainbowTableCtx,
    error::PrismResult,
    password::Password,
};

use super::Backend;

/// Computes the chains one after the other.
/// This is the backend every other backend is checked against.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequentialBackend;

impl Backend for SequentialBackend {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn compute_chains(
        &self,
        startpoints: Vec<Password>,
        ctx: &RainbowTableCtx,
    ) -> PrismResult<Vec<RainbowChain>> {
        let walker = ChainWalker::new(ctx);

        Ok(startpoints
            .into_iter()
            .map(|startpoint| walker.build_chain(startpoint))
            .collect())
    }

    fn is_reference(&self) -> bool {
        true
    }
}
