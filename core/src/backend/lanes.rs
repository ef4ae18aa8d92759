//! Lockstep backend.
//!
//! Chains are grouped in lanes that advance one column at a time, the way a GPU kernel
//! walks its threads. Lanes are spread over the rayon thread pool.

use rayon::prelude::*;

use crate::{
    chain::{ChainWalker, RainbowChain},
    ctx::RainbowTableCtx,
    error::PrismResult,
    password::Password,
};

use super::Backend;

/// The default number of chains in a lane.
pub const DEFAULT_LANE_WIDTH: usize = 8;

#[derive(Clone, Copy, Debug)]
pub struct LanesBackend {
    lane_width: usize,
}

impl LanesBackend {
    pub fn new(lane_width: usize) -> Self {
        Self {
            lane_width: lane_width.max(1),
        }
    }

    pub fn lane_width(&self) -> usize {
        self.lane_width
    }
}

impl Default for LanesBackend {
    fn default() -> Self {
        Self::new(DEFAULT_LANE_WIDTH)
    }
}

impl Backend for LanesBackend {
    fn name(&self) -> &'static str {
        "lanes"
    }

    fn compute_chains(
        &self,
        startpoints: Vec<Password>,
        ctx: &RainbowTableCtx,
    ) -> PrismResult<Vec<RainbowChain>> {
        let walker = ChainWalker::new(ctx);

        let lanes = startpoints
            .par_chunks(self.lane_width)
            .map(|lane| {
                let mut columns = lane.to_vec();

                for position in 1..ctx.chain_length() {
                    for password in columns.iter_mut() {
                        *password = walker.step(password, position);
                    }
                }

                lane.iter()
                    .zip(columns)
                    .map(|(startpoint, last)| RainbowChain {
                        startpoint: startpoint.clone(),
                        endpoint: walker.hash(&last),
                    })
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        Ok(lanes.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::LanesBackend;
    use crate::{backend::Backend, chain::build_chain, ctx::build_test_ctx};

    #[test]
    fn test_lanes_keep_order() {
        let ctx = build_test_ctx();
        let startpoints = ["cc", "ab", "ba", "aa", "bc"]
            .map(|p| ctx.password(p).unwrap())
            .to_vec();

        let chains = LanesBackend::new(2)
            .compute_chains(startpoints.clone(), &ctx)
            .unwrap();

        let expected = startpoints
            .into_iter()
            .map(|startpoint| build_chain(startpoint, &ctx))
            .collect::<Vec<_>>();
        assert_eq!(expected, chains);
    }

    #[test]
    fn test_zero_width_is_clamped() {
        assert_eq!(1, LanesBackend::new(0).lane_width());
    }
}
