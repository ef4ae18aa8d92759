use serde::Serialize;

use crate::{ctx::RainbowTableCtx, hash::Digest, password::Password, reduce::ReductionFamily};

/// A rainbow chain, of which only both ends are kept.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct RainbowChain {
    pub startpoint: Password,
    pub endpoint: Digest,
}

/// Walks rainbow chains: p_{i+1} = R_{i+1}(H(p_i)) and endpoint = H(p_{K-1}).
#[derive(Clone, Copy, Debug)]
pub struct ChainWalker<'a> {
    ctx: &'a RainbowTableCtx,
    reduction: ReductionFamily<'a>,
}

impl<'a> ChainWalker<'a> {
    pub fn new(ctx: &'a RainbowTableCtx) -> Self {
        Self {
            ctx,
            reduction: ReductionFamily::new(ctx),
        }
    }

    pub fn ctx(&self) -> &'a RainbowTableCtx {
        self.ctx
    }

    #[inline]
    pub fn hash(&self, password: &Password) -> Digest {
        self.ctx.hash(password)
    }

    #[inline]
    pub fn reduce(&self, digest: &Digest, position: u64) -> Password {
        self.reduction.reduce(digest, position)
    }

    /// Goes from the password at column `position - 1` to the password at column `position`.
    #[inline]
    pub fn step(&self, password: &Password, position: u64) -> Password {
        self.reduce(&self.hash(password), position)
    }

    /// Computes the whole chain starting at `startpoint`.
    pub fn build_chain(&self, startpoint: Password) -> RainbowChain {
        let last = (1..self.ctx.chain_length())
            .fold(startpoint.clone(), |password, position| self.step(&password, position));

        RainbowChain {
            endpoint: self.hash(&last),
            startpoint,
        }
    }

    /// Computes the endpoint a chain would have if `digest` was the digest at `column`.
    pub fn endpoint_from(&self, digest: &Digest, column: u64) -> Digest {
        (column + 1..self.ctx.chain_length()).fold(digest.clone(), |digest, position| {
            self.hash(&self.reduce(&digest, position))
        })
    }

    /// Replays the chain starting at `startpoint` and returns the password whose digest
    /// is `target`, if any. Every column is checked, the last one included.
    pub fn find_in_chain(&self, startpoint: &Password, target: &Digest) -> Option<Password> {
        let mut password = startpoint.clone();

        for position in 0..self.ctx.chain_length() {
            let digest = self.hash(&password);

            if digest == *target {
                return Some(password);
            }

            if position + 1 < self.ctx.chain_length() {
                password = self.reduce(&digest, position + 1);
            }
        }

        None
    }
}

/// Computes the chain starting at `startpoint`.
pub fn build_chain(startpoint: Password, ctx: &RainbowTableCtx) -> RainbowChain {
    ChainWalker::new(ctx).build_chain(startpoint)
}
