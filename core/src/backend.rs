//! The backends used to compute rainbow chains.

mod cpu;
mod lanes;
mod sequential;

pub use cpu::CpuBackend;
pub use lanes::LanesBackend;
pub use sequential::SequentialBackend;

use std::{fmt, str::FromStr};

use tracing::debug;

use crate::{
    chain::RainbowChain,
    ctx::RainbowTableCtx,
    error::{PrismError, PrismResult},
    password::Password,
};

/// A trait that every backend must implement to compute rainbow chains.
/// Every backend must produce exactly the chains of the sequential backend,
/// only the throughput may differ.
pub trait Backend: Send + Sync {
    /// The name of the backend, used in logs and errors.
    fn name(&self) -> &'static str;

    /// Computes the chains starting at `startpoints`.
    /// The chains are returned in the order of their startpoints.
    fn compute_chains(
        &self,
        startpoints: Vec<Password>,
        ctx: &RainbowTableCtx,
    ) -> PrismResult<Vec<RainbowChain>>;

    /// Whether this backend is the reference computation.
    fn is_reference(&self) -> bool {
        false
    }
}

/// The available backends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendKind {
    Sequential,
    #[default]
    Cpu,
    Lanes,
}

impl BackendKind {
    pub const ALL: [BackendKind; 3] = [Self::Sequential, Self::Cpu, Self::Lanes];

    /// Creates the backend.
    pub fn backend(self) -> Box<dyn Backend> {
        match self {
            Self::Sequential => Box::new(SequentialBackend),
            Self::Cpu => Box::new(CpuBackend),
            Self::Lanes => Box::new(LanesBackend::default()),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Cpu => "cpu",
            Self::Lanes => "lanes",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BackendKind {
    type Err = PrismError;

    fn from_str(s: &str) -> PrismResult<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| PrismError::InvalidInput(format!("unknown backend \"{s}\"")))
    }
}

/// Makes sure `backend` computes the same chains as the sequential backend on `sample`.
pub fn verify_equivalence(
    backend: &dyn Backend,
    ctx: &RainbowTableCtx,
    sample: &[Password],
) -> PrismResult<()> {
    let expected = SequentialBackend.compute_chains(sample.to_vec(), ctx)?;
    let actual = backend.compute_chains(sample.to_vec(), ctx)?;

    if actual.len() != expected.len() {
        return Err(PrismError::BackendMismatch {
            backend: backend.name(),
            startpoint: format!("{} chains instead of {}", actual.len(), expected.len()),
        });
    }

    if let Some((chain, _)) = expected
        .iter()
        .zip(&actual)
        .find(|(expected, actual)| expected != actual)
    {
        return Err(PrismError::BackendMismatch {
            backend: backend.name(),
            startpoint: chain.startpoint.to_string(),
        });
    }

    debug!(backend = backend.name(), sample = sample.len(), "backend agrees with the sequential backend");

    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::{verify_equivalence, Backend, BackendKind};
    use crate::{
        chain::RainbowChain, ctx::RainbowTableCtx, error::PrismError, password::Password,
        PrismResult, RainbowTableCtxBuilder,
    };

    /// A backend that gets the last chain wrong.
    struct FaultyBackend;

    impl Backend for FaultyBackend {
        fn name(&self) -> &'static str {
            "faulty"
        }

        fn compute_chains(
            &self,
            startpoints: Vec<Password>,
            ctx: &RainbowTableCtx,
        ) -> PrismResult<Vec<RainbowChain>> {
            let mut chains = BackendKind::Sequential.backend().compute_chains(startpoints, ctx)?;
            if let Some(chain) = chains.last_mut() {
                chain.endpoint = ctx.hash_function().hash(b"not an endpoint");
            }
            Ok(chains)
        }
    }

    fn sample(ctx: &RainbowTableCtx, len: usize) -> Vec<Password> {
        let mut rng = StdRng::seed_from_u64(42);
        (0..len).map(|_| ctx.random_password(&mut rng)).collect()
    }

    #[test]
    fn test_backends_are_equivalent() {
        let ctx = RainbowTableCtxBuilder::new().chain_length(40).build().unwrap();
        // not a multiple of the lane width
        let sample = sample(&ctx, 101);

        for kind in BackendKind::ALL {
            verify_equivalence(kind.backend().as_ref(), &ctx, &sample).unwrap();
        }
    }

    #[test]
    fn test_faulty_backend_is_detected() {
        let ctx = RainbowTableCtxBuilder::new().chain_length(10).build().unwrap();
        let sample = sample(&ctx, 20);

        let err = verify_equivalence(&FaultyBackend, &ctx, &sample).unwrap_err();
        assert!(matches!(err, PrismError::BackendMismatch { backend: "faulty", .. }));
    }

    #[test]
    fn test_backend_kind_from_str() {
        for kind in BackendKind::ALL {
            assert_eq!(kind, kind.name().parse().unwrap());
        }
        assert!("gpu".parse::<BackendKind>().is_err());
    }
}
