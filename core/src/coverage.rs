//! Estimation of the share of the search space a rainbow table covers.

use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;
use tracing::info;

use crate::cracker::Cracker;

/// Result of a coverage estimation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoverageReport {
    /// Number of digests the table was asked to crack
    pub attempts: u64,
    /// Number of digests cracked
    pub cracked: u64,
}

impl CoverageReport {
    /// Success rate (0.0 to 1.0)
    pub fn rate(&self) -> f64 {
        if self.attempts == 0 {
            return 0.;
        }

        self.cracked as f64 / self.attempts as f64
    }
}

/// Cracks the digests of `samples` random passwords and counts the successes.
///
/// The passwords only depend on `seed`, so two tables can be compared on the same targets.
pub fn estimate_coverage(cracker: &Cracker, samples: u64, seed: u64) -> CoverageReport {
    let ctx = cracker.ctx();
    let mut rng = StdRng::seed_from_u64(seed);

    let digests = (0..samples)
        .map(|_| ctx.hash(&ctx.random_password(&mut rng)))
        .collect::<Vec<_>>();

    let cracked = digests
        .par_iter()
        .filter(|digest| matches!(cracker.crack(digest), Ok(Some(_))))
        .count() as u64;

    let report = CoverageReport {
        attempts: samples,
        cracked,
    };

    info!(
        attempts = report.attempts,
        cracked = report.cracked,
        rate = report.rate(),
        "coverage estimated"
    );

    report
}
