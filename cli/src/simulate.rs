use std::time::Instant;

use anyhow::Result;
use human_repr::HumanDuration;
use prism_core::{estimate_coverage, Cracker, RainbowTable};

use crate::Simulate;

pub fn simulate(sim: Simulate) -> Result<()> {
    let table = RainbowTable::load_unchecked(&sim.table)?;
    let cracker = Cracker::new(&table, table.ctx())?;

    let start = Instant::now();
    let report = estimate_coverage(&cracker, sim.attempts, sim.seed);

    println!(
        "Cracked {}/{} random passwords ({:.2}%) in {}",
        report.cracked,
        report.attempts,
        report.rate() * 100.,
        start.elapsed().human_duration()
    );

    Ok(())
}
