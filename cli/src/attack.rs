use std::time::Instant;

use anyhow::{Context, Result};
use human_repr::HumanDuration;
use prism_core::{Cracker, RainbowTable};

use crate::Attack;

pub fn attack(atk: Attack) -> Result<()> {
    let ctx = atk.ctx.builder().build().context("Invalid table parameters")?;
    let table = RainbowTable::load(&atk.table, &ctx)?;
    let cracker = Cracker::new(&table, &ctx)?;

    let digests = atk
        .digests
        .iter()
        .map(|hex| ctx.digest(hex))
        .collect::<Result<Vec<_>, _>>()?;

    let start = Instant::now();
    let results = cracker.crack_many(&digests);

    for (digest, result) in digests.iter().zip(results) {
        match result? {
            Some(password) => println!("{digest} {password}"),
            None => eprintln!("No password found for {digest}"),
        }
    }

    eprintln!("Search done in {}", start.elapsed().human_duration());

    Ok(())
}
