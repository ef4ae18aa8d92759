use std::time::Instant;

use anyhow::{Context, Result};
use human_repr::{HumanCount, HumanDuration};
use tracing::info;

use prism_core::PasswordSpace;

use crate::Bruteforce;

pub fn bruteforce(bf: Bruteforce) -> Result<()> {
    let ctx = bf.ctx.builder().build().context("Invalid search space")?;
    let digest = ctx.digest(&bf.digest)?;
    let space = PasswordSpace::new(&ctx);

    info!("Trying {} passwords", space.size().human_count_bare());

    let start = Instant::now();
    match space.find(&digest) {
        Some(password) => println!("{password}"),
        None => eprintln!("No password found for the given digest"),
    }

    eprintln!("Search done in {}", start.elapsed().human_duration());

    Ok(())
}
