use std::time::Instant;

use anyhow::{Context, Result};
use human_repr::{HumanCount, HumanDuration};
use tracing::info;

use prism_core::{Event, TableBuilder};

use crate::Generate;

pub fn generate(args: Generate) -> Result<()> {
    let ctx = args
        .ctx
        .builder()
        .chains(args.chains)
        .build()
        .context("Invalid table parameters")?;

    let mut builder = TableBuilder::new(ctx)
        .backend(args.backend.into())
        .batch_size(args.batch_size as usize);

    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }

    let start = Instant::now();
    let handle = builder.build_with_events();

    // handle events while the table is being generated
    while let Some(event) = handle.recv() {
        match event {
            Event::Calibrated { backend } => {
                info!("The {backend} backend agrees with the reference computation")
            }
            Event::Batch {
                batch_number,
                batch_count,
                chains,
            } => info!(
                "Running batch {batch_number}/{batch_count} ({} chains)",
                chains.len().human_count_bare()
            ),
            Event::Progress(progress) => info!("{progress:.1}% done"),
            Event::Aborted { chains } => info!("Aborted after {chains} chains"),
        }
    }

    let table = handle.join()?;
    let elapsed = start.elapsed();

    table
        .store(&args.table)
        .context("Unable to store the generated rainbow table to the disk")?;

    println!(
        "Generated {} chains ({} distinct endpoints) in {}",
        table.chain_count(),
        table.len(),
        elapsed.human_duration()
    );

    Ok(())
}
