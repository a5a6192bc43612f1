use anyhow::{Context, Result};
use brutetable_core::{Event, Generator, TableRequest};
use human_repr::{HumanCount, HumanDuration};
use indicatif::ProgressBar;
use num_traits::ToPrimitive;

use crate::{default_progress_style, Search};

pub fn search(args: Search) -> Result<()> {
    let ctx = args.space.ctx_builder().build()?;
    let generator = Generator::new(ctx);

    let handle = generator.compute_table_with_events(TableRequest::search(&args.digest))?;

    let pb = ProgressBar::new(0);
    pb.set_style(default_progress_style());

    while let Some(event) = handle.recv() {
        match event {
            Event::Started { total } => {
                pb.set_length(total.to_u64().unwrap_or(u64::MAX));
            }
            Event::Progress { processed } | Event::Finished { processed } => {
                pb.set_position(processed);
            }
        }
    }

    let summary = handle.join().context("The search failed")?;
    pb.finish_and_clear();

    match summary.hit {
        Some(hit) => println!(
            "Found {} => {} after {} candidates in {}",
            hit.digest,
            hit.plaintext,
            summary.processed.human_count_bare(),
            summary.elapsed.human_duration(),
        ),
        None => println!(
            "No candidate found after exhausting {} combinations in {}",
            summary.processed.human_count_bare(),
            summary.elapsed.human_duration(),
        ),
    }

    Ok(())
}
