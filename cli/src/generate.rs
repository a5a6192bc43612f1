use anyhow::{Context, Result};
use brutetable_core::{Event, Generator, TableRequest};
use human_repr::{HumanCount, HumanDuration};
use indicatif::ProgressBar;
use num_traits::ToPrimitive;

use crate::{default_progress_style, Generate};

pub fn generate(args: Generate) -> Result<()> {
    let ctx = args.space.ctx_builder().build()?;
    let generator = Generator::new(ctx);

    let request = TableRequest::build(&args.output).overwrite(args.overwrite);
    let handle = generator.compute_table_with_events(request)?;

    let pb = ProgressBar::new(0);
    pb.set_style(default_progress_style());

    while let Some(event) = handle.recv() {
        match event {
            Event::Started { total } => {
                // spaces beyond the u64 range are shown as an unbounded bar
                pb.set_length(total.to_u64().unwrap_or(u64::MAX));
            }
            Event::Progress { processed } | Event::Finished { processed } => {
                pb.set_position(processed);
            }
        }
    }

    let summary = handle.join().context("The table generation failed")?;
    pb.finish_and_clear();

    println!(
        "Wrote {} entries to {} in {}",
        summary.table_entries.human_count_bare(),
        args.output.display(),
        summary.elapsed.human_duration(),
    );

    Ok(())
}
