use std::time::Duration;

use anyhow::Result;
use brutetable_core::Generator;
use human_repr::{HumanCount, HumanDuration, HumanThroughput};
use indicatif::ProgressBar;

use crate::Benchmark;

pub fn benchmark(args: Benchmark) -> Result<()> {
    let ctx = args.space.ctx_builder().build()?;
    let generator = Generator::new(ctx);

    println!(
        "Benchmarking {} over {} thread(s), charset of {} characters, lengths {} to {}",
        generator.ctx().algorithm,
        generator.ctx().threads,
        generator.ctx().charset.len(),
        generator.ctx().min_length,
        generator.ctx().max_length,
    );

    let pb = ProgressBar::new_spinner().with_message("Measuring throughput");
    pb.enable_steady_tick(Duration::from_millis(100));

    let report = generator.benchmark(Duration::from_secs(args.budget))?;
    pb.finish_and_clear();

    println!(
        "Hashed {} candidates in {}",
        report.hashes.human_count_bare(),
        report.elapsed.human_duration(),
    );
    println!(
        "Throughput: {} total, {} per thread",
        report.hashes_per_second.human_throughput("H"),
        report.hashes_per_thread.human_throughput("H"),
    );
    println!("Candidate space: {} combinations", report.total_combinations);

    match report.estimated_exhaustion {
        Some(eta) => println!("Estimated time to exhaust the space: {}", eta.human_duration()),
        None => println!("The space cannot be exhausted at this rate"),
    }

    Ok(())
}
