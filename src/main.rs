use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::ParallelProgressIterator;
use log::LevelFilter;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use sa_trace::{verify, Config, Trace, Tracer};

mod terminal_interface;

use terminal_interface::Args;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn print_trace(trace: &Trace, quiet: bool) {
    if quiet {
        println!("{:?}: {:?}", trace.input(), trace.suffix_array());
        return;
    }
    println!("== {:?}", trace.input());
    for (i, step) in trace.iter().enumerate() {
        println!("Step {} / {}\n{}", i + 1, trace.len(), step);
    }
    println!();
}

fn save_trace(dir: &Path, index: usize, trace: &Trace) -> Result<()> {
    let path = dir.join(format!("trace-{index}.bin"));
    let bytes = trace.serialize()?;
    fs::write(&path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    log::debug!("saved trace of {:?} to {}", trace.input(), path.display());
    Ok(())
}

fn replay(path: &Path, args: &Args) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let trace = Trace::deserialize(&bytes)
        .with_context(|| format!("{} is not a valid trace", path.display()))?;
    if args.verify {
        verify::check(&trace)?;
    }
    print_trace(&trace, args.quiet);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Some(path) = &args.replay {
        return replay(path, &args);
    }

    let tracer = Tracer::new(
        Config::default()
            .with_rank_policy(args.ranks)
            .with_sort_strategy(args.sort),
    );

    let traces = args
        .inputs
        .clone()
        .into_par_iter()
        .progress()
        .map(|input| {
            tracer
                .trace(&input)
                .with_context(|| format!("failed to trace {input:?}"))
        })
        .collect::<Result<Vec<_>>>()?;

    if let Some(dir) = &args.save {
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
        for (i, trace) in traces.iter().enumerate() {
            save_trace(dir, i, trace)?;
        }
    }

    let mut mismatches = 0;
    for trace in &traces {
        if args.verify {
            if let Err(err) = verify::check(trace) {
                log::warn!("{err}");
                mismatches += 1;
            }
        }
        print_trace(trace, args.quiet);
    }

    if mismatches > 0 {
        bail!("{mismatches} of {} suffix arrays failed verification", traces.len());
    }
    Ok(())
}
