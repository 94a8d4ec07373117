use std::path::PathBuf;

use clap::Parser;
use sa_trace::{RankPolicy, SortStrategy};

/// Step-by-step suffix array construction by prefix doubling
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Strings to build suffix arrays for
    #[arg(required_unless_present = "replay")]
    pub inputs: Vec<String>,

    /// How the pairs of each iteration are sorted
    #[arg(short, long, value_enum, default_value_t = SortStrategy::Comparison)]
    pub sort: SortStrategy,

    /// How single characters become the initial ranks
    #[arg(short, long, value_enum, default_value_t = RankPolicy::Dense)]
    pub ranks: RankPolicy,

    /// Write every trace as a bincode file into this directory
    #[arg(long, conflicts_with = "replay")]
    pub save: Option<PathBuf>,

    /// Print a previously saved trace instead of computing one
    #[arg(long, conflicts_with = "inputs")]
    pub replay: Option<PathBuf>,

    /// Check each result against the reference orders
    #[arg(long)]
    pub verify: bool,

    /// Only print the final suffix array of each input
    #[arg(short, long)]
    pub quiet: bool,

    /// Log phase transitions (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
