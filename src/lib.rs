//! Instrumented suffix array construction.
//!
//! Sorts all suffixes of a string by prefix doubling and records every
//! intermediate state as a replayable [`Trace`]:
//!
//! ```
//! let trace = sa_trace::trace("banana").unwrap();
//! assert_eq!(trace.suffix_array(), &[5, 3, 1, 0, 4, 2]);
//! for step in &trace {
//!     println!("{step}");
//! }
//! ```

pub mod config;
pub mod error;
pub mod pairs;
pub mod rank;
pub mod refine;
pub mod sort;
pub mod suffix_array;
pub mod trace;
pub mod tracer;
pub mod verify;

pub use config::Config;
pub use error::{Error, Result};
pub use pairs::{IndexedPair, KeyPair};
pub use rank::{Rank, RankArray, RankPolicy, SENTINEL};
pub use sort::{SortPass, SortStrategy};
pub use crate::suffix_array::SuffixArray;
pub use trace::{FinalSummary, Phase, Step, StepDetail, SuffixRow, Trace};
pub use tracer::{trace, Tracer};
