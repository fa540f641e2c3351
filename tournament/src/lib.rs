pub mod runner;
pub mod batch;

pub use runner::{run_match, run_with_policies, MatchResult, PlayerResult};
pub use batch::{batch_seeds, run_batch, BatchReport, BatchSummary};
