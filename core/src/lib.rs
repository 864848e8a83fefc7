//! Monte Carlo simulation of a two-candidate, state-by-state election.
//!
//! Build an `ElectionEngine` from a state table, run it against an
//! injected `RandomSource`, then read the `AggregateResult` through
//! the helpers in `analysis` or the `report` summary.

pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod outcome;
pub mod report;
pub mod rng;
pub mod state;
pub mod types;
