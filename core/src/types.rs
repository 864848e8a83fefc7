//! Shared primitive types used across the entire simulator.

/// A state's unique name, e.g. "Pennsylvania".
pub type StateName = String;

/// A candidate's display label, e.g. "Biden".
pub type CandidateLabel = String;

/// An electoral-vote count. Never negative.
pub type Votes = u32;

/// Zero-based index of a trial within one run.
pub type TrialIndex = usize;

/// Votes required to win outright in a 538-vote college.
pub const DEFAULT_MAJORITY_THRESHOLD: Votes = 270;
