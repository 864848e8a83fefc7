//! Who won: a state (Side) or a trial / the whole run (Outcome).

use crate::{
    error::{SimError, SimResult},
    types::CandidateLabel,
};
use serde::{Deserialize, Serialize};

/// Label used wherever an outcome is a tie.
pub const TIE_LABEL: &str = "tie";

/// The winner of a single state in a single trial. Every state resolves
/// to exactly one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    A,
    B,
}

/// The winner of a trial, or of the run as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    A,
    B,
    Tie,
}

impl From<Side> for Outcome {
    fn from(side: Side) -> Self {
        match side {
            Side::A => Outcome::A,
            Side::B => Outcome::B,
        }
    }
}

/// The two candidate labels. Candidate A is the one whose win
/// probability appears in the input table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidates {
    pub a: CandidateLabel,
    pub b: CandidateLabel,
}

impl Candidates {
    pub fn new(a: impl Into<CandidateLabel>, b: impl Into<CandidateLabel>) -> SimResult<Self> {
        let (a, b) = (a.into(), b.into());
        if a.trim().is_empty() || b.trim().is_empty() {
            return Err(SimError::invalid("candidate labels must be non-empty"));
        }
        if a == b {
            return Err(SimError::invalid(format!("candidate labels are both '{a}'")));
        }
        if a == TIE_LABEL || b == TIE_LABEL {
            return Err(SimError::invalid(format!("'{TIE_LABEL}' is reserved")));
        }
        Ok(Self { a, b })
    }

    pub fn label(&self, side: Side) -> &str {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }

    pub fn outcome_label(&self, outcome: Outcome) -> &str {
        match outcome {
            Outcome::A   => &self.a,
            Outcome::B   => &self.b,
            Outcome::Tie => TIE_LABEL,
        }
    }

    pub fn side_of(&self, label: &str) -> Option<Side> {
        if label == self.a {
            Some(Side::A)
        } else if label == self.b {
            Some(Side::B)
        } else {
            None
        }
    }
}
