//! Derived queries over a finished run.
//!
//! Everything here is a pure function of an `AggregateResult`;
//! nothing reads engine state.

use crate::{
    engine::AggregateResult,
    error::{SimError, SimResult},
    outcome::{Outcome, Side},
    types::StateName,
};
use serde::{Deserialize, Serialize};

// ── Outcome odds ────────────────────────────────────────────────────

/// Percentage of trials won by A, by B, and tied. Sums to 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutcomeOdds {
    pub a:   f64,
    pub b:   f64,
    pub tie: f64,
}

/// `count(winner == outcome) / trial_count * 100`.
pub fn win_percentage(aggregate: &AggregateResult, outcome: Outcome) -> f64 {
    if aggregate.trial_count() == 0 {
        return 0.0;
    }
    aggregate.wins(outcome) as f64 * 100.0 / aggregate.trial_count() as f64
}

pub fn outcome_odds(aggregate: &AggregateResult) -> OutcomeOdds {
    OutcomeOdds {
        a:   win_percentage(aggregate, Outcome::A),
        b:   win_percentage(aggregate, Outcome::B),
        tie: win_percentage(aggregate, Outcome::Tie),
    }
}

// ── Vote distributions ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoteSummary {
    pub mean: f64,
    pub min:  u32,
    pub max:  u32,
}

pub fn vote_summary(aggregate: &AggregateResult, side: Side) -> VoteSummary {
    let votes = aggregate.per_trial_votes(side);
    if votes.is_empty() {
        return VoteSummary { mean: 0.0, min: 0, max: 0 };
    }
    let sum: u64 = votes.iter().map(|v| u64::from(*v)).sum();
    VoteSummary {
        mean: sum as f64 / votes.len() as f64,
        min:  votes.iter().copied().min().unwrap_or(0),
        max:  votes.iter().copied().max().unwrap_or(0),
    }
}

/// Fixed-width histogram over a closed range `[lo, hi]`.
///
/// Bins are half-open `[edge_i, edge_i+1)` except the last, which also
/// takes values equal to `hi`. Values outside the range are not counted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub edges:  Vec<f64>,
    pub counts: Vec<u64>,
}

impl Histogram {
    pub fn build<I>(values: I, bins: usize, range: (f64, f64)) -> SimResult<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let (lo, hi) = range;
        if bins == 0 {
            return Err(SimError::invalid("histogram needs at least one bin"));
        }
        if !(lo.is_finite() && hi.is_finite() && hi > lo) {
            return Err(SimError::invalid(format!(
                "histogram range [{lo}, {hi}] is empty or not finite"
            )));
        }

        let width = (hi - lo) / bins as f64;
        let edges = (0..=bins).map(|i| lo + width * i as f64).collect();
        let mut counts = vec![0u64; bins];

        for value in values {
            if !(lo..=hi).contains(&value) {
                continue;
            }
            let index = (((value - lo) / (hi - lo)) * bins as f64) as usize;
            counts[index.min(bins - 1)] += 1;
        }

        Ok(Self { edges, counts })
    }

    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn cumulative_percent(&self) -> Vec<f64> {
        cumulative_percent(&self.counts)
    }
}

/// Histogram of one side's per-trial electoral-vote totals.
pub fn vote_histogram(
    aggregate: &AggregateResult,
    side: Side,
    bins: usize,
    range: (f64, f64),
) -> SimResult<Histogram> {
    Histogram::build(
        aggregate.per_trial_votes(side).iter().map(|v| f64::from(*v)),
        bins,
        range,
    )
}

/// Running sum of `counts` divided by their total, scaled to 100.
/// An all-zero histogram yields all zeros.
pub fn cumulative_percent(counts: &[u64]) -> Vec<f64> {
    let total: u64 = counts.iter().sum();
    if total == 0 {
        return vec![0.0; counts.len()];
    }
    let mut running = 0u64;
    counts
        .iter()
        .map(|c| {
            running += c;
            running as f64 * 100.0 / total as f64
        })
        .collect()
}

// ── Per-state queries ───────────────────────────────────────────────

/// Number of trials in which `state` went to someone other than
/// `reference_label`.
pub fn flip_count(
    aggregate: &AggregateResult,
    state: &str,
    reference_label: &str,
) -> SimResult<usize> {
    let index = aggregate
        .state_index(state)
        .ok_or_else(|| SimError::invalid(format!("unknown state '{state}'")))?;
    let reference = aggregate
        .candidates()
        .side_of(reference_label)
        .ok_or_else(|| SimError::invalid(format!("unknown candidate '{reference_label}'")))?;

    Ok(aggregate
        .per_trial_state_map()
        .iter()
        .filter(|map| map.get(index) != Some(reference))
        .count())
}

/// How a state that split its trials evenly is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalTiePolicy {
    FavorA,
    /// "Not-A wins on tie".
    #[default]
    FavorB,
    /// Report the state as a tie.
    Undecided,
}

impl ModalTiePolicy {
    fn resolve(self) -> Outcome {
        match self {
            Self::FavorA    => Outcome::A,
            Self::FavorB    => Outcome::B,
            Self::Undecided => Outcome::Tie,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModalState {
    pub state:  StateName,
    pub wins_a: usize,
    pub wins_b: usize,
    pub winner: Outcome,
}

/// For each state, in input order, the side that carried it in more trials.
pub fn modal_map(aggregate: &AggregateResult, policy: ModalTiePolicy) -> Vec<ModalState> {
    let mut wins_a = vec![0usize; aggregate.state_names().len()];
    for map in aggregate.per_trial_state_map() {
        for (count, side) in wins_a.iter_mut().zip(map.sides()) {
            if *side == Side::A {
                *count += 1;
            }
        }
    }

    aggregate
        .state_names()
        .iter()
        .zip(wins_a)
        .map(|(name, wins_a)| {
            let wins_b = aggregate.trial_count() - wins_a;
            let winner = match wins_a.cmp(&wins_b) {
                std::cmp::Ordering::Greater => Outcome::A,
                std::cmp::Ordering::Less    => Outcome::B,
                std::cmp::Ordering::Equal   => policy.resolve(),
            };
            ModalState {
                state: name.clone(),
                wins_a,
                wins_b,
                winner,
            }
        })
        .collect()
}
