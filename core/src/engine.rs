//! The simulation engine — draws independent elections and aggregates them.
//!
//! PER-TRIAL ORDER (fixed, documented, never reordered):
//!   1. One uniform draw per state, in input order. A wins iff u < p.
//!   2. Electoral votes summed per side.
//!   3. Trial winner: A if votes_a >= threshold, else B if
//!      votes_b >= threshold, else tie. A is checked first.
//!   4. Map, totals and winner appended to the aggregate.
//!
//! RULES:
//!   - Trials never read each other's results.
//!   - All randomness flows through the injected RandomSource.
//!   - A run is all-or-nothing: a failed run stores no aggregate.
//!   - The engine is not meant to be shared between callers;
//!     `run` takes `&mut self`.

use crate::{
    config::SimConfig,
    error::{SimError, SimResult},
    outcome::{Candidates, Outcome, Side},
    rng::{RandomSource, StreamBank},
    state::{StateRecord, StateTable},
    types::{StateName, TrialIndex, Votes, DEFAULT_MAJORITY_THRESHOLD},
};
use rayon::prelude::*;
use serde::Serialize;

/// Winner of every state in one trial, in the input table's order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateMap(Vec<Side>);

impl StateMap {
    pub fn get(&self, state_index: usize) -> Option<Side> {
        self.0.get(state_index).copied()
    }

    pub fn sides(&self) -> &[Side] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One simulated election.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialResult {
    pub winner_by_state: StateMap,
    pub votes_a:         Votes,
    pub votes_b:         Votes,
    pub winner:          Outcome,
}

/// Everything a run produced, in trial-execution order.
/// The four per-trial sequences are parallel: index i is trial i.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    candidates:          Candidates,
    state_names:         Vec<StateName>,
    majority_threshold:  Votes,
    trial_count:         usize,
    per_trial_winner:    Vec<Outcome>,
    per_trial_votes_a:   Vec<Votes>,
    per_trial_votes_b:   Vec<Votes>,
    per_trial_state_map: Vec<StateMap>,
    overall_winner:      Outcome,
}

impl AggregateResult {
    pub fn candidates(&self) -> &Candidates {
        &self.candidates
    }

    pub fn state_names(&self) -> &[StateName] {
        &self.state_names
    }

    pub fn majority_threshold(&self) -> Votes {
        self.majority_threshold
    }

    pub fn state_index(&self, name: &str) -> Option<usize> {
        self.state_names.iter().position(|n| n == name)
    }

    pub fn trial_count(&self) -> usize {
        self.trial_count
    }

    pub fn per_trial_winner(&self) -> &[Outcome] {
        &self.per_trial_winner
    }

    pub fn per_trial_votes_a(&self) -> &[Votes] {
        &self.per_trial_votes_a
    }

    pub fn per_trial_votes_b(&self) -> &[Votes] {
        &self.per_trial_votes_b
    }

    pub fn per_trial_votes(&self, side: Side) -> &[Votes] {
        match side {
            Side::A => &self.per_trial_votes_a,
            Side::B => &self.per_trial_votes_b,
        }
    }

    pub fn per_trial_state_map(&self) -> &[StateMap] {
        &self.per_trial_state_map
    }

    pub fn overall_winner(&self) -> Outcome {
        self.overall_winner
    }

    pub fn overall_winner_label(&self) -> &str {
        self.candidates.outcome_label(self.overall_winner)
    }

    /// Number of trials that ended in `outcome`.
    pub fn wins(&self, outcome: Outcome) -> usize {
        self.per_trial_winner.iter().filter(|w| **w == outcome).count()
    }

    /// Label of the candidate who carried `state` in `trial`.
    pub fn state_winner(&self, trial: TrialIndex, state: &str) -> Option<&str> {
        let index = self.state_index(state)?;
        let side = self.per_trial_state_map.get(trial)?.get(index)?;
        Some(self.candidates.label(side))
    }

    /// The (state name, winner label) pairs of one trial, in input order.
    pub fn trial_map(&self, trial: TrialIndex) -> Option<Vec<(&str, &str)>> {
        let map = self.per_trial_state_map.get(trial)?;
        Some(
            self.state_names
                .iter()
                .zip(map.sides())
                .map(|(name, side)| (name.as_str(), self.candidates.label(*side)))
                .collect(),
        )
    }
}

/// Accumulates trials until a run is complete.
#[derive(Debug, Default)]
struct AggregateBuilder {
    winners:    Vec<Outcome>,
    votes_a:    Vec<Votes>,
    votes_b:    Vec<Votes>,
    state_maps: Vec<StateMap>,
}

impl AggregateBuilder {
    fn with_capacity(trials: usize) -> Self {
        Self {
            winners:    Vec::with_capacity(trials),
            votes_a:    Vec::with_capacity(trials),
            votes_b:    Vec::with_capacity(trials),
            state_maps: Vec::with_capacity(trials),
        }
    }

    fn push(&mut self, trial: TrialResult) {
        self.winners.push(trial.winner);
        self.votes_a.push(trial.votes_a);
        self.votes_b.push(trial.votes_b);
        self.state_maps.push(trial.winner_by_state);
    }

    fn append(&mut self, other: AggregateBuilder) {
        self.winners.extend(other.winners);
        self.votes_a.extend(other.votes_a);
        self.votes_b.extend(other.votes_b);
        self.state_maps.extend(other.state_maps);
    }

    fn finish(
        self,
        candidates: Candidates,
        state_names: Vec<StateName>,
        majority_threshold: Votes,
    ) -> AggregateResult {
        let overall_winner = overall_winner(&self.winners);
        AggregateResult {
            candidates,
            state_names,
            majority_threshold,
            trial_count:         self.winners.len(),
            per_trial_winner:    self.winners,
            per_trial_votes_a:   self.votes_a,
            per_trial_votes_b:   self.votes_b,
            per_trial_state_map: self.state_maps,
            overall_winner,
        }
    }
}

pub struct ElectionEngine {
    states:             StateTable,
    candidates:         Candidates,
    majority_threshold: Votes,
    aggregate:          Option<AggregateResult>,
}

impl ElectionEngine {
    /// Build an engine with the default 270-vote majority threshold.
    pub fn new(
        states: Vec<StateRecord>,
        candidate_a: &str,
        candidate_b: &str,
    ) -> SimResult<Self> {
        Ok(Self {
            states:             StateTable::new(states)?,
            candidates:         Candidates::new(candidate_a, candidate_b)?,
            majority_threshold: DEFAULT_MAJORITY_THRESHOLD,
            aggregate:          None,
        })
    }

    /// Build an engine from the candidate labels and threshold in `config`.
    pub fn from_config(states: Vec<StateRecord>, config: &SimConfig) -> SimResult<Self> {
        Ok(Self::new(states, &config.candidate_a, &config.candidate_b)?
            .with_majority_threshold(config.majority_threshold))
    }

    pub fn with_majority_threshold(mut self, threshold: Votes) -> Self {
        self.majority_threshold = threshold;
        self
    }

    pub fn states(&self) -> &StateTable {
        &self.states
    }

    pub fn candidates(&self) -> &Candidates {
        &self.candidates
    }

    pub fn majority_threshold(&self) -> Votes {
        self.majority_threshold
    }

    /// The result of the last successful run, if any.
    pub fn aggregate(&self) -> Option<&AggregateResult> {
        self.aggregate.as_ref()
    }

    /// Run `trial_count` trials sequentially, drawing from `rng`.
    /// Replaces any previous aggregate.
    pub fn run<R: RandomSource + ?Sized>(
        &mut self,
        trial_count: usize,
        rng: &mut R,
    ) -> SimResult<&AggregateResult> {
        if trial_count == 0 {
            return Err(SimError::invalid("trial count must be positive"));
        }
        self.aggregate = None;
        log::debug!(
            "Running {trial_count} trials over {} states (threshold {})",
            self.states.state_count(),
            self.majority_threshold
        );

        let mut builder = AggregateBuilder::with_capacity(trial_count);
        for _ in 0..trial_count {
            builder.push(self.simulate_trial(rng)?);
        }

        Ok(self.store(builder))
    }

    /// Run `trial_count` trials split into contiguous partitions executed
    /// in parallel. Partition i draws from `StreamBank::for_partition(i)`,
    /// and results are merged in partition order, so the aggregate is
    /// reproducible for a fixed (master_seed, partitions) pair.
    pub fn run_partitioned(
        &mut self,
        trial_count: usize,
        master_seed: u64,
        partitions: usize,
    ) -> SimResult<&AggregateResult> {
        if trial_count == 0 {
            return Err(SimError::invalid("trial count must be positive"));
        }
        if partitions == 0 {
            return Err(SimError::invalid("partition count must be positive"));
        }
        self.aggregate = None;

        let sizes = partition_sizes(trial_count, partitions);
        log::debug!(
            "Running {trial_count} trials in {} partitions (seed {master_seed})",
            sizes.len()
        );

        let bank = StreamBank::new(master_seed);
        let engine: &ElectionEngine = self;
        let chunks: Vec<SimResult<AggregateBuilder>> = sizes
            .into_par_iter()
            .enumerate()
            .map(|(index, size)| {
                let mut rng = bank.for_partition(index as u64);
                let mut chunk = AggregateBuilder::with_capacity(size);
                for _ in 0..size {
                    chunk.push(engine.simulate_trial(&mut rng)?);
                }
                Ok(chunk)
            })
            .collect();

        let mut builder = AggregateBuilder::with_capacity(trial_count);
        for chunk in chunks {
            builder.append(chunk?);
        }

        Ok(self.store(builder))
    }

    /// Simulate one election. Does not touch the stored aggregate.
    pub fn simulate_trial<R: RandomSource + ?Sized>(&self, rng: &mut R) -> SimResult<TrialResult> {
        let records = self.states.records();
        let mut sides = Vec::with_capacity(records.len());
        let mut votes_a: Votes = 0;
        let mut votes_b: Votes = 0;

        for record in records {
            let u = rng.next_uniform()?;
            if u < record.win_probability {
                votes_a += record.electoral_votes;
                sides.push(Side::A);
            } else {
                votes_b += record.electoral_votes;
                sides.push(Side::B);
            }
        }

        Ok(TrialResult {
            winner_by_state: StateMap(sides),
            votes_a,
            votes_b,
            winner: decide_trial_winner(votes_a, votes_b, self.majority_threshold),
        })
    }

    fn store(&mut self, builder: AggregateBuilder) -> &AggregateResult {
        let aggregate = builder.finish(
            self.candidates.clone(),
            self.states.names(),
            self.majority_threshold,
        );
        log::info!(
            "Run complete: {} trials, overall winner {}",
            aggregate.trial_count(),
            aggregate.overall_winner_label()
        );
        self.aggregate.insert(aggregate)
    }
}

/// A wins on reaching the threshold; B is only considered if A did not.
pub fn decide_trial_winner(votes_a: Votes, votes_b: Votes, threshold: Votes) -> Outcome {
    if votes_a >= threshold {
        Outcome::A
    } else if votes_b >= threshold {
        Outcome::B
    } else {
        Outcome::Tie
    }
}

/// The side with strictly more trial wins; equal counts are a tie.
pub fn overall_winner(per_trial_winner: &[Outcome]) -> Outcome {
    let wins_a = per_trial_winner.iter().filter(|w| **w == Outcome::A).count();
    let wins_b = per_trial_winner.iter().filter(|w| **w == Outcome::B).count();
    match wins_a.cmp(&wins_b) {
        std::cmp::Ordering::Greater => Outcome::A,
        std::cmp::Ordering::Less    => Outcome::B,
        std::cmp::Ordering::Equal   => Outcome::Tie,
    }
}

/// Split `trials` into at most `partitions` contiguous, non-empty chunks.
/// Earlier chunks absorb the remainder.
fn partition_sizes(trials: usize, partitions: usize) -> Vec<usize> {
    let partitions = partitions.min(trials).max(1);
    let base = trials / partitions;
    let extra = trials % partitions;
    (0..partitions)
        .map(|i| base + usize::from(i < extra))
        .collect()
}
