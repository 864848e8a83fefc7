//! End-of-run report — the summary handed to printing and plotting code.

use crate::{
    analysis::{self, ModalState, OutcomeOdds, VoteSummary},
    config::SimConfig,
    engine::AggregateResult,
    error::SimResult,
    outcome::{Candidates, Side},
    types::Votes,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CumulativeDistribution {
    pub centers:            Vec<f64>,
    pub cumulative_percent: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlipReport {
    pub state:     String,
    pub reference: String,
    pub flips:     usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id:             String,
    pub generated_at:       DateTime<Utc>,
    pub seed:               u64,
    pub partitions:         usize,
    pub trials:             usize,
    pub candidates:         Candidates,
    pub majority_threshold: Votes,
    pub overall_winner:     String,
    pub odds:               OutcomeOdds,
    pub votes_a:            VoteSummary,
    pub votes_b:            VoteSummary,
    pub cumulative_a:       CumulativeDistribution,
    pub cumulative_b:       CumulativeDistribution,
    pub flips:              Vec<FlipReport>,
    pub modal_map:          Vec<ModalState>,
}

impl RunReport {
    /// Summarize `aggregate` using the histogram, probe and tie-policy
    /// settings in `config`. Probes naming unknown states are skipped.
    pub fn build(aggregate: &AggregateResult, config: &SimConfig) -> SimResult<Self> {
        let candidates = aggregate.candidates().clone();

        let mut flips = Vec::with_capacity(config.flip_probes.len());
        for probe in &config.flip_probes {
            let reference = candidates.label(probe.reference);
            if aggregate.state_index(&probe.state).is_none() {
                log::warn!("Flip probe '{}' is not in the state table; skipped", probe.state);
                continue;
            }
            flips.push(FlipReport {
                state:     probe.state.clone(),
                reference: reference.to_string(),
                flips:     analysis::flip_count(aggregate, &probe.state, reference)?,
            });
        }

        Ok(Self {
            run_id:             format!("run-{}", uuid::Uuid::new_v4()),
            generated_at:       Utc::now(),
            seed:               config.seed,
            partitions:         config.partitions,
            trials:             aggregate.trial_count(),
            majority_threshold: aggregate.majority_threshold(),
            overall_winner:     aggregate.overall_winner_label().to_string(),
            odds:               analysis::outcome_odds(aggregate),
            votes_a:            analysis::vote_summary(aggregate, Side::A),
            votes_b:            analysis::vote_summary(aggregate, Side::B),
            cumulative_a:       cumulative(aggregate, Side::A, config)?,
            cumulative_b:       cumulative(aggregate, Side::B, config)?,
            flips,
            modal_map:          analysis::modal_map(aggregate, config.modal_tie_policy),
            candidates,
        })
    }

    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn cumulative(
    aggregate: &AggregateResult,
    side: Side,
    config: &SimConfig,
) -> SimResult<CumulativeDistribution> {
    let shape = &config.histogram;
    let histogram = analysis::vote_histogram(aggregate, side, shape.bins, (shape.lo, shape.hi))?;
    Ok(CumulativeDistribution {
        centers:            histogram.centers(),
        cumulative_percent: histogram.cumulative_percent(),
    })
}
