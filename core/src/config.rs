use crate::{
    analysis::ModalTiePolicy,
    error::{SimError, SimResult},
    outcome::{Candidates, Side},
    types::{Votes, DEFAULT_MAJORITY_THRESHOLD},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramConfig {
    pub bins: usize,
    pub lo:   f64,
    pub hi:   f64,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        // 40 bins over [0, 540] spans the full 538-vote college.
        Self { bins: 40, lo: 0.0, hi: 540.0 }
    }
}

/// A state whose flips are reported: trials it went against `reference`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlipProbe {
    pub state:     String,
    pub reference: Side,
}

/// Everything a run needs besides the state table.
/// Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub candidate_a:        String,
    pub candidate_b:        String,
    pub majority_threshold: Votes,
    pub trials:             usize,
    pub seed:               u64,
    /// 1 runs sequentially; more splits the trials across threads.
    pub partitions:         usize,
    pub input_file:         Option<String>,
    pub histogram:          HistogramConfig,
    pub flip_probes:        Vec<FlipProbe>,
    pub modal_tie_policy:   ModalTiePolicy,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            candidate_a:        "Republican".into(),
            candidate_b:        "Democrat".into(),
            majority_threshold: DEFAULT_MAJORITY_THRESHOLD,
            trials:             10_000,
            seed:               42,
            partitions:         1,
            input_file:         None,
            histogram:          HistogramConfig::default(),
            flip_probes: vec![
                FlipProbe { state: "California".into(), reference: Side::B },
                FlipProbe { state: "Texas".into(),      reference: Side::A },
            ],
            modal_tie_policy:   ModalTiePolicy::default(),
        }
    }
}

impl SimConfig {
    /// Load from a JSON file. Missing fields fall back to defaults.
    pub fn load(path: &str) -> SimResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SimError::io(path, e))?;
        let config = Self::from_json_str(&content)?;
        log::debug!("Loaded config from {path}");
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> SimResult<Self> {
        let config: SimConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SimResult<()> {
        self.candidates()?;
        if self.trials == 0 {
            return Err(SimError::invalid("trials must be positive"));
        }
        if self.partitions == 0 {
            return Err(SimError::invalid("partitions must be positive"));
        }
        Ok(())
    }

    pub fn candidates(&self) -> SimResult<Candidates> {
        Candidates::new(self.candidate_a.as_str(), self.candidate_b.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SimConfig::from_json_str(
            r#"{ "candidate_a": "Trump", "candidate_b": "Biden", "trials": 500 }"#,
        )
        .unwrap();
        assert_eq!(config.candidate_a, "Trump");
        assert_eq!(config.trials, 500);
        assert_eq!(config.majority_threshold, 270);
        assert_eq!(config.histogram.bins, 40);
        assert_eq!(config.modal_tie_policy, ModalTiePolicy::FavorB);
    }

    #[test]
    fn rejects_equal_candidates() {
        let result = SimConfig::from_json_str(r#"{ "candidate_a": "X", "candidate_b": "X" }"#);
        assert!(matches!(result, Err(SimError::InvalidInput { .. })));
    }

    #[test]
    fn flip_probes_parse_side_names() {
        let config = SimConfig::from_json_str(
            r#"{ "flip_probes": [ { "state": "Ohio", "reference": "a" } ],
                 "modal_tie_policy": "undecided" }"#,
        )
        .unwrap();
        assert_eq!(config.flip_probes[0].reference, Side::A);
        assert_eq!(config.modal_tie_policy, ModalTiePolicy::Undecided);
    }

    #[test]
    fn missing_config_file_is_io_error() {
        assert!(matches!(
            SimConfig::load("/nonexistent/run.json"),
            Err(SimError::Io { .. })
        ));
    }
}
