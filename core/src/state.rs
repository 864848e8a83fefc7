//! Per-state input records and the validated table the engine owns.

use crate::{
    error::{SimError, SimResult},
    types::{StateName, Votes},
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    pub name:            StateName,
    /// Probability candidate A carries the state in a single trial.
    pub win_probability: f64,
    pub electoral_votes: Votes,
}

impl StateRecord {
    pub fn new(name: impl Into<StateName>, win_probability: f64, electoral_votes: Votes) -> Self {
        Self {
            name: name.into(),
            win_probability,
            electoral_votes,
        }
    }
}

/// An immutable, validated set of states in input order.
#[derive(Debug, Clone)]
pub struct StateTable {
    records:     Vec<StateRecord>,
    total_votes: Votes,
}

impl StateTable {
    pub fn new(records: Vec<StateRecord>) -> SimResult<Self> {
        if records.is_empty() {
            return Err(SimError::invalid("state table is empty"));
        }

        let total = {
            let mut seen = HashSet::with_capacity(records.len());
            let mut total: u64 = 0;
            for record in &records {
                if record.name.trim().is_empty() {
                    return Err(SimError::invalid("state name is empty"));
                }
                if !seen.insert(record.name.as_str()) {
                    return Err(SimError::invalid(format!(
                        "duplicate state '{}'",
                        record.name
                    )));
                }
                // NaN fails this check too.
                if !(0.0..=1.0).contains(&record.win_probability) {
                    return Err(SimError::invalid(format!(
                        "win probability {} for '{}' is outside [0, 1]",
                        record.win_probability, record.name
                    )));
                }
                total += u64::from(record.electoral_votes);
            }
            total
        };

        let total_votes = Votes::try_from(total)
            .map_err(|_| SimError::invalid(format!("total electoral votes {total} overflow")))?;

        Ok(Self { records, total_votes })
    }

    pub fn records(&self) -> &[StateRecord] {
        &self.records
    }

    /// Never zero: the constructor rejects an empty table.
    pub fn state_count(&self) -> usize {
        self.records.len()
    }

    pub fn total_votes(&self) -> Votes {
        self.total_votes
    }

    pub fn names(&self) -> Vec<StateName> {
        self.records.iter().map(|r| r.name.clone()).collect()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.records.iter().position(|r| r.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_table() {
        assert!(matches!(
            StateTable::new(Vec::new()),
            Err(SimError::InvalidInput { .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_probability() {
        for p in [-0.01, 1.01, f64::NAN] {
            let result = StateTable::new(vec![StateRecord::new("Ohio", p, 17)]);
            assert!(
                matches!(result, Err(SimError::InvalidInput { .. })),
                "probability {p} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_duplicate_names() {
        let result = StateTable::new(vec![
            StateRecord::new("Ohio", 0.5, 17),
            StateRecord::new("Ohio", 0.4, 17),
        ]);
        assert!(matches!(result, Err(SimError::InvalidInput { .. })));
    }

    #[test]
    fn accepts_boundary_probabilities_and_sums_votes() {
        let table = StateTable::new(vec![
            StateRecord::new("Utah", 1.0, 6),
            StateRecord::new("Vermont", 0.0, 3),
        ])
        .unwrap();
        assert_eq!(table.total_votes(), 9);
        assert_eq!(table.index_of("Vermont"), Some(1));
        assert_eq!(table.index_of("Maine"), None);
    }
}
