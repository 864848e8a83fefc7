//! State-table loader.
//!
//! Format: comma-separated, no header row, one state per line:
//!   name,probability,votes
//! Surrounding whitespace is trimmed and blank lines are skipped.

use crate::{
    error::{SimError, SimResult},
    state::StateRecord,
    types::Votes,
};

pub fn load_states(path: &str) -> SimResult<Vec<StateRecord>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| SimError::io(path, e))?;
    let records = parse_states(&content)?;
    log::debug!("Loaded {} states from {path}", records.len());
    Ok(records)
}

pub fn parse_states(content: &str) -> SimResult<Vec<StateRecord>> {
    let mut records = Vec::new();
    for (index, raw) in content.lines().enumerate() {
        let line = index + 1;
        if raw.trim().is_empty() {
            log::trace!("Skipping blank line {line}");
            continue;
        }
        records.push(parse_line(raw, line)?);
    }
    Ok(records)
}

fn parse_line(raw: &str, line: usize) -> SimResult<StateRecord> {
    let fields: Vec<&str> = raw.split(',').map(str::trim).collect();
    let [name, probability, votes] = fields.as_slice() else {
        return Err(SimError::Parse {
            line,
            reason: format!("expected 3 fields, found {}", fields.len()),
        });
    };

    let win_probability: f64 = probability.parse().map_err(|_| SimError::Parse {
        line,
        reason: format!("'{probability}' is not a number"),
    })?;
    let votes: i64 = votes.parse().map_err(|_| SimError::Parse {
        line,
        reason: format!("'{votes}' is not an integer"),
    })?;
    if votes < 0 {
        return Err(SimError::invalid(format!(
            "'{name}' has negative electoral votes ({votes}) on line {line}"
        )));
    }
    let electoral_votes = Votes::try_from(votes).map_err(|_| SimError::Parse {
        line,
        reason: format!("{votes} electoral votes is out of range"),
    })?;

    Ok(StateRecord::new(*name, win_probability, electoral_votes))
}
