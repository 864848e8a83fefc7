//! Injected random sources.
//!
//! RULE: Nothing in the engine may call any platform RNG.
//! Every uniform draw comes from a `RandomSource` handed to the engine
//! by its caller, so a run is fully reproducible from its source.
//!
//! Partitioned runs get one PCG stream per partition, seeded
//! deterministically from (master_seed XOR partition_index * φ64). This means:
//!   - Partitions never share or overlap a stream.
//!   - Each partition's draws are reproducible in isolation.

use crate::error::{SimError, SimResult};
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// Anything that can produce uniform draws in [0.0, 1.0).
pub trait RandomSource {
    /// Produce the next uniform value in [0.0, 1.0).
    fn next_uniform(&mut self) -> SimResult<f64>;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_uniform(&mut self) -> SimResult<f64> {
        (**self).next_uniform()
    }
}

/// Seeded, infinite PCG stream. The default source for real runs.
pub struct PcgSource {
    pub seed: u64,
    inner: Pcg64Mcg,
}

impl PcgSource {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Roll a float in [0.0, 1.0) from the top 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

impl RandomSource for PcgSource {
    fn next_uniform(&mut self) -> SimResult<f64> {
        Ok(self.next_f64())
    }
}

/// Finite, pre-recorded sequence of draws.
/// Used to replay a run exactly, and in tests.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    draws:  Vec<f64>,
    cursor: usize,
}

impl ReplaySource {
    /// Every draw must lie in [0.0, 1.0); NaN is rejected.
    pub fn new(draws: Vec<f64>) -> SimResult<Self> {
        if let Some((index, value)) = draws
            .iter()
            .enumerate()
            .find(|(_, value)| !is_unit_draw(**value))
        {
            return Err(SimError::invalid(format!(
                "replay draw {index} is {value}, outside [0, 1)"
            )));
        }
        Ok(Self { draws, cursor: 0 })
    }

    pub fn remaining(&self) -> usize {
        self.draws.len() - self.cursor
    }
}

impl RandomSource for ReplaySource {
    fn next_uniform(&mut self) -> SimResult<f64> {
        let value = self
            .draws
            .get(self.cursor)
            .copied()
            .ok_or(SimError::RandomSourceExhausted { draws: self.cursor as u64 })?;
        self.cursor += 1;
        Ok(value)
    }
}

/// Returns the same value forever.
#[derive(Debug, Clone, Copy)]
pub struct ConstantSource(f64);

impl ConstantSource {
    pub fn new(value: f64) -> SimResult<Self> {
        if !is_unit_draw(value) {
            return Err(SimError::invalid(format!(
                "constant draw {value} is outside [0, 1)"
            )));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl RandomSource for ConstantSource {
    fn next_uniform(&mut self) -> SimResult<f64> {
        Ok(self.0)
    }
}

/// True for values in [0.0, 1.0). False for NaN.
fn is_unit_draw(value: f64) -> bool {
    (0.0..1.0).contains(&value)
}

/// Hands out independent PCG streams, one per partition of a run.
pub struct StreamBank {
    master_seed: u64,
}

impl StreamBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    /// The index must be stable for a given partition layout.
    pub fn for_partition(&self, index: u64) -> PcgSource {
        PcgSource::new(self.master_seed ^ index.wrapping_mul(0x9e37_79b9_7f4a_7c15))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcg_draws_stay_in_unit_interval() {
        let mut rng = PcgSource::new(7);
        for _ in 0..10_000 {
            let u = rng.next_f64();
            assert!((0.0..1.0).contains(&u), "draw {u} outside [0, 1)");
        }
    }

    #[test]
    fn same_seed_same_stream() {
        let mut a = PcgSource::new(12345);
        let mut b = PcgSource::new(12345);
        for _ in 0..100 {
            assert_eq!(a.next_f64().to_bits(), b.next_f64().to_bits());
        }
    }

    #[test]
    fn partitions_get_distinct_streams() {
        let bank = StreamBank::new(42);
        let mut first = bank.for_partition(0);
        let mut second = bank.for_partition(1);
        let a: Vec<f64> = (0..8).map(|_| first.next_f64()).collect();
        let b: Vec<f64> = (0..8).map(|_| second.next_f64()).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn replay_source_reports_exhaustion() {
        let mut src = ReplaySource::new(vec![0.1, 0.2]).unwrap();
        assert_eq!(src.next_uniform().unwrap(), 0.1);
        assert_eq!(src.next_uniform().unwrap(), 0.2);
        assert_eq!(src.remaining(), 0);
        match src.next_uniform() {
            Err(SimError::RandomSourceExhausted { draws }) => assert_eq!(draws, 2),
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }

    #[test]
    fn constant_source_rejects_draws_outside_unit_interval() {
        for value in [1.0, 1.5, -0.1, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(ConstantSource::new(value), Err(SimError::InvalidInput { .. })),
                "constant draw {value} should be rejected"
            );
        }
        let mut src = ConstantSource::new(0.0).unwrap();
        assert_eq!(src.next_uniform().unwrap(), 0.0);
        assert_eq!(ConstantSource::new(0.3).unwrap().value(), 0.3);
    }

    #[test]
    fn replay_source_rejects_draws_outside_unit_interval() {
        assert!(matches!(
            ReplaySource::new(vec![0.2, 1.0]),
            Err(SimError::InvalidInput { .. })
        ));
        assert!(matches!(
            ReplaySource::new(vec![f64::NAN]),
            Err(SimError::InvalidInput { .. })
        ));
        assert!(ReplaySource::new(vec![0.0, 0.999_999]).is_ok());
    }

    #[test]
    fn certain_state_stays_with_a_for_any_accepted_draw() {
        use crate::{engine::ElectionEngine, outcome::Outcome, state::StateRecord};

        let mut engine =
            ElectionEngine::new(vec![StateRecord::new("Everywhere", 1.0, 538)], "A", "B").unwrap();
        let largest = 1.0 - f64::EPSILON / 2.0;
        let mut source = ConstantSource::new(largest).unwrap();
        let result = engine.run(3, &mut source).unwrap();
        assert!(result.per_trial_winner().iter().all(|w| *w == Outcome::A));
    }
}
