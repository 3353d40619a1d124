//! Random-draw capability.
//!
//! Every operation that shuffles or samples takes a `RandomSource` explicitly,
//! so tests can replay exact draws with `SequenceSource` and production code can
//! plug in any `rand::Rng`.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum EntropyError {
    #[error("random source exhausted after {draws} draws")]
    Exhausted { draws: usize },

    #[error("random source produced {value}, expected a value in [0, 1)")]
    OutOfRange { value: f64 },
}

/// Source of uniform draws in `[0, 1)`.
pub trait RandomSource {
    /// Draw the next uniform value.
    ///
    /// # Errors
    ///
    /// Returns `EntropyError` when the source cannot produce a value.
    fn next_unit(&mut self) -> Result<f64, EntropyError>;

    /// Draw an index in `0..upper`. Returns `0` when `upper` is `0`.
    ///
    /// # Errors
    ///
    /// Propagates `EntropyError` from `next_unit`.
    fn pick_index(&mut self, upper: usize) -> Result<usize, EntropyError> {
        if upper == 0 {
            return Ok(0);
        }
        let unit = self.next_unit()?;
        if !(0.0..1.0).contains(&unit) {
            return Err(EntropyError::OutOfRange { value: unit });
        }
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        let index = (unit * upper as f64) as usize;
        Ok(index.min(upper - 1))
    }
}

/// Fair in-place Fisher–Yates shuffle.
///
/// # Errors
///
/// Propagates `EntropyError` from the source; the slice may be partially shuffled.
pub fn shuffle<T, R>(source: &mut R, items: &mut [T]) -> Result<(), EntropyError>
where
    R: RandomSource + ?Sized,
{
    for i in (1..items.len()).rev() {
        let j = source.pick_index(i + 1)?;
        items.swap(i, j);
    }
    Ok(())
}

/// Draw `count` distinct items uniformly at random, or all of them if `count`
/// exceeds the slice length.
///
/// # Errors
///
/// Propagates `EntropyError` from the source.
pub fn sample<T, R>(source: &mut R, items: &[T], count: usize) -> Result<Vec<T>, EntropyError>
where
    T: Clone,
    R: RandomSource + ?Sized,
{
    let mut pool = items.to_vec();
    let take = count.min(pool.len());
    for i in 0..take {
        let j = i + source.pick_index(pool.len() - i)?;
        pool.swap(i, j);
    }
    pool.truncate(take);
    Ok(pool)
}

//
// ─── ADAPTERS ──────────────────────────────────────────────────────────────────
//

/// Adapter over any `rand::Rng`.
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<ThreadRng> {
    #[must_use]
    pub fn thread() -> Self {
        Self::new(rand::rng())
    }
}

impl RngSource<StdRng> {
    /// `StdRng` seeded from the operating system; `Send`, unlike the thread RNG.
    #[must_use]
    pub fn from_os() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// Reproducible source for simulations and tests.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> Result<f64, EntropyError> {
        Ok(self.rng.random::<f64>())
    }
}

/// Replays a fixed list of draws, then reports exhaustion.
#[derive(Debug, Clone, Default)]
pub struct SequenceSource {
    values: Vec<f64>,
    position: usize,
}

impl SequenceSource {
    #[must_use]
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            position: 0,
        }
    }

    /// A source that always answers `value`, useful for "take the first/last" draws.
    #[must_use]
    pub fn repeating(value: f64, count: usize) -> Self {
        Self::new(vec![value; count])
    }

    #[must_use]
    pub fn draws(&self) -> usize {
        self.position
    }
}

impl RandomSource for SequenceSource {
    fn next_unit(&mut self) -> Result<f64, EntropyError> {
        let value = *self
            .values
            .get(self.position)
            .ok_or(EntropyError::Exhausted {
                draws: self.position,
            })?;
        self.position += 1;
        if !(0.0..1.0).contains(&value) {
            return Err(EntropyError::OutOfRange { value });
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pick_index_maps_unit_interval() {
        let mut source = SequenceSource::new([0.0, 0.5, 0.999]);
        assert_eq!(source.pick_index(4).unwrap(), 0);
        assert_eq!(source.pick_index(4).unwrap(), 2);
        assert_eq!(source.pick_index(4).unwrap(), 3);
    }

    #[test]
    fn sequence_reports_exhaustion() {
        let mut source = SequenceSource::new([0.1]);
        source.next_unit().unwrap();
        let err = source.next_unit().unwrap_err();
        assert_eq!(err, EntropyError::Exhausted { draws: 1 });
    }

    #[test]
    fn sequence_rejects_out_of_range() {
        let mut source = SequenceSource::new([1.0]);
        assert!(matches!(
            source.next_unit(),
            Err(EntropyError::OutOfRange { .. })
        ));
    }

    #[test]
    fn shuffle_keeps_every_item() {
        let mut source = RngSource::seeded(7);
        let mut items: Vec<u32> = (0..20).collect();
        shuffle(&mut source, &mut items).unwrap();
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn shuffle_is_replayable() {
        let mut a: Vec<u32> = (0..10).collect();
        let mut b = a.clone();
        shuffle(&mut RngSource::seeded(99), &mut a).unwrap();
        shuffle(&mut RngSource::seeded(99), &mut b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn sample_caps_at_pool_size() {
        let mut source = RngSource::seeded(1);
        let picked = sample(&mut source, &["a", "b"], 5).unwrap();
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn sample_draws_distinct_items() {
        let mut source = SequenceSource::repeating(0.0, 3);
        let picked = sample(&mut source, &[1, 2, 3, 4, 5], 3).unwrap();
        assert_eq!(picked, vec![1, 2, 3]);
    }
}
