//! History-weighted choice of the next paired question.
//!
//! Unseen questions weigh the most, recently missed ones weigh more than
//! mastered ones, and nothing drops to zero so every question stays reachable.

use crate::model::{AnswerHistory, HistoryMap, PairedQuestionId};
use crate::random::{EntropyError, RandomSource};

/// Weight of a question with no recorded answers.
pub const UNSEEN_WEIGHT: f64 = 10.0;

/// Weight when every recent answer was wrong.
pub const MISSED_WEIGHT: f64 = 5.0;

/// Weight when every recent answer was right.
pub const MASTERED_WEIGHT: f64 = 1.0;

/// How many of the latest answers count toward a question's weight.
pub const RECENT_WINDOW: usize = 5;

/// Selection weight for a question given its history.
#[must_use]
pub fn weight(history: Option<&AnswerHistory>) -> f64 {
    let Some(history) = history.filter(|h| !h.is_empty()) else {
        return UNSEEN_WEIGHT;
    };

    let recent = history.recent(RECENT_WINDOW);
    let correct = recent.iter().filter(|record| record.correct).count();
    #[allow(clippy::cast_precision_loss)]
    let avg_correctness = correct as f64 / recent.len() as f64;

    MISSED_WEIGHT + (MASTERED_WEIGHT - MISSED_WEIGHT) * avg_correctness
}

/// Draw one id from `available`, with probability proportional to its weight.
///
/// Returns `Ok(None)` for an empty pool. Falls back to the first id if the
/// weights cannot resolve a draw.
///
/// # Errors
///
/// Propagates `EntropyError` from the random source.
pub fn select_weighted<R>(
    available: &[PairedQuestionId],
    history: &HistoryMap,
    source: &mut R,
) -> Result<Option<PairedQuestionId>, EntropyError>
where
    R: RandomSource + ?Sized,
{
    let Some(&first) = available.first() else {
        return Ok(None);
    };

    let weights: Vec<f64> = available
        .iter()
        .map(|id| weight(history.get(*id)))
        .collect();
    let total: f64 = weights.iter().sum();

    let unit = source.next_unit()?;
    if !total.is_finite() || total <= 0.0 {
        return Ok(Some(first));
    }

    let target = unit * total;
    let mut cumulative = 0.0;
    for (id, w) in available.iter().zip(&weights) {
        cumulative += w;
        if target < cumulative {
            return Ok(Some(*id));
        }
    }

    Ok(Some(first))
}

/// Draw `count` distinct ids one at a time, removing each pick from the pool.
///
/// # Errors
///
/// Propagates `EntropyError` from the random source.
pub fn select_many<R>(
    available: &[PairedQuestionId],
    history: &HistoryMap,
    count: usize,
    source: &mut R,
) -> Result<Vec<PairedQuestionId>, EntropyError>
where
    R: RandomSource + ?Sized,
{
    let mut remaining = available.to_vec();
    let mut picked = Vec::with_capacity(count.min(remaining.len()));

    while picked.len() < count {
        let Some(id) = select_weighted(&remaining, history, source)? else {
            break;
        };
        remaining.retain(|candidate| *candidate != id);
        picked.push(id);
    }

    Ok(picked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerRecord, QuestionNumber};
    use crate::random::{RngSource, SequenceSource};
    use crate::time::fixed_now;
    use std::collections::HashMap;

    fn id(n: u32) -> PairedQuestionId {
        PairedQuestionId::answer(QuestionNumber::new(n), 0)
    }

    fn history_of(answers: &[bool]) -> AnswerHistory {
        AnswerHistory::from_records(
            answers
                .iter()
                .map(|correct| AnswerRecord::new(fixed_now(), *correct))
                .collect(),
        )
    }

    #[test]
    fn unseen_question_gets_maximum_weight() {
        assert!((weight(None) - 10.0).abs() < f64::EPSILON);
        assert!((weight(Some(&AnswerHistory::new())) - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn weight_interpolates_between_missed_and_mastered() {
        assert!((weight(Some(&history_of(&[false, false]))) - 5.0).abs() < 1e-9);
        assert!((weight(Some(&history_of(&[true; 5]))) - 1.0).abs() < 1e-9);
        assert!((weight(Some(&history_of(&[true, false]))) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn weight_only_counts_last_five_answers() {
        let h = history_of(&[false, false, false, true, true, true, true, true]);
        assert!((weight(Some(&h)) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn empty_pool_returns_none() {
        let mut source = SequenceSource::default();
        let picked = select_weighted(&[], &HistoryMap::new(), &mut source).unwrap();
        assert_eq!(picked, None);
    }

    #[test]
    fn draw_follows_cumulative_weights() {
        // Weights: 10 (unseen), 1 (mastered) -> total 11.
        let history: HistoryMap = [(id(2), history_of(&[true; 5]))].into_iter().collect();
        let pool = [id(1), id(2)];

        let mut low = SequenceSource::new([0.5]);
        assert_eq!(select_weighted(&pool, &history, &mut low).unwrap(), Some(id(1)));

        let mut high = SequenceSource::new([0.95]);
        assert_eq!(select_weighted(&pool, &history, &mut high).unwrap(), Some(id(2)));
    }

    #[test]
    fn never_returns_id_outside_pool() {
        let pool: Vec<_> = (1..=6).map(id).collect();
        let history: HistoryMap = [(id(3), history_of(&[false])), (id(99), history_of(&[true]))]
            .into_iter()
            .collect();
        let mut source = RngSource::seeded(17);
        for _ in 0..500 {
            let picked = select_weighted(&pool, &history, &mut source).unwrap().unwrap();
            assert!(pool.contains(&picked));
        }
    }

    #[test]
    fn unanswered_pool_draws_uniformly() {
        let pool: Vec<_> = (1..=4).map(id).collect();
        let history = HistoryMap::new();
        let mut source = RngSource::seeded(42);
        let trials = 4_000;

        let mut counts: HashMap<PairedQuestionId, usize> = HashMap::new();
        for _ in 0..trials {
            let picked = select_weighted(&pool, &history, &mut source).unwrap().unwrap();
            *counts.entry(picked).or_default() += 1;
        }

        for id in &pool {
            let seen = counts.get(id).copied().unwrap_or_default();
            assert!(
                (850..=1_150).contains(&seen),
                "{id} drawn {seen} times out of {trials}"
            );
        }
    }

    #[test]
    fn missed_questions_are_favored() {
        let pool = [id(1), id(2)];
        let history: HistoryMap = [
            (id(1), history_of(&[false; 5])),
            (id(2), history_of(&[true; 5])),
        ]
        .into_iter()
        .collect();
        let mut source = RngSource::seeded(9);
        let missed = (0..3_000)
            .filter(|_| select_weighted(&pool, &history, &mut source).unwrap() == Some(id(1)))
            .count();
        // Expected share is 5/6.
        assert!(missed > 2_300, "missed question drawn {missed} times");
    }

    #[test]
    fn select_many_never_repeats() {
        let pool: Vec<_> = (1..=10).map(id).collect();
        let mut source = RngSource::seeded(5);
        let picked = select_many(&pool, &HistoryMap::new(), 10, &mut source).unwrap();
        let mut sorted = picked.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 10);
    }

    #[test]
    fn select_many_caps_at_pool_size() {
        let pool = [id(1), id(2)];
        let mut source = RngSource::seeded(5);
        let picked = select_many(&pool, &HistoryMap::new(), 20, &mut source).unwrap();
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn entropy_failure_propagates() {
        let mut source = SequenceSource::default();
        let err = select_weighted(&[id(1)], &HistoryMap::new(), &mut source).unwrap_err();
        assert!(matches!(err, EntropyError::Exhausted { .. }));
    }
}
