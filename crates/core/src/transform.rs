//! Turns raw civics questions into trackable paired questions.
//!
//! Single-answer questions fan out into one paired question per applicable
//! correct answer, so each senator, each amendment, each right is weighted on
//! its own history. Multi-answer questions become one unified paired question
//! whose correct answer is a set of indices.

use std::collections::{BTreeSet, HashSet};

use crate::model::{
    AnswerSelection, GameSettings, LearnerContext, PairedQuestion, PairedQuestionId,
    QuestionBank, QuestionNumber, RawQuestion,
};
use crate::random::{EntropyError, RandomSource, sample, shuffle};

/// Total options shown for a question that expects `expected_answers` answers.
#[must_use]
pub fn option_budget(expected_answers: u32) -> usize {
    match expected_answers {
        0 | 1 => 4,
        2 => 6,
        _ => 8,
    }
}

/// Transform one raw question for a learner.
///
/// Returns an empty list when no correct answer applies to the learner.
///
/// # Errors
///
/// Propagates `EntropyError` from the random source.
pub fn transform_question<R>(
    raw: &RawQuestion,
    distractors: &[String],
    context: &LearnerContext,
    source: &mut R,
) -> Result<Vec<PairedQuestion>, EntropyError>
where
    R: RandomSource + ?Sized,
{
    let correct = raw.applicable_answers(context);
    if correct.is_empty() {
        return Ok(Vec::new());
    }

    let pool = distractor_pool(distractors, &correct);
    let total = option_budget(raw.expected_answers);

    if raw.expected_answers <= 1 {
        fan_out(raw, &correct, &pool, total, source)
    } else {
        unified(raw, &correct, &pool, total, source).map(|q| vec![q])
    }
}

fn fan_out<R>(
    raw: &RawQuestion,
    correct: &[String],
    pool: &[String],
    total: usize,
    source: &mut R,
) -> Result<Vec<PairedQuestion>, EntropyError>
where
    R: RandomSource + ?Sized,
{
    let mut paired = Vec::with_capacity(correct.len());
    for (answer_index, answer) in correct.iter().enumerate() {
        let mut answers = vec![answer.clone()];
        answers.extend(sample(source, pool, total - 1)?);
        shuffle(source, &mut answers)?;

        let Some(index) = locate(&answers, answer) else {
            continue;
        };

        paired.push(PairedQuestion::new(
            PairedQuestionId::answer(raw.question_number, answer_index),
            raw.theme.clone(),
            raw.section.clone(),
            raw.question.clone(),
            answers,
            AnswerSelection::Single(index),
            answer.clone(),
            None,
        ));
    }
    Ok(paired)
}

fn unified<R>(
    raw: &RawQuestion,
    correct: &[String],
    pool: &[String],
    total: usize,
    source: &mut R,
) -> Result<PairedQuestion, EntropyError>
where
    R: RandomSource + ?Sized,
{
    // At least one option within the budget must be wrong.
    let expected = usize::try_from(raw.expected_answers)
        .unwrap_or(usize::MAX)
        .min(total.saturating_sub(1));
    let chosen = sample(source, correct, expected)?;

    let mut answers = chosen.clone();
    answers.extend(sample(source, pool, total.saturating_sub(expected))?);
    shuffle(source, &mut answers)?;

    let indices: BTreeSet<usize> = chosen
        .iter()
        .filter_map(|answer| locate(&answers, answer))
        .collect();

    // The learner can only be asked for the correct answers on screen.
    let required = u32::try_from(chosen.len()).unwrap_or(raw.expected_answers);

    Ok(PairedQuestion::new(
        PairedQuestionId::unified(raw.question_number),
        raw.theme.clone(),
        raw.section.clone(),
        raw.question.clone(),
        answers,
        AnswerSelection::Multiple(indices),
        chosen.join(", "),
        Some(required),
    ))
}

/// Usable distractors: trimmed, non-empty, distinct, and never a correct answer.
fn distractor_pool(distractors: &[String], correct: &[String]) -> Vec<String> {
    let mut seen: HashSet<&str> = correct.iter().map(String::as_str).collect();
    let mut pool = Vec::with_capacity(distractors.len());
    for distractor in distractors {
        let trimmed = distractor.trim();
        if !trimmed.is_empty() && seen.insert(trimmed) {
            pool.push(trimmed.to_owned());
        }
    }
    pool
}

fn locate(answers: &[String], target: &str) -> Option<usize> {
    answers.iter().position(|a| a == target)
}

//
// ─── POOL ──────────────────────────────────────────────────────────────────────
//

/// Paired questions eligible for a session, plus the raw questions that had no
/// applicable answer for the learner.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuestionPool {
    pub questions: Vec<PairedQuestion>,
    pub dropped: Vec<QuestionNumber>,
}

impl QuestionPool {
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn ids(&self) -> Vec<PairedQuestionId> {
        self.questions.iter().map(PairedQuestion::id).collect()
    }
}

/// Transform every eligible question of the bank for the given settings.
///
/// Honors the settings' explicit question subset. When the bank repeats a
/// question number, only the first occurrence is used so ids stay unique.
///
/// # Errors
///
/// Propagates `EntropyError` from the random source.
pub fn build_pool<R>(
    bank: &QuestionBank,
    settings: &GameSettings,
    source: &mut R,
) -> Result<QuestionPool, EntropyError>
where
    R: RandomSource + ?Sized,
{
    let context = settings.learner_context();
    let subset: Option<HashSet<QuestionNumber>> = settings
        .question_numbers()
        .map(|numbers| numbers.iter().copied().collect());

    let mut seen = HashSet::new();
    let mut pool = QuestionPool::default();

    for raw in &bank.questions {
        if subset
            .as_ref()
            .is_some_and(|s| !s.contains(&raw.question_number))
        {
            continue;
        }
        if !seen.insert(raw.question_number) {
            continue;
        }

        let paired = transform_question(
            raw,
            bank.distractors.pool(raw.question_number),
            &context,
            source,
        )?;
        if paired.is_empty() {
            pool.dropped.push(raw.question_number);
        }
        pool.questions.extend(paired);
    }

    Ok(pool)
}
