use civics_core::model::{ChoiceSet, QuestionBank};
use tracing::{debug, warn};

use crate::repository::StorageError;

/// Parse the question bank produced by the data-provisioning collaborator.
///
/// Expects `{ "questions": [...], "distractors": [{ "questionNumber", "choices" }] }`.
/// Questions without any listed answer are kept; the core drops them per learner.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for malformed JSON.
pub fn load_question_bank(json: &str) -> Result<QuestionBank, StorageError> {
    let bank: QuestionBank =
        serde_json::from_str(json).map_err(|e| StorageError::Serialization(e.to_string()))?;

    for question in &bank.questions {
        let empty = match &question.choices {
            ChoiceSet::Static(answers) => answers.is_empty(),
            ChoiceSet::Tagged(choices) => choices.is_empty(),
        };
        if empty {
            warn!(
                target: "storage",
                question = %question.question_number,
                "question has no listed answers"
            );
        }
    }
    debug!(
        target: "storage",
        questions = bank.questions.len(),
        distractor_pools = bank.distractors.len(),
        "loaded question bank"
    );

    Ok(bank)
}

#[cfg(test)]
mod tests {
    use super::*;
    use civics_core::model::{AnswerType, QuestionNumber};

    const BANK: &str = r#"{
        "questions": [
            {
                "questionNumber": 20,
                "theme": "American Government",
                "section": "System of Government",
                "question": "Who is one of your state's U.S. senators now?",
                "answerType": "senator",
                "choices": [
                    { "state": "CA", "answer": "Alex Padilla" },
                    { "state": "CA", "answer": "Adam Schiff" }
                ]
            },
            {
                "questionNumber": 36,
                "theme": "American Government",
                "section": "System of Government",
                "question": "Name two Cabinet-level positions.",
                "answerType": "text",
                "expectedAnswers": 2,
                "choices": ["Secretary of State", "Attorney General", "Vice President"]
            }
        ],
        "distractors": [
            { "questionNumber": 20, "choices": ["Ted Cruz", "Rand Paul"] }
        ]
    }"#;

    #[test]
    fn parses_tagged_and_static_questions() {
        let bank = load_question_bank(BANK).unwrap();
        assert_eq!(bank.questions.len(), 2);
        assert_eq!(bank.questions[0].answer_type, AnswerType::Senator);
        assert!(matches!(bank.questions[0].choices, ChoiceSet::Tagged(ref c) if c.len() == 2));
        assert_eq!(bank.questions[1].expected_answers, 2);
        assert_eq!(bank.distractors.pool(QuestionNumber::new(20)).len(), 2);
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let err = load_question_bank("{ \"questions\": [ { } ] }").unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }
}
