use crate::model::AnswerSelection;

/// Whether a learner selection answers the question.
///
/// Single against single is plain equality. Otherwise both sides are compared as
/// sets: the selection must have exactly `expected_answers` members when that is
/// given, and every selected index must be correct. Learners only need to name
/// the required count, not the whole correct set.
#[must_use]
pub fn is_valid_answer(
    selected: &AnswerSelection,
    correct: &AnswerSelection,
    expected_answers: Option<u32>,
) -> bool {
    if let (AnswerSelection::Single(picked), AnswerSelection::Single(answer)) = (selected, correct)
    {
        return picked == answer;
    }

    let selected = selected.to_set();
    let correct = correct.to_set();

    if let Some(expected) = expected_answers {
        if u32::try_from(selected.len()).ok() != Some(expected) {
            return false;
        }
    }

    !selected.is_empty() && selected.is_subset(&correct)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(indices: &[usize]) -> AnswerSelection {
        AnswerSelection::multiple(indices.iter().copied())
    }

    #[test]
    fn single_indices_compare_directly() {
        assert!(is_valid_answer(
            &AnswerSelection::Single(2),
            &AnswerSelection::Single(2),
            None
        ));
        assert!(!is_valid_answer(
            &AnswerSelection::Single(1),
            &AnswerSelection::Single(2),
            None
        ));
    }

    #[test]
    fn required_count_subset_is_valid() {
        assert!(is_valid_answer(&set(&[0, 2]), &set(&[0, 2, 5]), Some(2)));
    }

    #[test]
    fn full_correct_set_with_wrong_count_is_invalid() {
        assert!(!is_valid_answer(&set(&[0, 2, 5]), &set(&[0, 2, 5]), Some(2)));
    }

    #[test]
    fn any_wrong_index_is_invalid() {
        assert!(!is_valid_answer(&set(&[0, 1]), &set(&[0, 2, 5]), Some(2)));
    }

    #[test]
    fn without_expected_count_subset_is_enough() {
        assert!(is_valid_answer(&set(&[5]), &set(&[0, 2, 5]), None));
        assert!(!is_valid_answer(&set(&[]), &set(&[0, 2, 5]), None));
    }

    #[test]
    fn single_selection_against_set() {
        assert!(is_valid_answer(
            &AnswerSelection::Single(2),
            &set(&[0, 2]),
            Some(1)
        ));
        assert!(!is_valid_answer(
            &AnswerSelection::Single(2),
            &set(&[0, 2]),
            Some(2)
        ));
    }
}
