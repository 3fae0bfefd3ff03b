//! Exact-match answer validation.

use std::collections::BTreeSet;

use crate::model::Question;

/// Decide whether `selected` is the correct answer to `question`.
///
/// A selection is correct iff it equals the set of indices of correct
/// choices: same size, every selected index correct, no correct index
/// missing. An empty selection is never correct. Indices outside the choice
/// list count as wrong picks.
pub fn evaluate(question: &Question, selected: &BTreeSet<usize>) -> bool {
    if selected.is_empty() {
        return false;
    }
    let correct_count = question.correct_count();
    if selected.len() != correct_count {
        return false;
    }
    let all_selected_correct = selected
        .iter()
        .all(|&i| question.choices.get(i).is_some_and(|c| c.is_correct));
    let none_missing = question
        .choices
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_correct)
        .all(|(i, _)| selected.contains(&i));
    all_selected_correct && none_missing
}
