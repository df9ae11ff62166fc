use shared::{
    domain::{Answers, FormFields, Selection},
    protocol::SubmissionRecord,
    QuestionBank,
};

use crate::{date_input::parse_ddmmyyyy, error::ValidationError};

/// Validates the form state and flattens it into the row sent to the store.
///
/// Checks run in order: required fields, answer completeness, date length, then
/// calendar validity. The first failure wins.
pub fn build_submission(
    bank: &QuestionBank,
    selection: &Selection,
    fields: &FormFields,
    answers: &Answers,
) -> Result<SubmissionRecord, ValidationError> {
    ensure_required_fields(selection, fields)?;

    let required = bank.required_answers(&selection.area, &selection.subarea);
    ensure_complete(answers, required)?;

    let data = parse_ddmmyyyy(&fields.date)?;

    Ok(SubmissionRecord {
        data,
        supervisor: fields.supervisor.clone(),
        colaborador: fields.collaborator.clone(),
        funcao: fields.role.clone(),
        area: selection.area.clone(),
        subarea: selection.subarea.clone(),
        perguntas: SubmissionRecord::question_columns(answers),
    })
}

/// Every text field and both selects must be filled; the date is checked separately.
fn ensure_required_fields(
    selection: &Selection,
    fields: &FormFields,
) -> Result<(), ValidationError> {
    let missing: Vec<&'static str> = [
        ("supervisor", &fields.supervisor),
        ("colaborador", &fields.collaborator),
        ("funcao", &fields.role),
        ("area", &selection.area),
        ("subarea", &selection.subarea),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(name, _)| name)
    .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields(missing))
    }
}

/// Requires exactly one answer per question index in `0..required`.
///
/// Map keys are unique, so a matching count with every key in range is full coverage.
fn ensure_complete(answers: &Answers, required: usize) -> Result<(), ValidationError> {
    let in_range = answers.keys().all(|index| *index < required);
    if answers.len() != required || !in_range {
        return Err(ValidationError::IncompleteAnswers {
            answered: answers.keys().filter(|index| **index < required).count(),
            required,
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/submission_tests.rs"]
mod tests;
