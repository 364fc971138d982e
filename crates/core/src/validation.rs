//! Required-answer checks.
//!
//! Section checks gate navigation in the respondent flow and only look at
//! the section on screen. [`validate_submission`] is the whole-survey check
//! run before anything is written.

use crate::error::CoreError;
use crate::form::FormData;
use crate::survey::{self, Section};

/// Ids of required questions in `section` that have no non-empty answer,
/// in the order they appear on screen.
pub fn missing_required(section: &Section, form: &FormData) -> Vec<&'static str> {
    section
        .questions
        .iter()
        .filter(|q| q.required && !form.is_answered(q.id))
        .map(|q| q.id)
        .collect()
}

/// The first failing question in `section`, i.e. the one to scroll to.
pub fn first_missing(section: &Section, form: &FormData) -> Option<&'static str> {
    section
        .questions
        .iter()
        .find(|q| q.required && !form.is_answered(q.id))
        .map(|q| q.id)
}

/// Check a complete answer set against the survey model.
///
/// Rejects unknown question ids and answers that do not fit their question
/// first, then reports every unanswered required question across all
/// sections as [`CoreError::MissingAnswers`].
pub fn validate_submission(form: &FormData) -> Result<(), CoreError> {
    for (id, answer) in form.iter() {
        let question = survey::find_question(id)
            .ok_or_else(|| CoreError::Validation(format!("Unknown question id '{id}'")))?;

        if !question.accepts(answer) {
            return Err(CoreError::Validation(format!(
                "Answer for '{id}' does not match the question's type or options"
            )));
        }
    }

    let missing: Vec<String> = survey::SURVEY
        .iter()
        .flat_map(|section| missing_required(section, form))
        .map(str::to_string)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::MissingAnswers(missing))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::survey::{section, QuestionType, SURVEY};

    /// Answer every required question with its first option.
    pub(crate) fn complete_form() -> FormData {
        let mut form = FormData::new();
        for q in survey::all_questions().filter(|q| q.required) {
            let first = q.options.and_then(|o| o.first()).copied().unwrap_or("x");
            if q.kind == QuestionType::Checkboxes {
                form.toggle_option(q.id, first);
            } else {
                form.set_text(q.id, first);
            }
        }
        form
    }

    #[test]
    fn only_q4_is_required_in_first_section() {
        let mut form = FormData::new();
        assert_eq!(missing_required(section(0).unwrap(), &form), ["q4"]);

        form.set_text("q4", "Lagos - Mainland");
        assert!(missing_required(section(0).unwrap(), &form).is_empty());
    }

    #[test]
    fn blocked_iff_some_required_question_is_empty() {
        let full = complete_form();
        for sec in SURVEY {
            assert!(missing_required(sec, &full).is_empty(), "{}", sec.id);

            for q in sec.questions.iter().filter(|q| q.required) {
                let mut form = full.clone();
                form.clear(q.id);
                assert_eq!(missing_required(sec, &form), [q.id]);
            }
            for q in sec.questions.iter().filter(|q| !q.required) {
                let mut form = full.clone();
                form.clear(q.id);
                assert!(missing_required(sec, &form).is_empty());
            }
        }
    }

    #[test]
    fn empty_list_and_blank_string_count_as_missing() {
        let sec = section(1).unwrap();
        let mut form = complete_form();
        form.toggle_option("q7", "USDT (Tether)");
        assert_eq!(missing_required(sec, &form), ["q7"]);

        form.set_text("q5", "  ");
        assert_eq!(missing_required(sec, &form), ["q5", "q7"]);
        assert_eq!(first_missing(sec, &form), Some("q5"));
    }

    #[test]
    fn other_sections_are_not_checked() {
        let form = FormData::new();
        assert_eq!(missing_required(section(0).unwrap(), &form).len(), 1);
        assert_eq!(missing_required(section(4).unwrap(), &form), ["q20", "q21", "q22", "q23"]);
    }

    #[test]
    fn complete_form_passes_submission_check() {
        validate_submission(&complete_form()).unwrap();
    }

    #[test]
    fn submission_reports_all_missing_in_order() {
        let mut form = complete_form();
        form.clear("q23");
        form.clear("q4");
        assert_matches!(
            validate_submission(&form),
            Err(CoreError::MissingAnswers(ids)) if ids == ["q4", "q23"]
        );
    }

    #[test]
    fn submission_rejects_unknown_keys() {
        let mut form = complete_form();
        form.set_text("q99", "surprise");
        assert_matches!(validate_submission(&form), Err(CoreError::Validation(_)));
    }

    #[test]
    fn submission_rejects_wrong_shape() {
        let mut form = complete_form();
        form.set_text("q7", "USDC");
        assert_matches!(validate_submission(&form), Err(CoreError::Validation(_)));
    }
}
