//! Respondent flow state machine.
//!
//! [`SurveyFlow`] holds everything one respondent's screen needs: the
//! current screen, the section index, the answers collected so far and the
//! submission status. Transitions are plain methods; the one side effect
//! (writing the submission) is returned to the caller as [`Advance::Submit`]
//! and its outcome reported back through [`SurveyFlow::submission_succeeded`]
//! or [`SurveyFlow::submission_failed`].

use serde::Serialize;

use crate::error::CoreError;
use crate::form::{Answer, FormData};
use crate::survey::{self, Question, Section};
use crate::validation;

/// Which screen is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Screen {
    Intro,
    Survey,
    Success,
    AdminLogin,
    AdminDashboard,
}

/// Outcome of [`SurveyFlow::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Required questions on the current section are unanswered.
    Blocked {
        missing: Vec<&'static str>,
        /// The first failing question, which the view scrolls to.
        focus: &'static str,
    },
    /// Moved to the next section.
    Moved { section_index: usize },
    /// On the last section with everything answered. The caller must write
    /// these answers and report the result.
    Submit(FormData),
    /// A submission is already in flight.
    Busy,
}

/// State of one respondent session.
#[derive(Debug, Clone, Serialize)]
pub struct SurveyFlow {
    screen: Screen,
    section_index: usize,
    form: FormData,
    submitting: bool,
    /// Questions that failed the last blocked advance.
    errors: Vec<&'static str>,
    /// Message from the last failed submission, if any.
    last_error: Option<String>,
}

impl Default for SurveyFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl SurveyFlow {
    pub fn new() -> Self {
        Self {
            screen: Screen::Intro,
            section_index: 0,
            form: FormData::new(),
            submitting: false,
            errors: Vec::new(),
            last_error: None,
        }
    }

    /// A flow that has already shown the success screen, for a session
    /// that is gone by the time its submission is reported.
    pub fn completed() -> Self {
        Self {
            screen: Screen::Success,
            section_index: survey::section_count() - 1,
            ..Self::new()
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn section_index(&self) -> usize {
        self.section_index
    }

    pub fn form(&self) -> &FormData {
        &self.form
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn errors(&self) -> &[&'static str] {
        &self.errors
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn current_section(&self) -> &'static Section {
        &survey::SURVEY[self.section_index]
    }

    pub fn is_first_section(&self) -> bool {
        self.section_index == 0
    }

    pub fn is_last_section(&self) -> bool {
        self.section_index + 1 == survey::section_count()
    }

    /// Progress through the survey as a percentage (current section counts
    /// as reached).
    pub fn progress_percent(&self) -> f64 {
        (self.section_index + 1) as f64 * 100.0 / survey::section_count() as f64
    }

    // -----------------------------------------------------------------------
    // Respondent transitions
    // -----------------------------------------------------------------------

    /// Intro → Survey, at the first section.
    pub fn start(&mut self) -> Result<(), CoreError> {
        if self.screen != Screen::Intro {
            return Err(CoreError::Validation(format!(
                "Cannot start the survey from the {:?} screen",
                self.screen
            )));
        }
        self.screen = Screen::Survey;
        self.section_index = 0;
        Ok(())
    }

    /// Validate the current section and move forward, or hand the answers
    /// back for submission when on the last section.
    pub fn advance(&mut self) -> Result<Advance, CoreError> {
        self.require_survey()?;
        if self.submitting {
            return Ok(Advance::Busy);
        }

        let section = self.current_section();
        let missing = validation::missing_required(section, &self.form);
        if let Some(&focus) = missing.first() {
            self.errors = missing.clone();
            return Ok(Advance::Blocked { missing, focus });
        }
        self.errors.clear();

        if self.is_last_section() {
            self.submitting = true;
            self.last_error = None;
            return Ok(Advance::Submit(self.form.clone()));
        }

        self.section_index += 1;
        Ok(Advance::Moved {
            section_index: self.section_index,
        })
    }

    /// Go back one section. A no-op on the first section. Answers are kept.
    pub fn retreat(&mut self) -> Result<usize, CoreError> {
        self.require_survey()?;
        if self.section_index > 0 && !self.submitting {
            self.section_index -= 1;
            self.errors.clear();
        }
        Ok(self.section_index)
    }

    /// The submission was written: show the success screen and drop the
    /// answers.
    pub fn submission_succeeded(&mut self) {
        self.submitting = false;
        self.screen = Screen::Success;
        self.form = FormData::new();
        self.errors.clear();
        self.last_error = None;
    }

    /// The submission failed: stay on the survey with answers intact so the
    /// respondent can retry.
    pub fn submission_failed(&mut self, message: impl Into<String>) {
        self.submitting = false;
        self.last_error = Some(message.into());
    }

    /// Set a text or single-choice answer.
    pub fn answer_text(
        &mut self,
        question_id: &str,
        value: impl Into<String>,
    ) -> Result<(), CoreError> {
        let question = self.require_editable(question_id, false)?;
        let value = value.into();
        if !value.is_empty() && !question.lists_option(&value) {
            return Err(unlisted_option(question_id, &value));
        }
        self.form.set_text(question_id, value);
        self.clear_error_if_answered(question_id);
        Ok(())
    }

    /// Toggle one option of a multi-select answer.
    pub fn toggle_option(
        &mut self,
        question_id: &str,
        option: &str,
    ) -> Result<&Answer, CoreError> {
        let question = self.require_editable(question_id, true)?;
        if !question.lists_option(option) {
            return Err(unlisted_option(question_id, option));
        }
        self.form.toggle_option(question_id, option);
        self.clear_error_if_answered(question_id);
        self.form
            .get(question_id)
            .ok_or_else(|| CoreError::Internal(format!("Answer for '{question_id}' vanished")))
    }

    // -----------------------------------------------------------------------
    // Admin transitions
    // -----------------------------------------------------------------------

    /// Reachable from any screen via the footer link.
    pub fn open_admin_login(&mut self) {
        self.screen = Screen::AdminLogin;
    }

    /// AdminLogin → AdminDashboard once the credentials were accepted.
    pub fn admin_authenticated(&mut self) -> Result<(), CoreError> {
        if self.screen != Screen::AdminLogin {
            return Err(CoreError::Validation(
                "Admin dashboard is only reachable from the login screen".into(),
            ));
        }
        self.screen = Screen::AdminDashboard;
        Ok(())
    }

    /// Back to the intro from any screen (the header logo). Answers
    /// collected so far are kept, except while a submission is in flight,
    /// when the respondent stays put.
    pub fn home(&mut self) -> Result<(), CoreError> {
        if self.submitting {
            return Err(CoreError::Conflict("Submission in progress".into()));
        }
        self.screen = Screen::Intro;
        self.errors.clear();
        Ok(())
    }

    /// Log out of the dashboard, or back out of the login screen.
    pub fn leave_admin(&mut self) {
        if matches!(self.screen, Screen::AdminLogin | Screen::AdminDashboard) {
            self.screen = Screen::Intro;
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn require_survey(&self) -> Result<(), CoreError> {
        if self.screen == Screen::Survey {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "Not on the survey screen (currently {:?})",
                self.screen
            )))
        }
    }

    fn require_editable(
        &self,
        question_id: &str,
        multi: bool,
    ) -> Result<&'static Question, CoreError> {
        self.require_survey()?;
        if self.submitting {
            return Err(CoreError::Conflict("Submission in progress".into()));
        }
        let question = survey::find_question(question_id).ok_or_else(|| CoreError::NotFound {
            entity: "Question",
            id: question_id.to_string(),
        })?;
        if question.is_multi_select() != multi {
            let expected = if question.is_multi_select() {
                "toggled options"
            } else {
                "a single value"
            };
            return Err(CoreError::Validation(format!(
                "Question '{question_id}' takes {expected}"
            )));
        }
        Ok(question)
    }

    fn clear_error_if_answered(&mut self, question_id: &str) {
        if self.form.is_answered(question_id) {
            self.errors.retain(|id| *id != question_id);
        }
    }
}

fn unlisted_option(question_id: &str, value: &str) -> CoreError {
    CoreError::Validation(format!(
        "'{value}' is not an option for question '{question_id}'"
    ))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::validation::tests::complete_form;

    fn in_survey() -> SurveyFlow {
        let mut flow = SurveyFlow::new();
        flow.start().unwrap();
        flow
    }

    /// Walk a flow with every required answer filled to the last section.
    fn at_last_section() -> SurveyFlow {
        let mut flow = in_survey();
        flow.form = complete_form();
        while !flow.is_last_section() {
            assert_matches!(flow.advance().unwrap(), Advance::Moved { .. });
        }
        flow
    }

    #[test]
    fn start_moves_intro_to_survey() {
        let mut flow = SurveyFlow::new();
        assert_eq!(flow.screen(), Screen::Intro);
        flow.start().unwrap();
        assert_eq!(flow.screen(), Screen::Survey);
        assert_eq!(flow.section_index(), 0);
        assert!(flow.start().is_err());
    }

    #[test]
    fn only_q4_needed_to_leave_first_section() {
        let mut flow = in_survey();
        flow.answer_text("q4", "Lagos - Mainland").unwrap();
        assert_eq!(flow.advance().unwrap(), Advance::Moved { section_index: 1 });
    }

    #[test]
    fn blocked_advance_reports_focus_and_errors() {
        let mut flow = in_survey();
        assert_eq!(
            flow.advance().unwrap(),
            Advance::Blocked {
                missing: vec!["q4"],
                focus: "q4"
            }
        );
        assert_eq!(flow.errors(), ["q4"]);
        assert_eq!(flow.section_index(), 0);

        flow.answer_text("q4", "Abuja").unwrap();
        assert!(flow.errors().is_empty());
    }

    #[test]
    fn last_section_with_empty_required_field_never_submits() {
        let mut flow = at_last_section();
        flow.form.clear("q23");

        assert_eq!(
            flow.advance().unwrap(),
            Advance::Blocked {
                missing: vec!["q23"],
                focus: "q23"
            }
        );
        assert!(!flow.is_submitting());
        assert_eq!(flow.screen(), Screen::Survey);
    }

    #[test]
    fn last_section_hands_back_answers_for_submission() {
        let mut flow = at_last_section();
        let expected = flow.form().clone();

        assert_eq!(flow.advance().unwrap(), Advance::Submit(expected));
        assert!(flow.is_submitting());
        assert_eq!(flow.advance().unwrap(), Advance::Busy);

        flow.submission_succeeded();
        assert_eq!(flow.screen(), Screen::Success);
        assert!(flow.form().is_empty());
    }

    #[test]
    fn failed_submission_keeps_answers_for_retry() {
        let mut flow = at_last_section();
        let answers = flow.form().clone();
        assert_matches!(flow.advance().unwrap(), Advance::Submit(_));

        flow.submission_failed("connection refused");
        assert_eq!(flow.screen(), Screen::Survey);
        assert_eq!(flow.form(), &answers);
        assert_eq!(flow.last_error(), Some("connection refused"));

        assert_matches!(flow.advance().unwrap(), Advance::Submit(_));
        assert_eq!(flow.last_error(), None);
    }

    #[test]
    fn retreat_keeps_answers_and_stops_at_first_section() {
        let mut flow = in_survey();
        flow.answer_text("q1", "Ada").unwrap();
        flow.answer_text("q4", "Kano").unwrap();
        flow.advance().unwrap();
        flow.answer_text("q5", "1-2 years").unwrap();
        flow.toggle_option("q7", "USDC").unwrap();

        assert_eq!(flow.retreat().unwrap(), 0);
        assert_eq!(flow.retreat().unwrap(), 0);
        assert!(flow.form().is_answered("q1"));
        assert!(flow.form().is_answered("q5"));
        assert!(flow.form().is_answered("q7"));

        assert_eq!(flow.advance().unwrap(), Advance::Moved { section_index: 1 });
    }

    #[test]
    fn answer_kind_must_match_question() {
        let mut flow = in_survey();
        assert_matches!(flow.answer_text("q7", "USDC"), Err(CoreError::Validation(_)));
        assert_matches!(flow.toggle_option("q4", "Abuja"), Err(CoreError::Validation(_)));
        assert_matches!(flow.answer_text("q404", "x"), Err(CoreError::NotFound { .. }));
    }

    #[test]
    fn unlisted_options_are_rejected_when_answering() {
        let mut flow = in_survey();
        assert_matches!(flow.answer_text("q4", "Atlantis"), Err(CoreError::Validation(_)));
        assert!(!flow.form().is_answered("q4"));
        assert_matches!(flow.advance(), Ok(Advance::Blocked { .. }));

        flow.answer_text("q4", "Abuja").unwrap();
        flow.answer_text("q1", "Any name at all").unwrap();
        flow.advance().unwrap();

        assert_matches!(flow.toggle_option("q7", "DOGE"), Err(CoreError::Validation(_)));
        assert!(flow.form().get("q7").is_none());
        flow.toggle_option("q7", "BNB").unwrap();
    }

    #[test]
    fn home_returns_to_intro_from_any_screen() {
        let mut flow = in_survey();
        flow.answer_text("q4", "Abuja").unwrap();
        flow.home().unwrap();
        assert_eq!(flow.screen(), Screen::Intro);
        assert!(flow.form().is_answered("q4"));

        let mut flow = SurveyFlow::new();
        flow.open_admin_login();
        flow.home().unwrap();
        assert_eq!(flow.screen(), Screen::Intro);

        let mut flow = at_last_section();
        assert_matches!(flow.advance(), Ok(Advance::Submit(_)));
        assert_matches!(flow.home(), Err(CoreError::Conflict(_)));
        flow.submission_succeeded();
        assert_eq!(flow.screen(), SurveyFlow::completed().screen());
        flow.home().unwrap();
        assert_eq!(flow.screen(), Screen::Intro);
        flow.start().unwrap();
        assert_eq!(flow.section_index(), 0);
    }

    #[test]
    fn answers_rejected_outside_survey() {
        let mut flow = SurveyFlow::new();
        assert!(flow.answer_text("q1", "Ada").is_err());
        assert!(flow.advance().is_err());
        assert!(flow.retreat().is_err());
    }

    #[test]
    fn progress_counts_current_section() {
        let mut flow = in_survey();
        assert_eq!(flow.progress_percent(), 20.0);
        flow.answer_text("q4", "Abuja").unwrap();
        flow.advance().unwrap();
        assert_eq!(flow.progress_percent(), 40.0);
    }

    #[test]
    fn admin_branch_is_independent() {
        let mut flow = in_survey();
        flow.open_admin_login();
        assert_eq!(flow.screen(), Screen::AdminLogin);
        flow.admin_authenticated().unwrap();
        assert_eq!(flow.screen(), Screen::AdminDashboard);
        flow.leave_admin();
        assert_eq!(flow.screen(), Screen::Intro);

        assert!(flow.admin_authenticated().is_err());
    }
}
