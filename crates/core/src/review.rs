//! Read-only rendering of a stored submission for the admin dashboard.

use serde::Serialize;

use crate::form::FormData;
use crate::survey::{self, Section};

/// Shown in place of an answer the respondent left blank.
pub const NO_ANSWER: &str = "No answer";

/// One question and its rendered answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerLine {
    pub question_id: &'static str,
    pub question: &'static str,
    pub answer: String,
    pub answered: bool,
}

/// A survey section with every question's answer, in survey order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionAnswers {
    pub id: &'static str,
    pub title: &'static str,
    pub answers: Vec<AnswerLine>,
}

/// Group `form` by survey section. Every question appears, with
/// [`NO_ANSWER`] where the answer is absent or empty.
pub fn group_by_section(form: &FormData) -> Vec<SectionAnswers> {
    survey::SURVEY
        .iter()
        .map(|section| section_answers(section, form))
        .collect()
}

fn section_answers(section: &'static Section, form: &FormData) -> SectionAnswers {
    let answers = section
        .questions
        .iter()
        .map(|q| match form.get(q.id).filter(|a| !a.is_empty()) {
            Some(answer) => AnswerLine {
                question_id: q.id,
                question: q.text,
                answer: answer.display(),
                answered: true,
            },
            None => AnswerLine {
                question_id: q.id,
                question: q.text,
                answer: NO_ANSWER.to_string(),
                answered: false,
            },
        })
        .collect();

    SectionAnswers {
        id: section.id,
        title: section.title,
        answers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_question_is_listed_with_placeholders() {
        let mut form = FormData::new();
        form.set_text("q1", "Ada");
        form.set_text("q2", "   ");
        form.toggle_option("q7", "USDC");
        form.toggle_option("q7", "BNB");

        let grouped = group_by_section(&form);
        assert_eq!(grouped.len(), survey::section_count());
        assert_eq!(grouped[0].title, "Your Contact Info");
        assert_eq!(grouped.iter().map(|s| s.answers.len()).sum::<usize>(), 24);

        let first = &grouped[0].answers;
        assert_eq!(first[0].answer, "Ada");
        assert!(first[0].answered);
        assert_eq!(first[1].answer, NO_ANSWER);
        assert!(!first[1].answered);

        let q7 = grouped
            .iter()
            .flat_map(|s| &s.answers)
            .find(|line| line.question_id == "q7")
            .unwrap();
        assert_eq!(q7.answer, "USDC, BNB");
    }
}
