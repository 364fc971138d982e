//! CSV export of collected records.
//!
//! Output is comma-separated with `\n` line endings. Cells containing a
//! comma, quote or line break are wrapped in double quotes with inner
//! quotes doubled, so any standard CSV reader recovers the original text.

use chrono::{NaiveDate, SecondsFormat};

use crate::form::FormData;
use crate::survey;
use crate::types::{DbId, Timestamp};

/// One submission as the exporter sees it.
#[derive(Debug, Clone, Copy)]
pub struct SubmissionRow<'a> {
    pub id: DbId,
    pub submitted_at: Timestamp,
    pub answers: &'a FormData,
}

/// One waitlist entry as the exporter sees it.
#[derive(Debug, Clone, Copy)]
pub struct WaitlistRow<'a> {
    pub id: DbId,
    pub joined_at: Timestamp,
    pub name: &'a str,
    pub email: &'a str,
    pub whatsapp: &'a str,
}

/// Header row and one row per submission, columns in survey order.
pub fn submissions_csv<'a>(rows: impl IntoIterator<Item = SubmissionRow<'a>>) -> String {
    let questions: Vec<_> = survey::all_questions().collect();

    let mut out = String::new();
    let header = ["Submission ID", "Date"]
        .into_iter()
        .chain(questions.iter().map(|q| q.text));
    push_record(&mut out, header);

    for row in rows {
        let id = row.id.to_string();
        let date = format_timestamp(row.submitted_at);
        let answers: Vec<String> = questions
            .iter()
            .map(|q| row.answers.get(q.id).map(|a| a.display()).unwrap_or_default())
            .collect();

        let cells = [id.as_str(), date.as_str()]
            .into_iter()
            .chain(answers.iter().map(String::as_str));
        push_record(&mut out, cells);
    }

    out
}

/// Header row and one row per waitlist entry.
pub fn waitlist_csv<'a>(rows: impl IntoIterator<Item = WaitlistRow<'a>>) -> String {
    let mut out = String::new();
    push_record(&mut out, ["Entry ID", "Joined At", "Name", "Email", "WhatsApp"]);

    for row in rows {
        let id = row.id.to_string();
        let date = format_timestamp(row.joined_at);
        push_record(
            &mut out,
            [id.as_str(), date.as_str(), row.name, row.email, row.whatsapp],
        );
    }

    out
}

/// Date-stamped download name, e.g. `flash_survey_export_2026-10-17.csv`.
pub fn export_filename(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}_export_{}.csv", date.format("%Y-%m-%d"))
}

/// Quote a cell if it would otherwise break the record.
pub fn escape_cell(value: &str) -> std::borrow::Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\"")).into()
    } else {
        value.into()
    }
}

fn push_record<'a>(out: &mut String, cells: impl IntoIterator<Item = &'a str>) {
    for (i, cell) in cells.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape_cell(cell));
    }
    out.push('\n');
}

fn format_timestamp(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}
