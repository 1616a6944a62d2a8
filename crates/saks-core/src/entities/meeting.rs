use chrono::{DateTime, Datelike, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A board meeting. `year_sequence_number` is the meeting's ordinal within its year.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Meeting {
    pub id: i64,
    pub meeting_date: NaiveDate,
    pub year: i32,
    pub year_sequence_number: i32,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<String>,
}

impl Meeting {
    /// Display label, e.g. `"2026/03"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}/{:02}", self.year, self.year_sequence_number)
    }
}

/// Input for creating a meeting.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewMeeting {
    pub meeting_date: NaiveDate,
    /// Defaults to the year of `meeting_date`.
    pub year: Option<i32>,
    pub year_sequence_number: i32,
    pub location: Option<String>,
}

impl NewMeeting {
    #[must_use]
    pub fn effective_year(&self) -> i32 {
        self.year.unwrap_or_else(|| self.meeting_date.year())
    }
}

/// A case scheduled onto a meeting's agenda.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MeetingCase {
    pub id: i64,
    pub meeting_id: i64,
    pub case_id: i64,
    pub agenda_order: i64,
    /// Case text as it stood when scheduled; later case edits do not change it.
    pub agenda_text_snapshot: String,
    pub deadline_override_date: Option<NaiveDate>,
    pub deadline_override_text: Option<String>,
    pub follow_up_text_draft: Option<String>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<String>,
}
