use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::MeetingCaseOutcome;

/// Meeting-level minutes record. At most one per meeting.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MeetingMinutes {
    pub id: i64,
    pub meeting_id: i64,
    pub attendance_text: Option<String>,
    pub absence_text: Option<String>,
    pub approval_of_previous_minutes_text: Option<String>,
    pub next_meeting_date: Option<NaiveDate>,
    pub other_business_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Minutes for one agenda item.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MinutesEntry {
    pub id: i64,
    pub meeting_id: i64,
    pub meeting_case_id: i64,
    pub case_id: i64,
    pub official_notes: Option<String>,
    pub decision_text: Option<String>,
    pub follow_up_text: Option<String>,
    pub outcome: MeetingCaseOutcome,
}
