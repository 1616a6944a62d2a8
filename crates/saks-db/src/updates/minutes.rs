//! Minutes entry update builder.

use chrono::NaiveDate;
use saks_core::enums::MeetingCaseOutcome;
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct MinutesEntryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub official_notes: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision_text: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up_text: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<MeetingCaseOutcome>,
}

pub struct MinutesEntryUpdateBuilder(MinutesEntryUpdate);

impl MinutesEntryUpdateBuilder {
    pub fn new() -> Self {
        Self(MinutesEntryUpdate::default())
    }

    pub fn official_notes(mut self, val: Option<String>) -> Self {
        self.0.official_notes = Some(val);
        self
    }

    pub fn decision_text(mut self, val: Option<String>) -> Self {
        self.0.decision_text = Some(val);
        self
    }

    pub fn follow_up_text(mut self, val: Option<String>) -> Self {
        self.0.follow_up_text = Some(val);
        self
    }

    pub fn outcome(mut self, val: MeetingCaseOutcome) -> Self {
        self.0.outcome = Some(val);
        self
    }

    pub fn build(self) -> MinutesEntryUpdate {
        self.0
    }
}

/// Edits to the minutes header of a meeting.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MinutesUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance_text: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub absence_text: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_of_previous_minutes_text: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_meeting_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_business_text: Option<Option<String>>,
}

pub struct MinutesUpdateBuilder(MinutesUpdate);

impl MinutesUpdateBuilder {
    pub fn new() -> Self {
        Self(MinutesUpdate::default())
    }

    pub fn attendance_text(mut self, val: Option<String>) -> Self {
        self.0.attendance_text = Some(val);
        self
    }

    pub fn absence_text(mut self, val: Option<String>) -> Self {
        self.0.absence_text = Some(val);
        self
    }

    pub fn approval_of_previous_minutes_text(mut self, val: Option<String>) -> Self {
        self.0.approval_of_previous_minutes_text = Some(val);
        self
    }

    pub fn next_meeting_date(mut self, val: Option<NaiveDate>) -> Self {
        self.0.next_meeting_date = Some(val);
        self
    }

    pub fn other_business_text(mut self, val: Option<String>) -> Self {
        self.0.other_business_text = Some(val);
        self
    }

    pub fn build(self) -> MinutesUpdate {
        self.0
    }
}
