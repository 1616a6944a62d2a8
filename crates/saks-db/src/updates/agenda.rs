//! Agenda item update builder.

use chrono::NaiveDate;
use serde::Serialize;

/// Edits to one agenda item. The case itself is not touched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AgendaItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agenda_text_snapshot: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_override_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_override_text: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up_text_draft: Option<Option<String>>,
}

pub struct AgendaItemUpdateBuilder(AgendaItemUpdate);

impl AgendaItemUpdateBuilder {
    pub fn new() -> Self {
        Self(AgendaItemUpdate::default())
    }

    pub fn agenda_text_snapshot(mut self, val: impl Into<String>) -> Self {
        self.0.agenda_text_snapshot = Some(val.into());
        self
    }

    pub fn deadline_override_date(mut self, val: Option<NaiveDate>) -> Self {
        self.0.deadline_override_date = Some(val);
        self
    }

    pub fn deadline_override_text(mut self, val: Option<String>) -> Self {
        self.0.deadline_override_text = Some(val);
        self
    }

    pub fn follow_up_text_draft(mut self, val: Option<String>) -> Self {
        self.0.follow_up_text_draft = Some(val);
        self
    }

    pub fn build(self) -> AgendaItemUpdate {
        self.0
    }
}
