//! Board case update builder.

use chrono::NaiveDate;
use saks_core::enums::{CasePriority, CaseStatus};
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct CaseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<CasePriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CaseStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_deadline_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_deadline_text: Option<Option<String>>,
}

pub struct CaseUpdateBuilder(CaseUpdate);

impl CaseUpdateBuilder {
    pub fn new() -> Self {
        Self(CaseUpdate::default())
    }

    pub fn title(mut self, val: impl Into<String>) -> Self {
        self.0.title = Some(val.into());
        self
    }

    pub fn description(mut self, val: Option<String>) -> Self {
        self.0.description = Some(val);
        self
    }

    pub fn theme(mut self, val: Option<String>) -> Self {
        self.0.theme = Some(val);
        self
    }

    pub fn priority(mut self, val: CasePriority) -> Self {
        self.0.priority = Some(val);
        self
    }

    pub fn assignee_user_id(mut self, val: impl Into<String>) -> Self {
        self.0.assignee_user_id = Some(val.into());
        self
    }

    pub fn start_date(mut self, val: NaiveDate) -> Self {
        self.0.start_date = Some(val);
        self
    }

    pub fn status(mut self, val: CaseStatus) -> Self {
        self.0.status = Some(val);
        self
    }

    pub fn closed_date(mut self, val: Option<NaiveDate>) -> Self {
        self.0.closed_date = Some(val);
        self
    }

    pub fn custom_deadline_date(mut self, val: Option<NaiveDate>) -> Self {
        self.0.custom_deadline_date = Some(val);
        self
    }

    pub fn custom_deadline_text(mut self, val: Option<String>) -> Self {
        self.0.custom_deadline_text = Some(val);
        self
    }

    pub fn build(self) -> CaseUpdate {
        self.0
    }
}
