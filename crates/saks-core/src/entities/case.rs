use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{CasePriority, CaseStatus};

/// A case tracked by the board. `case_number` is gap-free and never reused.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BoardCase {
    pub id: i64,
    pub case_number: i64,
    pub title: String,
    pub description: Option<String>,
    pub theme: Option<String>,
    pub priority: CasePriority,
    pub assignee_user_id: String,
    pub start_date: NaiveDate,
    pub status: CaseStatus,
    pub closed_date: Option<NaiveDate>,
    pub custom_deadline_date: Option<NaiveDate>,
    pub custom_deadline_text: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<String>,
}

/// Input for creating a case. The case number is allocated by the store.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewCase {
    pub title: String,
    pub description: Option<String>,
    pub theme: Option<String>,
    pub priority: CasePriority,
    pub assignee_user_id: String,
    pub start_date: NaiveDate,
    pub status: CaseStatus,
    pub closed_date: Option<NaiveDate>,
    pub custom_deadline_date: Option<NaiveDate>,
    pub custom_deadline_text: Option<String>,
}

impl NewCase {
    /// A new open P2 case starting today with only a title and assignee.
    #[must_use]
    pub fn titled(title: impl Into<String>, assignee_user_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            theme: None,
            priority: CasePriority::default(),
            assignee_user_id: assignee_user_id.into(),
            start_date: Utc::now().date_naive(),
            status: CaseStatus::default(),
            closed_date: None,
            custom_deadline_date: None,
            custom_deadline_text: None,
        }
    }
}
