//! Case timeline: comments and minutes entries merged into one history.
//!
//! Minutes entries carry no timestamp of their own, so they are dated at noon UTC
//! on the meeting date. Items are ordered newest first, then minutes before
//! comments on equal timestamps, then by descending row id.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{CaseComment, Meeting, MinutesEntry};
use crate::enums::{MeetingCaseOutcome, TimelineItemKind};

/// One entry in a case timeline.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TimelineItem {
    pub kind: TimelineItemKind,
    pub occurred_at: DateTime<Utc>,
    /// Row id of the source record, used as the last tie-breaker.
    pub sort_id: i64,
    #[serde(flatten)]
    pub detail: TimelineDetail,
}

/// Kind-specific payload of a timeline item.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(untagged)]
pub enum TimelineDetail {
    Comment {
        comment_id: i64,
        text: String,
        author: Option<String>,
    },
    Minutes {
        entry_id: i64,
        meeting_id: i64,
        meeting_date: NaiveDate,
        meeting_year: i32,
        meeting_year_sequence_number: i32,
        outcome: MeetingCaseOutcome,
        official_notes: Option<String>,
        decision_text: Option<String>,
        follow_up_text: Option<String>,
    },
}

/// Timestamp used for a minutes entry held at a meeting on `date`.
#[must_use]
pub fn minutes_timestamp(date: NaiveDate) -> DateTime<Utc> {
    let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN);
    date.and_time(noon).and_utc()
}

/// Merge comments and minutes entries (paired with their meeting) into a
/// reverse-chronological timeline.
#[must_use]
pub fn merge_timeline(
    comments: &[CaseComment],
    minutes: &[(MinutesEntry, Meeting)],
) -> Vec<TimelineItem> {
    let mut items = Vec::with_capacity(comments.len() + minutes.len());

    for comment in comments {
        items.push(TimelineItem {
            kind: TimelineItemKind::Comment,
            occurred_at: comment.created_at,
            sort_id: comment.id,
            detail: TimelineDetail::Comment {
                comment_id: comment.id,
                text: comment.text.clone(),
                author: comment.created_by.clone(),
            },
        });
    }

    for (entry, meeting) in minutes {
        items.push(TimelineItem {
            kind: TimelineItemKind::Minutes,
            occurred_at: minutes_timestamp(meeting.meeting_date),
            sort_id: entry.id,
            detail: TimelineDetail::Minutes {
                entry_id: entry.id,
                meeting_id: meeting.id,
                meeting_date: meeting.meeting_date,
                meeting_year: meeting.year,
                meeting_year_sequence_number: meeting.year_sequence_number,
                outcome: entry.outcome,
                official_notes: entry.official_notes.clone(),
                decision_text: entry.decision_text.clone(),
                follow_up_text: entry.follow_up_text.clone(),
            },
        });
    }

    items.sort_by(|a, b| {
        b.occurred_at
            .cmp(&a.occurred_at)
            .then_with(|| b.kind.cmp(&a.kind))
            .then_with(|| b.sort_id.cmp(&a.sort_id))
    });
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn comment(id: i64, at: DateTime<Utc>) -> CaseComment {
        CaseComment {
            id,
            case_id: 1,
            text: format!("comment {id}"),
            created_at: at,
            created_by: Some("u1".into()),
            is_deleted: false,
            deleted_at: None,
            deleted_by: None,
        }
    }

    fn meeting(id: i64, date: NaiveDate) -> Meeting {
        Meeting {
            id,
            meeting_date: date,
            year: 2026,
            year_sequence_number: 1,
            location: None,
            created_at: Utc::now(),
            is_deleted: false,
            deleted_at: None,
            deleted_by: None,
        }
    }

    fn entry(id: i64, meeting_id: i64) -> MinutesEntry {
        MinutesEntry {
            id,
            meeting_id,
            meeting_case_id: 1,
            case_id: 1,
            official_notes: None,
            decision_text: None,
            follow_up_text: None,
            outcome: MeetingCaseOutcome::Continue,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_inputs_give_empty_timeline() {
        assert!(merge_timeline(&[], &[]).is_empty());
    }

    #[test]
    fn minutes_dated_at_noon_utc() {
        let ts = minutes_timestamp(date(2026, 2, 10));
        assert_eq!(ts, Utc.with_ymd_and_hms(2026, 2, 10, 12, 0, 0).unwrap());
    }

    #[test]
    fn newest_first_across_kinds() {
        let comments = [
            comment(1, Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap()),
            comment(2, Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()),
        ];
        let minutes = [(entry(7, 3), meeting(3, date(2026, 2, 10)))];

        let order: Vec<(TimelineItemKind, i64)> = merge_timeline(&comments, &minutes)
            .into_iter()
            .map(|item| (item.kind, item.sort_id))
            .collect();

        assert_eq!(
            order,
            vec![
                (TimelineItemKind::Comment, 2),
                (TimelineItemKind::Minutes, 7),
                (TimelineItemKind::Comment, 1),
            ]
        );
    }

    #[test]
    fn minutes_before_comment_on_same_timestamp() {
        let noon = Utc.with_ymd_and_hms(2026, 2, 10, 12, 0, 0).unwrap();
        let comments = [comment(99, noon)];
        let minutes = [(entry(1, 3), meeting(3, date(2026, 2, 10)))];

        let items = merge_timeline(&comments, &minutes);
        assert_eq!(items[0].kind, TimelineItemKind::Minutes);
        assert_eq!(items[1].kind, TimelineItemKind::Comment);
    }

    #[test]
    fn sort_id_breaks_remaining_ties() {
        let at = Utc.with_ymd_and_hms(2026, 4, 1, 8, 0, 0).unwrap();
        let comments = [comment(3, at), comment(5, at), comment(4, at)];
        let ids: Vec<i64> = merge_timeline(&comments, &[])
            .iter()
            .map(|item| item.sort_id)
            .collect();
        assert_eq!(ids, vec![5, 4, 3]);
    }
}
