//! Case timeline assembly.

use saks_core::timeline::{TimelineItem, merge_timeline};

use crate::error::DatabaseError;
use crate::repos::case::live_case;
use crate::repos::comment::comments_for_case;
use crate::repos::meeting::{MEETING_COLUMNS, row_to_meeting_at};
use crate::repos::minutes::{ENTRY_COLUMNS, row_to_entry};
use crate::service::SaksService;

/// Number of columns in `ENTRY_COLUMNS`; meeting columns follow them.
const ENTRY_COLUMN_COUNT: i32 = 8;

impl SaksService {
    /// Comments and minutes entries of a live case, newest first.
    ///
    /// Entries from deleted meetings or removed agenda items are left out.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown or deleted cases.
    pub async fn case_timeline(&self, case_id: i64) -> Result<Vec<TimelineItem>, DatabaseError> {
        let conn = self.db().conn();
        live_case(conn, case_id).await?;

        let comments = comments_for_case(conn, case_id).await?;

        let mut rows = conn
            .query(
                &format!(
                    "SELECT {ENTRY_COLUMNS}, {MEETING_COLUMNS}
                     FROM minutes_entries me
                     JOIN meetings m ON m.id = me.meeting_id
                     JOIN meeting_cases mc ON mc.id = me.meeting_case_id
                     WHERE me.case_id = ?1 AND m.is_deleted = 0 AND mc.is_deleted = 0"
                ),
                [case_id],
            )
            .await?;
        let mut minutes = Vec::new();
        while let Some(row) = rows.next().await? {
            minutes.push((row_to_entry(&row)?, row_to_meeting_at(&row, ENTRY_COLUMN_COUNT)?));
        }

        Ok(merge_timeline(&comments, &minutes))
    }
}
