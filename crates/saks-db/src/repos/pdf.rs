//! PDF generation log. Rows are written only by sequence allocation.

use saks_core::entities::PdfGeneration;
use saks_core::enums::PdfDocumentType;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum};
use crate::service::SaksService;

fn row_to_generation(row: &libsql::Row) -> Result<PdfGeneration, DatabaseError> {
    Ok(PdfGeneration {
        id: row.get::<i64>(0)?,
        meeting_id: row.get::<i64>(1)?,
        document_type: parse_enum(&row.get::<String>(2)?)?,
        sequence_number: row.get::<i64>(3)?,
        generated_at: parse_datetime(&row.get::<String>(4)?)?,
        generated_by: get_opt_string(row, 5)?,
    })
}

impl SaksService {
    /// Generations for a meeting, optionally limited to one document type,
    /// grouped by type in ascending sequence order.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_pdf_generations(
        &self,
        meeting_id: i64,
        document_type: Option<PdfDocumentType>,
    ) -> Result<Vec<PdfGeneration>, DatabaseError> {
        let mut params: Vec<libsql::Value> = vec![libsql::Value::Integer(meeting_id)];
        let type_clause = if let Some(dt) = document_type {
            params.push(libsql::Value::Text(dt.as_str().to_string()));
            "AND document_type = ?2"
        } else {
            ""
        };

        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT id, meeting_id, document_type, sequence_number, generated_at, generated_by
                     FROM pdf_generations
                     WHERE meeting_id = ?1 {type_clause}
                     ORDER BY document_type ASC, sequence_number ASC"
                ),
                libsql::params_from_iter(params),
            )
            .await?;

        let mut generations = Vec::new();
        while let Some(row) = rows.next().await? {
            generations.push(row_to_generation(&row)?);
        }
        Ok(generations)
    }
}
