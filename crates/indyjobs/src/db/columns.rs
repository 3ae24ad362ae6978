//! SQL column conversions for domain enums.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::industry::{IndustryActivity, IndustryJobStatus};

impl ToSql for IndustryJobStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

/// Unmapped strings read back as `Undefined`, the same as on ingestion.
impl FromSql for IndustryJobStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str().map(IndustryJobStatus::decode)
    }
}

impl ToSql for IndustryActivity {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.id()))
    }
}

impl FromSql for IndustryActivity {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let id = i32::column_result(value)?;
        IndustryActivity::try_from(id).map_err(|_| FromSqlError::OutOfRange(i64::from(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_status_column_round_trip() {
        let conn = Connection::open_in_memory().unwrap();
        for status in [IndustryJobStatus::Undefined, IndustryJobStatus::Reverted] {
            let back: IndustryJobStatus = conn
                .query_row("SELECT ?1", [status], |r| r.get(0))
                .unwrap();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn test_unmapped_status_column_reads_undefined() {
        let conn = Connection::open_in_memory().unwrap();
        let status: IndustryJobStatus = conn
            .query_row("SELECT 'in_flight'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(status, IndustryJobStatus::Undefined);
    }

    #[test]
    fn test_activity_column_rejects_unknown_id() {
        let conn = Connection::open_in_memory().unwrap();
        let ok: IndustryActivity = conn.query_row("SELECT 11", [], |r| r.get(0)).unwrap();
        assert_eq!(ok, IndustryActivity::Reactions);
        let err = conn.query_row("SELECT 2", [], |r| r.get::<_, IndustryActivity>(0));
        assert!(err.is_err());
    }
}
