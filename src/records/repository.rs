//! Daily life record repository.

use sqlx::QueryBuilder;

use super::types::{DailyLifeRecord, NewRecord, RecordUpdate};
use crate::datetime;
use crate::db::{DbBackend, DbPool, DEL_FLAG_ACTIVE, DEL_FLAG_DELETED};
use crate::Result;

const RECORD_COLUMNS: &str = "id, content, del_flag, create_by, create_time, update_by,
                              update_time, remark";

/// Repository for daily life records.
pub struct RecordRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> RecordRepository<'a> {
    /// Create a new RecordRepository with the given pool.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new record stamped with the current time.
    pub async fn create(&self, record: &NewRecord) -> Result<DailyLifeRecord> {
        let query = format!(
            "INSERT INTO daily_life_records (content, del_flag, create_by, create_time, remark)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {RECORD_COLUMNS}"
        );
        let record = sqlx::query_as::<_, DailyLifeRecord>(&query)
            .bind(&record.content)
            .bind(DEL_FLAG_ACTIVE)
            .bind(&record.create_by)
            .bind(datetime::now_db())
            .bind(&record.remark)
            .fetch_one(self.pool)
            .await?;
        Ok(record)
    }

    /// List live records, newest first.
    pub async fn list(&self) -> Result<Vec<DailyLifeRecord>> {
        let query = format!(
            "SELECT {RECORD_COLUMNS} FROM daily_life_records
             WHERE del_flag = $1
             ORDER BY create_time DESC, id DESC"
        );
        let records = sqlx::query_as::<_, DailyLifeRecord>(&query)
            .bind(DEL_FLAG_ACTIVE)
            .fetch_all(self.pool)
            .await?;
        Ok(records)
    }

    /// Update a live record. Returns false if it doesn't exist.
    pub async fn update(&self, id: i64, update: &RecordUpdate) -> Result<bool> {
        let mut query: QueryBuilder<DbBackend> = QueryBuilder::new("UPDATE daily_life_records SET ");
        let mut separated = query.separated(", ");

        if let Some(ref content) = update.content {
            separated.push("content = ");
            separated.push_bind_unseparated(content.clone());
        }
        if let Some(ref remark) = update.remark {
            separated.push("remark = ");
            separated.push_bind_unseparated(remark.clone());
        }
        separated.push("update_by = ");
        separated.push_bind_unseparated(update.update_by.clone());
        separated.push("update_time = ");
        separated.push_bind_unseparated(datetime::now_db());

        query.push(" WHERE id = ");
        query.push_bind(id);
        query.push(" AND del_flag = ");
        query.push_bind(DEL_FLAG_ACTIVE);

        let result = query.build().execute(self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Soft-delete a record. Returns false if it doesn't exist.
    pub async fn delete(&self, id: i64, deleted_by: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE daily_life_records SET del_flag = $1, update_by = $2, update_time = $3
             WHERE id = $4 AND del_flag = $5",
        )
        .bind(DEL_FLAG_DELETED)
        .bind(deleted_by)
        .bind(datetime::now_db())
        .bind(id)
        .bind(DEL_FLAG_ACTIVE)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
