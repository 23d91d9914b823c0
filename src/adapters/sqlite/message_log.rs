//! SQLite-backed topic log.
//!
//! Each `(topic, partition)` is an append-only sequence of payloads with
//! dense offsets starting at 0. Consumer groups keep their position in
//! `consumer_offsets`, so a restarted consumer resumes where it stopped.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::domain::errors::DomainResult;
use crate::domain::models::{PublishReceipt, QueueMessage};
use crate::domain::ports::MessageLog;

/// Topic/partition message log with consumer-group offsets, stored in SQLite.
#[derive(Clone)]
pub struct SqliteMessageLog {
    pool: SqlitePool,
}

impl SqliteMessageLog {
    /// Wrap an already migrated pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageLog for SqliteMessageLog {
    async fn append(&self, topic: &str, partition: i32, payload: &[u8]) -> DomainResult<PublishReceipt> {
        // Offset assignment and insert happen in one statement; SQLite
        // serializes writers, so two appends never observe the same MAX.
        let offset: i64 = sqlx::query_scalar(
            r#"INSERT INTO queue_messages (topic, partition_no, log_offset, payload, published_at)
               SELECT ?, ?, COALESCE(MAX(log_offset) + 1, 0), ?, ?
               FROM queue_messages WHERE topic = ? AND partition_no = ?
               RETURNING log_offset"#
        )
        .bind(topic)
        .bind(partition)
        .bind(payload)
        .bind(Utc::now().to_rfc3339())
        .bind(topic)
        .bind(partition)
        .fetch_one(&self.pool)
        .await?;

        Ok(PublishReceipt { partition, offset })
    }

    async fn fetch(
        &self,
        topic: &str,
        partition: i32,
        from_offset: i64,
        limit: u32,
    ) -> DomainResult<Vec<QueueMessage>> {
        let rows: Vec<MessageRow> = sqlx::query_as(
            r#"SELECT log_offset, payload FROM queue_messages
               WHERE topic = ? AND partition_no = ? AND log_offset >= ?
               ORDER BY log_offset ASC
               LIMIT ?"#
        )
        .bind(topic)
        .bind(partition)
        .bind(from_offset)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| QueueMessage {
                topic: topic.to_string(),
                partition,
                offset: row.log_offset,
                payload: row.payload,
            })
            .collect())
    }

    async fn oldest_offset(&self, topic: &str, partition: i32) -> DomainResult<Option<i64>> {
        let offset: Option<i64> = sqlx::query_scalar(
            "SELECT MIN(log_offset) FROM queue_messages WHERE topic = ? AND partition_no = ?"
        )
        .bind(topic)
        .bind(partition)
        .fetch_one(&self.pool)
        .await?;

        Ok(offset)
    }

    async fn committed_offset(&self, group: &str, topic: &str, partition: i32) -> DomainResult<Option<i64>> {
        let offset: Option<i64> = sqlx::query_scalar(
            "SELECT next_offset FROM consumer_offsets WHERE group_name = ? AND topic = ? AND partition_no = ?"
        )
        .bind(group)
        .bind(topic)
        .bind(partition)
        .fetch_optional(&self.pool)
        .await?;

        Ok(offset)
    }

    async fn commit_offset(&self, group: &str, topic: &str, partition: i32, next_offset: i64) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO consumer_offsets (group_name, topic, partition_no, next_offset, updated_at)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT(group_name, topic, partition_no)
               DO UPDATE SET next_offset = excluded.next_offset, updated_at = excluded.updated_at"#
        )
        .bind(group)
        .bind(topic)
        .bind(partition)
        .bind(next_offset)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct MessageRow {
    log_offset: i64,
    payload: Vec<u8>,
}
