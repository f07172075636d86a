//! Namespaced key-value store over a single SQLite table.
//!
//! Values are JSON documents. Keys are namespaced by prefix (`member_`, `news_`).

use serde_json::Value;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;

/// Key-value store with get, upsert and literal prefix scan.
#[derive(Clone)]
pub struct KvStore {
    pool: SqlitePool,
}

impl KvStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the value stored under `key`, if any.
    pub async fn get(&self, key: &str) -> Result<Option<Value>, AppError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let raw: String = row.get("value");
                Ok(Some(serde_json::from_str(&raw)?))
            }
            None => Ok(None),
        }
    }

    /// Insert or replace the value stored under `key`.
    pub async fn set(&self, key: &str, value: &Value) -> Result<(), AppError> {
        let raw = serde_json::to_string(value)?;
        sqlx::query(
            "INSERT INTO kv_store (key, value) VALUES (?, ?) ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(&raw)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// All `(key, value)` pairs whose key starts with `prefix`. Order is unspecified.
    ///
    /// The prefix is compared literally and case-sensitively (no LIKE wildcards).
    pub async fn get_by_prefix(&self, prefix: &str) -> Result<Vec<(String, Value)>, AppError> {
        let rows = sqlx::query("SELECT key, value FROM kv_store WHERE substr(key, 1, length(?)) = ?")
            .bind(prefix)
            .bind(prefix)
            .fetch_all(&self.pool)
            .await?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            let key: String = row.get("key");
            let raw: String = row.get("value");
            match serde_json::from_str::<Value>(&raw) {
                Ok(value) => entries.push((key, value)),
                Err(e) => tracing::warn!("Skipping undecodable value under {}: {}", key, e),
            }
        }
        Ok(entries)
    }
}
