//! Repository for membership and news operations.
//!
//! Member records and news articles live under key prefixes; the member count
//! is a separate scalar that is incremented on every join rather than derived.

use chrono::Utc;
use serde_json::Value;
use sqlx::SqlitePool;
use tokio::sync::Mutex;

use super::KvStore;
use crate::errors::AppError;
use crate::models::{seed_articles, sort_newest_first, JoinRequest, Member, NewsArticle};

/// Key prefix of member records.
pub const MEMBER_PREFIX: &str = "member_";
/// Key prefix of news articles.
pub const NEWS_PREFIX: &str = "news_";
/// Key of the running member count. Shares the member prefix.
pub const MEMBER_COUNT_KEY: &str = "member_count";

/// Repository for all data operations.
pub struct Repository {
    kv: KvStore,
    /// Serializes the count read-modify-write within this process.
    count_lock: Mutex<()>,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            kv: KvStore::new(pool),
            count_lock: Mutex::new(()),
        }
    }

    /// Underlying key-value store.
    pub fn kv(&self) -> &KvStore {
        &self.kv
    }

    // ==================== MEMBER OPERATIONS ====================

    /// Persist a new member and bump the member count.
    ///
    /// The record write and the count update are separate store operations.
    /// If the count write fails after the record is stored, the record stays
    /// and the count is left behind.
    pub async fn create_member(&self, request: JoinRequest) -> Result<Member, AppError> {
        let member = Member::from_request(new_member_id(), request, Utc::now());
        let value = serde_json::to_value(&member)?;

        self.kv.set(&member.id, &value).await?;

        let count = {
            let _guard = self.count_lock.lock().await;
            let current = self.stored_count().await?;
            let next = current + 1;
            self.kv.set(MEMBER_COUNT_KEY, &Value::from(next)).await?;
            next
        };

        tracing::info!(member_id = %member.id, count, "Member joined");
        Ok(member)
    }

    /// Current member count, 0 when never set.
    pub async fn member_count(&self) -> Result<i64, AppError> {
        self.stored_count().await
    }

    async fn stored_count(&self) -> Result<i64, AppError> {
        Ok(self
            .kv
            .get(MEMBER_COUNT_KEY)
            .await?
            .map(|v| parse_count(&v))
            .unwrap_or(0))
    }

    /// All member records, in no particular order.
    pub async fn list_members(&self) -> Result<Vec<Member>, AppError> {
        let entries = self.kv.get_by_prefix(MEMBER_PREFIX).await?;

        let members = entries
            .into_iter()
            .filter(|(key, _)| key != MEMBER_COUNT_KEY)
            .filter_map(|(key, value)| match serde_json::from_value::<Member>(value) {
                Ok(member) => Some(member),
                Err(e) => {
                    tracing::warn!("Skipping malformed member record {}: {}", key, e);
                    None
                }
            })
            .collect();

        Ok(members)
    }

    // ==================== NEWS OPERATIONS ====================

    /// All news articles, most recently published first.
    pub async fn list_news(&self) -> Result<Vec<NewsArticle>, AppError> {
        let entries = self.kv.get_by_prefix(NEWS_PREFIX).await?;

        let mut articles: Vec<NewsArticle> = entries
            .into_iter()
            .filter_map(|(key, value)| match serde_json::from_value::<NewsArticle>(value) {
                Ok(article) => Some(article),
                Err(e) => {
                    tracing::warn!("Skipping malformed news record {}: {}", key, e);
                    None
                }
            })
            .collect();

        sort_newest_first(&mut articles);
        Ok(articles)
    }

    // ==================== INITIALIZATION ====================

    /// Idempotent bootstrap: zero the count if absent and seed news if none exists.
    pub async fn initialize(&self) -> Result<(), AppError> {
        {
            let _guard = self.count_lock.lock().await;
            if self.kv.get(MEMBER_COUNT_KEY).await?.is_none() {
                self.kv.set(MEMBER_COUNT_KEY, &Value::from(0)).await?;
                tracing::info!("Initialized member count");
            }
        }

        let existing = self.kv.get_by_prefix(NEWS_PREFIX).await?;
        if existing.is_empty() {
            for article in seed_articles() {
                let value = serde_json::to_value(&article)?;
                self.kv.set(&article.id, &value).await?;
            }
            tracing::info!("Seeded news articles");
        }

        Ok(())
    }
}

/// `member_<unix millis>_<9 char random token>`.
fn new_member_id() -> String {
    let token = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{}{}_{}",
        MEMBER_PREFIX,
        Utc::now().timestamp_millis(),
        &token[..9]
    )
}

/// Read a stored count, accepting a whole JSON number or a numeric string.
fn parse_count(value: &Value) -> i64 {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(count) => count,
            None => match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f >= 0.0 && f <= i64::MAX as f64 => f as i64,
                _ => {
                    tracing::warn!("Member count {} is not a whole number, treating as 0", n);
                    0
                }
            },
        },
        Value::String(s) => s.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Member count {:?} is not a number, treating as 0", s);
            0
        }),
        other => {
            tracing::warn!("Member count has unexpected type {:?}, treating as 0", other);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::TempDir;

    async fn repo() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_database(&temp_dir.path().join("repo.sqlite"))
            .await
            .unwrap();
        (Repository::new(pool), temp_dir)
    }

    fn join(name: &str) -> JoinRequest {
        JoinRequest {
            name: name.to_string(),
            email: format!("{}@x.com", name.to_lowercase()),
            university: "Unilag".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_member_id_format() {
        let id = new_member_id();
        let parts: Vec<_> = id.splitn(3, '_').collect();
        assert_eq!(parts[0], "member");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
        assert_ne!(new_member_id(), new_member_id());
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(&json!(7)), 7);
        assert_eq!(parse_count(&json!("12")), 12);
        assert_eq!(parse_count(&json!(3.0)), 3);
        assert_eq!(parse_count(&json!(2.5)), 0);
        assert_eq!(parse_count(&json!("many")), 0);
        assert_eq!(parse_count(&json!(null)), 0);
    }

    #[tokio::test]
    async fn test_join_continues_from_whole_float_count() {
        let (repo, _dir) = repo().await;
        repo.kv().set(MEMBER_COUNT_KEY, &json!(3.0)).await.unwrap();

        repo.create_member(join("Ada")).await.unwrap();
        assert_eq!(repo.member_count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_empty_store_count_is_zero() {
        let (repo, _dir) = repo().await;
        assert_eq!(repo.member_count().await.unwrap(), 0);
        assert!(repo.list_members().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_member_increments_count() {
        let (repo, _dir) = repo().await;
        let member = repo.create_member(join("Ada")).await.unwrap();
        repo.create_member(join("Ada")).await.unwrap();

        assert!(member.id.starts_with(MEMBER_PREFIX));
        assert_eq!(repo.member_count().await.unwrap(), 2);

        // Duplicates by email are allowed, and the count key is not listed.
        let members = repo.list_members().await.unwrap();
        assert_eq!(members.len(), 2);
        assert!(members.iter().any(|m| m.id == member.id));
    }

    #[tokio::test]
    async fn test_concurrent_joins_do_not_lose_increments() {
        let (repo, _dir) = repo().await;
        let repo = Arc::new(repo);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.create_member(join(&format!("M{}", i))).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(repo.member_count().await.unwrap(), 8);
    }

    #[tokio::test]
    async fn test_malformed_member_record_is_skipped() {
        let (repo, _dir) = repo().await;
        repo.kv()
            .set("member_broken", &json!({"id": "member_broken"}))
            .await
            .unwrap();
        repo.create_member(join("Ada")).await.unwrap();

        let members = repo.list_members().await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].name, "Ada");
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let (repo, _dir) = repo().await;
        repo.initialize().await.unwrap();
        repo.create_member(join("Ada")).await.unwrap();
        repo.initialize().await.unwrap();

        assert_eq!(repo.member_count().await.unwrap(), 1);
        assert_eq!(repo.list_news().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_initialize_skips_seeding_when_news_exists() {
        let (repo, _dir) = repo().await;
        let mut custom = seed_articles().remove(1);
        custom.id = "news_custom".to_string();
        repo.kv()
            .set(&custom.id, &serde_json::to_value(&custom).unwrap())
            .await
            .unwrap();

        repo.initialize().await.unwrap();

        let news = repo.list_news().await.unwrap();
        assert_eq!(news.len(), 1);
        assert_eq!(news[0].id, "news_custom");
    }

    #[tokio::test]
    async fn test_news_sorted_newest_first() {
        let (repo, _dir) = repo().await;
        let mut late = seed_articles().remove(0);
        late.id = "news_late".to_string();
        late.published_at = "2025-06-01T00:00:00Z".parse().unwrap();
        repo.kv()
            .set(&late.id, &serde_json::to_value(&late).unwrap())
            .await
            .unwrap();
        repo.initialize().await.unwrap();
        // Seeding is skipped because news already exists.
        assert_eq!(repo.list_news().await.unwrap().len(), 1);

        for article in seed_articles() {
            repo.kv()
                .set(&article.id, &serde_json::to_value(&article).unwrap())
                .await
                .unwrap();
        }

        let news = repo.list_news().await.unwrap();
        assert!(news
            .windows(2)
            .all(|w| w[0].published_at >= w[1].published_at));
        assert_eq!(news[0].id, "news_late");
    }
}
