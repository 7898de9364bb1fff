/// Claim store - persistence of raw id tokens keyed by subject
use crate::{
    db::identity::{IdentityRecord, UpsertOutcome},
    error::IdentityResult,
};
use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Key-value storage of raw claims by subject.
///
/// A single `upsert` must be atomic with respect to concurrent `get` and
/// `upsert` calls for the same subject.
#[async_trait]
pub trait ClaimStore: Send + Sync {
    /// Look up the record for a subject
    async fn get(&self, sub: &str) -> IdentityResult<Option<IdentityRecord>>;

    /// Insert the token for a subject or replace the stored one in place
    async fn upsert(&self, sub: &str, idtoken: &str) -> IdentityResult<UpsertOutcome>;
}

/// SQLite-backed claim store
#[derive(Clone)]
pub struct SqliteClaimStore {
    db: SqlitePool,
}

impl SqliteClaimStore {
    /// Create a new claim store
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ClaimStore for SqliteClaimStore {
    async fn get(&self, sub: &str) -> IdentityResult<Option<IdentityRecord>> {
        let record = sqlx::query_as::<_, IdentityRecord>(
            r#"
            SELECT id, sub, idtoken
            FROM user_identities
            WHERE sub = ?1
            "#,
        )
        .bind(sub)
        .fetch_optional(&self.db)
        .await?;

        Ok(record)
    }

    async fn upsert(&self, sub: &str, idtoken: &str) -> IdentityResult<UpsertOutcome> {
        // The generated id is only used when no row exists for this sub
        let result = sqlx::query(
            r#"
            INSERT INTO user_identities (id, sub, idtoken)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(sub) DO UPDATE SET
                idtoken = excluded.idtoken
            WHERE user_identities.idtoken IS NOT excluded.idtoken
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(sub)
        .bind(idtoken)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            Ok(UpsertOutcome::Unchanged)
        } else {
            Ok(UpsertOutcome::Written)
        }
    }
}
