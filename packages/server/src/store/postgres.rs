//! PostgreSQL storage implementation using JSONB for the post arrays.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::{
    ContentKind, ContentPatch, ContentRecord, ContentStore, NewContent, StoreError, StoreResult,
};

/// PostgreSQL-backed content store.
pub struct PostgresContentStore {
    pool: PgPool,
}

impl PostgresContentStore {
    /// Create a store using the provided connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Raw row shape; converted to [`ContentRecord`] after fetch.
#[derive(Debug, sqlx::FromRow)]
struct ContentRow {
    id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    kind: String,
    provider: String,
    input_text: String,
    reference_posts: Json<Vec<String>>,
    idea: Option<String>,
    posts: Json<Vec<String>>,
}

impl TryFrom<ContentRow> for ContentRecord {
    type Error = StoreError;

    fn try_from(row: ContentRow) -> Result<Self, Self::Error> {
        let kind: ContentKind = row.kind.parse().map_err(StoreError::Corrupt)?;
        Ok(ContentRecord {
            id: row.id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            kind,
            provider: row.provider,
            input_text: row.input_text,
            reference_posts: row.reference_posts.0,
            idea: row.idea,
            posts: row.posts.0,
        })
    }
}

#[async_trait]
impl ContentStore for PostgresContentStore {
    async fn create(&self, draft: NewContent) -> StoreResult<ContentRecord> {
        let now = Utc::now();
        let id = Uuid::new_v4();

        let row = sqlx::query_as::<_, ContentRow>(
            r#"
            INSERT INTO contents (
                id, created_at, updated_at, kind, provider,
                input_text, reference_posts, idea, posts
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(now)
        .bind(now)
        .bind(draft.kind.as_str())
        .bind(&draft.provider)
        .bind(&draft.input_text)
        .bind(Json(&draft.reference_posts))
        .bind(&draft.idea)
        .bind(Json(&draft.posts))
        .fetch_one(&self.pool)
        .await?;

        debug!(content_id = %id, kind = draft.kind.as_str(), "content record created");
        row.try_into()
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<ContentRecord>> {
        let row = sqlx::query_as::<_, ContentRow>("SELECT * FROM contents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(ContentRecord::try_from).transpose()
    }

    async fn merge_update(&self, id: Uuid, patch: ContentPatch) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE contents SET
                kind = COALESCE($2, kind),
                provider = COALESCE($3, provider),
                input_text = COALESCE($4, input_text),
                reference_posts = COALESCE($5, reference_posts),
                idea = COALESCE($6, idea),
                posts = COALESCE($7, posts),
                updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(patch.kind.map(|k| k.as_str()))
        .bind(patch.provider)
        .bind(patch.input_text)
        .bind(patch.reference_posts.map(Json))
        .bind(patch.idea)
        .bind(patch.posts.map(Json))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn append_post(&self, id: Uuid, text: &str) -> StoreResult<bool> {
        // Single-statement JSONB concat: concurrent appends to the same
        // row serialize on the row lock, so none is lost.
        let result = sqlx::query(
            r#"
            UPDATE contents SET
                posts = posts || $2,
                updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(Json(vec![text.to_string()]))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM contents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, skip: i64, limit: i64) -> StoreResult<Vec<ContentRecord>> {
        let rows = sqlx::query_as::<_, ContentRow>(
            "SELECT * FROM contents ORDER BY created_at DESC OFFSET $1 LIMIT $2",
        )
        .bind(skip.max(0))
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ContentRecord::try_from).collect()
    }
}
