use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

// Seed roles referenced by the authorization checks. Looked up by name,
// not modeled as an enum, so operators can add further roles at runtime.
pub const COMMUNITY_ADMIN: &str = "Community Admin";
pub const COMMUNITY_MODERATOR: &str = "Community Moderator";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Role {
    pub async fn create(db: &PgPool, name: &str) -> anyhow::Result<Role> {
        let role = sqlx::query_as::<_, Role>(
            r#"
            INSERT INTO roles (id, name)
            VALUES ($1, $2)
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(name)
        .fetch_one(db)
        .await?;
        Ok(role)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Role>> {
        let role = sqlx::query_as::<_, Role>(
            r#"
            SELECT id, name, created_at, updated_at
            FROM roles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(role)
    }

    pub async fn find_by_name(db: &PgPool, name: &str) -> anyhow::Result<Option<Role>> {
        let role = sqlx::query_as::<_, Role>(
            r#"
            SELECT id, name, created_at, updated_at
            FROM roles
            WHERE name = $1
            ORDER BY id ASC
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(db)
        .await?;
        Ok(role)
    }

    pub async fn count_all(db: &PgPool) -> anyhow::Result<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM roles")
            .fetch_one(db)
            .await?;
        Ok(total)
    }

    pub async fn list_page(db: &PgPool, limit: i64, offset: i64) -> anyhow::Result<Vec<Role>> {
        let rows = sqlx::query_as::<_, Role>(
            r#"
            SELECT id, name, created_at, updated_at
            FROM roles
            ORDER BY id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
