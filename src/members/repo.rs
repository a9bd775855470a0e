use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Join row linking a user to a community under a role.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Member {
    pub id: Uuid,
    #[serde(rename = "community")]
    pub community_id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    #[serde(rename = "role")]
    pub role_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Member row joined with user and role names for listings.
#[derive(Debug, Clone, FromRow)]
pub struct MemberWithRefs {
    pub id: Uuid,
    pub community_id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub role_id: Uuid,
    pub role_name: String,
    pub created_at: OffsetDateTime,
}

impl Member {
    /// Atomic insert-if-absent keyed on (community, user). Returns `None`
    /// when a row already exists, with no window between check and insert.
    pub async fn insert_if_absent(
        db: &PgPool,
        community_id: Uuid,
        user_id: Uuid,
        role_id: Uuid,
    ) -> anyhow::Result<Option<Member>> {
        let row = sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO members (id, community_id, user_id, role_id)
            SELECT $1, $2, $3, $4
            WHERE NOT EXISTS (
                SELECT 1 FROM members WHERE community_id = $2 AND user_id = $3
            )
            RETURNING id, community_id, user_id, role_id, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(community_id)
        .bind(user_id)
        .bind(role_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Member>> {
        let member = sqlx::query_as::<_, Member>(
            r#"
            SELECT id, community_id, user_id, role_id, created_at
            FROM members
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(member)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_in_community(db: &PgPool, community_id: Uuid) -> anyhow::Result<i64> {
        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM members WHERE community_id = $1")
                .bind(community_id)
                .fetch_one(db)
                .await?;
        Ok(total)
    }

    pub async fn list_in_community(
        db: &PgPool,
        community_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<MemberWithRefs>> {
        let rows = sqlx::query_as::<_, MemberWithRefs>(
            r#"
            SELECT m.id, m.community_id,
                   u.id AS user_id, u.name AS user_name,
                   r.id AS role_id, r.name AS role_name,
                   m.created_at
            FROM members m
            JOIN users u ON u.id = m.user_id
            JOIN roles r ON r.id = m.role_id
            WHERE m.community_id = $1
            ORDER BY m.id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(community_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
