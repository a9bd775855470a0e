use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Community {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub owner: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Community row joined with its owner's public fields.
#[derive(Debug, Clone, FromRow)]
pub struct CommunityWithOwner {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub owner_id: Uuid,
    pub owner_name: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Community {
    /// Inserts the community and seeds the creator as its admin member in
    /// one transaction, so a community never exists without its owner row.
    pub async fn create(
        db: &PgPool,
        name: &str,
        slug: &str,
        owner: Uuid,
        admin_role: Uuid,
    ) -> anyhow::Result<Community> {
        let mut tx = db.begin().await?;

        let community = sqlx::query_as::<_, Community>(
            r#"
            INSERT INTO communities (id, name, slug, owner)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, slug, owner, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(name)
        .bind(slug)
        .bind(owner)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO members (id, community_id, user_id, role_id)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(community.id)
        .bind(owner)
        .bind(admin_role)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(community)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Community>> {
        let community = sqlx::query_as::<_, Community>(
            r#"
            SELECT id, name, slug, owner, created_at, updated_at
            FROM communities
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(community)
    }

    /// Slugs are not unique; take the oldest match.
    pub async fn find_by_slug(db: &PgPool, slug: &str) -> anyhow::Result<Option<Community>> {
        let community = sqlx::query_as::<_, Community>(
            r#"
            SELECT id, name, slug, owner, created_at, updated_at
            FROM communities
            WHERE slug = $1
            ORDER BY id ASC
            LIMIT 1
            "#,
        )
        .bind(slug)
        .fetch_optional(db)
        .await?;
        Ok(community)
    }

    pub async fn count_all(db: &PgPool) -> anyhow::Result<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM communities")
            .fetch_one(db)
            .await?;
        Ok(total)
    }

    pub async fn list_page(
        db: &PgPool,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<CommunityWithOwner>> {
        let rows = sqlx::query_as::<_, CommunityWithOwner>(
            r#"
            SELECT c.id, c.name, c.slug,
                   u.id AS owner_id, u.name AS owner_name,
                   c.created_at, c.updated_at
            FROM communities c
            JOIN users u ON u.id = c.owner
            ORDER BY c.id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn count_owned_by(db: &PgPool, user_id: Uuid) -> anyhow::Result<i64> {
        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM communities WHERE owner = $1")
                .bind(user_id)
                .fetch_one(db)
                .await?;
        Ok(total)
    }

    pub async fn list_owned_by(
        db: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Community>> {
        let rows = sqlx::query_as::<_, Community>(
            r#"
            SELECT id, name, slug, owner, created_at, updated_at
            FROM communities
            WHERE owner = $1
            ORDER BY id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn count_joined_by(db: &PgPool, user_id: Uuid) -> anyhow::Result<i64> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM communities c
            WHERE EXISTS (
                SELECT 1 FROM members m
                WHERE m.community_id = c.id AND m.user_id = $1
            )
            "#,
        )
        .bind(user_id)
        .fetch_one(db)
        .await?;
        Ok(total)
    }

    pub async fn list_joined_by(
        db: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<CommunityWithOwner>> {
        let rows = sqlx::query_as::<_, CommunityWithOwner>(
            r#"
            SELECT c.id, c.name, c.slug,
                   u.id AS owner_id, u.name AS owner_name,
                   c.created_at, c.updated_at
            FROM communities c
            JOIN users u ON u.id = c.owner
            WHERE EXISTS (
                SELECT 1 FROM members m
                WHERE m.community_id = c.id AND m.user_id = $1
            )
            ORDER BY c.id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
