use sqlx::PgPool;
use uuid::Uuid;

use crate::communities::repo::Community;

/// True iff the user owns the community.
pub fn is_community_owner(user_id: Uuid, community: &Community) -> bool {
    community.owner == user_id
}

/// True iff the user holds one of the named roles in the community.
/// Always evaluated against current rows, never cached, so membership
/// changes take effect on the next request.
pub async fn has_role_in_community(
    db: &PgPool,
    user_id: Uuid,
    community_id: Uuid,
    role_names: &[&str],
) -> anyhow::Result<bool> {
    let names: Vec<String> = role_names.iter().map(|s| s.to_string()).collect();
    let found = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1
            FROM members m
            JOIN roles r ON r.id = m.role_id
            WHERE m.community_id = $1 AND m.user_id = $2 AND r.name = ANY($3)
        )
        "#,
    )
    .bind(community_id)
    .bind(user_id)
    .bind(names)
    .fetch_one(db)
    .await?;
    Ok(found)
}
