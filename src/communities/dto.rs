use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::communities::repo::CommunityWithOwner;

#[derive(Debug, Deserialize)]
pub struct CreateCommunityRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct OwnerRef {
    pub id: Uuid,
    pub name: String,
}

/// Listing item with the owner expanded to `{id, name}`.
#[derive(Debug, Serialize)]
pub struct CommunityItem {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub owner: OwnerRef,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<CommunityWithOwner> for CommunityItem {
    fn from(r: CommunityWithOwner) -> Self {
        Self {
            id: r.id,
            name: r.name,
            slug: r.slug,
            owner: OwnerRef {
                id: r.owner_id,
                name: r.owner_name,
            },
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}
