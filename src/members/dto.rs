use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::members::repo::MemberWithRefs;

/// Request body for adding a member. All three ids are required; absent
/// fields are reported as batched input errors.
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub community: Option<Uuid>,
    pub user: Option<Uuid>,
    pub role: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct UserRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct RoleRef {
    pub id: Uuid,
    pub name: String,
}

/// Listing item with user and role expanded to `{id, name}`.
#[derive(Debug, Serialize)]
pub struct MemberItem {
    pub id: Uuid,
    pub community: Uuid,
    pub user: UserRef,
    pub role: RoleRef,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<MemberWithRefs> for MemberItem {
    fn from(r: MemberWithRefs) -> Self {
        Self {
            id: r.id,
            community: r.community_id,
            user: UserRef {
                id: r.user_id,
                name: r.user_name,
            },
            role: RoleRef {
                id: r.role_id,
                name: r.role_name,
            },
            created_at: r.created_at,
        }
    }
}
