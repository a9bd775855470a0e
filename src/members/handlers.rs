use axum::{
    extract::State,
    routing::{delete, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{extractors::AuthUser, repo::User},
    authz,
    communities::repo::Community,
    error::{ApiError, ErrorCode, FieldError},
    extract::{ApiJson, ApiPath},
    members::{dto::AddMemberRequest, repo::Member},
    response::{DataResponse, StatusResponse},
    roles::repo::{Role, COMMUNITY_ADMIN, COMMUNITY_MODERATOR},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/member", post(add_member))
        .route("/member/:id", delete(remove_member))
}

fn validate_add(req: &AddMemberRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    for (param, present) in [
        ("community", req.community.is_some()),
        ("user", req.user.is_some()),
        ("role", req.role.is_some()),
    ] {
        if !present {
            errors.push(FieldError::with_param(
                param,
                ErrorCode::InvalidInput,
                "This field is required.",
            ));
        }
    }
    errors
}

/// Only the community's owner may add members.
#[instrument(skip(state, payload))]
pub async fn add_member(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    ApiJson(payload): ApiJson<AddMemberRequest>,
) -> Result<Json<DataResponse<Member>>, ApiError> {
    let errors = validate_add(&payload);
    let (Some(community_id), Some(user_id), Some(role_id)) =
        (payload.community, payload.user, payload.role)
    else {
        return Err(ApiError::invalid_input(errors));
    };

    let community = Community::find_by_id(&state.db, community_id)
        .await?
        .ok_or_else(|| ApiError::not_found(Some("community"), "Community not found."))?;

    if !authz::is_community_owner(me.id, &community) {
        warn!(user_id = %me.id, community_id = %community.id, "add_member by non-owner");
        return Err(ApiError::not_allowed());
    }

    Role::find_by_id(&state.db, role_id)
        .await?
        .ok_or_else(|| ApiError::not_found(Some("role"), "Role not found."))?;

    User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(Some("user"), "User not found."))?;

    let member = Member::insert_if_absent(&state.db, community.id, user_id, role_id)
        .await?
        .ok_or_else(|| {
            ApiError::resource_exists(None, "User is already added in the community.")
        })?;

    info!(member_id = %member.id, community_id = %community.id, "member added");
    Ok(Json(DataResponse::new(member)))
}

/// Removal requires an Admin or Moderator role in the member's community,
/// checked against current rows so revocations apply immediately.
#[instrument(skip(state))]
pub async fn remove_member(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<StatusResponse>, ApiError> {
    let member = Member::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found(None, "Member not found."))?;

    let allowed = authz::has_role_in_community(
        &state.db,
        me.id,
        member.community_id,
        &[COMMUNITY_ADMIN, COMMUNITY_MODERATOR],
    )
    .await?;
    if !allowed {
        warn!(user_id = %me.id, member_id = %id, "remove_member without admin/moderator role");
        return Err(ApiError::not_allowed());
    }

    Member::delete(&state.db, id).await?;
    info!(member_id = %id, "member removed");
    Ok(Json(StatusResponse::ok()))
}
