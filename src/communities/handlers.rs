use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::extractors::AuthUser,
    communities::{
        dto::{CommunityItem, CreateCommunityRequest},
        repo::Community,
    },
    error::{ApiError, ErrorCode, FieldError},
    extract::{ApiJson, ApiPath, ApiQuery},
    members::{dto::MemberItem, repo::Member},
    pagination::{PageMeta, PageParams, PageResponse},
    response::DataResponse,
    roles::repo::{Role, COMMUNITY_ADMIN},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/community", post(create_community).get(list_communities))
        .route("/community/:slug/members", get(list_community_members))
        .route("/community/me/owner", get(my_owned_communities))
        .route("/community/me/member", get(my_joined_communities))
}

/// Slug derivation: lowercase of the display name. Collisions are possible
/// and tolerated; slug lookups take the oldest match.
pub(crate) fn derive_slug(name: &str) -> String {
    name.to_lowercase()
}

// characters, not bytes
fn name_too_short(name: &str) -> bool {
    name.chars().count() < 2
}

#[instrument(skip(state, payload))]
pub async fn create_community(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    ApiJson(payload): ApiJson<CreateCommunityRequest>,
) -> Result<Json<DataResponse<Community>>, ApiError> {
    let name = payload.name.trim();
    if name_too_short(name) {
        return Err(ApiError::invalid_input(vec![FieldError::with_param(
            "name",
            ErrorCode::InvalidInput,
            "Name should be at least 2 characters.",
        )]));
    }

    let admin_role = Role::find_by_name(&state.db, COMMUNITY_ADMIN)
        .await?
        .ok_or_else(|| ApiError::internal("seed role 'Community Admin' is missing"))?;

    let slug = derive_slug(name);
    let community = Community::create(&state.db, name, &slug, me.id, admin_role.id).await?;

    info!(community_id = %community.id, owner = %me.id, "community created");
    Ok(Json(DataResponse::new(community)))
}

#[instrument(skip(state))]
pub async fn list_communities(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Json<PageResponse<CommunityItem>>, ApiError> {
    let params = params.clamped();
    let total = Community::count_all(&state.db).await?;
    let rows = Community::list_page(&state.db, params.limit(), params.offset()).await?;
    let data = rows.into_iter().map(CommunityItem::from).collect();
    Ok(Json(PageResponse::new(PageMeta::new(total, &params), data)))
}

#[instrument(skip(state))]
pub async fn list_community_members(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Json<PageResponse<MemberItem>>, ApiError> {
    let community = Community::find_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| ApiError::not_found(Some("community"), "Community not found."))?;

    let params = params.clamped();
    let total = Member::count_in_community(&state.db, community.id).await?;
    let rows =
        Member::list_in_community(&state.db, community.id, params.limit(), params.offset())
            .await?;
    let data = rows.into_iter().map(MemberItem::from).collect();
    Ok(Json(PageResponse::new(PageMeta::new(total, &params), data)))
}

#[instrument(skip(state))]
pub async fn my_owned_communities(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Json<PageResponse<Community>>, ApiError> {
    let params = params.clamped();
    let total = Community::count_owned_by(&state.db, me.id).await?;
    let data = Community::list_owned_by(&state.db, me.id, params.limit(), params.offset()).await?;
    Ok(Json(PageResponse::new(PageMeta::new(total, &params), data)))
}

#[instrument(skip(state))]
pub async fn my_joined_communities(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Json<PageResponse<CommunityItem>>, ApiError> {
    let params = params.clamped();
    let total = Community::count_joined_by(&state.db, me.id).await?;
    let rows =
        Community::list_joined_by(&state.db, me.id, params.limit(), params.offset()).await?;
    let data = rows.into_iter().map(CommunityItem::from).collect();
    Ok(Json(PageResponse::new(PageMeta::new(total, &params), data)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_is_lowercased_name() {
        assert_eq!(derive_slug("Rustaceans HQ"), "rustaceans hq");
        assert_eq!(derive_slug("already-lower"), "already-lower");
    }

    #[test]
    fn name_length_counts_characters_not_bytes() {
        assert!(name_too_short("é"));
        assert!(!name_too_short("éé"));
        assert!(!name_too_short("ok"));
    }
}
