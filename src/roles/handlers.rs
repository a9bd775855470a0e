use axum::{
    extract::State,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    error::{ApiError, ErrorCode, FieldError},
    extract::{ApiJson, ApiQuery},
    pagination::{PageMeta, PageParams, PageResponse},
    response::DataResponse,
    roles::{dto::CreateRoleRequest, repo::Role},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/role", post(create_role).get(list_roles))
}

// characters, not bytes
fn name_too_short(name: &str) -> bool {
    name.chars().count() < 2
}

#[instrument(skip(state, payload))]
pub async fn create_role(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateRoleRequest>,
) -> Result<Json<DataResponse<Role>>, ApiError> {
    let name = payload.name.trim();
    if name_too_short(name) {
        return Err(ApiError::invalid_input(vec![FieldError::with_param(
            "name",
            ErrorCode::InvalidInput,
            "Name should be at least 2 characters.",
        )]));
    }

    let role = Role::create(&state.db, name).await?;
    info!(role_id = %role.id, name = %role.name, "role created");
    Ok(Json(DataResponse::new(role)))
}

#[instrument(skip(state))]
pub async fn list_roles(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Json<PageResponse<Role>>, ApiError> {
    let params = params.clamped();
    let total = Role::count_all(&state.db).await?;
    let data = Role::list_page(&state.db, params.limit(), params.offset()).await?;
    Ok(Json(PageResponse::new(PageMeta::new(total, &params), data)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_length_counts_characters_not_bytes() {
        assert!(name_too_short("é"));
        assert!(!name_too_short("éé"));
        assert!(name_too_short("x"));
    }
}
