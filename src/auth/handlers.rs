use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, PublicUser, SigninRequest, SignupRequest},
        extractors::AuthUser,
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo::User,
    },
    error::{ApiError, ErrorCode, FieldError},
    extract::ApiJson,
    response::DataResponse,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/signin", post(signin))
        .route("/auth/me", get(me))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn validate_signup(req: &SignupRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    // counts characters, not bytes, so multibyte names measure correctly
    if req.name.trim().chars().count() < 2 {
        errors.push(FieldError::with_param(
            "name",
            ErrorCode::InvalidInput,
            "Name should be at least 2 characters.",
        ));
    }
    if !is_valid_email(&req.email) {
        errors.push(FieldError::with_param(
            "email",
            ErrorCode::InvalidInput,
            "Please provide a valid email address.",
        ));
    }
    if req.password.len() < 6 {
        errors.push(FieldError::with_param(
            "password",
            ErrorCode::InvalidInput,
            "Password should be at least 6 characters.",
        ));
    }
    errors
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(mut payload): ApiJson<SignupRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    let errors = validate_signup(&payload);
    if !errors.is_empty() {
        warn!(count = errors.len(), "signup validation failed");
        return Err(ApiError::invalid_input(errors));
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::resource_exists(
            Some("email"),
            "User with this email address already exists.",
        ));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, payload.name.trim(), &payload.email, &hash).await?;

    let snapshot = PublicUser::from(user);
    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign(snapshot.clone())?;

    info!(user_id = %snapshot.id, email = %snapshot.email, "user signed up");
    Ok(Json(AuthResponse::new(snapshot, access_token)))
}

#[instrument(skip(state, payload))]
pub async fn signin(
    State(state): State<AppState>,
    ApiJson(mut payload): ApiJson<SigninRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        return Err(ApiError::invalid_input(vec![FieldError::with_param(
            "email",
            ErrorCode::InvalidInput,
            "Please provide a valid email address.",
        )]));
    }

    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "signin unknown email");
            ApiError::not_found(Some("email"), "No account with this email address.")
        })?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "signin invalid password");
        return Err(ApiError::invalid_credentials());
    }

    let snapshot = PublicUser::from(user);
    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign(snapshot.clone())?;

    info!(user_id = %snapshot.id, "user signed in");
    Ok(Json(AuthResponse::new(snapshot, access_token)))
}

/// The token carries a snapshot from issuance time; this handler re-fetches
/// by id so callers always see current data.
#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    AuthUser(snapshot): AuthUser,
) -> Result<Json<DataResponse<PublicUser>>, ApiError> {
    let user = User::find_by_id(&state.db, snapshot.id)
        .await?
        .ok_or_else(|| {
            warn!(user_id = %snapshot.id, "token subject no longer exists");
            ApiError::not_signedin()
        })?;
    Ok(Json(DataResponse::new(PublicUser::from(user))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(name: &str, email: &str, password: &str) -> SignupRequest {
        SignupRequest {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn valid_signup_has_no_errors() {
        assert!(validate_signup(&req("Ann", "a@x.com", "secret1")).is_empty());
    }

    #[test]
    fn all_bad_fields_are_batched() {
        let errors = validate_signup(&req("A", "nope", "123"));
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().all(|e| e.code == ErrorCode::InvalidInput));
        let params: Vec<_> = errors.iter().filter_map(|e| e.param.as_deref()).collect();
        assert_eq!(params, vec!["name", "email", "password"]);
    }

    #[test]
    fn missing_fields_fail_the_same_checks() {
        // serde defaults absent fields to "", which fails every rule
        let errors = validate_signup(&req("", "", ""));
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn name_length_counts_characters_not_bytes() {
        // "é" is two bytes but one character; still too short
        let errors = validate_signup(&req("é", "a@x.com", "secret1"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].param.as_deref(), Some("name"));

        assert!(validate_signup(&req("éé", "a@x.com", "secret1")).is_empty());
    }

    #[test]
    fn email_regex_accepts_common_shapes() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@sub.domain.org"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("spaces in@x.com"));
    }
}
