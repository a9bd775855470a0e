use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo::User;

/// Request body for signup. Fields default to empty so missing ones fall
/// through the same validation path as bad ones.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for signin.
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// The user as exposed to clients and embedded in tokens. Never carries
/// the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            created_at: u.created_at,
        }
    }
}

/// Response returned after signup or signin.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub status: bool,
    pub content: AuthContent,
}

#[derive(Debug, Serialize)]
pub struct AuthContent {
    pub data: PublicUser,
    pub meta: TokenMeta,
}

#[derive(Debug, Serialize)]
pub struct TokenMeta {
    pub access_token: String,
}

impl AuthResponse {
    pub fn new(user: PublicUser, access_token: String) -> Self {
        Self {
            status: true,
            content: AuthContent {
                data: user,
                meta: TokenMeta { access_token },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_never_serializes_a_password_field() {
        let user = PublicUser {
            id: Uuid::now_v7(),
            name: "Ann".into(),
            email: "a@x.com".into(),
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
        assert!(json["id"].as_str().is_some_and(|s| !s.is_empty()));
    }

    #[test]
    fn auth_response_shape() {
        let user = PublicUser {
            id: Uuid::now_v7(),
            name: "Ann".into(),
            email: "a@x.com".into(),
            created_at: OffsetDateTime::now_utc(),
        };
        let resp = AuthResponse::new(user, "tok".into());
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["status"], true);
        assert_eq!(json["content"]["meta"]["access_token"], "tok");
        assert_eq!(json["content"]["data"]["email"], "a@x.com");
    }
}
