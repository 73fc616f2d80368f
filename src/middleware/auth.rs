//! JWT authentication extractors.
//!
//! Token issuance is owned by the identity service; this module only
//! verifies tokens and exposes the caller's claims. Three extractors are
//! provided:
//!
//! 1. [`AuthUser`] - requires a valid bearer token
//! 2. [`OptionalAuthUser`] - no token resolves to an anonymous caller;
//!    a present but invalid token is still rejected
//! 3. [`RequireAdmin`] / [`RequireStudent`] - role-gated variants

use axum::{extract::FromRequestParts, http::header, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::verify_token;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub email: String,
    pub role: String,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    Admin,
    Student,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Student => "student",
        }
    }
}

fn parse_role(role_str: &str) -> Result<UserRole, AppError> {
    match role_str {
        "admin" => Ok(UserRole::Admin),
        "student" => Ok(UserRole::Student),
        _ => Err(AppError::unauthorized(anyhow::anyhow!(
            "Invalid role in token: {}",
            role_str
        ))),
    }
}

/// Extractor that validates the bearer token and provides the caller's
/// claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.0.sub)
            .map_err(|_| AppError::unauthorized(anyhow::anyhow!("Invalid user ID in token")))
    }

    pub fn role(&self) -> Result<UserRole, AppError> {
        parse_role(&self.0.role)
    }

    pub fn is_admin(&self) -> bool {
        self.0.role == "admin"
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    AppError::unauthorized(anyhow::anyhow!(
                        "Missing or malformed authorization header"
                    ))
                })?;

        let claims = verify_token(bearer.token(), &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

/// Extractor for endpoints that serve both anonymous and authenticated
/// callers. A missing header is an anonymous caller; a header that fails
/// verification is rejected rather than silently demoted.
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl FromRequestParts<AppState> for OptionalAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if parts.headers.get(header::AUTHORIZATION).is_none() {
            return Ok(OptionalAuthUser(None));
        }

        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        Ok(OptionalAuthUser(Some(auth_user)))
    }
}

/// Extractor for admin-only endpoints.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;

        if auth_user.role()? != UserRole::Admin {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "Access denied. Administrator privileges required."
            )));
        }

        Ok(RequireAdmin(auth_user))
    }
}

/// Extractor for student-only endpoints.
#[derive(Debug, Clone)]
pub struct RequireStudent(pub AuthUser);

impl FromRequestParts<AppState> for RequireStudent {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;

        if auth_user.role()? != UserRole::Student {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "Access denied. Student account required."
            )));
        }

        Ok(RequireStudent(auth_user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_claims(role: &str) -> Claims {
        Claims {
            sub: Uuid::new_v4().to_string(),
            email: "test@example.com".to_string(),
            role: role.to_string(),
            exp: 9999999999,
            iat: 1234567890,
        }
    }

    #[test]
    fn test_parse_role() {
        assert_eq!(parse_role("admin").unwrap(), UserRole::Admin);
        assert_eq!(parse_role("student").unwrap(), UserRole::Student);
        assert!(parse_role("teacher").is_err());
        assert!(parse_role("").is_err());
    }

    #[test]
    fn test_is_admin() {
        assert!(AuthUser(create_test_claims("admin")).is_admin());
        assert!(!AuthUser(create_test_claims("student")).is_admin());
    }

    #[test]
    fn test_user_id() {
        let claims = create_test_claims("student");
        let expected = Uuid::parse_str(&claims.sub).unwrap();
        assert_eq!(AuthUser(claims).user_id().unwrap(), expected);
    }

    #[test]
    fn test_user_id_invalid() {
        let mut claims = create_test_claims("student");
        claims.sub = "not-a-uuid".to_string();
        assert!(AuthUser(claims).user_id().is_err());
    }
}
