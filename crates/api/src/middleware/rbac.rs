//! Role-based access control extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! meet the requirement, enforcing authorization at the type level.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use flash_core::error::CoreError;
use serde::Deserialize;

use super::auth::{bearer_token, AuthUser};
use crate::auth::ROLE_ADMIN;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        ensure_admin(&user)?;
        Ok(RequireAdmin(user))
    }
}

#[derive(Deserialize)]
struct TokenParam {
    token: Option<String>,
}

/// Like [`RequireAdmin`], but falls back to a `token` query parameter when
/// there is no `Authorization` header.
///
/// Place it before `WebSocketUpgrade` in the handler arguments so an
/// unauthenticated request is refused before the upgrade is considered.
pub struct RequireAdminWs(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdminWs {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = match bearer_token(&parts.headers)? {
            Some(token) => AuthUser::from_token(token, state)?,
            None => {
                let Query(param) = Query::<TokenParam>::try_from_uri(&parts.uri)
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                let token = param.token.ok_or_else(|| {
                    AppError::Core(CoreError::Unauthorized("Missing access token".into()))
                })?;
                AuthUser::from_token(&token, state)?
            }
        };
        ensure_admin(&user)?;
        Ok(RequireAdminWs(user))
    }
}

fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    if user.role != ROLE_ADMIN {
        return Err(AppError::Core(CoreError::Forbidden(
            "Admin role required".into(),
        )));
    }
    Ok(())
}
