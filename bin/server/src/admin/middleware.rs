//! Admin token extractor.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use jobsta_access::AdminToken;
use std::sync::Arc;

use crate::auth::AppState;
use crate::db::AdminTokenRepository;

/// Admin session cookie name.
pub const ADMIN_COOKIE: &str = "admin_token";

/// Extractor for requiring a live admin token.
///
/// Requests without one are redirected to the Basic-auth exchange. Expired
/// rows are deleted on sight rather than left for the sweeper.
pub struct RequireAdminToken(pub AdminToken);

impl<S> FromRequestParts<S> for RequireAdminToken
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AdminRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = Arc::<AppState>::from_ref(state);
        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| AdminRejection::InternalError)?;

        let cookie = jar.get(ADMIN_COOKIE).ok_or(AdminRejection::NotAuthenticated)?;

        let repo = AdminTokenRepository::new(app_state.db_pool.clone());
        let token = repo
            .find(cookie.value())
            .await
            .map_err(|_| AdminRejection::InternalError)?
            .ok_or(AdminRejection::NotAuthenticated)?;

        if !token.is_valid() {
            let _ = repo.delete(token.token()).await;
            return Err(AdminRejection::NotAuthenticated);
        }

        Ok(RequireAdminToken(token))
    }
}

/// Rejection type for the admin token extractor.
#[derive(Debug)]
pub enum AdminRejection {
    NotAuthenticated,
    InternalError,
}

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        match self {
            Self::NotAuthenticated => Redirect::to("/admin/login").into_response(),
            Self::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
