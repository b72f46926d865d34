//! Authentication extractors for Axum routes.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use jobsta_access::User;
use std::sync::Arc;

use super::{
    AppState,
    session::{self, DEVICE_COOKIE},
};

/// Extractor for requiring a verified, logged-in user.
///
/// Requests without a resolvable device session are redirected to the login
/// page.
pub struct RequireUser(pub User);

impl<S> FromRequestParts<S> for RequireUser
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = Arc::<AppState>::from_ref(state);
        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| AuthRejection::InternalError)?;

        let cookie = jar.get(DEVICE_COOKIE).ok_or(AuthRejection::NotAuthenticated)?;

        let user = session::resolve_session(&app_state.db_pool, &app_state.hasher, cookie.value())
            .await
            .map_err(|_| AuthRejection::InternalError)?
            .ok_or(AuthRejection::NotAuthenticated)?;

        Ok(RequireUser(user))
    }
}

/// Extractor for optionally resolving the logged-in user.
///
/// Resolves to `None` on any failure, including an expired or unknown cookie.
pub struct OptionalUser(pub Option<User>);

impl<S> FromRequestParts<S> for OptionalUser
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match RequireUser::from_request_parts(parts, state).await {
            Ok(RequireUser(user)) => Ok(OptionalUser(Some(user))),
            Err(_) => Ok(OptionalUser(None)),
        }
    }
}

/// Extractor for requiring a logged-in user with the admin role.
///
/// Distinct from the admin token guard: this checks the role on a regular
/// device session, not the operator capability cookie.
pub struct RequireAdminRole(pub User);

impl<S> FromRequestParts<S> for RequireAdminRole
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireUser(user) = RequireUser::from_request_parts(parts, state).await?;

        if !user.role().is_admin() {
            return Err(AuthRejection::AdminRequired);
        }

        Ok(RequireAdminRole(user))
    }
}

/// Rejection type for authentication extractors.
#[derive(Debug)]
pub enum AuthRejection {
    NotAuthenticated,
    AdminRequired,
    InternalError,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::NotAuthenticated => Redirect::to("/login").into_response(),
            Self::AdminRequired => (StatusCode::FORBIDDEN, "Admin access required").into_response(),
            Self::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
