//! Admin login, logout, and panel routes.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use jobsta_access::{AdminToken, admin::admin_token_ttl};
use std::sync::Arc;
use time::Duration as TimeDuration;

use super::middleware::{ADMIN_COOKIE, RequireAdminToken};
use crate::auth::AppState;
use crate::db::AdminTokenRepository;

/// Exchanges HTTP Basic credentials for an admin token cookie.
///
/// Anything short of an exact credential match gets a 401 with a Basic
/// challenge so browsers re-prompt.
pub async fn admin_login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Response {
    let Some((username, password)) = basic_credentials(&headers) else {
        return basic_challenge();
    };

    if username != state.auth_config.admin_username
        || password != state.auth_config.admin_password
    {
        tracing::warn!(username, "admin login rejected");
        return basic_challenge();
    }

    let token = AdminToken::issue();
    let repo = AdminTokenRepository::new(state.db_pool.clone());
    if let Err(e) = repo.create(&token).await {
        tracing::error!(error = %e, "failed to persist admin token");
        return (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response();
    }

    tracing::info!("admin token issued");
    let cookie = admin_cookie(
        token.token().to_string(),
        state.session_config.secure_cookies,
    );
    (jar.add(cookie), Redirect::to("/admin")).into_response()
}

/// Deletes the admin token row and clears its cookie.
pub async fn admin_logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    if let Some(cookie) = jar.get(ADMIN_COOKIE) {
        let repo = AdminTokenRepository::new(state.db_pool.clone());
        if let Err(e) = repo.delete(cookie.value()).await {
            tracing::warn!(error = %e, "failed to delete admin token on logout");
        }
    }

    let clear = clear_admin_cookie(state.session_config.secure_cookies);
    (jar.add(clear), Redirect::to("/admin/login")).into_response()
}

/// Authenticated probe for the operator surface.
pub async fn admin_panel(RequireAdminToken(_token): RequireAdminToken) -> Response {
    (StatusCode::OK, "Admin panel").into_response()
}

/// Parses `Authorization: Basic <base64(user:pass)>` into its parts.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

fn basic_challenge() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Basic realm=\"Admin\"")],
        "Admin credentials required",
    )
        .into_response()
}

fn admin_cookie(token: String, secure: bool) -> Cookie<'static> {
    let max_age = TimeDuration::seconds(admin_token_ttl().num_seconds());
    Cookie::build((ADMIN_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .build()
}

fn clear_admin_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((ADMIN_COOKIE, ""))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(TimeDuration::ZERO)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn parses_well_formed_basic_credentials() {
        let encoded = STANDARD.encode("root:msrit@123");
        let headers = headers_with_auth(&format!("Basic {encoded}"));

        let (username, password) = basic_credentials(&headers).unwrap();
        assert_eq!(username, "root");
        assert_eq!(password, "msrit@123");
    }

    #[test]
    fn password_may_contain_colons() {
        let encoded = STANDARD.encode("root:a:b:c");
        let headers = headers_with_auth(&format!("Basic {encoded}"));

        let (username, password) = basic_credentials(&headers).unwrap();
        assert_eq!(username, "root");
        assert_eq!(password, "a:b:c");
    }

    #[test]
    fn rejects_missing_header_and_wrong_scheme() {
        assert!(basic_credentials(&HeaderMap::new()).is_none());

        let headers = headers_with_auth("Bearer sometoken");
        assert!(basic_credentials(&headers).is_none());
    }

    #[test]
    fn rejects_invalid_base64() {
        let headers = headers_with_auth("Basic not-base64!!!");
        assert!(basic_credentials(&headers).is_none());
    }

    #[test]
    fn admin_cookie_is_http_only_with_half_hour_max_age() {
        let cookie = admin_cookie("tok".to_string(), true);
        assert_eq!(cookie.name(), ADMIN_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(TimeDuration::minutes(30)));
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let cookie = clear_admin_cookie(false);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(TimeDuration::ZERO));
    }
}
