//! Registration, verification, login, logout, and password routes.

use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use jobsta_access::{AccessError, LoginToken, Role, User, secret};
use serde::Deserialize;
use std::sync::Arc;

use super::AppState;
use super::middleware::RequireUser;
use super::session::{self, DEVICE_COOKIE};
use crate::db::{self, DeviceTokenRepository, LoginTokenRepository, UserRepository};

/// Length of generated temporary passwords.
const TEMP_PASSWORD_LEN: usize = 12;

/// Registration form fields.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub name: String,
}

/// Login form fields. An empty password selects the magic-link path.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
}

/// First-time password form fields.
#[derive(Debug, Deserialize)]
pub struct SetPasswordForm {
    pub password: String,
    pub confirm_password: String,
}

/// Password rotation form fields.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Creates an unverified user and emails the verification link.
///
/// The user and token rows commit as a unit before the email is attempted;
/// a delivery failure surfaces as a warning, never as a rollback.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, FlowError> {
    let email = form.email.trim().to_lowercase();
    tracing::info!(email, "registration attempt");

    if !email.ends_with(&state.auth_config.allowed_email_domain) {
        tracing::warn!(email, "registration blocked: non-institutional email");
        return Err(AccessError::Validation {
            message: format!(
                "Only {} emails are allowed",
                state.auth_config.allowed_email_domain
            ),
        }
        .into());
    }

    let users = UserRepository::new(state.db_pool.clone());
    if users.find_by_email(&email).await?.is_some() {
        tracing::info!(email, "registration conflict: user exists");
        return Err(AccessError::Conflict.into());
    }

    let role = if email == state.auth_config.bootstrap_admin_email {
        Role::Admin
    } else {
        Role::User
    };
    let user = User::new(email.clone(), form.name.trim().to_string(), role);
    let token = LoginToken::issue(email.clone());

    users.create_with_login_token(&user, &token).await?;
    tracing::info!(user_id = %user.id(), email, "user and verification token created");

    let link = verification_link(&state.base_url, token.token());
    let message = jobsta_mail::messages::verification(&link);
    let report = state
        .mailer
        .send(&email, &message.subject, &message.body, message.html.as_deref())
        .await;

    let body = if report.delivered {
        "Registration successful! Check your email to verify your account.".to_string()
    } else {
        let detail = report.detail.unwrap_or_else(|| "unknown".to_string());
        tracing::error!(email, detail, "verification email failed");
        AccessError::Delivery { detail }.user_message()
    };

    Ok((StatusCode::CREATED, body).into_response())
}

/// Password login when a hash is set, magic-link login otherwise.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, FlowError> {
    let email = form.email.trim().to_lowercase();
    tracing::info!(email, "login attempt");

    let users = UserRepository::new(state.db_pool.clone());
    let user = users.find_by_email(&email).await?;

    // One generic failure for missing and unverified accounts alike.
    let Some(user) = user.filter(User::is_verified) else {
        tracing::warn!(email, "login rejected: unknown or unverified");
        return Err(AccessError::AuthenticationFailed.into());
    };

    let password = form.password.as_deref().filter(|p| !p.is_empty());

    if let (Some(hash), Some(password)) = (user.password_hash(), password) {
        if !state.hasher.verify(hash, password) {
            tracing::warn!(email, "login rejected: bad password");
            return Err(AccessError::AuthenticationFailed.into());
        }

        let secret = session::issue_session(&state.db_pool, &state.hasher, user.id()).await?;
        let cookie = session::device_cookie(secret, state.session_config.secure_cookies);
        tracing::info!(user_id = %user.id(), "device session issued");
        return Ok((jar.add(cookie), Redirect::to("/dashboard")).into_response());
    }

    // Magic-link path: no password set, or none supplied. No session yet.
    let token = LoginToken::issue(email.clone());
    LoginTokenRepository::new(state.db_pool.clone())
        .create(&token)
        .await?;

    let link = verification_link(&state.base_url, token.token());
    let message = jobsta_mail::messages::magic_link(&link);
    let report = state
        .mailer
        .send(&email, &message.subject, &message.body, message.html.as_deref())
        .await;

    if !report.delivered {
        let detail = report.detail.unwrap_or_else(|| "unknown".to_string());
        tracing::error!(email, detail, "magic link email failed");
    } else {
        tracing::info!(email, "magic link issued");
    }

    Ok((StatusCode::OK, "Check your email for a login link.").into_response())
}

/// Redeems a verification / magic-link token.
pub async fn verify(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    jar: CookieJar,
) -> Result<Response, FlowError> {
    let tokens = LoginTokenRepository::new(state.db_pool.clone());
    let found = tokens.find_unused(&token).await?;

    // A miss and an expired token surface identically.
    let Some(login_token) = found.filter(LoginToken::is_redeemable) else {
        tracing::warn!("verification rejected: token missing, used, or expired");
        return Err(AccessError::NotFoundOrExpired.into());
    };

    let users = UserRepository::new(state.db_pool.clone());
    let Some(mut user) = users.find_by_email(login_token.email()).await? else {
        // A redeemable token without its user is a data-integrity fault.
        tracing::error!(email = login_token.email(), "token has no matching user");
        return Err(AccessError::NotFoundOrExpired.into());
    };

    if !user.is_verified() {
        user.mark_verified();
        let temp_password = secret::temp_password(TEMP_PASSWORD_LEN);
        let hash = user_password_hash(&state, &temp_password)?;
        user.set_password_hash(hash);
        users.update(&user).await?;
        tracing::info!(user_id = %user.id(), "user verified, temporary password set");

        // One-time disclosure of the plaintext; never persisted or logged.
        let message = jobsta_mail::messages::temp_password(&temp_password);
        let report = state
            .mailer
            .send(
                user.email(),
                &message.subject,
                &message.body,
                message.html.as_deref(),
            )
            .await;
        if !report.delivered {
            let detail = report.detail.unwrap_or_else(|| "unknown".to_string());
            tracing::error!(user_id = %user.id(), detail, "temporary password email failed");
        }
    }

    // Used is terminal regardless of prior verification state.
    tokens.mark_used(login_token.token()).await?;

    let secret = session::issue_session(&state.db_pool, &state.hasher, user.id()).await?;
    let cookie = session::device_cookie(secret, state.session_config.secure_cookies);
    tracing::info!(user_id = %user.id(), "device session issued via token redemption");

    Ok((jar.add(cookie), Redirect::to("/")).into_response())
}

/// Clears the device session.
///
/// The matching row is deleted only when it can be located among the active
/// sessions; the cookie is cleared either way.
pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    if let Some(cookie) = jar.get(DEVICE_COOKIE) {
        match session::find_matching_device(&state.db_pool, &state.hasher, cookie.value()).await {
            Ok(Some(device)) => {
                let repo = DeviceTokenRepository::new(state.db_pool.clone());
                if let Err(e) = repo.delete(device.id()).await {
                    tracing::warn!(error = %e, "failed to delete device token on logout");
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "failed to locate device token on logout");
            }
        }
    }

    let clear = session::clear_device_cookie(state.session_config.secure_cookies);
    (jar.add(clear), Redirect::to("/login")).into_response()
}

/// First-time password set for users holding only a temporary session.
pub async fn set_password(
    RequireUser(user): RequireUser,
    State(state): State<Arc<AppState>>,
    Form(form): Form<SetPasswordForm>,
) -> Result<Response, FlowError> {
    if user.has_password() {
        return Err(AccessError::Validation {
            message: "Password already set. Use change password.".to_string(),
        }
        .into());
    }
    if form.password != form.confirm_password {
        return Err(AccessError::Validation {
            message: "Passwords do not match".to_string(),
        }
        .into());
    }

    let mut user = user;
    let hash = user_password_hash(&state, &form.password)?;
    user.set_password_hash(hash);
    UserRepository::new(state.db_pool.clone()).update(&user).await?;
    tracing::info!(user_id = %user.id(), "password set");

    Ok((StatusCode::OK, "Password set successfully").into_response())
}

/// Rotates the password and invalidates every outstanding device session.
pub async fn change_password(
    RequireUser(user): RequireUser,
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<ChangePasswordForm>,
) -> Result<Response, FlowError> {
    let Some(hash) = user.password_hash() else {
        return Err(AccessError::Validation {
            message: "No password set. Set password first.".to_string(),
        }
        .into());
    };
    if !state.hasher.verify(hash, &form.current_password) {
        return Err(AccessError::AuthenticationFailed.into());
    }
    if form.new_password != form.confirm_password {
        return Err(AccessError::Validation {
            message: "New passwords do not match".to_string(),
        }
        .into());
    }

    let mut user = user;
    let new_hash = user_password_hash(&state, &form.new_password)?;
    user.set_password_hash(new_hash);
    UserRepository::new(state.db_pool.clone()).update(&user).await?;

    // Every outstanding session cookie must resolve to anonymous from here.
    let dropped = DeviceTokenRepository::new(state.db_pool.clone())
        .delete_all_for_user(user.id())
        .await?;
    tracing::info!(user_id = %user.id(), dropped, "password changed, sessions invalidated");

    let clear = session::clear_device_cookie(state.session_config.secure_cookies);
    Ok((jar.add(clear), Redirect::to("/login")).into_response())
}

/// Authenticated probe for the user surface.
pub async fn dashboard(RequireUser(user): RequireUser) -> Response {
    (
        StatusCode::OK,
        format!("Logged in as {}", user.email()),
    )
        .into_response()
}

fn verification_link(base_url: &str, token: &str) -> String {
    format!("{}/verify/{}", base_url.trim_end_matches('/'), token)
}

fn user_password_hash(state: &AppState, password: &str) -> Result<String, FlowError> {
    state.hasher.hash(password).map_err(|e| {
        FlowError(AccessError::Internal {
            details: e.to_string(),
        })
    })
}

/// HTTP mapping of the flow error taxonomy.
#[derive(Debug)]
pub struct FlowError(pub AccessError);

impl From<AccessError> for FlowError {
    fn from(err: AccessError) -> Self {
        Self(err)
    }
}

impl From<sqlx::Error> for FlowError {
    fn from(err: sqlx::Error) -> Self {
        if db::is_unique_violation(&err) {
            Self(AccessError::Conflict)
        } else {
            Self(AccessError::Internal {
                details: err.to_string(),
            })
        }
    }
}

impl From<session::SessionIssueError> for FlowError {
    fn from(err: session::SessionIssueError) -> Self {
        Self(AccessError::Internal {
            details: err.to_string(),
        })
    }
}

impl IntoResponse for FlowError {
    fn into_response(self) -> Response {
        let err = self.0;
        match &err {
            AccessError::Validation { .. } => {
                (StatusCode::BAD_REQUEST, err.user_message()).into_response()
            }
            AccessError::NotFoundOrExpired => Redirect::to("/login").into_response(),
            AccessError::Conflict => (StatusCode::CONFLICT, err.user_message()).into_response(),
            AccessError::AuthenticationFailed => {
                (StatusCode::UNAUTHORIZED, err.user_message()).into_response()
            }
            AccessError::Delivery { .. } => {
                // Delivery failures are soft warnings, not flow errors.
                (StatusCode::OK, err.user_message()).into_response()
            }
            AccessError::Internal { details } => {
                tracing::error!(details, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, err.user_message()).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_link_joins_cleanly() {
        assert_eq!(
            verification_link("http://localhost:3000", "tok123"),
            "http://localhost:3000/verify/tok123"
        );
        assert_eq!(
            verification_link("https://jobsta.example/", "tok123"),
            "https://jobsta.example/verify/tok123"
        );
    }
}
