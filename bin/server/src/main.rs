use axum::{
    Router, middleware,
    routing::{get, post},
};
use jobsta_access::PasswordHasher;
use jobsta_server::{
    admin, auth,
    auth::AppState,
    config::ServerConfig,
    db::{AdminTokenRepository, DeviceTokenRepository, LoginTokenRepository},
    request_id,
};
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = ServerConfig::from_env().expect("failed to load configuration");
    tracing::info!("Loaded configuration");

    // Create database connection pool
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("failed to run migrations");

    // Cleanup expired tokens on startup
    sweep_expired(&db_pool).await;

    // Spawn periodic token cleanup task
    let cleanup_pool = db_pool.clone();
    let cleanup_interval_secs = config.session.cleanup_interval_seconds;
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(cleanup_interval_secs));
        loop {
            interval.tick().await;
            sweep_expired(&cleanup_pool).await;
        }
    });

    let mailer = config.mail.build();

    // Create application state
    let app_state = Arc::new(AppState::new(
        db_pool,
        PasswordHasher::new(),
        mailer,
        config.session,
        config.auth,
        config.base_url,
    ));

    let app = Router::new()
        // Registration and login
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/verify/{token}", get(auth::verify))
        .route("/logout", get(auth::logout))
        // Password management
        .route("/set_password", post(auth::set_password))
        .route("/change_password", post(auth::change_password))
        .route("/dashboard", get(auth::routes::dashboard))
        // Operator surface
        .route("/admin", get(admin::admin_panel))
        .route("/admin/login", get(admin::admin_login))
        .route("/admin/logout", get(admin::admin_logout))
        .layer(middleware::from_fn(request_id::propagate_request_id))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .expect("failed to bind to address");

    tracing::info!("listening on http://{}", config.listen_addr);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("server error");
}

/// Deletes expired login, device, and admin tokens.
async fn sweep_expired(pool: &PgPool) {
    match LoginTokenRepository::new(pool.clone()).delete_expired().await {
        Ok(count) if count > 0 => {
            tracing::debug!(deleted_login_tokens = count, "Expired login token cleanup");
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(error = %e, "Failed to cleanup expired login tokens");
        }
    }

    match DeviceTokenRepository::new(pool.clone()).delete_expired().await {
        Ok(count) if count > 0 => {
            tracing::debug!(deleted_device_tokens = count, "Expired device token cleanup");
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(error = %e, "Failed to cleanup expired device tokens");
        }
    }

    match AdminTokenRepository::new(pool.clone()).delete_expired().await {
        Ok(count) if count > 0 => {
            tracing::debug!(deleted_admin_tokens = count, "Expired admin token cleanup");
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(error = %e, "Failed to cleanup expired admin tokens");
        }
    }
}
