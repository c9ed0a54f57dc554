//! In-memory mock of the portal's REST backend.
//!
//! Implements the response envelope, pagination, JWT auth with refresh,
//! and the article/comment/like contract closely enough to run the
//! client and application crates end to end in integration tests.
//! Runnable standalone via the `portal-mock-server` binary.

use std::net::SocketAddr;
use std::sync::atomic::Ordering;

use anyhow::{Context, Result};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router, extract::State, middleware as axum_middleware};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;

use portal_api::{ApiResponse, TokenPair};

mod error;
mod handlers;
mod jwt;
mod middleware;
mod state;

pub mod logging;
pub mod settings;

pub use settings::Settings;

use jwt::JwtService;
use state::AppState;

fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route(
            "/articles",
            get(handlers::articles::list_articles).post(handlers::articles::create_article),
        )
        .route(
            "/articles/{id}",
            get(handlers::articles::get_article)
                .patch(handlers::articles::update_article)
                .delete(handlers::articles::delete_article),
        )
        .route(
            "/categories",
            get(handlers::categories::list_categories).post(handlers::categories::create_category),
        )
        .route(
            "/categories/{id}",
            axum::routing::patch(handlers::categories::update_category)
                .delete(handlers::categories::delete_category),
        )
        .route(
            "/tags",
            get(handlers::tags::list_tags).post(handlers::tags::create_tag),
        )
        .route(
            "/tags/{id}",
            axum::routing::patch(handlers::tags::update_tag).delete(handlers::tags::delete_tag),
        )
        .route(
            "/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/users/{id}",
            get(handlers::users::get_user)
                .patch(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        .route(
            "/comments",
            get(handlers::comments::list_comments).post(handlers::comments::create_comment),
        )
        .route("/comments/{id}", delete(handlers::comments::delete_comment))
        .route("/comments/{id}/replies", get(handlers::comments::list_replies))
        .route(
            "/comments/{id}/like",
            get(handlers::comments::like_status)
                .post(handlers::comments::like_comment)
                .delete(handlers::comments::unlike_comment),
        )
        .route("/upload", post(handlers::upload::upload))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    let session_only = Router::new()
        .route("/auth/signout", delete(handlers::auth::sign_out))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    let auth = Router::new()
        .route("/signin", post(handlers::auth::sign_in))
        .route("/signup", post(handlers::auth::sign_up))
        .route("/verify", post(handlers::auth::verify_email))
        .route("/refresh-token", post(handlers::auth::refresh_token))
        .route("/forgot-password", post(handlers::auth::forgot_password))
        .route("/reset-password", post(handlers::auth::reset_password))
        .route(
            "/resend-verification",
            post(handlers::auth::resend_verification),
        );

    Router::new()
        .nest("/auth", auth)
        .nest("/protected", protected)
        .merge(session_only)
        .route("/testing/force-401", post(force_unauthorized_once))
        .with_state(state)
}

/// Test hook: the next protected request answers 401 exactly once.
async fn force_unauthorized_once(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    state.force_unauthorized.store(true, Ordering::SeqCst);
    handlers::ack(StatusCode::OK, "next protected request will be 401")
}

/// A running in-process mock backend.
pub struct MockServer {
    addr: SocketAddr,
    state: AppState,
    handle: JoinHandle<()>,
}

impl MockServer {
    /// Binds the configured address (use `127.0.0.1:0` for tests) and
    /// serves the mock API on a background task.
    pub async fn spawn(settings: Settings) -> Result<Self> {
        let jwt = JwtService::new(
            &settings.jwt_secret,
            settings.access_ttl_seconds,
            settings.refresh_ttl_seconds,
        );
        let state = AppState::new(jwt);
        let app = middleware::apply_layers(router(state.clone()), &settings);

        let listener = TcpListener::bind(&settings.addr)
            .await
            .with_context(|| format!("failed to bind {}", settings.addr))?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app).await {
                tracing::error!("mock server stopped: {err}");
            }
        });

        info!("mock portal backend listening on {addr}");
        Ok(Self {
            addr,
            state,
            handle,
        })
    }

    /// Base URL clients should talk to.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Mints a token pair for a seeded demo user with explicit TTLs.
    /// Negative access TTL yields an already-expired access token, which
    /// is how tests exercise the client's refresh path.
    pub fn token_pair_for(
        &self,
        email: &str,
        access_ttl_seconds: i64,
        refresh_ttl_seconds: i64,
    ) -> Result<TokenPair> {
        let user = {
            let db = self.state.db.lock().expect("db lock poisoned");
            db.user_by_email(email)
                .map(|entry| entry.user.clone())
                .with_context(|| format!("no demo user {email}"))?
        };

        Ok(TokenPair {
            access_token: self.state.jwt.generate_with_ttl(&user, access_ttl_seconds)?,
            refresh_token: self.state.jwt.generate_with_ttl(&user, refresh_ttl_seconds)?,
        })
    }

    /// Arms the one-shot 401 hook without going through HTTP.
    pub fn force_unauthorized_once(&self) {
        self.state.force_unauthorized.store(true, Ordering::SeqCst);
    }

    /// Stops the background task.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
