//! Application setup and router wiring.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::BaseMailer;
use crate::server::auth::SessionStore;
use crate::server::middleware::session_auth_middleware;
use crate::server::routes::{
    admin, articles, auth, forum, health_handler, initiatives, role_requests, tasks, tips, votes,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub sessions: Arc<SessionStore>,
    pub mailer: Arc<dyn BaseMailer>,
}

/// Build the Axum application router.
///
/// Rate limiting is layered on in `main`, not here, so in-process callers
/// (tests) talk to the unthrottled router.
pub fn build_app(
    pool: PgPool,
    mailer: Arc<dyn BaseMailer>,
    allowed_origins: Vec<String>,
) -> Router {
    let sessions = Arc::new(SessionStore::new());

    // Sweep expired sessions hourly
    let sweeper = sessions.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(3600));
        loop {
            interval.tick().await;
            sweeper.cleanup_expired().await;
        }
    });

    let app_state = AppState {
        db_pool: pool,
        sessions,
        mailer,
    };

    // CORS: explicit origins in production, any origin for development
    let cors = if allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([AUTHORIZATION, CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([AUTHORIZATION, CONTENT_TYPE])
    };

    Router::new()
        // Auth
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/auth/confirm/:token", get(auth::confirm_email))
        // Initiatives
        .route(
            "/initiatives",
            get(initiatives::list_initiatives).post(initiatives::create_initiative),
        )
        .route("/initiatives/mine", get(initiatives::list_own_initiatives))
        .route("/initiatives/:id", get(initiatives::get_initiative))
        .route(
            "/initiatives/:id/publication",
            put(initiatives::set_initiative_publication),
        )
        // Articles
        .route(
            "/articles",
            get(articles::list_articles).post(articles::create_article),
        )
        .route("/articles/:id", get(articles::get_article))
        .route(
            "/articles/:id/publication",
            put(articles::set_article_publication),
        )
        // Tips
        .route("/tips", get(tips::list_tips).post(tips::create_tip))
        .route("/tips/:id", get(tips::get_tip))
        .route("/tips/:id/publication", put(tips::set_tip_publication))
        // Forum
        .route(
            "/forum/posts",
            get(forum::list_posts).post(forum::create_post),
        )
        .route("/forum/posts/:id", get(forum::get_post))
        .route("/forum/posts/:id/comments", post(forum::create_comment))
        .route(
            "/forum/posts/:id/publication",
            put(forum::set_post_publication),
        )
        // Votes
        .route("/votes", post(votes::cast_vote))
        // Role requests
        .route(
            "/role-requests",
            post(role_requests::create_role_request),
        )
        .route(
            "/role-requests/mine",
            get(role_requests::list_own_role_requests),
        )
        // Tasks
        .route("/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route(
            "/tasks/:id",
            put(tasks::update_task).delete(tasks::delete_task),
        )
        // Admin
        .route("/admin/moderation", get(admin::queue_overview))
        .route("/admin/moderation/:kind", get(admin::list_queue))
        .route(
            "/admin/moderation/:kind/:id/approve",
            post(admin::approve_content),
        )
        .route(
            "/admin/moderation/:kind/:id/reject",
            post(admin::reject_content),
        )
        .route("/admin/role-requests", get(admin::list_role_requests))
        .route(
            "/admin/role-requests/:id/process",
            post(admin::process_role_request),
        )
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/:id/role", put(admin::set_user_role))
        // Health check
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(session_auth_middleware))
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
