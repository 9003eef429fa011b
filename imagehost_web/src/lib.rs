//! HTTP layer for imagehost. Handlers parse input at the boundary, delegate
//! to the core services and pick a view; template rendering happens
//! downstream.

pub mod handlers;
pub mod view;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use imagehost_core::service::images::ImagesService;
use imagehost_core::service::users::UsersService;
use imagehost_core::session::SessionStore;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub users: UsersService,
    pub images: ImagesService,
    pub sessions: SessionStore,
}

/// Create and configure the application router.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route(
            "/users/registration",
            get(handlers::users::registration_form).post(handlers::users::register_user),
        )
        .route(
            "/users/login",
            get(handlers::users::login_form).post(handlers::users::login_user),
        )
        .route("/users/logout", post(handlers::users::logout))
        .route("/images", get(handlers::images::image_feed))
        .route(
            "/images/upload",
            get(handlers::images::upload_form).post(handlers::images::upload_image),
        )
        .route("/images/{id}", get(handlers::images::image_details))
        .route("/images/{id}/delete", post(handlers::images::delete_image))
        .route(
            "/images/{id}/comments",
            post(handlers::images::create_comment),
        )
        .layer(TraceLayer::new_for_http())
        // Inline base64 payloads are bulky; cap the body well above them
        .layer(RequestBodyLimitLayer::new(8 * 1024 * 1024))
        .with_state(state)
}

/// Run the server (used by main).
pub async fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let core = imagehost_core::core().await;

    let state = AppState {
        users: core.users.clone(),
        images: core.images.clone(),
        sessions: core.sessions.clone(),
    };

    let app = create_app(state);

    tracing::info!("Starting server on {}", core.config.listen_addr);

    let listener = tokio::net::TcpListener::bind(core.config.listen_addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app).await.expect("Server error");
}
