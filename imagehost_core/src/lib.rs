pub mod entity;
pub mod ids;
pub mod models;

use tokio::sync::OnceCell;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::service::images::ImagesService;
use crate::service::users::UsersService;
use crate::session::SessionStore;

pub mod service;

pub mod session;

pub mod config;

pub mod test_utils;

static IMAGEHOST_CORE: OnceCell<Arc<ImagehostCore>> = OnceCell::const_new();

pub async fn core() -> Arc<ImagehostCore> {
    IMAGEHOST_CORE
        .get_or_init(|| async move {
            Arc::new(ImagehostCore::start().await.expect("failed to init"))
        })
        .await
        .clone()
}

/// Main runtime handle for the application.
pub struct ImagehostCore {
    pub config: config::AppConfig,

    pub db: DatabaseConnection,

    /// Registration and credential checks.
    pub users: UsersService,

    /// Feed, upload, delete and comment operations.
    pub images: ImagesService,

    /// Per-browser-session state, keyed by the id carried in the cookie.
    pub sessions: SessionStore,
}

impl ImagehostCore {
    pub async fn start() -> Result<Self, Box<dyn std::error::Error>> {
        let config = config::get_or_init().await?;
        tracing::debug!(?config, "loaded config");

        // DB + migrations
        let db = models::open_or_create_db(&config).await;
        models::migrate_up(db.clone()).await;

        let users = UsersService::new(db.clone());
        let images = ImagesService::new(db.clone());
        let sessions = SessionStore::new();

        Ok(Self {
            config,
            db,
            users,
            images,
            sessions,
        })
    }
}

pub mod prelude {
    pub use super::entity;
    pub use super::ids;
    pub use super::models;

    pub use super::service;

    pub use super::session;

    pub use super::config;
}
