use std::sync::Arc;

use crate::auth::repo::{PgUserRepo, UserRepo};
use crate::config::AppConfig;
use crate::db;
use crate::spots::repo::{PgSpotRepo, SpotRepo};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepo>,
    pub spots: Arc<dyn SpotRepo>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let pool = db::connect(&config).await?;

        if let Err(e) = db::migrate(&pool).await {
            tracing::warn!(error = %format!("{e:#}"), "migration failed; continuing");
        }

        Ok(Self::from_parts(
            config,
            Arc::new(PgUserRepo::new(pool.clone())),
            Arc::new(PgSpotRepo::new(pool)),
        ))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserRepo>,
        spots: Arc<dyn SpotRepo>,
    ) -> Self {
        Self {
            config,
            users,
            spots,
        }
    }
}
