use crate::auth::tokens::TokenSigner;
use crate::config::AppConfig;
use crate::db;
use crate::radar::CategoryMap;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub categories: Arc<CategoryMap>,
    pub tokens: Arc<TokenSigner>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = db::connect(&config.database_url).await?;
        Ok(Self::from_parts(db, config))
    }

    pub fn from_parts(db: SqlitePool, config: Arc<AppConfig>) -> Self {
        Self {
            tokens: Arc::new(TokenSigner::new(&config.jwt)),
            db,
            config,
            categories: Arc::new(CategoryMap::standard()),
        }
    }

    /// State backed by a migrated in-memory database.
    #[cfg(test)]
    pub async fn fake() -> Self {
        use crate::config::{JwtConfig, RadarConfig};
        use crate::radar::{ChartStyle, Direction, TierScheme};

        let db = db::connect_in_memory().await.expect("in-memory db");
        db::migrate(&db).await.expect("migrations");

        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            jwt: JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
                refresh_ttl_minutes: 60,
            },
            radar: RadarConfig {
                direction: Direction::Clockwise,
                scheme: TierScheme::Four,
                style: ChartStyle::Lollipop,
                compass: false,
            },
        });
        Self::from_parts(db, config)
    }
}
