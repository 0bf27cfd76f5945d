use crate::config::AppConfig;
use crate::store::{BlogStore, MemoryStore, PgStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BlogStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store = match &config.database_url {
            Some(url) => {
                let db = sqlx::postgres::PgPoolOptions::new()
                    .max_connections(10)
                    .connect(url)
                    .await?;
                let store = PgStore::new(db);
                store.ensure_schema().await?;
                tracing::info!("using postgres store");
                Arc::new(store) as Arc<dyn BlogStore>
            }
            None => {
                tracing::warn!("DATABASE_URL not set; data is kept in memory only");
                Arc::new(MemoryStore::new()) as Arc<dyn BlogStore>
            }
        };

        Ok(Self { store, config })
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            database_url: None,
            jwt: crate::config::JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
            },
        });

        Self {
            store: Arc::new(MemoryStore::new()),
            config,
        }
    }
}
