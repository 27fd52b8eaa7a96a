use config::Config;
use external::KakaoClient;
use redis::Client as RedisClient;
use sqlx::PgPool;
use std::sync::Arc;

pub mod app;
pub mod common;
pub mod config;
pub mod error;
pub mod extract;
pub mod external;
pub mod middleware;
pub mod routes;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub redis: Arc<RedisClient>,
    pub kakao: KakaoClient,
}

#[cfg(test)]
impl AppState {
    /// State whose pool and Redis client never connect unless used.
    pub(crate) fn for_tests(config: Config) -> Self {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .expect("lazy pool");
        let redis = RedisClient::open(config.redis_url.clone()).expect("redis url");
        let kakao = KakaoClient::new(&config).expect("http client");

        Self {
            pool,
            config,
            redis: Arc::new(redis),
            kakao,
        }
    }
}
