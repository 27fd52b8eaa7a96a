use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::utils::{Coordinates, distance_km, sort_by_distance};

pub const DEFAULT_STORE_LIMIT: usize = 50;
pub const MAX_STORE_LIMIT: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Store {
    pub id: String,
    pub name: String,
    pub category: String,
    pub area: Option<String>,
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub phone: Option<String>,
    pub image_url: Option<String>,
    pub distance_hint: Option<String>,
    pub is_active: bool,
    pub mood: Vec<String>,
    pub tags: Vec<String>,
    pub price_level: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct RankedStore {
    #[serde(flatten)]
    pub store: Store,
    /// `null` when either end has no coordinates.
    pub distance_km: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct StoreQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub category: Option<String>,
    pub mood: Option<String>,
    pub limit: Option<usize>,
}

impl StoreQuery {
    pub fn origin(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.lat, self.lng)
    }

    pub fn limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_STORE_LIMIT)
            .clamp(1, MAX_STORE_LIMIT)
    }
}

impl Store {
    pub fn position(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.lat, self.lng)
    }

    /// Active stores, optionally narrowed by category and mood tag, ordered by name.
    pub async fn find_active(
        pool: &PgPool,
        category: Option<&str>,
        mood: Option<&str>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Store>(
            r#"
            SELECT
                id, name, category, area, address, lat, lng, phone, image_url,
                distance_hint, is_active, mood, tags, price_level
            FROM stores
            WHERE is_active
              AND ($1::text IS NULL OR category = $1)
              AND ($2::text IS NULL OR $2 = ANY(mood) OR $2 = ANY(tags))
            ORDER BY name
            "#,
        )
        .bind(category)
        .bind(mood)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Store>(
            r#"
            SELECT
                id, name, category, area, address, lat, lng, phone, image_url,
                distance_hint, is_active, mood, tags, price_level
            FROM stores
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}

/// Nearest first when an origin is given, unknown positions last.
/// Without an origin the incoming order is kept.
pub fn rank_stores(
    mut stores: Vec<Store>,
    origin: Option<Coordinates>,
    limit: usize,
) -> Vec<RankedStore> {
    if let Some(origin) = origin {
        sort_by_distance(&mut stores, origin, Store::position);
    }

    stores
        .into_iter()
        .take(limit)
        .map(|store| {
            let distance = origin
                .map(|o| distance_km(o, store.position()))
                .filter(|d| d.is_finite());
            RankedStore {
                store,
                distance_km: distance,
            }
        })
        .collect()
}
