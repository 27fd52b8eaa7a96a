use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::external::kakao::KakaoProfile;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub kakao_id: i64,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub profile_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct KakaoCallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl User {
    /// Inserts the Kakao account on first login, refreshes its profile after.
    pub async fn upsert_from_kakao(
        pool: &PgPool,
        profile: &KakaoProfile,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, kakao_id, nickname, email, profile_image_url, created_at, last_login_at)
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            ON CONFLICT (kakao_id) DO UPDATE SET
                nickname = COALESCE(EXCLUDED.nickname, users.nickname),
                email = COALESCE(EXCLUDED.email, users.email),
                profile_image_url = COALESCE(EXCLUDED.profile_image_url, users.profile_image_url),
                last_login_at = NOW()
            RETURNING id, kakao_id, nickname, email, profile_image_url, created_at, last_login_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(profile.id)
        .bind(profile.nickname())
        .bind(profile.email())
        .bind(profile.profile_image_url())
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, kakao_id, nickname, email, profile_image_url, created_at, last_login_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}
