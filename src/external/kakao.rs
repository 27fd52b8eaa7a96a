//! Kakao Local and Kakao Login REST calls.
//!
//! Local API responses are handed back as raw JSON; callers forward them
//! to the browser untouched.

use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    config::Config,
    error::{AppError, AppResult},
};

#[derive(Debug, Clone)]
pub struct KakaoClient {
    http: Client,
    rest_api_key: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    redirect_uri: Option<String>,
    api_base: String,
    auth_base: String,
    user_api_base: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct KakaoProfile {
    pub id: i64,
    #[serde(default)]
    pub kakao_account: Option<KakaoAccount>,
}

#[derive(Debug, Default, Deserialize)]
pub struct KakaoAccount {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile: Option<KakaoAccountProfile>,
}

#[derive(Debug, Default, Deserialize)]
pub struct KakaoAccountProfile {
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
}

impl KakaoProfile {
    pub fn nickname(&self) -> Option<&str> {
        self.kakao_account
            .as_ref()?
            .profile
            .as_ref()?
            .nickname
            .as_deref()
    }

    pub fn profile_image_url(&self) -> Option<&str> {
        self.kakao_account
            .as_ref()?
            .profile
            .as_ref()?
            .profile_image_url
            .as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.kakao_account.as_ref()?.email.as_deref()
    }
}

impl KakaoClient {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(config.upstream_timeout()).build()?;

        Ok(Self {
            http,
            rest_api_key: config.kakao_rest_api_key.clone(),
            client_id: config.kakao_client_id.clone(),
            client_secret: config.kakao_client_secret.clone(),
            redirect_uri: config.kakao_redirect_uri.clone(),
            api_base: config.kakao_api_base.trim_end_matches('/').to_string(),
            auth_base: config.kakao_auth_base.trim_end_matches('/').to_string(),
            user_api_base: config.kakao_user_api_base.trim_end_matches('/').to_string(),
        })
    }

    fn rest_api_key(&self) -> AppResult<&str> {
        self.rest_api_key
            .as_deref()
            .ok_or(AppError::MissingConfig("KAKAO_REST_API_KEY"))
    }

    fn client_id(&self) -> AppResult<&str> {
        self.client_id
            .as_deref()
            .ok_or(AppError::MissingConfig("KAKAO_CLIENT_ID"))
    }

    fn redirect_uri(&self) -> AppResult<&str> {
        self.redirect_uri
            .as_deref()
            .ok_or(AppError::MissingConfig("KAKAO_REDIRECT_URI"))
    }

    async fn get_local(&self, path: &str, params: &[(&str, String)]) -> AppResult<Value> {
        let key = self.rest_api_key()?;
        let url = format!("{}{}", self.api_base, path);

        let res = self
            .http
            .get(url)
            .header(reqwest::header::AUTHORIZATION, format!("KakaoAK {}", key))
            .query(params)
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(AppError::UpstreamStatus(res.status()));
        }

        Ok(res.json::<Value>().await?)
    }

    /// Keyword place search. `params` must already contain `query`.
    #[tracing::instrument(skip(self))]
    pub async fn search_keyword(&self, params: &[(&str, String)]) -> AppResult<Value> {
        self.get_local("/v2/local/search/keyword.json", params).await
    }

    /// Coordinate to address. `x` is longitude, `y` latitude.
    #[tracing::instrument(skip(self))]
    pub async fn coord_to_address(&self, x: &str, y: &str) -> AppResult<Value> {
        self.get_local(
            "/v2/local/geo/coord2address.json",
            &[("x", x.to_string()), ("y", y.to_string())],
        )
        .await
    }

    pub fn authorize_url(&self) -> AppResult<Url> {
        let base = format!("{}/oauth/authorize", self.auth_base);
        Url::parse_with_params(
            &base,
            &[
                ("client_id", self.client_id()?),
                ("redirect_uri", self.redirect_uri()?),
                ("response_type", "code"),
            ],
        )
        .map_err(|e| {
            tracing::error!("KAKAO_AUTH_BASE does not parse: {}", e);
            AppError::InvalidConfig("KAKAO_AUTH_BASE")
        })
    }

    #[tracing::instrument(skip_all)]
    pub async fn exchange_code(&self, code: &str) -> AppResult<TokenResponse> {
        let mut form = vec![
            ("grant_type", "authorization_code"),
            ("client_id", self.client_id()?),
            ("redirect_uri", self.redirect_uri()?),
            ("code", code),
        ];
        if let Some(secret) = self.client_secret.as_deref() {
            form.push(("client_secret", secret));
        }

        let res = self
            .http
            .post(format!("{}/oauth/token", self.auth_base))
            .form(&form)
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(AppError::UpstreamStatus(res.status()));
        }

        Ok(res.json::<TokenResponse>().await?)
    }

    #[tracing::instrument(skip_all)]
    pub async fn fetch_profile(&self, access_token: &str) -> AppResult<KakaoProfile> {
        let res = self
            .http
            .get(format!("{}/v2/user/me", self.user_api_base))
            .bearer_auth(access_token)
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(AppError::UpstreamStatus(res.status()));
        }

        Ok(res.json::<KakaoProfile>().await?)
    }
}
