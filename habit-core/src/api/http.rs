//! HTTP implementation of the tracker services.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use super::error::ApiError;
use super::response::{handle_response, ApiResponse};
use super::traits::{AuthService, HabitService, SystemService};
use crate::domain::{
    normalize_reminders, AuthTokens, CreateHabitRequest, HabitId, HabitListResponse,
    LoginRequest, LoginResponse, LogoutRequest, Progress, RefreshTokenRequest, RegisterRequest,
    ReminderRecord, UpdateHabitRequest, VersionResponse,
};

pub const DEFAULT_BASE_URL: &str = "https://trackhabits.ru/api/v1";

/// REST client for the tracker service
pub struct HttpService {
    client: Client,
    base_url: String,
}

impl HttpService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&B>,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.url(path);
        let mut request = self.client.request(method.clone(), &url);

        // The service expects the bare token, no "Bearer" prefix
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(method = %method, %url, "api request");
        let response = request.send().await.map_err(|e| {
            tracing::warn!(method = %method, %url, error = %e, "api request did not complete");
            ApiError::from(e)
        })?;

        handle_response(response, method.as_str(), &url).await
    }

    async fn get(&self, path: &str, token: Option<&str>) -> Result<ApiResponse, ApiError> {
        self.send::<Value>(Method::GET, path, token, None).await
    }
}

#[async_trait]
impl AuthService for HttpService {
    async fn register(&self, request: &RegisterRequest) -> Result<String, ApiError> {
        tracing::info!(username = %request.username, "registering");
        let response = self
            .send(Method::POST, "/auth/register", None, Some(request))
            .await?;
        Ok(response.into_message())
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthTokens, ApiError> {
        tracing::info!(username = %request.username, "logging in");
        let value = self
            .send(Method::POST, "/auth/login", None, Some(request))
            .await?
            .into_value();

        // `{ "token": { ... } }`, older deployments answer with the bare pair
        match serde_json::from_value::<LoginResponse>(value.clone()) {
            Ok(wrapped) => Ok(wrapped.token),
            Err(_) => Ok(serde_json::from_value::<AuthTokens>(value)?),
        }
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthTokens, ApiError> {
        let request = RefreshTokenRequest {
            refresh_token: refresh_token.to_string(),
        };
        self.send(Method::POST, "/auth/refresh", None, Some(&request))
            .await?
            .into_json()
    }

    async fn logout(&self, access_token: &str) -> Result<String, ApiError> {
        let request = LogoutRequest {
            access_token: access_token.to_string(),
        };
        let response = self
            .send(Method::POST, "/auth/logout", None, Some(&request))
            .await?;
        Ok(response.into_message())
    }
}

#[async_trait]
impl HabitService for HttpService {
    async fn list_habits(&self, token: &str) -> Result<HabitListResponse, ApiError> {
        self.get("/tracker/habits", Some(token)).await?.into_json()
    }

    async fn list_completed_habits(&self, token: &str) -> Result<HabitListResponse, ApiError> {
        self.get("/tracker/habits/completed", Some(token))
            .await?
            .into_json()
    }

    async fn create_habit(&self, request: &CreateHabitRequest, token: &str) -> Result<String, ApiError> {
        request.validate()?;
        let response = self
            .send(Method::POST, "/tracker/habits", Some(token), Some(request))
            .await?;
        Ok(response.into_message())
    }

    async fn update_habit(&self, request: &UpdateHabitRequest, token: &str) -> Result<String, ApiError> {
        request.validate()?;
        let response = self
            .send(Method::PUT, "/tracker/habits", Some(token), Some(request))
            .await?;
        Ok(response.into_message())
    }

    async fn delete_habit(&self, habit_id: HabitId, token: &str) -> Result<String, ApiError> {
        let path = format!("/tracker/habits/{}", habit_id);
        let response = self
            .send::<Value>(Method::DELETE, &path, Some(token), None)
            .await?;
        Ok(response.into_message())
    }

    async fn get_progress(&self, habit_id: HabitId, token: &str) -> Result<Progress, ApiError> {
        let path = format!("/tracker/progress/{}", habit_id);
        self.get(&path, Some(token)).await?.into_json()
    }

    async fn add_progress(&self, habit_id: HabitId, token: &str) -> Result<String, ApiError> {
        let path = format!("/tracker/progress/{}", habit_id);
        let response = self
            .send::<Value>(Method::POST, &path, Some(token), None)
            .await?;
        Ok(response.into_message())
    }

    async fn get_reminders(&self, token: &str) -> Result<Vec<ReminderRecord>, ApiError> {
        let payload = self.get("/tracker/reminder", Some(token)).await?.into_value();
        let reminders = normalize_reminders(&payload);
        tracing::debug!(count = reminders.len(), "reminders fetched");
        Ok(reminders)
    }
}

#[async_trait]
impl SystemService for HttpService {
    async fn current_time(&self, token: &str) -> Result<String, ApiError> {
        let value = self.get("/time/current-time", Some(token)).await?.into_value();
        Ok(match value {
            Value::Object(ref map) => match map.get("currentTime") {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => value.to_string(),
            },
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        })
    }

    async fn next_day(&self, token: &str) -> Result<String, ApiError> {
        let response = self
            .send::<Value>(Method::POST, "/time/next-day", Some(token), None)
            .await?;
        Ok(response.into_message())
    }

    async fn reset_time(&self, token: &str) -> Result<String, ApiError> {
        let response = self
            .send::<Value>(Method::PUT, "/time/reset-time", Some(token), None)
            .await?;
        Ok(response.into_message())
    }

    async fn version(&self) -> Result<VersionResponse, ApiError> {
        self.get("/version", None).await?.into_json()
    }
}
