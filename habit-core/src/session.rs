//! Auth Session
//!
//! Holds the logged-in user and token pair, persists them through a
//! [`SessionStore`], and runs authenticated calls with a single
//! refresh-and-retry when the server answers 401.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::api::{ApiError, AuthService};
use crate::domain::{LoginRequest, RegisterRequest};
use crate::repository::{SessionStore, StoredSession};

pub struct AuthSession {
    auth: Arc<dyn AuthService>,
    store: Option<Arc<dyn SessionStore>>,
    current: Mutex<Option<StoredSession>>,
}

impl AuthSession {
    /// Restores a previously saved session from `store`, if any.
    pub fn new(auth: Arc<dyn AuthService>, store: Option<Arc<dyn SessionStore>>) -> Self {
        let current = store.as_ref().and_then(|store| match store.load() {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "failed to restore session");
                None
            }
        });
        if let Some(session) = &current {
            tracing::info!(username = %session.username, "session restored");
        }

        Self {
            auth,
            store,
            current: Mutex::new(current),
        }
    }

    pub async fn username(&self) -> Option<String> {
        self.current.lock().await.as_ref().map(|s| s.username.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current.lock().await.is_some()
    }

    pub async fn access_token(&self) -> Result<String, ApiError> {
        self.current
            .lock()
            .await
            .as_ref()
            .map(|s| s.tokens.access_token.clone())
            .ok_or(ApiError::NotAuthenticated)
    }

    fn persist(&self, session: Option<&StoredSession>) {
        let Some(store) = &self.store else {
            return;
        };
        let result = match session {
            Some(session) => store.save(session),
            None => store.clear(),
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to persist session");
        }
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<String, ApiError> {
        let request = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.auth.register(&request).await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<(), ApiError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let tokens = self.auth.login(&request).await?;
        let session = StoredSession {
            username: username.to_string(),
            tokens,
        };

        self.persist(Some(&session));
        *self.current.lock().await = Some(session);
        tracing::info!(%username, "logged in");
        Ok(())
    }

    /// Local tokens are always dropped, even when the server call fails.
    pub async fn logout(&self) {
        let previous = self.current.lock().await.take();
        if let Some(session) = previous {
            if let Err(e) = self.auth.logout(&session.tokens.access_token).await {
                tracing::warn!(error = %e, "server logout failed, clearing local session anyway");
            }
            tracing::info!(username = %session.username, "logged out");
        }
        self.persist(None);
    }

    /// Exchange the refresh token for a new pair. On failure the current
    /// session is kept and `false` is returned.
    pub async fn refresh(&self) -> bool {
        let Some(refresh_token) = self
            .current
            .lock()
            .await
            .as_ref()
            .map(|s| s.tokens.refresh_token.clone())
        else {
            return false;
        };

        match self.auth.refresh(&refresh_token).await {
            Ok(tokens) => {
                let mut current = self.current.lock().await;
                if let Some(session) = current.as_mut() {
                    session.tokens = tokens;
                    self.persist(Some(&*session));
                }
                tracing::debug!("access token refreshed");
                current.is_some()
            }
            Err(e) => {
                tracing::warn!(error = %e, "token refresh failed");
                false
            }
        }
    }

    /// Run `op` with the current access token. A 401 answer triggers one
    /// refresh and one retry with the new token.
    pub async fn call<T, F, Fut>(&self, op: F) -> Result<T, ApiError>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let token = self.access_token().await?;
        match op(token).await {
            Err(e) if e.is_unauthorized() => {
                tracing::info!("access token rejected, refreshing");
                if !self.refresh().await {
                    return Err(e);
                }
                let token = self.access_token().await?;
                op(token).await
            }
            other => other,
        }
    }
}
