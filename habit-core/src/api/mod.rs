//! API Layer
//!
//! Async service traits over the tracker REST API with an HTTP client, an
//! in-process mock and a network fallback wrapper.

mod error;
mod fallback;
mod http;
mod mock;
mod response;
mod traits;


use std::sync::Arc;
use std::time::Duration;

pub use error::ApiError;
pub use fallback::FallbackService;
pub use http::{HttpService, DEFAULT_BASE_URL};
pub use mock::{MockService, MOCK_USERNAME, MOCK_VERSION};
pub use response::{handle_response, ApiResponse};
pub use traits::{AuthService, HabitService, SystemService};

/// How the service bundle is assembled
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceOptions {
    pub base_url: String,
    pub use_mock: bool,
    pub offline_fallback: bool,
    pub timeout: Duration,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            use_mock: false,
            offline_fallback: true,
            timeout: Duration::from_secs(15),
        }
    }
}

/// One handle per service trait, all backed by the same implementation
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<dyn AuthService>,
    pub habits: Arc<dyn HabitService>,
    pub system: Arc<dyn SystemService>,
}

impl Services {
    pub fn from_backend<T>(backend: Arc<T>) -> Self
    where
        T: AuthService + HabitService + SystemService + 'static,
    {
        Self {
            auth: backend.clone(),
            habits: backend.clone(),
            system: backend,
        }
    }

    pub fn build(options: &ServiceOptions) -> Result<Self, ApiError> {
        if options.use_mock {
            tracing::info!("using mock tracker service");
            return Ok(Self::from_backend(Arc::new(MockService::new())));
        }

        let http = HttpService::new(options.base_url.clone(), options.timeout)?;
        tracing::info!(base_url = %http.base_url(), fallback = options.offline_fallback, "using tracker service");
        if options.offline_fallback {
            Ok(Self::from_backend(Arc::new(FallbackService::new(
                http,
                MockService::new(),
            ))))
        } else {
            Ok(Self::from_backend(Arc::new(http)))
        }
    }
}
