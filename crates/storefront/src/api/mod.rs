//! REST clients for the Bazario backend services.
//!
//! [`ApiClient`] talks JSON over HTTP with `reqwest` and caches catalog
//! reads with `moka` (5-minute TTL). The cart and order surfaces are
//! exposed as the [`CartService`] and [`OrderService`] traits so tests and
//! alternate transports can stand in for the HTTP client.

mod cart;
mod orders;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use bazario_core::ProductId;

use crate::cart::LineItem;
use crate::checkout::orchestrator::OrderSubmission;
use crate::config::ApiConfig;

pub use types::{OrderConfirmation, Product};

const CATALOG_CACHE_CAPACITY: u64 = 1000;
const CATALOG_CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

/// Errors from the HTTP layer.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected the request for a business reason
    /// (409 Conflict), e.g. requested quantity exceeds stock.
    #[error("{message}")]
    Rejected { message: String },

    /// Rate limited; retry after the given number of seconds.
    #[error("Rate limited, retry after {0}s")]
    RateLimited(u64),

    /// Non-success status without a structured error body.
    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not parse as the expected shape.
    #[error("Failed to parse backend response: {0}")]
    Parse(#[from] serde_json::Error),
}

// =============================================================================
// Service traits
// =============================================================================

/// The remote cart service contract.
///
/// Every mutating call returns the *full* resulting cart - the server's
/// list is authoritative and replaces local state wholesale.
#[allow(async_fn_in_trait)]
pub trait CartService {
    /// Fetch the current cart.
    async fn fetch_cart(&self) -> Result<Vec<LineItem>, ApiError>;

    /// Add a product (or increment its line) and return the resulting cart.
    async fn add_to_cart(
        &self,
        product_id: &ProductId,
        quantity: u32,
        selected_size: Option<&str>,
    ) -> Result<Vec<LineItem>, ApiError>;

    /// Remove a line and return the resulting cart.
    async fn remove_from_cart(&self, product_id: &ProductId) -> Result<Vec<LineItem>, ApiError>;

    /// Set a line's quantity and return the resulting cart.
    async fn update_cart_item(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<Vec<LineItem>, ApiError>;

    /// Empty the server-side cart.
    async fn clear_cart(&self) -> Result<(), ApiError>;
}

/// The order service contract.
#[allow(async_fn_in_trait)]
pub trait OrderService {
    /// Submit an assembled order. Called at most once per submission
    /// attempt; retries re-assemble and resubmit.
    async fn create_order(&self, order: &OrderSubmission) -> Result<OrderConfirmation, ApiError>;
}

// =============================================================================
// ApiClient
// =============================================================================

/// HTTP client for the Bazario REST backend.
///
/// Cheaply cloneable via `Arc`. Catalog reads are cached for 5 minutes in
/// a cache owned by this client instance (never module-global state).
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    token: String,
    catalog: Cache<String, Arc<Product>>,
}

impl ApiClient {
    /// Create a new backend client.
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        let catalog = Cache::builder()
            .max_capacity(CATALOG_CACHE_CAPACITY)
            .time_to_live(CATALOG_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                token: config.token.expose_secret().to_string(),
                catalog,
            }),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        // Url::join treats absolute paths as root-relative; backend paths
        // here are always relative segments.
        format!(
            "{}/{}",
            self.inner.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Execute a JSON request and decode the response.
    async fn request<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let mut builder = self
            .inner
            .client
            .request(method, self.endpoint(path))
            .header("Authorization", format!("Bearer {}", self.inner.token))
            .header("Accept", "application/json");

        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        let response_text = response.text().await?;

        if status == StatusCode::CONFLICT {
            // Business rejection; the message is meant for the shopper.
            let message = serde_json::from_str::<types::ErrorBody>(&response_text)
                .map(|b| b.error)
                .unwrap_or_else(|_| response_text.clone());
            return Err(ApiError::Rejected { message });
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: response_text.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::GET, path, None).await
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Get a product by id, served from the read-through cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product(&self, product_id: &ProductId) -> Result<Arc<Product>, ApiError> {
        let cache_key = format!("product:{product_id}");

        if let Some(product) = self.inner.catalog.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let product: Product = self.get(&format!("products/{product_id}")).await?;
        let product = Arc::new(product);
        self.inner
            .catalog
            .insert(cache_key, Arc::clone(&product))
            .await;

        Ok(product)
    }
}
