//! Engine facade shared across callers.

use std::sync::Arc;

use tracing::instrument;

use crate::api::ApiClient;
use crate::cart::CartStore;
use crate::checkout::{BuyNowStore, Checkout};
use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::payment::PaymentSimulator;
use crate::services::{Notifier, Session, TracingNotifier, UserProfile};

/// The wired-up storefront engine.
///
/// This struct is cheaply cloneable via `Arc` and owns the backend client,
/// the session handle, and the cart store. It also enforces the one
/// cross-cutting invariant the pieces cannot enforce alone: on logout the
/// cart is cleared *before* the session is dropped, so a cart never leaks
/// across accounts on a shared device.
#[derive(Clone)]
pub struct Storefront {
    inner: Arc<StorefrontInner>,
}

struct StorefrontInner {
    config: StorefrontConfig,
    api: ApiClient,
    session: Session,
    notifier: Arc<dyn Notifier>,
    cart: CartStore<ApiClient>,
}

impl Storefront {
    /// Wire up the engine with the default `tracing`-backed notifier.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        Self::with_notifier(config, Arc::new(TracingNotifier))
    }

    /// Wire up the engine with a caller-supplied notification sink.
    #[must_use]
    pub fn with_notifier(config: StorefrontConfig, notifier: Arc<dyn Notifier>) -> Self {
        let api = ApiClient::new(&config.api);
        let session = Session::anonymous();
        let cart = CartStore::new(api.clone(), session.clone(), Arc::clone(&notifier));

        Self {
            inner: Arc::new(StorefrontInner {
                config,
                api,
                session,
                notifier,
                cart,
            }),
        }
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backend API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to the session handle.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore<ApiClient> {
        &self.inner.cart
    }

    /// The buy-now snapshot store at the configured path.
    #[must_use]
    pub fn buy_now(&self) -> BuyNowStore {
        BuyNowStore::new(self.inner.config.buy_now_path.clone())
    }

    /// Start a checkout wizard over the current session, backed by the
    /// simulated payment gateway.
    #[must_use]
    pub fn begin_checkout(&self) -> Checkout<ApiClient, PaymentSimulator> {
        Checkout::new(
            self.inner.api.clone(),
            PaymentSimulator::new(),
            self.inner.session.clone(),
            Arc::clone(&self.inner.notifier),
            self.inner.config.currency,
        )
    }

    /// Record a sign-in from the auth service and pull the shopper's
    /// server-side cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial cart fetch fails; the session is
    /// signed in regardless.
    #[instrument(skip(self, profile), fields(user_id = %profile.id))]
    pub async fn sign_in(&self, profile: UserProfile) -> Result<()> {
        self.inner.session.sign_in(profile);
        self.inner.cart.refresh().await
    }

    /// Sign the shopper out. Clears the cart first (server-side too),
    /// then drops the session.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        self.inner.cart.clear().await?;
        self.inner.session.sign_out();
        self.inner.notifier.success("Signed out");
        Ok(())
    }
}
