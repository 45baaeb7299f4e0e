//! CLI command implementations.

pub mod cart;
pub mod checkout;

use bazario_core::{Email, UserId};
use bazario_storefront::services::UserProfile;
use bazario_storefront::{Storefront, StorefrontConfig};
use thiserror::Error;

/// Errors wiring up the engine from the environment.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error(transparent)]
    Config(#[from] bazario_storefront::config::ConfigError),
    #[error("Invalid BAZARIO_SESSION_EMAIL: {0}")]
    SessionEmail(#[from] bazario_core::EmailError),
}

/// Build the engine and, when the auth service handed us a session
/// through the environment, sign it in.
pub async fn connect() -> Result<Storefront, ConnectError> {
    let config = StorefrontConfig::from_env()?;
    let storefront = Storefront::new(config);

    let user_id = std::env::var("BAZARIO_SESSION_USER_ID").ok();
    let email = std::env::var("BAZARIO_SESSION_EMAIL").ok();

    if let (Some(user_id), Some(email)) = (user_id, email) {
        let profile = UserProfile {
            id: UserId::new(user_id),
            name: std::env::var("BAZARIO_SESSION_NAME").ok(),
            email: Email::parse(&email)?,
            phone: None,
            address: None,
        };
        if let Err(e) = storefront.sign_in(profile).await {
            // Sign-in sticks even when the initial cart fetch fails.
            tracing::warn!("Could not fetch server-side cart: {e}");
        }
    }

    Ok(storefront)
}
