//! Session context supplied by the external auth service.
//!
//! The engine never authenticates anyone; it reads the session the auth
//! collaborator established. Cart mutations require an authenticated
//! session, and the profile pre-fills the checkout form.

use std::sync::{Arc, RwLock};

use bazario_core::{Email, Phone, UserId};
use serde::{Deserialize, Serialize};

/// Saved address on the shopper's profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

/// The authenticated shopper.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub name: Option<String>,
    pub email: Email,
    pub phone: Option<Phone>,
    pub address: Option<ProfileAddress>,
}

/// Shared handle to the current session state.
///
/// Cheaply cloneable; all clones observe the same sign-in/sign-out events.
#[derive(Clone, Default)]
pub struct Session {
    inner: Arc<RwLock<Option<UserProfile>>>,
}

impl Session {
    /// A session with nobody signed in.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A session already signed in as the given shopper.
    #[must_use]
    pub fn authenticated(profile: UserProfile) -> Self {
        let session = Self::default();
        session.sign_in(profile);
        session
    }

    /// Record a sign-in event from the auth service.
    pub fn sign_in(&self, profile: UserProfile) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = Some(profile);
        }
    }

    /// Drop the signed-in shopper.
    ///
    /// Callers that own a cart must clear it *before* this (privacy: a
    /// cart must not leak across accounts on a shared device). The
    /// [`Storefront`](crate::state::Storefront) facade enforces that order.
    pub fn sign_out(&self) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = None;
        }
    }

    /// Whether a shopper is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.read().is_ok_and(|guard| guard.is_some())
    }

    /// The signed-in shopper's profile, if any.
    #[must_use]
    pub fn user(&self) -> Option<UserProfile> {
        self.inner.read().ok().and_then(|guard| guard.clone())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
