//! Authentication sessions and the auth-state snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::User;

/// Proof of authentication issued by the external identity provider.
///
/// The credential bundle is opaque to this core: it is created on sign-in,
/// destroyed on sign-out or expiry, and only ever read here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier
    pub id: Uuid,
    /// Bearer token presented to the backend
    pub token: String,
    /// When the provider issued this session
    pub issued_at: DateTime<Utc>,
    /// When the session lapses, if the provider sets a lifetime
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Creates a session issued now with no expiry.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            token: token.into(),
            issued_at: Utc::now(),
            expires_at: None,
        }
    }

    /// Creates a session issued now that lapses at the given instant.
    #[must_use]
    pub fn expiring(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            expires_at: Some(expires_at),
            ..Self::new(token)
        }
    }

    /// Returns true if the session has lapsed at the given instant.
    ///
    /// Sessions without an expiry never lapse on their own; only an explicit
    /// sign-out destroys them.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}

/// Point-in-time snapshot of the auth provider's state.
///
/// The three fields mirror what the provider exposes: the signed-in user,
/// the session credential, and whether the provider is still resolving its
/// initial state. Consumers treat the snapshot as immutable; the provider
/// publishes a fresh one on every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    /// Signed-in user, absent while unauthenticated
    pub user: Option<User>,
    /// Session credential, absent while unauthenticated
    pub session: Option<Session>,
    /// True until the provider has resolved its initial state
    pub is_loading: bool,
}

impl AuthState {
    /// Snapshot for a provider that has not yet resolved.
    #[must_use]
    pub const fn loading() -> Self {
        Self {
            user: None,
            session: None,
            is_loading: true,
        }
    }

    /// Snapshot for a resolved provider with nobody signed in.
    ///
    /// Provider errors also collapse into this shape: there is no distinct
    /// error state, an unusable session is simply absent.
    #[must_use]
    pub const fn signed_out() -> Self {
        Self {
            user: None,
            session: None,
            is_loading: false,
        }
    }

    /// Snapshot for a resolved provider with a signed-in user.
    #[must_use]
    pub const fn signed_in(user: User, session: Session) -> Self {
        Self {
            user: Some(user),
            session: Some(session),
            is_loading: false,
        }
    }

    /// Returns true if both the user and the session are present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.session.is_some()
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::loading()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use chrono::Duration;

    #[test]
    fn test_session_without_expiry_never_lapses() {
        let session = Session::new("t1");
        assert!(!session.is_expired_at(Utc::now() + Duration::days(365)));
    }

    #[test]
    fn test_session_expiry_boundary() {
        let deadline = Utc::now() + Duration::minutes(30);
        let session = Session::expiring("t1", deadline);

        assert!(!session.is_expired_at(deadline - Duration::seconds(1)));
        assert!(session.is_expired_at(deadline));
        assert!(session.is_expired_at(deadline + Duration::seconds(1)));
    }

    #[test]
    fn test_auth_state_authenticated_requires_both() {
        let user = User::new("u1", "Ana", Role::Cashier);
        let session = Session::new("t1");

        assert!(AuthState::signed_in(user.clone(), session).is_authenticated());
        assert!(!AuthState::signed_out().is_authenticated());

        let user_only = AuthState {
            user: Some(user),
            session: None,
            is_loading: false,
        };
        assert!(!user_only.is_authenticated());
    }

    #[test]
    fn test_default_is_loading() {
        assert!(AuthState::default().is_loading);
    }
}
