//! Auth-state providers.
//!
//! The session gate never reaches into an ambient/global auth context;
//! instead it is handed an [`AuthProvider`], an injected source of
//! [`AuthState`] snapshots with change notifications. Production wires in a
//! provider backed by the hosted identity service; tests and the demo shell
//! use [`MemoryAuthProvider`].

use std::cell::RefCell;
use std::rc::Rc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::events::{ListenerSet, Subscription};
use crate::models::{AuthState, Session, User};

/// Injected source of authentication state.
///
/// Implementations own the session lifecycle (sign-in, sign-out, expiry);
/// consumers only read snapshots and react to change notifications.
pub trait AuthProvider {
    /// Returns the current auth-state snapshot. Must not block.
    fn state(&self) -> AuthState;

    /// Registers a change listener; dropping the handle deregisters it.
    ///
    /// The listener receives the snapshot that resulted from each change.
    fn subscribe(&self, listener: Box<dyn FnMut(&AuthState)>) -> Subscription;
}

/// In-process auth provider for tests and the demo shell.
///
/// Starts in the loading state, mirroring a real provider that has not yet
/// resolved its persisted session. Every mutation publishes a fresh
/// snapshot to subscribers. An expired session is reported as absent, so
/// expiry collapses into the unauthenticated shape on the next read.
#[derive(Clone)]
pub struct MemoryAuthProvider {
    state: Rc<RefCell<AuthState>>,
    listeners: ListenerSet<AuthState>,
}

impl MemoryAuthProvider {
    /// Creates a provider in the loading state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(AuthState::loading())),
            listeners: ListenerSet::new(),
        }
    }

    /// Re-enters the loading state (e.g. while re-validating a session).
    pub fn begin_loading(&self) {
        self.publish(AuthState::loading());
    }

    /// Resolves the initial state with nobody signed in.
    pub fn resolve_signed_out(&self) {
        self.publish(AuthState::signed_out());
    }

    /// Signs a user in with the given session credential.
    pub fn sign_in(&self, user: User, session: Session) {
        debug!(user_id = %user.id, role = %user.role, "signed in");
        self.publish(AuthState::signed_in(user, session));
    }

    /// Destroys the current session.
    pub fn sign_out(&self) {
        debug!("signed out");
        self.publish(AuthState::signed_out());
    }

    /// Records a provider failure.
    ///
    /// There is no distinct error state: a failure collapses into the
    /// resolved unauthenticated shape, and downstream consumers treat it
    /// exactly like a signed-out session.
    pub fn fail(&self, error: &anyhow::Error) {
        warn!("auth provider failure: {error:#}");
        self.publish(AuthState::signed_out());
    }

    fn publish(&self, next: AuthState) {
        *self.state.borrow_mut() = next.clone();
        self.listeners.emit(&next);
    }
}

impl Default for MemoryAuthProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthProvider for MemoryAuthProvider {
    fn state(&self) -> AuthState {
        let state = self.state.borrow().clone();

        // Report a lapsed session as absent. The stored state is left for
        // the next explicit transition; reads are side-effect free.
        if let Some(session) = &state.session {
            if session.is_expired_at(Utc::now()) {
                debug!(session_id = %session.id, "session expired");
                return AuthState::signed_out();
            }
        }

        state
    }

    fn subscribe(&self, mut listener: Box<dyn FnMut(&AuthState)>) -> Subscription {
        self.listeners.subscribe(move |state: &AuthState| listener(state))
    }
}

impl std::fmt::Debug for MemoryAuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryAuthProvider")
            .field("state", &self.state.borrow())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use chrono::Duration;

    #[test]
    fn test_starts_loading() {
        let provider = MemoryAuthProvider::new();
        assert!(provider.state().is_loading);
    }

    #[test]
    fn test_sign_in_and_out() {
        let provider = MemoryAuthProvider::new();
        provider.sign_in(User::new("u1", "Ana", Role::Cashier), Session::new("t1"));
        assert!(provider.state().is_authenticated());

        provider.sign_out();
        let state = provider.state();
        assert!(!state.is_authenticated());
        assert!(!state.is_loading);
    }

    #[test]
    fn test_failure_collapses_to_signed_out() {
        let provider = MemoryAuthProvider::new();
        provider.fail(&anyhow::anyhow!("identity service unreachable"));

        let state = provider.state();
        assert!(state.user.is_none());
        assert!(state.session.is_none());
        assert!(!state.is_loading);
    }

    #[test]
    fn test_expired_session_reported_absent() {
        let provider = MemoryAuthProvider::new();
        let session = Session::expiring("t1", Utc::now() - Duration::seconds(1));
        provider.sign_in(User::new("u1", "Ana", Role::Cashier), session);

        assert!(!provider.state().is_authenticated());
    }

    #[test]
    fn test_subscribers_see_each_transition() {
        let provider = MemoryAuthProvider::new();
        let seen: Rc<RefCell<Vec<bool>>> = Rc::new(RefCell::new(Vec::new()));

        let seen_by_listener = Rc::clone(&seen);
        let _sub = provider.subscribe(Box::new(move |state: &AuthState| {
            seen_by_listener.borrow_mut().push(state.is_authenticated());
        }));

        provider.resolve_signed_out();
        provider.sign_in(User::new("u1", "Ana", Role::Cashier), Session::new("t1"));
        provider.sign_out();

        assert_eq!(*seen.borrow(), vec![false, true, false]);
    }
}
