//! Session gate: guards authenticated views.
//!
//! The gate turns an auth-state snapshot into an explicit decision the view
//! layer interprets: keep showing a loading placeholder, redirect to the
//! login page, or render the guarded content. Returning a value instead of
//! performing the navigation keeps the state machine independent of any
//! routing library and directly testable.

use tracing::debug;

use crate::auth::AuthProvider;
use crate::constants::LOGIN_ROUTE;
use crate::events::Subscription;
use crate::models::AuthState;

/// Outcome of evaluating the gate against one auth-state snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Auth provider has not resolved yet; show a loading placeholder
    Loading,
    /// Unauthenticated; navigate away from the guarded content
    Redirect {
        /// Route to navigate to
        target: String,
        /// Replace the current history entry so back-navigation does not
        /// return to the guarded page
        replace: bool,
    },
    /// Authenticated; render the guarded content unmodified
    Render,
}

impl GateDecision {
    /// Evaluates the gate state machine for one snapshot.
    ///
    /// Loading dominates: while the provider is unresolved nothing is
    /// redirected, whatever the user/session fields hold. Once resolved,
    /// a missing user *or* missing session redirects to the fixed login
    /// route with history replacement; only a complete pair renders.
    #[must_use]
    pub fn from_auth_state(state: &AuthState) -> Self {
        if state.is_loading {
            debug!("session gate: auth state still resolving");
            return GateDecision::Loading;
        }

        if !state.is_authenticated() {
            debug!(route = LOGIN_ROUTE, "session gate: unauthenticated, redirecting");
            return GateDecision::Redirect {
                target: LOGIN_ROUTE.to_string(),
                replace: true,
            };
        }

        debug!("session gate: authenticated, rendering");
        GateDecision::Render
    }

    /// Returns true for [`GateDecision::Render`].
    #[must_use]
    pub const fn allows_render(&self) -> bool {
        matches!(self, GateDecision::Render)
    }
}

/// Session gate over an injected auth provider.
///
/// `decide` evaluates the current snapshot on demand; `watch` re-evaluates
/// on every provider change and hands the fresh decision to the callback,
/// returning the subscription handle the consuming view drops on teardown.
#[derive(Debug)]
pub struct SessionGate<P> {
    provider: P,
}

impl<P: AuthProvider> SessionGate<P> {
    /// Creates a gate over the given provider.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Evaluates the gate against the provider's current snapshot.
    #[must_use]
    pub fn decide(&self) -> GateDecision {
        GateDecision::from_auth_state(&self.provider.state())
    }

    /// Re-evaluates the gate on every auth change.
    ///
    /// The callback receives the decision derived from each published
    /// snapshot. Dropping the returned handle stops the notifications.
    pub fn watch(&self, mut callback: impl FnMut(GateDecision) + 'static) -> Subscription {
        self.provider.subscribe(Box::new(move |state: &AuthState| {
            callback(GateDecision::from_auth_state(state));
        }))
    }

    /// Read access to the wrapped provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }
}
