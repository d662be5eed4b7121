//! Layout mode selection: mobile-optimized vs. desktop-optimized rendering.
//!
//! Pages with alternate mobile/desktop presentations ask the
//! [`LayoutModeSelector`] which variant to render. The decision is
//! recomputed once at mount and again on every window resize or persisted
//! flag change, and stays reactive for as long as the selector is alive.
//! Dropping the selector releases its environment subscription.

use std::cell::Cell;
use std::rc::Rc;

use tracing::debug;

use crate::config::FlagStore;
use crate::env::{EnvSnapshot, EnvironmentEvent, EnvironmentHub};
use crate::events::Subscription;

/// The layout decision exposed to consumers.
///
/// `is_mobile` is the externally-visible decision pages should follow;
/// `is_actual_mobile` is the raw device heuristic, exposed separately for
/// callers that want the unmodified device class (e.g. to offer a "switch
/// back to desktop" affordance only on real desktops).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutMode {
    /// Effective decision: render the mobile-optimized variant
    pub is_mobile: bool,
    /// Raw device heuristic, independent of the forced-mobile flag
    pub is_actual_mobile: bool,
}

impl LayoutMode {
    /// Alias for [`LayoutMode::is_mobile`], matching the vocabulary used by
    /// page components.
    #[must_use]
    pub const fn should_use_mobile_layout(&self) -> bool {
        self.is_mobile
    }
}

/// The two pure functions the selector evaluates.
///
/// `layout_override` is authoritative: whatever it returns *is* the
/// effective `is_mobile` value. `device_class` is reported independently as
/// `is_actual_mobile` and feeds into `is_mobile` only through whatever the
/// override chooses to do with it internally.
pub trait LayoutPolicy {
    /// Effective mobile-layout decision for the given environment.
    fn layout_override(&self, env: &EnvSnapshot) -> bool;

    /// Raw device-class heuristic for the given environment.
    fn device_class(&self, env: &EnvSnapshot) -> bool;
}

/// Default policy: the forced-mobile flag always wins when set; with the
/// flag unset the device heuristic decides.
pub struct StandardLayoutPolicy {
    store: Rc<dyn FlagStore>,
}

impl StandardLayoutPolicy {
    /// Creates the policy over the given persisted flag store.
    #[must_use]
    pub fn new(store: Rc<dyn FlagStore>) -> Self {
        Self { store }
    }
}

impl LayoutPolicy for StandardLayoutPolicy {
    fn layout_override(&self, env: &EnvSnapshot) -> bool {
        self.store.forced_mobile() || self.device_class(env)
    }

    fn device_class(&self, env: &EnvSnapshot) -> bool {
        env.is_mobile_device()
    }
}

/// Reactive source of the current [`LayoutMode`].
///
/// Mounting computes the mode once and subscribes to the environment hub;
/// resize and flag-store events trigger a synchronous recomputation. All
/// reads are non-blocking snapshots. The subscription is scoped to the
/// selector: once it is dropped, no further environment event touches its
/// state.
pub struct LayoutModeSelector {
    mode: Rc<Cell<LayoutMode>>,
    _subscription: Subscription,
}

impl LayoutModeSelector {
    /// Mounts a selector on the given hub with the given policy.
    #[must_use]
    pub fn mount(hub: &EnvironmentHub, policy: Rc<dyn LayoutPolicy>) -> Self {
        let mode = Rc::new(Cell::new(Self::compute(&*policy, &hub.snapshot())));

        let mode_for_listener = Rc::clone(&mode);
        let policy_for_listener = Rc::clone(&policy);
        let subscription = hub.subscribe(move |event, snapshot| match event {
            EnvironmentEvent::Resized { .. } | EnvironmentEvent::FlagStoreChanged { .. } => {
                let next = Self::compute(&*policy_for_listener, snapshot);
                if next != mode_for_listener.get() {
                    debug!(
                        is_mobile = next.is_mobile,
                        is_actual_mobile = next.is_actual_mobile,
                        "layout mode changed"
                    );
                }
                mode_for_listener.set(next);
            }
        });

        Self {
            mode,
            _subscription: subscription,
        }
    }

    /// Evaluates the policy against one environment reading.
    ///
    /// Pure: identical environments always yield identical modes.
    #[must_use]
    pub fn compute(policy: &dyn LayoutPolicy, env: &EnvSnapshot) -> LayoutMode {
        LayoutMode {
            is_mobile: policy.layout_override(env),
            is_actual_mobile: policy.device_class(env),
        }
    }

    /// Current layout decision.
    #[must_use]
    pub fn mode(&self) -> LayoutMode {
        self.mode.get()
    }

    /// Shortcut for `mode().is_mobile`.
    #[must_use]
    pub fn is_mobile(&self) -> bool {
        self.mode.get().is_mobile
    }

    /// Shortcut for `mode().is_actual_mobile`.
    #[must_use]
    pub fn is_actual_mobile(&self) -> bool {
        self.mode.get().is_actual_mobile
    }

    /// Shortcut for `mode().should_use_mobile_layout()`.
    #[must_use]
    pub fn should_use_mobile_layout(&self) -> bool {
        self.is_mobile()
    }
}

impl std::fmt::Debug for LayoutModeSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutModeSelector")
            .field("mode", &self.mode.get())
            .finish()
    }
}
