//! Host environment signals: viewport, user agent and change events.
//!
//! The hub models the host UI environment as an explicit object instead of
//! ambient globals, so the layout machinery can be driven by tests (or the
//! terminal shell) without a real browser-style host. It tracks the latest
//! viewport and user-agent readings and broadcasts change events to scoped
//! subscribers; there is no polling fallback, so a consumer that misses a
//! notification stays stale until the next event arrives.

use tracing::debug;

use crate::constants::{MOBILE_BREAKPOINT, MOBILE_UA_TOKENS};
use crate::events::{ListenerSet, Subscription};
use std::cell::RefCell;
use std::rc::Rc;

/// Viewport dimensions in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    /// Width in logical pixels
    pub width: u16,
    /// Height in logical pixels
    pub height: u16,
}

impl Viewport {
    /// Creates a viewport of the given dimensions.
    #[must_use]
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Environment change delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentEvent {
    /// The host window was resized
    Resized {
        /// New width in logical pixels
        width: u16,
        /// New height in logical pixels
        height: u16,
    },
    /// Another app instance wrote to the persisted flag store
    FlagStoreChanged {
        /// Settings key that changed
        key: String,
    },
}

/// Point-in-time reading of the environment signals.
///
/// Snapshots are handed to subscribers alongside each event and can be
/// queried synchronously from the hub at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvSnapshot {
    /// Latest known viewport dimensions
    pub viewport: Viewport,
    /// Host user-agent string, fixed for the lifetime of the hub
    pub user_agent: String,
}

impl EnvSnapshot {
    /// Classifies the environment as mobile hardware.
    ///
    /// True when the user agent carries a known mobile token or the viewport
    /// is narrower than [`MOBILE_BREAKPOINT`]. This is the raw device
    /// heuristic; it ignores the persisted forced-mobile flag.
    #[must_use]
    pub fn is_mobile_device(&self) -> bool {
        let ua = self.user_agent.to_lowercase();
        MOBILE_UA_TOKENS.iter().any(|token| ua.contains(token))
            || self.viewport.width < MOBILE_BREAKPOINT
    }
}

/// Shared hub state: latest snapshot plus the listener registry.
struct HubState {
    viewport: Viewport,
    user_agent: String,
}

/// Broadcast point for host environment changes.
///
/// One hub exists per UI host. Event producers (the terminal shell, tests,
/// settings writers) push events through [`EnvironmentHub::emit`]; consumers
/// register callbacks scoped to a [`Subscription`] handle. Cloning the hub
/// yields another handle to the same state and listeners.
#[derive(Clone)]
pub struct EnvironmentHub {
    state: Rc<RefCell<HubState>>,
    listeners: ListenerSet<EnvironmentEvent>,
}

impl EnvironmentHub {
    /// Creates a hub with the given initial viewport and user agent.
    #[must_use]
    pub fn new(viewport: Viewport, user_agent: impl Into<String>) -> Self {
        Self {
            state: Rc::new(RefCell::new(HubState {
                viewport,
                user_agent: user_agent.into(),
            })),
            listeners: ListenerSet::new(),
        }
    }

    /// Returns the current environment reading.
    #[must_use]
    pub fn snapshot(&self) -> EnvSnapshot {
        let state = self.state.borrow();
        EnvSnapshot {
            viewport: state.viewport,
            user_agent: state.user_agent.clone(),
        }
    }

    /// Registers a change listener; dropping the handle deregisters it.
    ///
    /// The callback receives the event together with the snapshot taken
    /// after the event was applied, so it never needs to reach back into
    /// the hub mid-dispatch.
    pub fn subscribe(
        &self,
        mut callback: impl FnMut(&EnvironmentEvent, &EnvSnapshot) + 'static,
    ) -> Subscription {
        let state = Rc::clone(&self.state);
        self.listeners.subscribe(move |event: &EnvironmentEvent| {
            let snapshot = {
                let state = state.borrow();
                EnvSnapshot {
                    viewport: state.viewport,
                    user_agent: state.user_agent.clone(),
                }
            };
            callback(event, &snapshot);
        })
    }

    /// Applies an event to the tracked state and dispatches it.
    pub fn emit(&self, event: &EnvironmentEvent) {
        if let EnvironmentEvent::Resized { width, height } = *event {
            let mut state = self.state.borrow_mut();
            state.viewport = Viewport::new(width, height);
            debug!(width, height, "viewport resized");
        }
        self.listeners.emit(event);
    }

    /// Convenience wrapper emitting a [`EnvironmentEvent::Resized`].
    pub fn notify_resized(&self, width: u16, height: u16) {
        self.emit(&EnvironmentEvent::Resized { width, height });
    }

    /// Convenience wrapper emitting a [`EnvironmentEvent::FlagStoreChanged`].
    pub fn notify_flag_changed(&self, key: impl Into<String>) {
        self.emit(&EnvironmentEvent::FlagStoreChanged { key: key.into() });
    }
}

impl std::fmt::Debug for EnvironmentHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("EnvironmentHub")
            .field("viewport", &state.viewport)
            .field("user_agent", &state.user_agent)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    const DESKTOP_UA: &str = "Mozilla/5.0 (X11; Linux x86_64) Gecko/20100101";
    const PHONE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)";

    #[test]
    fn test_narrow_viewport_classifies_mobile() {
        let snapshot = EnvSnapshot {
            viewport: Viewport::new(400, 800),
            user_agent: DESKTOP_UA.to_string(),
        };
        assert!(snapshot.is_mobile_device());
    }

    #[test]
    fn test_wide_desktop_is_not_mobile() {
        let snapshot = EnvSnapshot {
            viewport: Viewport::new(1280, 800),
            user_agent: DESKTOP_UA.to_string(),
        };
        assert!(!snapshot.is_mobile_device());
    }

    #[test]
    fn test_breakpoint_boundary() {
        let at_breakpoint = EnvSnapshot {
            viewport: Viewport::new(MOBILE_BREAKPOINT, 1024),
            user_agent: DESKTOP_UA.to_string(),
        };
        assert!(!at_breakpoint.is_mobile_device());

        let below_breakpoint = EnvSnapshot {
            viewport: Viewport::new(MOBILE_BREAKPOINT - 1, 1024),
            user_agent: DESKTOP_UA.to_string(),
        };
        assert!(below_breakpoint.is_mobile_device());
    }

    #[test]
    fn test_mobile_user_agent_wins_over_wide_viewport() {
        let snapshot = EnvSnapshot {
            viewport: Viewport::new(1280, 800),
            user_agent: PHONE_UA.to_string(),
        };
        assert!(snapshot.is_mobile_device());
    }

    #[test]
    fn test_resize_updates_snapshot_before_dispatch() {
        let hub = EnvironmentHub::new(Viewport::new(1280, 800), DESKTOP_UA);
        let seen_width = Rc::new(Cell::new(0_u16));

        let seen_by_listener = Rc::clone(&seen_width);
        let _sub = hub.subscribe(move |_, snapshot| {
            seen_by_listener.set(snapshot.viewport.width);
        });

        hub.notify_resized(640, 480);
        assert_eq!(seen_width.get(), 640);
        assert_eq!(hub.snapshot().viewport, Viewport::new(640, 480));
    }

    #[test]
    fn test_flag_change_does_not_touch_viewport() {
        let hub = EnvironmentHub::new(Viewport::new(1280, 800), DESKTOP_UA);
        hub.notify_flag_changed("ui.force_mobile_layout");
        assert_eq!(hub.snapshot().viewport, Viewport::new(1280, 800));
    }
}
