//! End-to-end tests for layout mode reactivity across app instances.

use std::rc::Rc;

use printdesk::config::{FlagStore, MemoryFlagStore};
use printdesk::constants::FORCE_MOBILE_KEY;
use printdesk::env::{EnvironmentHub, Viewport};
use printdesk::layout::{LayoutModeSelector, StandardLayoutPolicy};

const DESKTOP_UA: &str = "Mozilla/5.0 (X11; Linux x86_64) Gecko/20100101";

fn mounted_selector(
    hub: &EnvironmentHub,
    store: &Rc<MemoryFlagStore>,
) -> LayoutModeSelector {
    let policy = StandardLayoutPolicy::new(Rc::clone(store) as Rc<dyn FlagStore>);
    LayoutModeSelector::mount(hub, Rc::new(policy))
}

#[test]
fn test_flag_toggle_elsewhere_updates_mounted_selector() {
    let store = Rc::new(MemoryFlagStore::new(false));
    let hub = EnvironmentHub::new(Viewport::new(1280, 800), DESKTOP_UA);
    let selector = mounted_selector(&hub, &store);
    assert!(!selector.is_mobile());

    // The "other tab": write the shared store, then dispatch the
    // change notification. No remount, no reload.
    store.set_forced_mobile(true).unwrap();
    hub.notify_flag_changed(FORCE_MOBILE_KEY);

    assert!(selector.is_mobile());
    assert!(!selector.is_actual_mobile());
    assert!(selector.should_use_mobile_layout());
}

#[test]
fn test_missed_notification_stays_stale_until_resize() {
    let store = Rc::new(MemoryFlagStore::new(false));
    let hub = EnvironmentHub::new(Viewport::new(1280, 800), DESKTOP_UA);
    let selector = mounted_selector(&hub, &store);

    // Flag written but the notification never arrives: no polling
    // fallback, so the selector keeps its stale value.
    store.set_forced_mobile(true).unwrap();
    assert!(!selector.is_mobile());

    // The next resize recomputes and picks the flag up.
    hub.notify_resized(1280, 900);
    assert!(selector.is_mobile());
}

#[test]
fn test_resize_crossing_breakpoint_flips_mode() {
    let store = Rc::new(MemoryFlagStore::new(false));
    let hub = EnvironmentHub::new(Viewport::new(1280, 800), DESKTOP_UA);
    let selector = mounted_selector(&hub, &store);
    assert!(!selector.is_mobile());

    hub.notify_resized(400, 800);
    assert!(selector.is_mobile());
    assert!(selector.is_actual_mobile());

    hub.notify_resized(1024, 800);
    assert!(!selector.is_mobile());
}

#[test]
fn test_unmounted_selector_leaves_no_listener() {
    let store = Rc::new(MemoryFlagStore::new(false));
    let hub = EnvironmentHub::new(Viewport::new(1280, 800), DESKTOP_UA);

    let selector = mounted_selector(&hub, &store);
    drop(selector);

    // Both event kinds must be inert after unmount.
    store.set_forced_mobile(true).unwrap();
    hub.notify_flag_changed(FORCE_MOBILE_KEY);
    hub.notify_resized(400, 800);

    // A freshly mounted selector still works, proving the hub itself is fine.
    let fresh = mounted_selector(&hub, &store);
    assert!(fresh.is_mobile());
}

#[test]
fn test_two_selectors_share_one_hub() {
    let store = Rc::new(MemoryFlagStore::new(false));
    let hub = EnvironmentHub::new(Viewport::new(1280, 800), DESKTOP_UA);

    let first = mounted_selector(&hub, &store);
    let second = mounted_selector(&hub, &store);

    hub.notify_resized(500, 800);
    assert!(first.is_mobile());
    assert!(second.is_mobile());

    drop(first);
    hub.notify_resized(1280, 800);
    assert!(!second.is_mobile());
}
