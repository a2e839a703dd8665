//! Route guard wiring for the session.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every routed view applies the same access rule, so the guard is installed
//! once at the router root instead of per page.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::routes::{GuardDecision, guard};
use crate::state::session::{SessionPhase, SessionState};

/// Where the guard sends a visitor at `path`, if anywhere. No decision is
/// made while a stored credential is still being validated.
#[must_use]
pub fn guard_redirect(state: &SessionState, path: &str) -> Option<&'static str> {
    if state.phase() == SessionPhase::Restoring {
        return None;
    }
    match guard(path, state.is_authenticated()) {
        GuardDecision::Allow => None,
        GuardDecision::Redirect(target) => Some(target),
    }
}

/// One guard evaluation: navigate away from `path` if the session may not
/// stay there. Returns whether a navigation was issued.
pub fn apply_route_guard<F>(state: &SessionState, path: &str, navigate: &F) -> bool
where
    F: Fn(&str, NavigateOptions),
{
    match guard_redirect(state, path) {
        Some(target) => {
            navigate(target, NavigateOptions::default());
            true
        }
        None => false,
    }
}

/// Re-run the route guard whenever the session or current path changes.
pub fn install_route_guard<P, F>(session: RwSignal<SessionState>, current_path: P, navigate: F)
where
    P: Fn() -> String + 'static,
    F: Fn(&str, NavigateOptions) + 'static,
{
    Effect::new(move || {
        let path = current_path();
        session.with(|state| apply_route_guard(state, &path, &navigate));
    });
}
