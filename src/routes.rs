//! Navigable views and their access tags.
//!
//! DESIGN
//! ======
//! The route table is static metadata: each view is either gated on a
//! session, reserved for visitors without one, or public. [`guard`] turns a
//! path plus session presence into a navigation decision; wiring it into
//! the router lives in `util::auth`.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    RequiresAuth,
    Guest,
    Public,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMeta {
    pub name: &'static str,
    /// Segment pattern; `:name` matches any single segment.
    pub path: &'static str,
    pub access: RouteAccess,
}

pub const ROUTES: &[RouteMeta] = &[
    RouteMeta { name: "dashboard", path: "/", access: RouteAccess::RequiresAuth },
    RouteMeta { name: "prediction", path: "/prediction", access: RouteAccess::RequiresAuth },
    RouteMeta { name: "leagues", path: "/leagues", access: RouteAccess::RequiresAuth },
    RouteMeta { name: "league-detail", path: "/leagues/:slug", access: RouteAccess::RequiresAuth },
    RouteMeta { name: "login", path: LOGIN_PATH, access: RouteAccess::Guest },
];

/// Catch-all for paths no route claims.
pub const NOT_FOUND: RouteMeta = RouteMeta { name: "not-found", path: "*", access: RouteAccess::Public };

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(&'static str),
}

/// Route claiming `path`, ignoring query string, fragment, and trailing slash.
#[must_use]
pub fn find_route(path: &str) -> &'static RouteMeta {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    ROUTES.iter().find(|r| pattern_matches(r.path, path)).unwrap_or(&NOT_FOUND)
}

fn pattern_matches(pattern: &str, path: &str) -> bool {
    let mut want = pattern.split('/').filter(|s| !s.is_empty());
    let mut got = path.split('/').filter(|s| !s.is_empty());
    loop {
        match (want.next(), got.next()) {
            (None, None) => return true,
            (Some(w), Some(_)) if w.starts_with(':') => {}
            (Some(w), Some(g)) if w == g => {}
            _ => return false,
        }
    }
}

/// Decide whether a visitor may enter `path`.
#[must_use]
pub fn guard(path: &str, authenticated: bool) -> GuardDecision {
    match (find_route(path).access, authenticated) {
        (RouteAccess::RequiresAuth, false) => GuardDecision::Redirect(LOGIN_PATH),
        (RouteAccess::Guest, true) => GuardDecision::Redirect(HOME_PATH),
        _ => GuardDecision::Allow,
    }
}
