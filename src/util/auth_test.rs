use super::*;
use crate::net::types::User;

fn signed_in() -> SessionState {
    SessionState {
        token: Some("tok".to_owned()),
        user: Some(User { id: 1, username: "max".to_owned(), email: "max@example.com".to_owned() }),
        ..SessionState::default()
    }
}

#[test]
fn anonymous_visitor_on_gated_route_goes_to_login() {
    assert_eq!(guard_redirect(&SessionState::default(), "/leagues"), Some("/login"));
}

#[test]
fn signed_in_visitor_on_login_goes_home() {
    assert_eq!(guard_redirect(&signed_in(), "/login"), Some("/"));
}

#[test]
fn no_redirect_while_restoring() {
    let state = SessionState { token: Some("tok".to_owned()), loading: true, ..SessionState::default() };
    assert_eq!(guard_redirect(&state, "/login"), None);
    assert_eq!(guard_redirect(&state, "/"), None);
}

#[test]
fn unverified_session_still_counts_as_signed_in() {
    let state = SessionState { token: Some("tok".to_owned()), ..SessionState::default() };
    assert_eq!(guard_redirect(&state, "/prediction"), None);
    assert_eq!(guard_redirect(&state, "/login"), Some("/"));
}

#[test]
fn guard_step_navigates_only_when_redirect_needed() {
    let visited = std::cell::RefCell::new(Vec::new());
    let navigate = |to: &str, _: NavigateOptions| visited.borrow_mut().push(to.to_owned());

    assert!(apply_route_guard(&SessionState::default(), "/leagues/race", &navigate));
    assert!(!apply_route_guard(&SessionState::default(), "/login", &navigate));
    assert!(apply_route_guard(&signed_in(), "/login", &navigate));
    assert!(!apply_route_guard(&signed_in(), "/leagues/sprint", &navigate));

    assert_eq!(*visited.borrow(), ["/login", "/"]);
}
