use super::*;
use crate::net::transport::Method;
use crate::test_support::{FailingStorage, RecordingNavigator};
use crate::util::storage::MemoryStorage;

fn unauthorized() -> Outcome {
    Err(ApiError::from_status(401, r#"{"message":"expired"}"#))
}

// =============================================================
// RequestPipeline ordering
// =============================================================

#[test]
fn request_stages_run_in_insertion_order() {
    let pipeline = RequestPipeline::new()
        .with_request_stage("first", |req: &mut ApiRequest| {
            req.set_header("X-Trace", "first");
            Ok(())
        })
        .with_request_stage("second", |req: &mut ApiRequest| {
            let seen = req.header("X-Trace").unwrap_or_default().to_owned();
            req.set_header("X-Trace", format!("{seen},second"));
            Ok(())
        });
    let mut req = ApiRequest::new(Method::Get, "/api/pilots");
    pipeline.prepare(&mut req).unwrap();
    assert_eq!(req.header("X-Trace"), Some("first,second"));
    assert_eq!(pipeline.request_stage_names().collect::<Vec<_>>(), vec!["first", "second"]);
}

#[test]
fn failing_request_stage_stops_later_stages() {
    let pipeline = RequestPipeline::new()
        .with_request_stage("reject", |_: &mut ApiRequest| Err(ApiError::network("blocked")))
        .with_request_stage("never", |req: &mut ApiRequest| {
            req.set_header("X-Never", "1");
            Ok(())
        });
    let mut req = ApiRequest::new(Method::Get, "/api/pilots");
    assert!(pipeline.prepare(&mut req).is_err());
    assert_eq!(req.header("X-Never"), None);
}

#[test]
fn response_stages_fold_in_order() {
    let pipeline = RequestPipeline::new()
        .with_response_stage("to-500", |_, _| Err(ApiError::from_status(500, "")))
        .with_response_stage("observe", |_, outcome| outcome);
    let req = ApiRequest::new(Method::Get, "/api/pilots");
    let out = pipeline.settle(&req, Ok(ApiResponse { status: 200, body: String::new() }));
    assert_eq!(out.unwrap_err().status(), Some(500));
    assert_eq!(pipeline.response_stage_names().collect::<Vec<_>>(), vec!["to-500", "observe"]);
}

#[test]
fn normalize_classifies_non_success() {
    let ok = normalize(Ok(ApiResponse { status: 200, body: "{}".to_owned() }));
    assert!(ok.is_ok());
    let err = normalize(Ok(ApiResponse { status: 401, body: String::new() })).unwrap_err();
    assert!(err.is_unauthorized());
}

// =============================================================
// attach_credential
// =============================================================

#[test]
fn attaches_bearer_on_protected_path_when_token_stored() {
    let stage = attach_credential(Arc::new(MemoryStorage::with_entry(TOKEN_KEY, "tok")));
    let mut req = ApiRequest::new(Method::Get, "/api/dashboard");
    stage(&mut req).unwrap();
    assert_eq!(req.header(AUTHORIZATION), Some("Bearer tok"));
}

#[test]
fn protected_path_without_token_carries_no_header() {
    let stage = attach_credential(Arc::new(MemoryStorage::new()));
    let mut req = ApiRequest::new(Method::Get, "/api/dashboard");
    req.set_header(AUTHORIZATION, "Bearer stale");
    stage(&mut req).unwrap();
    assert_eq!(req.header(AUTHORIZATION), None);
}

#[test]
fn public_paths_never_carry_credential() {
    let stage = attach_credential(Arc::new(MemoryStorage::with_entry(TOKEN_KEY, "tok")));
    for path in ["/api/auth/login", "/api/auth/register"] {
        let mut req = ApiRequest::new(Method::Post, path);
        req.set_header(AUTHORIZATION, "Bearer tok");
        stage(&mut req).unwrap();
        assert_eq!(req.header(AUTHORIZATION), None, "{path}");
    }
}

#[test]
fn profile_fetch_carries_credential() {
    let stage = attach_credential(Arc::new(MemoryStorage::with_entry(TOKEN_KEY, "tok")));
    let mut req = ApiRequest::new(Method::Get, "/api/auth/me");
    stage(&mut req).unwrap();
    assert_eq!(req.header(AUTHORIZATION), Some("Bearer tok"));
}

#[test]
fn storage_failure_rejects_with_storage_error() {
    let stage = attach_credential(Arc::new(FailingStorage));
    let mut req = ApiRequest::new(Method::Get, "/api/dashboard");
    assert!(matches!(stage(&mut req), Err(ApiError::Storage { message: Some(_) })));
}

// =============================================================
// invalidate_on_unauthorized
// =============================================================

#[test]
fn unauthorized_on_protected_path_clears_and_redirects_once() {
    let store = MemoryStorage::with_entry(TOKEN_KEY, "tok");
    let navigator = RecordingNavigator::new();
    let defaults = DefaultCredential::default();
    defaults.set("tok");
    let stage = invalidate_on_unauthorized(Arc::new(store.clone()), navigator.clone(), defaults.clone());

    let out = stage(&ApiRequest::new(Method::Get, "/api/leagues"), unauthorized());

    assert!(out.unwrap_err().is_unauthorized());
    assert_eq!(store.get(TOKEN_KEY), Ok(None));
    assert_eq!(defaults.get(), None);
    assert_eq!(navigator.redirects(), vec!["/login".to_owned()]);
}

#[test]
fn unauthorized_on_no_redirect_paths_is_left_alone() {
    for path in ["/api/auth/login", "/api/auth/register", "/api/auth/me"] {
        let store = MemoryStorage::with_entry(TOKEN_KEY, "tok");
        let navigator = RecordingNavigator::new();
        let stage = invalidate_on_unauthorized(Arc::new(store.clone()), navigator.clone(), DefaultCredential::default());

        let out = stage(&ApiRequest::new(Method::Get, path), unauthorized());

        assert!(out.is_err(), "{path}");
        assert_eq!(store.get(TOKEN_KEY), Ok(Some("tok".to_owned())), "{path}");
        assert!(navigator.redirects().is_empty(), "{path}");
    }
}

#[test]
fn other_failures_do_not_redirect() {
    let store = MemoryStorage::with_entry(TOKEN_KEY, "tok");
    let navigator = RecordingNavigator::new();
    let stage = invalidate_on_unauthorized(Arc::new(store.clone()), navigator.clone(), DefaultCredential::default());
    let req = ApiRequest::new(Method::Get, "/api/dashboard");

    assert!(stage(&req, Err(ApiError::from_status(403, ""))).is_err());
    assert!(stage(&req, Err(ApiError::from_status(500, ""))).is_err());
    assert!(stage(&req, Err(ApiError::network("down"))).is_err());
    assert!(stage(&req, Ok(ApiResponse { status: 200, body: String::new() })).is_ok());

    assert_eq!(store.get(TOKEN_KEY), Ok(Some("tok".to_owned())));
    assert!(navigator.redirects().is_empty());
}

#[test]
fn redirect_still_happens_when_storage_cannot_be_cleared() {
    let navigator = RecordingNavigator::new();
    let stage = invalidate_on_unauthorized(Arc::new(FailingStorage), navigator.clone(), DefaultCredential::default());
    let out = stage(&ApiRequest::new(Method::Get, "/api/dashboard"), unauthorized());
    assert!(out.unwrap_err().is_unauthorized());
    assert_eq!(navigator.redirects(), vec!["/login".to_owned()]);
}

#[test]
fn forced_login_notifies_invalidation_listeners() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    let navigator = RecordingNavigator::new();
    let defaults = DefaultCredential::default();
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = fired.clone();
    defaults.on_invalidated(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let stage = invalidate_on_unauthorized(Arc::new(MemoryStorage::new()), navigator, defaults);

    let _ = stage(&ApiRequest::new(Method::Get, "/api/auth/me"), unauthorized());
    assert_eq!(fired.load(Ordering::SeqCst), 0);

    let _ = stage(&ApiRequest::new(Method::Get, "/api/leagues"), unauthorized());
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}
