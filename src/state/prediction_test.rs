use super::*;
use crate::net::transport::AUTHORIZATION;
use crate::test_support::Harness;
use crate::util::storage::{CredentialStore, TOKEN_KEY};

#[tokio::test]
async fn submit_posts_wrapped_positions_with_credential() {
    let h = Harness::new();
    h.store.set(TOKEN_KEY, "tok").unwrap();
    let store = PredictionStore::new(h.client.clone());
    h.transport.push_json(201, serde_json::json!({ "id": 1 }));

    assert!(store.submit_prediction(&BTreeMap::from([(1, 4), (2, 81)])).await);

    assert_eq!(store.state().get_untracked(), PredictionState { loading: false, error: None, success: true });
    let sent = h.transport.last_request();
    assert_eq!(sent.path, "/api/predictions");
    assert_eq!(sent.header(AUTHORIZATION), Some("Bearer tok"));
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(sent.body.as_deref().unwrap()).unwrap(),
        serde_json::json!({ "prediction": { "1": 4, "2": 81 } })
    );
}

#[tokio::test]
async fn submit_failure_clears_previous_success() {
    let h = Harness::new();
    let store = PredictionStore::new(h.client.clone());
    h.transport.push_json(200, serde_json::json!({}));
    h.transport.push_network_error();

    assert!(store.submit_prediction(&BTreeMap::from([(1, 1)])).await);
    assert!(!store.submit_prediction(&BTreeMap::from([(1, 1)])).await);

    let state = store.state().get_untracked();
    assert!(!state.success);
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some(PREDICTION_FAILED));
}

#[tokio::test]
async fn unauthorized_submit_forces_login() {
    let h = Harness::new();
    h.store.set(TOKEN_KEY, "expired").unwrap();
    let store = PredictionStore::new(h.client.clone());
    h.transport.push_json(401, serde_json::json!({ "message": "jwt expired" }));

    assert!(!store.submit_prediction(&BTreeMap::new()).await);

    assert_eq!(h.navigator.redirects(), ["/login"]);
    assert_eq!(h.store.get(TOKEN_KEY), Ok(None));
    assert_eq!(store.state().get_untracked().error.as_deref(), Some("jwt expired"));
}
