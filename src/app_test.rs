use super::*;
use crate::config::BuildProfile;
use crate::net::pipeline::{ATTACH_CREDENTIAL, INVALIDATE_ON_UNAUTHORIZED};
use crate::test_support::{MockTransport, RecordingNavigator, user_json};
use crate::util::storage::{CredentialStore, MemoryStorage, TOKEN_KEY};

fn config() -> ClientConfig {
    ClientConfig { profile: BuildProfile::Production, base_url: "https://paddock.example".to_owned() }
}

#[test]
fn context_uses_configured_base_and_default_stages() {
    let ctx = AppContext::new(&config(), MockTransport::new(), Arc::new(MemoryStorage::new()), RecordingNavigator::new());
    assert_eq!(ctx.client.base_url(), "https://paddock.example");
    assert_eq!(ctx.client.pipeline().request_stage_names().collect::<Vec<_>>(), [ATTACH_CREDENTIAL]);
    assert_eq!(ctx.client.pipeline().response_stage_names().collect::<Vec<_>>(), [INVALIDATE_ON_UNAUTHORIZED]);
}

#[tokio::test]
async fn stores_share_the_session_credential() {
    let transport = MockTransport::new();
    let store = MemoryStorage::new();
    let ctx = AppContext::new(&config(), transport.clone(), Arc::new(store.clone()), RecordingNavigator::new());
    transport.push_json(200, serde_json::json!({ "token": "tok", "user": user_json(1, "max") }));
    transport.push_json(200, serde_json::json!([]));

    assert!(ctx.session.login("max@example.com", "pw").await);
    ctx.pilots.fetch_pilots().await;

    assert_eq!(store.get(TOKEN_KEY), Ok(Some("tok".to_owned())));
    assert_eq!(
        transport.last_request().header(crate::net::transport::AUTHORIZATION),
        Some("Bearer tok")
    );
}

#[test]
fn offline_context_builds_without_a_browser() {
    let ctx = AppContext::for_platform(&ClientConfig::development());
    assert!(!ctx.session.is_authenticated());
    assert_eq!(ctx.client.base_url(), crate::config::DEFAULT_DEV_API_URL);
}
