use std::sync::Arc;

use super::*;
use crate::api::{Attestation, PortalApi};
use crate::state::test_helpers::{MockApi, NOW, harness, make_token};
use crate::store::TokenStore;

fn creds() -> Credentials {
    Credentials::new("student@example.com", "secret")
}

#[tokio::test]
async fn successful_login_stores_token_and_enters_dashboard() {
    let token = make_token(NOW + 3600);
    let h = harness(None, MockApi::new().with_login(Ok(LoginReply::Issued { token: token.clone() })));

    submit(&h.state, &creds()).await.unwrap();

    assert_eq!(h.store.get().unwrap(), Some(token));
    assert_eq!(h.history.current().as_deref(), Some("/dashboard"));
    assert!(!is_submitting(&h.state));
}

#[tokio::test]
async fn successful_login_replaces_previous_token() {
    let h = harness(Some("old.token.value"), MockApi::new().with_login(Ok(LoginReply::Issued { token: "new".into() })));
    submit(&h.state, &creds()).await.unwrap();
    assert_eq!(h.store.get().unwrap().as_deref(), Some("new"));
}

#[tokio::test]
async fn refused_login_surfaces_server_message_and_keeps_store() {
    let api = MockApi::new().with_login(Ok(LoginReply::Refused {
        status: 401,
        message: Some("Invalid email or password".into()),
    }));
    let h = harness(Some("previous"), api);

    let err = submit(&h.state, &creds()).await.unwrap_err();

    assert_eq!(err.to_string(), "Invalid email or password");
    assert_eq!(h.store.get().unwrap().as_deref(), Some("previous"));
    assert!(h.history.entries().is_empty());
}

#[tokio::test]
async fn refused_login_without_message_uses_fallback() {
    let api = MockApi::new().with_login(Ok(LoginReply::Refused { status: 500, message: None }));
    let h = harness(None, api);
    let err = submit(&h.state, &creds()).await.unwrap_err();
    assert_eq!(err.to_string(), LOGIN_FAILED_MESSAGE);
    assert_eq!(h.store.get().unwrap(), None);
}

#[tokio::test]
async fn success_without_token_uses_fallback() {
    let api = MockApi::new().with_login(Err(ApiError::MissingToken));
    let h = harness(None, api);
    let err = submit(&h.state, &creds()).await.unwrap_err();
    assert!(matches!(err, LoginError::Rejected { .. }));
    assert_eq!(err.to_string(), LOGIN_FAILED_MESSAGE);
    assert_eq!(h.store.get().unwrap(), None);
}

#[tokio::test]
async fn unreadable_response_is_generic_message() {
    let api = MockApi::new().with_login(Err(ApiError::UnexpectedBody("expected value at line 1".into())));
    let h = harness(Some("previous"), api);
    let err = submit(&h.state, &creds()).await.unwrap_err();
    assert!(matches!(err, LoginError::Unavailable(_)));
    assert_eq!(err.to_string(), UNAVAILABLE_MESSAGE);
    assert_eq!(h.store.get().unwrap().as_deref(), Some("previous"));
}

#[tokio::test]
async fn transport_failure_is_generic_message() {
    let api = MockApi::new().with_login(Err(ApiError::Transport("connection reset".into())));
    let h = harness(None, api);
    let err = submit(&h.state, &creds()).await.unwrap_err();
    assert_eq!(err.to_string(), UNAVAILABLE_MESSAGE);
    assert_eq!(h.store.get().unwrap(), None);
    assert!(h.history.entries().is_empty());
}

#[tokio::test]
async fn empty_fields_fail_without_network() {
    let h = harness(None, MockApi::new());
    for credentials in [Credentials::new("", "secret"), Credentials::new("  ", "secret"), Credentials::new("a@b.c", "")] {
        let err = submit(&h.state, &credentials).await.unwrap_err();
        assert!(matches!(err, LoginError::Incomplete));
    }
    assert_eq!(h.api.login_call_count(), 0);
}

#[tokio::test]
async fn submitted_credentials_reach_the_api() {
    let h = harness(None, MockApi::new().with_login(Ok(LoginReply::Issued { token: "t".into() })));
    submit(&h.state, &creds()).await.unwrap();
    let calls = h.api.login_calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].email, "student@example.com");
    assert_eq!(calls[0].password, "secret");
}

/// Observes `is_submitting` from inside the request.
struct ObservingApi {
    state: std::sync::Mutex<Option<AppState>>,
    seen_submitting: std::sync::atomic::AtomicBool,
}

#[async_trait::async_trait]
impl PortalApi for ObservingApi {
    async fn login(&self, _credentials: &Credentials) -> Result<LoginReply, ApiError> {
        let state = self.state.lock().unwrap().clone().unwrap();
        self.seen_submitting.store(is_submitting(&state), Ordering::SeqCst);
        Ok(LoginReply::Refused { status: 401, message: None })
    }

    async fn check_session(&self, _token: &str) -> Result<Attestation, ApiError> {
        unreachable!("session check not used")
    }
}

#[tokio::test]
async fn submitting_flag_is_set_only_while_request_is_outstanding() {
    let h = harness(None, MockApi::new());
    let api = Arc::new(ObservingApi {
        state: std::sync::Mutex::new(None),
        seen_submitting: std::sync::atomic::AtomicBool::new(false),
    });
    let state = AppState { api: api.clone(), ..h.state.clone() };
    *api.state.lock().unwrap() = Some(state.clone());

    assert!(!is_submitting(&state));
    let _ = submit(&state, &creds()).await;
    assert!(api.seen_submitting.load(Ordering::SeqCst));
    assert!(!is_submitting(&state));

    // Break the api <-> state cycle.
    api.state.lock().unwrap().take();
}
