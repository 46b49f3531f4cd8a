//! Login and client construction

use serde_json::json;

use livebox::{Client, ErrorKind};

use super::{connected, MockRouter, CONTEXT_ID, HOST, PASSWORD};

#[tokio::test]
async fn test_login_request() {
    let (client, router) = connected().await;

    assert_eq!(client.endpoint().to_string(), "http://livebox.home/ws");

    let login = router.last_request();
    assert_eq!(login.authorization.as_deref(), Some("X-Sah-Login"));
    assert_eq!(
        login.content_type.as_deref(),
        Some("application/x-sah-ws-4-call+json")
    );
    assert_eq!(
        login.body,
        json!({
            "method": "createContext",
            "service": "sah.Device.Information",
            "parameters": {
                "applicationName": "webui",
                "username": "admin",
                "password": PASSWORD,
            }
        })
    );
}

#[tokio::test]
async fn test_token_sent_on_later_calls() {
    let (client, router) = connected().await;
    router.respond(json!({"status": {}}));

    client.list_port_forwardings().await.unwrap();

    let call = router.last_request();
    assert_eq!(call.authorization, Some(format!("X-Sah {CONTEXT_ID}")));
    assert_eq!(router.request_count(), 2);
}

#[tokio::test]
async fn test_login_api_error_aborts_construction() {
    let router = MockRouter::new();
    router.respond(json!({
        "status": null,
        "errors": [{"error": 13, "description": "Permission denied", "info": "createContext"}]
    }));

    let err = Client::with_transport(HOST, "wrong", router.clone())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(err.operations(), vec!["login"]);
    assert_eq!(router.request_count(), 1);
}

#[tokio::test]
async fn test_login_malformed_response() {
    let router = MockRouter::new();
    router.respond_raw("<html>Service unavailable</html>");

    let err = Client::with_transport(HOST, PASSWORD, router).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);

    let router = MockRouter::new();
    router.respond(json!({"status": 0, "data": {"username": "admin"}}));

    let err = Client::with_transport(HOST, PASSWORD, router).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[tokio::test]
async fn test_login_transport_failure_is_not_retried() {
    let router = MockRouter::new();
    router.fail("connection refused");

    let err = Client::with_transport(HOST, PASSWORD, router.clone())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(router.request_count(), 1);
}

#[tokio::test]
async fn test_invalid_host() {
    let router = MockRouter::new();

    let err = Client::with_transport("http://bad host", PASSWORD, router.clone())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(router.request_count(), 0);
}

#[tokio::test]
async fn test_expired_session_surfaces_api_error() {
    let (client, router) = connected().await;
    router.respond(json!({
        "status": null,
        "errors": [{"error": 196_618, "description": "Permission denied", "info": "Firewall"}]
    }));

    let err = client.list_port_forwardings().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Api);
    // no silent re-login
    assert_eq!(router.request_count(), 2);
}
