//! Session cookie handling through CookieJar and CookieNamePatcher

use std::sync::Arc;

use serde_json::json;

use livebox::{Client, CookieJar, CookieNamePatcher};

use super::{MockRouter, CONTEXT_ID, HOST, PASSWORD};

#[tokio::test]
async fn test_session_cookie_survives_the_store() {
    let router = MockRouter::new();
    router.respond_with(
        200,
        &[("set-cookie", "8d4c2b/sessid=Zq9Lx3; Path=/; HttpOnly")],
        json!({"status": 0, "data": {"contextID": CONTEXT_ID}}),
    );
    router.respond(json!({"status": {}}));

    let transport = CookieJar::new(CookieNamePatcher::new(router.clone()));
    let client: Client<CookieJar<CookieNamePatcher<Arc<MockRouter>>>> =
        Client::with_transport(HOST, PASSWORD, transport).await.unwrap();

    // stored under the patched name
    assert_eq!(
        client.transport().cookies(),
        vec![("8d4c2b-sessid".to_string(), "Zq9Lx3".to_string())]
    );

    client.list_port_forwardings().await.unwrap();

    let requests = router.requests();
    assert_eq!(requests[0].cookie, None);
    // and sent back under the router's name
    assert_eq!(requests[1].cookie.as_deref(), Some("8d4c2b/sessid=Zq9Lx3"));
}

#[tokio::test]
async fn test_other_cookies_untouched() {
    let router = MockRouter::new();
    router.respond_with(
        200,
        &[
            ("set-cookie", "lang=fr; Path=/"),
            ("set-cookie", "8d4c2b/sessid=Zq9Lx3; Path=/"),
        ],
        json!({"status": 0, "data": {"contextID": CONTEXT_ID}}),
    );
    router.respond(json!({"status": {}}));

    let transport = CookieJar::new(CookieNamePatcher::new(router.clone()));
    let client = Client::with_transport(HOST, PASSWORD, transport).await.unwrap();
    client.list_port_forwardings().await.unwrap();

    let cookie = router.last_request().cookie.unwrap();
    let mut pairs: Vec<&str> = cookie.split("; ").collect();
    pairs.sort_unstable();
    assert_eq!(pairs, vec!["8d4c2b/sessid=Zq9Lx3", "lang=fr"]);
}
