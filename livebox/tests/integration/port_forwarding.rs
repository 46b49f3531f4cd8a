//! Port forwarding operations against a scripted router

use serde_json::json;

use livebox::{ErrorKind, LiveboxError, PortForwarding, PortForwardingConfig, Protocol};

use super::connected;

fn wireguard() -> PortForwardingConfig {
    PortForwardingConfig {
        name: "wireguard".into(),
        protocol: Protocol::Udp,
        external_port: 51820,
        internal_port: 51820,
        port_range: 0,
        destination: "192.168.1.200".into(),
        enabled: true,
    }
}

fn denied() -> serde_json::Value {
    json!({
        "status": null,
        "errors": [{"error": 196_618, "description": "Permission denied", "info": "Firewall"}]
    })
}

#[tokio::test]
async fn test_upsert_sends_rule() {
    let (client, router) = connected().await;
    router.respond(json!({"status": "webui_wireguard"}));

    let rule = client.upsert_port_forwarding(wireguard()).await.unwrap();

    assert_eq!(rule, PortForwarding::from(wireguard()));
    assert_eq!(
        router.last_request().body,
        json!({
            "method": "setPortForwarding",
            "service": "Firewall",
            "parameters": {
                "id": "webui_wireguard",
                "description": "wireguard",
                "protocol": "17",
                "internalPort": 51820,
                "externalPort": "51820",
                "destinationIPAddress": "192.168.1.200",
                "sourcePrefix": "",
                "persistent": true,
                "enable": true,
                "sourceInterface": "data",
                "origin": "webui",
            }
        })
    );
}

#[tokio::test]
async fn test_upsert_port_range() {
    let (client, router) = connected().await;
    router.respond(json!({"status": "webui_games"}));

    let config = PortForwardingConfig {
        name: "games".into(),
        protocol: Protocol::TcpUdp,
        external_port: 27015,
        internal_port: 27015,
        port_range: 15,
        destination: "192.168.1.20".into(),
        enabled: false,
    };
    client.upsert_port_forwarding(config).await.unwrap();

    let params = &router.last_request().body["parameters"];
    assert_eq!(params["externalPort"], "27015-27030");
    assert_eq!(params["protocol"], "6,17");
    assert_eq!(params["enable"], false);
}

#[tokio::test]
async fn test_invalid_config_sends_nothing() {
    let (client, router) = connected().await;

    let cases = [
        PortForwardingConfig { name: String::new(), ..wireguard() },
        PortForwardingConfig { external_port: 0, ..wireguard() },
        PortForwardingConfig { internal_port: 65536, ..wireguard() },
        PortForwardingConfig { port_range: 65536, ..wireguard() },
        PortForwardingConfig { protocol: Protocol::Unknown, ..wireguard() },
        PortForwardingConfig { destination: String::new(), ..wireguard() },
    ];

    for config in cases {
        let err = client.upsert_port_forwarding(config).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation, "{err}");
        assert_eq!(err.operations(), vec!["validate configuration"]);
    }

    // only the login went out
    assert_eq!(router.request_count(), 1);
}

#[tokio::test]
async fn test_list() {
    let (client, router) = connected().await;
    router.respond(json!({
        "status": {
            "webui_ssh": {
                "Id": "webui_ssh",
                "Origin": "webui",
                "Description": "ssh",
                "Status": "Enabled",
                "SourceInterface": "data",
                "Protocol": "6",
                "ExternalPort": "2222",
                "InternalPort": "22",
                "SourcePrefix": "",
                "DestinationIPAddress": "192.168.1.10",
                "DestinationMACAddress": "",
                "LeaseDuration": 0,
                "HairpinNAT": true,
                "SymmetricSNAT": false,
                "UPnPV1Compat": false,
                "Enable": true
            },
            "webui_games": {
                "Protocol": "6,17",
                "ExternalPort": "27015-27030",
                "InternalPort": "27015",
                "DestinationIPAddress": "192.168.1.20",
                "Enable": false
            }
        }
    }));

    let mut rules = client.list_port_forwardings().await.unwrap();
    rules.sort_by(|a, b| a.name.cmp(&b.name));

    assert_eq!(
        rules,
        vec![
            PortForwarding {
                name: "games".into(),
                protocol: Protocol::TcpUdp,
                external_port: 27015,
                internal_port: 27015,
                port_range: 15,
                destination: "192.168.1.20".into(),
                enabled: false,
            },
            PortForwarding {
                name: "ssh".into(),
                protocol: Protocol::Tcp,
                external_port: 2222,
                internal_port: 22,
                port_range: 0,
                destination: "192.168.1.10".into(),
                enabled: true,
            },
        ]
    );

    assert_eq!(
        router.last_request().body,
        json!({
            "method": "getPortForwarding",
            "service": "Firewall",
            "parameters": {"origin": "webui"}
        })
    );
}

#[tokio::test]
async fn test_list_empty() {
    let (client, router) = connected().await;
    router.respond(json!({"status": {}, "errors": []}));

    assert!(client.list_port_forwardings().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_null_status() {
    let (client, router) = connected().await;
    router.respond(json!({"status": null}));

    assert!(client.list_port_forwardings().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_null_fields() {
    let (client, router) = connected().await;
    router.respond(json!({
        "status": {
            "webui_ssh": {
                "Id": "webui_ssh",
                "Origin": null,
                "Status": null,
                "Protocol": "6",
                "ExternalPort": "2222",
                "InternalPort": "22",
                "DestinationIPAddress": "192.168.1.10",
                "DestinationMACAddress": null,
                "LeaseDuration": null,
                "UPnPV1Compat": null,
                "Enable": true
            }
        }
    }));

    let rules = client.list_port_forwardings().await.unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].name, "ssh");
    assert_eq!(rules[0].external_port, 2222);
}

#[tokio::test]
async fn test_list_malformed_internal_port() {
    let (client, router) = connected().await;
    router.respond(json!({
        "status": {
            "webui_bad": {"Protocol": "6", "ExternalPort": "80", "InternalPort": "http"}
        }
    }));

    let err = client.list_port_forwardings().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
    assert_eq!(err.operations(), vec!["parse internal port"]);
}

#[tokio::test]
async fn test_list_unexpected_status() {
    let (client, router) = connected().await;
    router.respond(json!({"status": [1, 2, 3]}));

    let err = client.list_port_forwardings().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
    assert_eq!(err.operations(), vec!["unmarshal data"]);
}

#[tokio::test]
async fn test_get() {
    let (client, router) = connected().await;
    router.respond(json!({
        "status": {
            "webui_ssh": {
                "Protocol": "6",
                "ExternalPort": "2222",
                "InternalPort": "22",
                "DestinationIPAddress": "192.168.1.10",
                "Enable": true
            }
        }
    }));

    let rule = client.get_port_forwarding("ssh").await.unwrap();
    assert_eq!(rule.external_port, 2222);
    assert_eq!(rule.internal_port, 22);
}

#[tokio::test]
async fn test_get_missing() {
    let (client, router) = connected().await;
    router.respond(json!({"status": {}}));

    let err = client.get_port_forwarding("missing").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(matches!(err, LiveboxError::NotFound { ref name } if name == "missing"));
}

#[tokio::test]
async fn test_get_missing_with_null_status() {
    let (client, router) = connected().await;
    router.respond(json!({"status": null}));

    let err = client.get_port_forwarding("missing").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete() {
    let (client, router) = connected().await;
    router.respond(json!({"status": true}));

    client.delete_port_forwarding("wireguard").await.unwrap();

    assert_eq!(
        router.last_request().body,
        json!({
            "method": "deletePortForwarding",
            "service": "Firewall",
            "parameters": {"id": "webui_wireguard", "origin": "webui"}
        })
    );
}

#[tokio::test]
async fn test_api_errors_fail_every_operation() {
    let (client, router) = connected().await;

    router.respond(denied());
    let err = client.list_port_forwardings().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(err.api_errors(), Some(&denied()["errors"]));

    router.respond(denied());
    let err = client.get_port_forwarding("ssh").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(err.operations(), vec!["list port forwardings", "do request"]);

    // the envelope wins over the HTTP status
    router.respond_with(200, &[], denied());
    let err = client.upsert_port_forwarding(wireguard()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Api);

    router.respond_with(500, &[], denied());
    let err = client.delete_port_forwarding("wireguard").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(err.operations(), vec!["do request"]);
}

#[tokio::test]
async fn test_transport_failure() {
    let (client, router) = connected().await;
    router.fail("connection reset");

    let err = client.delete_port_forwarding("wireguard").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}
