//! Control surface: servers, settings, clipboard, send, status.

use std::net::IpAddr;
use std::time::{Duration, Instant};

use uuid::Uuid;

use clipway_services::PeerNode;

use crate::*;

#[tokio::test]
async fn servers_reflect_catalog_freshness() {
    let daemon = spawn_daemon(TestOptions::default()).await;

    let (status, body) = get_json(&daemon.control_url("/control/servers")).await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    let fresh = Uuid::new_v4();
    daemon.state.catalog.insert(PeerNode {
        identity: fresh,
        ip: IpAddr::from([192, 168, 1, 7]),
        port: 5050,
        device_name: "bedroom-pc".to_string(),
        last_seen: Instant::now(),
    });
    daemon.state.catalog.insert(PeerNode {
        identity: Uuid::new_v4(),
        ip: IpAddr::from([192, 168, 1, 8]),
        port: 5050,
        device_name: "long-gone".to_string(),
        last_seen: Instant::now() - Duration::from_secs(60),
    });

    let (_, body) = get_json(&daemon.control_url("/control/servers")).await;
    let servers = body["data"].as_array().unwrap();
    assert_eq!(servers.len(), 1);
    assert_eq!(servers[0]["id"], fresh.to_string());
    assert_eq!(servers[0]["deviceName"], "bedroom-pc");
    assert_eq!(servers[0]["ip"], "192.168.1.7");
}

#[tokio::test]
async fn settings_round_trip_through_the_surface() {
    let daemon = spawn_daemon(TestOptions::default()).await;

    let (_, body) = get_json(&daemon.control_url("/control/settings")).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["isDiscoverable"], true);
    let server_ip = body["data"]["serverIp"].as_str().unwrap().to_string();
    let server_port = body["data"]["serverPort"].as_u64().unwrap();

    let (_, body) = post_json(
        &daemon.control_url("/control/settings"),
        serde_json::json!({
            "isDiscoverable": false,
            "serverIp": server_ip,
            "serverPort": server_port,
        }),
    )
    .await;
    assert_eq!(body["success"], true);

    let (_, body) = get_json(&daemon.control_url("/control/settings")).await;
    assert_eq!(body["data"]["isDiscoverable"], false);
    assert!(!daemon.state.settings.is_discoverable().await);
}

#[tokio::test]
async fn copy_to_clipboard_stages_text() {
    let daemon = spawn_daemon(TestOptions::default()).await;

    let (_, body) = post_json(
        &daemon.control_url("/control/clipboard"),
        serde_json::json!({ "text": "from the shell" }),
    )
    .await;
    assert_eq!(body["success"], true);
    assert_eq!(
        daemon.state.clipboard.staged().await.as_deref(),
        Some("from the shell")
    );
}

#[tokio::test]
async fn send_reaches_a_peer_server() {
    // two daemons on loopback; A pushes content into B's /api/text
    let a = spawn_daemon(TestOptions::default()).await;
    let b = spawn_daemon(TestOptions::default()).await;

    let (status, body) = post_json(
        &a.control_url("/control/send"),
        serde_json::json!({
            "ip": "127.0.0.1",
            "port": b.peer_addr.port(),
            "content": "across the room",
        }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);

    // B applied it
    assert_eq!(
        b.state.clipboard.staged().await.as_deref(),
        Some("across the room")
    );

    // A recorded the send
    let (_, body) = get_json(&a.control_url("/control/logs?direction=sent")).await;
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["content"], "across the room");

    // B recorded the receive with A's device name
    let (_, body) = get_json(&b.control_url("/control/logs?direction=received")).await;
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["deviceName"], "test-node");
}

#[tokio::test]
async fn send_to_unreachable_peer_fails_cleanly() {
    let daemon = spawn_daemon(TestOptions::default()).await;

    // an ephemeral port nobody is listening on
    let probe = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let dead_port = probe.local_addr().unwrap().port();
    drop(probe);

    let (status, body) = post_json(
        &daemon.control_url("/control/send"),
        serde_json::json!({
            "ip": "127.0.0.1",
            "port": dead_port,
            "content": "into the void",
        }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], false);

    let (_, body) = get_json(&daemon.control_url("/control/logs?direction=sent")).await;
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["status"], "failed");
}

#[tokio::test]
async fn status_reports_relay_phase() {
    let daemon = spawn_daemon(TestOptions::default()).await;

    let (_, body) = get_json(&daemon.control_url("/control/status")).await;
    assert_eq!(body["data"]["relay"]["phase"], "idle");
    assert_eq!(body["data"]["deviceName"], "test-node");

    let poll_url = daemon.peer_url("/api/poll");
    let poll = tokio::spawn(async move { get_json(&poll_url).await });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let (_, body) = get_json(&daemon.control_url("/control/status")).await;
    assert_eq!(body["data"]["relay"]["phase"], "awaiting");

    post_json(
        &daemon.peer_url("/api/content"),
        serde_json::json!({ "content": "done" }),
    )
    .await;
    poll.await.unwrap();

    let (_, body) = get_json(&daemon.control_url("/control/status")).await;
    assert_eq!(body["data"]["relay"]["phase"], "idle");
    assert_eq!(body["data"]["relay"]["last_outcome"], "fulfilled");
}

#[tokio::test]
async fn logs_count_and_clear() {
    let daemon = spawn_daemon(TestOptions::default()).await;

    for i in 0..3 {
        post_json(
            &daemon.peer_url("/api/text"),
            serde_json::json!({ "content": format!("note {i}"), "device_name": "phone" }),
        )
        .await;
    }

    let (_, body) = get_json(&daemon.control_url("/control/logs/count")).await;
    assert_eq!(body["data"], 3);

    let (_, body) = post_json(
        &daemon.control_url("/control/logs/clear"),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], 3);

    let (_, body) = get_json(&daemon.control_url("/control/logs/count")).await;
    assert_eq!(body["data"], 0);
}
