//! Long-poll rendezvous scenarios over real HTTP.

use std::time::{Duration, Instant};

use crate::*;

#[tokio::test]
async fn poll_resolves_when_content_is_posted() {
    let daemon = spawn_daemon(TestOptions::default()).await;

    let poll_url = daemon.peer_url("/api/poll");
    let poll = tokio::spawn(async move { get_json(&poll_url).await });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let (status, body) = post_json(
        &daemon.peer_url("/api/content"),
        serde_json::json!({ "content": "hello" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);

    let (status, body) = poll.await.unwrap();
    assert_eq!(status, 200);
    assert_eq!(body["content"], "hello");
    assert!(body.get("urlScheme").is_none());

    // no fresh poll — the slot is gone
    let (status, body) = post_json(
        &daemon.peer_url("/api/content"),
        serde_json::json!({ "content": "again" }),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "No current session found");
}

#[tokio::test]
async fn poll_times_out_with_failure_body() {
    let daemon = spawn_daemon(TestOptions {
        poll_deadline: Duration::from_millis(300),
        ..Default::default()
    })
    .await;

    let started = Instant::now();
    let (status, body) = get_json(&daemon.peer_url("/api/poll")).await;

    assert!(started.elapsed() >= Duration::from_millis(300));
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn second_poll_is_rejected_while_first_is_held() {
    let daemon = spawn_daemon(TestOptions::default()).await;

    let poll_url = daemon.peer_url("/api/poll");
    let first = tokio::spawn(async move { get_json(&poll_url).await });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let (status, body) = get_json(&daemon.peer_url("/api/poll")).await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);

    // the original connection is still served
    let (status, _) = post_json(
        &daemon.peer_url("/api/content"),
        serde_json::json!({ "content": "for the first" }),
    )
    .await;
    assert_eq!(status, 200);

    let (status, body) = first.await.unwrap();
    assert_eq!(status, 200);
    assert_eq!(body["content"], "for the first");
}

#[tokio::test]
async fn local_response_carries_deep_link_scheme() {
    let daemon = spawn_daemon(TestOptions::default()).await;

    let poll_url = daemon.peer_url("/api/poll");
    let poll = tokio::spawn(async move { get_json(&poll_url).await });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let (status, body) = post_json(
        &daemon.control_url("/control/respond-content"),
        serde_json::json!({ "content": "https://www.reddit.com/r/test" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);

    let (status, body) = poll.await.unwrap();
    assert_eq!(status, 200);
    assert_eq!(body["content"], "https://www.reddit.com/r/test");
    assert_eq!(body["urlScheme"], "reddit://www.reddit.com/r/test");
}

#[tokio::test]
async fn control_respond_without_session_reports_failure() {
    let daemon = spawn_daemon(TestOptions::default()).await;

    let (status, body) = post_json(
        &daemon.control_url("/control/respond-content"),
        serde_json::json!({ "content": "nobody is waiting" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "No current session found");
}

#[tokio::test]
async fn liveness_endpoint_answers() {
    let daemon = spawn_daemon(TestOptions::default()).await;

    let (status, body) = get_json(&daemon.peer_url("/api")).await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
}
