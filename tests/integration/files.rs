//! File upload, file relay, and the shareables endpoint.

use std::time::Duration;

use crate::*;

#[tokio::test]
async fn uploaded_file_is_saved_and_logged() {
    let daemon = spawn_daemon(TestOptions::default()).await;

    let part = reqwest::multipart::Part::bytes(b"picture bytes".to_vec())
        .file_name("holiday.png")
        .mime_str("image/png")
        .unwrap();
    let form = reqwest::multipart::Form::new()
        .text("device_name", "phone")
        .part("file", part);

    let resp = reqwest::Client::new()
        .post(daemon.peer_url("/api/image"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);

    let saved = daemon.storage_root.join("uploads").join("holiday.png");
    assert_eq!(std::fs::read(&saved).unwrap(), b"picture bytes");

    let (_, body) = get_json(&daemon.control_url("/control/logs?contentType=file")).await;
    let entries = body["data"].as_array().expect("log entries");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["fileName"], "holiday.png");
    assert_eq!(entries[0]["status"], "success");
}

#[tokio::test]
async fn upload_without_file_field_is_rejected() {
    let daemon = spawn_daemon(TestOptions::default()).await;

    let form = reqwest::multipart::Form::new().text("device_name", "phone");
    let resp = reqwest::Client::new()
        .post(daemon.peer_url("/api/image"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn relayed_file_is_fetchable_from_shareables() {
    let daemon = spawn_daemon(TestOptions::default()).await;

    let poll_url = daemon.peer_url("/api/poll");
    let poll = tokio::spawn(async move { get_json(&poll_url).await });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let part = reqwest::multipart::Part::bytes(b"document body".to_vec())
        .file_name("notes.txt")
        .mime_str("text/plain")
        .unwrap();
    let form = reqwest::multipart::Form::new().part("file", part);

    let resp = reqwest::Client::new()
        .post(daemon.control_url("/control/respond-file"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);

    let (status, body) = poll.await.unwrap();
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["fileName"], "notes.txt");
    assert_eq!(body["fileType"], "text/plain");
    assert_eq!(body["fileSize"], 13);
    assert!(body["fileUrl"]
        .as_str()
        .unwrap()
        .ends_with("/api/files/notes.txt"));

    // fetch through the shareables route on the peer surface
    let resp = reqwest::get(daemon.peer_url("/api/files/notes.txt"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()["content-type"].to_str().unwrap(),
        "text/plain"
    );
    assert_eq!(resp.bytes().await.unwrap().as_ref(), b"document body");
}

#[tokio::test]
async fn missing_shareable_is_a_404() {
    let daemon = spawn_daemon(TestOptions::default()).await;

    let (status, body) = get_json(&daemon.peer_url("/api/files/not-there.bin")).await;
    assert_eq!(status, 404);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "File not found");
}

#[tokio::test]
async fn respond_file_without_session_reports_failure() {
    let daemon = spawn_daemon(TestOptions::default()).await;

    let part = reqwest::multipart::Part::bytes(b"x".to_vec())
        .file_name("orphan.bin")
        .mime_str("application/octet-stream")
        .unwrap();
    let form = reqwest::multipart::Form::new().part("file", part);

    let resp = reqwest::Client::new()
        .post(daemon.control_url("/control/respond-file"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "No current session found");
}
