//! Discovery loops over loopback UDP.

use std::net::IpAddr;
use std::time::Duration;

use uuid::Uuid;

use clipway_core::announce::Announcement;
use clipway_services::{PeerCatalog, SettingsStore};
use clipwayd::discovery::{broadcast, listener, Discovery};

/// Wait for a condition with a bounded number of retries.
async fn eventually<F: Fn() -> bool>(what: &str, check: F) {
    for _ in 0..50 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("timed out waiting for: {what}");
}

#[tokio::test]
async fn listener_catalogs_peer_announcements() {
    let catalog = PeerCatalog::new(Duration::from_secs(10));
    let local_identity = Uuid::new_v4();

    let socket = listener::bind(0).expect("bind listener");
    let port = socket.local_addr().unwrap().port();
    let task = tokio::spawn(listener::listener_loop(
        catalog.clone(),
        local_identity,
        socket,
    ));

    let peer_identity = Uuid::new_v4();
    let announcement = Announcement::new("kitchen-laptop".to_string(), 5050, peer_identity);
    let sender = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
    sender
        .send_to(&announcement.encode(), ("127.0.0.1", port))
        .unwrap();

    eventually("peer to appear in catalog", || !catalog.active().is_empty()).await;

    let active = catalog.active();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].identity, peer_identity);
    assert_eq!(active[0].device_name, "kitchen-laptop");
    assert_eq!(active[0].port, 5050);
    assert_eq!(active[0].ip, IpAddr::from([127, 0, 0, 1]));

    task.abort();
}

#[tokio::test]
async fn own_announcements_are_filtered_out() {
    let catalog = PeerCatalog::new(Duration::from_secs(10));
    let local_identity = Uuid::new_v4();

    let socket = listener::bind(0).expect("bind listener");
    let port = socket.local_addr().unwrap().port();
    let task = tokio::spawn(listener::listener_loop(
        catalog.clone(),
        local_identity,
        socket,
    ));

    let sender = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();

    // own identity — must be dropped
    let own = Announcement::new("me".to_string(), 5050, local_identity);
    sender.send_to(&own.encode(), ("127.0.0.1", port)).unwrap();

    // garbage and foreign-service datagrams — must be dropped
    sender.send_to(b"not json at all", ("127.0.0.1", port)).unwrap();
    sender
        .send_to(
            br#"{"service":"other-app","type":"announce","deviceName":"x","port":1,"identity":"7b1c8a1e-46a4-45a9-9f09-222222222222","timestamp":0}"#,
            ("127.0.0.1", port),
        )
        .unwrap();

    // a real peer afterwards, proving the loop survived the junk
    let peer = Announcement::new("peer".to_string(), 6000, Uuid::new_v4());
    sender.send_to(&peer.encode(), ("127.0.0.1", port)).unwrap();

    eventually("real peer to appear", || catalog.active().len() == 1).await;
    assert_eq!(catalog.active()[0].device_name, "peer");
    assert_eq!(catalog.tracked(), 1);

    task.abort();
}

#[tokio::test]
async fn broadcast_is_gated_on_discoverability() {
    let receiver = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let dest = receiver.local_addr().unwrap();

    let settings = SettingsStore::new(5050, false);
    let identity = Uuid::new_v4();
    let task = tokio::spawn(broadcast::broadcast_loop(
        settings.clone(),
        identity,
        "quiet-node".to_string(),
        dest,
        Duration::from_millis(50),
    ));

    // not discoverable: nothing may arrive
    let mut buf = [0u8; 2048];
    let silent =
        tokio::time::timeout(Duration::from_millis(300), receiver.recv_from(&mut buf)).await;
    assert!(silent.is_err(), "received an announcement while hidden");

    // flip the switch: announcements start flowing
    settings.set_discoverable(true).await;
    let (len, _) = tokio::time::timeout(Duration::from_secs(2), receiver.recv_from(&mut buf))
        .await
        .expect("no announcement after becoming discoverable")
        .unwrap();

    let announcement = Announcement::decode(&buf[..len]).expect("valid announcement");
    assert_eq!(announcement.identity, identity);
    assert_eq!(announcement.device_name, "quiet-node");
    assert_eq!(announcement.port, 5050);

    task.abort();
}

#[tokio::test]
async fn discovery_stop_is_idempotent() {
    let catalog = PeerCatalog::new(Duration::from_secs(10));
    let settings = SettingsStore::new(5050, true);

    // pick a free port the OS just handed out
    let probe = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
    let port = probe.local_addr().unwrap().port();
    drop(probe);

    let discovery = Discovery::new(
        catalog,
        settings,
        Uuid::new_v4(),
        "node".to_string(),
        port,
        Duration::from_millis(100),
    );

    // stop before start is a no-op
    discovery.stop();

    discovery.start().expect("start discovery");
    discovery.start().expect("second start is a no-op");

    discovery.stop();
    discovery.stop();

    // the announce port is free again once stopped
    tokio::time::sleep(Duration::from_millis(100)).await;
    let rebound = std::net::UdpSocket::bind(("127.0.0.1", port));
    assert!(rebound.is_ok(), "announce port still held after stop");
}
