//! `servers` — list discovered peer servers.

use anyhow::Result;
use serde::Deserialize;

use super::http::{base_url, expect_success, get_json, Envelope};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerInfo {
    id: String,
    ip: String,
    port: u16,
    device_name: String,
    last_seen_secs: u64,
}

pub async fn run(port: u16) -> Result<()> {
    let envelope: Envelope<Vec<ServerInfo>> =
        get_json(&format!("{}/servers", base_url(port))).await?;
    let servers = expect_success(envelope)?.unwrap_or_default();

    if servers.is_empty() {
        println!("No servers discovered yet.");
        return Ok(());
    }

    println!("═══════════════════════════════════════");
    println!("  Discovered Servers ({})", servers.len());
    println!("═══════════════════════════════════════");

    for s in &servers {
        println!("  ┌─ {}", s.device_name);
        println!("  │  id        : {}", s.id);
        println!("  │  addr      : {}:{}", s.ip, s.port);
        println!("  └─ last seen : {}s ago", s.last_seen_secs);
    }

    Ok(())
}
