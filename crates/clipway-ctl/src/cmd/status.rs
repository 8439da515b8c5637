//! `status` — daemon status overview.

use anyhow::Result;
use serde::Deserialize;

use super::http::{base_url, expect_success, get_json, Envelope};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusData {
    device_name: String,
    relay: RelayStatus,
    active_servers: usize,
    tracked_servers: usize,
    pending_confirmations: usize,
}

#[derive(Deserialize)]
struct RelayStatus {
    phase: String,
    last_outcome: Option<String>,
    held_secs: Option<u64>,
}

pub async fn run(port: u16) -> Result<()> {
    let envelope: Envelope<StatusData> = get_json(&format!("{}/status", base_url(port))).await?;
    let status = expect_success(envelope)?
        .ok_or_else(|| anyhow::anyhow!("empty status response"))?;

    println!("═══════════════════════════════════════");
    println!("  Clipway Daemon Status");
    println!("═══════════════════════════════════════");
    println!("  Device        : {}", status.device_name);
    println!("  Servers       : {} active ({} tracked)", status.active_servers, status.tracked_servers);
    println!("  Relay session : {}", status.relay.phase);
    if let Some(held) = status.relay.held_secs {
        println!("  Held for      : {}s", held);
    }
    if let Some(outcome) = &status.relay.last_outcome {
        println!("  Last outcome  : {}", outcome);
    }
    println!("  Confirmations : {} pending", status.pending_confirmations);

    Ok(())
}
