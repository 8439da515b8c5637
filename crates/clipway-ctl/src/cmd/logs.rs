//! `logs` — content log queries.

use anyhow::Result;
use serde::Deserialize;

use super::http::{base_url, expect_success, get_json, post_json, Envelope};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogEntry {
    id: i64,
    timestamp: String,
    direction: String,
    device_name: String,
    content: String,
    content_type: String,
    status: String,
}

pub async fn list(port: u16, limit: Option<u32>) -> Result<()> {
    let mut url = format!("{}/logs", base_url(port));
    if let Some(limit) = limit {
        url.push_str(&format!("?limit={limit}"));
    }

    let envelope: Envelope<Vec<LogEntry>> = get_json(&url).await?;
    let entries = expect_success(envelope)?.unwrap_or_default();

    if entries.is_empty() {
        println!("Content log is empty.");
        return Ok(());
    }

    for e in &entries {
        let preview: String = e.content.chars().take(48).collect();
        println!(
            "#{:<5} {}  {:<8} {:<8} {:<10} {}  {}",
            e.id, e.timestamp, e.direction, e.content_type, e.status, e.device_name, preview
        );
    }

    Ok(())
}

pub async fn clear(port: u16) -> Result<()> {
    let envelope: Envelope<u64> = post_json(&format!("{}/logs/clear", base_url(port))).await?;
    let cleared = expect_success(envelope)?.unwrap_or(0);
    println!("Cleared {} log entries.", cleared);
    Ok(())
}
