//! `settings` — show or change runtime settings.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use super::http::{base_url, expect_success, get_json, post_json_body, Envelope};

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Settings {
    is_discoverable: bool,
    server_ip: String,
    server_port: u16,
}

async fn fetch(port: u16) -> Result<Settings> {
    let envelope: Envelope<Settings> = get_json(&format!("{}/settings", base_url(port))).await?;
    expect_success(envelope)?.ok_or_else(|| anyhow::anyhow!("empty settings response"))
}

pub async fn show(port: u16) -> Result<()> {
    let settings = fetch(port).await?;

    println!("═══════════════════════════════════════");
    println!("  Settings");
    println!("═══════════════════════════════════════");
    println!("  Discoverable : {}", settings.is_discoverable);
    println!("  Server       : {}:{}", settings.server_ip, settings.server_port);

    Ok(())
}

pub async fn set_discoverable(port: u16, value: &str) -> Result<()> {
    let discoverable = match value {
        "on" | "true" => true,
        "off" | "false" => false,
        other => bail!("expected on|off, got '{}'", other),
    };

    let mut settings = fetch(port).await?;
    settings.is_discoverable = discoverable;

    let envelope: Envelope<()> =
        post_json_body(&format!("{}/settings", base_url(port)), &settings).await?;
    expect_success(envelope)?;

    println!("Discoverability set to {}.", discoverable);
    Ok(())
}
