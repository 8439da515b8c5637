//! `send` — push content to another clipway server on the LAN.

use anyhow::{Context, Result};

use super::http::{base_url, expect_success, post_json_body, Envelope};

pub async fn run(port: u16, ip: &str, peer_port: &str, content: &str) -> Result<()> {
    let peer_port: u16 = peer_port.parse().context("port must be a number")?;

    let envelope: Envelope<()> = post_json_body(
        &format!("{}/send", base_url(port)),
        &serde_json::json!({
            "ip": ip,
            "port": peer_port,
            "content": content,
        }),
    )
    .await?;
    expect_success(envelope)?;

    println!("Content sent to {}:{}.", ip, peer_port);
    Ok(())
}
