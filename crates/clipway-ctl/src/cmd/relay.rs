//! `copy`, `respond`, `respond-file`, `confirm` — clipboard and relay
//! session commands.

use std::path::Path;

use anyhow::{bail, Context, Result};

use super::http::{base_url, expect_success, post_json_body, Envelope};

pub async fn copy(port: u16, text: &str) -> Result<()> {
    let envelope: Envelope<()> = post_json_body(
        &format!("{}/clipboard", base_url(port)),
        &serde_json::json!({ "text": text }),
    )
    .await?;
    expect_success(envelope)?;
    println!("Copied to clipboard.");
    Ok(())
}

pub async fn respond_content(port: u16, content: &str) -> Result<()> {
    let envelope: Envelope<()> = post_json_body(
        &format!("{}/respond-content", base_url(port)),
        &serde_json::json!({ "content": content }),
    )
    .await?;
    expect_success(envelope)?;
    println!("Content delivered to the waiting device.");
    Ok(())
}

pub async fn respond_file(port: u16, path: &str) -> Result<()> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path))?;
    let file_name = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("shared_file")
        .to_string();
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    let part = reqwest::multipart::Part::bytes(bytes)
        .file_name(file_name.clone())
        .mime_str(mime.as_ref())
        .context("invalid mime type")?;
    let form = reqwest::multipart::Form::new().part("file", part);

    let url = format!("{}/respond-file", base_url(port));
    let envelope: Envelope<()> = reqwest::Client::new()
        .post(&url)
        .multipart(form)
        .send()
        .await
        .with_context(|| format!("failed to connect to clipwayd at {} — is it running?", url))?
        .json()
        .await
        .context("failed to parse response")?;
    expect_success(envelope)?;

    println!("File '{}' delivered to the waiting device.", file_name);
    Ok(())
}

pub async fn confirm(port: u16, id: &str, decision: &str) -> Result<()> {
    let accepted = match decision {
        "accept" => true,
        "decline" => false,
        other => bail!("expected accept|decline, got '{}'", other),
    };

    let envelope: Envelope<()> = post_json_body(
        &format!("{}/confirmations/{}", base_url(port), id),
        &serde_json::json!({ "accepted": accepted }),
    )
    .await?;
    expect_success(envelope)?;

    println!(
        "Confirmation {} {}.",
        id,
        if accepted { "accepted" } else { "declined" }
    );
    Ok(())
}
