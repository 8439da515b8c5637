//! Content vocabulary shared by the relay, gate, and log.

use bytes::Bytes;

/// What kind of content an envelope carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Text,
    File,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Text => "text",
            ContentKind::File => "file",
        }
    }
}

/// A file handed to the relay or received at the boundary.
#[derive(Debug, Clone)]
pub struct FilePayload {
    pub name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

impl FilePayload {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[derive(Debug, Clone)]
pub enum ContentBody {
    Text(String),
    File(FilePayload),
}

/// Inbound content plus where it came from.
#[derive(Debug, Clone)]
pub struct ContentEnvelope {
    pub body: ContentBody,
    pub origin_device_name: String,
}

/// Longest preview shown in a confirmation prompt.
const PREVIEW_CHARS: usize = 120;

impl ContentEnvelope {
    pub fn text(content: impl Into<String>, origin_device_name: impl Into<String>) -> Self {
        Self {
            body: ContentBody::Text(content.into()),
            origin_device_name: origin_device_name.into(),
        }
    }

    pub fn file(payload: FilePayload, origin_device_name: impl Into<String>) -> Self {
        Self {
            body: ContentBody::File(payload),
            origin_device_name: origin_device_name.into(),
        }
    }

    pub fn kind(&self) -> ContentKind {
        match self.body {
            ContentBody::Text(_) => ContentKind::Text,
            ContentBody::File(_) => ContentKind::File,
        }
    }

    /// Short human-readable preview: truncated text, or the file name.
    pub fn preview(&self) -> String {
        match &self.body {
            ContentBody::Text(text) => {
                if text.chars().count() <= PREVIEW_CHARS {
                    text.clone()
                } else {
                    let cut: String = text.chars().take(PREVIEW_CHARS).collect();
                    format!("{cut}…")
                }
            }
            ContentBody::File(file) => file.name.clone(),
        }
    }
}

/// Sanitize a filename: strip path components, reject traversal attempts.
pub fn sanitize_filename(raw: &str) -> String {
    // Take only the final path component (handles both / and \ separators)
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);

    // Remove leading dots (no hidden files / no ".." tricks)
    let trimmed = base.trim_start_matches('.');

    let clean: String = trimmed
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if clean.is_empty() {
        "shared_file".to_string()
    } else {
        clean
    }
}
