//! Content normalization — link classification and deep-link schemes.
//!
//! Pure helpers with no dependency on session or discovery state. Text that
//! matches a known site yields a custom URI scheme (e.g. `youtube://…`) so a
//! receiving phone opens the native app instead of a browser; everything
//! else passes through untouched.

const YOUTUBE_HOSTS: &[&str] = &["youtube.com", "youtu.be"];
const REDDIT_HOSTS: &[&str] = &["reddit.com", "old.reddit.com"];

/// Case-insensitive ASCII prefix test.
fn has_prefix_ci(s: &str, prefix: &str) -> bool {
    s.as_bytes()
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix.as_bytes()))
}

fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> &'a str {
    if has_prefix_ci(s, prefix) {
        &s[prefix.len()..]
    } else {
        s
    }
}

/// Remove a leading `http://` or `https://` if present.
fn strip_scheme(s: &str) -> &str {
    for scheme in ["https://", "http://"] {
        if has_prefix_ci(s, scheme) {
            return &s[scheme.len()..];
        }
    }
    s
}

/// True if `text` is a URL on one of `hosts`, with or without scheme and
/// `www.` prefix, and with a non-empty path.
fn host_matches(text: &str, hosts: &[&str]) -> bool {
    let rest = strip_scheme(text.trim());
    let rest = strip_prefix_ci(rest, "www.");
    hosts.iter().any(|host| {
        has_prefix_ci(rest, host)
            && rest.as_bytes().get(host.len()) == Some(&b'/')
            && rest.len() > host.len() + 1
    })
}

pub fn is_youtube_url(text: &str) -> bool {
    host_matches(text, YOUTUBE_HOSTS)
}

pub fn is_reddit_url(text: &str) -> bool {
    host_matches(text, REDDIT_HOSTS)
}

/// Rewrite `url` under a custom scheme: `https://a/b` → `{scheme}://a/b`.
pub fn generate_url_scheme(url: &str, scheme: &str) -> String {
    format!("{scheme}://{}", strip_scheme(url))
}

/// Derive the deep-link scheme for recognized content, if any.
pub fn detect_scheme(text: &str) -> Option<String> {
    if is_youtube_url(text) {
        Some(generate_url_scheme(text, "youtube"))
    } else if is_reddit_url(text) {
        Some(generate_url_scheme(text, "reddit"))
    } else {
        None
    }
}
