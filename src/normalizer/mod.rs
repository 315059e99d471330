use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use url::Url;

/// Map a user-entered thread URL or share link to the canonical `.json`
/// data endpoint. Total: malformed input degrades to a best-effort string
/// instead of failing.
///
/// Share links (`/r/<sub>/s/<token>`) are decoded locally when the token
/// is readable base64; opaque tokens fall back to plain canonicalization
/// of the share URL itself. The caller may run the URL through
/// [`ShareLinkResolver`](crate::resolver::ShareLinkResolver) first to let
/// the service itself disclose the target.
pub fn normalize(input: &str) -> String {
    let trimmed = input.trim();

    match Url::parse(trimmed) {
        Ok(url) if !url.cannot_be_a_base() => {
            if let Some(token) = share_token(&url) {
                if let Some(decoded) = decode_share_token(token) {
                    let resolved = resolve_decoded_share_path(&url, &decoded);
                    return append_json(&resolved);
                }
            }

            let path = url.path().strip_suffix('/').unwrap_or(url.path());
            append_json(&format!("{}{}", origin_of(&url), path))
        }
        _ => {
            // Not parseable as an absolute URL; clean the string as-is.
            let mut s = trimmed;
            if let Some(cut) = s.find(['#', '?']) {
                s = &s[..cut];
            }
            append_json(s.strip_suffix('/').unwrap_or(s))
        }
    }
}

/// Extract the share token if the path has the exact share-link shape:
/// at least four non-empty segments, `r` first, `s` second-to-last.
/// A trailing slug after the token disqualifies the match.
pub fn share_token(url: &Url) -> Option<&str> {
    let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
    if segments.len() < 4 || segments[0] != "r" || segments[segments.len() - 2] != "s" {
        return None;
    }
    Some(segments[segments.len() - 1])
}

/// Decode a share token locally. `None` means the token is opaque and the
/// caller should fall back to other strategies; no decode failure escapes.
///
/// Tokens are URL-safe base64 of either a JSON envelope
/// (`{"path": ...}` / `{"url": ...}`), an absolute URL, or a thread path.
pub fn decode_share_token(token: &str) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(token.trim_end_matches('=')).ok()?;
    let text = String::from_utf8(bytes).ok()?;

    if let Ok(serde_json::Value::Object(envelope)) = serde_json::from_str(&text) {
        return ["path", "url"]
            .iter()
            .find_map(|key| envelope.get(*key).and_then(|v| v.as_str()))
            .map(str::to_string);
    }

    if text.starts_with("http") || text.starts_with('/') {
        Some(text)
    } else if text.starts_with("r/") {
        Some(format!("/{text}"))
    } else {
        None
    }
}

/// Resolve a decoded share target against the share link's origin.
/// Absolute URLs keep their own origin; anything else is treated as a
/// path on the original host.
fn resolve_decoded_share_path(base: &Url, decoded: &str) -> String {
    let sanitized = sanitize_share_target(decoded);

    if let Ok(absolute) = Url::parse(&sanitized) {
        if absolute.has_host() {
            return format!("{}{}", origin_of(&absolute), absolute.path());
        }
    }

    if sanitized.starts_with('/') {
        format!("{}{}", origin_of(base), sanitized)
    } else {
        format!("{}/{}", origin_of(base), sanitized)
    }
}

fn sanitize_share_target(raw: &str) -> String {
    let mut s = raw;
    if let Some(cut) = s.find('#') {
        s = &s[..cut];
    }
    if let Some(cut) = s.find('?') {
        s = &s[..cut];
    }
    let s = s.strip_suffix('/').unwrap_or(s);
    s.strip_suffix(".json").unwrap_or(s).to_string()
}

fn origin_of(url: &Url) -> String {
    url.origin().ascii_serialization()
}

fn append_json(s: &str) -> String {
    if s.ends_with(".json") {
        s.to_string()
    } else {
        format!("{s}.json")
    }
}
