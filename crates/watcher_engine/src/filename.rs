use sha2::{Digest, Sha256};

/// Deterministic, filesystem-safe file name for a source: `{host}--{short_hash(source)}.json`.
///
/// The hash covers the whole source key, so two Jenkins instances under
/// different paths of the same host never share a file.
pub fn snapshot_filename(source_key: &str) -> String {
    let host = url::Url::parse(source_key)
        .ok()
        .and_then(|parsed| parsed.host_str().map(ToOwned::to_owned))
        .unwrap_or_else(|| "source".to_string());
    format!("{}--{}.json", sanitize_label(&host), short_hash(source_key))
}

fn sanitize_label(input: &str) -> String {
    let mut label: String = input
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    label.truncate(60);
    let label = label.trim_matches(&['_', '.'][..]);
    if label.is_empty() {
        "source".to_string()
    } else {
        label.to_string()
    }
}

fn short_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let mut hex = String::with_capacity(16);
    for byte in digest.iter().take(8) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
