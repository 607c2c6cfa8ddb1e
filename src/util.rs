//! Shared utility functions for the claimcheck crate.

use regex::Regex;
use std::sync::LazyLock;

static NON_ALNUM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]").expect("static regex"));
static UNDERSCORE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").expect("static regex"));

/// Yield every balanced top-level `{...}` region of `text`, in order.
///
/// Tracks brace depth; when depth returns to zero after having been positive the
/// enclosed slice is yielded. Braces inside JSON string literals are ignored and a
/// stray `}` at depth zero is skipped, so one malformed region does not poison the
/// regions that follow it.
pub fn balanced_brace_regions(text: &str) -> Vec<&str> {
    scan_regions(text, true)
}

/// Like [`balanced_brace_regions`], but counting every brace, quoted or not.
///
/// An unmatched `"` in prose cannot hide later objects from this pass.
pub fn depth_only_regions(text: &str) -> Vec<&str> {
    scan_regions(text, false)
}

fn scan_regions(text: &str, track_strings: bool) -> Vec<&str> {
    let mut regions = Vec::new();
    let mut depth: usize = 0;
    let mut start = 0;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' if track_strings && depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = i;
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    regions.push(&text[start..=i]);
                }
            }
            _ => {}
        }
    }

    regions
}

/// Truncate to at most `max_chars` characters, never splitting a UTF-8 sequence.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Convert claim text into a filesystem-safe excerpt.
///
/// Non-alphanumerics become `_`, runs of `_` collapse, the result is cut to 50
/// characters and trimmed of leading/trailing underscores.
pub fn sanitize_filename(text: &str) -> String {
    let replaced = NON_ALNUM.replace_all(text, "_");
    let collapsed = UNDERSCORE_RUN.replace_all(&replaced, "_");
    truncate_chars(&collapsed, 50).trim_matches('_').to_string()
}

/// Host component of a URL, or `"unknown"` when the URL does not parse.
pub fn domain_from_url(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| {
            u.host_str().map(|h| match u.port() {
                Some(port) => format!("{}:{}", h, port),
                None => h.to_string(),
            })
        })
        .unwrap_or_else(|| "unknown".to_string())
}
