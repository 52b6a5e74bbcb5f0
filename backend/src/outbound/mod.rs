//! Driven adapters reaching the external collaborators over HTTP.
//!
//! Adapters own transport details only: request shaping, timeouts, status
//! mapping, and decoding into domain types. Policy (tier fallback, retry
//! prompts, capability checks) stays in the domain services.

pub mod gemini;
pub mod supabase;

/// Compact single-line excerpt of an error body for log/error messages.
pub(crate) fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview: String = compact.chars().take(PREVIEW_CHAR_LIMIT).collect();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
