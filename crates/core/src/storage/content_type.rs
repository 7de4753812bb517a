//! Content-type inference from filenames.

/// Fallback for unknown extensions.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Best-effort media type for `filename`, judged by its extension only.
#[must_use]
pub fn content_type_for(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_or_octet_stream()
        .to_string()
}
