//! Utility modules.

/// Log sanitization so bodies and credentials never land in logs verbatim.
pub mod log_sanitizer;
