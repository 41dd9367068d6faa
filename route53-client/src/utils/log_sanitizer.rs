//! Log sanitization utilities
//!
//! Request and response documents can be large (full record-set pages) and
//! credentials must never be written out whole.

/// Maximum number of bytes of a body to include in log output.
const TRUNCATE_LIMIT: usize = 512;

/// Number of leading characters of an access key that stay visible.
const KEY_VISIBLE_PREFIX: usize = 4;

/// Truncate a document for logging, cutting on a char boundary.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        return s.to_string();
    }
    let mut cut = TRUNCATE_LIMIT;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}... [truncated, total {} bytes]", &s[..cut], s.len())
}

/// Mask an access key id, keeping a short prefix for correlation.
pub fn mask_key(key: &str) -> String {
    let visible: String = key.chars().take(KEY_VISIBLE_PREFIX).collect();
    if visible.len() == key.len() {
        "*".repeat(key.chars().count())
    } else {
        format!("{visible}****")
    }
}
