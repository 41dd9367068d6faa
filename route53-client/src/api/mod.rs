//! Route 53 API operations
//!
//! Each submodule adds one resource family's operations to
//! [`Route53Client`](crate::Route53Client).

mod changes;
mod health_checks;
mod record_sets;
pub(crate) mod types;
mod zones;

const ID_PREFIXES: [&str; 3] = ["/hostedzone/", "/change/", "/healthcheck/"];

/// Strip the resource prefix the service puts on ids (`/hostedzone/Z1` -> `Z1`).
pub(crate) fn bare_id(id: &str) -> &str {
    let id = id.trim();
    ID_PREFIXES
        .iter()
        .find_map(|prefix| id.strip_prefix(prefix))
        .unwrap_or(id)
}

/// Caller reference supplied by the caller, or a fresh random one.
pub(crate) fn caller_reference(supplied: Option<String>) -> String {
    supplied
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}
