//! Input validation, run before any network call

use crate::error::{Error, Result};
use crate::types::{RetentionPolicy, MAX_KEEP};
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

fn keep_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]+$").expect("static regex"))
}

/// scheme://host[:port][/path]
fn host_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://[A-Za-z0-9\-._~%]+(:[0-9]{1,5})?(/\S*)?$")
            .expect("static regex")
    })
}

/// Parse a retention count, clamping it to [`MAX_KEEP`]
///
/// Only plain digit strings are accepted. Values too large for `u32` are
/// still well-formed and clamp like any other value above the ceiling.
pub fn parse_keep(keep: &str) -> Result<RetentionPolicy> {
    if !keep_pattern().is_match(keep) {
        return Err(Error::validation(
            "keep",
            format!("expected a non-negative integer, got '{}'", keep),
        ));
    }

    let value = keep.parse::<u32>().unwrap_or(MAX_KEEP);
    Ok(RetentionPolicy::new(value))
}

/// Check that `host` looks like a URL with scheme and authority
pub fn validate_host(host: &str) -> Result<Url> {
    if !host_pattern().is_match(host) {
        return Err(Error::validation(
            "host",
            format!("expected scheme://host[:port][/path], got '{}'", host),
        ));
    }

    Url::parse(host).map_err(|e| Error::validation("host", format!("{}: {}", host, e)))
}

/// Repository names must be non-empty
pub fn validate_repository(repository: &str) -> Result<()> {
    if repository.trim().is_empty() {
        return Err(Error::validation("repository", "must not be empty"));
    }
    Ok(())
}
