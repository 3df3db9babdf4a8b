//! Option conversion functions.
//!
//! Each function takes a raw option value and returns the typed value or a
//! [`VideoError`] naming the option.

use url::Url;

use crate::VideoError;
use crate::invocation::{DirectiveInvocation, OptionValue};

/// Schemes accepted for absolute URIs.
const ALLOWED_SCHEMES: &[&str] = &["http", "https", "ftp"];

/// Check a URI argument and strip whitespace from it.
///
/// Relative references (`_static/clip.webm`, a provider video id) are accepted.
/// Absolute URIs must use `http`, `https` or `ftp`.
pub fn uri(raw: &str) -> Result<String, VideoError> {
    let value: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    if value.is_empty() {
        return Err(VideoError::invalid_uri(value, "URI is empty"));
    }

    if let Some(c) = value
        .chars()
        .find(|&c| matches!(c, '"' | '<' | '>' | '`') || c.is_control())
    {
        return Err(VideoError::invalid_uri(
            &value,
            format!("character {c:?} is not allowed"),
        ));
    }

    match Url::parse(&value) {
        Ok(url) if ALLOWED_SCHEMES.contains(&url.scheme()) => Ok(value),
        Ok(url) => Err(VideoError::invalid_uri(
            &value,
            format!("scheme '{}' is not allowed", url.scheme()),
        )),
        Err(url::ParseError::RelativeUrlWithoutBase) => Ok(value),
        Err(e) => Err(VideoError::invalid_uri(&value, e.to_string())),
    }
}

/// Parse a non-negative integer option.
pub fn nonnegative_int(key: &str, raw: &str) -> Result<u32, VideoError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| VideoError::invalid_option(key, raw, "expected a non-negative integer"))
}

/// Check that an option value is one of `allowed`.
pub fn choice<'a>(key: &str, raw: &str, allowed: &[&'a str]) -> Result<&'a str, VideoError> {
    let value = raw.trim().to_ascii_lowercase();
    allowed
        .iter()
        .find(|&&a| a == value)
        .copied()
        .ok_or_else(|| {
            VideoError::invalid_option(key, raw, format!("expected one of {}", allowed.join(", ")))
        })
}

/// Check a flag option; returns whether it is present.
pub fn flag(inv: &DirectiveInvocation, key: &str) -> Result<bool, VideoError> {
    match inv.option(key) {
        None => Ok(false),
        Some(OptionValue::Flag) => Ok(true),
        Some(OptionValue::Value(v)) => Err(VideoError::invalid_option(
            key,
            v,
            "flag option takes no value",
        )),
    }
}

/// Check that a component identifier is safe to use as an HTML id and a
/// content-store key.
pub fn divid(raw: &str) -> Result<String, VideoError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(VideoError::invalid_option("divid", raw, "divid is required"));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(VideoError::invalid_option(
            "divid",
            raw,
            "only letters, digits, '-' and '_' are allowed",
        ));
    }
    Ok(value.to_owned())
}

/// Reject option keys a directive does not declare.
pub fn known_options(inv: &DirectiveInvocation, allowed: &[&str]) -> Result<(), VideoError> {
    match inv.options.keys().find(|k| !allowed.contains(&k.as_str())) {
        Some(key) => Err(VideoError::invalid_option(
            key,
            inv.get(key).unwrap_or_default(),
            format!("unknown option for {}", inv.name),
        )),
        None => Ok(()),
    }
}

/// Value-carrying option: a bare flag where a value is expected is an error.
pub fn value<'a>(inv: &'a DirectiveInvocation, key: &str) -> Result<Option<&'a str>, VideoError> {
    match inv.option(key) {
        None => Ok(None),
        Some(OptionValue::Value(v)) => Ok(Some(v.as_str())),
        Some(OptionValue::Flag) => Err(VideoError::invalid_option(
            key,
            "",
            "option requires a value",
        )),
    }
}
