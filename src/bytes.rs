//! Human readable byte sizes, in 1024 steps.

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

const UNITS: [&str; 6] = ["bytes", "KB", "MB", "GB", "TB", "PB"];

static SIZE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(\d+(?:\.\d+)?)\s*(bytes?|b|[kmgtp]i?b?)?\s*$")
        .expect("size pattern is a valid regex")
});

/// `1536` -> `"1.5 KB"`, `0` -> `"0.0 bytes"`.
pub fn format_bytes(size: u64) -> String {
    let mut num = size as f64;
    for unit in &UNITS[..UNITS.len() - 1] {
        if num < 1024.0 {
            return format!("{:.1} {}", num, unit);
        }
        num /= 1024.0;
    }
    format!("{:.1} {}", num, UNITS[UNITS.len() - 1])
}

/// Parse sizes like `512`, `10 bytes`, `1.5 MB`, `2KiB` or `3g`.
pub fn parse_bytes(input: &str) -> Result<u64> {
    let caps = SIZE_PATTERN
        .captures(input)
        .ok_or_else(|| Error::InvalidByteSize(input.to_string()))?;

    let number: f64 = caps[1]
        .parse()
        .map_err(|_| Error::InvalidByteSize(input.to_string()))?;
    let exponent = match caps.get(2).map(|m| m.as_str().to_ascii_lowercase()) {
        None => 0,
        Some(unit) => match unit.chars().next() {
            Some('k') => 1,
            Some('m') => 2,
            Some('g') => 3,
            Some('t') => 4,
            Some('p') => 5,
            _ => 0,
        },
    };

    let bytes = (number * 1024f64.powi(exponent)).round();
    if !bytes.is_finite() || bytes >= u64::MAX as f64 {
        return Err(Error::InvalidByteSize(input.to_string()));
    }
    Ok(bytes as u64)
}
