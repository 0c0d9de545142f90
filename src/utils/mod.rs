//! Utility functions and helpers for bsonconv
//!
//! This module provides small helpers used by the command-line front end:
//! - File path helpers
//! - Size and duration formatting

use std::path::{Path, PathBuf};
use std::time::Duration;

/// File system helpers
pub mod fs {
    use super::*;

    /// Get file extension, lowercased
    ///
    /// # Arguments
    /// * `path` - File path
    ///
    /// # Returns
    /// * `Option<String>` - File extension or None
    pub fn get_extension<P: AsRef<Path>>(path: P) -> Option<String> {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase())
    }

    /// Replace (or add) the extension of a path
    ///
    /// `data.bson` with `json` gives `data.json`.
    pub fn swap_extension<P: AsRef<Path>>(path: P, extension: &str) -> PathBuf {
        path.as_ref().with_extension(extension)
    }

    /// Expand home directory in path
    ///
    /// # Arguments
    /// * `path` - Path potentially starting with ~
    ///
    /// # Returns
    /// * `PathBuf` - Expanded path
    pub fn expand_home(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/")
            && let Some(home) = dirs::home_dir()
        {
            return home.join(rest);
        }
        PathBuf::from(path)
    }
}

/// Conversion utilities
pub mod convert {
    /// Format bytes as human-readable size
    ///
    /// # Arguments
    /// * `bytes` - Number of bytes
    ///
    /// # Returns
    /// * `String` - Formatted size (e.g., "1.50 MB")
    pub fn format_bytes(bytes: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = bytes as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", bytes, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Parse human-readable size to bytes
    ///
    /// # Arguments
    /// * `s` - Size string (e.g., "10MB", "512kb", "4096")
    ///
    /// # Returns
    /// * `Option<u64>` - Size in bytes or None
    pub fn parse_bytes(s: &str) -> Option<u64> {
        let s = s.trim().to_uppercase();
        let (num_str, unit) = if let Some(n) = s.strip_suffix("TB") {
            (n, 1024u64.pow(4))
        } else if let Some(n) = s.strip_suffix("GB") {
            (n, 1024u64.pow(3))
        } else if let Some(n) = s.strip_suffix("MB") {
            (n, 1024u64.pow(2))
        } else if let Some(n) = s.strip_suffix("KB") {
            (n, 1024u64)
        } else if let Some(n) = s.strip_suffix('B') {
            (n, 1)
        } else {
            return s.parse().ok();
        };

        num_str
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite() && *n >= 0.0)
            .map(|n| (n * unit as f64) as u64)
    }
}

/// Time utilities
pub mod time {
    use super::*;

    /// Format duration as human-readable string
    ///
    /// # Arguments
    /// * `duration` - Duration to format
    ///
    /// # Returns
    /// * `String` - Formatted duration (e.g., "850µs", "12ms", "1.25s")
    pub fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();
        if micros < 1_000 {
            format!("{micros}µs")
        } else if micros < 1_000_000 {
            format!("{}ms", micros / 1_000)
        } else {
            format!("{:.2}s", duration.as_secs_f64())
        }
    }
}
