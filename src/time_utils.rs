// SPDX-License-Identifier: MIT
// Copyright 2026 The ReWear Authors

//! Shared helpers for date/time formatting.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 with millisecond precision and a `Z` suffix.
///
/// Fixed width, so stored timestamps sort lexicographically.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current time as a stored timestamp.
pub fn now_rfc3339() -> String {
    format_utc_rfc3339(Utc::now())
}
