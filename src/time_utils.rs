// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for elapsed-time formatting.

/// Format an elapsed duration in seconds for display.
///
/// Rides under an hour render as `M:SS`; longer rides as `Hh Mm` (the final
/// trip summary form).
pub fn format_elapsed(total_seconds: i64) -> String {
    let total_seconds = total_seconds.max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}
