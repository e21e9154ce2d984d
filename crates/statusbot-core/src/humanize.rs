//! Compact, unit-labelled durations for display.

/// Unit sizes in seconds, most significant first.
const UNITS: [(u64, &str); 4] = [(86_400, "d"), (3_600, "h"), (60, "m"), (1, "s")];

/// Format a number of seconds as e.g. `1d 1h 1m 1s`.
///
/// Zero-valued units are skipped, so `3600` is `1h` and `90` is `1m 30s`.
/// Zero seconds is `0s`. Defined for every `u64`.
pub fn format_uptime(total_secs: u64) -> String {
    if total_secs == 0 {
        return "0s".to_string();
    }

    let mut remaining = total_secs;
    let mut parts = Vec::with_capacity(UNITS.len());
    for (size, unit) in UNITS {
        let count = remaining / size;
        remaining %= size;
        if count > 0 {
            parts.push(format!("{count}{unit}"));
        }
    }
    parts.join(" ")
}
