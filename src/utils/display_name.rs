//! Best-effort sequential display names (`QR-001`, `QR-002`, ...).

/// Computes the next display name from the most recently created entry's
/// name. Parses the trailing numeric suffix, increments, and zero-pads to
/// three digits; falls back to `QR-001` when there is no prior entry or the
/// suffix does not parse.
///
/// This is cosmetic sequencing, not a counter: concurrent creations may
/// produce duplicates and gaps.
pub fn next_display_name(latest: Option<&str>) -> String {
    let last_number = latest
        .and_then(|name| name.rsplit('-').next())
        .and_then(|suffix| suffix.parse::<u32>().ok())
        .unwrap_or(0);

    format!("QR-{:03}", last_number + 1)
}
