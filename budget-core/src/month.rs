//! Month helpers: fixed English abbreviations, independent of locale.

const MONTH_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Three-letter abbreviation for a month number (1 = "Jan").
pub fn month_abbr(month: u32) -> Option<&'static str> {
    match month {
        1..=12 => Some(MONTH_ABBR[(month - 1) as usize]),
        _ => None,
    }
}

/// Inverse of [`month_abbr`], case-insensitive.
pub fn month_from_abbr(s: &str) -> Option<u32> {
    let s = s.trim();
    MONTH_ABBR
        .iter()
        .position(|abbr| abbr.eq_ignore_ascii_case(s))
        .map(|i| i as u32 + 1)
}
