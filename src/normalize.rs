use once_cell::sync::Lazy;
use regex::Regex;

/// Values that stand in for "no SKU" in source spreadsheets. Compared against
/// the fully cleaned, uppercased form so mixed case and padding are tolerated.
const SENTINELS: [&str; 6] = ["", "N/A", "NA", "NONE", "NULL", "-"];

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// Normalizes a raw cell value into a canonical comparable SKU string, or
/// `None` when the cell carries no SKU.
///
/// Numeric-looking values collapse to one canonical rendering, so `"123"`,
/// `"123.0"`, and a numeric cell displayed as `123` all compare equal while
/// `"123"` and `"123.5"` stay distinct. Everything else is whitespace-folded,
/// unquoted, and uppercased. Pure; never fails.
pub fn normalize_sku(raw: &str) -> Option<String> {
    let value = match canonicalize_numeric(raw) {
        Some(canonical) => canonical,
        None => raw.to_string(),
    };

    let collapsed = WHITESPACE_RUN.replace_all(value.trim(), " ");
    let unquoted = strip_quote_pair(strip_quote_pair(collapsed.trim(), '"'), '\'');
    let cleaned = unquoted.to_uppercase();

    if SENTINELS.contains(&cleaned.as_str()) {
        None
    } else {
        Some(cleaned)
    }
}

/// Predicate half of the numeric classifier: trimmed input with at most one
/// `.` and otherwise nothing but ASCII digits.
fn looks_numeric(raw: &str) -> bool {
    let digits = raw.trim().replacen('.', "", 1);
    !digits.is_empty() && digits.chars().all(|ch| ch.is_ascii_digit())
}

/// Canonicalization half: integral values render with no decimal point and
/// no leading zeros, non-integral values via the standard float display.
fn canonicalize_numeric(raw: &str) -> Option<String> {
    if !looks_numeric(raw) {
        return None;
    }
    let number: f64 = raw.trim().parse().ok()?;
    if number.fract() == 0.0 {
        Some(format!("{number:.0}"))
    } else {
        Some(number.to_string())
    }
}

/// Strips one matching pair of the given quote character from both ends.
fn strip_quote_pair(value: &str, quote: char) -> &str {
    value
        .strip_prefix(quote)
        .and_then(|inner| inner.strip_suffix(quote))
        .unwrap_or(value)
}
