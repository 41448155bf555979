use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::error::{Result, ToolError};

/// How many leading non-empty values the fallback heuristic samples.
const FALLBACK_SAMPLE_LIMIT: usize = 50;
/// Fraction of sampled values that must contain an alphanumeric character
/// before the first column is accepted as SKU-bearing.
const FALLBACK_ALNUM_THRESHOLD: f64 = 0.5;

/// Built-in column-name patterns, boundary-aware so e.g. "Department" never
/// matches the part pattern. The "item" rule lives in
/// [`item_not_followed_by_name`] because it needs a negative lookahead the
/// regex crate does not support.
static DEFAULT_NAME_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\bsku\b",
        r"(?i)\bitem\s*code\b",
        r"(?i)\bpart\s*(?:no|number)?\b",
        r"(?i)\bmaterial\s*code\b",
        r"(?i)\bproduct\s*code\b",
        r"(?i)\bstock\s*code\b",
        r"(?i)\bstyle\s*code\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("default column pattern"))
    .collect()
});

static ITEM_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bitem\b").expect("item pattern"));
static NAME_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*name").expect("name pattern"));
static HAS_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z0-9]").expect("alnum pattern"));

/// Compiles user-supplied detection patterns case-insensitively. The only
/// hard failure in the detection path: a broken pattern is a usage error and
/// surfaces before any file is scanned.
pub fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| ToolError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })
        })
        .collect()
}

/// Selects the SKU-bearing columns of a table.
///
/// Three capabilities are tried in fixed priority order, each short-circuiting
/// on a non-empty result: explicit names (trimmed, case-insensitive, exact),
/// then pattern matching over the trimmed column names (user patterns, or the
/// built-in default set when none are given), then a first-column fallback
/// driven by sampling the table's data rows. The result preserves table order
/// and is de-duplicated case-insensitively.
///
/// Deterministic and side-effect free.
pub fn detect_sku_columns(
    columns: &[String],
    explicit: Option<&[String]>,
    patterns: Option<&[Regex]>,
    rows: &[Vec<String>],
) -> Vec<String> {
    let trimmed: Vec<String> = columns.iter().map(|name| name.trim().to_string()).collect();

    if let Some(explicit) = explicit.filter(|names| !names.is_empty()) {
        return dedupe(match_explicit(&trimmed, explicit));
    }

    let candidates = match patterns {
        Some(regexes) => match_patterns(&trimmed, regexes),
        None => match_defaults(&trimmed),
    };
    if !candidates.is_empty() {
        return dedupe(candidates);
    }

    dedupe(fallback_first_column(&trimmed, rows))
}

fn match_explicit(columns: &[String], explicit: &[String]) -> Vec<String> {
    let wanted: HashSet<String> = explicit
        .iter()
        .map(|name| name.trim().to_lowercase())
        .collect();
    columns
        .iter()
        .filter(|name| wanted.contains(&name.to_lowercase()))
        .cloned()
        .collect()
}

fn match_patterns(columns: &[String], regexes: &[Regex]) -> Vec<String> {
    columns
        .iter()
        .filter(|name| regexes.iter().any(|regex| regex.is_match(name)))
        .cloned()
        .collect()
}

fn match_defaults(columns: &[String]) -> Vec<String> {
    columns
        .iter()
        .filter(|name| {
            DEFAULT_NAME_PATTERNS
                .iter()
                .any(|regex| regex.is_match(name))
                || item_not_followed_by_name(name)
        })
        .cloned()
        .collect()
}

/// True when the name contains the word "item" at some position that is not
/// immediately followed by "name" ("Item Code" and "Item Description" yes,
/// "Item Name" no).
fn item_not_followed_by_name(name: &str) -> bool {
    ITEM_WORD
        .find_iter(name)
        .any(|found| !NAME_SUFFIX.is_match(&name[found.end()..]))
}

/// Last-resort heuristic: accept the first column when most of its sampled
/// values look like identifiers (contain at least one alphanumeric).
fn fallback_first_column(columns: &[String], rows: &[Vec<String>]) -> Vec<String> {
    let Some(first) = columns.first() else {
        return Vec::new();
    };

    let sample: Vec<&str> = rows
        .iter()
        .filter_map(|row| row.first())
        .map(String::as_str)
        .filter(|cell| !cell.trim().is_empty())
        .take(FALLBACK_SAMPLE_LIMIT)
        .collect();
    if sample.is_empty() {
        return Vec::new();
    }

    let alnum_hits = sample.iter().filter(|cell| HAS_ALNUM.is_match(cell)).count();
    if alnum_hits as f64 / sample.len() as f64 > FALLBACK_ALNUM_THRESHOLD {
        vec![first.clone()]
    } else {
        Vec::new()
    }
}

fn dedupe(names: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| seen.insert(name.to_lowercase()))
        .collect()
}
