use std::sync::OnceLock;

use regex::Regex;

/// Pattern to match server identifiers:
/// - Canonical form: Premium #11
/// - Case variants from recognition: PREMIUM #11, premium #11
/// - Stray spacing around the hash: Premium# 11, Premium  #  11
const IDENTIFIER_PATTERN: &str = r"(?i)premium\s*#\s*(\d+)";

/// Pattern to match elapsed-time tokens:
/// - One to three hour digits: 4:23:33 would not match, 04:23:33 does,
///   and long uptimes like 121:07:00 do
/// - Exactly two digits for minutes and seconds; out-of-range values such
///   as 99:99:99 are accepted as-is
const TIME_PATTERN: &str = r"\b\d{1,3}:\d{2}:\d{2}\b";

fn identifier_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(IDENTIFIER_PATTERN).expect("identifier pattern is valid"))
}

fn time_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(TIME_PATTERN).expect("time pattern is valid"))
}

/// Extracts server identifiers from raw recognition text, normalized to
/// "Premium #<digits>".
///
/// Matches are non-overlapping and returned in order of appearance.
/// Repeated identifiers produce repeated entries; nothing is deduplicated.
pub fn extract_identifiers(text: &str) -> Vec<String> {
    identifier_regex()
        .captures_iter(text)
        .map(|caps| format!("Premium #{}", &caps[1]))
        .collect()
}

/// Extracts H:MM:SS time tokens from raw recognition text, in order of
/// appearance.
///
/// Tokens keep their recognized form; no range validation and no
/// deduplication. Text without any match yields an empty list.
pub fn extract_times(text: &str) -> Vec<String> {
    time_regex()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}
