use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

const EMAIL_SAFE_PUNCTUATION: &str = "!#$%&'*+-=?^_`{|}~@.[]";

fn other_category() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\p{C}+").expect("valid control-character pattern"))
}

/// Free-text cleanup: decode HTML entities, compose to NFC, collapse whitespace runs,
/// trim, then drop invisible "Other" category characters.
pub fn sanitize_text(raw: &str) -> String {
    let decoded = html_escape::decode_html_entities(raw);
    let composed: String = decoded.nfc().collect();
    let collapsed = composed.split_whitespace().collect::<Vec<_>>().join(" ");
    other_category().replace_all(&collapsed, "").into_owned()
}

/// Keep only characters that may legally appear in an e-mail address.
pub fn sanitize_email(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || EMAIL_SAFE_PUNCTUATION.contains(*c))
        .collect()
}
