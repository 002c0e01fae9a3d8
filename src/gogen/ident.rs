//! Go exported-identifier casing.

/// Lower-case words that Go convention spells fully upper-cased.
const INITIALISMS: &[&str] = &["id", "uri", "url", "http", "https", "json", "xml", "api"];

/// Converts a wire name to an exported Go identifier.
///
/// Words are split on `_`, `-`, `.`, spaces, and lower-to-upper case
/// boundaries. Each word is capitalized; words that are well-known
/// initialisms are upper-cased whole, so `documentUri` becomes
/// `DocumentURI` rather than `DocumentUri`.
pub fn go_pascal(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for word in split_words(name) {
        let lowered = word.to_ascii_lowercase();
        if INITIALISMS.contains(&lowered.as_str()) {
            out.push_str(&word.to_ascii_uppercase());
        } else {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        }
    }
    out
}

fn split_words(name: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut start = 0;
    let mut prev_lower = false;
    for (idx, ch) in name.char_indices() {
        if matches!(ch, '_' | '-' | '.' | ' ') {
            if start < idx {
                words.push(&name[start..idx]);
            }
            start = idx + ch.len_utf8();
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower {
            if start < idx {
                words.push(&name[start..idx]);
            }
            start = idx;
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
    }
    if start < name.len() {
        words.push(&name[start..]);
    }
    words
}
