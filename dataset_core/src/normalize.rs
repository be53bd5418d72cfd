//! Transcript text cleanup.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use crate::numerals;

fn digit_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("static regex"))
}

/// NFC-compose, spell out digit runs in pt-BR and collapse whitespace.
///
/// A digit run that cannot be expanded is kept as written.
pub fn clean_text(text: &str) -> String {
    let composed: String = text.nfc().collect();
    let spoken = digit_runs().replace_all(&composed, |caps: &Captures| {
        let digits = &caps[0];
        match numerals::expand_digits(digits) {
            Ok(words) => words,
            Err(e) => {
                debug!("Keeping digits {digits:?} verbatim: {e}");
                digits.to_string()
            }
        }
    });
    spoken.split_whitespace().collect::<Vec<_>>().join(" ")
}
