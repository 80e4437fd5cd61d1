//! Word-to-sign lookup over the static catalog.

use crate::defaults;
use crate::signs::{self, SignInfo};
use std::collections::HashSet;

/// One sign matched from a spoken utterance.
#[derive(Debug, Clone, PartialEq)]
pub struct SignMatch {
    /// Catalog word that matched.
    pub word: String,
    pub sign: SignInfo,
}

/// Map an utterance to catalog signs.
///
/// Tokens are lowercased, stripped of surrounding punctuation, and matched
/// exactly against the catalog. A word appears at most once per utterance;
/// unmatched tokens are dropped. An utterance with no matches at all yields
/// exactly one `no match` sentinel entry.
pub fn lookup_signs(utterance: &str) -> Vec<SignMatch> {
    let lowered = utterance.to_lowercase();
    let mut seen = HashSet::new();
    let mut matches = Vec::new();

    for token in lowered.split_whitespace() {
        let token = token.trim_matches(|c: char| !c.is_alphanumeric());
        let Some(sign) = signs::get_sign(token) else {
            continue;
        };
        if seen.insert(sign.word) {
            matches.push(SignMatch {
                word: sign.word.to_string(),
                sign: sign.clone(),
            });
        }
    }

    if matches.is_empty() {
        matches.push(SignMatch {
            word: defaults::NO_MATCH_LABEL.to_string(),
            sign: signs::no_match_sign(),
        });
    }
    matches
}
