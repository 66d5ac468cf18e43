//! RegexExtractor - applies the host pattern across the whole buffer.
//!
//! Matches are taken left to right. A match may be rewritten by the replace
//! function, in which case the buffer is spliced in place and the recorded
//! range covers the replacement. Every later stage (tokenizer, classifier,
//! lookup) sees the rewritten buffer, so their ranges line up with it.

use tracing::{trace, warn};

use super::pattern::RegexConfig;
use super::types::{ActiveElement, RangedElement, TextRange};

/// Run `config` over `text`, rewriting it in place.
///
/// Returns the regex elements in match order. Empty for an empty buffer or
/// when no pattern is configured.
pub fn extract_regex(text: &mut String, config: &RegexConfig) -> Vec<RangedElement> {
    let Some(matcher) = config.matcher.as_deref() else {
        return Vec::new();
    };
    if text.is_empty() {
        return Vec::new();
    }

    let mut elements = Vec::new();
    let mut cursor = 0;

    while cursor <= text.len() {
        let found = match matcher.find_from(text.as_str(), cursor) {
            Ok(Some(found)) => found,
            Ok(None) => break,
            Err(e) => {
                // Keep what was found so far; the rest of the buffer stays plain text
                warn!(pattern = matcher.as_str(), cursor, error = %e, "regex extraction stopped");
                break;
            }
        };

        let replacement = config
            .replace
            .as_ref()
            .and_then(|replace| replace(found.captures.as_slice()))
            .filter(|r| !r.is_empty());

        let range = match replacement {
            Some(replacement) => {
                text.replace_range(found.range.as_range(), &replacement);
                TextRange::new(found.range.start, replacement.len())
            }
            None => found.range,
        };

        trace!(start = range.start, length = range.length, groups = found.captures.len(), "regex match");
        elements.push(RangedElement::new(range, ActiveElement::Regex(found.captures)));

        cursor = range.end();

        // An empty match would be found again at the same spot: step over one char
        if found.range.is_empty() {
            match text[cursor..].chars().next() {
                Some(c) => cursor += c.len_utf8(),
                None => break,
            }
        }
    }

    elements
}

// ==================== TESTS ====================
