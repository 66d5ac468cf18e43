//! WordClassifier - decides what a single word is.
//!
//! Rules are applied in order, first hit wins:
//! 1. the link detector finds a URL anywhere in the word -> `Url`
//! 2. words shorter than two bytes -> `None`
//! 3. `@` / `#` followed by at least one `[A-Za-z0-9_]` -> `Mention` / `Hashtag`
//! 4. anything else -> `None`
//!
//! URLs go first: mail links and fragments carry '@' and '#'.

use regex::Regex;

use super::link::{HeuristicLinkDetector, LinkDetector};
use super::types::ActiveElement;

const MENTION_PREFIX: char = '@';
const HASHTAG_PREFIX: char = '#';

/// Classifies located words into active elements
pub struct WordClassifier<D = HeuristicLinkDetector> {
    detector: D,
    allowed_re: Regex,
}

impl WordClassifier<HeuristicLinkDetector> {
    pub fn new() -> Self {
        Self::with_detector(HeuristicLinkDetector::new())
    }
}

impl Default for WordClassifier<HeuristicLinkDetector> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: LinkDetector> WordClassifier<D> {
    pub fn with_detector(detector: D) -> Self {
        // Longest allowed prefix, anchored at the start of the remainder
        let allowed_re = Regex::new(r"^[A-Za-z0-9_]+").expect("allowed-prefix pattern is valid");
        Self { detector, allowed_re }
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    pub fn classify(&self, word: &str) -> ActiveElement {
        if let Some(link) = self.detector.first(word) {
            return ActiveElement::Url(link.text);
        }

        if word.len() < 2 {
            return ActiveElement::None;
        }

        let mut chars = word.chars();
        let prefix = match chars.next() {
            Some(c @ (MENTION_PREFIX | HASHTAG_PREFIX)) => c,
            _ => return ActiveElement::None,
        };

        let Some(allowed) = self.allowed_prefix(chars.as_str()) else {
            return ActiveElement::None;
        };

        if prefix == MENTION_PREFIX {
            ActiveElement::Mention(allowed.to_string())
        } else {
            ActiveElement::Hashtag(allowed.to_string())
        }
    }

    fn allowed_prefix<'t>(&self, rest: &'t str) -> Option<&'t str> {
        self.allowed_re.find(rest).map(|m| m.as_str())
    }
}

// ==================== TESTS ====================
