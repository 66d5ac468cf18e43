//! RangeTableBuilder - turns a string plus rules into an `ActiveTable`.
//!
//! Phases:
//! 1. regex extraction (may rewrite the buffer)
//! 2. tokenization of the rewritten buffer
//! 3. per-word classification, filtered by the enable flags
//!
//! The table is a pure function of its inputs. There is no cross-kind overlap
//! resolution: a replacement that produces text looking like a hashtag ends up
//! in both the regex and hashtag lists.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::classify::WordClassifier;
use super::config::EnabledFlags;
use super::extract::extract_regex;
use super::link::{HeuristicLinkDetector, LinkDetector};
use super::pattern::RegexConfig;
use super::tokenize::Tokenizer;
use super::types::{ActiveElement, ActiveTable, RangedElement};

/// Output of one build: the final buffer and the table over it.
///
/// Hosts must lay out and hit-test `text`, not the input string; every range
/// in `table` refers to `text`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct ActiveScan {
    pub text: String,
    pub table: ActiveTable,
}

impl ActiveScan {
    /// Element containing `offset`, see `ActiveTable::lookup`
    pub fn element_at(&self, offset: usize) -> Option<&RangedElement> {
        self.table.lookup(offset)
    }
}

/// Builds active tables with a fixed classifier
pub struct RangeTableBuilder<D = HeuristicLinkDetector> {
    classifier: WordClassifier<D>,
}

impl RangeTableBuilder<HeuristicLinkDetector> {
    pub fn new() -> Self {
        Self { classifier: WordClassifier::new() }
    }
}

impl Default for RangeTableBuilder<HeuristicLinkDetector> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: LinkDetector> RangeTableBuilder<D> {
    pub fn with_detector(detector: D) -> Self {
        Self { classifier: WordClassifier::with_detector(detector) }
    }

    pub fn classifier(&self) -> &WordClassifier<D> {
        &self.classifier
    }

    pub fn build(&self, text: &str, flags: EnabledFlags, regex: &RegexConfig) -> ActiveScan {
        let overall_start = instant::Instant::now();

        let mut buffer = text.to_string();
        let mut table = ActiveTable::new();

        // Phase 1: regex first, everything after sees the rewritten buffer
        let regex_start = instant::Instant::now();
        table.regex = extract_regex(&mut buffer, regex);
        let regex_us = regex_start.elapsed().as_micros() as u64;

        // Phase 2+3: words
        let classify_start = instant::Instant::now();
        let mut word_count = 0usize;
        for word in Tokenizer::new(&buffer) {
            word_count += 1;
            let element = self.classifier.classify(word.text);
            if is_enabled(&element, flags) {
                table.push(RangedElement::new(word.range, element));
            }
        }
        let classify_us = classify_start.elapsed().as_micros() as u64;

        debug!(
            input_len = text.len(),
            final_len = buffer.len(),
            words = word_count,
            mentions = table.mention.len(),
            hashtags = table.hashtag.len(),
            urls = table.url.len(),
            regex = table.regex.len(),
            regex_us,
            classify_us,
            total_us = overall_start.elapsed().as_micros() as u64,
            "active table built"
        );

        ActiveScan { text: buffer, table }
    }
}

fn is_enabled(element: &ActiveElement, flags: EnabledFlags) -> bool {
    match element {
        ActiveElement::Mention(_) => flags.mention_enabled,
        ActiveElement::Hashtag(_) => flags.hashtag_enabled,
        ActiveElement::Url(_) => flags.url_enabled,
        // Words never classify as regex; regex elements come from phase 1 only
        ActiveElement::Regex(_) | ActiveElement::None => false,
    }
}

static DEFAULT_BUILDER: LazyLock<RangeTableBuilder> = LazyLock::new(RangeTableBuilder::new);

/// Build with the built-in heuristic link detector
pub fn build(text: &str, flags: EnabledFlags, regex: &RegexConfig) -> ActiveScan {
    DEFAULT_BUILDER.build(text, flags, regex)
}

// ==================== TESTS ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::types::{ActiveKind, TextRange};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_text() {
        let scan = build("", EnabledFlags::default(), &RegexConfig::new());
        assert_eq!(scan.text, "");
        assert!(scan.table.is_empty());
    }

    #[test]
    fn test_builds_each_kind_in_scan_order() {
        let scan = build(
            "hi @alice, see #rust and #wasm at https://rust-lang.org.",
            EnabledFlags::default(),
            &RegexConfig::new(),
        );

        assert_eq!(
            scan.table.mention,
            vec![RangedElement::new(TextRange::new(3, 7), ActiveElement::Mention("alice".into()))]
        );
        let tags: Vec<&str> = scan
            .table
            .get(ActiveKind::Hashtag)
            .iter()
            .filter_map(|e| e.element.text())
            .collect();
        assert_eq!(tags, vec!["rust", "wasm"]);
        assert_eq!(scan.table.url.len(), 1);
        assert_eq!(scan.table.url[0].element, ActiveElement::Url("https://rust-lang.org".into()));
        assert!(scan.table.regex.is_empty());
    }

    #[test]
    fn test_ranges_cover_whole_word() {
        // Payload drops the punctuation, the range does not
        let scan = build("@userhandle.", EnabledFlags::default(), &RegexConfig::new());
        assert_eq!(scan.table.mention[0].range, TextRange::new(0, 12));
        assert_eq!(scan.table.mention[0].element, ActiveElement::Mention("userhandle".into()));
    }

    #[test]
    fn test_disabled_kinds_are_skipped() {
        let flags = EnabledFlags { mention_enabled: false, ..EnabledFlags::default() };
        let scan = build("@bob google.com #tag", flags, &RegexConfig::new());

        assert!(scan.table.mention.is_empty());
        assert_eq!(scan.table.url.len(), 1);
        assert_eq!(scan.table.hashtag.len(), 1);
    }

    #[test]
    fn test_regex_is_not_gated_by_flags() {
        let regex = RegexConfig::with_pattern(r"\d+").unwrap();
        let scan = build("abc 123 @bob", EnabledFlags::none(), &regex);

        assert_eq!(scan.table.regex.len(), 1);
        assert_eq!(scan.table.len(), 1);
    }
}
