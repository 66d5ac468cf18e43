use proptest::prelude::*;

use crate::scanner::{
    build, ActiveElement, ActiveKind, ActiveScan, EnabledFlags, LinkDetector, RegexConfig,
    WordClassifier,
};

/// Text built from fragments that exercise every rule, joined by assorted whitespace
fn label_text() -> impl Strategy<Value = String> {
    let fragment = prop_oneof![
        Just("@bob".to_string()),
        Just("@bob.".to_string()),
        Just("#tag".to_string()),
        Just("#".to_string()),
        Just("google.com".to_string()),
        Just("https://a.io/x?y=1.".to_string()),
        Just("<b>x</b>".to_string()),
        Just("方案".to_string()),
        Just("😁".to_string()),
        "[a-z@#<>/.]{0,8}",
    ];
    let gap = prop_oneof![Just(" "), Just("\n"), Just("  "), Just("\t"), Just("")];
    prop::collection::vec((fragment, gap), 0..12).prop_map(|parts| {
        parts
            .into_iter()
            .map(|(word, gap)| format!("{}{}", word, gap))
            .collect()
    })
}

fn tag_config() -> RegexConfig {
    RegexConfig::with_pattern(r"<([a-z]+)>([a-z]*)</([a-z]+)>")
        .unwrap()
        .replace(|caps| if caps[2].is_empty() { None } else { Some(caps[2].clone()) })
}

fn assert_well_formed(scan: &ActiveScan) {
    for kind in ActiveKind::TABLE_ORDER {
        let mut previous_end: Option<usize> = None;
        for entry in scan.table.get(kind) {
            assert!(entry.range.end() <= scan.text.len(), "{:?} past end of text", entry);
            assert!(scan.text.is_char_boundary(entry.range.start));
            assert!(scan.text.is_char_boundary(entry.range.end()));
            if let Some(end) = previous_end {
                assert!(entry.range.start >= end, "{:?} overlaps previous", entry);
            }
            previous_end = Some(entry.range.end());
        }
    }
}

proptest! {
    #[test]
    fn prop_ranges_are_well_formed(text in label_text()) {
        let scan = build(&text, EnabledFlags::default(), &tag_config());
        assert_well_formed(&scan);
        prop_assert!(scan.table.get(ActiveKind::None).is_empty());
    }

    #[test]
    fn prop_build_is_deterministic(text in label_text()) {
        let first = build(&text, EnabledFlags::default(), &tag_config());
        let second = build(&text, EnabledFlags::default(), &tag_config());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_without_pattern_text_is_untouched(text in label_text()) {
        let scan = build(&text, EnabledFlags::default(), &RegexConfig::new());
        prop_assert_eq!(scan.text, text);
        prop_assert!(scan.table.regex.is_empty());
    }

    #[test]
    fn prop_short_words_without_links_are_none(word in "[^\\s]{0,1}") {
        let classifier = WordClassifier::new();
        if classifier.detector().first(&word).is_none() {
            prop_assert_eq!(classifier.classify(&word), ActiveElement::None);
        }
    }
}
