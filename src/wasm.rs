//! WASM boundary: `ActiveTextCortex` wraps an `ActiveLabel` for JS hosts.
//!
//! The core works in UTF-8 byte offsets. JS strings index by UTF-16 code
//! units, so every range and offset crossing this boundary is converted with
//! a `Utf16Index` built over the final text.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tracing::warn;
use wasm_bindgen::prelude::*;

use crate::label::{ActiveLabel, TouchPhase};
use crate::scanner::{ActiveElement, ActiveKind, LabelConfig, RangedElement, WordClassifier};

// =============================================================================
// UTF-16 offsets
// =============================================================================

/// Byte offset <-> UTF-16 code unit offset over one string
#[derive(Debug, Clone)]
pub struct Utf16Index {
    // Parallel arrays: start of each char, plus a sentinel for the end of text
    bytes: Vec<usize>,
    units: Vec<usize>,
}

impl Utf16Index {
    pub fn new(text: &str) -> Self {
        let mut bytes = Vec::with_capacity(text.len() + 1);
        let mut units = Vec::with_capacity(text.len() + 1);
        let mut unit = 0;

        for (byte, ch) in text.char_indices() {
            bytes.push(byte);
            units.push(unit);
            unit += ch.len_utf16();
        }
        bytes.push(text.len());
        units.push(unit);

        Self { bytes, units }
    }

    /// Length of the text in UTF-16 code units
    pub fn utf16_len(&self) -> usize {
        self.units.last().copied().unwrap_or(0)
    }

    /// Offsets inside a char map to that char's start
    pub fn to_utf16(&self, byte: usize) -> usize {
        match self.bytes.binary_search(&byte) {
            Ok(i) => self.units[i],
            Err(0) => 0,
            Err(i) if i >= self.bytes.len() => self.utf16_len(),
            Err(i) => self.units[i - 1],
        }
    }

    /// `None` past the end of text; the low half of a surrogate pair maps to the char start
    pub fn to_byte(&self, unit: usize) -> Option<usize> {
        match self.units.binary_search(&unit) {
            Ok(i) => Some(self.bytes[i]),
            Err(i) if i < self.units.len() => Some(self.bytes[i - 1]),
            Err(_) => None,
        }
    }
}

// =============================================================================
// JS-facing shapes
// =============================================================================

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct JsRangedElement {
    pub start: usize,
    pub length: usize,
    pub element: ActiveElement,
}

impl JsRangedElement {
    fn convert(entry: &RangedElement, index: &Utf16Index) -> Self {
        let start = index.to_utf16(entry.range.start);
        let end = index.to_utf16(entry.range.end());
        Self { start, length: end - start, element: entry.element.clone() }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct JsActiveTable {
    pub mention: Vec<JsRangedElement>,
    pub hashtag: Vec<JsRangedElement>,
    pub url: Vec<JsRangedElement>,
    pub regex: Vec<JsRangedElement>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct JsTouchOutcome {
    pub consumed: bool,
    pub activated: Option<JsRangedElement>,
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    match serde_wasm_bindgen::to_value(value) {
        Ok(v) => v,
        Err(e) => {
            web_sys::console::error_1(&format!("[ActiveTextCortex] Serialization failed: {:?}", e).into());
            JsValue::NULL
        }
    }
}

// =============================================================================
// ActiveTextCortex
// =============================================================================

/// Annotated label for JS hosts
#[wasm_bindgen]
pub struct ActiveTextCortex {
    label: ActiveLabel,
    // Rebuilt lazily for the current snapshot
    index: Option<Utf16Index>,
}

impl Default for ActiveTextCortex {
    fn default() -> Self {
        Self { label: ActiveLabel::new(), index: None }
    }
}

#[wasm_bindgen]
impl ActiveTextCortex {
    /// `config` is optional JSON, e.g. `{"url_enabled": false, "pattern": "..."}`
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<ActiveTextCortex, JsValue> {
        let mut cortex = Self::default();
        if let Some(json) = config {
            let config = LabelConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?;
            cortex
                .label
                .apply_config(&config)
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
        }
        Ok(cortex)
    }

    #[wasm_bindgen(js_name = setText)]
    pub fn set_text(&mut self, text: Option<String>) {
        self.label.set_text(text.as_deref());
        self.index = None;
    }

    #[wasm_bindgen(js_name = setMentionEnabled)]
    pub fn set_mention_enabled(&mut self, enabled: bool) {
        self.label.set_mention_enabled(enabled);
        self.index = None;
    }

    #[wasm_bindgen(js_name = setHashtagEnabled)]
    pub fn set_hashtag_enabled(&mut self, enabled: bool) {
        self.label.set_hashtag_enabled(enabled);
        self.index = None;
    }

    #[wasm_bindgen(js_name = setUrlEnabled)]
    pub fn set_url_enabled(&mut self, enabled: bool) {
        self.label.set_url_enabled(enabled);
        self.index = None;
    }

    #[wasm_bindgen(js_name = setPattern)]
    pub fn set_pattern(&mut self, pattern: &str, case_insensitive: Option<bool>) -> Result<(), JsValue> {
        let flag = case_insensitive.unwrap_or(self.label.case_insensitive());
        self.label
            .set_pattern_with_case(pattern, flag)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.index = None;
        Ok(())
    }

    #[wasm_bindgen(js_name = setCaseInsensitive)]
    pub fn set_case_insensitive(&mut self, case_insensitive: bool) -> Result<(), JsValue> {
        self.label
            .set_case_insensitive(case_insensitive)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.index = None;
        Ok(())
    }

    #[wasm_bindgen(js_name = clearPattern)]
    pub fn clear_pattern(&mut self) {
        self.label.clear_pattern();
        self.index = None;
    }

    /// `handler` receives the captures array; a string return replaces the
    /// match, anything else keeps it.
    #[wasm_bindgen(js_name = setReplaceHandler)]
    pub fn set_replace_handler(&mut self, handler: js_sys::Function) {
        self.label.set_replace_handler(move |captures: &[String]| {
            let args = js_sys::Array::new();
            for capture in captures {
                args.push(&JsValue::from_str(capture));
            }
            match handler.call1(&JsValue::NULL, &args) {
                Ok(value) => value.as_string(),
                Err(e) => {
                    warn!(error = ?e, "replace handler threw, keeping match");
                    None
                }
            }
        });
        self.index = None;
    }

    #[wasm_bindgen(js_name = clearReplaceHandler)]
    pub fn clear_replace_handler(&mut self) {
        self.label.clear_replace_handler();
        self.index = None;
    }

    #[wasm_bindgen(js_name = finalText)]
    pub fn final_text(&self) -> String {
        self.label.final_text().to_string()
    }

    /// Table with UTF-16 ranges over `finalText()`
    #[wasm_bindgen(js_name = table)]
    pub fn js_table(&mut self) -> JsValue {
        to_js(&self.table_utf16())
    }

    #[wasm_bindgen(js_name = elementAt)]
    pub fn js_element_at(&mut self, offset: usize) -> JsValue {
        to_js(&self.element_at_utf16(offset))
    }

    /// `phase` is one of "began", "moved", "ended", "cancelled"
    #[wasm_bindgen(js_name = touch)]
    pub fn js_touch(&mut self, phase: JsValue, offset: Option<usize>) -> Result<JsValue, JsValue> {
        let phase: TouchPhase = serde_wasm_bindgen::from_value(phase)
            .map_err(|e| JsValue::from_str(&format!("Invalid touch phase: {}", e)))?;
        Ok(to_js(&self.touch_utf16(phase, offset)))
    }
}

impl ActiveTextCortex {
    pub fn label(&self) -> &ActiveLabel {
        &self.label
    }

    pub fn label_mut(&mut self) -> &mut ActiveLabel {
        self.index = None;
        &mut self.label
    }

    fn index(&mut self) -> &Utf16Index {
        let text = self.label.final_text();
        self.index.get_or_insert_with(|| Utf16Index::new(text))
    }

    pub fn table_utf16(&mut self) -> JsActiveTable {
        let snapshot = self.label.snapshot();
        let index = self.index();
        let convert = |kind: ActiveKind| -> Vec<JsRangedElement> {
            snapshot
                .table
                .get(kind)
                .iter()
                .map(|entry| JsRangedElement::convert(entry, index))
                .collect()
        };

        JsActiveTable {
            mention: convert(ActiveKind::Mention),
            hashtag: convert(ActiveKind::Hashtag),
            url: convert(ActiveKind::Url),
            regex: convert(ActiveKind::Regex),
        }
    }

    pub fn element_at_utf16(&mut self, offset: usize) -> Option<JsRangedElement> {
        let snapshot = self.label.snapshot();
        let index = self.index();
        let byte = index.to_byte(offset)?;
        snapshot.element_at(byte).map(|entry| JsRangedElement::convert(entry, index))
    }

    pub fn touch_utf16(&mut self, phase: TouchPhase, offset: Option<usize>) -> JsTouchOutcome {
        let byte = offset.and_then(|o| self.index().to_byte(o));
        // An offset past the end is a touch outside the text
        let outcome = self.label.touch(phase, byte);

        let index = self.index();
        JsTouchOutcome {
            consumed: outcome.consumed,
            activated: outcome.activated.map(|entry| JsRangedElement::convert(&entry, index)),
        }
    }
}

// =============================================================================
// Free functions
// =============================================================================

static CLASSIFIER: LazyLock<WordClassifier> = LazyLock::new(WordClassifier::new);

/// Classify a single whitespace-free word
#[wasm_bindgen(js_name = classifyWord)]
pub fn classify_word(word: &str) -> JsValue {
    to_js(&CLASSIFIER.classify(word))
}

// ==================== TESTS ====================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_utf16_index_ascii() {
        let index = Utf16Index::new("abc");
        assert_eq!(index.utf16_len(), 3);
        assert_eq!(index.to_utf16(2), 2);
        assert_eq!(index.to_byte(3), Some(3));
        assert_eq!(index.to_byte(4), None);
    }

    #[test]
    fn test_utf16_index_multibyte() {
        // "方" is 3 bytes / 1 unit, "😁" is 4 bytes / 2 units
        let text = "方😁a";
        let index = Utf16Index::new(text);

        assert_eq!(index.utf16_len(), 4);
        assert_eq!(index.to_utf16(0), 0);
        assert_eq!(index.to_utf16(3), 1);
        assert_eq!(index.to_utf16(7), 3);
        assert_eq!(index.to_utf16(text.len()), 4);

        assert_eq!(index.to_byte(1), Some(3));
        // Low surrogate of the emoji
        assert_eq!(index.to_byte(2), Some(3));
        assert_eq!(index.to_byte(3), Some(7));
    }

    #[test]
    fn test_utf16_index_empty() {
        let index = Utf16Index::new("");
        assert_eq!(index.utf16_len(), 0);
        assert_eq!(index.to_byte(0), Some(0));
        assert_eq!(index.to_byte(1), None);
    }

    #[test]
    fn test_table_ranges_are_utf16() {
        let mut cortex = ActiveTextCortex::default();
        cortex.set_text(Some("方案 #标签 @bob".to_string()));

        let table = cortex.table_utf16();
        assert_eq!(table.mention.len(), 1);
        // "方案 #标签 " is 7 UTF-16 units
        assert_eq!(table.mention[0].start, 7);
        assert_eq!(table.mention[0].length, 4);
        assert_eq!(table.mention[0].element, ActiveElement::Mention("bob".into()));
    }

    #[test]
    fn test_element_at_and_touch_use_utf16_offsets() {
        let mut cortex = ActiveTextCortex::default();
        cortex.set_text(Some("😁 @bob".to_string()));

        // "😁 " is 3 units, "@bob" spans 3..7
        assert!(cortex.element_at_utf16(1).is_none());
        assert_eq!(cortex.element_at_utf16(4).map(|e| e.start), Some(3));
        assert!(cortex.element_at_utf16(99).is_none());

        assert!(cortex.touch_utf16(TouchPhase::Began, Some(5)).consumed);
        let ended = cortex.touch_utf16(TouchPhase::Ended, Some(5));
        assert_eq!(ended.activated.map(|e| e.element), Some(ActiveElement::Mention("bob".into())));
    }

    #[test]
    fn test_index_invalidated_on_change() {
        let mut cortex = ActiveTextCortex::default();
        cortex.set_text(Some("@a1".to_string()));
        assert_eq!(cortex.table_utf16().mention[0].start, 0);

        cortex.set_text(Some("😁😁 @a1".to_string()));
        assert_eq!(cortex.table_utf16().mention[0].start, 5);
    }

    #[test]
    fn test_set_pattern_failure_keeps_case_mode() {
        let mut cortex = ActiveTextCortex::default();
        cortex.set_pattern("<([a-z]+)>", None).unwrap();
        cortex.set_text(Some("<B> 😁".to_string()));
        assert!(cortex.table_utf16().regex.is_empty());

        // JsValue errors only exist on wasm32; check the label state instead
        assert!(cortex.label_mut().set_pattern_with_case("(", true).is_err());
        assert!(!cortex.label().case_insensitive());

        cortex.set_pattern("<([a-z]+)>", Some(true)).unwrap();
        assert_eq!(cortex.table_utf16().regex.len(), 1);
    }

    #[test]
    fn test_usage_example_from_crate_docs() {
        let config = r#"{"pattern": "<([a-z0-9_]+)>([a-z0-9_]+)</\\1>", "case_insensitive": true}"#;
        let mut cortex = ActiveTextCortex::new(Some(config.to_string())).unwrap();
        cortex.label_mut().set_replace_handler(|caps| Some(caps[2].clone()));
        cortex.set_text(Some("方案ID：#<schemeId>123</schemeId>fsadfs @bob".to_string()));

        assert_eq!(cortex.final_text(), "方案ID：#123fsadfs @bob");
        let table = cortex.table_utf16();
        assert!(table.hashtag.is_empty());
        assert!(table.url.is_empty());
        assert_eq!(table.regex.len(), 1);
        assert_eq!(table.mention.len(), 1);
        assert_eq!(
            cortex.element_at_utf16(18).map(|e| e.element),
            Some(ActiveElement::Mention("bob".into()))
        );
    }

    #[test]
    fn test_label_mut_applies_native_replace() {
        let mut cortex = ActiveTextCortex::default();
        {
            let label = cortex.label_mut();
            label.set_pattern(r"\[(\w+)\]").unwrap();
            label.set_replace_handler(|caps| Some(format!("😁{}", caps[1])));
            label.set_text(Some("[x] #t"));
        }

        assert_eq!(cortex.final_text(), "😁x #t");
        let table = cortex.table_utf16();
        assert_eq!((table.regex[0].start, table.regex[0].length), (0, 3));
        assert_eq!(table.hashtag[0].start, 4);
    }
}
