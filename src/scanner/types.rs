//! Core data model: kinds, elements, ranges and the per-kind table.
//!
//! Every range is a span over the *final* buffer (after regex replacement),
//! measured in UTF-8 bytes. The WASM layer converts to UTF-16 on the way out.

use serde::{Deserialize, Serialize};

// ==================== TYPE DEFINITIONS ====================

/// Kind of active element
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ActiveKind {
    Mention,
    Hashtag,
    Url,
    Regex,
    None,
}

impl ActiveKind {
    /// Kinds that own a slot in the table, in lookup order.
    pub const TABLE_ORDER: [ActiveKind; 4] = [
        ActiveKind::Mention,
        ActiveKind::Hashtag,
        ActiveKind::Url,
        ActiveKind::Regex,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActiveKind::Mention => "mention",
            ActiveKind::Hashtag => "hashtag",
            ActiveKind::Url => "url",
            ActiveKind::Regex => "regex",
            ActiveKind::None => "none",
        }
    }
}

/// A classified piece of text with its kind-specific payload
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ActiveElement {
    /// Handle without the leading '@'
    Mention(String),
    /// Tag without the leading '#'
    Hashtag(String),
    /// URL substring as reported by the link detector
    Url(String),
    /// Capture values; index 0 is the whole match
    Regex(Vec<String>),
    None,
}

impl ActiveElement {
    pub fn kind(&self) -> ActiveKind {
        match self {
            ActiveElement::Mention(_) => ActiveKind::Mention,
            ActiveElement::Hashtag(_) => ActiveKind::Hashtag,
            ActiveElement::Url(_) => ActiveKind::Url,
            ActiveElement::Regex(_) => ActiveKind::Regex,
            ActiveElement::None => ActiveKind::None,
        }
    }

    /// Single-string payload for mention/hashtag/url
    pub fn text(&self) -> Option<&str> {
        match self {
            ActiveElement::Mention(s) | ActiveElement::Hashtag(s) | ActiveElement::Url(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ActiveElement::None)
    }
}

/// Span `[start, start + length)` over the final buffer
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct TextRange {
    pub start: usize,
    pub length: usize,
}

impl TextRange {
    pub fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    pub fn from_bounds(start: usize, end: usize) -> Self {
        Self { start, length: end.saturating_sub(start) }
    }

    pub fn end(&self) -> usize {
        self.start + self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Hit test with both ends inclusive: `start <= offset <= end`.
    ///
    /// An offset sitting on the boundary between two adjacent ranges is
    /// contained by both; `ActiveTable::lookup` breaks the tie by kind order.
    pub fn contains_inclusive(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end()
    }

    pub fn as_range(&self) -> std::ops::Range<usize> {
        self.start..self.end()
    }
}

/// A range together with the element it covers
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RangedElement {
    pub range: TextRange,
    pub element: ActiveElement,
}

impl RangedElement {
    pub fn new(range: TextRange, element: ActiveElement) -> Self {
        Self { range, element }
    }

    pub fn kind(&self) -> ActiveKind {
        self.element.kind()
    }
}

// ==================== ACTIVE TABLE ====================

/// Kind-partitioned element table. Each list keeps left-to-right scan order.
///
/// `None` has no slot: `get(ActiveKind::None)` is always empty.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct ActiveTable {
    pub mention: Vec<RangedElement>,
    pub hashtag: Vec<RangedElement>,
    pub url: Vec<RangedElement>,
    pub regex: Vec<RangedElement>,
}

impl ActiveTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: ActiveKind) -> &[RangedElement] {
        match kind {
            ActiveKind::Mention => &self.mention,
            ActiveKind::Hashtag => &self.hashtag,
            ActiveKind::Url => &self.url,
            ActiveKind::Regex => &self.regex,
            ActiveKind::None => &[],
        }
    }

    /// Append to the slot matching the element's kind. `None` elements are dropped.
    pub(crate) fn push(&mut self, entry: RangedElement) {
        let slot = match entry.kind() {
            ActiveKind::Mention => &mut self.mention,
            ActiveKind::Hashtag => &mut self.hashtag,
            ActiveKind::Url => &mut self.url,
            ActiveKind::Regex => &mut self.regex,
            ActiveKind::None => return,
        };
        slot.push(entry);
    }

    /// All elements, kind by kind in `ActiveKind::TABLE_ORDER`, scan order within a kind
    pub fn iter(&self) -> impl Iterator<Item = &RangedElement> {
        ActiveKind::TABLE_ORDER
            .iter()
            .flat_map(move |kind| self.get(*kind).iter())
    }

    pub fn len(&self) -> usize {
        self.mention.len() + self.hashtag.len() + self.url.len() + self.regex.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.mention.clear();
        self.hashtag.clear();
        self.url.clear();
        self.regex.clear();
    }
}

// ==================== TESTS ====================

#[cfg(test)]
mod tests {
    use super::*;

    fn mention(start: usize, len: usize, handle: &str) -> RangedElement {
        RangedElement::new(TextRange::new(start, len), ActiveElement::Mention(handle.to_string()))
    }

    #[test]
    fn test_range_bounds() {
        let r = TextRange::from_bounds(3, 8);
        assert_eq!(r.start, 3);
        assert_eq!(r.length, 5);
        assert_eq!(r.end(), 8);
        assert_eq!(r.as_range(), 3..8);
    }

    #[test]
    fn test_contains_inclusive_both_ends() {
        let r = TextRange::new(2, 3);
        assert!(!r.contains_inclusive(1));
        assert!(r.contains_inclusive(2));
        assert!(r.contains_inclusive(4));
        assert!(r.contains_inclusive(5));
        assert!(!r.contains_inclusive(6));
    }

    #[test]
    fn test_none_slot_is_always_empty() {
        let mut table = ActiveTable::new();
        table.push(RangedElement::new(TextRange::new(0, 1), ActiveElement::None));
        assert!(table.get(ActiveKind::None).is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn test_push_routes_by_kind() {
        let mut table = ActiveTable::new();
        table.push(mention(0, 4, "bob"));
        table.push(RangedElement::new(
            TextRange::new(5, 4),
            ActiveElement::Hashtag("tag".to_string()),
        ));
        table.push(RangedElement::new(
            TextRange::new(10, 3),
            ActiveElement::Regex(vec!["abc".to_string()]),
        ));

        assert_eq!(table.get(ActiveKind::Mention).len(), 1);
        assert_eq!(table.get(ActiveKind::Hashtag).len(), 1);
        assert_eq!(table.get(ActiveKind::Url).len(), 0);
        assert_eq!(table.get(ActiveKind::Regex).len(), 1);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_iter_follows_kind_order() {
        let mut table = ActiveTable::new();
        table.push(RangedElement::new(
            TextRange::new(0, 3),
            ActiveElement::Regex(vec!["abc".to_string()]),
        ));
        table.push(mention(4, 4, "bob"));

        let kinds: Vec<ActiveKind> = table.iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec![ActiveKind::Mention, ActiveKind::Regex]);
    }

    #[test]
    fn test_element_json_shape() {
        let json = serde_json::to_value(ActiveElement::Mention("bob".to_string())).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "mention", "value": "bob"}));

        let json = serde_json::to_value(ActiveElement::None).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "none"}));
    }
}
