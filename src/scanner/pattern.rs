//! Pattern matching capability for the regex extractor.
//!
//! Host patterns are compiled adaptively: the linear-time `regex` engine is
//! tried first, and patterns that need backreferences or lookaround fall up
//! to `fancy_regex`.

use std::fmt;

use super::error::{ActiveTextError, Result};
use super::types::TextRange;

/// One match: the overall span plus capture values.
///
/// `captures[0]` is the whole match; unmatched optional groups are empty strings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternMatch {
    pub range: TextRange,
    pub captures: Vec<String>,
}

/// Finds the first match starting at or after a byte offset.
///
/// Implementations see the whole haystack, so anchors and lookbehind keep
/// their context when `from > 0`.
pub trait PatternMatcher {
    fn find_from(&self, text: &str, from: usize) -> Result<Option<PatternMatch>>;

    /// Pattern source, for logging
    fn as_str(&self) -> &str;
}

impl<M: PatternMatcher + ?Sized> PatternMatcher for Box<M> {
    fn find_from(&self, text: &str, from: usize) -> Result<Option<PatternMatch>> {
        (**self).find_from(text, from)
    }

    fn as_str(&self) -> &str {
        (**self).as_str()
    }
}

impl PatternMatcher for regex::Regex {
    fn find_from(&self, text: &str, from: usize) -> Result<Option<PatternMatch>> {
        let Some(caps) = self.captures_at(text, from) else {
            return Ok(None);
        };
        let Some(full) = caps.get(0) else {
            return Ok(None);
        };

        let captures = caps
            .iter()
            .map(|group| group.map_or_else(String::new, |m| m.as_str().to_string()))
            .collect();

        Ok(Some(PatternMatch {
            range: TextRange::from_bounds(full.start(), full.end()),
            captures,
        }))
    }

    fn as_str(&self) -> &str {
        regex::Regex::as_str(self)
    }
}

impl PatternMatcher for fancy_regex::Regex {
    fn find_from(&self, text: &str, from: usize) -> Result<Option<PatternMatch>> {
        let caps = self
            .captures_from_pos(text, from)
            .map_err(|e| ActiveTextError::Match { message: e.to_string() })?;
        let Some(caps) = caps else {
            return Ok(None);
        };
        let Some(full) = caps.get(0) else {
            return Ok(None);
        };

        let captures = (0..caps.len())
            .map(|i| caps.get(i).map_or_else(String::new, |m| m.as_str().to_string()))
            .collect();

        Ok(Some(PatternMatch {
            range: TextRange::from_bounds(full.start(), full.end()),
            captures,
        }))
    }

    fn as_str(&self) -> &str {
        fancy_regex::Regex::as_str(self)
    }
}

// ==================== COMPILED PATTERN ====================

/// A host pattern compiled with whichever engine can handle it
pub enum CompiledPattern {
    Basic(regex::Regex),
    Fancy(fancy_regex::Regex),
}

impl CompiledPattern {
    /// Compile `pattern`, reporting `InvalidPattern` if neither engine accepts it.
    pub fn new(pattern: &str) -> Result<Self> {
        Self::build(pattern, false)
    }

    /// Same as `new`, matching letters regardless of case
    pub fn case_insensitive(pattern: &str) -> Result<Self> {
        Self::build(pattern, true)
    }

    pub fn build(pattern: &str, case_insensitive: bool) -> Result<Self> {
        let source = if case_insensitive {
            format!("(?i){}", pattern)
        } else {
            pattern.to_string()
        };

        if let Ok(re) = regex::Regex::new(&source) {
            return Ok(CompiledPattern::Basic(re));
        }

        fancy_regex::Regex::new(&source)
            .map(CompiledPattern::Fancy)
            .map_err(|e| ActiveTextError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })
    }

    pub fn is_fancy(&self) -> bool {
        matches!(self, CompiledPattern::Fancy(_))
    }
}

impl PatternMatcher for CompiledPattern {
    fn find_from(&self, text: &str, from: usize) -> Result<Option<PatternMatch>> {
        match self {
            CompiledPattern::Basic(re) => re.find_from(text, from),
            CompiledPattern::Fancy(re) => re.find_from(text, from),
        }
    }

    fn as_str(&self) -> &str {
        match self {
            CompiledPattern::Basic(re) => re.as_str(),
            CompiledPattern::Fancy(re) => re.as_str(),
        }
    }
}

impl fmt::Debug for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let engine = if self.is_fancy() { "Fancy" } else { "Basic" };
        f.debug_tuple(engine).field(&PatternMatcher::as_str(self)).finish()
    }
}

// ==================== REGEX CONFIG ====================

/// Maps the capture values of a match to replacement text; `None` keeps the match.
pub type ReplaceFn = dyn Fn(&[String]) -> Option<String>;

/// Optional pattern plus optional replace function
#[derive(Default)]
pub struct RegexConfig {
    pub matcher: Option<Box<dyn PatternMatcher>>,
    pub replace: Option<Box<ReplaceFn>>,
}

impl RegexConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile and install `pattern`
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        Ok(Self::new().matcher(CompiledPattern::new(pattern)?))
    }

    pub fn with_case_insensitive_pattern(pattern: &str) -> Result<Self> {
        Ok(Self::new().matcher(CompiledPattern::case_insensitive(pattern)?))
    }

    pub fn matcher(mut self, matcher: impl PatternMatcher + 'static) -> Self {
        self.matcher = Some(Box::new(matcher));
        self
    }

    pub fn replace(mut self, replace: impl Fn(&[String]) -> Option<String> + 'static) -> Self {
        self.replace = Some(Box::new(replace));
        self
    }

    pub fn is_active(&self) -> bool {
        self.matcher.is_some()
    }
}

impl fmt::Debug for RegexConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegexConfig")
            .field("pattern", &self.matcher.as_ref().map(|m| m.as_str().to_string()))
            .field("has_replace", &self.replace.is_some())
            .finish()
    }
}

// ==================== TESTS ====================
