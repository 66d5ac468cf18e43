//! ActiveLabel - host-side state for one annotated label.
//!
//! Holds the input text, enable flags, host pattern and callbacks, and keeps a
//! published `LabelSnapshot` in sync with them. Rendering stays with the host:
//! it lays out `snapshot().text`, styles the ranges in `snapshot().table`, and
//! feeds touch phases back in as text offsets.

pub mod dispatch;
pub mod selection;

pub use dispatch::*;
pub use selection::*;

use std::rc::{Rc, Weak};
use std::sync::Arc;

use tracing::debug;
use url::Url;

use crate::scanner::error::Result;
use crate::scanner::{
    ActiveScan, ActiveTable, CompiledPattern, EnabledFlags, HeuristicLinkDetector, LabelConfig,
    LinkDetector, PatternMatcher, RangeTableBuilder, RangedElement, RegexConfig,
};

/// Final text plus its table, as published after a rebuild
pub type LabelSnapshot = ActiveScan;

pub struct ActiveLabel<D = HeuristicLinkDetector> {
    text: Option<String>,
    flags: EnabledFlags,
    regex: RegexConfig,
    // Source of the installed pattern; `None` for host matchers
    pattern: Option<String>,
    case_insensitive: bool,
    builder: RangeTableBuilder<D>,
    snapshot: Arc<LabelSnapshot>,

    batch_depth: usize,
    dirty: bool,

    handlers: TapHandlers,
    delegate: Option<Weak<dyn ActiveLabelDelegate>>,
    selection: Selection,
}

impl ActiveLabel<HeuristicLinkDetector> {
    pub fn new() -> Self {
        Self::with_detector(HeuristicLinkDetector::new())
    }

    /// Label with `config` applied; fails only on an invalid pattern
    pub fn from_config(config: &LabelConfig) -> Result<Self> {
        let mut label = Self::new();
        label.apply_config(config)?;
        Ok(label)
    }
}

impl Default for ActiveLabel<HeuristicLinkDetector> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: LinkDetector> ActiveLabel<D> {
    pub fn with_detector(detector: D) -> Self {
        Self {
            text: None,
            flags: EnabledFlags::default(),
            regex: RegexConfig::new(),
            pattern: None,
            case_insensitive: false,
            builder: RangeTableBuilder::with_detector(detector),
            snapshot: Arc::new(LabelSnapshot::default()),
            batch_depth: 0,
            dirty: false,
            handlers: TapHandlers::new(),
            delegate: None,
            selection: Selection::new(),
        }
    }

    // ==================== STATE ====================

    /// Input text as last set (before any replacement)
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn flags(&self) -> EnabledFlags {
        self.flags
    }

    /// Source of the pattern installed with `set_pattern`
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    pub fn case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Currently published snapshot. Cheap to clone and hold across rebuilds.
    pub fn snapshot(&self) -> Arc<LabelSnapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Text the host must render
    pub fn final_text(&self) -> &str {
        &self.snapshot.text
    }

    pub fn table(&self) -> &ActiveTable {
        &self.snapshot.table
    }

    pub fn element_at(&self, offset: usize) -> Option<&RangedElement> {
        self.snapshot.element_at(offset)
    }

    // ==================== SETTERS ====================

    pub fn set_text(&mut self, text: Option<&str>) {
        self.text = text.map(str::to_string);
        self.rebuild();
    }

    pub fn set_mention_enabled(&mut self, enabled: bool) {
        self.flags.mention_enabled = enabled;
        self.rebuild();
    }

    pub fn set_hashtag_enabled(&mut self, enabled: bool) {
        self.flags.hashtag_enabled = enabled;
        self.rebuild();
    }

    pub fn set_url_enabled(&mut self, enabled: bool) {
        self.flags.url_enabled = enabled;
        self.rebuild();
    }

    pub fn set_flags(&mut self, flags: EnabledFlags) {
        self.flags = flags;
        self.rebuild();
    }

    /// Switch case mode, recompiling the installed pattern.
    ///
    /// On a compile error nothing changes. Host matchers set with
    /// `set_matcher` are not affected.
    pub fn set_case_insensitive(&mut self, case_insensitive: bool) -> Result<()> {
        if case_insensitive == self.case_insensitive {
            return Ok(());
        }
        match self.pattern.clone() {
            Some(source) => self.set_pattern_with_case(&source, case_insensitive),
            None => {
                self.case_insensitive = case_insensitive;
                self.rebuild();
                Ok(())
            }
        }
    }

    /// Compile and install a host pattern with the current case mode.
    /// On error the previous pattern stays.
    pub fn set_pattern(&mut self, pattern: &str) -> Result<()> {
        self.set_pattern_with_case(pattern, self.case_insensitive)
    }

    /// Pattern and case mode together; on error neither changes
    pub fn set_pattern_with_case(&mut self, pattern: &str, case_insensitive: bool) -> Result<()> {
        let compiled = CompiledPattern::build(pattern, case_insensitive)?;
        self.case_insensitive = case_insensitive;
        self.install(Some(pattern.to_string()), Some(Box::new(compiled)));
        Ok(())
    }

    pub fn set_matcher(&mut self, matcher: Box<dyn PatternMatcher>) {
        self.install(None, Some(matcher));
    }

    pub fn clear_pattern(&mut self) {
        self.install(None, None);
    }

    fn install(&mut self, source: Option<String>, matcher: Option<Box<dyn PatternMatcher>>) {
        self.pattern = source;
        self.regex.matcher = matcher;
        self.rebuild();
    }

    pub fn set_replace_handler(&mut self, replace: impl Fn(&[String]) -> Option<String> + 'static) {
        self.regex.replace = Some(Box::new(replace));
        self.rebuild();
    }

    pub fn clear_replace_handler(&mut self) {
        self.regex.replace = None;
        self.rebuild();
    }

    /// Apply flags, case mode and pattern in one rebuild.
    ///
    /// The pattern is compiled before anything changes, so an invalid pattern
    /// leaves the label untouched.
    pub fn apply_config(&mut self, config: &LabelConfig) -> Result<()> {
        let compiled = config
            .pattern
            .as_deref()
            .map(|p| CompiledPattern::build(p, config.case_insensitive))
            .transpose()?;

        self.batch(|label| {
            label.case_insensitive = config.case_insensitive;
            label.set_flags(config.flags);
            match compiled {
                Some(pattern) => label.install(config.pattern.clone(), Some(Box::new(pattern))),
                None => label.clear_pattern(),
            }
        });
        Ok(())
    }

    /// Run several mutations with a single rebuild at the end
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.batch_depth += 1;
        let result = f(self);
        self.batch_depth -= 1;

        if self.batch_depth == 0 && self.dirty {
            self.rebuild();
        }
        result
    }

    fn rebuild(&mut self) {
        if self.batch_depth > 0 {
            self.dirty = true;
            return;
        }
        self.dirty = false;

        let scan = match &self.text {
            Some(text) => self.builder.build(text, self.flags, &self.regex),
            None => LabelSnapshot::default(),
        };
        self.snapshot = Arc::new(scan);

        if self.selection.selected().is_some() {
            debug!("selection dropped by rebuild");
        }
        self.selection.clear();
    }

    // ==================== HANDLERS ====================

    pub fn handle_mention_tap(&mut self, handler: impl Fn(&str) + 'static) {
        self.handlers.mention = Some(Box::new(handler));
    }

    pub fn handle_hashtag_tap(&mut self, handler: impl Fn(&str) + 'static) {
        self.handlers.hashtag = Some(Box::new(handler));
    }

    pub fn handle_url_tap(&mut self, handler: impl Fn(&Url) + 'static) {
        self.handlers.url = Some(Box::new(handler));
    }

    pub fn handle_regex_tap(&mut self, handler: impl Fn(&[String]) + 'static) {
        self.handlers.regex = Some(Box::new(handler));
    }

    /// The label only keeps a weak reference; dropping the delegate detaches it.
    pub fn set_delegate<T: ActiveLabelDelegate + 'static>(&mut self, delegate: &Rc<T>) {
        let weak: Weak<T> = Rc::downgrade(delegate);
        self.delegate = Some(weak);
    }

    pub fn clear_delegate(&mut self) {
        self.delegate = None;
    }

    // ==================== TOUCH ====================

    pub fn selected(&self) -> Option<&RangedElement> {
        self.selection.selected()
    }

    /// Feed a touch phase at a text offset; returns whether it was consumed
    pub fn on_touch(&mut self, phase: TouchPhase, offset: Option<usize>) -> bool {
        self.touch(phase, offset).consumed
    }

    /// Same as `on_touch`, also reporting the element activated on `Ended`
    pub fn touch(&mut self, phase: TouchPhase, offset: Option<usize>) -> TouchOutcome {
        let snapshot = Arc::clone(&self.snapshot);
        let hit = offset.and_then(|o| snapshot.element_at(o));
        let outcome = self.selection.on_touch(phase, hit);

        if let Some(activated) = &outcome.activated {
            self.dispatch(activated);
        }
        outcome
    }

    /// Route an element to its handler or the delegate
    pub fn dispatch(&self, element: &RangedElement) -> DispatchTarget {
        let delegate = self.delegate.as_ref().and_then(Weak::upgrade);
        self.handlers.dispatch(&element.element, delegate.as_deref())
    }
}

// ==================== TESTS ====================
