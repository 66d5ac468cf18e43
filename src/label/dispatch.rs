//! Routing of activated elements to host callbacks.
//!
//! Per-kind tap handlers win; without one, the element goes to the delegate's
//! generic `did_select_text` / `did_select_regex_text`.

use tracing::{debug, trace};
use url::Url;

use crate::scanner::{ActiveElement, ActiveKind};

/// Generic fallback receiver for activated elements
pub trait ActiveLabelDelegate {
    /// Mention, hashtag or URL payload
    fn did_select_text(&self, text: &str, kind: ActiveKind);

    fn did_select_regex_text(&self, _captures: &[String]) {}
}

type TextHandler = Box<dyn Fn(&str)>;
type UrlHandler = Box<dyn Fn(&Url)>;
type RegexHandler = Box<dyn Fn(&[String])>;

/// Per-kind tap handlers
#[derive(Default)]
pub struct TapHandlers {
    pub(crate) mention: Option<TextHandler>,
    pub(crate) hashtag: Option<TextHandler>,
    pub(crate) url: Option<UrlHandler>,
    pub(crate) regex: Option<RegexHandler>,
}

/// Who received a dispatched element
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchTarget {
    Handler,
    Delegate,
    Unhandled,
}

impl TapHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(
        &self,
        element: &ActiveElement,
        delegate: Option<&dyn ActiveLabelDelegate>,
    ) -> DispatchTarget {
        let target = match element {
            ActiveElement::Mention(handle) => {
                route_text(self.mention.as_deref(), delegate, handle, ActiveKind::Mention)
            }
            ActiveElement::Hashtag(tag) => {
                route_text(self.hashtag.as_deref(), delegate, tag, ActiveKind::Hashtag)
            }
            ActiveElement::Url(raw) => match (self.url.as_deref(), parse_url(raw)) {
                (Some(handler), Some(url)) => {
                    handler(&url);
                    DispatchTarget::Handler
                }
                // No handler, or the string does not survive strict parsing
                _ => route_text(None, delegate, raw, ActiveKind::Url),
            },
            ActiveElement::Regex(captures) => match (self.regex.as_deref(), delegate) {
                (Some(handler), _) => {
                    handler(captures.as_slice());
                    DispatchTarget::Handler
                }
                (None, Some(delegate)) => {
                    delegate.did_select_regex_text(captures);
                    DispatchTarget::Delegate
                }
                (None, None) => DispatchTarget::Unhandled,
            },
            ActiveElement::None => DispatchTarget::Unhandled,
        };

        debug!(kind = element.kind().as_str(), routed_to = ?target, "element dispatched");
        target
    }
}

fn route_text(
    handler: Option<&dyn Fn(&str)>,
    delegate: Option<&dyn ActiveLabelDelegate>,
    text: &str,
    kind: ActiveKind,
) -> DispatchTarget {
    if let Some(handler) = handler {
        handler(text);
        return DispatchTarget::Handler;
    }
    match delegate {
        Some(delegate) => {
            delegate.did_select_text(text, kind);
            DispatchTarget::Delegate
        }
        None => DispatchTarget::Unhandled,
    }
}

/// Parse a detected link into a `Url`.
///
/// Detected links often lack a scheme ("www.x.org", "bob@x.org"); those are
/// retried as `http://` or `mailto:` respectively.
pub fn parse_url(raw: &str) -> Option<Url> {
    if let Ok(url) = Url::parse(raw) {
        return Some(url);
    }
    if raw.contains("://") {
        return None;
    }

    let guessed = if raw.contains('@') && !raw.contains('/') {
        format!("mailto:{}", raw)
    } else {
        format!("http://{}", raw)
    };
    trace!(raw, guessed = guessed.as_str(), "retrying url parse with scheme");
    Url::parse(&guessed).ok()
}

// ==================== TESTS ====================
