//! Link detection capability.
//!
//! The engine never validates URL grammar itself. It asks a `LinkDetector`
//! for URL-like substrings and keeps the leftmost one. `HeuristicLinkDetector`
//! is the built-in best-effort detector; hosts with a platform detector plug
//! their own in.

use regex::Regex;

use super::types::TextRange;

/// A URL-like substring found by a detector
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkMatch {
    pub range: TextRange,
    pub text: String,
}

/// Finds URL-like substrings in a string. Results are ordered left to right.
pub trait LinkDetector {
    fn detect(&self, text: &str) -> Vec<LinkMatch>;

    /// Leftmost result only
    fn first(&self, text: &str) -> Option<LinkMatch> {
        self.detect(text).into_iter().next()
    }
}

impl<D: LinkDetector + ?Sized> LinkDetector for Box<D> {
    fn detect(&self, text: &str) -> Vec<LinkMatch> {
        (**self).detect(text)
    }

    fn first(&self, text: &str) -> Option<LinkMatch> {
        (**self).first(text)
    }
}

/// Best-effort detector for scheme URLs, `www.` hosts, bare domains and mail addresses.
///
/// Sentence punctuation trailing a match is not part of the link.
pub struct HeuristicLinkDetector {
    link_re: Regex,
}

impl HeuristicLinkDetector {
    pub fn new() -> Self {
        // Alternation order matters: explicit schemes first, then mail
        // addresses (so "bob@example.com" is not cut down to "example.com"),
        // then www hosts and bare domains.
        //
        // Group-free on purpose, only the overall span is used.
        let link_re = Regex::new(
            r#"(?xi)
            (?:
                [a-z][a-z0-9+.\-]*://[^\s<>"]+
              | mailto:[^\s<>"]+
              | [a-z0-9._%+\-]+@(?:[a-z0-9](?:[a-z0-9\-]*[a-z0-9])?\.)+[a-z]{2,63}\b
              | www\.[^\s<>"]+
              | (?:[a-z0-9](?:[a-z0-9\-]*[a-z0-9])?\.)+[a-z]{2,63}\b
                (?::[0-9]{1,5})?
                (?:[/?\#][^\s<>"]*)?
            )"#,
        )
        .expect("link pattern is valid");

        Self { link_re }
    }
}

impl Default for HeuristicLinkDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkDetector for HeuristicLinkDetector {
    fn detect(&self, text: &str) -> Vec<LinkMatch> {
        let mut links = Vec::new();

        for m in self.link_re.find_iter(text) {
            let trimmed = trim_link_trailing(m.as_str());
            // Trimming can leave "www" or a bare scheme behind
            if trimmed.is_empty() || (!trimmed.contains('.') && !trimmed.contains(':')) {
                continue;
            }
            if is_bare_domain(trimmed) && !has_known_tld(trimmed) {
                continue;
            }

            links.push(LinkMatch {
                range: TextRange::new(m.start(), trimmed.len()),
                text: trimmed.to_string(),
            });
        }

        links
    }
}

/// Common generic and country TLDs. Dotted words like "file.txt" or
/// "bob.Then" must not read as links.
const KNOWN_TLDS: &[&str] = &[
    "ai", "app", "at", "au", "be", "biz", "blog", "br", "ca", "cc", "ch", "cloud", "cn", "co",
    "com", "cz", "de", "dev", "dk", "edu", "es", "eu", "fi", "fm", "fr", "gg", "gl", "gov", "gr",
    "hk", "ie", "il", "in", "info", "int", "io", "it", "jp", "kr", "ly", "me", "mil", "mx", "net",
    "nl", "no", "nz", "org", "pl", "pt", "ru", "se", "sg", "tv", "tw", "uk", "us", "xyz", "za",
];

/// No scheme, no mail address, no `www.` prefix
fn is_bare_domain(link: &str) -> bool {
    let lower = link.to_ascii_lowercase();
    !(lower.contains("://")
        || lower.starts_with("mailto:")
        || lower.starts_with("www.")
        || lower.contains('@'))
}

fn has_known_tld(link: &str) -> bool {
    let host = link.split([':', '/', '?', '#']).next().unwrap_or(link);
    let tld = host.rsplit_once('.').map(|(_, t)| t).unwrap_or("").to_ascii_lowercase();
    KNOWN_TLDS.contains(&tld.as_str())
}

/// Trim trailing punctuation that is likely sentence-ending, not part of the link.
///
/// A closing paren is kept when the link itself opened one, e.g. wiki URLs.
fn trim_link_trailing(link: &str) -> &str {
    let mut end = link.len();
    loop {
        let current = &link[..end];
        let Some(last) = current.chars().next_back() else {
            return current;
        };

        let strip = match last {
            '.' | ',' | ';' | ':' | '!' | '?' | '\'' | '"' => true,
            ')' => current.matches('(').count() < current.matches(')').count(),
            ']' => current.matches('[').count() < current.matches(']').count(),
            _ => false,
        };

        if !strip {
            return current;
        }
        end -= last.len_utf8();
    }
}

// ==================== TESTS ====================

#[cfg(test)]
mod tests {
    use super::*;

    fn first(text: &str) -> Option<String> {
        HeuristicLinkDetector::new().first(text).map(|m| m.text)
    }

    #[test]
    fn test_scheme_urls() {
        assert_eq!(first("http://www.google.com").as_deref(), Some("http://www.google.com"));
        assert_eq!(first("https://www.google.com").as_deref(), Some("https://www.google.com"));
        assert_eq!(
            first("https://example.com/path?q=1#frag").as_deref(),
            Some("https://example.com/path?q=1#frag")
        );
    }

    #[test]
    fn test_trailing_punctuation_excluded() {
        assert_eq!(first("https://www.google.com.").as_deref(), Some("https://www.google.com"));
        assert_eq!(first("google.com,").as_deref(), Some("google.com"));
        assert_eq!(first("(see google.com)").as_deref(), Some("google.com"));
    }

    #[test]
    fn test_balanced_paren_kept() {
        assert_eq!(
            first("https://en.wikipedia.org/wiki/Rust_(language)").as_deref(),
            Some("https://en.wikipedia.org/wiki/Rust_(language)")
        );
    }

    #[test]
    fn test_schemeless_hosts() {
        assert_eq!(first("www.google.com").as_deref(), Some("www.google.com"));
        assert_eq!(first("google.com").as_deref(), Some("google.com"));
        assert_eq!(first("sub.example.co.uk/a/b").as_deref(), Some("sub.example.co.uk/a/b"));
    }

    #[test]
    fn test_mail_addresses() {
        assert_eq!(first("bob@example.com").as_deref(), Some("bob@example.com"));
        assert_eq!(first("mailto:bob@example.com").as_deref(), Some("mailto:bob@example.com"));
    }

    #[test]
    fn test_non_links() {
        assert_eq!(first(""), None);
        assert_eq!(first("x"), None);
        assert_eq!(first("@userhandle."), None);
        assert_eq!(first("#somehashtag."), None);
        assert_eq!(first("@_with_underscores_"), None);
        assert_eq!(first("ಠ_ಠ"), None);
        assert_eq!(first("😁"), None);
        assert_eq!(first("e.g."), None);
    }

    #[test]
    fn test_bare_domains_need_known_tld() {
        assert_eq!(first("hello.world"), None);
        assert_eq!(first("file.txt"), None);
        assert_eq!(first("Mr.Smith"), None);
        assert_eq!(first("bob.Then"), None);
        assert_eq!(first("Example.COM").as_deref(), Some("Example.COM"));
        assert_eq!(first("localhost.dev:8080/x").as_deref(), Some("localhost.dev:8080/x"));
        // Explicit schemes and www hosts are not checked
        assert_eq!(first("https://hello.world").as_deref(), Some("https://hello.world"));
        assert_eq!(first("www.hello.world").as_deref(), Some("www.hello.world"));
        // A rejected word does not hide a later link
        let links = HeuristicLinkDetector::new().detect("see file.txt at rust-lang.org");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].text, "rust-lang.org");
    }

    #[test]
    fn test_positions_are_reported() {
        let links = HeuristicLinkDetector::new().detect("go to google.com or www.rust-lang.org.");
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].range, TextRange::new(6, 10));
        assert_eq!(links[1].text, "www.rust-lang.org");
        assert_eq!(links[1].range, TextRange::new(20, 17));
    }
}
