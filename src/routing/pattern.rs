//! Route pattern compilation and structural matching.
//!
//! # Responsibilities
//! - Parse a pattern string as a URL template
//! - Match scheme (exact), host (exact or `www.`-prefixed), path components
//! - Capture variable slots (`!name!`) into a variable map
//!
//! # Design Decisions
//! - `url` only decides whether a string is a URL; comparisons run on the
//!   text as given, so scheme and host case and `.`/`..` segments are kept
//! - Host matching is asymmetric: pattern `example.com` accepts
//!   `www.example.com`, pattern `www.example.com` does not accept `example.com`
//! - Path components are split on `/` with empty components dropped
//! - Captured values are the raw segment text, still percent-encoded
//! - A slot needs a non-empty name: `!` and `!!` are literal components

use std::collections::BTreeMap;
use url::Url;

/// Delimiter wrapping a variable slot in a pattern path component.
pub const VARIABLE_DELIMITER: char = '!';

/// Variables captured from an incoming URL, keyed by slot name.
pub type Variables = BTreeMap<String, String>;

/// Outcome of matching one pattern against one URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    /// Captured variables. Empty unless `matched`.
    pub variables: Variables,
    /// Whether the URL structurally matched the pattern.
    pub matched: bool,
}

impl MatchResult {
    fn no_match() -> Self {
        Self::default()
    }
}

/// Scheme, host and path sliced out of URL text without normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawUrl<'a> {
    pub(crate) scheme: &'a str,
    pub(crate) host: Option<&'a str>,
    pub(crate) path: &'a str,
}

impl<'a> RawUrl<'a> {
    /// Slice `input`. Callers check parseability with `Url::parse` first.
    pub(crate) fn split(input: &'a str) -> Option<Self> {
        // Same leading/trailing trimming `Url::parse` applies.
        let input = input.trim_matches(|c: char| c <= ' ');
        let (scheme, rest) = input.split_once(':')?;
        let rest = match rest.find(|c: char| c == '?' || c == '#') {
            Some(end) => &rest[..end],
            None => rest,
        };

        let (host, path) = match rest.strip_prefix("//") {
            Some(after) => {
                let end = after.find('/').unwrap_or(after.len());
                let host = host_of(&after[..end]);
                (Some(host).filter(|h| !h.is_empty()), &after[end..])
            }
            None => (None, rest),
        };
        Some(Self { scheme, host, path })
    }

    /// Non-empty path components, with no dot-segment resolution.
    pub(crate) fn components(&self) -> Vec<&'a str> {
        self.path.split('/').filter(|c| !c.is_empty()).collect()
    }
}

/// Strip userinfo and port from an authority.
fn host_of(authority: &str) -> &str {
    let host = match authority.rfind('@') {
        Some(at) => &authority[at + 1..],
        None => authority,
    };
    if host.starts_with('[') {
        return match host.find(']') {
            Some(close) => &host[..=close],
            None => host,
        };
    }
    match host.find(':') {
        Some(colon) => &host[..colon],
        None => host,
    }
}

/// A single path component of a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(String),
}

impl Segment {
    fn compile(component: &str) -> Self {
        match variable_name(component) {
            Some(name) => Segment::Variable(name.to_string()),
            None => Segment::Literal(component.to_string()),
        }
    }
}

/// Returns the slot name if `component` is wrapped in delimiters.
fn variable_name(component: &str) -> Option<&str> {
    let name = component
        .strip_prefix(VARIABLE_DELIMITER)?
        .strip_suffix(VARIABLE_DELIMITER)?;
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    scheme: String,
    host: Option<String>,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Compile a pattern string. Returns `None` if it does not parse as a URL.
    pub fn parse(pattern: &str) -> Option<Self> {
        Url::parse(pattern).ok()?;
        let raw = RawUrl::split(pattern)?;
        Some(Self {
            scheme: raw.scheme.to_string(),
            host: raw.host.map(str::to_string),
            segments: raw.components().into_iter().map(Segment::compile).collect(),
        })
    }

    /// Names of the variable slots, in path order.
    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Variable(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    fn host_matches(&self, incoming: Option<&str>) -> bool {
        match (self.host.as_deref(), incoming) {
            (None, None) => true,
            (Some(expected), Some(actual)) => {
                actual == expected
                    || actual
                        .strip_prefix("www.")
                        .is_some_and(|rest| rest == expected)
            }
            _ => false,
        }
    }

    /// Structurally match URL text against this pattern.
    ///
    /// Text that does not parse as a URL never matches.
    pub fn match_str(&self, url: &str) -> MatchResult {
        if Url::parse(url).is_err() {
            return MatchResult::no_match();
        }
        match RawUrl::split(url) {
            Some(raw) => self.match_raw(&raw),
            None => MatchResult::no_match(),
        }
    }

    /// Structurally match an already parsed URL.
    ///
    /// Compares against the URL's serialization, which `url` has already
    /// normalized; use [`match_str`](Self::match_str) to compare the text as given.
    pub fn match_url(&self, url: &Url) -> MatchResult {
        match RawUrl::split(url.as_str()) {
            Some(raw) => self.match_raw(&raw),
            None => MatchResult::no_match(),
        }
    }

    pub(crate) fn match_raw(&self, raw: &RawUrl<'_>) -> MatchResult {
        if raw.scheme != self.scheme {
            return MatchResult::no_match();
        }
        if !self.host_matches(raw.host) {
            return MatchResult::no_match();
        }

        let components = raw.components();
        if components.len() != self.segments.len() {
            return MatchResult::no_match();
        }

        let mut variables = Variables::new();
        for (segment, value) in self.segments.iter().zip(components) {
            match segment {
                Segment::Variable(name) => {
                    variables.insert(name.clone(), value.to_string());
                }
                Segment::Literal(expected) => {
                    if expected != value {
                        return MatchResult::no_match();
                    }
                }
            }
        }

        MatchResult {
            variables,
            matched: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_variable_extraction() {
        let pattern = RoutePattern::parse("myapp://host/!id!/edit").unwrap();

        let result = pattern.match_url(&url("myapp://host/42/edit"));
        assert!(result.matched);
        assert_eq!(result.variables.get("id").map(String::as_str), Some("42"));

        let result = pattern.match_url(&url("myapp://host/42/delete"));
        assert!(!result.matched);
        assert!(result.variables.is_empty());
    }

    #[test]
    fn test_host_www_prefix_is_asymmetric() {
        let bare = RoutePattern::parse("https://example.com/a").unwrap();
        assert!(bare.match_url(&url("https://example.com/a")).matched);
        assert!(bare.match_url(&url("https://www.example.com/a")).matched);

        let www = RoutePattern::parse("https://www.example.com/a").unwrap();
        assert!(!www.match_url(&url("https://example.com/a")).matched);
    }

    #[test]
    fn test_segment_count_mismatch() {
        let pattern = RoutePattern::parse("app://h/a/b").unwrap();
        assert!(!pattern.match_url(&url("app://h/a/b/c")).matched);
        assert!(!pattern.match_url(&url("app://h/a")).matched);
        // Trailing slash adds no component
        assert!(pattern.match_url(&url("app://h/a/b/")).matched);
    }

    #[test]
    fn test_scheme_must_match() {
        let pattern = RoutePattern::parse("app://h/a").unwrap();
        assert!(!pattern.match_url(&url("other://h/a")).matched);
    }

    #[test]
    fn test_lone_delimiters_are_literals() {
        let pattern = RoutePattern::parse("app://h/!/!!").unwrap();
        assert_eq!(pattern.variable_names().count(), 0);
        assert!(pattern.match_url(&url("app://h/!/!!")).matched);
        assert!(!pattern.match_url(&url("app://h/x/y")).matched);
    }

    #[test]
    fn test_captured_value_is_raw() {
        let pattern = RoutePattern::parse("app://h/user/!name!").unwrap();
        let result = pattern.match_url(&url("app://h/user/a%20b"));
        assert_eq!(result.variables["name"], "a%20b");
    }

    #[test]
    fn test_malformed_pattern() {
        assert!(RoutePattern::parse("not a url").is_none());
        assert!(RoutePattern::parse("").is_none());
    }

    #[test]
    fn test_scheme_and_host_compare_as_given() {
        let scheme = RoutePattern::parse("MyApp://host/a").unwrap();
        assert!(!scheme.match_str("myapp://host/a").matched);
        assert!(scheme.match_str("MyApp://host/a").matched);

        let host = RoutePattern::parse("https://Example.com/a").unwrap();
        assert!(!host.match_str("https://example.com/a").matched);
        assert!(host.match_str("https://Example.com/a").matched);
        assert!(host.match_str("https://www.Example.com/a").matched);
    }

    #[test]
    fn test_dot_segments_are_not_resolved() {
        let literal = RoutePattern::parse("app://h/a/b").unwrap();
        assert!(!literal.match_str("app://h/a/x/../b").matched);

        let slots = RoutePattern::parse("app://h/!x!/!y!/!z!").unwrap();
        let result = slots.match_str("app://h/a/./b/c");
        assert!(!result.matched);

        let four = RoutePattern::parse("app://h/!w!/!x!/!y!/!z!").unwrap();
        let result = four.match_str("app://h/a/./b/c");
        assert!(result.matched);
        assert_eq!(result.variables["x"], ".");
    }

    #[test]
    fn test_raw_split() {
        let raw = RawUrl::split("https://user:pw@Example.com:8443/a/b?q=1#frag").unwrap();
        assert_eq!(raw.scheme, "https");
        assert_eq!(raw.host, Some("Example.com"));
        assert_eq!(raw.components(), vec!["a", "b"]);

        let raw = RawUrl::split("mailto:someone").unwrap();
        assert_eq!(raw.host, None);
        assert_eq!(raw.components(), vec!["someone"]);
    }

    #[test]
    fn test_match_str_rejects_unparseable() {
        let pattern = RoutePattern::parse("app://h/a").unwrap();
        assert!(!pattern.match_str("app h a").matched);
    }
}
