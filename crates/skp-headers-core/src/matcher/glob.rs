//! Path glob compilation and matching
//!
//! Patterns are matched segment by segment over `/`-delimited paths.
//!
//! | Syntax | Matches |
//! |--------|---------|
//! | `**` | zero or more whole segments (must be the entire segment) |
//! | `*` | any run of characters inside one segment |
//! | `?` | exactly one character inside one segment |
//! | `[abc]`, `[a-z]` | one character from the class |
//! | `[!a]`, `[^a]` | one character not in the class |
//! | `\x` | the literal character `x` |
//!
//! A leading `!` negates the whole pattern. Leading, trailing and repeated
//! slashes are ignored on both sides, so `/root/`, `root` and `//root`
//! are the same path.

use std::cmp::Reverse;

use crate::error::{HeaderError, Result};

// Bounds on pattern size
const MAX_PATTERN_LENGTH: usize = 1024;
const MAX_SEGMENTS: usize = 64;

/// Compiled path pattern
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    negated: bool,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Glob(Vec<Token>),
    Globstar,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Char(char),
    AnyRun,
    AnyChar,
    Class { negated: bool, items: Vec<ClassItem> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ClassItem {
    Char(char),
    Range(char, char),
}

/// Ranking of a pattern against other patterns that match the same path
///
/// Compared field by field; greater is more specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Specificity {
    exact: bool,
    literal_prefix: usize,
    globstars: Reverse<usize>,
    wildcards: Reverse<usize>,
    literals: usize,
}

impl PathPattern {
    /// Compile a pattern, rejecting malformed input
    pub fn new(pattern: &str) -> Result<Self> {
        if pattern.len() > MAX_PATTERN_LENGTH {
            return Err(HeaderError::pattern(
                &pattern.chars().take(50).collect::<String>(),
                format!("pattern length {} exceeds maximum {MAX_PATTERN_LENGTH}", pattern.len()),
            ));
        }

        let (negated, body) = match pattern.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, pattern),
        };
        if body.trim().is_empty() {
            return Err(HeaderError::pattern(pattern, "pattern is empty"));
        }

        let segments = split_path(body)
            .map(|raw| parse_segment(pattern, raw))
            .collect::<Result<Vec<_>>>()?;

        if segments.len() > MAX_SEGMENTS {
            return Err(HeaderError::pattern(
                pattern,
                format!("pattern has {} segments, exceeds maximum {MAX_SEGMENTS}", segments.len()),
            ));
        }

        Ok(Self {
            source: pattern.to_string(),
            negated,
            segments,
        })
    }

    /// Whether the glob (ignoring negation) matches the path
    pub fn matches_glob(&self, path: &str) -> bool {
        let segments: Vec<&str> = split_path(path).collect();
        self.matches_segments(&segments)
    }

    /// Whether the pattern, negation included, applies to the path
    pub fn matches(&self, path: &str) -> bool {
        self.matches_glob(path) != self.negated
    }

    pub(crate) fn matches_segments(&self, path: &[&str]) -> bool {
        match_segments(&self.segments, path)
    }

    /// True for a `!`-prefixed pattern
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// True when the pattern has no wildcards at all
    pub fn is_exact(&self) -> bool {
        self.segments
            .iter()
            .all(|s| matches!(s, Segment::Literal(_)))
    }

    /// The pattern as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Ranking used to pick one pattern when several match
    pub fn specificity(&self) -> Specificity {
        let literal_prefix = self
            .segments
            .iter()
            .take_while(|s| matches!(s, Segment::Literal(_)))
            .count();
        let count = |f: fn(&Segment) -> bool| self.segments.iter().filter(|s| f(s)).count();

        Specificity {
            exact: self.is_exact(),
            literal_prefix,
            globstars: Reverse(count(|s| matches!(s, Segment::Globstar))),
            wildcards: Reverse(count(|s| matches!(s, Segment::Glob(_)))),
            literals: count(|s| matches!(s, Segment::Literal(_))),
        }
    }
}

impl PartialEq for PathPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for PathPattern {}

/// Non-empty segments of a slash-delimited path
pub fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Canonical form of a request path: one leading slash, no trailing or
/// repeated slashes
pub fn normalize_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len() + 1);
    for segment in split_path(path) {
        out.push('/');
        out.push_str(segment);
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

fn parse_segment(pattern: &str, raw: &str) -> Result<Segment> {
    if raw == "**" {
        return Ok(Segment::Globstar);
    }

    let mut tokens = Vec::new();
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => tokens.push(Token::Char(escaped)),
                None => return Err(HeaderError::pattern(pattern, "trailing backslash")),
            },
            '*' => {
                if chars.peek() == Some(&'*') {
                    return Err(HeaderError::pattern(
                        pattern,
                        "`**` must be a whole path segment",
                    ));
                }
                tokens.push(Token::AnyRun);
            }
            '?' => tokens.push(Token::AnyChar),
            '[' => tokens.push(parse_class(pattern, &mut chars)?),
            _ => tokens.push(Token::Char(c)),
        }
    }

    if tokens.iter().all(|t| matches!(t, Token::Char(_))) {
        let literal = tokens
            .into_iter()
            .filter_map(|t| match t {
                Token::Char(c) => Some(c),
                _ => None,
            })
            .collect();
        Ok(Segment::Literal(literal))
    } else {
        Ok(Segment::Glob(tokens))
    }
}

fn parse_class(
    pattern: &str,
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> Result<Token> {
    let negated = matches!(chars.peek(), Some('!') | Some('^'));
    if negated {
        chars.next();
    }

    let mut items = Vec::new();
    let mut first = true;
    loop {
        let c = match chars.next() {
            Some(c) => c,
            None => {
                return Err(HeaderError::pattern(
                    pattern,
                    "unterminated character class",
                ));
            }
        };
        // `]` right after the opening bracket is a literal
        if c == ']' && !first {
            break;
        }
        first = false;

        let c = if c == '\\' {
            chars
                .next()
                .ok_or_else(|| HeaderError::pattern(pattern, "trailing backslash"))?
        } else {
            c
        };

        if chars.peek() == Some(&'-') {
            let mut lookahead = chars.clone();
            lookahead.next();
            match lookahead.peek() {
                Some(&end) if end != ']' => {
                    chars.next();
                    chars.next();
                    if end < c {
                        return Err(HeaderError::pattern(
                            pattern,
                            format!("reversed range '{c}-{end}' in character class"),
                        ));
                    }
                    items.push(ClassItem::Range(c, end));
                    continue;
                }
                _ => {}
            }
        }
        items.push(ClassItem::Char(c));
    }

    Ok(Token::Class { negated, items })
}

// Both matchers memoize on (pattern index, input index), so each pair is
// evaluated at most once no matter how many wildcards the pattern holds.

fn match_segments(pattern: &[Segment], path: &[&str]) -> bool {
    let mut memo = vec![None; (pattern.len() + 1) * (path.len() + 1)];
    match_segments_at(pattern, path, 0, 0, &mut memo)
}

fn match_segments_at(
    pattern: &[Segment],
    path: &[&str],
    p: usize,
    s: usize,
    memo: &mut [Option<bool>],
) -> bool {
    let key = p * (path.len() + 1) + s;
    if let Some(known) = memo[key] {
        return known;
    }

    let matched = match pattern.get(p) {
        None => s == path.len(),
        Some(Segment::Globstar) => {
            (s..=path.len()).any(|next| match_segments_at(pattern, path, p + 1, next, memo))
        }
        Some(segment) => {
            s < path.len()
                && segment_matches(segment, path[s])
                && match_segments_at(pattern, path, p + 1, s + 1, memo)
        }
    };

    memo[key] = Some(matched);
    matched
}

fn segment_matches(segment: &Segment, input: &str) -> bool {
    match segment {
        Segment::Literal(lit) => lit == input,
        Segment::Glob(tokens) => {
            let chars: Vec<char> = input.chars().collect();
            let mut memo = vec![None; (tokens.len() + 1) * (chars.len() + 1)];
            match_tokens_at(tokens, &chars, 0, 0, &mut memo)
        }
        Segment::Globstar => true,
    }
}

fn match_tokens_at(
    tokens: &[Token],
    input: &[char],
    t: usize,
    i: usize,
    memo: &mut [Option<bool>],
) -> bool {
    let key = t * (input.len() + 1) + i;
    if let Some(known) = memo[key] {
        return known;
    }

    let matched = match tokens.get(t) {
        None => i == input.len(),
        Some(Token::AnyRun) => {
            (i..=input.len()).any(|next| match_tokens_at(tokens, input, t + 1, next, memo))
        }
        Some(token) => {
            i < input.len()
                && token_matches(token, input[i])
                && match_tokens_at(tokens, input, t + 1, i + 1, memo)
        }
    };

    memo[key] = Some(matched);
    matched
}

fn token_matches(token: &Token, c: char) -> bool {
    match token {
        Token::Char(expected) => *expected == c,
        Token::AnyChar | Token::AnyRun => true,
        Token::Class { negated, items } => {
            let hit = items.iter().any(|item| match item {
                ClassItem::Char(x) => *x == c,
                ClassItem::Range(lo, hi) => (*lo..=*hi).contains(&c),
            });
            hit != *negated
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glob(p: &str) -> PathPattern {
        PathPattern::new(p).unwrap()
    }

    #[test]
    fn test_literal_match() {
        let p = glob("/root/sub");
        assert!(p.is_exact());
        assert!(p.matches("/root/sub"));
        assert!(p.matches("root/sub/"));
        assert!(p.matches("//root//sub"));
        assert!(!p.matches("/root/sub/deeper"));
        assert!(!p.matches("/root"));
        assert!(!p.matches("/ROOT/sub")); // case-sensitive
    }

    #[test]
    fn test_single_star_is_one_segment() {
        let p = glob("/root/*");
        assert!(p.matches("/root/anything"));
        assert!(!p.matches("/root/anything/deeper"));
        assert!(!p.matches("/root"));

        let p = glob("/assets/*.css");
        assert!(p.matches("/assets/site.css"));
        assert!(p.matches("/assets/.css"));
        assert!(!p.matches("/assets/site.js"));
        assert!(!p.matches("/assets/css/site.css"));
    }

    #[test]
    fn test_globstar() {
        let p = glob("/root/**");
        assert!(p.matches("/root/anything"));
        assert!(p.matches("/root/anything/deeper"));
        assert!(p.matches("/root"));
        assert!(!p.matches("/other/root"));

        let p = glob("/**/subpath");
        assert!(p.matches("/test/subpath"));
        assert!(p.matches("/a/b/c/subpath"));
        assert!(p.matches("/subpath"));
        assert!(!p.matches("/test/subpath/x"));

        let p = glob("**");
        assert!(p.matches("/"));
        assert!(p.matches("/any/thing"));
    }

    #[test]
    fn test_question_and_classes() {
        let p = glob("/v?/items");
        assert!(p.matches("/v1/items"));
        assert!(!p.matches("/v10/items"));

        let p = glob("/v[0-9]/x");
        assert!(p.matches("/v7/x"));
        assert!(!p.matches("/va/x"));

        let p = glob("/[!_]*");
        assert!(p.matches("/page"));
        assert!(!p.matches("/_private"));

        let p = glob("/[]a]");
        assert!(p.matches("/]"));
        assert!(p.matches("/a"));
    }

    #[test]
    fn test_escapes() {
        let p = glob(r"/file\*name");
        assert!(p.is_exact());
        assert!(p.matches("/file*name"));
        assert!(!p.matches("/filename"));
    }

    #[test]
    fn test_negation() {
        let p = glob("!/anything/**");
        assert!(p.is_negated());
        assert!(p.matches("/negation"));
        assert!(!p.matches("/anything/test.html"));
        assert!(p.matches_glob("/anything/test.html"));
    }

    #[test]
    fn test_malformed_patterns() {
        for bad in ["", "!", "  ", "/a/[bc", r"/a\", "/a**/b", "/**x", "/[z-a]"] {
            assert!(
                matches!(PathPattern::new(bad), Err(HeaderError::InvalidPattern { .. })),
                "expected '{bad}' to be rejected"
            );
        }
        let long = "/a".repeat(MAX_PATTERN_LENGTH);
        assert!(PathPattern::new(&long).is_err());
    }

    #[test]
    fn test_specificity_order() {
        let exact = glob("/root/sub").specificity();
        let single = glob("/root/*").specificity();
        let deep = glob("/root/**").specificity();
        let anywhere = glob("/**/sub").specificity();
        let everything = glob("/**").specificity();

        assert!(exact > single);
        assert!(single > deep);
        assert!(deep > anywhere);
        assert!(anywhere > everything);
    }

    #[test]
    fn test_sort_most_specific_first() {
        let mut patterns = vec![glob("/**"), glob("/root/**"), glob("/root/sub")];
        patterns.sort_by_key(|p| Reverse(p.specificity()));
        let order: Vec<&str> = patterns.iter().map(PathPattern::as_str).collect();
        assert_eq!(order, vec!["/root/sub", "/root/**", "/**"]);
    }

    #[test]
    fn test_many_wildcards_on_long_path() {
        let p = glob("/**/a/**/a/**/a/**/a/**/b");
        let miss = "/a".repeat(120);
        let hit = format!("{miss}/b");

        let start = std::time::Instant::now();
        assert!(!p.matches(&miss));
        assert!(p.matches(&hit));
        assert!(start.elapsed() < std::time::Duration::from_secs(1));

        let p = glob("/*a*a*a*a*a*b");
        let segment = format!("/{}", "a".repeat(200));
        assert!(!p.matches(&segment));
        assert!(p.matches(&format!("{segment}b")));
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("a/b/"), "/a/b");
        assert_eq!(normalize_path("//a///b"), "/a/b");
    }
}
