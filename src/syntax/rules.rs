//! Pattern rules for highlighting
//!
//! A rule is a regex whose named capture groups are tag names. Each
//! non-empty group of a match becomes one [`Highlight`].

use regex::Regex;

use super::tags::Tag;

/// A tagged byte range produced by a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    /// Byte offset where this highlight starts (inclusive)
    pub start: usize,
    /// Byte offset where this highlight ends (exclusive)
    pub end: usize,
    /// Tag assigned to the range
    pub tag: Tag,
}

impl Highlight {
    /// Create a new highlight
    pub fn new(start: usize, end: usize, tag: Tag) -> Self {
        Self { start, end, tag }
    }

    /// The highlighted slice of `text`
    pub fn text<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

/// A single highlighting rule
///
/// `regex` has no lookaround, so context is expressed two ways: trailing
/// context is matched outside the named groups (scanning resumes at the end
/// of the last group, not the end of the match), and leading context is a
/// predicate on the character before the match.
pub struct HighlightRule {
    /// Name for debugging
    pub name: String,
    /// Compiled regex pattern
    pub pattern: Regex,
    /// Rejects a match when the preceding character (None at text start)
    /// does not satisfy it
    preceded_by: Option<fn(Option<char>) -> bool>,
}

impl HighlightRule {
    /// Create a new rule
    pub fn new(name: &str, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.to_string(),
            pattern: Regex::new(pattern)?,
            preceded_by: None,
        })
    }

    /// Builder: only accept matches whose preceding character passes `check`
    pub fn preceded_by(mut self, check: fn(Option<char>) -> bool) -> Self {
        self.preceded_by = Some(check);
        self
    }

    fn accepts_at(&self, text: &str, start: usize) -> bool {
        match self.preceded_by {
            Some(check) => check(text[..start].chars().next_back()),
            None => true,
        }
    }

    /// Scan `text` left to right and collect the highlights of every match
    pub fn highlights(&self, text: &str) -> Vec<Highlight> {
        let mut found = Vec::new();
        let mut pos = 0;

        while pos <= text.len() {
            let Some(caps) = self.pattern.captures_at(text, pos) else {
                break;
            };
            let Some(whole) = caps.get(0) else {
                break;
            };

            if !self.accepts_at(text, whole.start()) {
                pos = next_char_boundary(text, whole.start());
                continue;
            }

            let mut resume = whole.end();
            let mut group_end = None;
            for name in self.pattern.capture_names().flatten() {
                let (Some(group), Some(tag)) = (caps.name(name), Tag::from_name(name)) else {
                    continue;
                };
                if group.is_empty() {
                    continue;
                }
                found.push(Highlight::new(group.start(), group.end(), tag));
                group_end = Some(group_end.map_or(group.end(), |end: usize| end.max(group.end())));
            }
            if let Some(end) = group_end {
                resume = end;
            }

            pos = if resume <= whole.start() {
                next_char_boundary(text, whole.start())
            } else {
                resume
            };
        }

        found.sort_by_key(|h| h.start);
        found
    }
}

/// Byte offset of the character after the one starting at `pos`
fn next_char_boundary(text: &str, pos: usize) -> usize {
    let mut next = pos + 1;
    while next < text.len() && !text.is_char_boundary(next) {
        next += 1;
    }
    next
}

/// Preceding-character check: start of text or whitespace
pub fn after_space_or_start(prev: Option<char>) -> bool {
    prev.map_or(true, char::is_whitespace)
}

/// Preceding-character check: not a word character
pub fn after_non_word(prev: Option<char>) -> bool {
    !prev.is_some_and(is_word_char)
}

/// Preceding-character check: neither a word character nor a backslash
pub fn after_non_word_or_escape(prev: Option<char>) -> bool {
    !prev.is_some_and(|c| c == '\\' || is_word_char(c))
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
