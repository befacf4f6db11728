//! Styled text
//!
//! A plain string with styled byte spans layered over a base style.
//! Spans added later paint over earlier ones.

use std::fmt::Write as _;

use crossterm::style::StyledContent;
use unicode_width::UnicodeWidthChar;

use crate::syntax::{Highlighter, Span, Style, Theme};

/// Text with style spans
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Text {
    /// The characters
    pub plain: String,
    /// Style spans, applied in order
    pub spans: Vec<Span>,
    /// Style under every span
    pub style: Style,
}

impl Text {
    /// Create unstyled text
    pub fn new(plain: impl Into<String>) -> Self {
        Self {
            plain: plain.into(),
            ..Default::default()
        }
    }

    /// Create text with a base style
    pub fn styled(plain: impl Into<String>, style: Style) -> Self {
        Self {
            plain: plain.into(),
            spans: Vec::new(),
            style,
        }
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.plain.len()
    }

    /// Check if there are no characters
    pub fn is_empty(&self) -> bool {
        self.plain.is_empty()
    }

    /// Display width in terminal cells
    pub fn width(&self) -> usize {
        self.plain.chars().filter_map(UnicodeWidthChar::width).sum()
    }

    /// Append a string, optionally styled
    pub fn append(&mut self, s: &str, style: Option<Style>) {
        let start = self.plain.len();
        self.plain.push_str(s);
        if let Some(style) = style {
            self.stylize(start, self.plain.len(), style);
        }
    }

    /// Append another text, keeping its base style and spans
    pub fn append_text(&mut self, other: &Text) {
        let offset = self.plain.len();
        self.plain.push_str(&other.plain);
        if !other.style.is_default() {
            self.stylize(offset, offset + other.plain.len(), other.style);
        }
        for span in &other.spans {
            self.stylize(offset + span.start, offset + span.end, span.style);
        }
    }

    /// Style a byte range; empty or default-styled ranges are ignored
    pub fn stylize(&mut self, start: usize, end: usize, style: Style) {
        let end = end.min(self.plain.len());
        if start < end && !style.is_default() {
            self.spans.push(Span::new(start, end, style));
        }
    }

    /// Add the highlighter's tags as spans styled by the theme
    pub fn highlight(&mut self, highlighter: &Highlighter, theme: &Theme) {
        for highlight in highlighter.highlight(&self.plain) {
            self.stylize(highlight.start, highlight.end, theme.style_for(highlight.tag));
        }
    }

    /// Effective style of the character at a byte position
    pub fn style_at(&self, pos: usize) -> Style {
        self.spans
            .iter()
            .filter(|span| span.contains(pos))
            .fold(self.style, |acc, span| acc.combine(&span.style))
    }

    /// Cut the text down to at most `max_width` terminal cells
    pub fn truncate(&mut self, max_width: usize) {
        let mut width = 0;
        let mut cut = self.plain.len();
        for (pos, c) in self.plain.char_indices() {
            width += c.width().unwrap_or(0);
            if width > max_width {
                cut = pos;
                break;
            }
        }
        self.plain.truncate(cut);
        self.spans.retain_mut(|span| {
            span.end = span.end.min(cut);
            !span.is_empty()
        });
    }

    /// Indent every line after the first by `width` spaces
    pub fn pad_continuation_lines(&mut self, width: usize) {
        if width == 0 || !self.plain.contains('\n') {
            return;
        }
        let newlines: Vec<usize> = self.plain.match_indices('\n').map(|(pos, _)| pos).collect();
        // Shift of the character at `pos`
        let shift = |pos: usize| width * newlines.iter().take_while(|&&nl| nl < pos).count();

        for span in &mut self.spans {
            let last = span.end - 1;
            span.start += shift(span.start);
            span.end = last + shift(last) + 1;
        }
        self.plain = self.plain.replace('\n', &format!("\n{}", " ".repeat(width)));
    }

    /// Render to a string, with ANSI styling when `color` is set
    pub fn render(&self, color: bool) -> String {
        if !color {
            return self.plain.clone();
        }

        let mut bounds: Vec<usize> = vec![0, self.plain.len()];
        for span in &self.spans {
            bounds.push(span.start);
            bounds.push(span.end);
        }
        bounds.sort_unstable();
        bounds.dedup();

        let mut out = String::with_capacity(self.plain.len());
        for pair in bounds.windows(2) {
            let (start, end) = (pair[0], pair[1]);
            if start >= end {
                continue;
            }
            let segment = &self.plain[start..end];
            let style = self.style_at(start);
            if style.is_default() {
                out.push_str(segment);
            } else {
                let _ = write!(out, "{}", StyledContent::new(style.to_content_style(), segment));
            }
        }
        out
    }
}

impl From<&str> for Text {
    fn from(s: &str) -> Self {
        Text::new(s)
    }
}

impl From<String> for Text {
    fn from(s: String) -> Self {
        Text::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{Color, Tag};

    #[test]
    fn test_append_and_stylize() {
        let mut text = Text::new("abc");
        text.append("def", Some(Style::fg(Color::Ansi(1))));
        assert_eq!(text.plain, "abcdef");
        assert_eq!(text.spans, vec![Span::new(3, 6, Style::fg(Color::Ansi(1)))]);
    }

    #[test]
    fn test_empty_spans_ignored() {
        let mut text = Text::new("abc");
        text.stylize(2, 2, Style::default().with_bold());
        text.stylize(0, 2, Style::default());
        assert!(text.spans.is_empty());
    }

    #[test]
    fn test_append_text_offsets_spans() {
        let mut first = Text::new("ab");
        let mut second = Text::styled("cd", Style::default().with_bold());
        second.stylize(1, 2, Style::fg(Color::Ansi(2)));
        first.append_text(&second);
        assert_eq!(first.plain, "abcd");
        assert_eq!(first.style_at(2).bold, Some(true));
        assert_eq!(first.style_at(3).fg, Some(Color::Ansi(2)));
        assert!(first.style_at(0).is_default());
    }

    #[test]
    fn test_later_spans_win() {
        let mut text = Text::new("x");
        text.stylize(0, 1, Style::fg(Color::Ansi(1)).with_bold());
        text.stylize(0, 1, Style::fg(Color::Ansi(2)));
        let style = text.style_at(0);
        assert_eq!(style.fg, Some(Color::Ansi(2)));
        assert_eq!(style.bold, Some(true));
    }

    #[test]
    fn test_highlight_uses_theme() {
        let mut text = Text::new("x = 42");
        text.highlight(&Highlighter::new(), &Theme::default());
        assert_eq!(text.style_at(4), Theme::default().style_for(Tag::Number));
        assert_eq!(text.style_at(2), Theme::default().style_for(Tag::Punctuation));
        assert!(text.style_at(0).is_default());
    }

    #[test]
    fn test_render_plain_and_colored() {
        let mut text = Text::new("hi there");
        text.stylize(0, 2, Style::default().with_bold());
        assert_eq!(text.render(false), "hi there");

        let colored = text.render(true);
        assert!(colored.contains("\x1b[1m"));
        assert!(colored.contains("hi"));
        assert!(colored.ends_with(" there"));
    }

    #[test]
    fn test_pad_continuation_lines() {
        let mut text = Text::new("a\nbc\nd");
        text.stylize(0, 2, Style::default().with_bold());
        text.stylize(3, 4, Style::fg(Color::Ansi(1)));
        text.pad_continuation_lines(2);
        assert_eq!(text.plain, "a\n  bc\n  d");
        assert_eq!(text.spans[0], Span::new(0, 2, Style::default().with_bold()));
        assert_eq!(text.spans[1], Span::new(5, 6, Style::fg(Color::Ansi(1))));
    }

    #[test]
    fn test_truncate_by_width() {
        let mut text = Text::new("日本語abc");
        text.stylize(0, 12, Style::default().with_bold());
        text.truncate(5);
        assert_eq!(text.plain, "日本");
        assert_eq!(text.width(), 4);
        assert_eq!(text.spans[0].end, 6);
    }
}
