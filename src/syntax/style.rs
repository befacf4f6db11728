//! Style types for text rendering
//!
//! This module provides the foundation for styled text rendering: colors,
//! attribute sets, the style definition parser used by themes and markup,
//! and styled byte spans.

use std::fmt;

use crossterm::style::{Attribute, Attributes, Color as TermColor, ContentStyle};

use super::colors;
use crate::error::{Error, Result};

/// Terminal colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    /// The terminal's own default color
    #[default]
    Default,
    /// Index into the 256-color palette
    Ansi(u8),
    /// 24-bit color
    Rgb(u8, u8, u8),
}

impl Color {
    /// Parse a color definition
    ///
    /// Accepts `default`, palette names (`sky_blue1`), `#rrggbb`,
    /// `rgb(r,g,b)` and `color(n)`.
    pub fn parse(definition: &str) -> Result<Self> {
        let original = definition;
        let definition = definition.trim().to_lowercase();

        if definition == "default" {
            return Ok(Color::Default);
        }

        if let Some(hex) = definition.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| Error::UnknownColor(original.to_string()));
        }

        if let Some(inner) = definition.strip_prefix("color(").and_then(|s| s.strip_suffix(')')) {
            return inner
                .trim()
                .parse::<u8>()
                .map(Color::Ansi)
                .map_err(|_| Error::UnknownColor(original.to_string()));
        }

        if let Some(inner) = definition.strip_prefix("rgb(").and_then(|s| s.strip_suffix(')')) {
            let parts: Vec<_> = inner.split(',').map(|p| p.trim().parse::<u8>()).collect();
            return match parts.as_slice() {
                [Ok(r), Ok(g), Ok(b)] => Ok(Color::Rgb(*r, *g, *b)),
                _ => Err(Error::UnknownColor(original.to_string())),
            };
        }

        colors::ansi_index(&definition)
            .map(Color::Ansi)
            .ok_or_else(|| Error::UnknownColor(original.to_string()))
    }

    /// Convert to the crossterm color used when rendering
    pub fn to_term_color(self) -> TermColor {
        match self {
            Color::Default => TermColor::Reset,
            Color::Ansi(0) => TermColor::Black,
            Color::Ansi(1) => TermColor::DarkRed,
            Color::Ansi(2) => TermColor::DarkGreen,
            Color::Ansi(3) => TermColor::DarkYellow,
            Color::Ansi(4) => TermColor::DarkBlue,
            Color::Ansi(5) => TermColor::DarkMagenta,
            Color::Ansi(6) => TermColor::DarkCyan,
            Color::Ansi(7) => TermColor::Grey,
            Color::Ansi(8) => TermColor::DarkGrey,
            Color::Ansi(9) => TermColor::Red,
            Color::Ansi(10) => TermColor::Green,
            Color::Ansi(11) => TermColor::Yellow,
            Color::Ansi(12) => TermColor::Blue,
            Color::Ansi(13) => TermColor::Magenta,
            Color::Ansi(14) => TermColor::Cyan,
            Color::Ansi(15) => TermColor::White,
            Color::Ansi(n) => TermColor::AnsiValue(n),
            Color::Rgb(r, g, b) => TermColor::Rgb { r, g, b },
        }
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Text style attributes
///
/// Every field is optional: an unset field lets the style underneath show
/// through when styles are layered with [`Style::combine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    /// Foreground color
    pub fg: Option<Color>,
    /// Background color
    pub bg: Option<Color>,
    /// Bold text
    pub bold: Option<bool>,
    /// Dim/faint text
    pub dim: Option<bool>,
    /// Italic text
    pub italic: Option<bool>,
    /// Underlined text
    pub underline: Option<bool>,
    /// Blinking text
    pub blink: Option<bool>,
    /// Reverse video (swap fg/bg)
    pub reverse: Option<bool>,
    /// Struck-through text
    pub strike: Option<bool>,
}

impl Style {
    /// Create a style with just foreground color
    pub fn fg(color: Color) -> Self {
        Self {
            fg: Some(color),
            ..Default::default()
        }
    }

    /// Create a style with just background color
    pub fn bg(color: Color) -> Self {
        Self {
            bg: Some(color),
            ..Default::default()
        }
    }

    /// Builder: set foreground color
    pub fn with_fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    /// Builder: set background color
    pub fn with_bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    /// Builder: set bold
    pub fn with_bold(mut self) -> Self {
        self.bold = Some(true);
        self
    }

    /// Builder: set dim
    pub fn with_dim(mut self) -> Self {
        self.dim = Some(true);
        self
    }

    /// Builder: set reverse
    pub fn with_reverse(mut self) -> Self {
        self.reverse = Some(true);
        self
    }

    /// Check if this is the default (no styling)
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Parse a style definition such as `"sea_green2 bold"` or
    /// `"bold white on #202020"`.
    pub fn parse(definition: &str) -> Result<Self> {
        let mut style = Style::default();
        let mut words = definition.split_whitespace();

        while let Some(word) = words.next() {
            let lower = word.to_lowercase();
            match lower.as_str() {
                "none" => return Ok(Style::default()),
                "on" => {
                    let color = words
                        .next()
                        .ok_or_else(|| Error::invalid_style(definition, "color expected after 'on'"))?;
                    style.bg = Some(Color::parse(color).map_err(|e| Error::invalid_style(definition, e.to_string()))?);
                }
                "not" => {
                    let attribute = words
                        .next()
                        .ok_or_else(|| Error::invalid_style(definition, "attribute expected after 'not'"))?;
                    if !style.set_attribute(&attribute.to_lowercase(), false) {
                        return Err(Error::invalid_style(
                            definition,
                            format!("expected attribute after 'not', found {attribute:?}"),
                        ));
                    }
                }
                _ => {
                    if !style.set_attribute(&lower, true) {
                        style.fg = Some(Color::parse(word).map_err(|e| Error::invalid_style(definition, e.to_string()))?);
                    }
                }
            }
        }

        Ok(style)
    }

    fn set_attribute(&mut self, name: &str, value: bool) -> bool {
        let slot = match name {
            "bold" | "b" => &mut self.bold,
            "dim" | "d" => &mut self.dim,
            "italic" | "i" => &mut self.italic,
            "underline" | "u" => &mut self.underline,
            "blink" => &mut self.blink,
            "reverse" | "r" => &mut self.reverse,
            "strike" | "s" => &mut self.strike,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Layer `other` on top of this style
    ///
    /// Fields set in `other` win; fields it leaves unset keep this style's value.
    pub fn combine(&self, other: &Style) -> Style {
        Style {
            fg: other.fg.or(self.fg),
            bg: other.bg.or(self.bg),
            bold: other.bold.or(self.bold),
            dim: other.dim.or(self.dim),
            italic: other.italic.or(self.italic),
            underline: other.underline.or(self.underline),
            blink: other.blink.or(self.blink),
            reverse: other.reverse.or(self.reverse),
            strike: other.strike.or(self.strike),
        }
    }

    /// Convert to a crossterm content style
    pub fn to_content_style(&self) -> ContentStyle {
        let mut attributes = Attributes::default();
        let flags = [
            (self.bold, Attribute::Bold),
            (self.dim, Attribute::Dim),
            (self.italic, Attribute::Italic),
            (self.underline, Attribute::Underlined),
            (self.blink, Attribute::SlowBlink),
            (self.reverse, Attribute::Reverse),
            (self.strike, Attribute::CrossedOut),
        ];
        for (flag, attribute) in flags {
            if flag == Some(true) {
                attributes.set(attribute);
            }
        }

        ContentStyle {
            foreground_color: self.fg.map(Color::to_term_color),
            background_color: self.bg.map(Color::to_term_color),
            underline_color: None,
            attributes,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Default => write!(f, "default"),
            Color::Ansi(n) => write!(f, "color({n})"),
            Color::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
        }
    }
}

/// A styled span of text within a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Byte offset where this span starts (inclusive)
    pub start: usize,
    /// Byte offset where this span ends (exclusive)
    pub end: usize,
    /// Style to apply to this span
    pub style: Style,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize, style: Style) -> Self {
        Self { start, end, style }
    }

    /// Check if this span contains a byte position
    pub fn contains(&self, pos: usize) -> bool {
        pos >= self.start && pos < self.end
    }

    /// Get the length of this span in bytes
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if span is empty
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}
