//! Structural pretty-printing and render hooks
//!
//! Values are pretty-printed through their `Debug` representation. The
//! compact `{:?}` form is used when it fits the available width; otherwise
//! the `{:#?}` form is used, which always indents nested structures by four
//! spaces. [`Pretty`] re-lays that indentation with a configurable width and
//! optional guide lines.

use std::fmt::Debug;

use unicode_width::UnicodeWidthStr;

use crate::syntax::{Highlighter, Theme};
use crate::text::Text;

/// Indent width of Rust's alternate `Debug` output
const DEBUG_INDENT: usize = 4;

/// Guide drawn at each indentation level
const INDENT_GUIDE: char = '│';

/// A structurally formatted value
#[derive(Debug, Clone, PartialEq)]
pub struct Pretty {
    /// Single-line `{:?}` representation
    pub compact: String,
    /// Multi-line `{:#?}` representation
    pub expanded: String,
    /// Spaces per nesting level
    pub indent_size: usize,
    /// Draw a guide line at each nesting level
    pub indent_guides: bool,
}

impl Pretty {
    /// Create from an already formatted representation
    pub fn new(repr: impl Into<String>) -> Self {
        let repr = repr.into();
        Self {
            compact: repr.clone(),
            expanded: repr,
            indent_size: DEBUG_INDENT,
            indent_guides: false,
        }
    }

    /// Create from any `Debug` value
    pub fn of<T: Debug + ?Sized>(value: &T) -> Self {
        Self {
            compact: format!("{value:?}"),
            expanded: format!("{value:#?}"),
            indent_size: DEBUG_INDENT,
            indent_guides: false,
        }
    }

    /// Check if the value is a container that can span several lines
    pub fn is_expandable(&self) -> bool {
        self.expanded.contains('\n')
    }

    /// Lay out the representation and highlight it
    ///
    /// The compact form is kept when it is no wider than `max_width`.
    pub fn render(&self, highlighter: &Highlighter, theme: &Theme, max_width: usize) -> Text {
        if !self.is_expandable() || self.compact.width() <= max_width {
            let mut text = Text::new(self.compact.as_str());
            text.highlight(highlighter, theme);
            return text;
        }

        let draw_guides = self.indent_guides && self.indent_size > 0;
        let mut plain = String::with_capacity(self.expanded.len());
        let mut guides = Vec::new();

        for (i, line) in self.expanded.split('\n').enumerate() {
            if i > 0 {
                plain.push('\n');
            }
            let content = line.trim_start_matches(' ');
            let leading = line.len() - content.len();

            for _ in 0..leading / DEBUG_INDENT {
                if draw_guides {
                    let start = plain.len();
                    plain.push(INDENT_GUIDE);
                    guides.push((start, plain.len()));
                    plain.push_str(&" ".repeat(self.indent_size - 1));
                } else {
                    plain.push_str(&" ".repeat(self.indent_size));
                }
            }
            plain.push_str(&" ".repeat(leading % DEBUG_INDENT));
            plain.push_str(content);
        }

        let mut text = Text::new(plain);
        text.highlight(highlighter, theme);
        let guide_style = theme.get("repr.indent").unwrap_or_default();
        for (start, end) in guides {
            text.stylize(start, end, guide_style);
        }
        text
    }
}

/// Something the console can print
#[derive(Debug, Clone, PartialEq)]
pub enum Renderable {
    /// Already styled text
    Text(Text),
    /// A structurally formatted value
    Pretty(Pretty),
}

impl Renderable {
    /// Check if this starts on a line of its own
    pub fn is_block(&self) -> bool {
        matches!(self, Renderable::Pretty(pretty) if pretty.is_expandable())
    }

    /// Produce the styled text to write, at most `max_width` wide when possible
    pub fn render(&self, highlighter: &Highlighter, theme: &Theme, max_width: usize) -> Text {
        match self {
            Renderable::Text(text) => text.clone(),
            Renderable::Pretty(pretty) => pretty.render(highlighter, theme, max_width),
        }
    }
}

/// Hook that can rewrite renderables before the console prints them
pub trait RenderHook {
    /// Process the renderables of one print call
    fn process_renderables(&self, renderables: Vec<Renderable>) -> Vec<Renderable>;
}

/// Applies indentation settings to every [`Pretty`] renderable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrettyIndentHook {
    /// Spaces per nesting level
    pub indent_size: usize,
    /// Draw indentation guides
    pub indent_guides: bool,
}

impl PrettyIndentHook {
    /// Create a new hook
    pub fn new(indent_size: usize, indent_guides: bool) -> Self {
        Self {
            indent_size,
            indent_guides,
        }
    }
}

impl RenderHook for PrettyIndentHook {
    fn process_renderables(&self, renderables: Vec<Renderable>) -> Vec<Renderable> {
        renderables
            .into_iter()
            .map(|renderable| match renderable {
                Renderable::Pretty(mut pretty) => {
                    pretty.indent_size = self.indent_size;
                    pretty.indent_guides = self.indent_guides;
                    Renderable::Pretty(pretty)
                }
                other => other,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Tag;

    fn layout(pretty: &Pretty) -> String {
        pretty.render(&Highlighter::empty(), &Theme::default(), 0).plain
    }

    #[test]
    fn test_default_layout_matches_debug() {
        let pretty = Pretty::of(&vec![1, 2]);
        assert_eq!(layout(&pretty), "[\n    1,\n    2,\n]");
    }

    #[test]
    fn test_compact_when_it_fits() {
        let pretty = Pretty::of(&vec![1, 2]);
        let theme = Theme::default();
        let text = pretty.render(&Highlighter::new(), &theme, 6);
        assert_eq!(text.plain, "[1, 2]");
        assert_eq!(text.style_at(1), theme.style_for(Tag::Number));
        assert_eq!(pretty.render(&Highlighter::empty(), &theme, 5).plain, "[\n    1,\n    2,\n]");
    }

    #[test]
    fn test_scalars_are_not_expandable() {
        assert!(!Pretty::of(&42).is_expandable());
        assert!(Pretty::of(&vec![1]).is_expandable());
        assert_eq!(layout(&Pretty::of(&Vec::<u8>::new())), "[]");
        assert!(Renderable::Pretty(Pretty::of(&vec![1])).is_block());
        assert!(!Renderable::Pretty(Pretty::of(&1)).is_block());
        assert!(!Renderable::Text(Text::new("[1]")).is_block());
    }

    #[test]
    fn test_custom_indent() {
        let mut pretty = Pretty::of(&vec![vec![1]]);
        pretty.indent_size = 2;
        assert_eq!(layout(&pretty), "[\n  [\n    1,\n  ],\n]");
    }

    #[test]
    fn test_indent_guides() {
        let mut pretty = Pretty::of(&vec![vec![1]]);
        pretty.indent_guides = true;
        assert_eq!(layout(&pretty), "[\n│   [\n│   │   1,\n│   ],\n]");
    }

    #[test]
    fn test_guides_styled_as_repr_indent() {
        let mut pretty = Pretty::of(&vec![1]);
        pretty.indent_guides = true;
        let theme = Theme::default();
        let text = pretty.render(&Highlighter::new(), &theme, 0);
        let guide = text.plain.find(INDENT_GUIDE).unwrap();
        let expected = theme
            .style_for(Tag::Punctuation)
            .combine(&theme.get("repr.indent").unwrap());
        assert_eq!(text.style_at(guide), expected);
    }

    #[test]
    fn test_zero_indent_disables_guides() {
        let mut pretty = Pretty::of(&vec![1]);
        pretty.indent_size = 0;
        pretty.indent_guides = true;
        assert_eq!(layout(&pretty), "[\n1,\n]");
    }

    #[test]
    fn test_rendered_values_are_highlighted() {
        let pretty = Pretty::of(&Some("text"));
        let theme = Theme::default();
        let text = pretty.render(&Highlighter::new(), &theme, 0);
        assert_eq!(text.plain, "Some(\n    \"text\",\n)");
        assert_eq!(text.style_at(0), theme.style_for(Tag::DataclassName));
        let quote = text.plain.find("text").unwrap();
        assert_eq!(text.style_at(quote), theme.style_for(Tag::Str));
    }

    #[test]
    fn test_hook_sets_indent_on_pretty_only() {
        let hook = PrettyIndentHook::new(2, true);
        let processed = hook.process_renderables(vec![
            Renderable::Text(Text::new("plain")),
            Renderable::Pretty(Pretty::new("[]")),
        ]);
        assert_eq!(processed[0], Renderable::Text(Text::new("plain")));
        match &processed[1] {
            Renderable::Pretty(pretty) => {
                assert_eq!(pretty.indent_size, 2);
                assert!(pretty.indent_guides);
            }
            other => panic!("expected pretty, got {other:?}"),
        }
    }
}
