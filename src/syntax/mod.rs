//! Highlighting and styling module
//!
//! This module provides the styling infrastructure used for:
//! - Tagging data-type representations (strings, numbers, reprs, ...)
//! - Mapping tags and named styles to terminal styles through a theme

mod colors;
mod highlighter;
mod rules;
mod style;
mod tags;
mod theme;

pub use highlighter::Highlighter;
pub use rules::{Highlight, HighlightRule};
pub use style::{Color, Span, Style};
pub use tags::Tag;
pub use theme::{Theme, ThemeDefinition};
