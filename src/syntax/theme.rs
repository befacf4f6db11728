//! Themes: style names mapped to styles
//!
//! A theme holds the style of every highlight tag plus the handful of
//! named styles the console uses itself (indent guides, the spinner,
//! log timestamps, attribute words usable in markup).

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::style::Style;
use super::tags::Tag;
use crate::error::Result;

/// Styles every inheriting theme starts from
const BASE_STYLES: &[(&str, &str)] = &[
    ("none", "none"),
    ("reset", "default on default not bold not dim not italic not underline not blink not reverse not strike"),
    ("bold", "bold"),
    ("dim", "dim"),
    ("italic", "italic"),
    ("underline", "underline"),
    ("blink", "blink"),
    ("reverse", "reverse"),
    ("strike", "strike"),
    ("repr.indent", "green dim"),
    ("status.spinner", "green"),
    ("log.time", "cyan dim"),
];

/// A theme as written in a TOML file
///
/// ```toml
/// inherit = true
///
/// [styles]
/// STR = "green bold"
/// NUMBER = "#ffaa00"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeDefinition {
    /// Start from the default theme before applying `styles`
    #[serde(default = "default_inherit")]
    pub inherit: bool,
    /// Style name to style definition
    #[serde(default)]
    pub styles: BTreeMap<String, String>,
}

fn default_inherit() -> bool {
    true
}

/// Mapping from style name to style
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    styles: HashMap<String, Style>,
}

impl Theme {
    /// Create a theme with no styles at all
    pub fn empty() -> Self {
        Self {
            styles: HashMap::new(),
        }
    }

    /// Create a theme from style definitions
    ///
    /// With `inherit`, the definitions are layered over the default theme.
    pub fn new<'a, I>(styles: I, inherit: bool) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut theme = if inherit { Theme::default() } else { Theme::empty() };
        for (name, definition) in styles {
            theme.set(name, definition)?;
        }
        Ok(theme)
    }

    /// Build a theme from its TOML definition
    pub fn from_definition(definition: &ThemeDefinition) -> Result<Self> {
        let theme = Theme::new(
            definition.styles.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            definition.inherit,
        )?;
        log::debug!(
            "theme built with {} styles (inherit = {})",
            theme.styles.len(),
            definition.inherit
        );
        Ok(theme)
    }

    /// Parse a theme from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let definition: ThemeDefinition = toml::from_str(contents)?;
        Self::from_definition(&definition)
    }

    /// Load a theme from a TOML file
    pub fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Define or replace a named style
    pub fn set(&mut self, name: &str, definition: &str) -> Result<()> {
        let style = Style::parse(definition)?;
        self.styles.insert(name.to_string(), style);
        Ok(())
    }

    /// Look up a named style
    pub fn get(&self, name: &str) -> Option<Style> {
        self.styles.get(name).copied()
    }

    /// Style for a highlight tag; no styling when the theme lacks it
    pub fn style_for(&self, tag: Tag) -> Style {
        self.get(tag.name()).unwrap_or_default()
    }

    /// Names of all styles, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.styles.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }
}

impl Default for Theme {
    /// Base styles plus the default style of every tag
    fn default() -> Self {
        let definitions = BASE_STYLES
            .iter()
            .copied()
            .chain(Tag::ALL.iter().map(|tag| (tag.name(), tag.default_style())));

        let mut styles = HashMap::new();
        for (name, definition) in definitions {
            match Style::parse(definition) {
                Ok(style) => {
                    styles.insert(name.to_string(), style);
                }
                Err(e) => log::warn!("skipping default style {name}: {e}"),
            }
        }
        Self { styles }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::style::Color;

    #[test]
    fn test_default_theme_covers_every_tag() {
        let theme = Theme::default();
        for tag in Tag::ALL {
            assert!(theme.get(tag.name()).is_some(), "missing {}", tag.name());
        }
        assert_eq!(theme.style_for(Tag::Class), Style::parse("gold3 bold").unwrap());
    }

    #[test]
    fn test_default_theme_has_base_styles() {
        let theme = Theme::default();
        for (name, _) in BASE_STYLES {
            assert!(theme.get(name).is_some(), "missing {name}");
        }
    }

    #[test]
    fn test_missing_tag_falls_back_to_no_style() {
        let theme = Theme::new([("STR", "red")], false).unwrap();
        assert_eq!(theme.style_for(Tag::Str).fg, Some(Color::Ansi(1)));
        assert!(theme.style_for(Tag::Number).is_default());
    }

    #[test]
    fn test_inherit_layers_over_defaults() {
        let theme = Theme::new([("STR", "red")], true).unwrap();
        assert_eq!(theme.style_for(Tag::Str), Style::fg(Color::Ansi(1)));
        assert_eq!(theme.style_for(Tag::Number), Style::parse("sky_blue1 bold").unwrap());
    }

    #[test]
    fn test_invalid_definition_is_error() {
        assert!(Theme::new([("STR", "on")], true).is_err());
    }

    #[test]
    fn test_from_toml() {
        let contents = r##"
inherit = false

[styles]
NUMBER = "#ffaa00 italic"
"repr.indent" = "blue"
        "##;
        let theme = Theme::from_toml(contents).unwrap();
        assert_eq!(theme.names(), vec!["NUMBER", "repr.indent"]);
        let number = theme.style_for(Tag::Number);
        assert_eq!(number.fg, Some(Color::Rgb(0xff, 0xaa, 0x00)));
        assert_eq!(number.italic, Some(true));
    }

    #[test]
    fn test_from_toml_defaults_to_inherit() {
        let theme = Theme::from_toml("[styles]\nSTR = \"red\"\n").unwrap();
        assert!(theme.get("status.spinner").is_some());
        assert!(theme.get("NONE").is_some());
    }

    #[test]
    fn test_from_toml_rejects_bad_toml() {
        assert!(Theme::from_toml("styles = 3").is_err());
    }
}
