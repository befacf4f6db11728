//! Configuration file support
//!
//! Settings are read from a TOML file given on the command line.
//!
//! Example:
//! ```toml
//! color = "auto"
//!
//! [print]
//! indent = 2
//! show_guideline = false
//!
//! [status]
//! spinner = "line"
//! exit_message_style = "green bold"
//!
//! [theme]
//! inherit = true
//!
//! [theme.styles]
//! STR = "bright_green"
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::console::PrintOptions;
use crate::error::Result;
use crate::status::{Spinner, StatusOptions, DEFAULT_EXIT_STYLE, DEFAULT_SPINNER};
use crate::syntax::{Theme, ThemeDefinition};

/// When to emit ANSI styling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Only when writing to a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// Decide for an output that is or isn't a terminal
    pub fn enabled(self, is_terminal: bool) -> bool {
        match self {
            ColorChoice::Auto => is_terminal,
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

/// Status line settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatusSettings {
    pub spinner: String,
    pub exit_message_style: String,
    #[serde(flatten)]
    pub options: StatusOptions,
}

impl Default for StatusSettings {
    fn default() -> Self {
        Self {
            spinner: DEFAULT_SPINNER.to_string(),
            exit_message_style: DEFAULT_EXIT_STYLE.to_string(),
            options: StatusOptions::default(),
        }
    }
}

/// Configuration settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub color: ColorChoice,
    /// Defaults for print calls
    pub print: PrintOptions,
    pub status: StatusSettings,
    /// Theme overrides; the default theme when absent
    pub theme: Option<ThemeDefinition>,
}

impl Config {
    /// Parse config file contents
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        Spinner::named(&config.status.spinner)?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = Self::parse(&contents)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Build the configured theme
    pub fn theme(&self) -> Result<Theme> {
        match &self.theme {
            Some(definition) => Theme::from_definition(definition),
            None => Ok(Theme::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::syntax::{Color, Tag};

    #[test]
    fn test_parse_config() {
        let contents = r#"
# Comment
color = "never"

[print]
indent = 2
show_guideline = false

[status]
spinner = "line"
speed = 2.0

[theme.styles]
STR = "red"
        "#;

        let config = Config::parse(contents).unwrap();
        assert_eq!(config.color, ColorChoice::Never);
        assert_eq!(config.print.indent, 2);
        assert!(!config.print.show_guideline);
        assert_eq!(config.print.sep, " ");
        assert_eq!(config.status.spinner, "line");
        assert_eq!(config.status.exit_message_style, DEFAULT_EXIT_STYLE);
        assert_eq!(config.status.options.speed, 2.0);
        assert_eq!(config.status.options.spinner_style, "status.spinner");

        let theme = config.theme().unwrap();
        assert_eq!(theme.style_for(Tag::Str).fg, Some(Color::Ansi(1)));
        assert_eq!(theme.style_for(Tag::Number), Theme::default().style_for(Tag::Number));
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.color, ColorChoice::Auto);
        assert_eq!(config.print, PrintOptions::default());
        assert_eq!(config.status, StatusSettings::default());
        assert_eq!(config.theme().unwrap(), Theme::default());
    }

    #[test]
    fn test_theme_without_inherit() {
        let config = Config::parse("[theme]\ninherit = false\n[theme.styles]\nSTR = \"bold\"\n").unwrap();
        let theme = config.theme().unwrap();
        assert_eq!(theme.names(), vec!["STR"]);
        assert!(theme.style_for(Tag::Number).is_default());
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(Config::parse("color = \"sometimes\""), Err(Error::Config(_))));
        assert!(matches!(
            Config::parse("[status]\nspinner = \"nope\""),
            Err(Error::UnknownSpinner(_))
        ));
        let bad_style = Config::parse("[theme.styles]\nSTR = \"bold on\"").unwrap();
        assert!(bad_style.theme().is_err());
    }

    #[test]
    fn test_color_choice() {
        assert!(ColorChoice::Auto.enabled(true));
        assert!(!ColorChoice::Auto.enabled(false));
        assert!(ColorChoice::Always.enabled(false));
        assert!(!ColorChoice::Never.enabled(true));
    }
}
