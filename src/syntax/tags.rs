//! Highlight tags
//!
//! This module defines the categories the highlighter can assign to a
//! span of text, and the style each one gets in the default theme.

/// Semantic tags assigned by the highlighter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tag {
    /// All-caps tokens such as environment variable names
    Constant,
    /// Quoted string literals
    Str,
    /// Integer, decimal and hex literals
    Number,
    /// `True`
    True,
    /// `False`
    False,
    /// Quoted key followed by `: `
    DictKey,
    /// Any single non-word, non-space character
    Punctuation,
    /// `Color.RED:` style enum members
    Enum,
    /// `None`
    None,
    /// Identifier directly followed by `(`
    DataclassName,
    /// Hour of a `[HH:MM:SS]` timestamp
    Hour,
    /// Minute of a `[HH:MM:SS]` timestamp
    Minute,
    /// Second of a `[HH:MM:SS]` timestamp
    Second,
    /// Name inside `<function NAME at ADDR>`
    FunctionName,
    /// Type inside `<TYPE object at ADDR>`
    InstanceCls,
    /// Path inside `<class 'PATH'>`
    Class,
    /// Name inside `<module 'NAME'`
    Module,
    /// Path inside `from 'PATH'>`
    ModuleFrom,
    /// Address of a function or object representation
    HexAddress,
}

impl Tag {
    /// Every tag, in declaration order
    pub const ALL: [Tag; 19] = [
        Tag::Constant,
        Tag::Str,
        Tag::Number,
        Tag::True,
        Tag::False,
        Tag::DictKey,
        Tag::Punctuation,
        Tag::Enum,
        Tag::None,
        Tag::DataclassName,
        Tag::Hour,
        Tag::Minute,
        Tag::Second,
        Tag::FunctionName,
        Tag::InstanceCls,
        Tag::Class,
        Tag::Module,
        Tag::ModuleFrom,
        Tag::HexAddress,
    ];

    /// Style definition this tag gets in the default theme
    pub fn default_style(&self) -> &'static str {
        match self {
            Tag::Constant => "#ff9b54",
            Tag::Str => "sea_green2 bold",
            Tag::Number => "sky_blue1 bold",
            Tag::True => "#C5D86D bold",
            Tag::False => "#D8829D bold",
            Tag::DictKey => "#94a3b8 bold",
            Tag::Punctuation => "grey39",
            Tag::Enum => "#cdb4db",
            Tag::None => "#ffbd00 bold",
            Tag::DataclassName => "#c77dff",
            Tag::Hour | Tag::Minute | Tag::Second => "dark_slate_gray1",
            Tag::FunctionName => "green1 bold",
            Tag::InstanceCls => "medium_spring_green",
            Tag::Class => "gold3 bold",
            Tag::Module | Tag::ModuleFrom => "orange3",
            Tag::HexAddress => "dodger_blue1",
        }
    }

    /// Name used for this tag in themes and capture groups
    pub fn name(&self) -> &'static str {
        match self {
            Tag::Constant => "CONSTANT",
            Tag::Str => "STR",
            Tag::Number => "NUMBER",
            Tag::True => "TRUE",
            Tag::False => "FALSE",
            Tag::DictKey => "DICT_KEY",
            Tag::Punctuation => "PUNCTUATION",
            Tag::Enum => "ENUM",
            Tag::None => "NONE",
            Tag::DataclassName => "DATACLASS_NAME",
            Tag::Hour => "HOUR",
            Tag::Minute => "MINUTE",
            Tag::Second => "SECOND",
            Tag::FunctionName => "FUNCTION_NAME",
            Tag::InstanceCls => "INSTANCE_CLS",
            Tag::Class => "CLASS",
            Tag::Module => "MODULE",
            Tag::ModuleFrom => "MODULE_FROM",
            Tag::HexAddress => "HEX_ADDRESS",
        }
    }

    /// Parse a tag from its name (capture group or theme key)
    pub fn from_name(name: &str) -> Option<Self> {
        Tag::ALL.iter().copied().find(|tag| tag.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::style::Style;

    #[test]
    fn test_default_styles_parse() {
        for tag in Tag::ALL {
            let style = Style::parse(tag.default_style());
            assert!(style.is_ok(), "{} has an invalid default style", tag.name());
            assert!(!style.unwrap().is_default());
        }
    }

    #[test]
    fn test_from_name_roundtrip() {
        for tag in Tag::ALL {
            assert_eq!(Tag::from_name(tag.name()), Some(tag));
        }
    }

    #[test]
    fn test_from_name_invalid() {
        assert_eq!(Tag::from_name("InvalidType"), None);
        assert_eq!(Tag::from_name("str"), None);
        assert_eq!(Tag::from_name(""), None);
    }
}
