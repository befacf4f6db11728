//! The data-type highlighter
//!
//! An ordered list of [`HighlightRule`]s that tags the pieces of a value's
//! textual representation: literals, keys, punctuation, timestamps and
//! object reprs. Rule order matters. Within a rule the leftmost match wins;
//! across rules, a later rule paints over an earlier one when the result is
//! flattened with [`Highlighter::resolve`] or rendered.

use super::rules::{
    after_non_word, after_non_word_or_escape, after_space_or_start, Highlight, HighlightRule,
};
use super::tags::Tag;

/// Quoted string literal bodies, excluding newlines, honoring backslash escapes
const STRING_PATTERN: &str = concat!(
    r#"(?P<STR>b?'''(?:[^\\\n]|\\.)*?'''"#,
    r#"|b?'(?:[^'\\\n]|\\.)*'"#,
    r#"|b?"""(?:[^\\\n]|\\.)*?""""#,
    r#"|b?"(?:[^"\\\n]|\\.)*")"#,
);

/// A complete highlighter: rules applied in order
pub struct Highlighter {
    /// Rules in evaluation order
    rules: Vec<HighlightRule>,
}

impl Highlighter {
    /// Create a highlighter with no rules
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Create the built-in data-type highlighter
    pub fn new() -> Self {
        let mut highlighter = Self::empty();

        let rules = [
            HighlightRule::new("constant", r"(?P<CONSTANT>[A-Z_]+)(?:[\s,]|$)")
                .map(|r| r.preceded_by(after_space_or_start)),
            HighlightRule::new("string", STRING_PATTERN).map(|r| r.preceded_by(after_non_word_or_escape)),
            HighlightRule::new(
                "number",
                r"(?P<NUMBER>0x[0-9a-fA-F]+|-?[0-9]+\.?[0-9]*(?:e[-+]?[0-9]+)?\b)",
            )
            .map(|r| r.preceded_by(after_non_word)),
            HighlightRule::new("true", r"\b(?P<TRUE>True|true)\b"),
            HighlightRule::new("false", r"\b(?P<FALSE>False|false)\b"),
            HighlightRule::new("none", r"\b(?P<NONE>None)\b"),
            HighlightRule::new("enum", r"(?P<ENUM>[A-Za-z_]\w*\.[A-Z_][A-Z0-9_]*):"),
            HighlightRule::new("dataclass", r"(?P<DATACLASS_NAME>[A-Za-z_]\w*)\("),
            HighlightRule::new(
                "dict_key",
                r#"(?P<DICT_KEY>'(?:[^'\\\n]|\\.)*'|"(?:[^"\\\n]|\\.)*"): "#,
            ),
            HighlightRule::new("punctuation", r"(?P<PUNCTUATION>[^\w\s])"),
            HighlightRule::new(
                "timestamp",
                r"(?m)^\[(?P<HOUR>2[0-3]|[01][0-9]):(?P<MINUTE>[0-5][0-9]):(?P<SECOND>[0-5][0-9])\]",
            ),
            HighlightRule::new(
                "function",
                r"<function (?P<FUNCTION_NAME>\S+) at (?P<HEX_ADDRESS>[a-zA-Z0-9]+)>",
            ),
            HighlightRule::new(
                "instance",
                r"<(?P<INSTANCE_CLS>\S+) object at (?P<HEX_ADDRESS>[a-zA-Z0-9]+)>",
            ),
            HighlightRule::new("class", r"<class '(?P<CLASS>[\w.]+)'>"),
            HighlightRule::new("module", r"<module '(?P<MODULE>\S+)'"),
            HighlightRule::new("module_from", r"from '(?P<MODULE_FROM>\S+)'>"),
        ];

        for rule in rules {
            match rule {
                Ok(rule) => highlighter.add_rule(rule),
                Err(e) => log::warn!("skipping highlight rule: {e}"),
            }
        }

        highlighter
    }

    /// Append a rule; it is evaluated after every existing rule
    pub fn add_rule(&mut self, rule: HighlightRule) {
        self.rules.push(rule);
    }

    /// Names of the rules in evaluation order
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name.as_str()).collect()
    }

    /// Tag a line of text
    ///
    /// Returns every rule's highlights, grouped in rule order. Highlights
    /// from different rules may overlap.
    pub fn highlight(&self, text: &str) -> Vec<Highlight> {
        self.rules.iter().flat_map(|rule| rule.highlights(text)).collect()
    }

    /// Tag a line of text and flatten the result
    ///
    /// Later rules win where highlights overlap. The result is sorted,
    /// non-overlapping, and adjacent ranges with the same tag are merged.
    pub fn resolve(&self, text: &str) -> Vec<Highlight> {
        let mut painted: Vec<Option<Tag>> = vec![None; text.len()];
        for highlight in self.highlight(text) {
            for slot in &mut painted[highlight.start..highlight.end] {
                *slot = Some(highlight.tag);
            }
        }

        let mut resolved: Vec<Highlight> = Vec::new();
        for (pos, slot) in painted.into_iter().enumerate() {
            let Some(tag) = slot else {
                continue;
            };
            match resolved.last_mut() {
                Some(last) if last.end == pos && last.tag == tag => last.end = pos + 1,
                _ => resolved.push(Highlight::new(pos, pos + 1, tag)),
            }
        }
        resolved
    }

    /// The tag that wins at a byte position, if any
    pub fn tag_at(&self, text: &str, pos: usize) -> Option<Tag> {
        self.highlight(text)
            .iter()
            .rev()
            .find(|h| pos >= h.start && pos < h.end)
            .map(|h| h.tag)
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged<'a>(text: &'a str, highlights: &[Highlight], tag: Tag) -> Vec<&'a str> {
        highlights.iter().filter(|h| h.tag == tag).map(|h| h.text(text)).collect()
    }

    #[test]
    fn test_all_rules_compile() {
        let highlighter = Highlighter::new();
        assert_eq!(
            highlighter.rule_names(),
            vec![
                "constant", "string", "number", "true", "false", "none", "enum", "dataclass",
                "dict_key", "punctuation", "timestamp", "function", "instance", "class", "module",
                "module_from",
            ]
        );
    }

    #[test]
    fn test_literals_are_tagged_without_overlap() {
        let highlighter = Highlighter::new();
        let text = "'hello' 42 True False None";
        let found = highlighter.highlight(text);

        assert_eq!(tagged(text, &found, Tag::Str), vec!["'hello'"]);
        assert_eq!(tagged(text, &found, Tag::Number), vec!["42"]);
        assert_eq!(tagged(text, &found, Tag::True), vec!["True"]);
        assert_eq!(tagged(text, &found, Tag::False), vec!["False"]);
        assert_eq!(tagged(text, &found, Tag::None), vec!["None"]);

        let literals: Vec<_> = found
            .iter()
            .filter(|h| matches!(h.tag, Tag::Str | Tag::Number | Tag::True | Tag::False | Tag::None))
            .collect();
        for (i, a) in literals.iter().enumerate() {
            for b in &literals[i + 1..] {
                assert!(a.end <= b.start || b.end <= a.start, "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn test_constant_assignment_is_not_dict_key() {
        let highlighter = Highlighter::new();
        let text = "CONST_NAME = 'value'";
        let found = highlighter.highlight(text);

        assert_eq!(tagged(text, &found, Tag::Constant), vec!["CONST_NAME"]);
        assert_eq!(tagged(text, &found, Tag::Str), vec!["'value'"]);
        assert!(tagged(text, &found, Tag::DictKey).is_empty());
        assert_eq!(highlighter.tag_at(text, 0), Some(Tag::Constant));
        assert_eq!(highlighter.tag_at(text, 15), Some(Tag::Str));
    }

    #[test]
    fn test_dict_key_and_value() {
        let highlighter = Highlighter::new();
        let text = "{'key': 1}";
        let found = highlighter.highlight(text);

        assert_eq!(tagged(text, &found, Tag::DictKey), vec!["'key'"]);
        assert_eq!(tagged(text, &found, Tag::Number), vec!["1"]);
        // DICT_KEY is evaluated after STR and wins inside the key
        assert_eq!(highlighter.tag_at(text, 2), Some(Tag::DictKey));
        assert_eq!(highlighter.tag_at(text, 8), Some(Tag::Number));
    }

    #[test]
    fn test_double_quoted_dict_keys() {
        let highlighter = Highlighter::new();
        let text = r#"{"a": 1, "b": 2}"#;
        let found = highlighter.highlight(text);
        assert_eq!(tagged(text, &found, Tag::DictKey), vec![r#""a""#, r#""b""#]);
    }

    #[test]
    fn test_class_repr() {
        let highlighter = Highlighter::new();
        let text = "<class 'pkg.Mod'>";
        let found = highlighter.highlight(text);

        assert_eq!(tagged(text, &found, Tag::Class), vec!["pkg.Mod"]);
        // CLASS is evaluated after STR and PUNCTUATION
        assert_eq!(highlighter.tag_at(text, 8), Some(Tag::Class));
        assert_eq!(highlighter.tag_at(text, 11), Some(Tag::Class));
    }

    #[test]
    fn test_function_and_instance_reprs() {
        let highlighter = Highlighter::new();

        let text = "<function main at 0x7f3a2c>";
        let found = highlighter.highlight(text);
        assert_eq!(tagged(text, &found, Tag::FunctionName), vec!["main"]);
        assert_eq!(tagged(text, &found, Tag::HexAddress), vec!["0x7f3a2c"]);

        let text = "<app.Worker object at 0x10ab>";
        let found = highlighter.highlight(text);
        assert_eq!(tagged(text, &found, Tag::InstanceCls), vec!["app.Worker"]);
        assert_eq!(tagged(text, &found, Tag::HexAddress), vec!["0x10ab"]);
    }

    #[test]
    fn test_module_repr() {
        let highlighter = Highlighter::new();
        let text = "<module 'os' from '/usr/lib/os.py'>";
        let found = highlighter.highlight(text);
        assert_eq!(tagged(text, &found, Tag::Module), vec!["os"]);
        assert_eq!(tagged(text, &found, Tag::ModuleFrom), vec!["/usr/lib/os.py"]);
    }

    #[test]
    fn test_timestamp_only_at_line_start() {
        let highlighter = Highlighter::new();
        let text = "[12:34:56] started";
        let found = highlighter.highlight(text);
        assert_eq!(tagged(text, &found, Tag::Hour), vec!["12"]);
        assert_eq!(tagged(text, &found, Tag::Minute), vec!["34"]);
        assert_eq!(tagged(text, &found, Tag::Second), vec!["56"]);

        let text = "at [12:34:56]";
        assert!(tagged(text, &highlighter.highlight(text), Tag::Hour).is_empty());

        let text = "[25:00:00]";
        assert!(tagged(text, &highlighter.highlight(text), Tag::Hour).is_empty());
    }

    #[test]
    fn test_enum_and_dataclass() {
        let highlighter = Highlighter::new();
        let text = "<Color.RED: 1> Point(x=1)";
        let found = highlighter.highlight(text);
        assert_eq!(tagged(text, &found, Tag::Enum), vec!["Color.RED"]);
        assert_eq!(tagged(text, &found, Tag::DataclassName), vec!["Point"]);
    }

    #[test]
    fn test_dataclass_over_matches_calls() {
        // Any identifier before '(' is tagged, including plain calls
        let highlighter = Highlighter::new();
        let text = "print(x)";
        assert_eq!(tagged(text, &highlighter.highlight(text), Tag::DataclassName), vec!["print"]);
    }

    #[test]
    fn test_numbers() {
        let highlighter = Highlighter::new();
        let text = "-3 2.5 1e10 0xff v2";
        let found = highlighter.highlight(text);
        assert_eq!(tagged(text, &found, Tag::Number), vec!["-3", "2.5", "1e10", "0xff"]);
    }

    #[test]
    fn test_strings_respect_escapes_and_prefixes() {
        let highlighter = Highlighter::new();
        let text = r#"b'raw' "say \"hi\"" don't"#;
        let found = highlighter.highlight(text);
        assert_eq!(tagged(text, &found, Tag::Str), vec!["b'raw'", r#""say \"hi\"""#]);
    }

    #[test]
    fn test_booleans_are_whole_words() {
        let highlighter = Highlighter::new();
        let text = "IsTrue Nonetheless true";
        let found = highlighter.highlight(text);
        assert_eq!(tagged(text, &found, Tag::True), vec!["true"]);
        assert!(tagged(text, &found, Tag::None).is_empty());
    }

    #[test]
    fn test_resolve_flattens_in_rule_order() {
        let highlighter = Highlighter::new();
        let text = "{'key': 1}";
        let resolved = highlighter.resolve(text);

        for pair in resolved.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
        assert!(resolved.contains(&Highlight::new(2, 5, Tag::DictKey)));
        assert!(resolved.contains(&Highlight::new(8, 9, Tag::Number)));
        // The quotes are punctuation, which is painted after DICT_KEY,
        // and merge with the neighbouring brace and colon
        assert!(resolved.contains(&Highlight::new(0, 2, Tag::Punctuation)));
        assert!(resolved.contains(&Highlight::new(5, 7, Tag::Punctuation)));
    }

    #[test]
    fn test_plain_text_is_untagged() {
        let highlighter = Highlighter::new();
        assert!(highlighter.highlight("just some words").is_empty());
        assert!(highlighter.resolve("").is_empty());
    }
}
