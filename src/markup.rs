//! Console markup
//!
//! Inline style tags: `[bold red]text[/bold red]`, `[/]` closes the most
//! recent tag, and a backslash before `[` makes the tag literal. Text that
//! must print verbatim goes through [`escape`] first.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::error::{Error, Result};
use crate::syntax::Style;
use crate::text::Text;

/// A tag: optional run of backslashes, then `[` + name + `]`
const TAG_PATTERN: &str = r"(\\*)\[([a-z#/@][^\[]*?)\]";

fn tag_regex() -> &'static Regex {
    static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    TAG_REGEX.get_or_init(|| Regex::new(TAG_PATTERN).expect("markup tag pattern is valid"))
}

/// Escape text so that markup-like sequences print literally
pub fn escape(markup: &str) -> String {
    tag_regex()
        .replace_all(markup, |caps: &Captures| {
            let backslashes = &caps[1];
            format!("{backslashes}{backslashes}\\[{}]", &caps[2])
        })
        .into_owned()
}

/// Render markup into styled text
///
/// `resolve` turns a tag's content into a style; `None` leaves the tagged
/// text unstyled. Tags still open at the end run to the end of the text.
pub fn render<F>(markup: &str, resolve: F) -> Result<Text>
where
    F: Fn(&str) -> Option<Style>,
{
    let mut text = Text::new("");
    let mut open: Vec<(String, usize)> = Vec::new();
    let mut pos = 0;

    for caps in tag_regex().captures_iter(markup) {
        let (Some(whole), Some(slashes), Some(tag)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        text.append(&markup[pos..whole.start()], None);
        pos = whole.end();

        let backslashes = slashes.as_str().len();
        text.append(&"\\".repeat(backslashes / 2), None);
        if backslashes % 2 == 1 {
            text.append(&format!("[{}]", tag.as_str()), None);
            continue;
        }

        let tag = tag.as_str().trim();
        match tag.strip_prefix('/') {
            Some(closing) => {
                let closing = closing.trim();
                let index = if closing.is_empty() {
                    open.len().checked_sub(1)
                } else {
                    open.iter().rposition(|(name, _)| name == closing)
                };
                let Some(index) = index else {
                    return Err(Error::Markup(format!(
                        "closing tag '[/{closing}]' at position {} doesn't match any open tag",
                        whole.start()
                    )));
                };
                let (name, start) = open.remove(index);
                apply(&mut text, &name, start, &resolve);
            }
            None => open.push((tag.to_string(), text.len())),
        }
    }
    text.append(&markup[pos..], None);

    while let Some((name, start)) = open.pop() {
        apply(&mut text, &name, start, &resolve);
    }
    text.spans.sort_by_key(|span| span.start);
    Ok(text)
}

fn apply<F>(text: &mut Text, name: &str, start: usize, resolve: &F)
where
    F: Fn(&str) -> Option<Style>,
{
    match resolve(name) {
        Some(style) => text.stylize(start, text.len(), style),
        None => log::debug!("markup tag [{name}] has no style"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Color;

    fn parse_style(name: &str) -> Option<Style> {
        Style::parse(name).ok()
    }

    #[test]
    fn test_escape_protects_tags() {
        assert_eq!(escape("[bold]hi[/bold]"), r"\[bold]hi\[/bold]");
        assert_eq!(escape("no tags [1, 2]"), "no tags [1, 2]");
        assert_eq!(escape(r"a\[b]"), r"a\\\[b]");
        assert_eq!(escape(r"trailing\"), r"trailing\");
    }

    #[test]
    fn test_escaped_text_renders_literally() {
        for original in ["[bold]hi[/bold]", r"path\[x]", "[red]", "list [1] [a]", r"end\"] {
            let text = render(&escape(original), parse_style).unwrap();
            assert_eq!(text.plain, original);
            assert!(text.spans.is_empty());
        }
    }

    #[test]
    fn test_render_styles() {
        let text = render("a [bold]b[/bold] [red]c[/]", parse_style).unwrap();
        assert_eq!(text.plain, "a b c");
        assert_eq!(text.style_at(2).bold, Some(true));
        assert_eq!(text.style_at(4).fg, Some(Color::Ansi(1)));
        assert!(text.style_at(0).is_default());
    }

    #[test]
    fn test_unclosed_tag_runs_to_end() {
        let text = render("[italic]abc", parse_style).unwrap();
        assert_eq!(text.plain, "abc");
        assert_eq!(text.style_at(2).italic, Some(true));
    }

    #[test]
    fn test_unknown_style_is_unstyled() {
        let text = render("[nonsense]abc[/nonsense]", parse_style).unwrap();
        assert_eq!(text.plain, "abc");
        assert!(text.spans.is_empty());
    }

    #[test]
    fn test_unmatched_close_is_error() {
        assert!(render("abc[/bold]", parse_style).is_err());
        assert!(render("abc[/]", parse_style).is_err());
    }

    #[test]
    fn test_non_tag_brackets_are_text() {
        let text = render("[12:30:45] [1, 2]", parse_style).unwrap();
        assert_eq!(text.plain, "[12:30:45] [1, 2]");
    }
}
