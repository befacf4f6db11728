//! Timestamps for console log lines

use time::OffsetDateTime;

use crate::syntax::{Highlighter, Theme};
use crate::text::Text;

/// Format a datetime as `[HH:MM:SS]` and highlight it
///
/// The highlighter's timestamp rule gives the hour, minute and second their
/// theme styles.
pub fn format_timestamp(highlighter: &Highlighter, theme: &Theme, datetime: &OffsetDateTime) -> Text {
    let mut text = Text::new(format!(
        "[{:02}:{:02}:{:02}]",
        datetime.hour(),
        datetime.minute(),
        datetime.second()
    ));
    text.highlight(highlighter, theme);
    text
}

/// Current local time, falling back to UTC when the offset is unknown
pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Tag;
    use time::macros::datetime;

    #[test]
    fn test_format_is_24_hour() {
        let text = format_timestamp(
            &Highlighter::new(),
            &Theme::default(),
            &datetime!(2026-01-01 21:05:09 UTC),
        );
        assert_eq!(text.plain, "[21:05:09]");
    }

    #[test]
    fn test_fields_get_time_styles() {
        let theme = Theme::default();
        let text = format_timestamp(&Highlighter::new(), &theme, &datetime!(2026-01-01 07:08:09 UTC));
        assert_eq!(text.plain, "[07:08:09]");
        // Later rules paint over NUMBER and PUNCTUATION
        assert_eq!(text.style_at(1), theme.style_for(Tag::Number).combine(&theme.style_for(Tag::Hour)));
        assert_eq!(text.style_at(4), theme.style_for(Tag::Number).combine(&theme.style_for(Tag::Minute)));
        assert_eq!(text.style_at(7), theme.style_for(Tag::Number).combine(&theme.style_for(Tag::Second)));
        assert_eq!(text.style_at(0), theme.style_for(Tag::Punctuation));
    }
}
