//! The console: themed output through crossterm
//!
//! A [`Console`] is passed explicitly to everything that prints. It owns the
//! theme, the highlighter and the render-hook stack; the writer itself is
//! shared with the status spinner's refresh thread.

use std::cell::RefCell;
use std::fmt::Debug;
use std::io::{self, IsTerminal, Write};
use std::ops::Deref;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crossterm::{
    cursor, queue,
    terminal::{self, ClearType},
};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::error::Result;
use crate::markup;
use crate::pretty::{Pretty, PrettyIndentHook, RenderHook, Renderable};
use crate::status::{Spinner, Status, StatusOptions};
use crate::syntax::{Highlighter, Style, Theme};
use crate::text::Text;
use crate::timestamp;

/// Width used when the terminal size cannot be queried
const FALLBACK_WIDTH: usize = 80;

/// Writer shared between the console and a live status line
pub struct Output {
    sink: Mutex<Box<dyn Write + Send>>,
    /// A status line is currently drawn on the last row
    live: AtomicBool,
}

impl Output {
    fn new(sink: Box<dyn Write + Send>) -> Self {
        Self {
            sink: Mutex::new(sink),
            live: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        self.sink.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write rendered output, clearing a live status line first
    pub fn write_str(&self, s: &str) -> Result<()> {
        let mut sink = self.lock();
        if self.live.load(Ordering::Acquire) {
            queue!(sink, cursor::MoveToColumn(0), terminal::Clear(ClearType::CurrentLine))?;
        }
        sink.write_all(s.as_bytes())?;
        sink.flush()?;
        Ok(())
    }

    /// Redraw the status line in place
    pub(crate) fn draw_status(&self, line: &str) -> Result<()> {
        let mut sink = self.lock();
        queue!(sink, cursor::MoveToColumn(0))?;
        sink.write_all(line.as_bytes())?;
        queue!(sink, terminal::Clear(ClearType::UntilNewLine))?;
        sink.flush()?;
        Ok(())
    }

    /// Mark a status line as live and hide the cursor
    pub(crate) fn begin_live(&self) -> Result<()> {
        let mut sink = self.lock();
        self.live.store(true, Ordering::Release);
        queue!(sink, cursor::Hide)?;
        sink.flush()?;
        Ok(())
    }

    /// Erase the status line and restore the cursor
    pub(crate) fn end_live(&self) -> Result<()> {
        let mut sink = self.lock();
        self.live.store(false, Ordering::Release);
        queue!(
            sink,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::CurrentLine),
            cursor::Show
        )?;
        sink.flush()?;
        Ok(())
    }

    /// Check if a status line is live
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }
}

/// In-memory writer for capturing console output
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl CaptureBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far
    pub fn contents(&self) -> String {
        let bytes = self.bytes.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Discard everything written so far
    pub fn clear(&self) {
        self.bytes.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A value passed to [`Console::print`]
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Plain text: escaped, then highlighted
    Text(String),
    /// Console markup: rendered, then highlighted
    Markup(String),
    /// A structurally formatted value
    Pretty(Pretty),
    /// Pre-styled text, printed as is
    Styled(Text),
}

impl Value {
    /// Plain text that prints literally
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// Text containing console markup
    pub fn markup(s: impl Into<String>) -> Self {
        Value::Markup(s.into())
    }

    /// Any `Debug` value, pretty-printed
    pub fn pretty<T: Debug + ?Sized>(value: &T) -> Self {
        Value::Pretty(Pretty::of(value))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::text(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Text> for Value {
    fn from(text: Text) -> Self {
        Value::Styled(text)
    }
}

impl From<Pretty> for Value {
    fn from(pretty: Pretty) -> Self {
        Value::Pretty(pretty)
    }
}

/// Options for one print call
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PrintOptions {
    /// Spaces per nesting level of pretty-printed values
    pub indent: usize,
    /// Draw indentation guides in pretty-printed values
    pub show_guideline: bool,
    /// Inserted between values
    pub sep: String,
    /// Appended after the last value
    pub end: String,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            indent: 4,
            show_guideline: true,
            sep: " ".to_string(),
            end: "\n".to_string(),
        }
    }
}

impl PrintOptions {
    /// Builder: set the indent width
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Builder: enable or disable indentation guides
    pub fn with_guideline(mut self, show: bool) -> Self {
        self.show_guideline = show;
        self
    }

    /// Builder: set the separator
    pub fn with_sep(mut self, sep: impl Into<String>) -> Self {
        self.sep = sep.into();
        self
    }

    /// Builder: set the terminator
    pub fn with_end(mut self, end: impl Into<String>) -> Self {
        self.end = end.into();
        self
    }
}

/// Console for themed output
pub struct Console {
    output: Arc<Output>,
    theme: Theme,
    highlighter: Highlighter,
    /// Emit ANSI styling
    color: bool,
    /// Animate status lines
    interactive: bool,
    /// Fixed width instead of querying the terminal
    width: Option<usize>,
    render_hooks: RefCell<Vec<Box<dyn RenderHook>>>,
    last_log_time: RefCell<Option<String>>,
}

impl Console {
    /// Create a console writing to `writer`, with color and no animation
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            output: Arc::new(Output::new(Box::new(writer))),
            theme: Theme::default(),
            highlighter: Highlighter::new(),
            color: true,
            interactive: false,
            width: None,
            render_hooks: RefCell::new(Vec::new()),
            last_log_time: RefCell::new(None),
        }
    }

    /// Create a console on stdout; status lines animate when stdout is a terminal
    pub fn stdout() -> Self {
        let interactive = io::stdout().is_terminal();
        Self::new(io::stdout()).with_interactive(interactive)
    }

    /// Create an uncolored console writing into a buffer
    pub fn capture() -> (Self, CaptureBuffer) {
        let buffer = CaptureBuffer::new();
        let console = Self::new(buffer.clone()).with_color(false).with_width(FALLBACK_WIDTH);
        (console, buffer)
    }

    /// Builder: set the theme
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Builder: set the highlighter
    pub fn with_highlighter(mut self, highlighter: Highlighter) -> Self {
        self.highlighter = highlighter;
        self
    }

    /// Builder: enable or disable ANSI styling
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Builder: enable or disable status animation
    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Builder: use a fixed width
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// Get the theme
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Get the highlighter
    pub fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    /// Check if ANSI styling is emitted
    pub fn is_color(&self) -> bool {
        self.color
    }

    /// Check if status lines animate
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Width in columns
    pub fn width(&self) -> usize {
        self.width.unwrap_or_else(|| {
            terminal::size()
                .map(|(cols, _)| cols as usize)
                .unwrap_or(FALLBACK_WIDTH)
        })
    }

    pub(crate) fn output(&self) -> &Arc<Output> {
        &self.output
    }

    /// Number of render hooks currently pushed
    pub fn render_hook_depth(&self) -> usize {
        self.render_hooks.borrow().len()
    }

    /// Resolve a style name: theme entries first, then a style definition
    pub fn get_style(&self, name: &str) -> Option<Style> {
        self.theme.get(name).or_else(|| Style::parse(name).ok())
    }

    /// Render console markup with this console's styles
    pub fn render_markup(&self, markup: &str) -> Result<Text> {
        markup::render(markup, |name| self.get_style(name))
    }

    /// Turn a string into highlighted text
    ///
    /// Without `markup`, the string is escaped first so it prints literally.
    pub fn render_str(&self, s: &str, markup: bool) -> Result<Text> {
        let mut text = if markup {
            self.render_markup(s)?
        } else {
            self.render_markup(&markup::escape(s))?
        };
        text.highlight(&self.highlighter, &self.theme);
        Ok(text)
    }

    /// Push a render hook for the lifetime of the returned guard
    pub fn push_render_hook(&self, hook: Box<dyn RenderHook>) -> RenderHookGuard<'_> {
        self.render_hooks.borrow_mut().push(hook);
        log::trace!("render hook pushed (depth {})", self.render_hook_depth());
        RenderHookGuard { console: self }
    }

    /// Print values
    ///
    /// The indentation options hold for this call only: they are pushed as a
    /// render hook and popped again however the call ends.
    pub fn print(&self, values: &[Value], options: &PrintOptions) -> Result<()> {
        let scoped = self.push_render_hook(Box::new(PrettyIndentHook::new(
            options.indent,
            options.show_guideline,
        )));
        let renderables = scoped.collect_renderables(values)?;
        let text = scoped.render_renderables(renderables, &options.sep, scoped.width());
        scoped.write_text(&text, &options.end)
    }

    /// Print markup on top of a base style
    pub fn print_styled(&self, markup: &str, style: &str) -> Result<()> {
        let mut text = self.render_str(markup, true)?;
        text.style = self.get_style(style).unwrap_or_default();
        self.write_text(&text, "\n")
    }

    /// Print values prefixed with the current time
    pub fn log(&self, values: &[Value], options: &PrintOptions) -> Result<()> {
        self.log_at(&timestamp::now(), values, options)
    }

    /// Print values prefixed with a given time
    ///
    /// A time equal to the previous log line's is replaced by blanks.
    pub fn log_at(&self, datetime: &OffsetDateTime, values: &[Value], options: &PrintOptions) -> Result<()> {
        let mut stamp = timestamp::format_timestamp(&self.highlighter, &self.theme, datetime);
        stamp.style = self.theme.get("log.time").unwrap_or_default();

        let repeated = self.last_log_time.borrow().as_deref() == Some(stamp.plain.as_str());
        if repeated {
            stamp = Text::new(" ".repeat(stamp.width()));
        } else {
            *self.last_log_time.borrow_mut() = Some(stamp.plain.clone());
        }

        let scoped = self.push_render_hook(Box::new(PrettyIndentHook::new(
            options.indent,
            options.show_guideline,
        )));
        let renderables = scoped.collect_renderables(values)?;
        let max_width = scoped.width().saturating_sub(stamp.width() + 1);
        let mut body = scoped.render_renderables(renderables, &options.sep, max_width);
        body.pad_continuation_lines(stamp.width() + 1);

        let mut line = stamp;
        line.append(" ", None);
        line.append_text(&body);
        scoped.write_text(&line, &options.end)
    }

    /// Start a status line; it stops when the returned guard is dropped
    pub fn status(&self, message: &str, spinner: &'static Spinner, options: &StatusOptions) -> Result<Status<'_>> {
        Status::start(self, message, spinner, options)
    }

    fn collect_renderables(&self, values: &[Value]) -> Result<Vec<Renderable>> {
        values
            .iter()
            .map(|value| {
                Ok(match value {
                    Value::Text(s) => Renderable::Text(self.render_str(s, false)?),
                    Value::Markup(s) => Renderable::Text(self.render_str(s, true)?),
                    Value::Pretty(pretty) => Renderable::Pretty(pretty.clone()),
                    Value::Styled(text) => Renderable::Text(text.clone()),
                })
            })
            .collect()
    }

    /// Join renderables: inline values by `sep`, containers on lines of their own
    fn render_renderables(&self, mut renderables: Vec<Renderable>, sep: &str, max_width: usize) -> Text {
        for hook in self.render_hooks.borrow().iter() {
            renderables = hook.process_renderables(renderables);
        }

        let mut joined = Text::new("");
        let mut after_inline = false;
        for (i, renderable) in renderables.iter().enumerate() {
            let block = renderable.is_block();
            if i > 0 {
                if block || !after_inline {
                    joined.append("\n", None);
                } else {
                    joined.append(sep, None);
                }
            }
            joined.append_text(&renderable.render(&self.highlighter, &self.theme, max_width));
            after_inline = !block;
        }
        joined
    }

    fn write_text(&self, text: &Text, end: &str) -> Result<()> {
        let mut rendered = text.render(self.color);
        rendered.push_str(end);
        self.output.write_str(&rendered)
    }
}

/// Keeps a render hook pushed; pops it when dropped
pub struct RenderHookGuard<'a> {
    console: &'a Console,
}

impl Deref for RenderHookGuard<'_> {
    type Target = Console;

    fn deref(&self) -> &Console {
        self.console
    }
}

impl Drop for RenderHookGuard<'_> {
    fn drop(&mut self) {
        self.console.render_hooks.borrow_mut().pop();
        log::trace!("render hook popped (depth {})", self.console.render_hook_depth());
    }
}

/// Print values to a console
pub fn print(console: &Console, values: &[Value], options: &PrintOptions) -> Result<()> {
    console.print(values, options)
}
