//! themed-print: themed, colorized pretty-printing for the terminal
//!
//! Text and `Debug` values are highlighted by an ordered list of regex rules
//! and styled through a [`Theme`]. A [`StatusDecorator`] runs a call under a
//! transient spinner and prints an exit message once it returns.
//!
//! ```no_run
//! use themed_print::{print, Console, PrintOptions, Value};
//!
//! let console = Console::stdout();
//! print(&console, &[Value::text("count ="), Value::pretty(&vec![1, 2])], &PrintOptions::default())?;
//! # Ok::<(), themed_print::Error>(())
//! ```

pub mod config;
pub mod console;
pub mod error;
pub mod markup;
pub mod pretty;
pub mod status;
pub mod syntax;
pub mod text;
pub mod timestamp;

pub use config::{ColorChoice, Config};
pub use console::{print, CaptureBuffer, Console, PrintOptions, RenderHookGuard, Value};
pub use error::{Error, Result};
pub use pretty::{Pretty, PrettyIndentHook, RenderHook, Renderable};
pub use status::{show_status, Spinner, Status, StatusDecorator, StatusOptions, StatusSwitch};
pub use syntax::{Color, Highlight, HighlightRule, Highlighter, Style, Tag, Theme};
pub use text::Text;
pub use timestamp::format_timestamp;
