//! Status lines: a spinner and a message shown while work is in progress
//!
//! [`Status`] draws the line and keeps it animated from a refresh thread
//! until it is stopped or dropped. [`StatusDecorator`] wraps a function call
//! in a status and prints an exit message once the call returns.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde::Deserialize;

use crate::console::{Console, Output};
use crate::error::{Error, Result};
use crate::syntax::Style;
use crate::text::Text;

/// Spinner used when none is named
pub const DEFAULT_SPINNER: &str = "dots";

/// Style of the exit message when none is given
pub const DEFAULT_EXIT_STYLE: &str = "dark_sea_green1";

/// Default redraw rate of an animated status line
const DEFAULT_REFRESH_PER_SECOND: f64 = 12.5;

/// Longest time between redraws, however low the rate
const MAX_REFRESH_PERIOD: Duration = Duration::from_secs(60);

/// An animation: frames shown one after another
#[derive(Debug, PartialEq, Eq)]
pub struct Spinner {
    pub name: &'static str,
    /// Time each frame stays on screen at speed 1.0
    pub interval_ms: u64,
    pub frames: &'static [&'static str],
}

const SPINNERS: &[Spinner] = &[
    Spinner {
        name: "dots",
        interval_ms: 80,
        frames: &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"],
    },
    Spinner {
        name: "dots2",
        interval_ms: 80,
        frames: &["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"],
    },
    Spinner {
        name: "line",
        interval_ms: 130,
        frames: &["-", "\\", "|", "/"],
    },
    Spinner {
        name: "simpleDots",
        interval_ms: 400,
        frames: &[".  ", ".. ", "...", "   "],
    },
    Spinner {
        name: "arc",
        interval_ms: 100,
        frames: &["◜", "◠", "◝", "◞", "◡", "◟"],
    },
    Spinner {
        name: "star",
        interval_ms: 70,
        frames: &["✶", "✸", "✹", "✺", "✹", "✷"],
    },
    Spinner {
        name: "bouncingBar",
        interval_ms: 80,
        frames: &[
            "[    ]", "[=   ]", "[==  ]", "[=== ]", "[ ===]", "[  ==]", "[   =]", "[    ]", "[   =]",
            "[  ==]", "[ ===]", "[====]", "[=== ]", "[==  ]", "[=   ]",
        ],
    },
    Spinner {
        name: "toggle",
        interval_ms: 250,
        frames: &["⊶", "⊷"],
    },
];

impl Spinner {
    /// Look up a spinner by name
    pub fn named(name: &str) -> Result<&'static Spinner> {
        SPINNERS
            .iter()
            .find(|spinner| spinner.name == name)
            .ok_or_else(|| Error::UnknownSpinner(name.to_string()))
    }

    /// Names of all spinners
    pub fn names() -> impl Iterator<Item = &'static str> {
        SPINNERS.iter().map(|spinner| spinner.name)
    }

    /// Frame to show after `elapsed`, animated at `speed`
    pub fn frame_at(&self, elapsed: Duration, speed: f64) -> &'static str {
        let frame_no = elapsed.as_millis() as f64 * speed / self.interval_ms as f64;
        self.frames[frame_no as usize % self.frames.len()]
    }
}

/// How a status line is drawn
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatusOptions {
    /// Style name or definition for the spinner frame
    pub spinner_style: String,
    /// Animation speed multiplier
    pub speed: f64,
    pub refresh_per_second: f64,
}

impl Default for StatusOptions {
    fn default() -> Self {
        Self {
            spinner_style: "status.spinner".to_string(),
            speed: 1.0,
            refresh_per_second: DEFAULT_REFRESH_PER_SECOND,
        }
    }
}

impl StatusOptions {
    /// Time between redraws
    fn refresh_period(&self) -> Duration {
        let rate = if self.refresh_per_second.is_finite() && self.refresh_per_second > 0.0 {
            self.refresh_per_second
        } else {
            DEFAULT_REFRESH_PER_SECOND
        };
        Duration::try_from_secs_f64(1.0 / rate)
            .map_or(MAX_REFRESH_PERIOD, |period| period.min(MAX_REFRESH_PERIOD))
    }
}

/// Everything needed to draw the status line, owned by the refresh thread
#[derive(Debug, Clone)]
struct StatusLine {
    spinner: &'static Spinner,
    spinner_style: Style,
    message: Text,
    speed: f64,
    color: bool,
    width: usize,
}

impl StatusLine {
    fn render(&self, elapsed: Duration) -> String {
        let mut line = Text::new("");
        line.append(self.spinner.frame_at(elapsed, self.speed), Some(self.spinner_style));
        line.append(" ", None);
        line.append_text(&self.message);
        line.truncate(self.width);
        line.render(self.color)
    }
}

enum Refresh {
    Message(Text),
    Stop,
}

/// A live status line; torn down when stopped or dropped
pub struct Status<'a> {
    console: &'a Console,
    refresh: Option<(Sender<Refresh>, JoinHandle<()>)>,
    live: bool,
}

impl<'a> Status<'a> {
    /// Draw the status line and start animating it
    ///
    /// A non-interactive console draws nothing.
    pub fn start(console: &'a Console, message: &str, spinner: &'static Spinner, options: &StatusOptions) -> Result<Self> {
        let mut status = Self {
            console,
            refresh: None,
            live: false,
        };
        if !console.is_interactive() {
            log::debug!("console is not interactive, status line not drawn");
            return Ok(status);
        }

        let line = StatusLine {
            spinner,
            spinner_style: console.get_style(&options.spinner_style).unwrap_or_default(),
            message: console.render_markup(message)?,
            speed: options.speed,
            color: console.is_color(),
            width: console.width(),
        };
        let output = Arc::clone(console.output());
        let started = Instant::now();

        output.begin_live()?;
        status.live = true;
        output.draw_status(&line.render(Duration::ZERO))?;

        let (tx, rx) = mpsc::channel();
        let period = options.refresh_period();
        let handle = thread::Builder::new()
            .name("status-refresh".to_string())
            .spawn(move || refresh_loop(&output, line, started, period, rx))?;
        status.refresh = Some((tx, handle));
        log::debug!("status started with spinner {}", spinner.name);
        Ok(status)
    }

    /// Replace the message shown next to the spinner
    pub fn update(&self, message: &str) -> Result<()> {
        if let Some((tx, _)) = &self.refresh {
            let text = self.console.render_markup(message)?;
            // A closed channel means the refresh thread already stopped
            let _ = tx.send(Refresh::Message(text));
        }
        Ok(())
    }

    /// Stop animating and erase the status line
    pub fn stop(mut self) -> Result<()> {
        self.teardown()
    }

    fn teardown(&mut self) -> Result<()> {
        if let Some((tx, handle)) = self.refresh.take() {
            let _ = tx.send(Refresh::Stop);
            if handle.join().is_err() {
                log::warn!("status refresh thread panicked");
            }
        }
        if self.live {
            self.live = false;
            self.console.output().end_live()?;
            log::debug!("status stopped");
        }
        Ok(())
    }
}

impl Drop for Status<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.teardown() {
            log::warn!("failed to clear status line: {e}");
        }
    }
}

fn refresh_loop(
    output: &Output,
    mut line: StatusLine,
    started: Instant,
    period: Duration,
    rx: mpsc::Receiver<Refresh>,
) {
    loop {
        match rx.recv_timeout(period) {
            Ok(Refresh::Message(message)) => line.message = message,
            Err(RecvTimeoutError::Timeout) => {}
            Ok(Refresh::Stop) | Err(RecvTimeoutError::Disconnected) => break,
        }
        if let Err(e) = output.draw_status(&line.render(started.elapsed())) {
            log::warn!("status redraw failed: {e}");
            break;
        }
    }
}

/// Receivers that can turn their status display off
pub trait StatusSwitch {
    /// Whether calls on this receiver show a status line
    fn show_status(&self) -> bool {
        true
    }
}

/// Runs functions under a status line and prints an exit message
///
/// Display failures are logged and never change what the wrapped call
/// returns.
#[derive(Debug, Clone)]
pub struct StatusDecorator {
    status_message: String,
    exit_message: String,
    exit_message_style: String,
    spinner: &'static Spinner,
    options: StatusOptions,
}

impl StatusDecorator {
    /// Create a decorator with the default exit style and spinner
    ///
    /// The exit message defaults to the status message.
    pub fn new(status_message: impl Into<String>) -> Self {
        let status_message = status_message.into();
        Self {
            exit_message: status_message.clone(),
            status_message,
            exit_message_style: DEFAULT_EXIT_STYLE.to_string(),
            spinner: &SPINNERS[0],
            options: StatusOptions::default(),
        }
    }

    /// Builder: set the exit message
    pub fn with_exit_message(mut self, exit_message: impl Into<String>) -> Self {
        self.exit_message = exit_message.into();
        self
    }

    /// Builder: set the exit message style
    pub fn with_exit_message_style(mut self, style: impl Into<String>) -> Self {
        self.exit_message_style = style.into();
        self
    }

    /// Builder: pick a spinner by name
    pub fn with_spinner(mut self, name: &str) -> Result<Self> {
        self.spinner = Spinner::named(name)?;
        Ok(self)
    }

    /// Builder: set the status options
    pub fn with_options(mut self, options: StatusOptions) -> Self {
        self.options = options;
        self
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn exit_message(&self) -> &str {
        &self.exit_message
    }

    pub fn spinner(&self) -> &'static Spinner {
        self.spinner
    }

    /// Run `f` under the status line
    pub fn run<T, F>(&self, console: &Console, f: F) -> T
    where
        F: FnOnce() -> T,
    {
        let value = {
            let _status = self.start(console);
            f()
        };
        self.print_exit(console);
        value
    }

    /// Run a fallible `f` under the status line
    ///
    /// An error is returned unchanged and no exit message is printed.
    pub fn try_run<T, E, F>(&self, console: &Console, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce() -> std::result::Result<T, E>,
    {
        let result = {
            let _status = self.start(console);
            f()
        };
        if result.is_ok() {
            self.print_exit(console);
        }
        result
    }

    /// Run `f` on a receiver, under the status line unless the receiver
    /// switches it off
    pub fn run_on<R, T, F>(&self, console: &Console, receiver: &R, f: F) -> T
    where
        R: StatusSwitch + ?Sized,
        F: FnOnce(&R) -> T,
    {
        if !receiver.show_status() {
            return f(receiver);
        }
        self.run(console, || f(receiver))
    }

    /// Fallible form of [`run_on`](Self::run_on)
    pub fn try_run_on<R, T, E, F>(&self, console: &Console, receiver: &R, f: F) -> std::result::Result<T, E>
    where
        R: StatusSwitch + ?Sized,
        F: FnOnce(&R) -> std::result::Result<T, E>,
    {
        if !receiver.show_status() {
            return f(receiver);
        }
        self.try_run(console, || f(receiver))
    }

    fn start<'a>(&self, console: &'a Console) -> Option<Status<'a>> {
        match console.status(&self.status_message, self.spinner, &self.options) {
            Ok(status) => Some(status),
            Err(e) => {
                log::warn!("failed to show status: {e}");
                None
            }
        }
    }

    fn print_exit(&self, console: &Console) {
        if let Err(e) = console.print_styled(&self.exit_message, &self.exit_message_style) {
            log::warn!("failed to print exit message: {e}");
        }
    }
}

/// Create a status decorator
///
/// `exit_message` defaults to `status_message`. Unknown spinner names are
/// an error.
pub fn show_status(
    status_message: &str,
    exit_message: Option<&str>,
    exit_message_style: &str,
    spinner: &str,
    options: StatusOptions,
) -> Result<StatusDecorator> {
    let decorator = StatusDecorator::new(status_message)
        .with_exit_message_style(exit_message_style)
        .with_spinner(spinner)?
        .with_options(options);
    Ok(match exit_message {
        Some(exit_message) => decorator.with_exit_message(exit_message),
        None => decorator,
    })
}
