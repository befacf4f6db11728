//! themed-print - highlight text and values in the terminal
//!
//! Reads a file (or stdin) and prints it line by line through the
//! highlighter and theme.

use std::fs::{self, OpenOptions};
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Mutex;

use clap::Parser;
use themed_print::status::show_status;
use themed_print::timestamp;
use themed_print::{Config, Console, Error, PrintOptions, Result, Tag, Text, Theme, Value};

/// Themed, colorized pretty-printing
///
/// Reads FILE (or stdin) and prints it highlighted, line by line.
#[derive(Parser, Debug)]
#[command(name = "themed-print")]
#[command(version)]
#[command(about, long_about = None)]
struct Cli {
    /// File to print; stdin when absent or `-`
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Read settings from a TOML file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Read the theme from a TOML file
    #[arg(long, value_name = "FILE")]
    theme: Option<PathBuf>,

    /// Spaces per nesting level
    #[arg(long, value_name = "N")]
    indent: Option<usize>,

    /// Don't draw indentation guides
    #[arg(long)]
    no_guides: bool,

    /// Prefix each line with the time
    #[arg(long)]
    log: bool,

    /// Show a spinner with MSG while printing
    #[arg(long, value_name = "MSG")]
    status: Option<String>,

    /// Show every highlight tag in its style
    #[arg(long)]
    tags: bool,

    /// Don't emit ANSI styling
    #[arg(long)]
    no_color: bool,

    /// Append diagnostics to PATH
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        FileLogger::install(path)?;
    }

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let theme = match &cli.theme {
        Some(path) => Theme::read(path)?,
        None => config.theme()?,
    };
    let color = !cli.no_color && config.color.enabled(io::stdout().is_terminal());
    let console = Console::stdout().with_theme(theme).with_color(color);

    let mut options = config.print.clone();
    if let Some(indent) = cli.indent {
        options.indent = indent;
    }
    if cli.no_guides {
        options.show_guideline = false;
    }

    if cli.tags {
        return print_tags(&console, &options);
    }

    let input = read_input(cli.input.as_deref())?;
    let print_lines = || -> Result<()> {
        for line in input.lines() {
            let values = [Value::text(line)];
            if cli.log {
                console.log(&values, &options)?;
            } else {
                console.print(&values, &options)?;
            }
        }
        Ok(())
    };

    match &cli.status {
        Some(message) => {
            let decorator = show_status(
                message,
                None,
                &config.status.exit_message_style,
                &config.status.spinner,
                config.status.options.clone(),
            )?;
            decorator.try_run(&console, print_lines)
        }
        None => print_lines(),
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => Ok(fs::read_to_string(path)?),
        _ => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

/// Print every tag name in its theme style
fn print_tags(console: &Console, options: &PrintOptions) -> Result<()> {
    for tag in Tag::ALL {
        let name = Text::styled(tag.name(), console.theme().style_for(tag));
        console.print(&[name.into(), Value::text(tag.default_style())], options)?;
    }
    Ok(())
}

/// Appends log records to a file, one line each
struct FileLogger {
    file: Mutex<fs::File>,
}

impl FileLogger {
    fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new().append(true).create(true).open(path)?;
        Ok(FileLogger {
            file: Mutex::new(file),
        })
    }

    fn install(path: &Path) -> Result<()> {
        let logger = Box::new(Self::open(path)?);
        log::set_boxed_logger(logger).map_err(|e| Error::Message(e.to_string()))?;
        log::set_max_level(log::LevelFilter::Debug);
        Ok(())
    }

    fn write_line(&self, msg: &str) -> io::Result<()> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;
        file.write_all(msg.as_bytes())
    }
}

impl log::Log for FileLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::Level::Debug
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let now = timestamp::now();
        let msg = format!(
            "[{:04}-{:02}-{:02} {:02}:{:02}:{:02}][{}] {} {}: {}\n",
            now.year(),
            u8::from(now.month()),
            now.day(),
            now.hour(),
            now.minute(),
            now.second(),
            process::id(),
            record.level(),
            record.target(),
            record.args()
        );
        if let Err(e) = self.write_line(&msg) {
            eprintln!("themed-print: log file write error: {e}");
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            if let Err(e) = file.flush() {
                eprintln!("themed-print: log file flush error: {e}");
            }
        }
    }
}
