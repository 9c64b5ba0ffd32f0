//! Logging utilities with colored output and progress display.
//!
//! Everything here writes to stderr; stdout is reserved for `--json`.
//!
//! ```ignore
//! log!("css"; "harvested {} classes", count);
//! debug!("rewrite"; "<{}> removed {}", tag, names);
//!
//! let progress = ProgressLine::new("rewrite", documents.len());
//! progress.inc();
//! progress.finish();
//! ```

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::{
    io::{IsTerminal, Write, stderr},
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Active progress line count (for log coordination)
static BAR_COUNT: AtomicUsize = AtomicUsize::new(0);

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);

    let mut err = stderr().lock();

    // Keep an active progress line below the message.
    let active = BAR_COUNT.load(Ordering::SeqCst) > 0;
    if active {
        execute!(err, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
    }

    writeln!(err, "{prefix} {message}").ok();
    err.flush().ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str) -> String {
    let prefix = format!("[{module}]");
    match module.to_ascii_lowercase().as_str() {
        "error" => prefix.bright_red().bold().to_string(),
        "warning" => prefix.bright_yellow().bold().to_string(),
        "hint" => prefix.bright_cyan().bold().to_string(),
        "done" => prefix.bright_green().bold().to_string(),
        _ => prefix.bright_blue().bold().to_string(),
    }
}

// ============================================================================
// Progress Line
// ============================================================================

/// Single-line progress counter: `[rewrite] 42/69`.
///
/// Workers call [`inc`](Self::inc) concurrently. Redraws use `try_lock` so a
/// busy display never blocks a worker; a skipped redraw is caught up by the
/// next one. Nothing is drawn when stderr is not a terminal.
pub struct ProgressLine {
    name: &'static str,
    total: usize,
    current: AtomicUsize,
    visible: bool,
    lock: Mutex<()>,
}

impl ProgressLine {
    pub fn new(name: &'static str, total: usize) -> Self {
        let visible = total > 0 && stderr().is_terminal();
        if visible {
            BAR_COUNT.store(1, Ordering::SeqCst);
        }

        let progress = Self {
            name,
            total,
            current: AtomicUsize::new(0),
            visible,
            lock: Mutex::new(()),
        };
        progress.display(false);
        progress
    }

    #[inline]
    pub fn inc(&self) {
        self.current.fetch_add(1, Ordering::Relaxed);
        if let Some(_guard) = self.lock.try_lock() {
            self.display(false);
        }
    }

    pub fn current(&self) -> usize {
        self.current.load(Ordering::Relaxed)
    }

    fn line(&self) -> String {
        format!("{} {}/{}", colorize_prefix(self.name), self.current(), self.total)
    }

    fn display(&self, newline: bool) {
        if !self.visible {
            return;
        }
        let mut err = stderr().lock();
        execute!(err, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
        if newline {
            writeln!(err, "{}", self.line()).ok();
        } else {
            write!(err, "{}", self.line()).ok();
        }
        err.flush().ok();
    }

    /// Finish progress display, preserve line and move to next line.
    pub fn finish(self) {
        BAR_COUNT.store(0, Ordering::SeqCst);
        {
            let _guard = self.lock.lock();
            self.display(true);
        }
        std::mem::forget(self);
    }
}

impl Drop for ProgressLine {
    fn drop(&mut self) {
        BAR_COUNT.store(0, Ordering::SeqCst);
        if self.visible {
            let mut err = stderr().lock();
            execute!(err, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
            err.flush().ok();
        }
    }
}
