use std::io::{self, Write};
use std::sync::atomic::{AtomicU8, Ordering};

use console::style;

const QUIET: u8 = 0;
const NORMAL: u8 = 1;
const VERBOSE: u8 = 2;

static LEVEL: AtomicU8 = AtomicU8::new(NORMAL);

/// Sets diagnostic verbosity from the `-q` / `-v` flags and toggles styling.
pub fn configure(verbose: u8, quiet: bool, color: bool) {
    let level = if quiet {
        QUIET
    } else if verbose > 0 {
        VERBOSE
    } else {
        NORMAL
    };
    LEVEL.store(level, Ordering::Relaxed);
    console::set_colors_enabled(color);
    console::set_colors_enabled_stderr(color);
}

pub fn debug(message: &str) {
    if LEVEL.load(Ordering::Relaxed) >= VERBOSE {
        let _ = writeln!(io::stderr(), "{} {}", style("debug").dim(), message);
    }
}

pub fn info(message: &str) {
    if LEVEL.load(Ordering::Relaxed) >= NORMAL {
        let _ = writeln!(io::stderr(), "{}", message);
    }
}

pub fn warn(message: &str) {
    let _ = writeln!(io::stderr(), "{}", style(message).yellow());
}

pub fn error(message: &str) {
    let _ = writeln!(
        io::stderr(),
        "{} {}",
        style("error:").red().bold(),
        style(message).red()
    );
}
