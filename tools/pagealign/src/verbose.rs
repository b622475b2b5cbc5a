//! Output levels for pagealign diagnostics.
//!
//! - **Quiet** (`-q`): errors only
//! - **Default**: one summary line per run, plus warnings
//! - **Verbose** (`-v`): table geometry, per-segment transitions, step timings

use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Verbosity {
    Quiet = 0,
    Default = 1,
    Verbose = 2,
}

impl Verbosity {
    fn from_flags(quiet: bool, verbose: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, true) => Self::Verbose,
            (false, false) => Self::Default,
        }
    }

    fn current() -> Self {
        match LEVEL.load(Ordering::Relaxed) {
            0 => Self::Quiet,
            2 => Self::Verbose,
            _ => Self::Default,
        }
    }
}

/// Process-wide level, written once from `main`.
static LEVEL: AtomicU8 = AtomicU8::new(Verbosity::Default as u8);

/// Select the level from the `-q` / `-v` flags.
pub fn init(quiet: bool, verbose: bool) {
    LEVEL.store(Verbosity::from_flags(quiet, verbose) as u8, Ordering::Relaxed);
}

/// Returns `true` under `-v`.
pub fn is_verbose() -> bool {
    Verbosity::current() == Verbosity::Verbose
}

/// Returns `true` under `-q`.
pub fn is_quiet() -> bool {
    Verbosity::current() == Verbosity::Quiet
}

/// `println!` that only fires under `-v`.
macro_rules! vprintln {
    ($($arg:tt)*) => {
        if $crate::verbose::is_verbose() {
            println!($($arg)*);
        }
    };
}

pub(crate) use vprintln;

/// `println!` silenced by `-q`.
macro_rules! dprintln {
    ($($arg:tt)*) => {
        if !$crate::verbose::is_quiet() {
            println!($($arg)*);
        }
    };
}

pub(crate) use dprintln;

/// `warning: ...` on stderr, silenced by `-q`.
macro_rules! vwarn {
    ($($arg:tt)*) => {
        if !$crate::verbose::is_quiet() {
            eprintln!("warning: {}", format_args!($($arg)*));
        }
    };
}

pub(crate) use vwarn;

/// Reports how long a step took when dropped, under `-v` only.
pub struct Timer {
    step: &'static str,
    started: Instant,
}

impl Timer {
    /// Start timing `step`.
    pub fn start(step: &'static str) -> Self {
        Self {
            step,
            started: Instant::now(),
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        if is_verbose() {
            println!("  {}: {:.1?}", self.step, self.started.elapsed());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_wins_over_verbose() {
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Default);
    }
}
