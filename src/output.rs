//! # Terminal Output
//!
//! Status lines printed by the CLI carry a short marker (`[OK]`, `[ERR]`,
//! `[WARN]`). With color enabled the marker is styled; without it the plain
//! text is printed so that redirected output stays readable.
//!
//! Color is controlled by the global `--color` flag and, in `auto` mode, by
//! the environment:
//! - `NO_COLOR` set (any value) disables colors (https://no-color.org/)
//! - `CLICOLOR=0` disables colors
//! - `CLICOLOR_FORCE=1` forces colors even when stdout is not a terminal
//! - `TERM=dumb` disables colors

use std::env;
use std::fmt;

use console::style;

/// Whether the CLI should style its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub use_color: bool,
}

impl OutputConfig {
    /// Resolve the `--color` flag value (`always`, `never` or `auto`).
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };
        Self { use_color }
    }

    fn detect_color_support() -> bool {
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }
        console::Term::stdout().features().colors_supported()
    }

    /// Marker for a status line.
    pub fn marker(&self, status: Status) -> Marker {
        Marker {
            status,
            use_color: self.use_color,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Warn,
    Err,
}

impl Status {
    fn label(self) -> &'static str {
        match self {
            Status::Ok => "[OK]",
            Status::Warn => "[WARN]",
            Status::Err => "[ERR]",
        }
    }
}

/// A status marker ready for printing.
#[derive(Debug, Clone, Copy)]
pub struct Marker {
    status: Status,
    use_color: bool,
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.status.label();
        if !self.use_color {
            return f.write_str(label);
        }
        let styled = match self.status {
            Status::Ok => style(label).green().bold(),
            Status::Warn => style(label).yellow().bold(),
            Status::Err => style(label).red().bold(),
        };
        write!(f, "{}", styled.force_styling(true))
    }
}
