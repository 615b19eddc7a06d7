use std::fmt::Display;
use std::io::IsTerminal;
use std::sync::atomic::{AtomicBool, Ordering};

use console::{colors_enabled_stderr, style};

static VERBOSE: AtomicBool = AtomicBool::new(false);

pub fn brand_accent<D: Display>(value: D) -> console::StyledObject<D> {
    style(value).for_stderr().green()
}

pub fn brand_fg<D: Display>(value: D) -> console::StyledObject<D> {
    style(value).for_stderr()
}

pub fn brand_muted<D: Display>(value: D) -> console::StyledObject<D> {
    style(value).for_stderr().dim()
}

pub fn brand_success<D: Display>(value: D) -> console::StyledObject<D> {
    style(value).for_stderr().green()
}

pub fn brand_warning<D: Display>(value: D) -> console::StyledObject<D> {
    style(value).for_stderr().yellow()
}

pub fn brand_error<D: Display>(value: D) -> console::StyledObject<D> {
    style(value).for_stderr().red()
}

pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

// Status lines go to stderr; stdout carries data (streamed logs, `--json`).

pub fn section(title: &str) {
    eprintln!();
    eprintln!("{}", brand_accent(title).bold());
}

pub fn step(message: &str) {
    eprintln!("{} {}", brand_accent("•").bold(), brand_fg(message));
}

pub fn success(message: &str) {
    eprintln!("{} {}", brand_success("✓").bold(), brand_fg(message));
}

pub fn warning(message: &str) {
    eprintln!("{} {}", brand_warning("!").bold(), brand_fg(message));
}

pub fn error_stderr(message: &str) {
    eprintln!("{} {}", brand_error("✗").bold(), brand_fg(message));
}

pub fn muted(message: &str) {
    eprintln!("{}", brand_muted(message));
}

/// Extra detail printed only with `--verbose`.
pub fn detail(message: &str) {
    if is_verbose() {
        muted(message);
    }
}

pub fn emphasized(value: &str) -> String {
    if std::io::stderr().is_terminal() && colors_enabled_stderr() {
        // Italic on/off (3/23) keeps surrounding styles active.
        format!("\x1b[3m{}\x1b[23m", value)
    } else {
        format!("'{}'", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_flag_round_trips() {
        set_verbose(true);
        assert!(is_verbose());
        set_verbose(false);
        assert!(!is_verbose());
    }

    #[test]
    fn emphasized_quotes_value_without_terminal() {
        if !std::io::stderr().is_terminal() {
            assert_eq!(emphasized("index.js"), "'index.js'");
        }
    }
}
