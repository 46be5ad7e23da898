//! Nice MoldenBridge output formatting.

use std::fmt;

/// The logging target to which main program output is sent.
pub const OUTPUT_TARGET: &str = "moldenbridge-output";

const MB_BANNER_LENGTH: usize = 79;

/// Logs an error to the `moldenbridge-output` logger.
macro_rules! mb_error {
    ($fmt:expr $(, $($arg:tt)*)?) => {
        log::error!($fmt, $($($arg)*)?);
        log::error!(target: $crate::io::format::OUTPUT_TARGET, $fmt, $($($arg)*)?);
    }
}

/// Logs a warning to the `moldenbridge-output` logger.
macro_rules! mb_warn {
    ($fmt:expr $(, $($arg:tt)*)?) => {
        log::warn!(target: $crate::io::format::OUTPUT_TARGET, $fmt, $($($arg)*)?);
    }
}

/// Logs a main output line to the `moldenbridge-output` logger.
macro_rules! mb_output {
    ($fmt:expr $(, $($arg:tt)*)?) => {
        log::info!(target: $crate::io::format::OUTPUT_TARGET, $fmt, $($($arg)*)?);
    }
}

pub(crate) use {mb_error, mb_output, mb_warn};

/// Logs a nicely formatted section title to the `moldenbridge-output` logger.
pub(crate) fn log_title(title: &str) {
    let length = title.chars().count().max(MB_BANNER_LENGTH - 6);
    let bar = "─".repeat(length);
    mb_output!("┌──{bar}──┐");
    mb_output!("│§ {title:^length$} §│");
    mb_output!("└──{bar}──┘");
}

/// Logs a nicely formatted subtitle to the `moldenbridge-output` logger.
pub(crate) fn log_subtitle(subtitle: &str) {
    let length = subtitle.chars().count();
    let bar = "═".repeat(length);
    mb_output!("{}", subtitle);
    mb_output!("{}", bar);
}

/// Writes a nicely formatted subtitle.
pub(crate) fn write_subtitle(f: &mut fmt::Formatter<'_>, subtitle: &str) -> fmt::Result {
    let length = subtitle.chars().count();
    let bar = "═".repeat(length);
    writeln!(f, "{subtitle}")?;
    writeln!(f, "{bar}")?;
    Ok(())
}

/// Formats a floating-point value right-aligned in `width` columns with `precision` decimals, or
/// with the shortest exact representation if the fixed-point text does not read back as `value`.
pub(crate) fn fixed_or_exact(value: f64, width: usize, precision: usize) -> String {
    let fixed = format!("{value:>width$.precision$}");
    if fixed.trim().parse::<f64>().map_or(false, |parsed| parsed == value) {
        fixed
    } else {
        format!("{value:>width$}")
    }
}

/// Turns a boolean into a string of `yes` or `no`.
pub(crate) fn nice_bool(b: bool) -> String {
    if b {
        "yes".to_string()
    } else {
        "no".to_string()
    }
}

/// A trait for logging MoldenBridge outputs nicely.
pub(crate) trait MoldenBridgeOutput: fmt::Debug + fmt::Display {
    /// Logs display output nicely.
    fn log_output_display(&self) {
        let lines = self.to_string();
        lines.lines().for_each(|line| {
            mb_output!("{line}");
        })
    }
}

// Blanket implementation
impl<T> MoldenBridgeOutput for T where T: fmt::Debug + fmt::Display {}
