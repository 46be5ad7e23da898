//! File input and output for MoldenBridge.

use std::error::Error;
use std::ffi::OsString;
use std::fmt;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{self, format_err, Context};
use serde::de::DeserializeOwned;
use serde_yaml;

pub(crate) mod cursor;
pub mod format;

/// An enumerated type for the file types handled by MoldenBridge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoldenBridgeFileType {
    /// Variant for XMVB log files containing the geometry and basis-set tables.
    Xmo,

    /// Variant for XMVB guess dumps containing an embedded `Initial Guess` block.
    Xdat,

    /// Variant for sparse guess files written for XMVB.
    Gus,

    /// Variant for Molden files.
    Molden,
}

impl MoldenBridgeFileType {
    /// Returns the extension of the file type.
    pub fn ext(&self) -> String {
        match self {
            MoldenBridgeFileType::Xmo => "xmo".to_string(),
            MoldenBridgeFileType::Xdat => "xdat".to_string(),
            MoldenBridgeFileType::Gus => "gus".to_string(),
            MoldenBridgeFileType::Molden => "molden".to_string(),
        }
    }
}

/// Appends the extension of a file type to a base name.
///
/// Base names may already contain dots (*e.g.* `h2o.opt`), so the extension is appended rather
/// than substituted.
///
/// # Arguments
///
/// * `name` - The base name of the file.
/// * `file_type` - The type of the file.
///
/// # Returns
///
/// The full path of the file.
pub fn path_with_ext<P: AsRef<Path>>(name: P, file_type: MoldenBridgeFileType) -> PathBuf {
    let mut path = OsString::from(name.as_ref().as_os_str());
    path.push(".");
    path.push(file_type.ext());
    PathBuf::from(path)
}

/// Reads a whole text file into a string.
///
/// # Arguments
///
/// * `path` - The path to the file to be read.
///
/// # Returns
///
/// A `Result` containing the contents of the file.
pub fn read_text<P: AsRef<Path>>(path: P) -> Result<String, anyhow::Error> {
    fs::read_to_string(path.as_ref())
        .with_context(|| format!("Unable to read `{}`", path.as_ref().display()))
}

/// Writes a string into a text file, replacing any existing file.
///
/// # Arguments
///
/// * `path` - The path to the file to be written.
/// * `contents` - The text to be written.
///
/// # Returns
///
/// A `Result` indicating if the writing process has been successful.
pub fn write_text<P: AsRef<Path>>(path: P, contents: &str) -> Result<(), anyhow::Error> {
    fs::write(path.as_ref(), contents)
        .with_context(|| format!("Unable to write `{}`", path.as_ref().display()))
}

/// Reads a MoldenBridge configuration YAML file and deserialises it into an appropriate
/// structure.
///
/// # Arguments
///
/// * `name` - The name of the file to be read in (with its `.yml` or `.yaml` extension).
///
/// # Returns
///
/// A `Result` containing the structure deserialised from the read-in file.
pub fn read_moldenbridge_yaml<T, P: AsRef<Path>>(name: P) -> Result<T, anyhow::Error>
where
    T: DeserializeOwned,
{
    let mut reader = BufReader::new(File::open(name).map_err(|err| format_err!(err))?);
    serde_yaml::from_reader(&mut reader).map_err(|err| format_err!(err))
}

/// Parses a floating-point token that may use the Fortran `D` exponent marker.
pub(crate) fn parse_fortran_float(token: &str) -> Result<f64, ParseError> {
    token
        .replace(['D', 'd'], "E")
        .parse::<f64>()
        .map_err(|_| ParseError::MalformedRecord {
            record: token.to_string(),
            reason: "not a floating-point number".to_string(),
        })
}

/// Parses an unsigned integer token, citing the enclosing record on failure.
pub(crate) fn parse_count(token: &str, record: &str) -> Result<usize, ParseError> {
    token
        .parse::<usize>()
        .map_err(|_| ParseError::MalformedRecord {
            record: record.to_string(),
            reason: format!("`{token}` is not a non-negative integer"),
        })
}

// ----------
// ParseError
// ----------

/// An enumerated type for errors arising from reading XMVB and Molden text.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A required section or marker was not found.
    SectionNotFound(String),

    /// A record has fewer tokens than required or a token does not parse.
    MalformedRecord {
        /// The offending record.
        record: String,

        /// Why the record is rejected.
        reason: String,
    },

    /// The number of entries found disagrees with the number declared.
    CountMismatch {
        /// What is being counted.
        what: String,

        /// The declared number.
        expected: usize,

        /// The number actually found.
        found: usize,
    },

    /// The number of atomic-orbital functions implied by the basis disagrees with the declared
    /// number.
    AoCountMismatch {
        /// The declared number of functions.
        declared: usize,

        /// The number of functions summed over all shells.
        found: usize,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::SectionNotFound(section) => {
                write!(f, "Section or marker `{section}` not found.")
            }
            ParseError::MalformedRecord { record, reason } => {
                write!(f, "Malformed record `{}`: {reason}.", record.trim())
            }
            ParseError::CountMismatch {
                what,
                expected,
                found,
            } => write!(f, "Expected {expected} {what}, but found {found}."),
            ParseError::AoCountMismatch { declared, found } => write!(
                f,
                "The log declares {declared} Cartesian basis functions, but the basis shells sum to {found}."
            ),
        }
    }
}

impl Error for ParseError {}
