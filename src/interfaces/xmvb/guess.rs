//! Codecs for XMVB orbital guesses.
//!
//! A guess lists only the nonzero coefficients of each orbital as `(value, row)` pairs with
//! one-based rows. Two layouts are read:
//!
//! * the sparse layout, in which a header of per-orbital entry counts precedes a single stream
//!   of pairs, optionally wrapped in `Initial Guess` marker lines, and
//! * the dense layout, in which every orbital opens with an `# ORBITAL <k>` line.
//!
//! The encoder writes both a count header and `# ORBITAL` lines, so its output can be read back
//! by either decoder.

use anyhow;
use itertools::Itertools;
use log;
use ndarray::Array2;

use crate::io::cursor::LineCursor;
use crate::io::{parse_count, parse_fortran_float, ParseError};

#[cfg(test)]
#[path = "guess_tests.rs"]
mod guess_tests;

/// The line opening the guess block of an XMVB dump.
pub const GUESS_START_MARKER: &str = "--------------Initial Guess--------------";

/// The line closing the guess block of an XMVB dump.
pub const GUESS_END_MARKER: &str = "--------------End of Guess--------------";

const ORBITAL_HEADER: &str = "# ORBITAL";

const PAIRS_PER_LINE: usize = 4;

// -------
// Helpers
// -------

/// Returns the text between the guess markers, or the whole text if there is no start marker.
fn guess_block(text: &str) -> Result<&str, ParseError> {
    let Some(start) = text.find(GUESS_START_MARKER) else {
        return Ok(text);
    };
    let after_start = &text[start + GUESS_START_MARKER.len()..];
    let end = after_start
        .find(GUESS_END_MARKER)
        .ok_or_else(|| ParseError::SectionNotFound(GUESS_END_MARKER.to_string()))?;
    Ok(&after_start[..end])
}

/// Parses a line of `(value, row)` pairs. Rows are one-based and must lie within `n_rows`.
fn parse_pairs(line: &str, n_rows: usize) -> Result<Vec<(f64, usize)>, ParseError> {
    let tokens = line.split_whitespace().collect::<Vec<_>>();
    if tokens.len() % 2 != 0 {
        return Err(ParseError::MalformedRecord {
            record: line.to_string(),
            reason: "coefficients and rows must come in pairs".to_string(),
        });
    }
    tokens
        .chunks_exact(2)
        .map(|pair| {
            let value = parse_fortran_float(pair[0]).map_err(|_| ParseError::MalformedRecord {
                record: line.to_string(),
                reason: format!("`{}` is not a coefficient", pair[0]),
            })?;
            let row = parse_count(pair[1], line)?;
            if row == 0 || row > n_rows {
                Err(ParseError::MalformedRecord {
                    record: line.to_string(),
                    reason: format!("row {row} lies outside 1..={n_rows}"),
                })
            } else {
                Ok((value, row))
            }
        })
        .collect()
}

/// Parses the one-based orbital number of an `# ORBITAL <k>` line.
fn parse_orbital_header(line: &str, label: &str) -> Result<usize, ParseError> {
    let k = parse_count(label.trim(), line)?;
    if k == 0 {
        Err(ParseError::MalformedRecord {
            record: line.to_string(),
            reason: "orbitals are numbered from 1".to_string(),
        })
    } else {
        Ok(k)
    }
}

/// Reads the per-orbital entry counts. The counts end at the first line that holds a decimal
/// point or an `# ORBITAL` header; that line is handed back to `lines`.
fn read_entry_counts(lines: &mut LineCursor<'_>) -> Result<Vec<usize>, ParseError> {
    let mut counts = vec![];
    while let Some(line) = lines.next_line() {
        let trimmed = line.trim();
        if trimmed.contains('.') || trimmed.starts_with(ORBITAL_HEADER) {
            lines.push_back(line);
            break;
        }
        for token in trimmed.split_whitespace() {
            counts.push(parse_count(token, line)?);
        }
    }
    Ok(counts)
}

// --------
// Decoders
// --------

/// Decodes a sparse guess into a dense coefficient matrix.
///
/// The per-orbital counts become cumulative boundaries, and the $`i`$-th entry of the stream
/// belongs to the first orbital whose boundary exceeds $`i`$. Entries not listed are zero.
///
/// # Arguments
///
/// * `text` - The guess text. If it contains an `Initial Guess` marker line, only the block
///   between the markers is read.
/// * `n_rows` - The number of atomic-orbital functions.
///
/// # Returns
///
/// An `n_rows` by $`k`$ matrix, where $`k`$ is the number of declared counts.
///
/// # Errors
///
/// Errors with [`ParseError::CountMismatch`] if the number of entries differs from the sum of
/// the declared counts, or if an `# ORBITAL` line does not sit at the boundary of the orbital it
/// names. Malformed records are also errors.
pub fn decode_guess_block(text: &str, n_rows: usize) -> Result<Array2<f64>, anyhow::Error> {
    let mut lines = LineCursor::new(guess_block(text)?);
    let counts = read_entry_counts(&mut lines)?;
    let boundaries = counts
        .iter()
        .scan(0, |acc, count| {
            *acc += count;
            Some(*acc)
        })
        .collect::<Vec<_>>();
    let n_declared = boundaries.last().copied().unwrap_or(0);

    let mut entries: Vec<(f64, usize)> = Vec::with_capacity(n_declared);
    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(label) = trimmed.strip_prefix(ORBITAL_HEADER) {
            let k = parse_orbital_header(line, label)?;
            let start = boundaries
                .get(k - 1)
                .map(|end| end - counts[k - 1])
                .ok_or_else(|| ParseError::MalformedRecord {
                    record: line.to_string(),
                    reason: format!("only {} orbital counts are declared", counts.len()),
                })?;
            if start != entries.len() {
                return Err(ParseError::CountMismatch {
                    what: format!("guess entries before orbital {k}"),
                    expected: start,
                    found: entries.len(),
                }
                .into());
            }
            continue;
        }
        entries.extend(parse_pairs(line, n_rows)?);
    }
    if entries.len() != n_declared {
        return Err(ParseError::CountMismatch {
            what: "guess entries".to_string(),
            expected: n_declared,
            found: entries.len(),
        }
        .into());
    }

    let mut coefficients = Array2::<f64>::zeros((n_rows, counts.len()));
    let mut col = 0;
    for (i, (value, row)) in entries.into_iter().enumerate() {
        while boundaries[col] <= i {
            col += 1;
        }
        coefficients[(row - 1, col)] = value;
    }
    log::debug!(
        "Decoded {n_declared} sparse guess entries into {} orbitals.",
        counts.len()
    );
    Ok(coefficients)
}

/// Decodes `# ORBITAL`-indexed guess blocks into a dense coefficient matrix.
///
/// Each `# ORBITAL <k>` line opens orbital $`k`$, and the `(value, row)` pairs up to the next
/// such line fill its column. Lines before the first header are ignored. Entries not listed are
/// zero.
///
/// # Arguments
///
/// * `text` - The guess text.
/// * `n_rows` - The number of atomic-orbital functions.
///
/// # Returns
///
/// An `n_rows` by $`k`$ matrix, where $`k`$ is the largest orbital number found.
///
/// # Errors
///
/// Errors if a header or pair is malformed, or if a row lies outside `n_rows`.
pub fn decode_orbital_blocks(text: &str, n_rows: usize) -> Result<Array2<f64>, anyhow::Error> {
    let mut blocks: Vec<(usize, Vec<(f64, usize)>)> = vec![];
    for line in text.lines() {
        let trimmed = line.trim();
        if let Some(label) = trimmed.strip_prefix(ORBITAL_HEADER) {
            blocks.push((parse_orbital_header(line, label)?, vec![]));
        } else if let Some((_, entries)) = blocks.last_mut() {
            entries.extend(parse_pairs(line, n_rows)?);
        }
    }
    let n_cols = blocks.iter().map(|(k, _)| *k).max().unwrap_or(0);
    let mut coefficients = Array2::<f64>::zeros((n_rows, n_cols));
    for (k, entries) in blocks {
        for (value, row) in entries {
            coefficients[(row - 1, k - 1)] = value;
        }
    }
    log::debug!("Decoded {n_cols} orbital blocks.");
    Ok(coefficients)
}

// -------
// Encoder
// -------

/// Encodes the columns of a coefficient matrix as a guess.
///
/// Only entries whose magnitude exceeds `zero_threshold` are written. The output opens with a
/// line of per-orbital entry counts and then lists each orbital under an `# ORBITAL <k>` line,
/// with up to four `(value, row)` pairs per line.
///
/// # Arguments
///
/// * `coefficients` - The coefficient matrix with orbitals as columns.
/// * `zero_threshold` - Entries with magnitudes at or below this are omitted.
///
/// # Returns
///
/// The guess text.
pub fn encode_guess(coefficients: &Array2<f64>, zero_threshold: f64) -> String {
    let columns = coefficients
        .columns()
        .into_iter()
        .map(|column| {
            column
                .iter()
                .enumerate()
                .filter(|(_, value)| value.abs() > zero_threshold)
                .map(|(row, value)| (*value, row + 1))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let mut out = columns
        .iter()
        .map(|entries| format!("   {}", entries.len()))
        .collect::<String>();
    out.push('\n');
    for (k, entries) in columns.iter().enumerate() {
        out.push_str(&format!("{ORBITAL_HEADER}{:>11}\n", k + 1));
        for chunk in entries.chunks(PAIRS_PER_LINE) {
            out.push_str(
                &chunk
                    .iter()
                    .map(|(value, row)| format!("{value:>13.10} {row:>5}  "))
                    .join(""),
            );
            out.push('\n');
        }
    }
    out
}
