//! Decoder for fixed-width eigenvector dumps such as XMVB natural orbitals (`xmvb.no`).

use anyhow;
use log;
use ndarray::Array2;

use crate::io::cursor::LineCursor;
use crate::io::{parse_fortran_float, ParseError};

#[cfg(test)]
#[path = "eigen_tests.rs"]
mod eigen_tests;

const VALUES_PER_LINE: usize = 5;

/// Decodes an eigenvector dump.
///
/// Each record is a line whose first token is the eigenvalue, followed by $`\lceil n/5 \rceil`$
/// lines holding the $`n`$ eigenvector components, five per line. Values may use the Fortran `D`
/// exponent marker. The stream ends at a blank line or at the end of the text.
///
/// # Arguments
///
/// * `text` - The dump text.
/// * `n` - The number of components per eigenvector.
///
/// # Returns
///
/// The eigenvalues and an $`n \times k`$ matrix of eigenvectors as columns, where $`k`$ is the
/// number of records read.
///
/// # Errors
///
/// Errors if a data line holds the wrong number of values, if a record is cut short, if there
/// are no records or more than $`n`$ of them, or if a value does not parse.
pub fn decode_eigenvectors(
    text: &str,
    n: usize,
) -> Result<(Vec<f64>, Array2<f64>), anyhow::Error> {
    let mut lines = LineCursor::new(text);
    let mut eigenvalues: Vec<f64> = vec![];
    let mut components: Vec<f64> = vec![];
    while let Some(header) = lines.next_line() {
        let Some(token) = header.split_whitespace().next() else {
            break;
        };
        if eigenvalues.len() == n {
            return Err(ParseError::CountMismatch {
                what: "eigenvector records at most".to_string(),
                expected: n,
                found: n + 1,
            }
            .into());
        }
        eigenvalues.push(parse_fortran_float(token)?);

        let mut remaining = n;
        while remaining > 0 {
            let line = lines.next_line().ok_or_else(|| ParseError::MalformedRecord {
                record: header.to_string(),
                reason: format!("eigenvector ends {remaining} value(s) short"),
            })?;
            let values = line
                .split_whitespace()
                .map(parse_fortran_float)
                .collect::<Result<Vec<_>, _>>()?;
            let n_expected = remaining.min(VALUES_PER_LINE);
            if values.len() != n_expected {
                return Err(ParseError::MalformedRecord {
                    record: line.to_string(),
                    reason: format!("expected {n_expected} value(s), found {}", values.len()),
                }
                .into());
            }
            components.extend(values);
            remaining -= n_expected;
        }
    }
    if eigenvalues.is_empty() {
        return Err(ParseError::SectionNotFound("eigenvector records".to_string()).into());
    }

    let k = eigenvalues.len();
    let eigenvectors = Array2::from_shape_vec((k, n), components)?.reversed_axes();
    log::debug!("Decoded {k} eigenvectors of length {n}.");
    Ok((eigenvalues, eigenvectors))
}
