//! Commands of the interactive orbital-selection session.

use std::error::Error;
use std::fmt;
use std::str::FromStr;

#[cfg(test)]
#[path = "command_tests.rs"]
mod command_tests;

// ----------------
// Selection errors
// ----------------

/// An error for a selection command that cannot be parsed or refers to something that does not
/// exist. Such errors are reported and the session continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionError(pub String);

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid selection: {}", self.0)
    }
}

impl Error for SelectionError {}

// ------------------
// Selection commands
// ------------------

/// An enumerated type for the commands of an orbital-selection session. All indices are
/// one-based.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionCommand {
    /// Appends whole source columns to the selection (`a <cols>`).
    SelectAll {
        /// The source columns.
        columns: Vec<usize>,
    },

    /// Appends source columns restricted to the functions of some atoms (`<atoms> <cols>`).
    SelectMasked {
        /// The atoms whose functions are kept, in increasing order.
        atoms: Vec<usize>,

        /// The source columns.
        columns: Vec<usize>,
    },

    /// Rotates two source columns in place by an angle in degrees (`r<angle> <c1>,<c2>`).
    Rotate {
        /// The rotation angle in degrees.
        angle: f64,

        /// The two distinct source columns.
        columns: (usize, usize),
    },

    /// Multiplies a source column in place by a factor (`m<factor> <col>`).
    Scale {
        /// The scale factor.
        factor: f64,

        /// The source column.
        column: usize,
    },

    /// Writes the selection and ends the session (`q`).
    Quit,
}

/// Parses a list of one-based indices made of comma-separated integers and inclusive ranges,
/// *e.g.* `2,4,6-8`.
///
/// # Errors
///
/// Errors if an item is not an integer or a range, if an index is zero, or if a range is
/// descending.
pub fn parse_index_list(s: &str) -> Result<Vec<usize>, SelectionError> {
    let parse_index = |token: &str| {
        token
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|index| *index > 0)
            .ok_or_else(|| SelectionError(format!("`{token}` is not a positive integer")))
    };
    let mut indices = vec![];
    for item in s.split(',') {
        if let Some((start, end)) = item.split_once('-') {
            let (start, end) = (parse_index(start)?, parse_index(end)?);
            if start > end {
                return Err(SelectionError(format!("the range `{item}` is descending")));
            }
            indices.extend(start..=end);
        } else {
            indices.push(parse_index(item)?);
        }
    }
    Ok(indices)
}

/// Parses a finite number following a one-letter command prefix.
fn parse_parameter(token: &str, what: &str) -> Result<f64, SelectionError> {
    token[1..]
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| SelectionError(format!("`{}` is not a valid {what}", &token[1..])))
}

impl FromStr for SelectionCommand {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens = s.split_whitespace().collect::<Vec<_>>();
        let Some(head) = tokens.first() else {
            return Err(SelectionError("empty command".to_string()));
        };
        let head_lower = head.to_lowercase();
        if head_lower == "q" && tokens.len() == 1 {
            return Ok(SelectionCommand::Quit);
        }
        if tokens.len() != 2 {
            return Err(SelectionError(format!(
                "`{}` should consist of two fields",
                s.trim()
            )));
        }

        if head_lower.starts_with('r') {
            let angle = parse_parameter(head, "rotation angle")?;
            let columns = parse_index_list(tokens[1])?;
            match columns.as_slice() {
                [first, second] if first != second => Ok(SelectionCommand::Rotate {
                    angle,
                    columns: (*first, *second),
                }),
                [_, _] => Err(SelectionError(
                    "an orbital cannot be rotated with itself".to_string(),
                )),
                _ => Err(SelectionError(
                    "a rotation needs exactly two orbitals".to_string(),
                )),
            }
        } else if head_lower.starts_with('m') {
            let factor = parse_parameter(head, "scale factor")?;
            match parse_index_list(tokens[1])?.as_slice() {
                [column] => Ok(SelectionCommand::Scale {
                    factor,
                    column: *column,
                }),
                _ => Err(SelectionError(
                    "a scaling needs exactly one orbital".to_string(),
                )),
            }
        } else if head_lower == "a" {
            Ok(SelectionCommand::SelectAll {
                columns: parse_index_list(tokens[1])?,
            })
        } else {
            let mut atoms = parse_index_list(head)?;
            atoms.sort_unstable();
            atoms.dedup();
            Ok(SelectionCommand::SelectMasked {
                atoms,
                columns: parse_index_list(tokens[1])?,
            })
        }
    }
}

impl fmt::Display for SelectionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |indices: &[usize]| {
            indices
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",")
        };
        match self {
            SelectionCommand::SelectAll { columns } => write!(f, "a {}", join(columns)),
            SelectionCommand::SelectMasked { atoms, columns } => {
                write!(f, "{} {}", join(atoms), join(columns))
            }
            SelectionCommand::Rotate { angle, columns } => {
                write!(f, "r{angle} {},{}", columns.0, columns.1)
            }
            SelectionCommand::Scale { factor, column } => write!(f, "m{factor} {column}"),
            SelectionCommand::Quit => write!(f, "q"),
        }
    }
}
