//! Readers for the header, geometry, and basis-set tables of XMVB logs.

use anyhow;
use lazy_static::lazy_static;
use log;
use regex::Regex;

use crate::auxiliary::atom::Atom;
use crate::basis::ao::{BasisAtom, BasisSet, BasisShell, Primitive, ShellKind};
use crate::io::cursor::LineCursor;
use crate::io::{parse_count, parse_fortran_float, ParseError};

#[cfg(test)]
#[path = "xmo_tests.rs"]
mod xmo_tests;

const AO_COUNT_MARKER: &str = "NUMBER OF CARTESIAN GAUSSIAN BASIS FUNCTIONS";
const GEOMETRY_HEADER: [&str; 4] = ["CHARGE", "X", "Y", "Z"];
const SHELL_TABLE_MARKER: &str = "SHELL TYPE";
const SHELL_TABLE_TERMINATOR: &str = "TOTAL NUMBER";

lazy_static! {
    static ref ATOM_PATTERN: Regex =
        Regex::new(r"^[A-Z][A-Z]?\b").expect("Invalid atomic-symbol pattern.");
}

/// Reads the declared number of Cartesian Gaussian basis functions from the header of a log.
///
/// # Errors
///
/// Errors if the header line is missing or its count does not parse.
pub fn read_ao_count(text: &str) -> Result<usize, ParseError> {
    let line = text
        .lines()
        .find(|line| line.trim_start().starts_with(AO_COUNT_MARKER))
        .ok_or_else(|| ParseError::SectionNotFound(AO_COUNT_MARKER.to_string()))?;
    let token = line
        .split_whitespace()
        .nth(7)
        .ok_or_else(|| ParseError::MalformedRecord {
            record: line.to_string(),
            reason: "no basis-function count found".to_string(),
        })?;
    parse_count(token, line)
}

/// Extracts the atoms of the geometry table that follows the `CHARGE X Y Z` header. The table
/// ends at the first blank line.
///
/// # Errors
///
/// Errors if the header is missing, if no atom follows it, or if an atom record is malformed.
pub fn extract_geometry(text: &str) -> Result<Vec<Atom>, ParseError> {
    let mut lines = LineCursor::new(text);
    lines
        .skip_past(|line| line.split_whitespace().eq(GEOMETRY_HEADER))
        .ok_or_else(|| ParseError::SectionNotFound(GEOMETRY_HEADER.join(" ")))?;
    let mut atoms: Vec<Atom> = vec![];
    while let Some(line) = lines.next_line() {
        if line.trim().is_empty() {
            break;
        }
        atoms.push(Atom::from_log_record(line, atoms.len() + 1)?);
    }
    if atoms.is_empty() {
        Err(ParseError::SectionNotFound(
            "atom records after `CHARGE X Y Z`".to_string(),
        ))
    } else {
        Ok(atoms)
    }
}

// ----------------
// ShellTableCursor
// ----------------

/// Explicit state threaded through one pass over a shell table.
#[derive(Debug, Default)]
struct ShellTableCursor {
    /// The row offset at which the next shell starts.
    offset: usize,

    /// The one-based index of the atom currently collecting shells, or zero before the first
    /// atom.
    atom_index: usize,

    /// The atoms completed so far, followed by the atom currently collecting shells.
    basis_atoms: Vec<BasisAtom>,
}

impl ShellTableCursor {
    fn open_atom(&mut self, label: &str) {
        self.atom_index += 1;
        self.basis_atoms.push(BasisAtom {
            index: self.atom_index,
            label: label.to_string(),
            basis_shells: vec![],
        });
    }

    fn push_shell(&mut self, shell: BasisShell, record: &str) -> Result<(), ParseError> {
        let current = self
            .basis_atoms
            .last_mut()
            .ok_or_else(|| ParseError::MalformedRecord {
                record: record.to_string(),
                reason: "shell found before any atom label".to_string(),
            })?;
        log::debug!(
            "{} shell with {} primitive(s) on atom {} at row offset {}.",
            shell.kind,
            shell.primitives.len(),
            self.atom_index,
            self.offset
        );
        self.offset += shell.n_funcs();
        current.basis_shells.push(shell);
        Ok(())
    }

    fn finish(self) -> BasisSet {
        BasisSet::new(&self.basis_atoms)
    }
}

/// Parses one contraction record of a shell. The record tokens are the shell number, the shell
/// type, the primitive number, the exponent, the coefficient, and for an $`sp`$ shell the $`p`$
/// coefficient.
fn parse_contraction(line: &str, kind: ShellKind) -> Result<Primitive, ParseError> {
    let tokens = line.split_whitespace().collect::<Vec<_>>();
    let n_required = if kind == ShellKind::L { 6 } else { 5 };
    if tokens.len() < n_required {
        return Err(ParseError::MalformedRecord {
            record: line.to_string(),
            reason: format!("a {kind} contraction needs {n_required} tokens"),
        });
    }
    let values = &tokens[3..n_required];
    Ok(Primitive {
        exponent: parse_fortran_float(values[0])?,
        coefficient: parse_fortran_float(values[1])?,
        sp_coefficient: if kind == ShellKind::L {
            Some(parse_fortran_float(values[2])?)
        } else {
            None
        },
        source_tokens: Some(values.iter().map(|token| token.to_string()).collect()),
    })
}

/// Parses a shell whose header record has just been read. Contraction records continue until a
/// blank line. A terminator or atom record ending the shell early is handed back to `lines`.
fn parse_shell(header: &str, lines: &mut LineCursor<'_>) -> Result<BasisShell, anyhow::Error> {
    let kind = header
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| ParseError::MalformedRecord {
            record: header.to_string(),
            reason: "no shell type found".to_string(),
        })?
        .parse::<ShellKind>()?;
    let mut prims = vec![parse_contraction(header, kind)?];
    while let Some(line) = lines.next_line() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            break;
        }
        if trimmed.contains(SHELL_TABLE_TERMINATOR) || ATOM_PATTERN.is_match(trimmed) {
            lines.push_back(line);
            break;
        }
        prims.push(parse_contraction(line, kind)?);
    }
    BasisShell::new(kind, &prims)
}

/// Parses the shell table of a log into a basis set.
///
/// The table starts one line after the `SHELL TYPE` header and ends at the `TOTAL NUMBER`
/// terminator. Atom-label records open a new atom; any other non-blank record opens a shell.
///
/// # Errors
///
/// Errors if the header is missing or a record is malformed.
pub fn parse_shell_table(text: &str) -> Result<BasisSet, anyhow::Error> {
    let mut lines = LineCursor::new(text);
    lines
        .skip_past(|line| line.contains(SHELL_TABLE_MARKER))
        .ok_or_else(|| ParseError::SectionNotFound(SHELL_TABLE_MARKER.to_string()))?;
    lines.next_line();

    let mut cursor = ShellTableCursor::default();
    let mut terminated = false;
    while let Some(line) = lines.next_line() {
        let trimmed = line.trim();
        if trimmed.contains(SHELL_TABLE_TERMINATOR) {
            terminated = true;
            break;
        }
        if trimmed.is_empty() {
            continue;
        }
        if ATOM_PATTERN.is_match(trimmed) {
            let label = trimmed.split_whitespace().next().unwrap_or(trimmed);
            cursor.open_atom(label);
        } else {
            let shell = parse_shell(line, &mut lines)?;
            cursor.push_shell(shell, line)?;
        }
    }
    if !terminated {
        log::warn!(
            "Shell table ended at line {} without a `{SHELL_TABLE_TERMINATOR}` line.",
            lines.line_number()
        );
    }
    Ok(cursor.finish())
}
