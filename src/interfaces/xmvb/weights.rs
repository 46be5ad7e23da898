//! Ranking of the structure-weight tables printed in XMVB logs.

use std::fmt;
use std::str::FromStr;

use anyhow::{self, format_err};
use serde::{Deserialize, Serialize};

use crate::io::cursor::LineCursor;
use crate::io::{parse_count, parse_fortran_float, ParseError};

#[cfg(test)]
#[path = "weights_tests.rs"]
mod weights_tests;

/// An enumerated type for the structure tables of an XMVB log that can be ranked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeightKind {
    /// Coulson-Chirgwin weights (`w`).
    Weights,

    /// Löwdin weights (`l`).
    Lowdin,

    /// Inverse weights (`i`).
    Inverse,

    /// Renormalised weights (`r`).
    Renormalized,

    /// Structure coefficients (`c`).
    Coefficients,

    /// Löwdin-orthogonalised structure coefficients (`lc`).
    LowdinCoefficients,
}

impl WeightKind {
    /// The text identifying the table of this kind in a log.
    pub fn section_key(&self) -> &'static str {
        match self {
            WeightKind::Weights => "WEIGHTS OF STRUCTURES",
            WeightKind::Lowdin => "Lowdin Weights",
            WeightKind::Inverse => "Inverse Weights",
            WeightKind::Renormalized => "Renormalized Weights",
            WeightKind::Coefficients => "COEFFICIENTS OF STRUCTURES",
            WeightKind::LowdinCoefficients => "LOWDIN ORTHOGONALIZED COEFFICIENTS OF STRUCTURES",
        }
    }
}

impl FromStr for WeightKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "w" => Ok(WeightKind::Weights),
            "l" => Ok(WeightKind::Lowdin),
            "i" => Ok(WeightKind::Inverse),
            "r" => Ok(WeightKind::Renormalized),
            "c" => Ok(WeightKind::Coefficients),
            "lc" => Ok(WeightKind::LowdinCoefficients),
            _ => Err(format_err!(
                "Unknown weight kind `{s}`. Expected one of w, l, i, r, c, lc."
            )),
        }
    }
}

impl fmt::Display for WeightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.section_key())
    }
}

/// A structure for one row of a structure-weight table.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightRow {
    /// The one-based structure number.
    pub number: usize,

    /// The weight or coefficient of the structure.
    pub weight: f64,

    /// The orbital occupation pattern describing the structure.
    pub description: String,
}

/// A structure-weight table ranked by descending weight.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightTable {
    kind: WeightKind,
    rows: Vec<WeightRow>,
}

impl WeightTable {
    /// Reads and ranks a structure-weight table from a log.
    ///
    /// The first line containing the section key of `kind` opens the table and the line after
    /// it is skipped. Rows follow until a blank line; rows with fewer than two tokens are
    /// ignored. Rows with equal weights keep their order in the log.
    ///
    /// # Errors
    ///
    /// Errors if the table is missing or a row does not parse.
    pub fn from_log(text: &str, kind: WeightKind) -> Result<Self, anyhow::Error> {
        let mut lines = LineCursor::new(text);
        lines
            .skip_past(|line| line.contains(kind.section_key()))
            .ok_or_else(|| ParseError::SectionNotFound(kind.section_key().to_string()))?;
        lines.next_line();

        let mut rows = vec![];
        for line in lines {
            let tokens = line.split_whitespace().collect::<Vec<_>>();
            if tokens.is_empty() {
                break;
            }
            if tokens.len() < 2 {
                continue;
            }
            rows.push(WeightRow {
                number: parse_count(tokens[0], line)?,
                weight: parse_fortran_float(tokens[1])?,
                description: tokens
                    .iter()
                    .skip(3)
                    .map(|token| format!("{token:>4}"))
                    .collect::<String>(),
            });
        }
        rows.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        Ok(Self { kind, rows })
    }

    /// The kind of this table.
    pub fn kind(&self) -> WeightKind {
        self.kind
    }

    /// The rows, in ranked order.
    pub fn rows(&self) -> &[WeightRow] {
        &self.rows
    }

    /// The sum of all weights.
    pub fn total(&self) -> f64 {
        self.rows.iter().map(|row| row.weight).sum()
    }
}

impl fmt::Display for WeightTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (rank, row) in self.rows.iter().enumerate() {
            writeln!(
                f,
                "{:>5}{:>5}{:^20.8}{}",
                rank + 1,
                row.number,
                row.weight,
                row.description
            )?;
        }
        writeln!(f, "{:>10}{:^20.8}", "Total", self.total())?;
        Ok(())
    }
}
