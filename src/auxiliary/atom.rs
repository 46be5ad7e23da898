//! Atoms in molecular geometries.

use std::fmt;

use anyhow::{self, format_err};
use derive_builder::Builder;
use nalgebra::Point3;

use crate::io::{parse_fortran_float, ParseError};

#[cfg(test)]
#[path = "atom_tests.rs"]
mod atom_tests;

/// The number of bohrs in one ångström.
pub const BOHR_PER_ANGSTROM: f64 = 1.0 / 0.529_177_210_903;

/// A structure storing an atom of a molecular geometry.
#[derive(Clone, Builder, Debug, PartialEq)]
pub struct Atom {
    /// The label of the atom, usually its chemical symbol.
    pub label: String,

    /// The one-based position of the atom in its geometry.
    pub index: usize,

    /// The nuclear charge of the atom.
    pub charge: f64,

    /// The position of the atom in bohrs.
    pub coordinates: Point3<f64>,
}

impl Atom {
    /// Returns a builder to construct a new [`Atom`].
    pub fn builder() -> AtomBuilder {
        AtomBuilder::default()
    }

    /// Constructs a new [`Atom`].
    ///
    /// # Arguments
    ///
    /// * `label` - The label of the atom.
    /// * `index` - The one-based position of the atom in its geometry.
    /// * `charge` - The nuclear charge of the atom.
    /// * `coordinates` - The position of the atom in bohrs.
    pub fn new(
        label: &str,
        index: usize,
        charge: f64,
        coordinates: Point3<f64>,
    ) -> Result<Self, anyhow::Error> {
        Self::builder()
            .label(label.to_string())
            .index(index)
            .charge(charge)
            .coordinates(coordinates)
            .build()
            .map_err(|err| format_err!(err))
    }

    /// Parses an atom record of the geometry table in an XMVB log. The record tokens are the
    /// label, the charge, and the three Cartesian coordinates in bohrs.
    ///
    /// # Arguments
    ///
    /// * `line` - The record to parse.
    /// * `index` - The one-based position to assign to the atom.
    ///
    /// # Errors
    ///
    /// Errors with [`ParseError::MalformedRecord`] if the record has fewer than five tokens or a
    /// numeric token does not parse.
    pub fn from_log_record(line: &str, index: usize) -> Result<Self, ParseError> {
        let tokens = line.split_whitespace().collect::<Vec<_>>();
        if tokens.len() < 5 {
            return Err(ParseError::MalformedRecord {
                record: line.to_string(),
                reason: "an atom record needs a label, a charge, and three coordinates"
                    .to_string(),
            });
        }
        let values = tokens[1..5]
            .iter()
            .map(|token| parse_fortran_float(token))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            label: tokens[0].to_string(),
            index,
            charge: values[0],
            coordinates: Point3::new(values[1], values[2], values[3]),
        })
    }

    /// Parses an atom record of a Molden `[Atoms]` section. The record tokens are the label, the
    /// index, the atomic number, and the three Cartesian coordinates.
    ///
    /// # Arguments
    ///
    /// * `line` - The record to parse.
    /// * `bohr_per_unit` - The number of bohrs per coordinate unit of the section.
    ///
    /// # Errors
    ///
    /// Errors with [`ParseError::MalformedRecord`] if the record has fewer than six tokens or a
    /// numeric token does not parse.
    pub fn from_molden_record(line: &str, bohr_per_unit: f64) -> Result<Self, ParseError> {
        let tokens = line.split_whitespace().collect::<Vec<_>>();
        if tokens.len() < 6 {
            return Err(ParseError::MalformedRecord {
                record: line.to_string(),
                reason: "an atom record needs a label, an index, an atomic number, and three coordinates"
                    .to_string(),
            });
        }
        let index = tokens[1]
            .parse::<usize>()
            .map_err(|_| ParseError::MalformedRecord {
                record: line.to_string(),
                reason: "the atom index is not a positive integer".to_string(),
            })?;
        let values = tokens[2..6]
            .iter()
            .map(|token| parse_fortran_float(token))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            label: tokens[0].to_string(),
            index,
            charge: values[0],
            coordinates: Point3::new(values[1], values[2], values[3]) * bohr_per_unit,
        })
    }
}

impl fmt::Display for Atom {
    /// Writes the atom as a Molden `[Atoms]` record in bohrs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:>6}{:>15.8}{:>15.8}{:>15.8}{:>15.8}",
            self.label,
            self.index,
            self.charge,
            self.coordinates[0],
            self.coordinates[1],
            self.coordinates[2],
        )
    }
}
