//! Interface with XMVB logs, guess dumps and eigenvector dumps.

use std::fmt;
use std::path::Path;

use anyhow::{self, ensure, Context};
use ndarray::Array2;

use crate::auxiliary::atom::Atom;
use crate::basis::ao::BasisSet;
use crate::interfaces::molden::MoldenFile;
use crate::io::format::write_subtitle;
use crate::io::read_text;
use crate::reorder::{reorder_basis, ReorderDirection};
use crate::target::orbital::{MolecularOrbitals, OrbitalMetadata};

pub mod eigen;
pub mod guess;
pub mod weights;
pub mod xmo;

#[cfg(test)]
#[path = "xmvb_tests.rs"]
mod xmvb_tests;

/// A structure containing the parts of an XMVB log needed to describe its orbitals.
#[derive(Clone, Debug, PartialEq)]
pub struct XmvbLog {
    /// The declared number of Cartesian Gaussian basis functions.
    pub n_funcs: usize,

    /// The atoms of the geometry table, with coordinates in bohr.
    pub atoms: Vec<Atom>,

    /// The basis set of the shell table, whose number of functions equals `n_funcs`.
    pub basis: BasisSet,
}

impl XmvbLog {
    /// Parses the header, geometry and shell table of an XMVB log.
    ///
    /// # Errors
    ///
    /// Errors if a section is missing or malformed, if the shells do not sum to the declared
    /// number of functions, or if the shell table names more atoms than the geometry holds.
    pub fn parse(text: &str) -> Result<Self, anyhow::Error> {
        let n_funcs = xmo::read_ao_count(text)?;
        let atoms = xmo::extract_geometry(text)?;
        let basis = xmo::parse_shell_table(text)?;
        basis.verify_n_funcs(n_funcs)?;
        ensure!(
            basis.n_atoms() <= atoms.len(),
            "The shell table lists {} atoms, but the geometry holds only {}.",
            basis.n_atoms(),
            atoms.len()
        );
        Ok(Self {
            n_funcs,
            atoms,
            basis,
        })
    }

    /// Reads and parses an XMVB log file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        Self::parse(&read_text(path.as_ref())?)
            .with_context(|| format!("Unable to parse `{}`", path.as_ref().display()))
    }

    /// Assembles a Molden file from orbital coefficients in XMVB component order.
    ///
    /// # Arguments
    ///
    /// * `coefficients` - The coefficients, with `n_funcs` rows and one column per orbital.
    /// * `metadata` - The metadata of the orbitals, in column order.
    /// * `title` - The title of the Molden file.
    ///
    /// # Errors
    ///
    /// Errors if the coefficients do not have `n_funcs` rows, or if the numbers of columns and
    /// metadata entries differ.
    pub fn to_molden(
        &self,
        mut coefficients: Array2<f64>,
        metadata: Vec<OrbitalMetadata>,
        title: &str,
    ) -> Result<MoldenFile, anyhow::Error> {
        reorder_basis(&mut coefficients, &self.basis, ReorderDirection::ToMolden)?;
        let orbitals = MolecularOrbitals::new(coefficients, metadata)?;
        MoldenFile::new(title, &self.atoms, &self.basis, orbitals)
    }
}

impl fmt::Display for XmvbLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_subtitle(f, "Geometry")?;
        for atom in self.atoms.iter() {
            writeln!(f, "{atom}")?;
        }
        writeln!(f)?;
        write_subtitle(f, "Basis set")?;
        write!(f, "{}", self.basis)
    }
}
