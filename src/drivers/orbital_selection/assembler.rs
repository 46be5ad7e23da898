//! Assembly of a derived set of orbitals from the columns of a source set.

use anyhow;
use ndarray::{s, Array1};

use crate::basis::ao::BasisSet;
use crate::drivers::orbital_selection::command::{SelectionCommand, SelectionError};
use crate::interfaces::xmvb::guess::encode_guess;
use crate::reorder::{reorder_basis, ReorderDirection};
use crate::target::orbital::{MolecularOrbitals, OrbitalMetadata};

#[cfg(test)]
#[path = "assembler_tests.rs"]
mod assembler_tests;

/// A structure accumulating orbitals selected from, or derived from, a source set of orbitals.
///
/// Rotations and scalings act on the source in place, so later selections see their effect.
/// Selections append copies of source columns and are never changed afterwards.
#[derive(Clone, Debug)]
pub struct OrbitalAssembler {
    /// The source orbitals.
    source: MolecularOrbitals,

    /// The row ranges of the atoms, indexed by zero-based atom position.
    atom_ranges: Vec<(usize, usize)>,

    /// The selected columns with the metadata of their source columns.
    selected: Vec<(Array1<f64>, OrbitalMetadata)>,
}

impl OrbitalAssembler {
    /// Constructs a new assembler.
    ///
    /// # Arguments
    ///
    /// * `source` - The source orbitals.
    /// * `basis` - The basis set of the source orbitals, used to find the functions of each atom.
    /// * `n_atoms` - The number of atoms in the molecule.
    pub fn new(source: MolecularOrbitals, basis: &BasisSet, n_atoms: usize) -> Self {
        let atom_ranges = (1..=n_atoms)
            .map(|atom| basis.function_range_of_atom(atom))
            .collect::<Vec<_>>();
        Self {
            source,
            atom_ranges,
            selected: vec![],
        }
    }

    /// The source orbitals in their current state.
    pub fn source(&self) -> &MolecularOrbitals {
        &self.source
    }

    /// The number of orbitals selected so far.
    pub fn n_selected(&self) -> usize {
        self.selected.len()
    }

    fn check_columns(&self, columns: &[usize]) -> Result<(), SelectionError> {
        let n_orbitals = self.source.n_orbitals();
        match columns.iter().find(|col| **col == 0 || **col > n_orbitals) {
            Some(col) => Err(SelectionError(format!(
                "orbital {col} does not exist; there are {n_orbitals} orbitals"
            ))),
            None => Ok(()),
        }
    }

    fn check_atoms(&self, atoms: &[usize]) -> Result<(), SelectionError> {
        let n_atoms = self.atom_ranges.len();
        match atoms.iter().find(|atom| **atom == 0 || **atom > n_atoms) {
            Some(atom) => Err(SelectionError(format!(
                "atom {atom} does not exist; there are {n_atoms} atoms"
            ))),
            None => Ok(()),
        }
    }

    /// Appends whole source columns to the selection.
    pub fn select_columns(&mut self, columns: &[usize]) -> Result<(), SelectionError> {
        self.check_columns(columns)?;
        for col in columns {
            self.selected.push((
                self.source.coefficients().column(col - 1).to_owned(),
                self.source.metadata()[col - 1].clone(),
            ));
        }
        Ok(())
    }

    /// Appends source columns to the selection with every row outside the functions of `atoms`
    /// set to zero.
    pub fn select_masked(
        &mut self,
        atoms: &[usize],
        columns: &[usize],
    ) -> Result<(), SelectionError> {
        self.check_atoms(atoms)?;
        self.check_columns(columns)?;
        for col in columns {
            let source_column = self.source.coefficients().column(col - 1);
            let mut masked = Array1::<f64>::zeros(source_column.len());
            for atom in atoms {
                let (start, end) = self.atom_ranges[atom - 1];
                masked
                    .slice_mut(s![start..end])
                    .assign(&source_column.slice(s![start..end]));
            }
            self.selected
                .push((masked, self.source.metadata()[col - 1].clone()));
        }
        Ok(())
    }

    /// Rotates two source columns in place. With $`\theta`$ in degrees, the column pair
    /// $`(a, b)`$ becomes $`(a \cos\theta - b \sin\theta, a \sin\theta + b \cos\theta)`$.
    pub fn rotate(&mut self, angle: f64, columns: (usize, usize)) -> Result<(), SelectionError> {
        self.check_columns(&[columns.0, columns.1])?;
        if columns.0 == columns.1 {
            return Err(SelectionError(
                "an orbital cannot be rotated with itself".to_string(),
            ));
        }
        let (sin, cos) = angle.to_radians().sin_cos();
        let coefficients = self.source.coefficients_mut();
        let a = coefficients.column(columns.0 - 1).to_owned();
        let b = coefficients.column(columns.1 - 1).to_owned();
        coefficients
            .column_mut(columns.0 - 1)
            .assign(&(&a * cos - &b * sin));
        coefficients
            .column_mut(columns.1 - 1)
            .assign(&(&a * sin + &b * cos));
        Ok(())
    }

    /// Multiplies a source column in place by a factor.
    pub fn scale(&mut self, factor: f64, column: usize) -> Result<(), SelectionError> {
        self.check_columns(&[column])?;
        self.source
            .coefficients_mut()
            .column_mut(column - 1)
            .mapv_inplace(|value| value * factor);
        Ok(())
    }

    /// Applies a command and describes its effect.
    ///
    /// # Errors
    ///
    /// Errors if the command refers to an orbital or atom that does not exist, or if it is
    /// [`SelectionCommand::Quit`], which ends a session rather than changing the orbitals.
    pub fn apply(&mut self, command: &SelectionCommand) -> Result<String, SelectionError> {
        match command {
            SelectionCommand::SelectAll { columns } => {
                self.select_columns(columns)?;
                Ok(format!(
                    "{} orbital(s) added; {} selected in total.",
                    columns.len(),
                    self.n_selected()
                ))
            }
            SelectionCommand::SelectMasked { atoms, columns } => {
                self.select_masked(atoms, columns)?;
                Ok(format!(
                    "{} orbital(s) restricted to {} atom(s) added; {} selected in total.",
                    columns.len(),
                    atoms.len(),
                    self.n_selected()
                ))
            }
            SelectionCommand::Rotate { angle, columns } => {
                self.rotate(*angle, *columns)?;
                Ok(format!(
                    "Orbital {} and orbital {} have been rotated by {angle} degrees.",
                    columns.0, columns.1
                ))
            }
            SelectionCommand::Scale { factor, column } => {
                self.scale(*factor, *column)?;
                Ok(format!("Orbital {column} has been multiplied by {factor}."))
            }
            SelectionCommand::Quit => Err(SelectionError(
                "`q` ends the session and cannot be applied".to_string(),
            )),
        }
    }

    /// The selected orbitals, in Molden component order.
    pub fn selected_orbitals(&self) -> Result<MolecularOrbitals, anyhow::Error> {
        MolecularOrbitals::from_columns(self.source.n_funcs(), &self.selected)
    }

    /// Encodes the selected orbitals as an XMVB guess, after restoring the XMVB component order.
    ///
    /// # Arguments
    ///
    /// * `basis` - The basis set of the source orbitals.
    /// * `zero_threshold` - Coefficients with magnitudes at or below this are omitted.
    pub fn to_guess(&self, basis: &BasisSet, zero_threshold: f64) -> Result<String, anyhow::Error> {
        let (mut coefficients, _) = self.selected_orbitals()?.into_parts();
        reorder_basis(&mut coefficients, basis, ReorderDirection::FromMolden)?;
        Ok(encode_guess(&coefficients, zero_threshold))
    }
}
