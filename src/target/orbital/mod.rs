//! Molecular orbitals as coefficient columns with per-column metadata.

use std::fmt;
use std::str::FromStr;

use anyhow::{self, ensure, format_err};
use derive_builder::Builder;
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};


// ==================
// Struct definitions
// ==================

/// An enumerated type for the spin label of a molecular orbital.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Spin {
    /// Variant for $`\alpha`$ spin.
    Alpha,

    /// Variant for $`\beta`$ spin.
    Beta,
}

impl FromStr for Spin {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "alpha" => Ok(Spin::Alpha),
            "beta" => Ok(Spin::Beta),
            _ => Err(format_err!("Unknown spin label `{s}`.")),
        }
    }
}

impl fmt::Display for Spin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Spin::Alpha => write!(f, "Alpha"),
            Spin::Beta => write!(f, "Beta"),
        }
    }
}

/// A structure containing the metadata attached to one molecular-orbital column.
#[derive(Clone, Builder, Debug, PartialEq)]
pub struct OrbitalMetadata {
    /// The symmetry label of the orbital.
    #[builder(setter(into), default = "\"1a\".to_string()")]
    pub symmetry: String,

    /// The energy of the orbital.
    #[builder(default = "1.0")]
    pub energy: f64,

    /// The spin of the orbital.
    #[builder(default = "Spin::Alpha")]
    pub spin: Spin,

    /// The occupation number of the orbital.
    #[builder(default = "2.0")]
    pub occupation: f64,
}

impl OrbitalMetadata {
    /// Returns a builder to construct a new [`OrbitalMetadata`].
    pub fn builder() -> OrbitalMetadataBuilder {
        OrbitalMetadataBuilder::default()
    }
}

impl Default for OrbitalMetadata {
    fn default() -> Self {
        Self {
            symmetry: "1a".to_string(),
            energy: 1.0,
            spin: Spin::Alpha,
            occupation: 2.0,
        }
    }
}

/// A structure to manage a set of molecular orbitals expressed in a common atomic-orbital basis.
/// Rows of the coefficient matrix are atomic-orbital functions and columns are orbitals.
#[derive(Clone, Debug, PartialEq)]
pub struct MolecularOrbitals {
    coefficients: Array2<f64>,
    metadata: Vec<OrbitalMetadata>,
}

impl MolecularOrbitals {
    /// Constructs a new set of molecular orbitals.
    ///
    /// # Errors
    ///
    /// Errors if the number of metadata entries differs from the number of columns.
    pub fn new(
        coefficients: Array2<f64>,
        metadata: Vec<OrbitalMetadata>,
    ) -> Result<Self, anyhow::Error> {
        ensure!(
            coefficients.ncols() == metadata.len(),
            "{} coefficient columns cannot carry {} metadata entries.",
            coefficients.ncols(),
            metadata.len()
        );
        Ok(Self {
            coefficients,
            metadata,
        })
    }

    /// Constructs a new set of molecular orbitals in which every column carries the same
    /// metadata.
    pub fn with_uniform_metadata(coefficients: Array2<f64>, metadata: &OrbitalMetadata) -> Self {
        let metadata = vec![metadata.clone(); coefficients.ncols()];
        Self {
            coefficients,
            metadata,
        }
    }

    /// Assembles a set of molecular orbitals from individual columns.
    ///
    /// # Arguments
    ///
    /// * `n_funcs` - The number of atomic-orbital functions, used when there are no columns.
    /// * `columns` - The coefficient columns together with their metadata.
    ///
    /// # Errors
    ///
    /// Errors if a column does not have `n_funcs` entries.
    pub fn from_columns(
        n_funcs: usize,
        columns: &[(Array1<f64>, OrbitalMetadata)],
    ) -> Result<Self, anyhow::Error> {
        let mut coefficients = Array2::<f64>::zeros((n_funcs, 0));
        for (column, _) in columns.iter() {
            coefficients
                .push_column(column.view())
                .map_err(|err| format_err!("Unable to append an orbital column: {err}"))?;
        }
        Self::new(
            coefficients,
            columns.iter().map(|(_, meta)| meta.clone()).collect(),
        )
    }

    /// The coefficient matrix.
    pub fn coefficients(&self) -> &Array2<f64> {
        &self.coefficients
    }

    /// The coefficient matrix, mutably.
    pub fn coefficients_mut(&mut self) -> &mut Array2<f64> {
        &mut self.coefficients
    }

    /// The metadata of the orbitals, in column order.
    pub fn metadata(&self) -> &[OrbitalMetadata] {
        &self.metadata
    }

    /// The number of atomic-orbital functions.
    pub fn n_funcs(&self) -> usize {
        self.coefficients.nrows()
    }

    /// The number of orbitals.
    pub fn n_orbitals(&self) -> usize {
        self.coefficients.ncols()
    }

    /// Consumes the orbitals and returns their coefficients and metadata.
    pub fn into_parts(self) -> (Array2<f64>, Vec<OrbitalMetadata>) {
        (self.coefficients, self.metadata)
    }
}

// =========
// Functions
// =========

/// Sorts eigenvalue/eigenvector pairs by descending eigenvalue. Exactly equal eigenvalues keep
/// their original relative order.
///
/// # Arguments
///
/// * `eigenvalues` - The eigenvalues.
/// * `eigenvectors` - The eigenvectors as columns, in the same order as `eigenvalues`.
///
/// # Returns
///
/// The sorted eigenvalues and the eigenvector columns rearranged identically.
///
/// # Errors
///
/// Errors if the number of eigenvalues differs from the number of eigenvector columns.
pub fn sort_eigenpairs(
    eigenvalues: &[f64],
    eigenvectors: &Array2<f64>,
) -> Result<(Vec<f64>, Array2<f64>), anyhow::Error> {
    ensure!(
        eigenvalues.len() == eigenvectors.ncols(),
        "{} eigenvalues cannot pair with {} eigenvectors.",
        eigenvalues.len(),
        eigenvectors.ncols()
    );
    let mut order = (0..eigenvalues.len()).collect::<Vec<_>>();
    order.sort_by(|&i, &j| eigenvalues[j].total_cmp(&eigenvalues[i]));
    let sorted_eigenvalues = order.iter().map(|&i| eigenvalues[i]).collect::<Vec<_>>();
    let sorted_eigenvectors = eigenvectors.select(Axis(1), &order);
    Ok((sorted_eigenvalues, sorted_eigenvectors))
}
