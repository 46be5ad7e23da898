//! Configuration of MoldenBridge from YAML files.

use std::fmt;
use std::path::Path;

use anyhow::{self, ensure, Context};
use serde::{Deserialize, Serialize};

use crate::io::format::nice_bool;
use crate::io::read_moldenbridge_yaml;
use crate::target::orbital::{OrbitalMetadata, Spin};


/// A structure containing MoldenBridge configuration options which can be serialised into and
/// deserialised from a YAML file. Every key is optional.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoldenBridgeConfig {
    /// The title written into Molden files.
    ///
    /// # Default
    ///
    /// `moldenbridge`.
    pub title: String,

    /// The symmetry label given to orbitals that carry none.
    ///
    /// # Default
    ///
    /// `1a`.
    pub default_symmetry: String,

    /// The energy given to orbitals that carry none.
    ///
    /// # Default
    ///
    /// `1.0`.
    pub default_energy: f64,

    /// The spin given to orbitals that carry none.
    ///
    /// # Default
    ///
    /// [`Spin::Alpha`].
    pub default_spin: Spin,

    /// The occupation number given to orbitals that carry none.
    ///
    /// # Default
    ///
    /// `2.0`.
    pub default_occupation: f64,

    /// Coefficients with magnitudes at or below this threshold are omitted from guess files.
    ///
    /// # Default
    ///
    /// `0.0`, so that only exact zeros are omitted.
    pub zero_threshold: f64,

    /// The eigenvector dump read when writing natural orbitals.
    ///
    /// # Default
    ///
    /// `xmvb.no`.
    pub eigenvector_file: String,
}

impl Default for MoldenBridgeConfig {
    fn default() -> Self {
        Self {
            title: "moldenbridge".to_string(),
            default_symmetry: "1a".to_string(),
            default_energy: 1.0,
            default_spin: Spin::Alpha,
            default_occupation: 2.0,
            zero_threshold: 0.0,
            eigenvector_file: "xmvb.no".to_string(),
        }
    }
}

impl MoldenBridgeConfig {
    /// Reads a configuration from a YAML file. Keys absent from the file take their defaults.
    ///
    /// # Errors
    ///
    /// Errors if the file cannot be read or deserialised, or if `zero_threshold` is negative or
    /// not finite.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let config = read_moldenbridge_yaml::<Self, _>(path.as_ref()).with_context(|| {
            format!(
                "Unable to read configuration from `{}`",
                path.as_ref().display()
            )
        })?;
        ensure!(
            config.zero_threshold.is_finite() && config.zero_threshold >= 0.0,
            "The zero threshold must be finite and non-negative, but {} was given.",
            config.zero_threshold
        );
        Ok(config)
    }

    /// The metadata given to orbitals that carry none.
    pub fn default_metadata(&self) -> OrbitalMetadata {
        OrbitalMetadata {
            symmetry: self.default_symmetry.clone(),
            energy: self.default_energy,
            spin: self.default_spin,
            occupation: self.default_occupation,
        }
    }
}

impl fmt::Display for MoldenBridgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Molden title: {}", self.title)?;
        writeln!(
            f,
            "Default orbital metadata: Sym = {}, Ene = {}, Spin = {}, Occup = {}",
            self.default_symmetry, self.default_energy, self.default_spin, self.default_occupation
        )?;
        writeln!(
            f,
            "Omit only exact zeros from guess files: {}",
            nice_bool(self.zero_threshold == 0.0)
        )?;
        if self.zero_threshold > 0.0 {
            writeln!(f, "Guess zero threshold: {:.3e}", self.zero_threshold)?;
        }
        writeln!(f, "Eigenvector dump: {}", self.eigenvector_file)?;
        Ok(())
    }
}
