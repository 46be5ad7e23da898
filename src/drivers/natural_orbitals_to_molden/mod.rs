//! Conversion of XMVB natural orbitals into Molden files.

use std::fmt;
use std::path::PathBuf;

use anyhow::{self, format_err, Context};
use derive_builder::Builder;

use crate::drivers::MoldenBridgeDriver;
use crate::interfaces::molden::{MoldenFile, OccupationStyle};
use crate::interfaces::xmvb::eigen::decode_eigenvectors;
use crate::interfaces::xmvb::XmvbLog;
use crate::io::format::{log_subtitle, log_title, mb_output, MoldenBridgeOutput};
use crate::io::{path_with_ext, read_text, MoldenBridgeFileType};
use crate::target::orbital::{sort_eigenpairs, OrbitalMetadata};

#[cfg(test)]
#[path = "natural_orbitals_to_molden_tests.rs"]
mod natural_orbitals_to_molden_tests;

// ==================
// Struct definitions
// ==================

// ----------
// Parameters
// ----------

/// A structure containing control parameters for natural-orbital-to-Molden conversion.
#[derive(Clone, Builder, Debug)]
pub struct NaturalOrbitalsToMoldenParams {
    /// The base name of the XMVB log. The Molden file is written to `<log_name>_no.molden`.
    #[builder(setter(into))]
    pub log_name: String,

    /// The path to the eigenvector dump.
    #[builder(setter(into), default = "PathBuf::from(\"xmvb.no\")")]
    pub eigenvector_file: PathBuf,

    /// The title written into the Molden file.
    #[builder(setter(into), default = "\"moldenbridge\".to_string()")]
    pub title: String,

    /// The metadata given to every orbital. The occupation number is replaced by the
    /// eigenvalue of each orbital.
    #[builder(default = "OrbitalMetadata::default()")]
    pub metadata: OrbitalMetadata,
}

impl NaturalOrbitalsToMoldenParams {
    /// Returns a builder to construct a [`NaturalOrbitalsToMoldenParams`] structure.
    pub fn builder() -> NaturalOrbitalsToMoldenParamsBuilder {
        NaturalOrbitalsToMoldenParamsBuilder::default()
    }

    /// The path of the XMVB log.
    pub fn log_path(&self) -> PathBuf {
        path_with_ext(&self.log_name, MoldenBridgeFileType::Xmo)
    }

    /// The path of the Molden file.
    pub fn molden_path(&self) -> PathBuf {
        path_with_ext(format!("{}_no", self.log_name), MoldenBridgeFileType::Molden)
    }
}

impl fmt::Display for NaturalOrbitalsToMoldenParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "XMVB log: {}", self.log_path().display())?;
        writeln!(f, "Eigenvector dump: {}", self.eigenvector_file.display())?;
        writeln!(f, "Molden output: {}", self.molden_path().display())?;
        writeln!(f, "Molden title: {}", self.title)?;
        writeln!(f, "Occupation numbers: eigenvalues")?;
        writeln!(f)?;
        Ok(())
    }
}

// ------
// Result
// ------

/// A structure to contain natural-orbital-to-Molden conversion results.
#[derive(Clone, Debug)]
pub struct NaturalOrbitalsToMoldenResult<'a> {
    /// The control parameters used to obtain this set of results.
    pub parameters: &'a NaturalOrbitalsToMoldenParams,

    /// The eigenvalues in descending order.
    pub eigenvalues: Vec<f64>,

    /// The Molden file written.
    pub molden: MoldenFile,
}

impl NaturalOrbitalsToMoldenResult<'_> {
    /// The sum of the eigenvalues.
    pub fn eigenvalue_sum(&self) -> f64 {
        self.eigenvalues.iter().sum()
    }
}

impl fmt::Display for NaturalOrbitalsToMoldenResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>7}  {:>16}", "Orbital", "Eigenvalue")?;
        for (i, eigenvalue) in self.eigenvalues.iter().enumerate() {
            writeln!(f, "{:>7}  {:>16.10}", i + 1, eigenvalue)?;
        }
        writeln!(f, "{:>7}  {:>16.10}", "Sum", self.eigenvalue_sum())?;
        writeln!(f)?;
        writeln!(
            f,
            "{} natural orbitals written to {}.",
            self.eigenvalues.len(),
            self.parameters.molden_path().display()
        )?;
        writeln!(f)?;
        Ok(())
    }
}

// ------
// Driver
// ------

/// A driver for natural-orbital-to-Molden conversion.
#[derive(Clone, Builder)]
pub struct NaturalOrbitalsToMoldenDriver<'a> {
    /// The control parameters for the conversion.
    parameters: &'a NaturalOrbitalsToMoldenParams,

    /// The result of the conversion.
    #[builder(setter(skip), default = "None")]
    result: Option<NaturalOrbitalsToMoldenResult<'a>>,
}

impl<'a> NaturalOrbitalsToMoldenDriver<'a> {
    /// Returns a builder to construct a [`NaturalOrbitalsToMoldenDriver`] structure.
    pub fn builder() -> NaturalOrbitalsToMoldenDriverBuilder<'a> {
        NaturalOrbitalsToMoldenDriverBuilder::default()
    }

    /// Executes the conversion.
    fn convert(&mut self) -> Result<(), anyhow::Error> {
        log_title("Natural Orbitals to Molden Conversion");
        mb_output!("");
        let params = self.parameters;
        params.log_output_display();

        let xmvb_log = XmvbLog::from_file(params.log_path())?;
        log_subtitle("XMVB log");
        mb_output!("");
        xmvb_log.log_output_display();
        mb_output!("");

        let (eigenvalues, eigenvectors) =
            decode_eigenvectors(&read_text(&params.eigenvector_file)?, xmvb_log.n_funcs)
                .with_context(|| {
                    format!(
                        "Unable to decode `{}`",
                        params.eigenvector_file.display()
                    )
                })?;
        let (eigenvalues, eigenvectors) = sort_eigenpairs(&eigenvalues, &eigenvectors)?;
        let metadata = eigenvalues
            .iter()
            .map(|eigenvalue| OrbitalMetadata {
                occupation: *eigenvalue,
                ..params.metadata.clone()
            })
            .collect::<Vec<_>>();
        let molden = xmvb_log
            .to_molden(eigenvectors, metadata, &params.title)?
            .with_occupation_style(OccupationStyle::Fractional);
        molden.to_file(params.molden_path())?;

        let result = NaturalOrbitalsToMoldenResult {
            parameters: params,
            eigenvalues,
            molden,
        };
        log_subtitle("Natural orbitals");
        mb_output!("");
        result.log_output_display();
        self.result = Some(result);
        Ok(())
    }
}

impl<'a> MoldenBridgeDriver for NaturalOrbitalsToMoldenDriver<'a> {
    type Params = NaturalOrbitalsToMoldenParams;

    type Outcome = NaturalOrbitalsToMoldenResult<'a>;

    fn result(&self) -> Result<&Self::Outcome, anyhow::Error> {
        self.result
            .as_ref()
            .ok_or_else(|| format_err!("No natural-orbital conversion results found."))
    }

    fn run(&mut self) -> Result<(), anyhow::Error> {
        self.convert()
    }
}
