//! Conversion of XMVB guess orbitals into Molden files.

use std::fmt;
use std::path::PathBuf;

use anyhow::{self, bail, format_err, Context};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::drivers::MoldenBridgeDriver;
use crate::interfaces::molden::MoldenFile;
use crate::interfaces::xmvb::guess::{decode_guess_block, decode_orbital_blocks};
use crate::interfaces::xmvb::XmvbLog;
use crate::io::format::{log_subtitle, log_title, mb_output, MoldenBridgeOutput};
use crate::io::{path_with_ext, read_text, MoldenBridgeFileType};
use crate::target::orbital::OrbitalMetadata;


// ==================
// Struct definitions
// ==================

// ----------
// Parameters
// ----------

/// An enumerated type for the layouts of guess files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuessSource {
    /// Variant for a guess dump (`.xdat`) holding a sparse `Initial Guess` block with
    /// cumulative counts.
    Sparse,

    /// Variant for a guess file (`.gus`) of `# ORBITAL`-indexed blocks.
    Dense,
}

impl GuessSource {
    /// The file type read for this layout.
    pub fn file_type(&self) -> MoldenBridgeFileType {
        match self {
            GuessSource::Sparse => MoldenBridgeFileType::Xdat,
            GuessSource::Dense => MoldenBridgeFileType::Gus,
        }
    }
}

impl fmt::Display for GuessSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuessSource::Sparse => write!(f, "sparse Initial Guess block"),
            GuessSource::Dense => write!(f, "# ORBITAL blocks"),
        }
    }
}

/// A structure containing control parameters for guess-to-Molden conversion.
#[derive(Clone, Builder, Debug)]
pub struct GuessToMoldenParams {
    /// The base name of the guess file. The Molden file is written to `<guess_name>.molden`.
    #[builder(setter(into))]
    pub guess_name: String,

    /// The layout of the guess file.
    #[builder(default = "GuessSource::Sparse")]
    pub source: GuessSource,

    /// The title written into the Molden file.
    #[builder(setter(into), default = "\"moldenbridge\".to_string()")]
    pub title: String,

    /// The metadata given to every orbital.
    #[builder(default = "OrbitalMetadata::default()")]
    pub metadata: OrbitalMetadata,
}

impl GuessToMoldenParams {
    /// Returns a builder to construct a [`GuessToMoldenParams`] structure.
    pub fn builder() -> GuessToMoldenParamsBuilder {
        GuessToMoldenParamsBuilder::default()
    }

    /// The path of the guess file.
    pub fn guess_path(&self) -> PathBuf {
        path_with_ext(&self.guess_name, self.source.file_type())
    }

    /// The path of the Molden file.
    pub fn molden_path(&self) -> PathBuf {
        path_with_ext(&self.guess_name, MoldenBridgeFileType::Molden)
    }
}

impl fmt::Display for GuessToMoldenParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Guess input: {} ({})",
            self.guess_path().display(),
            self.source
        )?;
        writeln!(f, "Molden output: {}", self.molden_path().display())?;
        writeln!(f, "Molden title: {}", self.title)?;
        writeln!(
            f,
            "Orbital metadata: Sym = {}, Ene = {}, Spin = {}, Occup = {}",
            self.metadata.symmetry,
            self.metadata.energy,
            self.metadata.spin,
            self.metadata.occupation
        )?;
        writeln!(f)?;
        Ok(())
    }
}

// ------
// Result
// ------

/// A structure to contain guess-to-Molden conversion results.
#[derive(Clone, Debug)]
pub struct GuessToMoldenResult<'a> {
    /// The control parameters used to obtain this set of results.
    pub parameters: &'a GuessToMoldenParams,

    /// The Molden file written.
    pub molden: MoldenFile,
}

impl fmt::Display for GuessToMoldenResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} guess orbitals over {} functions written to {}.",
            self.molden.orbitals.n_orbitals(),
            self.molden.orbitals.n_funcs(),
            self.parameters.molden_path().display()
        )?;
        writeln!(f)?;
        Ok(())
    }
}

// ------
// Driver
// ------

/// A driver for guess-to-Molden conversion.
#[derive(Clone, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct GuessToMoldenDriver<'a> {
    /// The control parameters for the conversion.
    parameters: &'a GuessToMoldenParams,

    /// A path to the XMVB log, without its `.xmo` extension, describing the geometry and basis
    /// set. Only one of this or [`Self::log`] should be specified.
    #[builder(setter(into, strip_option), default = "None")]
    log_name: Option<String>,

    /// A parsed XMVB log describing the geometry and basis set. Only one of this or
    /// [`Self::log_name`] should be specified.
    #[builder(setter(strip_option), default = "None")]
    log: Option<&'a XmvbLog>,

    /// The result of the conversion.
    #[builder(setter(skip), default = "None")]
    result: Option<GuessToMoldenResult<'a>>,
}

impl<'a> GuessToMoldenDriverBuilder<'a> {
    fn validate(&self) -> Result<(), String> {
        match (self.log_name.as_ref(), self.log.as_ref()) {
            (Some(Some(_)), Some(Some(_))) => {
                Err("Only one of the log name or the parsed log should be specified.".to_string())
            }
            (Some(Some(_)), _) | (_, Some(Some(_))) => Ok(()),
            _ => Err("Neither the log name nor the parsed log has been specified.".to_string()),
        }
    }
}

impl<'a> GuessToMoldenDriver<'a> {
    /// Returns a builder to construct a [`GuessToMoldenDriver`] structure.
    pub fn builder() -> GuessToMoldenDriverBuilder<'a> {
        GuessToMoldenDriverBuilder::default()
    }

    /// Executes the conversion.
    fn convert(&mut self) -> Result<(), anyhow::Error> {
        log_title("Guess to Molden Conversion");
        mb_output!("");
        let params = self.parameters;
        params.log_output_display();

        let parsed_log;
        let xmvb_log = match (self.log, self.log_name.as_ref()) {
            (Some(log), None) => log,
            (None, Some(log_name)) => {
                parsed_log =
                    XmvbLog::from_file(path_with_ext(log_name, MoldenBridgeFileType::Xmo))?;
                &parsed_log
            }
            _ => bail!("Exactly one of the log name or the parsed log must be specified."),
        };
        log_subtitle("XMVB log");
        mb_output!("");
        xmvb_log.log_output_display();
        mb_output!("");

        let guess_path = params.guess_path();
        let text = read_text(&guess_path)?;
        let coefficients = match params.source {
            GuessSource::Sparse => decode_guess_block(&text, xmvb_log.n_funcs),
            GuessSource::Dense => decode_orbital_blocks(&text, xmvb_log.n_funcs),
        }
        .with_context(|| format!("Unable to decode `{}`", guess_path.display()))?;
        let metadata = vec![params.metadata.clone(); coefficients.ncols()];
        let molden = xmvb_log.to_molden(coefficients, metadata, &params.title)?;
        molden.to_file(params.molden_path())?;

        let result = GuessToMoldenResult {
            parameters: params,
            molden,
        };
        result.log_output_display();
        self.result = Some(result);
        Ok(())
    }
}

impl<'a> MoldenBridgeDriver for GuessToMoldenDriver<'a> {
    type Params = GuessToMoldenParams;

    type Outcome = GuessToMoldenResult<'a>;

    fn result(&self) -> Result<&Self::Outcome, anyhow::Error> {
        self.result
            .as_ref()
            .ok_or_else(|| format_err!("No guess-to-Molden conversion results found."))
    }

    fn run(&mut self) -> Result<(), anyhow::Error> {
        self.convert()
    }
}
