//! Interactive assembly of XMVB guess orbitals from the orbitals of a Molden file.

use std::fmt;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{self, ensure, format_err, Context};
use derive_builder::Builder;

use crate::drivers::MoldenBridgeDriver;
use crate::interfaces::molden::MoldenFile;
use crate::io::format::{
    log_subtitle, log_title, mb_output, mb_warn, nice_bool, MoldenBridgeOutput,
};
use crate::io::{path_with_ext, write_text, MoldenBridgeFileType};

pub mod assembler;
pub mod command;

use assembler::OrbitalAssembler;
use command::SelectionCommand;

#[cfg(test)]
#[path = "orbital_selection_tests.rs"]
mod orbital_selection_tests;

/// The usage summary shown at the start of a session.
const USAGE: &str = "\
Commands (all indices one-based):
  a <cols>           select whole orbitals, e.g. `a 1-3,5`
  <atoms> <cols>     select orbitals restricted to atoms, e.g. `1,3 4-6`
  r<deg> <c1>,<c2>   rotate two source orbitals in place, e.g. `r45 2,3`
  m<factor> <col>    multiply a source orbital in place, e.g. `m-1 4`
  q                  write the selection and quit";

// ==================
// Struct definitions
// ==================

// ----------
// Parameters
// ----------

/// A structure containing control parameters for interactive orbital selection.
#[derive(Clone, Builder, Debug)]
pub struct OrbitalSelectionParams {
    /// The base name of the output files. The guess is written to `<name>.gus` and the Molden
    /// preview of the selection to `<name>_gus.molden`.
    #[builder(setter(into))]
    pub name: String,

    /// Coefficients with magnitudes at or below this threshold are omitted from the guess.
    #[builder(default = "0.0")]
    pub zero_threshold: f64,

    /// Boolean indicating if the Molden preview of the selection is to be written.
    #[builder(default = "true")]
    pub write_preview: bool,
}

impl OrbitalSelectionParams {
    /// Returns a builder to construct a [`OrbitalSelectionParams`] structure.
    pub fn builder() -> OrbitalSelectionParamsBuilder {
        OrbitalSelectionParamsBuilder::default()
    }

    /// The path of the guess file.
    pub fn guess_path(&self) -> PathBuf {
        path_with_ext(&self.name, MoldenBridgeFileType::Gus)
    }

    /// The path of the Molden preview of the selection.
    pub fn preview_path(&self) -> PathBuf {
        path_with_ext(format!("{}_gus", self.name), MoldenBridgeFileType::Molden)
    }
}

impl fmt::Display for OrbitalSelectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Guess output: {}", self.guess_path().display())?;
        writeln!(
            f,
            "Molden preview output: {}",
            if self.write_preview {
                self.preview_path().display().to_string()
            } else {
                nice_bool(false)
            }
        )?;
        writeln!(f, "Guess zero threshold: {:.3e}", self.zero_threshold)?;
        writeln!(f)?;
        Ok(())
    }
}

// ------
// Result
// ------

/// A structure to contain the outcome of an orbital-selection session.
#[derive(Clone, Debug)]
pub struct OrbitalSelectionResult<'a> {
    /// The control parameters used to obtain this set of results.
    pub parameters: &'a OrbitalSelectionParams,

    /// The commands applied successfully, in order, excluding the final `q`.
    pub commands: Vec<SelectionCommand>,

    /// The Molden file of the selected orbitals, in Molden component order.
    pub selection: MoldenFile,

    /// The guess text written for XMVB.
    pub guess: String,
}

impl fmt::Display for OrbitalSelectionResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Commands applied: {}", self.commands.len())?;
        for command in self.commands.iter() {
            writeln!(f, "  {command}")?;
        }
        writeln!(
            f,
            "Orbitals selected: {}",
            self.selection.orbitals.n_orbitals()
        )?;
        writeln!(f)?;
        Ok(())
    }
}

// ------
// Driver
// ------

/// A driver for an interactive orbital-selection session.
///
/// Commands are read line by line from `input`. Prompts, confirmations and invalid-selection
/// messages are written to `prompt`.
pub struct OrbitalSelectionDriver<'a, R: BufRead, W: Write> {
    /// The control parameters for the session.
    parameters: &'a OrbitalSelectionParams,

    /// The Molden file providing the source orbitals.
    molden: &'a MoldenFile,

    /// The source of commands.
    input: R,

    /// The sink of prompts and messages.
    prompt: W,

    /// The result of the session.
    result: Option<OrbitalSelectionResult<'a>>,
}

impl<'a, R: BufRead, W: Write> OrbitalSelectionDriver<'a, R, W> {
    /// Constructs a new driver.
    ///
    /// # Arguments
    ///
    /// * `parameters` - The control parameters for the session.
    /// * `molden` - The Molden file providing the source orbitals.
    /// * `input` - The source of commands.
    /// * `prompt` - The sink of prompts and messages.
    pub fn new(
        parameters: &'a OrbitalSelectionParams,
        molden: &'a MoldenFile,
        input: R,
        prompt: W,
    ) -> Self {
        Self {
            parameters,
            molden,
            input,
            prompt,
            result: None,
        }
    }

    /// Reads and applies commands until `q`.
    ///
    /// # Returns
    ///
    /// The assembler holding the selection and the commands applied successfully.
    ///
    /// # Errors
    ///
    /// Errors if the input ends before `q` or if the prompt cannot be written.
    fn read_commands(
        &mut self,
    ) -> Result<(OrbitalAssembler, Vec<SelectionCommand>), anyhow::Error> {
        let mut assembler = OrbitalAssembler::new(
            self.molden.orbitals.clone(),
            &self.molden.basis,
            self.molden.atoms.len(),
        );
        let mut commands = vec![];
        writeln!(
            self.prompt,
            "{} orbitals over {} functions on {} atoms are available.",
            self.molden.orbitals.n_orbitals(),
            self.molden.orbitals.n_funcs(),
            self.molden.atoms.len()
        )?;
        writeln!(self.prompt, "{USAGE}")?;
        loop {
            write!(self.prompt, "selection> ")?;
            self.prompt.flush()?;
            let mut line = String::new();
            let n_read = self
                .input
                .read_line(&mut line)
                .context("Unable to read a selection command")?;
            ensure!(
                n_read > 0,
                "The input ended before `q`; nothing has been written."
            );
            if line.trim().is_empty() {
                continue;
            }
            let outcome = line
                .parse::<SelectionCommand>()
                .and_then(|command| match command {
                    SelectionCommand::Quit => Ok(None),
                    _ => assembler
                        .apply(&command)
                        .map(|message| Some((command, message))),
                });
            match outcome {
                Ok(None) => break,
                Ok(Some((command, message))) => {
                    log::debug!("Applied selection command `{command}`.");
                    writeln!(self.prompt, "{message}")?;
                    commands.push(command);
                }
                Err(err) => {
                    mb_warn!("{err}");
                    writeln!(self.prompt, "{err}")?;
                }
            }
        }
        Ok((assembler, commands))
    }

    /// Runs the session and writes the selection.
    fn select_orbitals(&mut self) -> Result<(), anyhow::Error> {
        log_title("Interactive Orbital Selection");
        mb_output!("");
        let params = self.parameters;
        params.log_output_display();

        let (assembler, commands) = self.read_commands()?;
        let selection = MoldenFile::new(
            &self.molden.title,
            &self.molden.atoms,
            &self.molden.basis,
            assembler.selected_orbitals()?,
        )?
        .with_occupation_style(self.molden.occupation_style);
        let guess = assembler.to_guess(&self.molden.basis, params.zero_threshold)?;

        if params.write_preview {
            selection.to_file(params.preview_path())?;
            mb_output!(
                "Molden preview of the selection written to {}.",
                params.preview_path().display()
            );
        }
        write_text(params.guess_path(), &guess)?;
        mb_output!("Guess written to {}.", params.guess_path().display());
        mb_output!("");

        let result = OrbitalSelectionResult {
            parameters: params,
            commands,
            selection,
            guess,
        };
        log_subtitle("Selection summary");
        mb_output!("");
        result.log_output_display();
        self.result = Some(result);
        Ok(())
    }
}

impl<'a, R: BufRead, W: Write> MoldenBridgeDriver for OrbitalSelectionDriver<'a, R, W> {
    type Params = OrbitalSelectionParams;

    type Outcome = OrbitalSelectionResult<'a>;

    fn result(&self) -> Result<&Self::Outcome, anyhow::Error> {
        self.result
            .as_ref()
            .ok_or_else(|| format_err!("No orbital selection results found."))
    }

    fn run(&mut self) -> Result<(), anyhow::Error> {
        self.select_orbitals()
    }
}
