//! Ranking of the structure weights reported in XMVB logs.

use std::fmt;
use std::path::PathBuf;

use anyhow::{self, format_err, Context};
use derive_builder::Builder;

use crate::drivers::MoldenBridgeDriver;
use crate::interfaces::xmvb::weights::{WeightKind, WeightTable};
use crate::io::format::{log_subtitle, log_title, mb_output, MoldenBridgeOutput};
use crate::io::{path_with_ext, read_text, MoldenBridgeFileType};


// ==================
// Struct definitions
// ==================

// ----------
// Parameters
// ----------

/// A structure containing control parameters for structure-weight ranking.
#[derive(Clone, Builder, Debug)]
pub struct WeightRankingParams {
    /// The base name of the XMVB log.
    #[builder(setter(into))]
    pub log_name: String,

    /// The table to be ranked.
    #[builder(default = "WeightKind::Weights")]
    pub kind: WeightKind,
}

impl WeightRankingParams {
    /// Returns a builder to construct a [`WeightRankingParams`] structure.
    pub fn builder() -> WeightRankingParamsBuilder {
        WeightRankingParamsBuilder::default()
    }

    /// The path of the XMVB log.
    pub fn log_path(&self) -> PathBuf {
        path_with_ext(&self.log_name, MoldenBridgeFileType::Xmo)
    }
}

impl fmt::Display for WeightRankingParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "XMVB log: {}", self.log_path().display())?;
        writeln!(f, "Table: {}", self.kind)?;
        writeln!(f)?;
        Ok(())
    }
}

// ------
// Result
// ------

/// A structure to contain structure-weight ranking results.
#[derive(Clone, Debug)]
pub struct WeightRankingResult<'a> {
    /// The control parameters used to obtain this set of results.
    pub parameters: &'a WeightRankingParams,

    /// The ranked table.
    pub table: WeightTable,
}

impl fmt::Display for WeightRankingResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table)
    }
}

// ------
// Driver
// ------

/// A driver for structure-weight ranking.
#[derive(Clone, Builder)]
pub struct WeightRankingDriver<'a> {
    /// The control parameters for the ranking.
    parameters: &'a WeightRankingParams,

    /// The result of the ranking.
    #[builder(setter(skip), default = "None")]
    result: Option<WeightRankingResult<'a>>,
}

impl<'a> WeightRankingDriver<'a> {
    /// Returns a builder to construct a [`WeightRankingDriver`] structure.
    pub fn builder() -> WeightRankingDriverBuilder<'a> {
        WeightRankingDriverBuilder::default()
    }

    /// Executes the ranking.
    fn rank_weights(&mut self) -> Result<(), anyhow::Error> {
        log_title("Structure Weight Ranking");
        mb_output!("");
        let params = self.parameters;
        params.log_output_display();

        let log_path = params.log_path();
        let table = WeightTable::from_log(&read_text(&log_path)?, params.kind)
            .with_context(|| format!("Unable to rank the weights in `{}`", log_path.display()))?;
        log::debug!("Ranked {} structures.", table.rows().len());

        let result = WeightRankingResult {
            parameters: params,
            table,
        };
        log_subtitle(&format!("Ranked {}", params.kind));
        mb_output!("");
        result.log_output_display();
        mb_output!("");
        self.result = Some(result);
        Ok(())
    }
}

impl<'a> MoldenBridgeDriver for WeightRankingDriver<'a> {
    type Params = WeightRankingParams;

    type Outcome = WeightRankingResult<'a>;

    fn result(&self) -> Result<&Self::Outcome, anyhow::Error> {
        self.result
            .as_ref()
            .ok_or_else(|| format_err!("No structure-weight ranking results found."))
    }

    fn run(&mut self) -> Result<(), anyhow::Error> {
        self.rank_weights()
    }
}
