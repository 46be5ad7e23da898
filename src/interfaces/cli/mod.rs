//! Command-line interface of MoldenBridge.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{self, Context};
use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;

use crate::drivers::guess_to_molden::{GuessSource, GuessToMoldenDriver, GuessToMoldenParams};
use crate::drivers::natural_orbitals_to_molden::{
    NaturalOrbitalsToMoldenDriver, NaturalOrbitalsToMoldenParams,
};
use crate::drivers::orbital_selection::{OrbitalSelectionDriver, OrbitalSelectionParams};
use crate::drivers::weight_ranking::{WeightRankingDriver, WeightRankingParams};
use crate::drivers::MoldenBridgeDriver;
use crate::interfaces::input::MoldenBridgeConfig;
use crate::interfaces::molden::MoldenFile;
use crate::interfaces::xmvb::weights::WeightKind;
use crate::interfaces::InputHandle;
use crate::io::format::{mb_error, mb_output, MoldenBridgeOutput, OUTPUT_TARGET};
use crate::io::{path_with_ext, MoldenBridgeFileType};

#[cfg(test)]
#[path = "cli_tests.rs"]
mod cli_tests;

const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

/// Logs a nicely formatted MoldenBridge heading to the `moldenbridge-output` logger.
pub fn log_heading() {
    let version = if let Some(ver) = VERSION {
        format!("v{ver}")
    } else {
        "v unknown".to_string()
    };
    mb_output!("╭───────────────────────────────────────────────────────╮");
    mb_output!("│                                                       │");
    mb_output!("│   M O L D E N B R I D G E                             │");
    mb_output!("│   XMVB guesses, natural orbitals and Molden files     │");
    mb_output!("│                                                       │");
    mb_output!("│{version:>52}   │");
    mb_output!("╰───────────────────────────────────────────────────────╯");
    mb_output!("");
}

/// Logs a fatal error to both the default and the `moldenbridge-output` loggers.
pub fn log_error(err: &anyhow::Error) {
    mb_error!("{err:#}");
}

/// Configures `log4rs` for the binary.
///
/// Main program output goes to standard output and, if `output` is given, to that file as well.
/// Diagnostics go to standard error at a level set by `verbosity`.
///
/// # Arguments
///
/// * `output` - An optional file to which main program output is also written.
/// * `verbosity` - The number of `-v` flags: `0` for warnings, `1` for information, `2` for
///   debugging and `3` or more for tracing.
pub fn configure_logging(output: Option<&Path>, verbosity: u8) -> Result<(), anyhow::Error> {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{m}{n}")))
        .build();
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("[{l}] {t}: {m}{n}")))
        .build();
    let mut config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .appender(Appender::builder().build("stderr", Box::new(stderr)));
    let mut output_appenders = vec!["stdout"];
    if let Some(path) = output {
        let file = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new("{m}{n}")))
            .append(false)
            .build(path)
            .with_context(|| format!("Unable to open `{}` for output", path.display()))?;
        config = config.appender(Appender::builder().build("file", Box::new(file)));
        output_appenders.push("file");
    }
    let config = config
        .logger(
            Logger::builder()
                .appenders(output_appenders)
                .additive(false)
                .build(OUTPUT_TARGET, LevelFilter::Info),
        )
        .build(Root::builder().appender("stderr").build(level))
        .context("Invalid logging configuration")?;
    log4rs::init_config(config).context("Unable to initialise logging")?;
    Ok(())
}

/// The command line of MoldenBridge.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// A YAML configuration file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// A file to which the main output is also written.
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Increases the verbosity of diagnostics. May be repeated.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// The conversion to perform.
    #[command(subcommand)]
    pub command: Command,
}

/// The conversions of MoldenBridge.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Converts XMVB guess orbitals into a Molden file, `<GUESS>.molden`.
    Gus2molden {
        /// The base name of the guess: `<GUESS>.xdat`, or `<GUESS>.gus` with `--dense`.
        guess: String,

        /// The base name of the XMVB log, `<LOG>.xmo`.
        log: String,

        /// Reads `# ORBITAL` blocks from `<GUESS>.gus` instead of the Initial Guess block of
        /// `<GUESS>.xdat`.
        #[arg(long)]
        dense: bool,
    },

    /// Converts XMVB natural orbitals into a Molden file, `<LOG>_no.molden`.
    No2molden {
        /// The base name of the XMVB log, `<LOG>.xmo`.
        log: String,

        /// The eigenvector dump. Defaults to the configured dump, `xmvb.no` unless set.
        #[arg(long)]
        eigen: Option<PathBuf>,
    },

    /// Interactively assembles an XMVB guess, `<NAME>.gus`, from the orbitals of `<NAME>.molden`.
    Molden2gus {
        /// The base name of the Molden file.
        name: String,
    },

    /// Ranks a structure table of an XMVB log.
    Sortw {
        /// The base name of the XMVB log, `<LOG>.xmo`.
        log: String,

        /// The table: `w`, `l`, `i`, `r`, `c` or `lc`.
        #[arg(default_value = "w")]
        kind: WeightKind,
    },
}

impl Cli {
    /// Reads the configuration file, or returns the default configuration if none is given.
    pub fn configuration(&self) -> Result<MoldenBridgeConfig, anyhow::Error> {
        match self.config.as_ref() {
            Some(path) => MoldenBridgeConfig::from_yaml(path),
            None => Ok(MoldenBridgeConfig::default()),
        }
    }
}

impl InputHandle for Cli {
    fn handle(&self) -> Result<(), anyhow::Error> {
        let config = self.configuration()?;
        mb_output!("Configuration:");
        config.log_output_display();
        mb_output!("");

        match &self.command {
            Command::Gus2molden { guess, log, dense } => {
                let params = GuessToMoldenParams::builder()
                    .guess_name(guess.as_str())
                    .source(if *dense {
                        GuessSource::Dense
                    } else {
                        GuessSource::Sparse
                    })
                    .title(config.title.as_str())
                    .metadata(config.default_metadata())
                    .build()?;
                let mut driver = GuessToMoldenDriver::builder()
                    .parameters(&params)
                    .log_name(log.as_str())
                    .build()?;
                driver.run()
            }
            Command::No2molden { log, eigen } => {
                let params = NaturalOrbitalsToMoldenParams::builder()
                    .log_name(log.as_str())
                    .eigenvector_file(
                        eigen
                            .clone()
                            .unwrap_or_else(|| PathBuf::from(&config.eigenvector_file)),
                    )
                    .title(config.title.as_str())
                    .metadata(config.default_metadata())
                    .build()?;
                let mut driver = NaturalOrbitalsToMoldenDriver::builder()
                    .parameters(&params)
                    .build()?;
                driver.run()
            }
            Command::Molden2gus { name } => {
                let molden =
                    MoldenFile::from_file(path_with_ext(name, MoldenBridgeFileType::Molden))?;
                let params = OrbitalSelectionParams::builder()
                    .name(name.as_str())
                    .zero_threshold(config.zero_threshold)
                    .build()?;
                let stdin = io::stdin();
                let mut driver =
                    OrbitalSelectionDriver::new(&params, &molden, stdin.lock(), io::stdout());
                driver.run()
            }
            Command::Sortw { log, kind } => {
                let params = WeightRankingParams::builder()
                    .log_name(log.as_str())
                    .kind(*kind)
                    .build()?;
                let mut driver = WeightRankingDriver::builder()
                    .parameters(&params)
                    .build()?;
                driver.run()
            }
        }
    }
}
