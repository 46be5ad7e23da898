use std::path::PathBuf;

use clap::{CommandFactory, Parser};

use crate::interfaces::cli::{Cli, Command};
use crate::interfaces::xmvb::weights::WeightKind;
use crate::interfaces::InputHandle;

const ROOT: &str = env!("CARGO_MANIFEST_DIR");

#[test]
fn test_interfaces_cli_definition() {
    Cli::command().debug_assert();
}

#[test]
fn test_interfaces_cli_subcommands() {
    let cli = Cli::try_parse_from(["moldenbridge", "gus2molden", "h2o", "h2o.opt", "--dense"])
        .unwrap();
    assert!(matches!(
        cli.command,
        Command::Gus2molden { ref guess, ref log, dense: true } if guess == "h2o" && log == "h2o.opt"
    ));
    assert_eq!(cli.verbose, 0);
    assert!(cli.config.is_none());

    let cli = Cli::try_parse_from([
        "moldenbridge",
        "-vv",
        "no2molden",
        "ne",
        "--eigen",
        "ne.no",
        "-c",
        "config.yml",
    ])
    .unwrap();
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.config, Some(PathBuf::from("config.yml")));
    assert!(matches!(
        cli.command,
        Command::No2molden { ref log, eigen: Some(ref eigen) }
            if log == "ne" && eigen == &PathBuf::from("ne.no")
    ));

    let cli = Cli::try_parse_from(["moldenbridge", "sortw", "h2o"]).unwrap();
    assert!(matches!(
        cli.command,
        Command::Sortw {
            kind: WeightKind::Weights,
            ..
        }
    ));
    let cli = Cli::try_parse_from(["moldenbridge", "sortw", "h2o", "lc"]).unwrap();
    assert!(matches!(
        cli.command,
        Command::Sortw {
            kind: WeightKind::LowdinCoefficients,
            ..
        }
    ));

    assert!(Cli::try_parse_from(["moldenbridge", "sortw", "h2o", "x"]).is_err());
    assert!(Cli::try_parse_from(["moldenbridge", "molden2gus"]).is_err());
    assert!(Cli::try_parse_from(["moldenbridge"]).is_err());
}

#[test]
fn test_interfaces_cli_handle() {
    let log = format!("{ROOT}/tests/xmvb/water");
    let cli = Cli::try_parse_from(["moldenbridge", "sortw", log.as_str(), "r"]).unwrap();
    cli.handle().unwrap();

    let config = format!("{ROOT}/tests/input/partial_config.yml");
    let cli =
        Cli::try_parse_from(["moldenbridge", "-c", config.as_str(), "sortw", log.as_str()])
            .unwrap();
    assert_eq!(cli.configuration().unwrap().title, "water valence bond guess");
    cli.handle().unwrap();

    let missing = format!("{ROOT}/tests/input/missing.yml");
    let cli = Cli::try_parse_from(["moldenbridge", "-c", missing.as_str(), "sortw", log.as_str()])
        .unwrap();
    assert!(cli.handle().is_err());
}
