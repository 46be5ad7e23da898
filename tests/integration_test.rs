use std::env;
use std::fs;
use std::path::PathBuf;

use approx::assert_abs_diff_eq;
use serial_test::serial;

use moldenbridge::drivers::guess_to_molden::{
    GuessSource, GuessToMoldenDriver, GuessToMoldenParams,
};
use moldenbridge::drivers::orbital_selection::{OrbitalSelectionDriver, OrbitalSelectionParams};
use moldenbridge::drivers::MoldenBridgeDriver;
use moldenbridge::interfaces::cli::Cli;
use moldenbridge::interfaces::molden::MoldenFile;
use moldenbridge::interfaces::xmvb::guess::{decode_guess_block, decode_orbital_blocks};
use moldenbridge::interfaces::InputHandle;

use clap::Parser;

const ROOT: &str = env!("CARGO_MANIFEST_DIR");

/// A scratch directory shared by the tests below, holding copies of the water fixtures.
fn scratch() -> PathBuf {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = env::temp_dir().join("moldenbridge_integration");
    fs::create_dir_all(&dir).unwrap();
    for fixture in ["water.xmo", "water.xdat", "ne.xmo", "xmvb.no"] {
        fs::copy(format!("{ROOT}/tests/xmvb/{fixture}"), dir.join(fixture)).unwrap();
    }
    dir
}

#[test]
#[serial]
fn test_integration_guess_molden_guess_round_trip() {
    let dir = scratch();
    let water = dir.join("water").to_string_lossy().to_string();

    // Guess dump and log to Molden.
    let g2m_params = GuessToMoldenParams::builder()
        .guess_name(water.as_str())
        .build()
        .unwrap();
    let mut g2m_driver = GuessToMoldenDriver::builder()
        .parameters(&g2m_params)
        .log_name(water.as_str())
        .build()
        .unwrap();
    g2m_driver.run().unwrap();

    // Molden to guess, selecting every orbital.
    let molden = MoldenFile::from_file(g2m_params.molden_path()).unwrap();
    assert_eq!(molden.orbitals.n_orbitals(), 3);
    let sel_params = OrbitalSelectionParams::builder()
        .name(water.as_str())
        .build()
        .unwrap();
    let mut sel_driver =
        OrbitalSelectionDriver::new(&sel_params, &molden, "a 1-3\nq\n".as_bytes(), vec![]);
    sel_driver.run().unwrap();

    let original = decode_guess_block(
        &fs::read_to_string(dir.join("water.xdat")).unwrap(),
        23,
    )
    .unwrap();
    let round_trip =
        decode_orbital_blocks(&fs::read_to_string(sel_params.guess_path()).unwrap(), 23).unwrap();
    assert_eq!(round_trip.dim(), original.dim());
    assert_abs_diff_eq!(round_trip, original, epsilon = 1e-10);

    // The written guess reads back through the dense decoder of `gus2molden --dense`.
    let dense_params = GuessToMoldenParams::builder()
        .guess_name(water.as_str())
        .source(GuessSource::Dense)
        .build()
        .unwrap();
    let mut dense_driver = GuessToMoldenDriver::builder()
        .parameters(&dense_params)
        .log_name(water.as_str())
        .build()
        .unwrap();
    dense_driver.run().unwrap();
    let dense_molden = &dense_driver.result().unwrap().molden;
    assert_abs_diff_eq!(
        dense_molden.orbitals.coefficients(),
        molden.orbitals.coefficients(),
        epsilon = 1e-10
    );

    let preview = MoldenFile::from_file(sel_params.preview_path()).unwrap();
    assert_eq!(preview.orbitals, molden.orbitals);
}

#[test]
#[serial]
fn test_integration_cli_natural_orbitals() {
    let dir = scratch();
    let neon = dir.join("ne").to_string_lossy().to_string();
    let eigen = dir.join("xmvb.no").to_string_lossy().to_string();
    let cli = Cli::try_parse_from([
        "moldenbridge",
        "no2molden",
        neon.as_str(),
        "--eigen",
        eigen.as_str(),
    ])
    .unwrap();
    cli.handle().unwrap();

    let molden = MoldenFile::from_file(dir.join("ne_no.molden")).unwrap();
    let occupations = molden
        .orbitals
        .metadata()
        .iter()
        .map(|meta| meta.occupation)
        .collect::<Vec<_>>();
    assert_eq!(occupations, vec![2.0, 1.5, 1.0, 0.5, 0.25, 0.0, 0.0]);
}
