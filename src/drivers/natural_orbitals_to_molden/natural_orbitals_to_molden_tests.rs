use std::env;
use std::fs;

use approx::assert_relative_eq;

use crate::drivers::natural_orbitals_to_molden::{
    NaturalOrbitalsToMoldenDriver, NaturalOrbitalsToMoldenParams,
};
use crate::drivers::MoldenBridgeDriver;
use crate::interfaces::molden::{MoldenFile, OccupationStyle};

const ROOT: &str = env!("CARGO_MANIFEST_DIR");

#[test]
fn test_drivers_natural_orbitals_to_molden() {
    let dir = env::temp_dir().join(format!("moldenbridge_no_{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    fs::copy(format!("{ROOT}/tests/xmvb/ne.xmo"), dir.join("ne.xmo")).unwrap();

    let params = NaturalOrbitalsToMoldenParams::builder()
        .log_name(dir.join("ne").to_string_lossy())
        .eigenvector_file(format!("{ROOT}/tests/xmvb/xmvb.no"))
        .title("neon natural orbitals")
        .build()
        .unwrap();
    let mut driver = NaturalOrbitalsToMoldenDriver::builder()
        .parameters(&params)
        .build()
        .unwrap();
    assert!(driver.result().is_err());
    driver.run().unwrap();

    let result = driver.result().unwrap();
    assert_eq!(
        result.eigenvalues,
        vec![2.0, 1.5, 1.0, 0.5, 0.25, 0.0, 0.0]
    );
    assert_relative_eq!(result.eigenvalue_sum(), 5.25);

    let occupations = result
        .molden
        .orbitals
        .metadata()
        .iter()
        .map(|meta| meta.occupation)
        .collect::<Vec<_>>();
    assert_eq!(occupations, result.eigenvalues);

    // The largest eigenvalue belongs to the first D component, which keeps its position. The
    // second belongs to the third D component, which moves to the fifth Molden position.
    let coefficients = result.molden.orbitals.coefficients();
    assert_relative_eq!(coefficients[(1, 0)], 1.0, epsilon = 1e-12);
    assert_relative_eq!(coefficients[(5, 1)], 1.0, epsilon = 1e-12);
    assert_relative_eq!(coefficients[(0, 3)], 1.0, epsilon = 1e-12);

    let written = MoldenFile::from_file(params.molden_path()).unwrap();
    assert!(params
        .molden_path()
        .to_string_lossy()
        .ends_with("ne_no.molden"));
    assert_eq!(written.orbitals.n_orbitals(), 7);
    assert_relative_eq!(written.orbitals.metadata()[1].occupation, 1.5);
    assert_eq!(written.occupation_style, OccupationStyle::Fractional);
    let text = fs::read_to_string(params.molden_path()).unwrap();
    assert!(text.contains("Sym=     1a\nEne= 1.0\nSpin= Alpha\nOccup=    1.5000000000\n"));

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn test_drivers_natural_orbitals_to_molden_missing_dump() {
    let params = NaturalOrbitalsToMoldenParams::builder()
        .log_name(format!("{ROOT}/tests/xmvb/ne"))
        .eigenvector_file(format!("{ROOT}/tests/xmvb/missing.no"))
        .build()
        .unwrap();
    let mut driver = NaturalOrbitalsToMoldenDriver::builder()
        .parameters(&params)
        .build()
        .unwrap();
    assert!(driver.run().is_err());
    assert!(driver.result().is_err());
}
