use ndarray::Array2;

use crate::interfaces::xmvb::XmvbLog;
use crate::io::ParseError;
use crate::target::orbital::OrbitalMetadata;

const ROOT: &str = env!("CARGO_MANIFEST_DIR");

#[test]
fn test_xmvb_log_parse() {
    let log = XmvbLog::from_file(format!("{ROOT}/tests/xmvb/water.xmo")).unwrap();
    assert_eq!(log.n_funcs, 23);
    assert_eq!(log.atoms.len(), 3);
    assert_eq!(log.basis.n_atoms(), 3);

    let summary = log.to_string();
    assert!(summary.contains("Geometry"));
    assert!(summary.contains("Total number of Cartesian functions: 23"));

    let neon = XmvbLog::from_file(format!("{ROOT}/tests/xmvb/ne.xmo")).unwrap();
    assert_eq!(neon.n_funcs, 7);
    assert_eq!(neon.atoms[0].label, "NE");
}

#[test]
fn test_xmvb_log_parse_inconsistent() {
    let text = std::fs::read_to_string(format!("{ROOT}/tests/xmvb/ne.xmo")).unwrap();
    let miscounted = text.replace("FUNCTIONS =    7", "FUNCTIONS =    8");
    assert_eq!(
        XmvbLog::parse(&miscounted)
            .unwrap_err()
            .downcast_ref::<ParseError>(),
        Some(&ParseError::AoCountMismatch {
            declared: 8,
            found: 7
        })
    );

    let no_geometry = text.replace("CHARGE", "CHARGES");
    assert!(XmvbLog::parse(&no_geometry).is_err());

    assert!(XmvbLog::from_file(format!("{ROOT}/tests/xmvb/missing.xmo")).is_err());
}

#[test]
fn test_xmvb_log_to_molden() {
    let log = XmvbLog::from_file(format!("{ROOT}/tests/xmvb/water.xmo")).unwrap();
    let metadata = vec![OrbitalMetadata::default(); 23];
    let molden = log
        .to_molden(Array2::eye(23), metadata.clone(), "water")
        .unwrap();
    let coefficients = molden.orbitals.coefficients();

    // The D shell spans rows 5 to 10 and the F shell rows 11 to 20.
    assert_eq!(coefficients[(5, 5)], 1.0);
    assert_eq!(coefficients[(6, 8)], 1.0);
    assert_eq!(coefficients[(7, 10)], 1.0);
    assert_eq!(coefficients[(12, 17)], 1.0);
    assert_eq!(coefficients[(13, 20)], 1.0);
    assert_eq!(coefficients[(14, 14)], 1.0);
    for row in (0..5).chain(21..23) {
        assert_eq!(coefficients[(row, row)], 1.0);
    }
    assert_eq!(molden.title, "water");
    assert_eq!(molden.atoms, log.atoms);

    assert!(log
        .to_molden(Array2::eye(22), vec![OrbitalMetadata::default(); 22], "short")
        .is_err());
    assert!(log
        .to_molden(Array2::eye(23), metadata[..3].to_vec(), "unlabelled")
        .is_err());
}
