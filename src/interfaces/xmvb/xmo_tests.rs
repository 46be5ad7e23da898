use std::fs;

use approx::assert_relative_eq;

use crate::basis::ao::ShellKind;
use crate::interfaces::xmvb::xmo::{
    extract_geometry, parse_shell_table, read_ao_count,
};
use crate::io::ParseError;

const ROOT: &str = env!("CARGO_MANIFEST_DIR");

fn water_log() -> String {
    fs::read_to_string(format!("{ROOT}/tests/xmvb/water.xmo")).unwrap()
}

#[test]
fn test_xmvb_log_ao_count() {
    assert_eq!(read_ao_count(&water_log()).unwrap(), 23);
    assert_eq!(
        read_ao_count("   NUMBER OF CARTESIAN GAUSSIAN BASIS FUNCTIONS =    7\n").unwrap(),
        7
    );
    assert!(matches!(
        read_ao_count("NUMBER OF ELECTRONS = 10\n"),
        Err(ParseError::SectionNotFound(_))
    ));
    assert!(matches!(
        read_ao_count("NUMBER OF CARTESIAN GAUSSIAN BASIS FUNCTIONS = many\n"),
        Err(ParseError::MalformedRecord { .. })
    ));
}

#[test]
fn test_xmvb_log_geometry() {
    let atoms = extract_geometry(&water_log()).unwrap();
    assert_eq!(atoms.len(), 3);
    assert_eq!(
        atoms
            .iter()
            .map(|atom| (atom.label.as_str(), atom.index))
            .collect::<Vec<_>>(),
        vec![("O", 1), ("H", 2), ("H", 3)]
    );
    assert_relative_eq!(atoms[2].coordinates[1], -1.4304094);
    assert_eq!(
        atoms[0].to_string(),
        "O     1     8.00000000     0.00000000     0.00000000     0.22143140"
    );
}

#[test]
fn test_xmvb_log_geometry_missing() {
    assert!(matches!(
        extract_geometry("no geometry here\n"),
        Err(ParseError::SectionNotFound(_))
    ));
    assert!(matches!(
        extract_geometry("  CHARGE X Y Z\n\n O 8.0 0.0 0.0 0.0\n"),
        Err(ParseError::SectionNotFound(_))
    ));
    // A header that merely contains the tokens does not count.
    assert!(extract_geometry("ATOMIC CHARGE X Y Z\n O 8.0 0.0 0.0 0.0\n").is_err());
    assert!(matches!(
        extract_geometry("CHARGE X Y Z\n O 8.0 0.0 0.0\n"),
        Err(ParseError::MalformedRecord { .. })
    ));
}

#[test]
fn test_xmvb_log_shell_table() {
    let basis = parse_shell_table(&water_log()).unwrap();
    assert_eq!(basis.n_atoms(), 3);
    assert_eq!(basis.n_funcs(), 23);
    assert_eq!(
        basis.basis_shells().map(|bs| bs.kind).collect::<Vec<_>>(),
        vec![
            ShellKind::S,
            ShellKind::L,
            ShellKind::D,
            ShellKind::F,
            ShellKind::S,
            ShellKind::S
        ]
    );
    assert_eq!(
        basis.shell_boundary_indices(),
        vec![(0, 1), (1, 5), (5, 11), (11, 21), (21, 22), (22, 23)]
    );
    assert_eq!(basis.function_range_of_atom(3), (22, 23));

    let l_shell = &basis.basis_atoms[0].basis_shells[1];
    assert_eq!(l_shell.primitives.len(), 2);
    assert_relative_eq!(l_shell.primitives[1].exponent, 3.5999336);
    assert_relative_eq!(l_shell.primitives[1].coefficient, -0.1480263);
    assert_relative_eq!(l_shell.primitives[1].sp_coefficient.unwrap(), 0.3397528);

    assert!(basis.verify_n_funcs(23).is_ok());
    assert_eq!(
        basis.verify_n_funcs(22),
        Err(ParseError::AoCountMismatch {
            declared: 22,
            found: 23
        })
    );
}

#[test]
fn test_xmvb_log_shell_table_without_terminator() {
    let text = "\
  SHELL TYPE  PRIMITIVE  EXPONENT  COEFFICIENTS

 NE

      1   S       1            99.6819000    1.000000000000

      2   P       2             1.5D+00      0.5D+00
      2   P       3             0.3D+00      0.7D+00
";
    let basis = parse_shell_table(text).unwrap();
    assert_eq!(basis.n_funcs(), 4);
    assert_eq!(basis.basis_atoms[0].label, "NE");
    assert_eq!(basis.basis_atoms[0].basis_shells.len(), 2);
    let p_shell = &basis.basis_atoms[0].basis_shells[1];
    assert_eq!(p_shell.kind, ShellKind::P);
    assert_eq!(p_shell.primitives.len(), 2);
    assert_relative_eq!(p_shell.primitives[0].exponent, 1.5);
    assert_relative_eq!(p_shell.primitives[1].coefficient, 0.7);
}

#[test]
fn test_xmvb_log_shell_table_keeps_printed_digits() {
    let text = "\
  SHELL TYPE  PRIMITIVE  EXPONENT  COEFFICIENTS

 O

      1   S       1     0.12345678901   0.0018311000001234

      2   L       2     3.5999336D+00  -0.1480263    0.33975280000001
";
    let basis = parse_shell_table(text).unwrap();
    let s_shell = &basis.basis_atoms[0].basis_shells[0];
    assert_eq!(
        s_shell.primitives[0].source_tokens,
        Some(vec!["0.12345678901".to_string(), "0.0018311000001234".to_string()])
    );
    assert_eq!(
        s_shell.to_gto_records(),
        "S 1 1.0\n   0.12345678901    0.0018311000001234\n"
    );

    let l_records = basis.basis_atoms[0].basis_shells[1].to_gto_records();
    let lines = l_records.lines().collect::<Vec<_>>();
    assert_eq!(lines[1], "   3.5999336D+00          -0.1480263");
    assert_eq!(lines[3], "   3.5999336D+00    0.33975280000001");
}

#[test]
fn test_xmvb_log_shell_table_malformed() {
    assert!(parse_shell_table("no shells\n").is_err());

    let orphan = "SHELL TYPE\n\n      1   S   1   1.0   1.0\nTOTAL NUMBER\n";
    let err = parse_shell_table(orphan).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ParseError>(),
        Some(ParseError::MalformedRecord { .. })
    ));

    let short_sp = "SHELL TYPE\n\n O\n      1   L   1   1.0   1.0\nTOTAL NUMBER\n";
    assert!(parse_shell_table(short_sp).is_err());

    let unknown = "SHELL TYPE\n\n O\n      1   G   1   1.0   1.0\nTOTAL NUMBER\n";
    assert!(parse_shell_table(unknown).is_err());
}
