use std::env;
use std::fs;

use approx::assert_relative_eq;
use ndarray::Array2;

use crate::drivers::orbital_selection::command::SelectionCommand;
use crate::drivers::orbital_selection::{OrbitalSelectionDriver, OrbitalSelectionParams};
use crate::drivers::MoldenBridgeDriver;
use crate::interfaces::molden::MoldenFile;
use crate::interfaces::xmvb::guess::decode_orbital_blocks;
use crate::interfaces::xmvb::XmvbLog;
use crate::target::orbital::OrbitalMetadata;

const ROOT: &str = env!("CARGO_MANIFEST_DIR");

fn neon_molden() -> MoldenFile {
    let log = XmvbLog::from_file(format!("{ROOT}/tests/xmvb/ne.xmo")).unwrap();
    let metadata = (0..7)
        .map(|i| OrbitalMetadata {
            energy: i as f64,
            ..OrbitalMetadata::default()
        })
        .collect::<Vec<_>>();
    log.to_molden(Array2::eye(7), metadata, "neon").unwrap()
}

fn temp_name(stem: &str) -> String {
    env::temp_dir()
        .join(format!("moldenbridge_{stem}_{}", std::process::id()))
        .to_string_lossy()
        .to_string()
}

#[test]
fn test_drivers_orbital_selection_session() {
    let molden = neon_molden();
    let name = temp_name("selection_session");
    let params = OrbitalSelectionParams::builder()
        .name(name.clone())
        .build()
        .unwrap();
    let input = "a 1,2\n\nr90 1,9\nbogus\nm-1 2\n1 2\nq\n".as_bytes();
    let mut prompt = vec![];
    let mut driver = OrbitalSelectionDriver::new(&params, &molden, input, &mut prompt);
    assert!(driver.result().is_err());
    driver.run().unwrap();
    let result = driver.result().unwrap().clone();
    drop(driver);

    assert_eq!(
        result.commands,
        vec![
            SelectionCommand::SelectAll {
                columns: vec![1, 2]
            },
            SelectionCommand::Scale {
                factor: -1.0,
                column: 2
            },
            SelectionCommand::SelectMasked {
                atoms: vec![1],
                columns: vec![2]
            },
        ]
    );
    let selected = result.selection.orbitals.coefficients();
    assert_eq!(selected.dim(), (7, 3));
    assert_relative_eq!(selected[(1, 1)], 1.0);
    assert_relative_eq!(selected[(1, 2)], -1.0);
    assert_eq!(result.selection.orbitals.metadata()[2].energy, 1.0);

    let transcript = String::from_utf8(prompt).unwrap();
    assert!(transcript.contains("7 orbitals over 7 functions on 1 atoms are available."));
    assert!(transcript.contains("Invalid selection: orbital 9 does not exist"));
    assert!(transcript.contains("Invalid selection:"));
    assert!(transcript.contains("Orbital 2 has been multiplied by -1."));

    let guess = fs::read_to_string(params.guess_path()).unwrap();
    assert_eq!(guess, result.guess);
    let decoded = decode_orbital_blocks(&guess, 7).unwrap();
    assert_eq!(decoded.dim(), (7, 3));
    assert_relative_eq!(decoded[(0, 0)], 1.0);
    assert_relative_eq!(decoded[(1, 2)], -1.0);

    let preview = MoldenFile::from_file(params.preview_path()).unwrap();
    assert_eq!(preview.orbitals.n_orbitals(), 3);
    assert_eq!(preview.title, "neon");

    fs::remove_file(params.guess_path()).unwrap();
    fs::remove_file(params.preview_path()).unwrap();
}

#[test]
fn test_drivers_orbital_selection_empty_selection() {
    let molden = neon_molden();
    let name = temp_name("selection_empty");
    let params = OrbitalSelectionParams::builder()
        .name(name.clone())
        .write_preview(false)
        .build()
        .unwrap();
    let mut driver = OrbitalSelectionDriver::new(&params, &molden, "Q\n".as_bytes(), vec![]);
    driver.run().unwrap();
    assert_eq!(driver.result().unwrap().guess, "\n");
    assert!(!params.preview_path().exists());
    assert_eq!(fs::read_to_string(params.guess_path()).unwrap(), "\n");
    fs::remove_file(params.guess_path()).unwrap();
}

#[test]
fn test_drivers_orbital_selection_unterminated_input() {
    let molden = neon_molden();
    let name = temp_name("selection_unterminated");
    let params = OrbitalSelectionParams::builder()
        .name(name.clone())
        .build()
        .unwrap();
    let mut driver = OrbitalSelectionDriver::new(&params, &molden, "a 1\n".as_bytes(), vec![]);
    assert!(driver.run().is_err());
    assert!(driver.result().is_err());
    assert!(!params.guess_path().exists());
    assert!(!params.preview_path().exists());
}
