use std::fs;

use approx::assert_relative_eq;

use crate::interfaces::xmvb::weights::{WeightKind, WeightTable};
use crate::io::ParseError;

const ROOT: &str = env!("CARGO_MANIFEST_DIR");

fn water_log() -> String {
    fs::read_to_string(format!("{ROOT}/tests/xmvb/water.xmo")).unwrap()
}

#[test]
fn test_xmvb_weights_kind() {
    assert_eq!("w".parse::<WeightKind>().unwrap(), WeightKind::Weights);
    assert_eq!(
        "lc".parse::<WeightKind>().unwrap(),
        WeightKind::LowdinCoefficients
    );
    assert!("x".parse::<WeightKind>().is_err());
    assert!("W".parse::<WeightKind>().is_err());
    assert_eq!(WeightKind::Inverse.to_string(), "Inverse Weights");
}

#[test]
fn test_xmvb_weights_rank() {
    let table = WeightTable::from_log(&water_log(), WeightKind::Weights).unwrap();
    assert_eq!(
        table.rows().iter().map(|row| row.number).collect::<Vec<_>>(),
        vec![1, 3, 2]
    );
    assert_relative_eq!(table.total(), 1.0, epsilon = 1e-8);
    assert_eq!(table.rows()[0].description, "   1   1   2   2");

    let rendered = table.to_string();
    let mut lines = rendered.lines();
    assert_eq!(
        lines.next().unwrap(),
        "    1    1     0.52341231        1   1   2   2"
    );
    assert_eq!(
        lines.next().unwrap(),
        "    2    3     0.37419858        1   1   3   3"
    );
    assert_eq!(
        lines.next().unwrap(),
        "    3    2     0.10238911        1   1   2   3"
    );
    assert_eq!(lines.next().unwrap(), "     Total     1.00000000     ");
    assert!(lines.next().is_none());
}

#[test]
fn test_xmvb_weights_sections() {
    let log = water_log();
    let ranked = |kind: WeightKind| {
        WeightTable::from_log(&log, kind)
            .unwrap()
            .rows()
            .iter()
            .map(|row| row.number)
            .collect::<Vec<_>>()
    };
    assert_eq!(ranked(WeightKind::Lowdin), vec![1, 3, 2]);
    assert_eq!(ranked(WeightKind::Inverse), vec![1, 3, 2]);
    assert_eq!(ranked(WeightKind::Renormalized), vec![1, 3, 2]);
    assert_eq!(ranked(WeightKind::Coefficients), vec![3, 2, 1]);
    assert_eq!(ranked(WeightKind::LowdinCoefficients), vec![3, 2, 1]);

    let coefficients = WeightTable::from_log(&log, WeightKind::Coefficients).unwrap();
    assert_relative_eq!(coefficients.rows()[2].weight, -0.70123456);
}

#[test]
fn test_xmvb_weights_stable_and_missing() {
    let text = "WEIGHTS OF STRUCTURES\n-----\n 1 0.25 * 1 2\n 2 0.5 * 1 3\n 3 0.25 * 2 2\n x\n\n 4 0.9\n";
    let table = WeightTable::from_log(text, WeightKind::Weights).unwrap();
    assert_eq!(
        table.rows().iter().map(|row| row.number).collect::<Vec<_>>(),
        vec![2, 1, 3]
    );

    assert!(matches!(
        WeightTable::from_log("nothing", WeightKind::Lowdin)
            .unwrap_err()
            .downcast_ref::<ParseError>(),
        Some(ParseError::SectionNotFound(_))
    ));
    assert!(WeightTable::from_log("WEIGHTS OF STRUCTURES\n--\n 1 heavy\n", WeightKind::Weights).is_err());
}
