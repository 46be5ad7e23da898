use std::fs;

use ndarray::{array, Array2};

use crate::interfaces::xmvb::eigen::decode_eigenvectors;
use crate::io::ParseError;

const ROOT: &str = env!("CARGO_MANIFEST_DIR");

#[test]
fn test_xmvb_eigen_decode_fixture() {
    let text = fs::read_to_string(format!("{ROOT}/tests/xmvb/xmvb.no")).unwrap();
    let (eigenvalues, eigenvectors) = decode_eigenvectors(&text, 7).unwrap();
    assert_eq!(eigenvalues, vec![0.5, 2.0, 0.0, 1.5, 0.25, 0.0, 1.0]);
    assert_eq!(eigenvectors, Array2::<f64>::eye(7));
}

#[test]
fn test_xmvb_eigen_decode_layout() {
    let text = "\
 -1.5D+00
  1.0D+00  2.0D+00  3.0D+00  4.0D+00  5.0D+00
  6.0D+00
  2.5D-01 trailing tokens are ignored
  7.0  8.0  9.0 10.0 11.0
 12.0

this text follows the terminating blank line
";
    let (eigenvalues, eigenvectors) = decode_eigenvectors(text, 6).unwrap();
    assert_eq!(eigenvalues, vec![-1.5, 0.25]);
    assert_eq!(
        eigenvectors,
        array![
            [1.0, 7.0],
            [2.0, 8.0],
            [3.0, 9.0],
            [4.0, 10.0],
            [5.0, 11.0],
            [6.0, 12.0]
        ]
    );
}

#[test]
fn test_xmvb_eigen_decode_malformed() {
    // A short data line.
    assert!(matches!(
        decode_eigenvectors("1.0\n 1.0 2.0\n", 3)
            .unwrap_err()
            .downcast_ref::<ParseError>(),
        Some(ParseError::MalformedRecord { .. })
    ));

    // A record cut off by the end of the text.
    assert!(decode_eigenvectors("1.0\n 1.0 2.0 3.0 4.0 5.0\n", 6).is_err());

    // More records than components.
    assert!(matches!(
        decode_eigenvectors("1.0\n 1.0\n2.0\n 2.0\n", 1)
            .unwrap_err()
            .downcast_ref::<ParseError>(),
        Some(ParseError::CountMismatch { .. })
    ));

    assert!(decode_eigenvectors("", 2).is_err());
    assert!(decode_eigenvectors("one\n 1.0\n", 1).is_err());
}
