use ndarray::{array, Array2};
use num_traits::Inv;
use proptest::prelude::*;

use crate::basis::ao::{BasisAtom, BasisSet, BasisShell, Primitive, ShellKind};
use crate::reorder::{component_permutation, reorder_basis, reorder_shell, ReorderDirection};

fn unit_shell(kind: ShellKind) -> BasisShell {
    BasisShell::new(
        kind,
        &[Primitive::new(
            1.0,
            1.0,
            if kind == ShellKind::L { Some(1.0) } else { None },
        )],
    )
    .unwrap()
}

#[test]
fn test_reorder_tables() {
    let d_fwd = component_permutation(ShellKind::D, ReorderDirection::ToMolden).unwrap();
    let d_inv = component_permutation(ShellKind::D, ReorderDirection::FromMolden).unwrap();
    assert_eq!(d_fwd.image(), &vec![0, 3, 5, 1, 2, 4]);
    assert_eq!(d_inv.image(), &vec![0, 3, 4, 1, 5, 2]);
    assert_eq!(&d_fwd.inv(), d_inv);
    assert!((0..6).all(|i| d_fwd.image()[d_inv.image()[i]] == i));

    let f_fwd = component_permutation(ShellKind::F, ReorderDirection::ToMolden).unwrap();
    let f_inv = component_permutation(ShellKind::F, ReorderDirection::FromMolden).unwrap();
    assert_eq!(f_fwd.image(), &vec![0, 6, 9, 3, 1, 2, 5, 8, 7, 4]);
    assert_eq!(f_inv.image(), &vec![0, 4, 5, 3, 9, 6, 1, 8, 7, 2]);
    assert!((0..10).all(|i| f_inv.image()[f_fwd.image()[i]] == i));

    for kind in [ShellKind::S, ShellKind::P, ShellKind::L] {
        assert!(component_permutation(kind, ReorderDirection::ToMolden).is_none());
        assert!(component_permutation(kind, ReorderDirection::FromMolden).is_none());
    }
}

#[test]
fn test_reorder_d_shell_on_identity() {
    // S, P, D on one atom: the D shell starts at row 4.
    let mut mat = Array2::<f64>::eye(10);
    reorder_shell(&mut mat, 4, ShellKind::D, ReorderDirection::ToMolden).unwrap();
    for row in 0..4 {
        assert_eq!(mat.row(row), Array2::<f64>::eye(10).row(row));
    }
    for (new_row, old_row) in [0, 3, 5, 1, 2, 4].into_iter().enumerate() {
        assert_eq!(mat[(4 + new_row, 4 + old_row)], 1.0);
        assert_eq!(mat.row(4 + new_row).sum(), 1.0);
    }
    reorder_shell(&mut mat, 4, ShellKind::D, ReorderDirection::FromMolden).unwrap();
    assert_eq!(mat, Array2::<f64>::eye(10));
}

#[test]
fn test_reorder_f_shell_values() {
    let mut mat = Array2::from_shape_fn((10, 2), |(i, j)| (10 * j + i) as f64);
    reorder_shell(&mut mat, 0, ShellKind::F, ReorderDirection::ToMolden).unwrap();
    assert_eq!(
        mat.column(0).to_vec(),
        vec![0.0, 6.0, 9.0, 3.0, 1.0, 2.0, 5.0, 8.0, 7.0, 4.0]
    );
    assert_eq!(mat[(1, 1)], 16.0);
}

#[test]
fn test_reorder_shell_out_of_bounds() {
    let mut mat = Array2::<f64>::zeros((8, 1));
    assert!(reorder_shell(&mut mat, 3, ShellKind::D, ReorderDirection::ToMolden).is_err());
    assert!(reorder_shell(&mut mat, 2, ShellKind::D, ReorderDirection::ToMolden).is_ok());
    assert!(reorder_shell(&mut mat, 8, ShellKind::S, ReorderDirection::ToMolden).is_err());
}

#[test]
fn test_reorder_basis() {
    let atom = BasisAtom::new(
        1,
        "C",
        &[
            unit_shell(ShellKind::S),
            unit_shell(ShellKind::L),
            unit_shell(ShellKind::D),
            unit_shell(ShellKind::F),
        ],
    )
    .unwrap();
    let basis = BasisSet::new(&[atom]);
    let original = Array2::from_shape_fn((21, 3), |(i, j)| (i * 3 + j) as f64);
    let mut mat = original.clone();
    reorder_basis(&mut mat, &basis, ReorderDirection::ToMolden).unwrap();
    assert_eq!(mat.row(6), original.row(8));
    assert_eq!(mat.row(12), original.row(17));
    assert_eq!(mat.row(20), original.row(15));
    reorder_basis(&mut mat, &basis, ReorderDirection::FromMolden).unwrap();
    assert_eq!(mat, original);

    let mut short = Array2::<f64>::zeros((20, 1));
    assert!(reorder_basis(&mut short, &basis, ReorderDirection::ToMolden).is_err());
}

#[test]
fn test_reorder_two_column_block() {
    let mut mat = array![
        [1.0, -1.0],
        [2.0, -2.0],
        [3.0, -3.0],
        [4.0, -4.0],
        [5.0, -5.0],
        [6.0, -6.0]
    ];
    reorder_shell(&mut mat, 0, ShellKind::D, ReorderDirection::ToMolden).unwrap();
    assert_eq!(
        mat,
        array![
            [1.0, -1.0],
            [4.0, -4.0],
            [6.0, -6.0],
            [2.0, -2.0],
            [3.0, -3.0],
            [5.0, -5.0]
        ]
    );
}

proptest! {
    #[test]
    fn test_reorder_d_round_trip(values in prop::collection::vec(-1.0e3f64..1.0e3, 6)) {
        let original = Array2::from_shape_vec((6, 1), values).unwrap();
        let mut mat = original.clone();
        reorder_shell(&mut mat, 0, ShellKind::D, ReorderDirection::ToMolden).unwrap();
        reorder_shell(&mut mat, 0, ShellKind::D, ReorderDirection::FromMolden).unwrap();
        prop_assert_eq!(&mat, &original);
        reorder_shell(&mut mat, 0, ShellKind::D, ReorderDirection::FromMolden).unwrap();
        reorder_shell(&mut mat, 0, ShellKind::D, ReorderDirection::ToMolden).unwrap();
        prop_assert_eq!(&mat, &original);
    }

    #[test]
    fn test_reorder_f_round_trip(
        values in prop::collection::vec(-1.0e3f64..1.0e3, 30),
        offset in 0usize..3,
    ) {
        let original = Array2::from_shape_vec((15, 2), values).unwrap();
        let mut mat = original.clone();
        reorder_shell(&mut mat, offset, ShellKind::F, ReorderDirection::ToMolden).unwrap();
        reorder_shell(&mut mat, offset, ShellKind::F, ReorderDirection::FromMolden).unwrap();
        prop_assert_eq!(&mat, &original);
        reorder_shell(&mut mat, offset, ShellKind::F, ReorderDirection::FromMolden).unwrap();
        reorder_shell(&mut mat, offset, ShellKind::F, ReorderDirection::ToMolden).unwrap();
        prop_assert_eq!(&mat, &original);
    }
}
