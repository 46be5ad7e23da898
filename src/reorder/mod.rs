//! Reordering of Cartesian $`d`$ and $`f`$ components between the XMVB and Molden conventions.
//!
//! XMVB lists the Cartesian components of a shell lexicographically
//! (`xx xy xz yy yz zz`), whereas Molden lists them as `xx yy zz xy xz yz`. Coefficient rows
//! belonging to $`d`$ and $`f`$ shells must therefore be gathered into the other order whenever
//! coefficients cross between the two formats. $`s`$, $`p`$, and $`sp`$ shells are unaffected.

use std::fmt;

use anyhow::{self, ensure, format_err};
use lazy_static::lazy_static;
use ndarray::{s, Array2, Axis};
use num_traits::Inv;

use crate::basis::ao::{BasisSet, CartOrder, ShellKind};
use crate::permutation::{PermutableCollection, Permutation};

#[cfg(test)]
#[path = "reorder_tests.rs"]
mod reorder_tests;

/// An enumerated type for the direction of a component reordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReorderDirection {
    /// Variant for gathering XMVB-ordered rows into Molden order.
    ToMolden,

    /// Variant for gathering Molden-ordered rows back into XMVB order.
    FromMolden,
}

impl fmt::Display for ReorderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReorderDirection::ToMolden => write!(f, "XMVB → Molden"),
            ReorderDirection::FromMolden => write!(f, "Molden → XMVB"),
        }
    }
}

/// Gather permutation taking lexicographically ordered components of rank `lcart` into Molden
/// order.
fn lex_to_molden(lcart: u32) -> Result<Permutation, anyhow::Error> {
    CartOrder::molden(lcart)?
        .get_perm_of(&CartOrder::lex(lcart))
        .ok_or_else(|| format_err!("Lexicographic and Molden orders of rank {lcart} differ."))
}

lazy_static! {
    static ref D_TO_MOLDEN: Permutation =
        lex_to_molden(2).unwrap_or_else(|err| panic!("Invalid d reordering: {err}"));
    static ref D_FROM_MOLDEN: Permutation = (&*D_TO_MOLDEN).inv();
    static ref F_TO_MOLDEN: Permutation =
        lex_to_molden(3).unwrap_or_else(|err| panic!("Invalid f reordering: {err}"));
    static ref F_FROM_MOLDEN: Permutation = (&*F_TO_MOLDEN).inv();
}

/// Returns the gather permutation of the Cartesian components of a shell kind for a given
/// direction, or `None` if the components of the shell kind do not need reordering.
pub fn component_permutation(
    kind: ShellKind,
    direction: ReorderDirection,
) -> Option<&'static Permutation> {
    match (kind, direction) {
        (ShellKind::D, ReorderDirection::ToMolden) => Some(&*D_TO_MOLDEN),
        (ShellKind::D, ReorderDirection::FromMolden) => Some(&*D_FROM_MOLDEN),
        (ShellKind::F, ReorderDirection::ToMolden) => Some(&*F_TO_MOLDEN),
        (ShellKind::F, ReorderDirection::FromMolden) => Some(&*F_FROM_MOLDEN),
        _ => None,
    }
}

/// Reorders in place the rows of one shell of a coefficient matrix.
///
/// # Arguments
///
/// * `mat` - The coefficient matrix whose rows are atomic-orbital functions.
/// * `offset` - The 0-based row of the first component of the shell.
/// * `kind` - The kind of the shell.
/// * `direction` - The direction of the reordering.
///
/// # Errors
///
/// Errors if the rows of the shell lie outside the matrix.
pub fn reorder_shell(
    mat: &mut Array2<f64>,
    offset: usize,
    kind: ShellKind,
    direction: ReorderDirection,
) -> Result<(), anyhow::Error> {
    let n_comps = kind.n_funcs();
    ensure!(
        offset + n_comps <= mat.nrows(),
        "A {kind} shell at row offset {offset} does not fit within {} rows.",
        mat.nrows()
    );
    if let Some(perm) = component_permutation(kind, direction) {
        let gathered = mat
            .slice(s![offset..offset + n_comps, ..])
            .select(Axis(0), perm.image());
        mat.slice_mut(s![offset..offset + n_comps, ..])
            .assign(&gathered);
    }
    Ok(())
}

/// Reorders in place the rows of every $`d`$ and $`f`$ shell of a coefficient matrix.
///
/// # Arguments
///
/// * `mat` - The coefficient matrix whose rows are atomic-orbital functions of `basis`.
/// * `basis` - The basis set describing the rows of `mat`.
/// * `direction` - The direction of the reordering.
///
/// # Errors
///
/// Errors if the number of rows of `mat` differs from the number of functions in `basis`.
pub fn reorder_basis(
    mat: &mut Array2<f64>,
    basis: &BasisSet,
    direction: ReorderDirection,
) -> Result<(), anyhow::Error> {
    ensure!(
        mat.nrows() == basis.n_funcs(),
        "The coefficient matrix has {} rows, but the basis has {} functions.",
        mat.nrows(),
        basis.n_funcs()
    );
    basis
        .basis_shells()
        .zip(basis.shell_boundary_indices())
        .try_for_each(|(shell, (start, _))| reorder_shell(mat, start, shell.kind, direction))
}
