//! Atomic-orbital basis functions.

use std::collections::HashMap;
use std::fmt;
use std::slice::Iter;
use std::str::FromStr;

use anyhow::{self, format_err};
use derive_builder::Builder;
use itertools::Itertools;

use crate::io::format::fixed_or_exact;
use crate::io::ParseError;
use crate::permutation::{PermutableCollection, Permutation};

#[cfg(test)]
#[path = "ao_tests.rs"]
mod ao_tests;

/// Labels of the angular momenta of Cartesian shells, indexed by rank.
pub static ANGMOM_LABELS: [&str; 4] = ["S", "P", "D", "F"];

// -------------------
// Shell order structs
// -------------------

// ~~~~~~~~~
// CartOrder
// ~~~~~~~~~

/// Structure to contain information about the ordering of Cartesian Gaussians of a certain rank.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CartOrder {
    /// A sequence of $`(l_x, l_y, l_z)`$ tuples giving the ordering of the Cartesian Gaussians.
    pub cart_tuples: Vec<(u32, u32, u32)>,

    /// The rank of the Cartesian Gaussians.
    pub lcart: u32,
}

impl CartOrder {
    /// Constructs a new [`CartOrder`] structure for a specified rank with lexicographic order.
    /// This is the order in which XMVB lists the Cartesian components of a shell.
    ///
    /// # Arguments
    ///
    /// * `lcart` - The required Cartesian Gaussian rank.
    #[must_use]
    pub fn lex(lcart: u32) -> Self {
        let mut cart_tuples = Vec::with_capacity(((lcart + 1) * (lcart + 2)).div_euclid(2) as usize);
        for lx in (0..=lcart).rev() {
            for ly in (0..=(lcart - lx)).rev() {
                cart_tuples.push((lx, ly, lcart - lx - ly));
            }
        }
        Self {
            cart_tuples,
            lcart,
        }
    }

    /// Constructs a new [`CartOrder`] structure for a specified rank with Molden order.
    ///
    /// # Arguments
    ///
    /// * `lcart` - The required Cartesian Gaussian rank up to 3.
    ///
    /// # Errors
    ///
    /// Errors if `lcart` is greater than 3.
    pub fn molden(lcart: u32) -> Result<Self, anyhow::Error> {
        let cart_tuples: Vec<(u32, u32, u32)> = match lcart {
            0 => vec![(0, 0, 0)],
            1 => vec![(1, 0, 0), (0, 1, 0), (0, 0, 1)],
            2 => vec![
                (2, 0, 0),
                (0, 2, 0),
                (0, 0, 2),
                (1, 1, 0),
                (1, 0, 1),
                (0, 1, 1),
            ],
            3 => vec![
                (3, 0, 0),
                (0, 3, 0),
                (0, 0, 3),
                (1, 2, 0),
                (2, 1, 0),
                (2, 0, 1),
                (1, 0, 2),
                (0, 1, 2),
                (0, 2, 1),
                (1, 1, 1),
            ],
            _ => return Err(format_err!("Cartesian rank {lcart} > 3 is not supported.")),
        };
        Ok(Self {
            cart_tuples,
            lcart,
        })
    }

    /// Iterates over the constituent tuples.
    pub fn iter(&'_ self) -> Iter<'_, (u32, u32, u32)> {
        self.cart_tuples.iter()
    }
}

impl fmt::Display for CartOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.iter().map(cart_tuple_to_str).join(" ")
        )
    }
}

impl fmt::Debug for CartOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cartesian rank: {}", self.lcart)?;
        writeln!(f, "Order:")?;
        for cart_tuple in self.iter() {
            writeln!(f, "  {cart_tuple:?}")?;
        }
        Ok(())
    }
}

impl PermutableCollection for CartOrder {
    fn get_perm_of(&self, other: &Self) -> Option<Permutation> {
        let o_cart_tuples: HashMap<&(u32, u32, u32), usize> = other
            .cart_tuples
            .iter()
            .enumerate()
            .map(|(i, o_cart_tuple)| (o_cart_tuple, i))
            .collect();
        let image_opt: Option<Vec<usize>> = self
            .cart_tuples
            .iter()
            .map(|s_cart_tuple| o_cart_tuples.get(s_cart_tuple).copied())
            .collect();
        image_opt.and_then(|image| Permutation::from_image(&image).ok())
    }
}

/// Translates a Cartesian exponent tuple to a flat string such as `xxy`.
fn cart_tuple_to_str(cart_tuple: &(u32, u32, u32)) -> String {
    if cart_tuple.0 + cart_tuple.1 + cart_tuple.2 == 0u32 {
        "1".to_string()
    } else {
        ["x", "y", "z"]
            .iter()
            .zip([cart_tuple.0, cart_tuple.1, cart_tuple.2])
            .map(|(cart, l)| cart.repeat(l as usize))
            .collect::<String>()
    }
}

// ---------
// ShellKind
// ---------

/// An enumerated type for the kinds of Cartesian shells appearing in XMVB and Molden basis
/// tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShellKind {
    /// Variant for an $`s`$ shell.
    S,

    /// Variant for a $`p`$ shell.
    P,

    /// Variant for a Cartesian $`d`$ shell.
    D,

    /// Variant for a Cartesian $`f`$ shell.
    F,

    /// Variant for a combined $`sp`$ shell sharing exponents between one $`s`$ and three $`p`$
    /// functions.
    L,
}

impl ShellKind {
    /// The Cartesian rank of this shell kind, or `None` for a combined [`ShellKind::L`] shell.
    pub fn lcart(&self) -> Option<u32> {
        match self {
            ShellKind::S => Some(0),
            ShellKind::P => Some(1),
            ShellKind::D => Some(2),
            ShellKind::F => Some(3),
            ShellKind::L => None,
        }
    }

    /// The number of Cartesian basis functions in a shell of this kind.
    pub fn n_funcs(&self) -> usize {
        match self {
            ShellKind::S => 1,
            ShellKind::P => 3,
            ShellKind::D => 6,
            ShellKind::F => 10,
            ShellKind::L => 4,
        }
    }
}

impl FromStr for ShellKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "S" => Ok(ShellKind::S),
            "P" => Ok(ShellKind::P),
            "D" => Ok(ShellKind::D),
            "F" => Ok(ShellKind::F),
            "L" | "SP" => Ok(ShellKind::L),
            _ => Err(ParseError::MalformedRecord {
                record: s.to_string(),
                reason: "unsupported shell type".to_string(),
            }),
        }
    }
}

impl fmt::Display for ShellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lcart() {
            Some(lcart) => write!(f, "{}", ANGMOM_LABELS[lcart as usize]),
            None => write!(f, "L"),
        }
    }
}

// ---------
// Primitive
// ---------

/// Structure for one primitive Gaussian of a contracted shell.
#[derive(Clone, Debug, PartialEq)]
pub struct Primitive {
    /// The Gaussian exponent.
    pub exponent: f64,

    /// The contraction coefficient. For an [`ShellKind::L`] shell, this is the $`s`$ coefficient.
    pub coefficient: f64,

    /// The $`p`$ contraction coefficient of an [`ShellKind::L`] shell.
    pub sp_coefficient: Option<f64>,

    /// The exponent and coefficient tokens as printed in an XMVB log, in record order. When
    /// present, they are written to Molden files unchanged.
    pub source_tokens: Option<Vec<String>>,
}

impl Primitive {
    /// Constructs a primitive without source text.
    pub fn new(exponent: f64, coefficient: f64, sp_coefficient: Option<f64>) -> Self {
        Self {
            exponent,
            coefficient,
            sp_coefficient,
            source_tokens: None,
        }
    }

    /// Returns the source token at `index`, if one was kept.
    fn source_token(&self, index: usize) -> Option<&str> {
        self.source_tokens
            .as_ref()
            .and_then(|tokens| tokens.get(index))
            .map(String::as_str)
    }

    /// Writes one `[GTO]` contraction line. The coefficient is taken from the source token at
    /// `coefficient_index` when one was kept.
    fn gto_record(&self, coefficient: f64, coefficient_index: usize) -> String {
        let exponent = self
            .source_token(0)
            .map(|token| format!("{token:>14}"))
            .unwrap_or_else(|| fixed_or_exact(self.exponent, 14, 7));
        let coefficient = self
            .source_token(coefficient_index)
            .map(|token| format!("{token:>16}"))
            .unwrap_or_else(|| fixed_or_exact(coefficient, 16, 12));
        format!("  {exponent}    {coefficient}\n")
    }
}

// ----------
// BasisShell
// ----------

/// Structure representing a contracted Cartesian shell in an atomic-orbital basis set.
#[derive(Clone, Builder, Debug, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct BasisShell {
    /// The kind of this shell.
    pub kind: ShellKind,

    /// The primitives contracted in this shell, in file order.
    #[builder(setter(custom))]
    pub primitives: Vec<Primitive>,
}

impl BasisShellBuilder {
    pub(crate) fn primitives(&mut self, prims: &[Primitive]) -> &mut Self {
        self.primitives = Some(prims.to_vec());
        self
    }

    fn validate(&self) -> Result<(), String> {
        let kind = self.kind.ok_or("No shell kind found.".to_string())?;
        let prims = self
            .primitives
            .as_ref()
            .ok_or("No primitives found.".to_string())?;
        if prims.is_empty() {
            return Err(format!("A {kind} shell must contain at least one primitive."));
        }
        let sp_ok = prims
            .iter()
            .all(|prim| prim.sp_coefficient.is_some() == (kind == ShellKind::L));
        if sp_ok {
            Ok(())
        } else {
            Err(format!(
                "Primitives of a {kind} shell carry inconsistent sp coefficients."
            ))
        }
    }
}

impl BasisShell {
    /// Returns a builder to construct a new [`BasisShell`].
    pub(crate) fn builder() -> BasisShellBuilder {
        BasisShellBuilder::default()
    }

    /// Constructs a new [`BasisShell`].
    ///
    /// # Errors
    ///
    /// Errors if there are no primitives, or if the presence of $`sp`$ coefficients does not
    /// match the shell kind.
    pub fn new(kind: ShellKind, prims: &[Primitive]) -> Result<Self, anyhow::Error> {
        BasisShell::builder()
            .kind(kind)
            .primitives(prims)
            .build()
            .map_err(|err| format_err!(err))
    }

    /// The number of basis functions in this shell.
    pub fn n_funcs(&self) -> usize {
        self.kind.n_funcs()
    }

    /// Writes the Molden `[GTO]` records of this shell. An [`ShellKind::L`] shell is written as an
    /// `S` block followed by a `P` block sharing the same exponents.
    pub fn to_gto_records(&self) -> String {
        let block = |label: &str, coefficient_index: usize| {
            let mut out = format!("{label} {} 1.0\n", self.primitives.len());
            for prim in self.primitives.iter() {
                let coefficient = if coefficient_index == 2 {
                    prim.sp_coefficient.unwrap_or(0.0)
                } else {
                    prim.coefficient
                };
                out.push_str(&prim.gto_record(coefficient, coefficient_index));
            }
            out
        };
        match self.kind {
            ShellKind::L => block("S", 1) + &block("P", 2),
            kind => block(&kind.to_string(), 1),
        }
    }
}

// ---------
// BasisAtom
// ---------

/// Structure containing the ordered sequence of the shells for an atom.
#[derive(Clone, Builder, Debug, PartialEq)]
pub struct BasisAtom {
    /// The one-based index of the atom in the geometry.
    pub index: usize,

    /// The label of the atom as it appears in the basis table.
    pub label: String,

    /// The ordered shells associated with this atom.
    #[builder(setter(custom))]
    pub basis_shells: Vec<BasisShell>,
}

impl BasisAtomBuilder {
    pub(crate) fn basis_shells(&mut self, bss: &[BasisShell]) -> &mut Self {
        self.basis_shells = Some(bss.to_vec());
        self
    }
}

impl BasisAtom {
    /// Returns a builder to construct a new [`BasisAtom`].
    pub(crate) fn builder() -> BasisAtomBuilder {
        BasisAtomBuilder::default()
    }

    /// Constructs a new [`BasisAtom`].
    ///
    /// # Arguments
    ///
    /// * `index` - The one-based index of the atom.
    /// * `label` - The label of the atom.
    /// * `bss` - A sequence of [`BasisShell`]s containing the basis functions localised on this
    ///   atom.
    pub fn new(index: usize, label: &str, bss: &[BasisShell]) -> Result<Self, anyhow::Error> {
        BasisAtom::builder()
            .index(index)
            .label(label.to_string())
            .basis_shells(bss)
            .build()
            .map_err(|err| format_err!(err))
    }

    /// The number of basis functions localised on this atom.
    pub fn n_funcs(&self) -> usize {
        self.basis_shells.iter().map(BasisShell::n_funcs).sum()
    }

    /// The ordered tuples of 0-based indices indicating the starting (inclusive) and ending
    /// (exclusive) positions of the shells on this atom.
    fn shell_boundary_indices(&self) -> Vec<(usize, usize)> {
        self.basis_shells
            .iter()
            .scan(0, |acc, basis_shell| {
                let start_index = *acc;
                *acc += basis_shell.n_funcs();
                Some((start_index, *acc))
            })
            .collect::<Vec<_>>()
    }
}

// --------
// BasisSet
// --------

/// Structure containing the shells of an atomic-orbital basis set grouped by atom, in the order in
/// which the basis functions index the rows of a coefficient matrix.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct BasisSet {
    /// An ordered sequence of [`BasisAtom`] in the order the atoms are defined in the molecule.
    pub basis_atoms: Vec<BasisAtom>,
}

impl BasisSet {
    /// Constructs a new [`BasisSet`] from its atoms.
    pub fn new(batms: &[BasisAtom]) -> Self {
        Self {
            basis_atoms: batms.to_vec(),
        }
    }

    /// The number of atoms carrying basis functions.
    pub fn n_atoms(&self) -> usize {
        self.basis_atoms.len()
    }

    /// The total number of Cartesian basis functions.
    pub fn n_funcs(&self) -> usize {
        self.basis_atoms.iter().map(BasisAtom::n_funcs).sum()
    }

    /// Iterates over all shells in row order.
    pub fn basis_shells(&self) -> impl Iterator<Item = &BasisShell> + '_ {
        self.basis_atoms
            .iter()
            .flat_map(|basis_atom| basis_atom.basis_shells.iter())
    }

    /// The ordered tuples of 0-based function indices indicating the starting (inclusive) and
    /// ending (exclusive) positions of the atoms in this basis.
    pub fn atom_boundary_indices(&self) -> Vec<(usize, usize)> {
        self.basis_atoms
            .iter()
            .scan(0, |acc, basis_atom| {
                let start_index = *acc;
                *acc += basis_atom.n_funcs();
                Some((start_index, *acc))
            })
            .collect::<Vec<_>>()
    }

    /// The ordered tuples of 0-based function indices indicating the starting (inclusive) and
    /// ending (exclusive) positions of the shells in this basis.
    pub fn shell_boundary_indices(&self) -> Vec<(usize, usize)> {
        let atom_boundary_indices = self.atom_boundary_indices();
        self.basis_atoms
            .iter()
            .zip(atom_boundary_indices)
            .flat_map(|(basis_atom, (atom_start, _))| {
                basis_atom
                    .shell_boundary_indices()
                    .into_iter()
                    .map(move |(shell_start, shell_end)| {
                        (shell_start + atom_start, shell_end + atom_start)
                    })
            })
            .collect::<Vec<_>>()
    }

    /// The 0-based row range covered by the atom with a given one-based index. Atoms without
    /// basis functions have an empty range.
    pub fn function_range_of_atom(&self, atom_index: usize) -> (usize, usize) {
        self.basis_atoms
            .iter()
            .zip(self.atom_boundary_indices())
            .find(|(basis_atom, _)| basis_atom.index == atom_index)
            .map(|(_, bounds)| bounds)
            .unwrap_or((0, 0))
    }

    /// Checks the number of functions in this basis against a declared number.
    ///
    /// # Errors
    ///
    /// Errors with [`ParseError::AoCountMismatch`] if the numbers differ.
    pub fn verify_n_funcs(&self, declared: usize) -> Result<(), ParseError> {
        let found = self.n_funcs();
        if found == declared {
            Ok(())
        } else {
            Err(ParseError::AoCountMismatch { declared, found })
        }
    }

    /// Writes the body of a Molden `[GTO]` section for this basis.
    pub fn to_gto_string(&self) -> String {
        self.basis_atoms
            .iter()
            .map(|basis_atom| {
                format!("\n{}  0\n", basis_atom.index)
                    + &basis_atom
                        .basis_shells
                        .iter()
                        .map(BasisShell::to_gto_records)
                        .collect::<String>()
            })
            .collect::<String>()
    }
}

impl fmt::Display for BasisSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label_width = self
            .basis_atoms
            .iter()
            .map(|basis_atom| basis_atom.label.chars().count())
            .max()
            .unwrap_or(4)
            .max(4);
        writeln!(f, "{}", "┈".repeat(label_width + 40))?;
        writeln!(f, " {:>5}  {:<label_width$}  {:>7}  Shells", "Index", "Atom", "Funcs")?;
        writeln!(f, "{}", "┈".repeat(label_width + 40))?;
        for basis_atom in self.basis_atoms.iter() {
            writeln!(
                f,
                " {:>5}  {:<label_width$}  {:>7}  {}",
                basis_atom.index,
                basis_atom.label,
                basis_atom.n_funcs(),
                basis_atom.basis_shells.iter().map(|bs| bs.kind).join("")
            )?;
        }
        writeln!(f, "{}", "┈".repeat(label_width + 40))?;
        writeln!(f, " Total number of Cartesian functions: {}", self.n_funcs())?;
        Ok(())
    }
}
