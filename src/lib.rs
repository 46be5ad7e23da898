//! # MoldenBridge: molecular-orbital interchange for XMVB
//!
//! MoldenBridge converts molecular-orbital coefficients between the text files of the XMVB
//! valence-bond program and the [Molden](https://www.theochem.ru.nl/molden/) interchange format.
//! It provides:
//! - conversion of XMVB guess orbitals (`.xdat` Initial Guess blocks or `.gus` files) into
//!   Molden files,
//! - conversion of XMVB natural orbitals (`xmvb.no`) into Molden files, with the eigenvalues as
//!   occupation numbers,
//! - an interactive session that assembles a new XMVB guess from the orbitals of a Molden file
//!   by selecting, masking, rotating and scaling them, and
//! - ranking of the structure-weight tables printed in XMVB logs.
//!
//! ## Cartesian component order
//!
//! XMVB lists the Cartesian components of $`d`$ and $`f`$ shells in lexicographic order, whereas
//! Molden expects `xx, yy, zz, xy, xz, yz` and `xxx, yyy, zzz, xyy, xxy, xxz, xzz, yzz, yyz, xyz`.
//! Every conversion reorders the coefficient rows of these shells (see [`reorder`]), and the
//! interactive session applies the inverse reordering before writing a guess. Only Cartesian
//! basis functions are supported.
//!
//! ## Examples and usage
//!
//! For most items (structs, enums, functions, and traits), their usages are illustrated in test
//! functions. The `moldenbridge` binary exposes the conversions as the subcommands `gus2molden`,
//! `no2molden`, `molden2gus` and `sortw`. Run `moldenbridge --help` for details.
//!
//! ## License
//!
//! GNU Lesser General Public License v3.0.

pub mod auxiliary;
pub mod basis;
pub mod drivers;
pub mod interfaces;
pub mod io;
pub mod permutation;
pub mod reorder;
pub mod target;
