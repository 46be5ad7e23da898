//! Reading and writing Cartesian Molden files.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{self, bail, Context};
use indexmap::IndexMap;
use log;
use ndarray::Array1;

use crate::auxiliary::atom::{Atom, BOHR_PER_ANGSTROM};
use crate::basis::ao::{BasisAtom, BasisSet, BasisShell, Primitive, ShellKind};
use crate::io::format::fixed_or_exact;
use crate::io::{parse_count, parse_fortran_float, read_text, write_text, ParseError};
use crate::target::orbital::{MolecularOrbitals, OrbitalMetadata};


/// Section flags declaring spherical basis functions, which are not supported.
const SPHERICAL_FLAGS: [&str; 5] = ["5d", "5d7f", "5d10f", "7f", "9g"];

// ==================
// Struct definitions
// ==================

/// A structure containing the contents of a Cartesian Molden file.
///
/// Orbital coefficients are held in the Molden Cartesian component order.
#[derive(Clone, Debug, PartialEq)]
pub struct MoldenFile {
    /// The title of the file.
    pub title: String,

    /// The atoms of the molecule, with coordinates in bohr.
    pub atoms: Vec<Atom>,

    /// The basis set in which the orbitals are expressed.
    pub basis: BasisSet,

    /// The molecular orbitals.
    pub orbitals: MolecularOrbitals,

    /// How the occupation line of each orbital is written.
    pub occupation_style: OccupationStyle,
}

/// An enumerated type for the layouts of the `Occup=` line of an orbital.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OccupationStyle {
    /// Six decimals, as in `Occup= 2.000000`. Used for guess orbitals.
    #[default]
    Integral,

    /// Ten decimals right-aligned in 15 columns. Used for natural-orbital occupation numbers.
    Fractional,
}

impl OccupationStyle {
    /// The number of decimals written in this style.
    fn precision(&self) -> usize {
        match self {
            OccupationStyle::Integral => 6,
            OccupationStyle::Fractional => 10,
        }
    }

    /// Formats an occupation number. A value that six decimals cannot hold exactly is written in
    /// the fractional layout.
    fn format(&self, occupation: f64) -> String {
        let integral = format!("{occupation:.6}");
        match self {
            OccupationStyle::Integral if integral.parse::<f64>() == Ok(occupation) => integral,
            _ => fixed_or_exact(occupation, 15, 10),
        }
    }

    /// Infers the style of a written occupation value from its number of decimals.
    fn of_token(token: &str) -> Self {
        let decimals = token
            .split_once('.')
            .map(|(_, fraction)| {
                fraction
                    .chars()
                    .take_while(|c| c.is_ascii_digit())
                    .count()
            })
            .unwrap_or(0);
        if decimals > OccupationStyle::Integral.precision() {
            OccupationStyle::Fractional
        } else {
            OccupationStyle::Integral
        }
    }
}

impl MoldenFile {
    /// Constructs a new Molden file.
    ///
    /// # Errors
    ///
    /// Errors with [`ParseError::AoCountMismatch`] if the orbitals and the basis set have
    /// different numbers of functions.
    pub fn new(
        title: &str,
        atoms: &[Atom],
        basis: &BasisSet,
        orbitals: MolecularOrbitals,
    ) -> Result<Self, anyhow::Error> {
        basis.verify_n_funcs(orbitals.n_funcs())?;
        Ok(Self {
            title: title.to_string(),
            atoms: atoms.to_vec(),
            basis: basis.clone(),
            orbitals,
            occupation_style: OccupationStyle::default(),
        })
    }

    /// Sets the layout of the occupation lines.
    pub fn with_occupation_style(mut self, occupation_style: OccupationStyle) -> Self {
        self.occupation_style = occupation_style;
        self
    }

    /// Reads a Molden file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        read_text(path.as_ref())?
            .parse::<Self>()
            .with_context(|| format!("Unable to parse `{}`", path.as_ref().display()))
    }

    /// Writes this Molden file.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), anyhow::Error> {
        write_text(path, &self.to_string())
    }
}

impl fmt::Display for MoldenFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[Molden Format]")?;
        writeln!(f, "[Title]")?;
        writeln!(f, "{}", self.title)?;
        writeln!(f, "[Atoms] AU")?;
        for atom in self.atoms.iter() {
            writeln!(f, "{atom}")?;
        }
        write!(f, "[GTO]{}", self.basis.to_gto_string())?;
        write!(f, "\n\n\n")?;
        writeln!(f, "[6D10F]")?;
        writeln!(f, "[MO]")?;
        for (column, meta) in self
            .orbitals
            .coefficients()
            .columns()
            .into_iter()
            .zip(self.orbitals.metadata().iter())
        {
            writeln!(f, "Sym= {:>6}", meta.symmetry)?;
            writeln!(f, "Ene= {:?}", meta.energy)?;
            writeln!(f, "Spin= {}", meta.spin)?;
            writeln!(f, "Occup= {}", self.occupation_style.format(meta.occupation))?;
            for (row, value) in column.iter().enumerate() {
                writeln!(f, "{:>4}  {:>15.10}", row + 1, value)?;
            }
        }
        Ok(())
    }
}

// -------
// Reading
// -------

/// A section of a Molden file: the text after the closing bracket of its header, and its body
/// lines.
struct MoldenSection<'a> {
    header_tail: &'a str,
    lines: Vec<&'a str>,
}

/// Splits Molden text into its sections, keyed by lower-cased section name in file order.
fn split_sections(text: &str) -> IndexMap<String, MoldenSection<'_>> {
    let mut sections: IndexMap<String, MoldenSection<'_>> = IndexMap::new();
    let mut current: Option<String> = None;
    for line in text.lines() {
        let trimmed = line.trim();
        if let Some((name, tail)) = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.split_once(']'))
        {
            let key = name.trim().to_lowercase();
            sections.insert(
                key.clone(),
                MoldenSection {
                    header_tail: tail,
                    lines: vec![],
                },
            );
            current = Some(key);
        } else if let Some(section) = current.as_ref().and_then(|key| sections.get_mut(key)) {
            section.lines.push(line);
        }
    }
    sections
}

fn parse_atoms(section: &MoldenSection<'_>) -> Result<Vec<Atom>, ParseError> {
    let bohr_per_unit = if section.header_tail.to_lowercase().contains("ang") {
        BOHR_PER_ANGSTROM
    } else {
        1.0
    };
    section
        .lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| Atom::from_molden_record(line, bohr_per_unit))
        .collect()
}

fn parse_gto(section: &MoldenSection<'_>, atoms: &[Atom]) -> Result<BasisSet, anyhow::Error> {
    let mut basis_atoms: Vec<BasisAtom> = vec![];
    let mut lines = section
        .lines
        .iter()
        .copied()
        .filter(|line| !line.trim().is_empty());
    while let Some(line) = lines.next() {
        let tokens = line.split_whitespace().collect::<Vec<_>>();
        if let Ok(index) = tokens[0].parse::<usize>() {
            let label = atoms
                .iter()
                .find(|atom| atom.index == index)
                .map(|atom| atom.label.clone())
                .unwrap_or_else(|| index.to_string());
            basis_atoms.push(BasisAtom {
                index,
                label,
                basis_shells: vec![],
            });
            continue;
        }

        let kind = tokens[0].parse::<ShellKind>()?;
        let n_prims = tokens
            .get(1)
            .ok_or_else(|| ParseError::MalformedRecord {
                record: line.to_string(),
                reason: "no primitive count found".to_string(),
            })
            .and_then(|token| parse_count(token, line))?;
        let prims = (0..n_prims)
            .map(|_| {
                let record = lines.next().ok_or_else(|| ParseError::MalformedRecord {
                    record: line.to_string(),
                    reason: format!("a {kind} shell needs {n_prims} primitive(s)"),
                })?;
                parse_primitive(record, kind)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let basis_atom = basis_atoms
            .last_mut()
            .ok_or_else(|| ParseError::MalformedRecord {
                record: line.to_string(),
                reason: "shell found before any atom".to_string(),
            })?;
        basis_atom.basis_shells.push(BasisShell::new(kind, &prims)?);
    }
    Ok(BasisSet::new(&basis_atoms))
}

fn parse_primitive(record: &str, kind: ShellKind) -> Result<Primitive, ParseError> {
    let tokens = record.split_whitespace().collect::<Vec<_>>();
    let n_required = if kind == ShellKind::L { 3 } else { 2 };
    if tokens.len() < n_required {
        return Err(ParseError::MalformedRecord {
            record: record.to_string(),
            reason: format!("a {kind} primitive needs {n_required} values"),
        });
    }
    let sp_coefficient = if kind == ShellKind::L {
        Some(parse_fortran_float(tokens[2])?)
    } else {
        None
    };
    Ok(Primitive::new(
        parse_fortran_float(tokens[0])?,
        parse_fortran_float(tokens[1])?,
        sp_coefficient,
    ))
}

fn parse_mo(
    section: &MoldenSection<'_>,
    n_funcs: usize,
) -> Result<(MolecularOrbitals, OccupationStyle), anyhow::Error> {
    let mut occupation_style = OccupationStyle::Integral;
    let mut columns: Vec<(Array1<f64>, OrbitalMetadata)> = vec![];
    let mut meta = OrbitalMetadata::default();
    let mut column: Option<Array1<f64>> = None;
    for line in section.lines.iter() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some((key, value)) = trimmed.split_once('=') {
            if let Some(finished) = column.take() {
                columns.push((finished, meta.clone()));
            }
            let value = value.trim();
            match key.trim().to_lowercase().as_str() {
                "sym" => meta.symmetry = value.to_string(),
                "ene" => meta.energy = parse_fortran_float(value)?,
                "spin" => meta.spin = value.parse()?,
                "occup" => {
                    meta.occupation = parse_fortran_float(value)?;
                    if OccupationStyle::of_token(value) == OccupationStyle::Fractional {
                        occupation_style = OccupationStyle::Fractional;
                    }
                }
                other => log::debug!("Ignoring unknown orbital key `{other}`."),
            }
            continue;
        }

        let tokens = trimmed.split_whitespace().collect::<Vec<_>>();
        if tokens.len() < 2 {
            bail!(ParseError::MalformedRecord {
                record: line.to_string(),
                reason: "a coefficient record needs an index and a value".to_string(),
            });
        }
        let index = parse_count(tokens[0], line)?;
        if index == 0 || index > n_funcs {
            bail!(ParseError::AoCountMismatch {
                declared: n_funcs,
                found: index,
            });
        }
        column.get_or_insert_with(|| Array1::zeros(n_funcs))[index - 1] =
            parse_fortran_float(tokens[1])?;
    }
    if let Some(finished) = column {
        columns.push((finished, meta));
    }
    Ok((
        MolecularOrbitals::from_columns(n_funcs, &columns)?,
        occupation_style,
    ))
}

impl FromStr for MoldenFile {
    type Err = anyhow::Error;

    /// Parses the `[Title]`, `[Atoms]`, `[GTO]` and `[MO]` sections of a Cartesian Molden file.
    /// Files declaring spherical functions are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sections = split_sections(s);
        log::debug!(
            "Molden sections found: {}",
            sections.keys().cloned().collect::<Vec<_>>().join(", ")
        );
        if let Some(flag) = SPHERICAL_FLAGS
            .iter()
            .find(|flag| sections.contains_key(**flag))
        {
            bail!("Spherical basis functions (`[{}]`) are not supported.", flag.to_uppercase());
        }
        let section = |name: &str| {
            sections
                .get(name)
                .ok_or_else(|| ParseError::SectionNotFound(format!("[{name}]")))
        };

        let title = sections
            .get("title")
            .and_then(|title| title.lines.first())
            .map(|line| line.trim().to_string())
            .unwrap_or_default();
        let atoms = parse_atoms(section("atoms")?)?;
        let basis = parse_gto(section("gto")?, &atoms)?;
        let (orbitals, occupation_style) = parse_mo(section("mo")?, basis.n_funcs())?;
        Ok(Self::new(&title, &atoms, &basis, orbitals)?.with_occupation_style(occupation_style))
    }
}
