//! Readers and writers for VASP text inputs.
//!
//! Writers take any [`std::io::Write`] sink; the `*_file` helpers open and
//! truncate the target path. Readers take any [`std::io::BufRead`] source.

use std::fmt;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use crate::model::structure::Structure;

pub mod error;
pub mod incar;
pub mod kpoints;
pub mod poscar;

pub use error::Error;
pub use incar::{read as read_incar, write as write_incar};
pub use kpoints::write as write_kpoints;
pub use poscar::{read as read_poscar, write as write_poscar};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Poscar,
    Incar,
    Kpoints,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Poscar => write!(f, "POSCAR"),
            Format::Incar => write!(f, "INCAR"),
            Format::Kpoints => write!(f, "KPOINTS"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinateMode {
    #[default]
    Direct,
    Cartesian,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoscarConfig {
    pub coordinates: CoordinateMode,
    /// Emit the VASP 5 species line above the counts.
    pub species_line: bool,
    /// Decimal places for lattice vectors and positions.
    pub precision: usize,
}

impl Default for PoscarConfig {
    fn default() -> Self {
        Self {
            coordinates: CoordinateMode::Direct,
            species_line: true,
            precision: 10,
        }
    }
}

/// Writes `structure` as a POSCAR file at `path`.
///
/// The file is only opened once the structure has been rendered, so a
/// structure that cannot be written leaves an existing file untouched.
pub fn write_poscar_file(
    structure: &Structure,
    path: impl AsRef<Path>,
    config: &PoscarConfig,
) -> Result<(), Error> {
    let mut buf = Vec::new();
    poscar::write(&mut buf, structure, config)?;
    fs::write(path.as_ref(), buf)?;
    Ok(())
}

pub fn read_poscar_file(path: impl AsRef<Path>) -> Result<Structure, Error> {
    let file = File::open(path.as_ref())?;
    poscar::read(BufReader::new(file))
}
