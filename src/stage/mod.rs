mod destination;
mod error;

pub use destination::{Destination, resolve_destination};
pub use error::Error;

use std::path::{Path, PathBuf};

use crate::io::{self, PoscarConfig};
use crate::model::variables::InputVariables;
use crate::queue::{EntryId, InputQueue};

pub const POSCAR_FILE: &str = "POSCAR";
pub const INCAR_FILE: &str = "INCAR";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageConfig {
    pub poscar: PoscarConfig,
}

/// Writes the inputs of `entry` with the default [`StageConfig`].
///
/// See [`write_from_queue_with`].
pub fn write_from_queue<Q: InputQueue + ?Sized>(
    queue: &Q,
    entry: &EntryId,
    destination: Option<&Path>,
) -> Result<PathBuf, Error> {
    write_from_queue_with(queue, entry, destination, &StageConfig::default())
}

/// Writes `POSCAR` and `INCAR` for `entry`, then lets the queue write any
/// further input files, all into the directory resolved from `destination`.
///
/// Steps run in a fixed order and stop at the first failure:
/// destination resolution, structure fetch, variables fetch, `POSCAR`,
/// `INCAR`, [`InputQueue::write_input_files`]. Files written before a
/// failure are left in place.
///
/// Returns the resolved directory.
pub fn write_from_queue_with<Q: InputQueue + ?Sized>(
    queue: &Q,
    entry: &EntryId,
    destination: Option<&Path>,
    config: &StageConfig,
) -> Result<PathBuf, Error> {
    let dir = resolve_destination(destination)?;
    tracing::debug!(entry = %entry, dir = %dir.display(), "resolved destination");

    let structure = queue
        .input_structure(entry)
        .map_err(Error::from_fetch)?;
    let variables = queue
        .input_variables(entry)
        .map_err(Error::from_fetch)?;

    let mut incar = InputVariables::new();
    incar.variables = variables;

    let poscar_path = dir.join(POSCAR_FILE);
    io::write_poscar_file(&structure, &poscar_path, &config.poscar)
        .map_err(|e| Error::write_failed(&poscar_path, e))?;
    tracing::debug!(path = %poscar_path.display(), sites = structure.site_count(), "wrote POSCAR");

    let incar_path = dir.join(INCAR_FILE);
    incar
        .write(&incar_path)
        .map_err(|e| Error::write_failed(&incar_path, e))?;
    tracing::debug!(path = %incar_path.display(), tags = incar.len(), "wrote INCAR");

    queue
        .write_input_files(entry, &dir)
        .map_err(|e| Error::write_failed(&dir, e))?;

    tracing::info!(entry = %entry, dir = %dir.display(), "staged inputs");
    Ok(dir)
}
