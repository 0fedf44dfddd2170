//! Stages VASP calculation inputs from a queue of pending computations.
//!
//! A queue holds, for each entry, a crystal structure, a set of INCAR tags,
//! and optionally further input files. Staging an entry resolves a
//! destination directory, writes `POSCAR` and `INCAR` there, and asks the
//! queue to add whatever else the entry needs (a `KPOINTS` mesh, verbatim
//! auxiliary files).
//!
//! # Quick Start
//!
//! The main entry point is [`write_from_queue`], which takes anything
//! implementing [`InputQueue`], an [`EntryId`], and an optional destination:
//!
//! ```
//! use vasp_stage::{Element, EntryId, EntryRecord, IncarValue, Kpoints, MemoryQueue, Structure};
//! use vasp_stage::{StageError, VariableMap, write_from_queue};
//!
//! // Rock-salt NaCl, conventional cell
//! let a = 5.64;
//! let mut structure = Structure::new([[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]]);
//! structure.push_fractional(Element::from_atomic_number(11).unwrap(), [0.0, 0.0, 0.0]);
//! structure.push_fractional(Element::from_atomic_number(17).unwrap(), [0.5, 0.5, 0.5]);
//!
//! let mut variables = VariableMap::new();
//! variables.insert("ENCUT".into(), IncarValue::Real(520.0));
//! variables.insert("ISMEAR".into(), IncarValue::Int(0));
//!
//! let mut queue = MemoryQueue::new();
//! queue.insert(
//!     "nacl",
//!     EntryRecord::new(structure, variables).with_kpoints(Kpoints::gamma([6, 6, 6])),
//! );
//!
//! let workdir = tempfile::tempdir().unwrap();
//! let target = workdir.path().join("nacl-scf");
//!
//! // The missing directory is created, then POSCAR, INCAR, and KPOINTS land in it.
//! let dir = write_from_queue(&queue, &EntryId::from("nacl"), Some(target.as_path()))?;
//! assert_eq!(dir, target);
//! assert!(dir.join("POSCAR").is_file());
//! assert!(dir.join("INCAR").is_file());
//! assert!(dir.join("KPOINTS").is_file());
//! # Ok::<(), StageError>(())
//! ```
//!
//! # Destination Rules
//!
//! - none given: the current working directory
//! - an existing regular file: the directory containing it
//! - a path that does not exist: created (one level only) and used
//! - an existing directory: used as is
//! - anything else (socket, device, FIFO, broken link): rejected
//!
//! # Module Organization
//!
//! - [`io`] – Readers and writers for POSCAR, INCAR, and KPOINTS
//! - [`queue`] – The [`InputQueue`] capability and its memory and directory backends
//! - [`write_from_queue`] – Staging entry point
//!
//! # Data Types
//!
//! - [`Structure`] – Lattice plus Cartesian sites
//! - [`Element`] – Chemical element (H through Og)
//! - [`IncarValue`] – One INCAR tag value (bool, integer, real, text, list)
//! - [`InputVariables`] – Ordered INCAR tag map with file read/write
//! - [`Kpoints`] – Automatic k-point mesh

mod model;
mod stage;

pub mod io;
pub mod queue;

pub use model::element::{Element, ParseElementError};
pub use model::kpoints::{Kpoints, KpointsMode};
pub use model::structure::{Site, Structure};
pub use model::variables::{IncarValue, InputVariables, VariableMap};

pub use queue::{DirectoryQueue, EntryId, EntryRecord, InputQueue, MemoryQueue};

pub use stage::{
    Destination, INCAR_FILE, POSCAR_FILE, StageConfig, resolve_destination, write_from_queue,
    write_from_queue_with,
};

pub use stage::Error as StageError;
