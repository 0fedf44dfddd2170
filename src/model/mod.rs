//! Core data carried from a queue entry into VASP input files.
//!
//! - [`element`] – Chemical elements keyed by atomic number.
//! - [`structure`] – Periodic structures with lattice, sites, and species grouping.
//! - [`variables`] – INCAR tag values and the [`InputVariables`] container.
//! - [`kpoints`] – Automatic k-point mesh descriptions.
//!
//! [`InputVariables`]: variables::InputVariables

pub mod element;
pub mod kpoints;
pub mod structure;
pub mod variables;
