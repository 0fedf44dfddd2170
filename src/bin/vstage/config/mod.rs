mod kpoints;
mod stage;

pub use kpoints::build_kpoints;
pub use stage::build_stage_config;
