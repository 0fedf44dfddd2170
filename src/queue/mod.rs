//! Queue collaborators: where entries' structures, INCAR tags, and
//! auxiliary input files come from.
//!
//! [`InputQueue`] is the capability set the stager needs. Two
//! implementations ship with the crate:
//!
//! - [`MemoryQueue`] – in-process map, handy for embedding and tests.
//! - [`DirectoryQueue`] – one TOML file per entry under a root directory.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::io;
use crate::model::kpoints::Kpoints;
use crate::model::structure::Structure;
use crate::model::variables::VariableMap;

mod directory;
mod error;
mod memory;

pub use directory::DirectoryQueue;
pub use error::Error;
pub use memory::MemoryQueue;

pub const KPOINTS_FILE: &str = "KPOINTS";

const RESERVED_FILES: [&str; 2] = ["POSCAR", "INCAR"];

/// Identifier of one computation inside a queue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EntryId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for EntryId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<u32> for EntryId {
    fn from(id: u32) -> Self {
        Self(id.to_string())
    }
}

/// Source of the inputs for queued computations.
pub trait InputQueue {
    fn input_structure(&self, entry: &EntryId) -> Result<Structure, Error>;

    fn input_variables(&self, entry: &EntryId) -> Result<VariableMap, Error>;

    /// Writes whatever additional input files the entry needs into `dir`.
    fn write_input_files(&self, entry: &EntryId, dir: &Path) -> Result<(), Error>;
}

/// Everything stored for one entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub structure: Structure,
    #[serde(default)]
    pub variables: VariableMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kpoints: Option<Kpoints>,
    /// Extra files written verbatim, keyed by file name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub files: BTreeMap<String, String>,
}

impl EntryRecord {
    pub fn new(structure: Structure, variables: VariableMap) -> Self {
        Self {
            structure,
            variables,
            kpoints: None,
            files: BTreeMap::new(),
        }
    }

    pub fn with_kpoints(mut self, kpoints: Kpoints) -> Self {
        self.kpoints = Some(kpoints);
        self
    }

    pub fn with_file(mut self, name: impl Into<String>, contents: impl Into<String>) -> Self {
        self.files.insert(name.into(), contents.into());
        self
    }

    /// Names of the auxiliary files [`write_input_files`](Self::write_input_files) produces.
    pub fn auxiliary_file_names(&self) -> Vec<&str> {
        self.kpoints
            .iter()
            .map(|_| KPOINTS_FILE)
            .chain(self.files.keys().map(String::as_str))
            .collect()
    }

    pub fn validate(&self, entry: &EntryId) -> Result<(), Error> {
        for name in self.files.keys() {
            check_file_name(name).map_err(|detail| Error::invalid_entry(entry, detail))?;
            if RESERVED_FILES.contains(&name.as_str()) {
                return Err(Error::invalid_entry(
                    entry,
                    format!("auxiliary file '{}' would overwrite a staged input", name),
                ));
            }
            if name == KPOINTS_FILE && self.kpoints.is_some() {
                return Err(Error::invalid_entry(
                    entry,
                    "KPOINTS given both as a mesh and as a file",
                ));
            }
        }
        Ok(())
    }

    /// Writes KPOINTS (when a mesh is set) and every stored file into `dir`.
    ///
    /// The record is validated first, so an invalid record writes nothing.
    pub fn write_input_files(&self, entry: &EntryId, dir: &Path) -> Result<(), Error> {
        self.validate(entry)?;

        if let Some(kpoints) = &self.kpoints {
            let path = dir.join(KPOINTS_FILE);
            write_kpoints_file(&path, kpoints).map_err(|source| Error::Write {
                path: path.clone(),
                source,
            })?;
            tracing::debug!(entry = %entry, path = %path.display(), "wrote KPOINTS");
        }

        for (name, contents) in &self.files {
            let path = dir.join(name);
            fs::write(&path, contents).map_err(|e| Error::io(&path, e))?;
            tracing::debug!(entry = %entry, path = %path.display(), "wrote auxiliary file");
        }

        Ok(())
    }
}

fn write_kpoints_file(path: &Path, kpoints: &Kpoints) -> Result<(), io::Error> {
    let mut writer = BufWriter::new(File::create(path)?);
    io::write_kpoints(&mut writer, kpoints)?;
    writer.flush()?;
    Ok(())
}

fn check_file_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("auxiliary file name is empty".to_string());
    }
    if name == "." || name == ".." || name.contains(['/', '\\', '\0']) {
        return Err(format!("auxiliary file name '{}' is not a plain file name", name));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::element::Element;
    use crate::model::variables::IncarValue;

    fn record() -> EntryRecord {
        let mut structure = Structure::new([[5.43, 0.0, 0.0], [0.0, 5.43, 0.0], [0.0, 0.0, 5.43]]);
        structure.push(Element::Si, [0.0, 0.0, 0.0]);
        let mut vars = VariableMap::new();
        vars.insert("ENCUT".into(), IncarValue::Real(300.0));
        EntryRecord::new(structure, vars)
    }

    #[test]
    fn entry_id_from_string_and_integer() {
        assert_eq!(EntryId::from("abc").as_str(), "abc");
        assert_eq!(EntryId::from(42u64).to_string(), "42");
        assert_eq!(EntryId::from(String::from("x")), EntryId::new("x"));
    }

    #[test]
    fn writes_kpoints_and_verbatim_files() {
        let dir = tempfile::tempdir().unwrap();
        let rec = record()
            .with_kpoints(Kpoints::gamma([2, 2, 2]))
            .with_file("POTCAR.symbols", "Si\n");
        let id = EntryId::from("si");

        rec.write_input_files(&id, dir.path()).expect("write files");

        let kpoints = fs::read_to_string(dir.path().join("KPOINTS")).unwrap();
        assert!(kpoints.starts_with("Automatic mesh\n"));
        assert_eq!(
            fs::read_to_string(dir.path().join("POTCAR.symbols")).unwrap(),
            "Si\n"
        );
        assert_eq!(rec.auxiliary_file_names(), vec!["KPOINTS", "POTCAR.symbols"]);
    }

    #[test]
    fn rejects_path_traversal_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let rec = record()
            .with_kpoints(Kpoints::gamma([1, 1, 1]))
            .with_file("../evil", "x");
        let err = rec
            .write_input_files(&EntryId::from("si"), dir.path())
            .unwrap_err();

        assert!(matches!(err, Error::InvalidEntry { .. }));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn rejects_reserved_and_duplicate_names() {
        let id = EntryId::from("si");
        assert!(record().with_file("POSCAR", "x").validate(&id).is_err());
        assert!(record().with_file("INCAR", "x").validate(&id).is_err());
        assert!(
            record()
                .with_kpoints(Kpoints::gamma([1, 1, 1]))
                .with_file("KPOINTS", "x")
                .validate(&id)
                .is_err()
        );
        assert!(record().with_file("KPOINTS", "x").validate(&id).is_ok());
    }

    #[test]
    fn record_toml_roundtrip() {
        let rec = record()
            .with_kpoints(Kpoints::monkhorst_pack([3, 3, 3]))
            .with_file("README", "notes");
        let text = toml::to_string_pretty(&rec).unwrap();
        let back: EntryRecord = toml::from_str(&text).unwrap();
        assert_eq!(back, rec);
    }
}
