use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{EntryId, EntryRecord, Error, InputQueue};
use crate::io::{self, PoscarConfig};
use crate::model::kpoints::Kpoints;
use crate::model::structure::Structure;
use crate::model::variables::{InputVariables, VariableMap};

const ENTRY_EXTENSION: &str = "toml";

/// A queue stored as one `<entry>.toml` file per entry under a root directory.
#[derive(Debug, Clone)]
pub struct DirectoryQueue {
    root: PathBuf,
}

impl DirectoryQueue {
    /// Opens an existing queue directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, Error> {
        let root = root.into();
        if !root.is_dir() {
            return Err(Error::InvalidRoot(root));
        }
        Ok(Self { root })
    }

    /// Opens the queue, creating the root directory (and parents) if needed.
    pub fn create(root: impl Into<PathBuf>) -> Result<Self, Error> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| Error::io(&root, e))?;
        Self::open(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entry_path(&self, entry: &EntryId) -> Result<PathBuf, Error> {
        if !is_plain_stem(entry.as_str()) {
            return Err(Error::invalid_entry(
                entry,
                "identifier must be a plain, non-hidden file stem",
            ));
        }
        Ok(self.root.join(format!("{}.{}", entry, ENTRY_EXTENSION)))
    }

    pub fn contains(&self, entry: &EntryId) -> bool {
        self.entry_path(entry).is_ok_and(|p| p.is_file())
    }

    /// Identifiers of all stored entries, sorted.
    pub fn entries(&self) -> Result<Vec<EntryId>, Error> {
        let dir = fs::read_dir(&self.root).map_err(|e| Error::io(&self.root, e))?;

        let mut ids = Vec::new();
        for item in dir {
            let item = item.map_err(|e| Error::io(&self.root, e))?;
            let path = item.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(ENTRY_EXTENSION)
            {
                continue;
            }
            match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) if is_plain_stem(stem) => ids.push(EntryId::from(stem)),
                _ => tracing::debug!(path = %path.display(), "skipping unaddressable entry file"),
            }
        }
        ids.sort();
        Ok(ids)
    }

    pub fn load(&self, entry: &EntryId) -> Result<EntryRecord, Error> {
        let path = self.entry_path(entry)?;
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::EntryNotFound(entry.clone()));
            }
            Err(e) => return Err(Error::io(&path, e)),
        };
        tracing::trace!(entry = %entry, path = %path.display(), "loaded entry");
        toml::from_str(&text).map_err(|source| Error::Parse { path, source })
    }

    /// Stores `record`, replacing any existing entry with the same id.
    pub fn insert(&self, entry: &EntryId, record: &EntryRecord) -> Result<(), Error> {
        let path = self.entry_path(entry)?;
        record.validate(entry)?;
        let text = toml::to_string_pretty(record).map_err(|source| Error::Serialize {
            entry: entry.clone(),
            source,
        })?;
        fs::write(&path, text).map_err(|e| Error::io(&path, e))?;
        tracing::debug!(entry = %entry, path = %path.display(), "stored entry");
        Ok(())
    }

    pub fn remove(&self, entry: &EntryId) -> Result<(), Error> {
        let path = self.entry_path(entry)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::EntryNotFound(entry.clone())),
            Err(e) => Err(Error::io(&path, e)),
        }
    }

    /// Creates an entry from an existing POSCAR and INCAR pair.
    pub fn add_from_files(
        &self,
        entry: &EntryId,
        poscar: &Path,
        incar: &Path,
        kpoints: Option<Kpoints>,
    ) -> Result<EntryRecord, Error> {
        let structure = io::read_poscar_file(poscar).map_err(|source| Error::Import {
            path: poscar.to_path_buf(),
            source,
        })?;
        let variables = InputVariables::read(incar).map_err(|source| Error::Import {
            path: incar.to_path_buf(),
            source,
        })?;

        // Reject inputs the stager could never write back out.
        io::write_poscar(std::io::sink(), &structure, &PoscarConfig::default()).map_err(
            |source| Error::Import {
                path: poscar.to_path_buf(),
                source,
            },
        )?;
        io::write_incar(std::io::sink(), &variables).map_err(|source| Error::Import {
            path: incar.to_path_buf(),
            source,
        })?;

        let mut record = EntryRecord::new(structure, variables.variables);
        record.kpoints = kpoints;
        self.insert(entry, &record)?;
        Ok(record)
    }
}

fn is_plain_stem(id: &str) -> bool {
    !id.is_empty() && !id.starts_with('.') && !id.contains(['/', '\\', '\0'])
}

impl InputQueue for DirectoryQueue {
    fn input_structure(&self, entry: &EntryId) -> Result<Structure, Error> {
        Ok(self.load(entry)?.structure)
    }

    fn input_variables(&self, entry: &EntryId) -> Result<VariableMap, Error> {
        Ok(self.load(entry)?.variables)
    }

    fn write_input_files(&self, entry: &EntryId, dir: &Path) -> Result<(), Error> {
        self.load(entry)?.write_input_files(entry, dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::element::Element;
    use crate::model::variables::IncarValue;

    fn sample() -> EntryRecord {
        let mut s = Structure::new([[3.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 3.0]]);
        s.push(Element::Fe, [0.0, 0.0, 0.0]);
        s.push(Element::O, [1.5, 1.5, 1.5]);
        let mut vars = VariableMap::new();
        vars.insert("ENCUT".into(), IncarValue::Real(450.0));
        vars.insert("LORBIT".into(), IncarValue::Int(11));
        EntryRecord::new(s, vars).with_kpoints(Kpoints::gamma([4, 4, 4]))
    }

    #[test]
    fn open_requires_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            DirectoryQueue::open(&missing),
            Err(Error::InvalidRoot(_))
        ));
        assert!(DirectoryQueue::create(&missing).is_ok());
        assert!(missing.is_dir());
    }

    #[test]
    fn insert_load_and_list() {
        let dir = tempfile::tempdir().unwrap();
        let q = DirectoryQueue::open(dir.path()).unwrap();
        let b = EntryId::from("b-feo");
        let a = EntryId::from("a-feo");

        q.insert(&b, &sample()).unwrap();
        q.insert(&a, &sample()).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        fs::write(dir.path().join(".hidden.toml"), "ignored").unwrap();

        assert_eq!(q.entries().unwrap(), vec![a.clone(), b.clone()]);
        assert!(q.contains(&a));
        assert_eq!(q.load(&a).unwrap(), sample());
        assert_eq!(q.input_structure(&b).unwrap().formula(), "FeO");
        assert_eq!(q.input_variables(&b).unwrap()["LORBIT"], IncarValue::Int(11));

        q.remove(&a).unwrap();
        assert!(q.remove(&a).unwrap_err().is_not_found());
    }

    #[test]
    fn missing_entry_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let q = DirectoryQueue::open(dir.path()).unwrap();
        let err = q.input_structure(&EntryId::from("ghost")).unwrap_err();
        assert!(matches!(err, Error::EntryNotFound(id) if id.as_str() == "ghost"));
    }

    #[test]
    fn malformed_entry_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.toml"), "structure = 3").unwrap();
        let q = DirectoryQueue::open(dir.path()).unwrap();
        let err = q.load(&EntryId::from("bad")).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn rejects_path_like_identifiers() {
        let dir = tempfile::tempdir().unwrap();
        let q = DirectoryQueue::open(dir.path()).unwrap();
        for id in ["../x", "a/b", ".hidden", ""] {
            let err = q.entry_path(&EntryId::from(id)).unwrap_err();
            assert!(matches!(err, Error::InvalidEntry { .. }), "id {id:?}");
        }
    }

    #[test]
    fn writes_auxiliary_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let q = DirectoryQueue::open(dir.path()).unwrap();
        let id = EntryId::from("feo");
        q.insert(&id, &sample().with_file("POTCAR.symbols", "Fe_pv O\n"))
            .unwrap();

        q.write_input_files(&id, out.path()).unwrap();
        assert!(out.path().join("KPOINTS").is_file());
        assert_eq!(
            fs::read_to_string(out.path().join("POTCAR.symbols")).unwrap(),
            "Fe_pv O\n"
        );
    }

    #[test]
    fn add_from_files_imports_poscar_and_incar() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = tempfile::tempdir().unwrap();
        let poscar = inputs.path().join("POSCAR");
        let incar = inputs.path().join("INCAR");
        fs::write(
            &poscar,
            "NaCl\n1.0\n5.6 0 0\n0 5.6 0\n0 0 5.6\nNa Cl\n1 1\nDirect\n0 0 0\n0.5 0.5 0.5\n",
        )
        .unwrap();
        fs::write(&incar, "ENCUT = 500\nISMEAR = -5\n").unwrap();

        let q = DirectoryQueue::open(dir.path()).unwrap();
        let id = EntryId::from("nacl");
        let record = q
            .add_from_files(&id, &poscar, &incar, Some(Kpoints::gamma([6, 6, 6])))
            .unwrap();

        assert_eq!(record.structure.formula(), "NaCl");
        assert_eq!(record.variables["ISMEAR"], IncarValue::Int(-5));
        assert_eq!(q.load(&id).unwrap(), record);
    }

    #[test]
    fn add_from_files_reports_bad_poscar() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = tempfile::tempdir().unwrap();
        let poscar = inputs.path().join("POSCAR");
        let incar = inputs.path().join("INCAR");
        fs::write(&poscar, "broken\n").unwrap();
        fs::write(&incar, "ENCUT = 500\n").unwrap();

        let q = DirectoryQueue::open(dir.path()).unwrap();
        let err = q
            .add_from_files(&EntryId::from("x"), &poscar, &incar, None)
            .unwrap_err();
        assert!(matches!(err, Error::Import { ref path, .. } if path == &poscar));
        assert!(q.entries().unwrap().is_empty());
    }

    #[test]
    fn listed_entries_are_all_loadable() {
        let dir = tempfile::tempdir().unwrap();
        let q = DirectoryQueue::open(dir.path()).unwrap();
        q.insert(&EntryId::from("feo"), &sample()).unwrap();
        fs::copy(dir.path().join("feo.toml"), dir.path().join(".feo.toml")).unwrap();

        let ids = q.entries().unwrap();
        assert_eq!(ids, vec![EntryId::from("feo")]);
        for id in &ids {
            q.load(id).unwrap();
        }
    }

    #[test]
    fn add_from_files_rejects_unwritable_incar() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = tempfile::tempdir().unwrap();
        let poscar = inputs.path().join("POSCAR");
        let incar = inputs.path().join("INCAR");
        fs::write(
            &poscar,
            "NaCl\n1.0\n5.6 0 0\n0 5.6 0\n0 0 5.6\nNa Cl\n1 1\nDirect\n0 0 0\n0.5 0.5 0.5\n",
        )
        .unwrap();
        let q = DirectoryQueue::open(dir.path()).unwrap();

        for text in ["MAGMOM = 0*1\n", "MAGMOM = 4000000000*1\n"] {
            fs::write(&incar, text).unwrap();
            let err = q
                .add_from_files(&EntryId::from("nacl"), &poscar, &incar, None)
                .unwrap_err();
            assert!(matches!(err, Error::Import { ref path, .. } if path == &incar), "{text:?}");
        }
        assert!(q.entries().unwrap().is_empty());
    }
}
