use std::collections::HashMap;
use std::path::Path;

use super::{EntryId, EntryRecord, Error, InputQueue};
use crate::model::structure::Structure;
use crate::model::variables::VariableMap;

#[derive(Debug, Clone, Default)]
pub struct MemoryQueue {
    entries: HashMap<EntryId, EntryRecord>,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: impl Into<EntryId>, record: EntryRecord) -> Option<EntryRecord> {
        self.entries.insert(entry.into(), record)
    }

    pub fn remove(&mut self, entry: &EntryId) -> Option<EntryRecord> {
        self.entries.remove(entry)
    }

    pub fn get(&self, entry: &EntryId) -> Result<&EntryRecord, Error> {
        self.entries
            .get(entry)
            .ok_or_else(|| Error::EntryNotFound(entry.clone()))
    }

    /// Identifiers in sorted order.
    pub fn entries(&self) -> Vec<EntryId> {
        let mut ids: Vec<_> = self.entries.keys().cloned().collect();
        ids.sort();
        ids
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl InputQueue for MemoryQueue {
    fn input_structure(&self, entry: &EntryId) -> Result<Structure, Error> {
        Ok(self.get(entry)?.structure.clone())
    }

    fn input_variables(&self, entry: &EntryId) -> Result<VariableMap, Error> {
        Ok(self.get(entry)?.variables.clone())
    }

    fn write_input_files(&self, entry: &EntryId, dir: &Path) -> Result<(), Error> {
        self.get(entry)?.write_input_files(entry, dir)
    }
}
