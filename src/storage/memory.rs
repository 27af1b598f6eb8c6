//! In-process record store
//!
//! Keeps records in a map keyed by pk. Nothing survives the process; used for
//! tests and for running the services without a database file.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{BookkeeperError, BookkeeperResult};
use crate::models::Pk;

use super::record::{ensure_assigned, ensure_unassigned, Filter, Record, Repository};

struct MemoryState<R> {
    records: BTreeMap<Pk, R>,
    last_pk: Pk,
}

/// Repository backed by an in-memory map
pub struct MemoryRepository<R: Record> {
    state: RwLock<MemoryState<R>>,
}

impl<R: Record> MemoryRepository<R> {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState {
                records: BTreeMap::new(),
                last_pk: 0,
            }),
        }
    }

    /// Number of stored records
    pub fn len(&self) -> BookkeeperResult<usize> {
        Ok(self.read()?.records.len())
    }

    pub fn is_empty(&self) -> BookkeeperResult<bool> {
        Ok(self.read()?.records.is_empty())
    }

    fn read(&self) -> BookkeeperResult<RwLockReadGuard<'_, MemoryState<R>>> {
        self.state
            .read()
            .map_err(|e| BookkeeperError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> BookkeeperResult<RwLockWriteGuard<'_, MemoryState<R>>> {
        self.state
            .write()
            .map_err(|e| BookkeeperError::Storage(format!("Failed to acquire write lock: {}", e)))
    }
}

impl<R: Record> Default for MemoryRepository<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> Repository<R> for MemoryRepository<R> {
    fn add(&self, record: &mut R) -> BookkeeperResult<Pk> {
        ensure_unassigned(record)?;

        let mut state = self.write()?;
        // Ids only grow, so a deleted id is never handed out again
        state.last_pk += 1;
        let pk = state.last_pk;
        record.set_pk(pk);
        state.records.insert(pk, record.clone());
        Ok(pk)
    }

    fn get(&self, pk: Pk) -> BookkeeperResult<Option<R>> {
        Ok(self.read()?.records.get(&pk).cloned())
    }

    fn list(&self, filter: Option<&Filter>) -> BookkeeperResult<Vec<R>> {
        if let Some(filter) = filter {
            filter.validate::<R>()?;
        }

        let state = self.read()?;
        Ok(state
            .records
            .values()
            .filter(|record| filter.map_or(true, |f| f.matches(*record)))
            .cloned()
            .collect())
    }

    fn update(&self, record: &R) -> BookkeeperResult<()> {
        ensure_assigned(record)?;

        let mut state = self.write()?;
        match state.records.get_mut(&record.pk()) {
            Some(stored) => {
                *stored = record.clone();
                Ok(())
            }
            None => Err(BookkeeperError::record_not_found(R::TABLE, record.pk())),
        }
    }

    fn delete(&self, pk: Pk) -> BookkeeperResult<()> {
        self.write()?
            .records
            .remove(&pk)
            .map(|_| ())
            .ok_or_else(|| BookkeeperError::record_not_found(R::TABLE, pk))
    }
}
