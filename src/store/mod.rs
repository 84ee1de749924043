//! In-memory record stores
//!
//! Each collection is an ordered `Vec` behind a single mutex. Critical sections
//! are plain scans or mutations and never span an `.await`.

mod category;
mod product;

pub use category::CategoryStore;
pub use product::ProductStore;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// A record addressed by a store-assigned integer identifier
pub trait Record: Clone {
    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);
}

/// Ordered collection of records guarded by a mutex
#[derive(Debug, Default)]
pub struct MemoryStore<T> {
    items: Mutex<Vec<T>>,
}

impl<T: Record> MemoryStore<T> {
    pub const fn new(items: Vec<T>) -> Self {
        Self {
            items: Mutex::new(items),
        }
    }

    /// Records are plain values and never left half-written, so a poisoned
    /// lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of all records in insertion order
    pub fn list(&self) -> Vec<T> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Append a record, assigning `id = len + 1`.
    ///
    /// The id is derived from the current length, so after deletions it may
    /// repeat an id that is still held by a surviving record.
    pub fn create(&self, mut item: T) -> T {
        let mut items = self.lock();
        item.set_id(next_id(items.len()));
        items.push(item.clone());
        item
    }

    /// First record with the given id
    pub fn get(&self, id: i64) -> Option<T> {
        self.lock().iter().find(|item| item.id() == id).cloned()
    }

    /// Replace the first record with the given id, keeping that id
    pub fn update(&self, id: i64, mut item: T) -> Option<T> {
        let mut items = self.lock();
        let slot = items.iter_mut().find(|existing| existing.id() == id)?;
        item.set_id(id);
        *slot = item.clone();
        Some(item)
    }

    /// Remove the first record with the given id; later records shift left
    pub fn delete(&self, id: i64) -> Option<T> {
        let mut items = self.lock();
        let index = items.iter().position(|item| item.id() == id)?;
        Some(items.remove(index))
    }
}

fn next_id(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX).saturating_add(1)
}
