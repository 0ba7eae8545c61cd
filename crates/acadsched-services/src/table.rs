//! In-memory tables backing the service implementations.

use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::error::ServiceError;

/// Lock-protected ordered map of records.
#[derive(Debug)]
pub(crate) struct Table<K, T> {
    rows: RwLock<BTreeMap<K, T>>,
}

impl<K: Ord + Clone, T: Clone> Table<K, T> {
    pub(crate) fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
        }
    }

    /// Insert or replace the row at `key`, returning the stored row.
    pub(crate) fn put(&self, key: K, row: T) -> Result<T, ServiceError> {
        let mut rows = self.rows.write().map_err(lock_error)?;
        rows.insert(key, row.clone());
        Ok(row)
    }

    /// Insert `row` unless `key` is taken. Returns `None` when it is.
    pub(crate) fn insert_new(&self, key: K, row: T) -> Result<Option<T>, ServiceError> {
        let mut rows = self.rows.write().map_err(lock_error)?;
        if rows.contains_key(&key) {
            return Ok(None);
        }
        rows.insert(key, row.clone());
        Ok(Some(row))
    }

    /// Store a row under `key` when that key exists, otherwise under a fresh
    /// key, deciding and writing under one lock.
    pub(crate) fn upsert<F, G>(&self, key: Option<K>, fresh: F, build: G) -> Result<T, ServiceError>
    where
        F: FnOnce() -> K,
        G: FnOnce(K) -> T,
    {
        let mut rows = self.rows.write().map_err(lock_error)?;
        let key = match key {
            Some(key) if rows.contains_key(&key) => key,
            _ => fresh(),
        };
        let row = build(key.clone());
        rows.insert(key, row.clone());
        Ok(row)
    }

    pub(crate) fn get(&self, key: &K) -> Result<Option<T>, ServiceError> {
        let rows = self.rows.read().map_err(lock_error)?;
        Ok(rows.get(key).cloned())
    }

    /// All rows in key order.
    pub(crate) fn all(&self) -> Result<Vec<T>, ServiceError> {
        let rows = self.rows.read().map_err(lock_error)?;
        Ok(rows.values().cloned().collect())
    }

    /// Apply `change` to the row at `key`, returning the updated row.
    pub(crate) fn modify<F>(&self, key: &K, change: F) -> Result<Option<T>, ServiceError>
    where
        F: FnOnce(&mut T),
    {
        let mut rows = self.rows.write().map_err(lock_error)?;
        Ok(rows.get_mut(key).map(|row| {
            change(row);
            row.clone()
        }))
    }

    pub(crate) fn remove(&self, key: &K) -> Result<Option<T>, ServiceError> {
        let mut rows = self.rows.write().map_err(lock_error)?;
        Ok(rows.remove(key))
    }
}

/// Auto-increment id source starting at 1.
#[derive(Debug)]
pub(crate) struct IdSequence(AtomicI64);

impl IdSequence {
    pub(crate) fn new() -> Self {
        Self(AtomicI64::new(1))
    }

    pub(crate) fn next(&self) -> i64 {
        self.0.fetch_add(1, Ordering::SeqCst)
    }
}

fn lock_error<E: std::fmt::Display>(e: E) -> ServiceError {
    ServiceError::Storage(format!("Failed to acquire lock: {}", e))
}
