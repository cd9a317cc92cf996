//! Tables and sets.

use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};

use super::{ContainerError, HashKey, Value};
use crate::types::Type;

/// One stored entry: the original index values and, for tables, the yield.
#[derive(Clone, Debug)]
pub struct TableEntry {
    pub index: Vec<Value>,
    pub value: Option<Value>,
}

struct TableInner {
    ty: Type,
    entries: RwLock<FxHashMap<HashKey, TableEntry>>,
}

/// Shared table or set. Cloning the handle aliases the storage.
///
/// Lock guards never escape a method; operations that read another table
/// snapshot it first so `s |= s` cannot deadlock.
#[derive(Clone)]
pub struct TableVal(Arc<TableInner>);

impl TableVal {
    pub fn new(ty: Type) -> Self {
        TableVal(Arc::new(TableInner {
            ty,
            entries: RwLock::new(FxHashMap::default()),
        }))
    }

    pub fn ty(&self) -> &Type {
        &self.0.ty
    }

    pub fn is_set(&self) -> bool {
        self.0.ty.is_set()
    }

    pub fn len(&self) -> usize {
        self.0.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.entries.read().is_empty()
    }

    pub fn ptr_eq(&self, other: &TableVal) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Yield stored under `index`, if any.
    pub fn lookup(&self, index: &[Value]) -> Result<Option<Value>, ContainerError> {
        let key = HashKey::from_values(index)?;
        Ok(self
            .0
            .entries
            .read()
            .get(&key)
            .and_then(|e| e.value.clone()))
    }

    pub fn contains(&self, index: &[Value]) -> Result<bool, ContainerError> {
        let key = HashKey::from_values(index)?;
        Ok(self.0.entries.read().contains_key(&key))
    }

    /// Insert or replace. Sets take `None` as the yield.
    pub fn assign(&self, index: Vec<Value>, value: Option<Value>) -> Result<(), ContainerError> {
        if value.is_none() && !self.is_set() {
            return Err(ContainerError::MissingYield);
        }
        let key = HashKey::from_values(&index)?;
        self.0
            .entries
            .write()
            .insert(key, TableEntry { index, value });
        Ok(())
    }

    /// Remove `index`, returning whether it was present.
    pub fn remove(&self, index: &[Value]) -> Result<bool, ContainerError> {
        let key = HashKey::from_values(index)?;
        Ok(self.0.entries.write().remove(&key).is_some())
    }

    pub fn keys(&self) -> Vec<HashKey> {
        self.0.entries.read().keys().cloned().collect()
    }

    /// Entries ordered by key, for deterministic iteration and display.
    pub fn entries(&self) -> Vec<TableEntry> {
        let guard = self.0.entries.read();
        let mut pairs: Vec<_> = guard.iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(b.0));
        pairs.into_iter().map(|(_, e)| e.clone()).collect()
    }

    fn snapshot(&self) -> Vec<(HashKey, TableEntry)> {
        self.0
            .entries
            .read()
            .iter()
            .map(|(k, e)| (k.clone(), e.clone()))
            .collect()
    }

    pub fn deep_clone(&self) -> TableVal {
        let entries = self
            .snapshot()
            .into_iter()
            .map(|(k, e)| {
                let entry = TableEntry {
                    index: e.index.iter().map(Value::deep_clone).collect(),
                    value: e.value.as_ref().map(Value::deep_clone),
                };
                (k, entry)
            })
            .collect();
        TableVal(Arc::new(TableInner {
            ty: self.0.ty.clone(),
            entries: RwLock::new(entries),
        }))
    }

    /// New table with the entries of `self` whose keys are also in `other`.
    pub fn intersection(&self, other: &TableVal) -> TableVal {
        let theirs: FxHashSet<HashKey> = other.keys().into_iter().collect();
        let result = TableVal::new(self.0.ty.clone());
        {
            let mut out = result.0.entries.write();
            for (k, e) in self.snapshot() {
                if theirs.contains(&k) {
                    out.insert(k, e);
                }
            }
        }
        result
    }

    /// Add every entry of `other`, replacing existing keys.
    pub fn add_all(&self, other: &TableVal) {
        let theirs = other.snapshot();
        let mut mine = self.0.entries.write();
        for (k, e) in theirs {
            mine.insert(k, e);
        }
    }

    /// Remove every key present in `other`.
    pub fn remove_all(&self, other: &TableVal) {
        let theirs = other.snapshot();
        let mut mine = self.0.entries.write();
        for (k, _) in theirs {
            mine.remove(&k);
        }
    }

    /// Every key of `self` is a key of `other`.
    pub fn is_subset_of(&self, other: &TableVal) -> bool {
        let mine = self.keys();
        let theirs = other.0.entries.read();
        mine.iter().all(|k| theirs.contains_key(k))
    }

    /// Same keys, and for tables equal yields.
    pub fn equal_to(&self, other: &TableVal) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let mine = self.snapshot();
        let theirs = other.0.entries.read();
        mine.len() == theirs.len()
            && mine
                .iter()
                .all(|(k, e)| theirs.get(k).is_some_and(|t| t.value == e.value))
    }

    /// For subnet-indexed tables: some index subnet contains `addr`.
    pub fn any_subnet_contains(&self, addr: IpAddr) -> bool {
        self.0.entries.read().values().any(|e| {
            matches!(e.index.as_slice(), [Value::Subnet(s)] if s.contains(addr))
        })
    }
}

impl fmt::Display for TableVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, entry) in self.entries().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            let index = if let [single] = entry.index.as_slice() {
                single.to_string()
            } else {
                let parts: Vec<_> = entry.index.iter().map(ToString::to_string).collect();
                format!("[{}]", parts.join(", "))
            };
            match &entry.value {
                Some(v) => write!(f, "[{index}] = {v}")?,
                None => write!(f, "{index}")?,
            }
        }
        write!(f, "}}")
    }
}
