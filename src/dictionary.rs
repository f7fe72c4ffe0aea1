//! Dictionary: open-hashing map from [`Key`] to values.

use crate::error::{Error, Result};
use crate::key::Key;
use crate::reentrancy::DebugReentrancy;
use core::hash::BuildHasher;
use core::mem;
use hashbrown::hash_table::Entry as TableEntry;
use hashbrown::HashTable;
use slotmap::{DefaultKey, SlotMap};
use std::collections::hash_map::RandomState;

#[derive(Debug)]
struct Entry<V> {
    key: Key,
    value: V,
    hash: u32,
    hint: u32,
    // Bucket placement derived from `hash`; reused on growth so rehashing
    // never calls back into object keys.
    placement: u64,
}

/// Digests of a key being looked up or inserted.
#[derive(Copy, Clone, Debug)]
struct Probe {
    hash: u32,
    hint: u32,
    placement: u64,
}

/// Map from script keys to values.
///
/// Key identity follows [`Key::equal`]; the 32-bit [`Key::hash`] selects
/// the bucket. `S` only spreads that hash over the table and never affects
/// which keys are equal.
pub struct Dictionary<V, S = RandomState> {
    hasher: S,
    index: HashTable<DefaultKey>,
    slots: SlotMap<DefaultKey, Entry<V>>,
    reentrancy: DebugReentrancy,
}

impl<V> Dictionary<V> {
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, Default::default())
    }
}

impl<V> Default for Dictionary<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the entries of a `Dictionary`.
pub struct Iter<'a, V> {
    it: slotmap::basic::Iter<'a, DefaultKey, Entry<V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a Key, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, e)| (&e.key, &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

/// Iterator over the entries of a `Dictionary` with mutable values.
pub struct IterMut<'a, V> {
    it: slotmap::basic::IterMut<'a, DefaultKey, Entry<V>>,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = (&'a Key, &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, e)| (&e.key, &mut e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

/// Owning iterator over the entries of a `Dictionary`.
pub struct IntoIter<V> {
    it: slotmap::basic::IntoIter<DefaultKey, Entry<V>>,
}

impl<V> Iterator for IntoIter<V> {
    type Item = (Key, V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, e)| (e.key, e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

// The stored hash must match before `Key::equal` runs. Hints are only
// comparable between keys of the same kind: an object may identify with a
// string whose hint is computed differently.
fn entry_matches<V>(entry: &Entry<V>, key: &Key, probe: &Probe) -> Result<bool> {
    if entry.hash != probe.hash {
        return Ok(false);
    }
    if entry.key.kind() == key.kind() && entry.hint != probe.hint {
        return Ok(false);
    }
    key.equal(&entry.key)
}

impl<V, S> Dictionary<V, S>
where
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(0, hasher)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            hasher,
            index: HashTable::with_capacity(capacity),
            slots: SlotMap::with_capacity_and_key(capacity),
            reentrancy: DebugReentrancy::new(),
        }
    }

    fn probe(&self, key: &Key) -> Result<Probe> {
        let hash = key.hash()?;
        let hint = key.hint()?;
        Ok(Probe {
            hash,
            hint,
            placement: self.hasher.hash_one(hash),
        })
    }

    // Stops at the first failing comparison and reports it; nothing is
    // modified on any path.
    fn locate(&self, key: &Key) -> Result<Option<DefaultKey>> {
        let probe = self.probe(key)?;
        let slots = &self.slots;
        let mut failure = None;
        let found = self
            .index
            .find(probe.placement, |&k| {
                match slots.get(k).map(|e| entry_matches(e, key, &probe)) {
                    Some(Ok(m)) => m,
                    Some(Err(e)) => {
                        failure = Some(e);
                        true
                    }
                    None => false,
                }
            })
            .copied();
        match failure {
            Some(e) => Err(e),
            None => Ok(found),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.index.capacity()
    }

    pub fn reserve(&mut self, additional: usize) {
        let _g = self.reentrancy.write();
        let slots = &self.slots;
        self.index.reserve(additional, |&k| {
            slots.get(k).map(|e| e.placement).unwrap_or(0)
        });
        self.slots.reserve(additional);
    }

    /// Insert `value` under `key`, or replace the value of an equal key.
    ///
    /// Returns the replaced value. The originally stored key is kept on
    /// replacement. If an object key's capability fails, the error is
    /// returned and the dictionary is unchanged.
    pub fn set(&mut self, key: Key, value: V) -> Result<Option<V>> {
        let _g = self.reentrancy.write();
        let probe = self.probe(&key)?;
        let before = self.index.capacity();
        let slots = &self.slots;
        let mut failure = None;
        let entry = self.index.entry(
            probe.placement,
            |&k| match slots.get(k).map(|e| entry_matches(e, &key, &probe)) {
                Some(Ok(m)) => m,
                Some(Err(e)) => {
                    failure = Some(e);
                    true
                }
                None => false,
            },
            |&k| slots.get(k).map(|e| e.placement).unwrap_or(0),
        );
        if let Some(e) = failure {
            return Err(e);
        }
        let replaced = match entry {
            TableEntry::Occupied(o) => {
                let k = *o.get();
                match self.slots.get_mut(k) {
                    Some(e) => Some(mem::replace(&mut e.value, value)),
                    None => None,
                }
            }
            TableEntry::Vacant(v) => {
                let k = self.slots.insert(Entry {
                    key,
                    value,
                    hash: probe.hash,
                    hint: probe.hint,
                    placement: probe.placement,
                });
                let _ = v.insert(k);
                None
            }
        };
        let after = self.index.capacity();
        if after != before {
            log::trace!(
                "dictionary grew from {} to {} buckets ({} entries)",
                before,
                after,
                self.slots.len()
            );
        }
        Ok(replaced)
    }

    /// Value stored under `key`, or `Error::KeyNotFound`.
    pub fn get(&self, key: &Key) -> Result<&V> {
        self.lookup(key)?
            .ok_or_else(|| Error::KeyNotFound(key.clone()))
    }

    pub fn get_mut(&mut self, key: &Key) -> Result<&mut V> {
        let found = {
            let _g = self.reentrancy.read();
            self.locate(key)?
        };
        found
            .and_then(|k| self.slots.get_mut(k))
            .map(|e| &mut e.value)
            .ok_or_else(|| Error::KeyNotFound(key.clone()))
    }

    /// Like [`get`](Self::get) but reports a miss as `Ok(None)`.
    pub fn lookup(&self, key: &Key) -> Result<Option<&V>> {
        let _g = self.reentrancy.read();
        Ok(self
            .locate(key)?
            .and_then(|k| self.slots.get(k))
            .map(|e| &e.value))
    }

    pub fn has(&self, key: &Key) -> Result<bool> {
        let _g = self.reentrancy.read();
        Ok(self.locate(key)?.is_some())
    }

    /// Remove the entry for `key`, returning its value. Absent keys are a
    /// no-op returning `Ok(None)`.
    pub fn remove(&mut self, key: &Key) -> Result<Option<V>> {
        let removed = {
            let _g = self.reentrancy.write();
            let Some(k) = self.locate(key)? else {
                return Ok(None);
            };
            let Some(entry) = self.slots.remove(k) else {
                return Ok(None);
            };
            if let Ok(occupied) = self.index.find_entry(entry.placement, |&kk| kk == k) {
                let _ = occupied.remove();
            }
            entry
        };
        // The structure is consistent again; dropping the key may reenter.
        Ok(Some(removed.value))
    }

    /// Remove every entry. Keys and values are dropped after the dictionary
    /// is already empty.
    pub fn clear(&mut self) {
        let slots = {
            let _g = self.reentrancy.write();
            self.index.clear();
            mem::replace(&mut self.slots, SlotMap::with_key())
        };
        log::trace!("dictionary cleared ({} entries)", slots.len());
        drop(slots);
    }

    /// Iterate over `(key, value)` pairs in unspecified order. Each call
    /// starts a fresh pass.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            it: self.slots.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            it: self.slots.iter_mut(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }
}

impl<'a, V, S> IntoIterator for &'a Dictionary<V, S>
where
    S: BuildHasher,
{
    type Item = (&'a Key, &'a V);
    type IntoIter = Iter<'a, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, V, S> IntoIterator for &'a mut Dictionary<V, S>
where
    S: BuildHasher,
{
    type Item = (&'a Key, &'a mut V);
    type IntoIter = IterMut<'a, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<V, S> IntoIterator for Dictionary<V, S> {
    type Item = (Key, V);
    type IntoIter = IntoIter<V>;
    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            it: self.slots.into_iter(),
        }
    }
}

impl<V: core::fmt::Debug, S> core::fmt::Debug for Dictionary<V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map()
            .entries(self.slots.values().map(|e| (&e.key, &e.value)))
            .finish()
    }
}
