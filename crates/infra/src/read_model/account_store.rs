use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::{PoisonError, RwLock};

use procura_core::{AccountId, DomainError, DomainResult};

/// Account-isolated key/value store.
///
/// `list` returns values in first-insertion order, so callers that rely on a
/// stable "original relative order" (e.g. offer ranking ties) see the same
/// order on every read.
pub trait AccountStore<K, V>: Send + Sync {
    fn get(&self, account_id: AccountId, key: &K) -> Option<V>;
    fn upsert(&self, account_id: AccountId, key: K, value: V);
    fn remove(&self, account_id: AccountId, key: &K) -> Option<V>;
    fn list(&self, account_id: AccountId) -> Vec<V>;
    /// Account that holds `key`, if any account does.
    fn owner(&self, key: &K) -> Option<AccountId>;
    /// Clear all records for an account.
    fn clear_account(&self, account_id: AccountId);
}

impl<K, V, S> AccountStore<K, V> for Arc<S>
where
    S: AccountStore<K, V> + ?Sized,
{
    fn get(&self, account_id: AccountId, key: &K) -> Option<V> {
        (**self).get(account_id, key)
    }

    fn upsert(&self, account_id: AccountId, key: K, value: V) {
        (**self).upsert(account_id, key, value)
    }

    fn remove(&self, account_id: AccountId, key: &K) -> Option<V> {
        (**self).remove(account_id, key)
    }

    fn list(&self, account_id: AccountId) -> Vec<V> {
        (**self).list(account_id)
    }

    fn owner(&self, key: &K) -> Option<AccountId> {
        (**self).owner(key)
    }

    fn clear_account(&self, account_id: AccountId) {
        (**self).clear_account(account_id)
    }
}

#[derive(Debug)]
struct Slots<K, V> {
    next_seq: u64,
    entries: HashMap<(AccountId, K), (u64, V)>,
}

/// In-memory account-isolated store for tests/dev.
#[derive(Debug)]
pub struct InMemoryAccountStore<K, V> {
    inner: RwLock<Slots<K, V>>,
}

impl<K, V> InMemoryAccountStore<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Slots {
                next_seq: 0,
                entries: HashMap::new(),
            }),
        }
    }
}

impl<K, V> InMemoryAccountStore<K, V>
where
    K: Clone + Eq + Hash + core::fmt::Display,
    V: Clone,
{
    /// Find-or-insert under a single write lock.
    ///
    /// `build` receives the first value (insertion order) in `account_id` that
    /// satisfies `matches`, or `None`, and returns the value to store. An
    /// update keeps the existing key and position; an insert is keyed by
    /// `key_of` and fails with `Conflict` if that key is already held by any
    /// account.
    pub fn upsert_where(
        &self,
        account_id: AccountId,
        matches: impl Fn(&V) -> bool,
        key_of: impl Fn(&V) -> K,
        build: impl FnOnce(Option<V>) -> DomainResult<V>,
    ) -> DomainResult<V> {
        let mut slots = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let Slots { next_seq, entries } = &mut *slots;

        let existing = entries
            .iter()
            .filter(|((a, _), (_, v))| *a == account_id && matches(v))
            .min_by_key(|(_, (seq, _))| *seq)
            .map(|((_, k), (seq, v))| (k.clone(), *seq, v.clone()));

        match existing {
            Some((key, seq, current)) => {
                let value = build(Some(current))?;
                entries.insert((account_id, key), (seq, value.clone()));
                Ok(value)
            }
            None => {
                let value = build(None)?;
                let key = key_of(&value);
                if entries.keys().any(|(_, k)| *k == key) {
                    return Err(DomainError::conflict(format!("key {key} is already in use")));
                }
                entries.insert((account_id, key), (*next_seq, value.clone()));
                *next_seq += 1;
                Ok(value)
            }
        }
    }

    /// Apply `change` to the value under `key` while holding the write lock.
    /// Nothing is stored if `change` fails. `None` when the key is absent.
    pub fn modify(
        &self,
        account_id: AccountId,
        key: &K,
        change: impl FnOnce(&mut V) -> DomainResult<()>,
    ) -> Option<DomainResult<V>> {
        let mut slots = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let (_, stored) = slots.entries.get_mut(&(account_id, key.clone()))?;

        let mut updated = stored.clone();
        Some(change(&mut updated).map(|()| {
            *stored = updated.clone();
            updated
        }))
    }
}

impl<K, V> Default for InMemoryAccountStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> AccountStore<K, V> for InMemoryAccountStore<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, account_id: AccountId, key: &K) -> Option<V> {
        let slots = self.inner.read().ok()?;
        slots
            .entries
            .get(&(account_id, key.clone()))
            .map(|(_, v)| v.clone())
    }

    fn upsert(&self, account_id: AccountId, key: K, value: V) {
        if let Ok(mut slots) = self.inner.write() {
            let Slots { next_seq, entries } = &mut *slots;
            match entries.entry((account_id, key)) {
                // Existing key keeps its position.
                Entry::Occupied(mut slot) => slot.get_mut().1 = value,
                Entry::Vacant(slot) => {
                    slot.insert((*next_seq, value));
                    *next_seq += 1;
                }
            }
        }
    }

    fn remove(&self, account_id: AccountId, key: &K) -> Option<V> {
        let mut slots = self.inner.write().ok()?;
        slots
            .entries
            .remove(&(account_id, key.clone()))
            .map(|(_, v)| v)
    }

    fn list(&self, account_id: AccountId) -> Vec<V> {
        let slots = match self.inner.read() {
            Ok(s) => s,
            Err(_) => return vec![],
        };

        let mut values: Vec<(u64, V)> = slots
            .entries
            .iter()
            .filter_map(|((a, _k), (seq, v))| {
                if *a == account_id {
                    Some((*seq, v.clone()))
                } else {
                    None
                }
            })
            .collect();
        values.sort_by_key(|(seq, _)| *seq);
        values.into_iter().map(|(_, v)| v).collect()
    }

    fn owner(&self, key: &K) -> Option<AccountId> {
        let slots = self.inner.read().ok()?;
        slots
            .entries
            .keys()
            .find(|(_, k)| k == key)
            .map(|(account_id, _)| *account_id)
    }

    fn clear_account(&self, account_id: AccountId) {
        if let Ok(mut slots) = self.inner.write() {
            slots.entries.retain(|(a, _k), _v| *a != account_id);
        }
    }
}
