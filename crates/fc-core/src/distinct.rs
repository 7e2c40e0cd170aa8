//! Explicit identity for distinct-value counting.
//!
//! Values are compared through caller-supplied `hash` and `equals`
//! functions, so types without a structural `Hash` (floats, sets with
//! unordered iteration, graphs) can still be counted correctly.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Hash and equality functions for values of type `T`.
///
/// `equals(a, b)` must imply `hash(a) == hash(b)`.
pub struct Identity<T> {
    hash: Rc<dyn Fn(&T) -> u64>,
    equals: Rc<dyn Fn(&T, &T) -> bool>,
}

impl<T> Clone for Identity<T> {
    fn clone(&self) -> Self {
        Self {
            hash: Rc::clone(&self.hash),
            equals: Rc::clone(&self.equals),
        }
    }
}

impl<T> std::fmt::Debug for Identity<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity").finish_non_exhaustive()
    }
}

impl<T: 'static> Identity<T> {
    pub fn new(
        hash: impl Fn(&T) -> u64 + 'static,
        equals: impl Fn(&T, &T) -> bool + 'static,
    ) -> Self {
        Self {
            hash: Rc::new(hash),
            equals: Rc::new(equals),
        }
    }

    /// Identity through a canonical key.
    pub fn by_key<K: Hash + Eq>(key: impl Fn(&T) -> K + 'static) -> Self {
        let key = Rc::new(key);
        let key_eq = Rc::clone(&key);
        Self::new(
            move |v| hash_one(&key(v)),
            move |a, b| key_eq(a) == key_eq(b),
        )
    }

    pub fn hash(&self, value: &T) -> u64 {
        (self.hash)(value)
    }

    pub fn equals(&self, a: &T, b: &T) -> bool {
        (self.equals)(a, b)
    }
}

impl<T: Hash + Eq + 'static> Identity<T> {
    /// The type's own `Hash` and `Eq`.
    pub fn natural() -> Self {
        Self::new(|v: &T| hash_one(v), |a: &T, b: &T| a == b)
    }
}

fn hash_one<K: Hash + ?Sized>(value: &K) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// A set of values under an [`Identity`].
pub struct DistinctSet<T> {
    identity: Identity<T>,
    buckets: HashMap<u64, Vec<T>>,
    len: usize,
}

impl<T> DistinctSet<T> {
    pub fn new(identity: Identity<T>) -> Self {
        Self {
            identity,
            buckets: HashMap::new(),
            len: 0,
        }
    }

    /// Insert `value`; returns false if an equal value was already present.
    pub fn insert(&mut self, value: T) -> bool {
        let h = (self.identity.hash)(&value);
        let bucket = self.buckets.entry(h).or_default();
        if bucket.iter().any(|v| (self.identity.equals)(v, &value)) {
            return false;
        }
        bucket.push(value);
        self.len += 1;
        true
    }

    pub fn contains(&self, value: &T) -> bool {
        let h = (self.identity.hash)(value);
        self.buckets
            .get(&h)
            .is_some_and(|bucket| bucket.iter().any(|v| (self.identity.equals)(v, value)))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Number of distinct values in `values` under `identity`.
pub fn count_distinct<'a, T, I>(values: I, identity: &Identity<T>) -> usize
where
    T: Clone + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut set = DistinctSet::new(identity.clone());
    for v in values {
        set.insert(v.clone());
    }
    set.len()
}
