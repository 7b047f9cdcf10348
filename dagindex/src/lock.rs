use std::collections::HashSet;

use parking_lot::{Condvar, Mutex};

/// A keyed mutex: named slots, each held by at most one caller at a time (§5).
///
/// The source this spec distills from relies on a shared, process-wide keyed
/// mutex for serialising `Backend` access. Rather than carry over that implicit
/// global, this type is owned by the [`crate::backend::Backend`] instance and
/// handed an explicit guard token that releases its slots on drop -- the §9
/// "Shared-resource rewrite" guidance.
///
/// `acquire` always sorts the requested names before taking them, so two
/// concurrent composite operations that both need `["dagIndexOrder",
/// "dagIndexPage"]` can never deadlock on lock-acquisition order.
pub struct KeyedMutex {
    held: Mutex<HashSet<&'static str>>,
    released: Condvar,
}

impl KeyedMutex {
    pub fn new() -> Self {
        Self { held: Mutex::new(HashSet::new()), released: Condvar::new() }
    }

    /// Blocks until every name in `names` is free, then marks them all held.
    pub fn acquire(&self, names: &[&'static str]) -> KeyGuard<'_> {
        let mut sorted: Vec<&'static str> = names.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let mut guard = self.held.lock();
        loop {
            if sorted.iter().all(|name| !guard.contains(name)) {
                for name in &sorted {
                    guard.insert(name);
                }
                break;
            }
            self.released.wait(&mut guard);
        }
        drop(guard);

        KeyGuard { mutex: self, names: sorted }
    }
}

impl Default for KeyedMutex {
    fn default() -> Self {
        Self::new()
    }
}

/// A held set of named locks. Releases them all when dropped, success or failure
/// (§4.2: "locks are released on all paths").
pub struct KeyGuard<'a> {
    mutex: &'a KeyedMutex,
    names: Vec<&'static str>,
}

impl Drop for KeyGuard<'_> {
    fn drop(&mut self) {
        let mut guard = self.mutex.held.lock();
        for name in &self.names {
            guard.remove(name);
        }
        drop(guard);
        self.mutex.released.notify_all();
    }
}
