//! Image generation commands backed by the Bing Image Creator client.

/// Submodule defining the `/imagine` command.
pub(crate) mod imagine;

use std::sync::atomic::{AtomicU64, Ordering};

const UNLOCKED: u64 = 0;

/// The single "a generation is running" lock shared by all `/imagine` calls.
///
/// Generations share one output directory, whose file numbering is not safe
/// for concurrent writers, so only one runs at a time. Each holder gets its
/// own token; a guard only releases the lock while it still holds that token,
/// so a guard outliving a forced [`GenerationLock::force_release`] cannot free
/// a later holder's lock.
#[derive(Debug)]
pub(crate) struct GenerationLock {
    holder: AtomicU64,
    next_token: AtomicU64,
}

impl GenerationLock {
    pub(crate) fn new() -> Self {
        Self {
            holder: AtomicU64::new(UNLOCKED),
            next_token: AtomicU64::new(UNLOCKED + 1),
        }
    }

    /// Takes the lock, or returns `None` if a generation is already running.
    pub(crate) fn acquire(&self) -> Option<GenerationGuard<'_>> {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        self.holder
            .compare_exchange(UNLOCKED, token, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| GenerationGuard { lock: self, token })
    }

    /// Clears the lock whoever holds it. Returns whether it was held.
    pub(crate) fn force_release(&self) -> bool {
        self.holder.swap(UNLOCKED, Ordering::AcqRel) != UNLOCKED
    }

    pub(crate) fn is_locked(&self) -> bool {
        self.holder.load(Ordering::Acquire) != UNLOCKED
    }
}

/// Held while an image generation is running.
pub(crate) struct GenerationGuard<'a> {
    lock: &'a GenerationLock,
    token: u64,
}

impl Drop for GenerationGuard<'_> {
    fn drop(&mut self) {
        // Fails when the lock was forced open and taken by someone else.
        let _ = self.lock.holder.compare_exchange(
            self.token,
            UNLOCKED,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_is_exclusive() {
        let lock = GenerationLock::new();

        let guard = lock.acquire();
        assert!(guard.is_some());
        assert!(lock.acquire().is_none());
        assert!(lock.is_locked());
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let lock = GenerationLock::new();

        drop(lock.acquire());

        assert!(!lock.is_locked());
        assert!(lock.acquire().is_some());
    }

    #[test]
    fn test_force_release_reports_previous_state() {
        let lock = GenerationLock::new();
        assert!(!lock.force_release());

        let _guard = lock.acquire();
        assert!(lock.force_release());
        assert!(!lock.is_locked());
    }

    #[test]
    fn test_stale_guard_does_not_release_a_newer_holder() {
        let lock = GenerationLock::new();

        let first = lock.acquire().unwrap();
        assert!(lock.force_release());
        let second = lock.acquire().unwrap();
        drop(first);

        assert!(lock.is_locked());
        assert!(lock.acquire().is_none());

        drop(second);
        assert!(!lock.is_locked());
        assert!(lock.acquire().is_some());
    }
}
