//! Single-entry reentrancy lock.

use std::sync::{Mutex, PoisonError};
use std::thread::{self, ThreadId};

use crate::error::{BridgeError, Result};

/// Per-instance mutual exclusion for state-mutating operations.
///
/// [`ReentrancyGuard::enter`] hands out a [`GuardToken`]; the lock is held
/// until the token drops, so every exit path of the guarded operation,
/// including `?` returns and panics, releases it. The holding thread is
/// remembered so a nested call can be told apart from a concurrent one.
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    holder: Mutex<Option<ThreadId>>,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::Reentrancy`] if the calling thread already holds it,
    ///   i.e. a callback re-entered a guarded operation
    /// - [`BridgeError::Busy`] if another thread holds it
    pub fn enter(&self) -> Result<GuardToken<'_>> {
        let current = thread::current().id();
        let mut holder = self.holder.lock().unwrap_or_else(PoisonError::into_inner);
        match *holder {
            Some(id) if id == current => Err(BridgeError::Reentrancy),
            Some(_) => Err(BridgeError::Busy),
            None => {
                *holder = Some(current);
                Ok(GuardToken { guard: self })
            }
        }
    }

    pub fn is_entered(&self) -> bool {
        self.holder
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

/// Proof that the guard is held. Releases it on drop.
#[derive(Debug)]
#[must_use = "the lock is released as soon as the token is dropped"]
pub struct GuardToken<'a> {
    guard: &'a ReentrancyGuard,
}

impl Drop for GuardToken<'_> {
    fn drop(&mut self) {
        *self
            .guard
            .holder
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }
}
