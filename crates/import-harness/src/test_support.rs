// crates/import-harness/src/test_support.rs
// ============================================================================
// Module: Unit Test Support
// Description: Serialized process-env mutation for unit tests.
// Purpose: Shared with sibling crates through the `test-support` feature.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Unit tests across modules mutate process env vars. They share one global
//! lock and restore prior values through [`EnvGuard`] on drop.

use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::OnceLock;

/// Safe wrappers for test-only environment mutation.
pub mod env_mut {
    #![allow(unsafe_code, reason = "Tests mutate process env vars in a controlled scope.")]

    /// Sets an environment variable for the current process.
    pub fn set_var(key: &str, value: &str) {
        // SAFETY: Tests serialize environment mutation via a global lock.
        unsafe {
            std::env::set_var(key, value);
        }
    }

    /// Removes an environment variable from the current process.
    pub fn remove_var(key: &str) {
        // SAFETY: Tests serialize environment mutation via a global lock.
        unsafe {
            std::env::remove_var(key);
        }
    }
}

/// Acquires the process-wide env mutation lock.
pub fn env_lock() -> MutexGuard<'static, ()> {
    /// Lock shared by every unit test that touches env vars.
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(())).lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Restores captured env vars on drop and clears them on creation.
pub struct EnvGuard {
    /// Captured names and their original values.
    entries: Vec<(&'static str, Option<String>)>,
}

impl EnvGuard {
    /// Captures the listed variables and removes them from the process env.
    pub fn cleared(names: &[&'static str]) -> Self {
        let entries = names.iter().map(|name| (*name, std::env::var(*name).ok())).collect();
        for name in names {
            env_mut::remove_var(name);
        }
        Self {
            entries,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (name, value) in self.entries.drain(..) {
            match value {
                Some(value) => env_mut::set_var(name, &value),
                None => env_mut::remove_var(name),
            }
        }
    }
}
