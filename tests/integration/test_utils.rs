//! Shared helpers for integration tests that touch process environment.

use std::sync::{Mutex, MutexGuard};

/// Serializes every test that reads or writes `PREGEN_*` variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Hold this while loading configuration or changing the environment.
pub fn env_lock() -> MutexGuard<'static, ()> {
    ENV_MUTEX.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Sets a variable for the life of the guard, then restores the previous value.
pub struct ScopedEnvVar {
    key: &'static str,
    previous: Option<String>,
}

impl ScopedEnvVar {
    pub fn set(key: &'static str, value: &str) -> Self {
        let previous = std::env::var(key).ok();
        std::env::set_var(key, value);
        Self { key, previous }
    }
}

impl Drop for ScopedEnvVar {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(value) => std::env::set_var(self.key, value),
            None => std::env::remove_var(self.key),
        }
    }
}
