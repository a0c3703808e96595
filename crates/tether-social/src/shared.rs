//! A directory shared between threads.

use crate::directory::UserDirectory;
use crate::error::DirectoryError;
use std::sync::{Arc, Mutex};

/// A user directory behind a single lock.
///
/// Directory operations walk linked lists and may write the log between
/// steps, so they are not safe to interleave. Every access goes through one
/// mutex around the whole directory.
pub struct SharedDirectory<U = ()> {
    inner: Arc<Mutex<UserDirectory<U>>>,
}

impl<U> SharedDirectory<U> {
    /// Wraps a directory.
    pub fn new(directory: UserDirectory<U>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(directory)),
        }
    }

    /// Runs `f` with exclusive access to the directory.
    ///
    /// Fails with [`DirectoryError::Poisoned`] if another thread panicked while
    /// holding the lock.
    pub fn with<R>(&self, f: impl FnOnce(&mut UserDirectory<U>) -> R) -> Result<R, DirectoryError> {
        let mut guard = self.inner.lock().map_err(|_| DirectoryError::Poisoned)?;
        Ok(f(&mut guard))
    }
}

impl<U> Clone for SharedDirectory<U> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
