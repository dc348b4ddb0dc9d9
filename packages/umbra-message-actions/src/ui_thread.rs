//! UI thread affinity.
//!
//! Every message action runs on the thread that owns the conversation view.
//! [`UiThread`] remembers that thread when the context is built and checks
//! callers against it.

use std::thread::{self, ThreadId};

use crate::error::{Error, Result};

/// The thread that owns a conversation view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiThread {
    id: ThreadId,
}

impl UiThread {
    /// Capture the calling thread as the UI thread.
    pub fn current() -> Self {
        Self {
            id: thread::current().id(),
        }
    }

    /// Whether the calling thread is the UI thread.
    pub fn is_current(&self) -> bool {
        thread::current().id() == self.id
    }

    /// Fail with [`Error::OffUiThread`] unless called on the UI thread.
    pub fn ensure(&self) -> Result<()> {
        if self.is_current() {
            Ok(())
        } else {
            Err(Error::OffUiThread)
        }
    }
}
