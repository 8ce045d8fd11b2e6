// SPDX-License-Identifier: MPL-2.0
//! Preview handle port.
//!
//! A preview is whatever the host needs to show the current photo on screen
//! (a decoded texture for iced). Each allocation must be released exactly
//! once; [`PreviewHandle`] does that from `Drop`, so owners never call
//! `release` by hand.

use std::fmt;
use std::sync::Arc;

/// Identifier of one allocated preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PreviewId(u64);

impl PreviewId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Host-side store of displayable previews.
pub trait PreviewRegistry: Send + Sync {
    /// Creates a preview for the encoded image bytes.
    fn allocate(&self, bytes: &[u8]) -> PreviewId;

    /// Frees a preview created by [`allocate`](Self::allocate).
    fn release(&self, id: PreviewId);
}

/// Owned preview that is released when dropped.
pub struct PreviewHandle {
    id: PreviewId,
    registry: Arc<dyn PreviewRegistry>,
}

impl PreviewHandle {
    /// Allocates a preview in `registry` for `bytes`.
    pub fn allocate(registry: &Arc<dyn PreviewRegistry>, bytes: &[u8]) -> Self {
        let id = registry.allocate(bytes);
        Self {
            id,
            registry: Arc::clone(registry),
        }
    }

    #[must_use]
    pub fn id(&self) -> PreviewId {
        self.id
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.release(self.id);
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewHandle").field("id", &self.id).finish()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingRegistry;
    use super::*;

    #[test]
    fn dropping_handle_releases_once() {
        let recorder = Arc::new(RecordingRegistry::default());
        let registry: Arc<dyn PreviewRegistry> = recorder.clone();

        let handle = PreviewHandle::allocate(&registry, b"jpeg");
        let id = handle.id();
        assert!(recorder.released().is_empty());

        drop(handle);
        assert_eq!(recorder.released(), vec![id]);
    }
}
