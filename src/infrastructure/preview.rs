// SPDX-License-Identifier: MPL-2.0
//! Preview registry holding decoded-on-demand iced image handles.

use crate::application::port::{PreviewId, PreviewRegistry};
use iced::widget::image;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Maps live preview ids to the image handles the view draws.
#[derive(Debug, Default)]
pub struct PreviewStore {
    next_id: AtomicU64,
    handles: Mutex<HashMap<PreviewId, image::Handle>>,
}

impl PreviewStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handle for a live preview.
    pub fn handle(&self, id: PreviewId) -> Option<image::Handle> {
        self.handles.lock().ok()?.get(&id).cloned()
    }

    /// Number of previews not yet released.
    pub fn live_count(&self) -> usize {
        self.handles.lock().map(|h| h.len()).unwrap_or(0)
    }
}

impl PreviewRegistry for PreviewStore {
    fn allocate(&self, bytes: &[u8]) -> PreviewId {
        let id = PreviewId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let handle = image::Handle::from_bytes(bytes.to_vec());
        match self.handles.lock() {
            Ok(mut handles) => {
                handles.insert(id, handle);
            }
            Err(_) => tracing::error!("preview store lock poisoned"),
        }
        id
    }

    fn release(&self, id: PreviewId) {
        if let Ok(mut handles) = self.handles.lock() {
            handles.remove(&id);
        }
    }
}
