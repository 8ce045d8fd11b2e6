// SPDX-License-Identifier: MPL-2.0
//! The single current photo and its preview.
//!
//! Replacing or clearing the photo drops the old [`PreviewHandle`], which
//! releases it in the host registry. No other code releases previews.

use crate::application::port::preview::{PreviewHandle, PreviewId, PreviewRegistry};
use crate::domain::image::{self, ImageFile, FALLBACK_MIME_TYPE};
use std::path::Path;
use std::sync::Arc;

/// A photo ready to be sent, together with its on-screen preview.
#[derive(Debug)]
pub struct ImageAsset {
    file: ImageFile,
    preview: PreviewHandle,
}

impl ImageAsset {
    #[must_use]
    pub fn file(&self) -> &ImageFile {
        &self.file
    }

    #[must_use]
    pub fn preview_id(&self) -> PreviewId {
        self.preview.id()
    }
}

/// Owner of at most one [`ImageAsset`].
pub struct ImageSource {
    registry: Arc<dyn PreviewRegistry>,
    current: Option<ImageAsset>,
}

impl std::fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageSource")
            .field("current", &self.current)
            .finish()
    }
}

impl ImageSource {
    #[must_use]
    pub fn new(registry: Arc<dyn PreviewRegistry>) -> Self {
        Self {
            registry,
            current: None,
        }
    }

    /// Makes a user-picked file the current photo.
    ///
    /// Any bytes are accepted; the MIME type is guessed from the extension.
    pub fn set_from_upload(&mut self, path: &Path, bytes: Vec<u8>) -> &ImageAsset {
        let file = ImageFile::uploaded(image::file_name_of(path), mime_type_for(path), bytes);
        self.replace(file)
    }

    /// Makes a camera snapshot the current photo.
    pub fn set_from_capture(&mut self, jpeg: Vec<u8>) -> &ImageAsset {
        self.replace(ImageFile::captured(jpeg))
    }

    /// Drops the current photo, releasing its preview.
    pub fn clear(&mut self) {
        self.current = None;
    }

    #[must_use]
    pub fn current(&self) -> Option<&ImageAsset> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn has_image(&self) -> bool {
        self.current.is_some()
    }

    fn replace(&mut self, file: ImageFile) -> &ImageAsset {
        let preview = PreviewHandle::allocate(&self.registry, file.bytes());
        // The previous asset is dropped here, after the new preview exists.
        self.current.insert(ImageAsset { file, preview })
    }
}

/// Guesses a MIME type from the file extension.
#[must_use]
pub fn mime_type_for(path: &Path) -> &'static str {
    image_rs::ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .unwrap_or(FALLBACK_MIME_TYPE)
}
