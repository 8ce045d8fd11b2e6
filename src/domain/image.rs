// SPDX-License-Identifier: MPL-2.0
//! Photo payload and raw camera frames.
//!
//! These types carry bytes and pixels only; preview handles and encoding
//! live in the application and infrastructure layers.

use std::path::Path;
use std::sync::Arc;

/// File name given to every camera snapshot.
pub const CAPTURED_FILE_NAME: &str = "captured-mango.jpg";

/// MIME type of every camera snapshot.
pub const CAPTURED_MIME_TYPE: &str = "image/jpeg";

/// MIME type used when the extension says nothing useful.
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Where the current photo came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOrigin {
    /// Picked from disk or dropped onto the window.
    Upload,
    /// Snapshot taken from the live camera stream.
    Capture,
}

/// The binary photo sent as the `image` form field.
///
/// Bytes are shared, so cloning an `ImageFile` into a request is cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    file_name: String,
    mime_type: String,
    bytes: Arc<[u8]>,
    origin: ImageOrigin,
}

impl ImageFile {
    /// Wraps bytes picked by the user. No type or size check is made.
    #[must_use]
    pub fn uploaded(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
            origin: ImageOrigin::Upload,
        }
    }

    /// Wraps a JPEG snapshot with the fixed capture name and type.
    #[must_use]
    pub fn captured(jpeg: Vec<u8>) -> Self {
        Self {
            file_name: CAPTURED_FILE_NAME.to_string(),
            mime_type: CAPTURED_MIME_TYPE.to_string(),
            bytes: jpeg.into(),
            origin: ImageOrigin::Capture,
        }
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn origin(&self) -> ImageOrigin {
        self.origin
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Returns the last path component, or `"image"` when the path has none.
#[must_use]
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .map_or_else(|| "image".to_string(), String::from)
}

/// A single RGBA frame pulled from a capture stream.
#[derive(Debug, Clone)]
pub struct Frame {
    width: u32,
    height: u32,
    rgba_bytes: Arc<Vec<u8>>,
}

impl Frame {
    /// Creates a frame, returning `None` when the data does not match the
    /// dimensions or the frame is empty.
    #[must_use]
    pub fn from_rgba(width: u32, height: u32, rgba_bytes: Vec<u8>) -> Option<Self> {
        let expected_len = (width as usize) * (height as usize) * 4;
        if expected_len == 0 || rgba_bytes.len() != expected_len {
            return None;
        }
        Some(Self {
            width,
            height,
            rgba_bytes: Arc::new(rgba_bytes),
        })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn rgba_bytes(&self) -> &[u8] {
        &self.rgba_bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn captured_file_uses_fixed_name_and_type() {
        let file = ImageFile::captured(vec![0xFF, 0xD8]);
        assert_eq!(file.file_name(), CAPTURED_FILE_NAME);
        assert_eq!(file.mime_type(), CAPTURED_MIME_TYPE);
        assert_eq!(file.origin(), ImageOrigin::Capture);
        assert_eq!(file.len(), 2);
    }

    #[test]
    fn uploaded_file_keeps_given_metadata() {
        let file = ImageFile::uploaded("mango.png", "image/png", vec![1, 2, 3]);
        assert_eq!(file.file_name(), "mango.png");
        assert_eq!(file.mime_type(), "image/png");
        assert_eq!(file.origin(), ImageOrigin::Upload);
        assert_eq!(file.bytes(), &[1, 2, 3]);
    }

    #[test]
    fn file_name_of_falls_back_for_bare_root() {
        assert_eq!(file_name_of(&PathBuf::from("/tmp/fruit.jpg")), "fruit.jpg");
        assert_eq!(file_name_of(&PathBuf::from("/")), "image");
    }

    #[test]
    fn frame_rejects_mismatched_or_empty_data() {
        assert!(Frame::from_rgba(2, 2, vec![0; 16]).is_some());
        assert!(Frame::from_rgba(2, 2, vec![0; 15]).is_none());
        assert!(Frame::from_rgba(0, 0, Vec::new()).is_none());
    }
}
