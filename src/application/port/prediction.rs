// SPDX-License-Identifier: MPL-2.0
//! Prediction API port definition.
//!
//! The remote model is an opaque collaborator: the port carries the form
//! out and the raw status/body back. Interpreting the response is done by
//! the orchestrator so every adapter gets identical error semantics.

use crate::domain::image::ImageFile;
use crate::domain::measurement::Measurements;
use futures_util::future::BoxFuture;
use std::fmt;

/// Multipart field name of the photo.
pub const IMAGE_FIELD: &str = "image";

/// Everything one prediction request sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionForm {
    image: ImageFile,
    measurements: Measurements,
}

impl PredictionForm {
    #[must_use]
    pub fn new(image: ImageFile, measurements: Measurements) -> Self {
        Self {
            image,
            measurements,
        }
    }

    #[must_use]
    pub fn image(&self) -> &ImageFile {
        &self.image
    }

    #[must_use]
    pub fn measurements(&self) -> &Measurements {
        &self.measurements
    }

    /// Names of every multipart field, photo first.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(IMAGE_FIELD).chain(self.measurements.form_fields().map(|(name, _)| name))
    }
}

/// Raw HTTP outcome handed back by an adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns `true` for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request could not be completed (DNS, connect, TLS, abort...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError(pub String);

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for TransportError {}

/// Port for the remote quality-prediction service.
///
/// The returned future is `'static` so the UI can run it as a background
/// task after the borrow of the adapter ends.
pub trait PredictionApi: Send + Sync {
    /// Sends one `POST` with the form and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when no HTTP response was received.
    fn predict(&self, form: PredictionForm) -> BoxFuture<'static, Result<ApiResponse, TransportError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_lists_all_five_fields() {
        let form = PredictionForm::new(
            ImageFile::captured(vec![1]),
            Measurements::new("1", "2", "3", "4"),
        );
        let names: Vec<_> = form.field_names().collect();
        assert_eq!(
            names,
            ["image", "length_mm", "width_mm", "thickness_mm", "weight_g"]
        );
    }

    #[test]
    fn success_range_is_2xx() {
        assert!(ApiResponse::new(200, "").is_success());
        assert!(ApiResponse::new(204, "").is_success());
        assert!(!ApiResponse::new(199, "").is_success());
        assert!(!ApiResponse::new(301, "").is_success());
        assert!(!ApiResponse::new(503, "").is_success());
    }
}
