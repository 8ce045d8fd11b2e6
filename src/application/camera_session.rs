// SPDX-License-Identifier: MPL-2.0
//! Live camera session: `Closed → Opening → Open → Closed`.
//!
//! Opening a device blocks, so [`CameraSession::start`] only moves the state
//! to `Opening` and hands back an [`OpenRequest`] for a worker to run. The
//! result comes back through [`CameraSession::finish_open`]. An open stream
//! is held in a guard that stops it when dropped, so replacing the state or
//! dropping the session always releases the device.

use crate::application::port::camera::{CameraError, CaptureDevice, Facing, VideoStream};
use crate::config::DEFAULT_JPEG_QUALITY;
use crate::domain::image::Frame;
use image_rs::codecs::jpeg::JpegEncoder;
use image_rs::imageops::{self, FilterType};
use image_rs::{DynamicImage, ImageError, RgbaImage};
use std::fmt;
use std::sync::{Arc, Mutex};

/// Snapshot surface width when the stream reports no resolution.
pub const FALLBACK_SURFACE_WIDTH: u32 = 640;

/// Snapshot surface height when the stream reports no resolution.
pub const FALLBACK_SURFACE_HEIGHT: u32 = 480;

/// Public view of the session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraState {
    Closed,
    Opening,
    Open,
}

/// Stops the wrapped stream when dropped.
struct StreamGuard(Box<dyn VideoStream>);

impl Drop for StreamGuard {
    fn drop(&mut self) {
        self.0.stop();
    }
}

enum State {
    Closed,
    Opening { attempt: u64 },
    Open(StreamGuard),
}

/// Device acquisition job produced by [`CameraSession::start`].
pub struct OpenRequest {
    device: Arc<dyn CaptureDevice>,
    facing: Facing,
    attempt: u64,
}

impl OpenRequest {
    /// Opens the device. Blocks until the OS answers.
    #[must_use]
    pub fn open(self) -> OpenOutcome {
        let result = self
            .device
            .open(self.facing)
            .map(|stream| Arc::new(Mutex::new(Some(StreamGuard(stream)))));
        OpenOutcome {
            attempt: self.attempt,
            result,
        }
    }
}

impl fmt::Debug for OpenRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenRequest")
            .field("facing", &self.facing)
            .field("attempt", &self.attempt)
            .finish()
    }
}

/// Result of an [`OpenRequest`], ready to hand back to the session.
///
/// Clonable so it can travel inside UI messages; only the first
/// [`CameraSession::finish_open`] takes the stream, and an untaken stream is
/// stopped when the last clone drops.
#[derive(Clone)]
pub struct OpenOutcome {
    attempt: u64,
    result: Result<Arc<Mutex<Option<StreamGuard>>>, CameraError>,
}

impl fmt::Debug for OpenOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenOutcome")
            .field("attempt", &self.attempt)
            .field("opened", &self.result.is_ok())
            .finish()
    }
}

/// A frame grabbed from the open stream, waiting to be encoded.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    frame: Frame,
    surface: (u32, u32),
    quality: u8,
}

impl FrameSnapshot {
    /// Size of the raster the frame is drawn onto.
    #[must_use]
    pub fn surface_size(&self) -> (u32, u32) {
        self.surface
    }

    /// Draws the frame onto the surface and JPEG-encodes it.
    ///
    /// # Errors
    ///
    /// Returns an error if the encoder rejects the image.
    pub fn encode_jpeg(&self) -> Result<Vec<u8>, ImageError> {
        let (width, height) = self.surface;
        let source = RgbaImage::from_raw(
            self.frame.width(),
            self.frame.height(),
            self.frame.rgba_bytes().to_vec(),
        )
        .ok_or_else(|| {
            ImageError::Parameter(image_rs::error::ParameterError::from_kind(
                image_rs::error::ParameterErrorKind::DimensionMismatch,
            ))
        })?;

        let drawn = if source.dimensions() == (width, height) {
            source
        } else {
            imageops::resize(&source, width, height, FilterType::Triangle)
        };
        let rgb = DynamicImage::ImageRgba8(drawn).to_rgb8();

        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, self.quality).encode_image(&rgb)?;
        Ok(jpeg)
    }
}

/// Owner of the single live camera stream.
pub struct CameraSession {
    device: Arc<dyn CaptureDevice>,
    facing: Facing,
    jpeg_quality: u8,
    state: State,
    next_attempt: u64,
}

impl fmt::Debug for CameraSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CameraSession")
            .field("state", &self.state())
            .field("facing", &self.facing)
            .finish()
    }
}

impl CameraSession {
    /// Creates a closed session that will request the rear camera.
    #[must_use]
    pub fn new(device: Arc<dyn CaptureDevice>) -> Self {
        Self {
            device,
            facing: Facing::Environment,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            state: State::Closed,
            next_attempt: 0,
        }
    }

    /// Sets the snapshot JPEG quality (clamped to 1–100).
    #[must_use]
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    #[must_use]
    pub fn state(&self) -> CameraState {
        match self.state {
            State::Closed => CameraState::Closed,
            State::Opening { .. } => CameraState::Opening,
            State::Open(_) => CameraState::Open,
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.state, State::Open(_))
    }

    /// Begins opening the device.
    ///
    /// Returns `None` while a stream is already opening or open, so a second
    /// start can never acquire a second device.
    pub fn start(&mut self) -> Option<OpenRequest> {
        if !matches!(self.state, State::Closed) {
            return None;
        }
        let attempt = self.next_attempt;
        self.next_attempt += 1;
        self.state = State::Opening { attempt };
        tracing::debug!(attempt, facing = ?self.facing, "opening camera");
        Some(OpenRequest {
            device: Arc::clone(&self.device),
            facing: self.facing,
            attempt,
        })
    }

    /// Completes an open started by [`start`](Self::start).
    ///
    /// An outcome for an attempt that was stopped in the meantime is dropped:
    /// its stream is released at once, its error is swallowed, and the
    /// session keeps whatever state it has now.
    ///
    /// # Errors
    ///
    /// Returns the device error when the current open failed; the session is
    /// closed.
    pub fn finish_open(&mut self, outcome: OpenOutcome) -> Result<(), CameraError> {
        let current = matches!(self.state, State::Opening { attempt } if attempt == outcome.attempt);

        match outcome.result {
            Ok(slot) => {
                let guard = slot.lock().unwrap_or_else(|e| e.into_inner()).take();
                match guard {
                    Some(guard) if current => {
                        tracing::info!("camera opened");
                        self.state = State::Open(guard);
                    }
                    // Dropping the guard stops the stale stream.
                    _ => tracing::debug!(attempt = outcome.attempt, "discarding stale camera stream"),
                }
                Ok(())
            }
            Err(err) if current => {
                tracing::warn!(error = %err, "camera unavailable");
                self.state = State::Closed;
                Err(err)
            }
            Err(err) => {
                tracing::debug!(
                    attempt = outcome.attempt,
                    error = %err,
                    "ignoring stale camera failure"
                );
                Ok(())
            }
        }
    }

    /// Closes the session if the open stream has died.
    ///
    /// # Errors
    ///
    /// Returns the stream's failure; the device is released and the session
    /// is closed.
    pub fn check_stream(&mut self) -> Result<(), CameraError> {
        let State::Open(guard) = &self.state else {
            return Ok(());
        };
        match guard.0.failure() {
            Some(err) => {
                tracing::warn!(error = %err, "camera stream failed");
                self.state = State::Closed;
                Err(err)
            }
            None => Ok(()),
        }
    }

    /// Whether an open is pending.
    #[must_use]
    pub fn is_opening(&self) -> bool {
        matches!(self.state, State::Opening { .. })
    }

    /// Stops the stream and releases the device. Idempotent.
    pub fn stop(&mut self) {
        if !matches!(self.state, State::Closed) {
            tracing::debug!("stopping camera");
        }
        self.state = State::Closed;
    }

    /// Open if closed, close otherwise.
    pub fn toggle(&mut self) -> Option<OpenRequest> {
        if matches!(self.state, State::Closed) {
            self.start()
        } else {
            self.stop();
            None
        }
    }

    /// Latest frame for the on-screen viewfinder.
    pub fn viewfinder_frame(&mut self) -> Option<Frame> {
        match &mut self.state {
            State::Open(guard) => guard.0.latest_frame(),
            _ => None,
        }
    }

    /// Grabs the current frame for a snapshot.
    ///
    /// Returns `None` when the session is not open or no frame has arrived
    /// yet; neither case is an error.
    pub fn capture_frame(&mut self) -> Option<FrameSnapshot> {
        let State::Open(guard) = &mut self.state else {
            return None;
        };
        let surface = guard
            .0
            .resolution()
            .filter(|&(w, h)| w > 0 && h > 0)
            .unwrap_or((FALLBACK_SURFACE_WIDTH, FALLBACK_SURFACE_HEIGHT));
        let frame = guard.0.latest_frame()?;
        Some(FrameSnapshot {
            frame,
            surface,
            quality: self.jpeg_quality,
        })
    }
}
