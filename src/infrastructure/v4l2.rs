// SPDX-License-Identifier: MPL-2.0
//! Video4Linux2 capture backend.
//!
//! Requests MJPEG from the device and decodes each frame on a capture
//! thread. The viewfinder only ever needs the newest frame, so the thread
//! overwrites a single slot instead of queueing.

use crate::application::port::{CameraError, CaptureDevice, Facing, VideoStream};
use crate::domain::image::Frame;
use image_rs::ImageFormat;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread::{self, JoinHandle};
use v4l::buffer::Type;
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, Format, FourCC};

const BUFFER_COUNT: u32 = 4;

/// A V4L2 device node.
///
/// V4L2 nodes carry no facing information; the requested facing is logged
/// and the configured node is opened regardless.
#[derive(Debug, Clone)]
pub struct V4l2Device {
    path: PathBuf,
    width: u32,
    height: u32,
}

impl V4l2Device {
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width,
            height,
        }
    }
}

impl CaptureDevice for V4l2Device {
    fn open(&self, facing: Facing) -> Result<Box<dyn VideoStream>, CameraError> {
        tracing::debug!(path = %self.path.display(), ?facing, "opening V4L2 device");
        let device = Device::with_path(&self.path)?;

        let requested = Format::new(self.width, self.height, FourCC::new(b"MJPG"));
        let format = Capture::set_format(&device, &requested)?;
        if format.fourcc != FourCC::new(b"MJPG") {
            return Err(CameraError::Device(
                "MJPEG format not supported by device".to_string(),
            ));
        }

        let latest = Arc::new(Mutex::new(None));
        let running = Arc::new(AtomicBool::new(true));
        let failure = Arc::new(Mutex::new(None));
        // The capture thread reports whether buffer setup succeeded before
        // it starts streaming.
        let (ready_tx, ready_rx) = mpsc::channel();
        let thread_handle = {
            let latest = Arc::clone(&latest);
            let running = Arc::clone(&running);
            let failure = Arc::clone(&failure);
            thread::spawn(move || {
                let mut stream =
                    match MmapStream::with_buffers(&device, Type::VideoCapture, BUFFER_COUNT) {
                        Ok(stream) => {
                            let _ = ready_tx.send(Ok(()));
                            stream
                        }
                        Err(e) => {
                            let _ = ready_tx.send(Err(CameraError::from(e)));
                            return;
                        }
                    };
                if let Err(e) = capture_loop(&mut stream, &latest, &running) {
                    tracing::warn!(error = %e, "capture thread stopped");
                    if let Ok(mut slot) = failure.lock() {
                        *slot = Some(e);
                    }
                }
            })
        };

        let setup = ready_rx
            .recv()
            .unwrap_or_else(|_| Err(CameraError::Device("capture thread exited".to_string())));
        if let Err(e) = setup {
            let _ = thread_handle.join();
            return Err(e);
        }

        Ok(Box::new(V4l2Stream {
            resolution: (format.width, format.height),
            latest,
            running,
            failure,
            thread_handle: Some(thread_handle),
        }))
    }
}

fn capture_loop(
    stream: &mut MmapStream<'_>,
    latest: &Mutex<Option<Frame>>,
    running: &AtomicBool,
) -> Result<(), CameraError> {
    while running.load(Ordering::Acquire) {
        let (data, _metadata) = CaptureStream::next(stream)?;
        // Buffer is only valid until the next call
        let decoded = match image_rs::load_from_memory_with_format(data, ImageFormat::Jpeg) {
            Ok(decoded) => decoded.to_rgba8(),
            Err(e) => {
                tracing::trace!(error = %e, "skipping undecodable frame");
                continue;
            }
        };
        let (width, height) = decoded.dimensions();
        if let Some(frame) = Frame::from_rgba(width, height, decoded.into_raw()) {
            if let Ok(mut slot) = latest.lock() {
                *slot = Some(frame);
            }
        }
    }
    Ok(())
}

/// A running capture started by [`V4l2Device::open`].
pub struct V4l2Stream {
    resolution: (u32, u32),
    latest: Arc<Mutex<Option<Frame>>>,
    running: Arc<AtomicBool>,
    failure: Arc<Mutex<Option<CameraError>>>,
    thread_handle: Option<JoinHandle<()>>,
}

impl VideoStream for V4l2Stream {
    fn resolution(&self) -> Option<(u32, u32)> {
        Some(self.resolution)
    }

    fn latest_frame(&mut self) -> Option<Frame> {
        self.latest.lock().ok()?.clone()
    }

    fn failure(&self) -> Option<CameraError> {
        self.failure.lock().ok()?.clone()
    }

    fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for V4l2Stream {
    fn drop(&mut self) {
        self.stop();
    }
}
