// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the application.

use crate::application::camera_session::OpenOutcome;
use crate::application::orchestrator::Completion;
use crate::ui::{image_panel, measurement_panel};
use std::fmt;
use std::path::PathBuf;
use std::time::Instant;
use unic_langid::LanguageIdentifier;

/// Top-level messages consumed by `App::update`.
#[derive(Debug, Clone)]
pub enum Message {
    ImagePanel(image_panel::Message),
    Measurements(measurement_panel::Message),
    /// Grade button pressed.
    Submit,
    /// Result from the open file dialog.
    OpenFileDialogResult(Option<PathBuf>),
    /// A file was dropped on the window.
    FileDropped(PathBuf),
    /// A picked or dropped file finished reading.
    ImageFileRead {
        path: PathBuf,
        result: Result<Vec<u8>, String>,
    },
    /// The blocking device open finished.
    CameraOpened(OpenOutcome),
    /// The device open task itself failed (panicked or was cancelled).
    CameraTaskFailed(String),
    /// Viewfinder refresh while the camera is open.
    ViewfinderTick(Instant),
    /// JPEG encoding of a captured frame finished.
    CaptureEncoded(Result<Vec<u8>, String>),
    PredictionCompleted(Completion),
    LanguageSelected(LanguageOption),
    /// Window close was requested (user clicked X or pressed Alt+F4).
    WindowCloseRequested(iced::window::Id),
}

/// Entry of the language picker.
#[derive(Debug, Clone)]
pub struct LanguageOption {
    pub locale: LanguageIdentifier,
    pub label: String,
}

impl PartialEq for LanguageOption {
    fn eq(&self, other: &Self) -> bool {
        self.locale == other.locale
    }
}

impl fmt::Display for LanguageOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Runtime flags passed in from the CLI to tweak startup behavior.
#[derive(Debug, Default)]
pub struct Flags {
    /// Optional locale override in BCP-47 form (e.g. `fr`, `en-US`).
    pub lang: Option<String>,
    /// Optional prediction endpoint, overriding `[api] endpoint`.
    pub endpoint: Option<String>,
    /// Optional image path to preload as an upload.
    pub file_path: Option<PathBuf>,
    /// Optional config directory override (for settings.toml).
    /// Takes precedence over `MANGO_GRADER_CONFIG_DIR` environment variable.
    pub config_dir: Option<String>,
}
