// SPDX-License-Identifier: MPL-2.0
//! Update logic and message handlers for the application.

use super::message::LanguageOption;
use super::Message;
use crate::application::camera_session::{CameraSession, OpenOutcome};
use crate::application::image_source::{ImageAsset, ImageSource};
use crate::application::measurement_form::MeasurementForm;
use crate::application::orchestrator::{Completion, PredictionOrchestrator};
use crate::application::port::PredictionApi;
use crate::config::{self, Config};
use crate::error::GradingError;
use crate::i18n::fluent::I18n;
use crate::ui::{image_panel, measurement_panel};
use iced::widget::image;
use iced::{task, window, Task};
use std::path::PathBuf;
use std::sync::Arc;

/// Extensions offered by the file picker's image filter.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp", "heic", "heif"];

/// Mutable view of the application state handed to the handlers.
pub struct UpdateContext<'a> {
    pub i18n: &'a mut I18n,
    pub config: &'a mut Config,
    pub config_dir: Option<&'a PathBuf>,
    pub image_source: &'a mut ImageSource,
    pub camera: &'a mut CameraSession,
    pub viewfinder: &'a mut Option<image::Handle>,
    pub form: &'a mut MeasurementForm,
    pub orchestrator: &'a mut PredictionOrchestrator,
    pub api: &'a Arc<dyn PredictionApi>,
    pub in_flight: &'a mut Option<task::Handle>,
}

impl UpdateContext<'_> {
    fn abort_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }

    /// Shows a non-submission error, superseding any pending request.
    fn report(&mut self, error: GradingError) {
        self.abort_in_flight();
        self.orchestrator.report(error);
    }
}

// ==========================================================================
// Image source
// ==========================================================================

pub fn handle_image_panel_message(
    ctx: &mut UpdateContext<'_>,
    message: image_panel::Message,
) -> Task<Message> {
    match message {
        image_panel::Message::Upload => handle_open_file_dialog(ctx.i18n),
        image_panel::Message::ToggleCamera => handle_camera_toggle(ctx),
        image_panel::Message::Capture => handle_capture(ctx),
        image_panel::Message::Clear => {
            ctx.image_source.clear();
            Task::none()
        }
    }
}

pub fn handle_open_file_dialog(i18n: &I18n) -> Task<Message> {
    let dialog = rfd::AsyncFileDialog::new()
        .set_title(i18n.tr("dialog-title"))
        .add_filter(i18n.tr("dialog-image-filter"), IMAGE_EXTENSIONS)
        .add_filter(i18n.tr("dialog-all-files"), &["*"]);

    Task::perform(
        async move { dialog.pick_file().await.map(|h| h.path().to_path_buf()) },
        Message::OpenFileDialogResult,
    )
}

/// Reads a picked or dropped file off the UI thread.
pub fn read_image_file(path: PathBuf) -> Task<Message> {
    Task::perform(
        async move {
            let result = tokio::fs::read(&path).await.map_err(|e| e.to_string());
            (path, result)
        },
        |(path, result)| Message::ImageFileRead { path, result },
    )
}

pub fn handle_image_file_read(
    ctx: &mut UpdateContext<'_>,
    path: PathBuf,
    result: Result<Vec<u8>, String>,
) -> Task<Message> {
    match result {
        Ok(bytes) => {
            let asset = ctx.image_source.set_from_upload(&path, bytes);
            tracing::info!(
                file = asset.file().file_name(),
                mime = asset.file().mime_type(),
                "photo loaded"
            );
        }
        Err(reason) => {
            tracing::warn!(path = %path.display(), %reason, "could not read photo");
            ctx.report(GradingError::UnreadableImage(reason));
        }
    }
    Task::none()
}

// ==========================================================================
// Camera
// ==========================================================================

fn handle_camera_toggle(ctx: &mut UpdateContext<'_>) -> Task<Message> {
    match ctx.camera.toggle() {
        Some(request) => Task::perform(
            async move { tokio::task::spawn_blocking(move || request.open()).await },
            |joined| match joined {
                Ok(outcome) => Message::CameraOpened(outcome),
                Err(e) => Message::CameraTaskFailed(e.to_string()),
            },
        ),
        None => {
            *ctx.viewfinder = None;
            Task::none()
        }
    }
}

pub fn handle_camera_opened(ctx: &mut UpdateContext<'_>, outcome: OpenOutcome) -> Task<Message> {
    if let Err(err) = ctx.camera.finish_open(outcome) {
        ctx.report(err.into());
    }
    Task::none()
}

pub fn handle_camera_task_failed(ctx: &mut UpdateContext<'_>, reason: String) -> Task<Message> {
    // Only a pending open can still fail; otherwise the user moved on.
    if ctx.camera.is_opening() {
        ctx.camera.stop();
        ctx.report(GradingError::CameraUnavailable(reason));
    }
    Task::none()
}

/// Closes the camera and reports it when its stream has died.
fn check_camera_stream(ctx: &mut UpdateContext<'_>) -> bool {
    match ctx.camera.check_stream() {
        Ok(()) => true,
        Err(err) => {
            *ctx.viewfinder = None;
            ctx.report(err.into());
            false
        }
    }
}

pub fn handle_viewfinder_tick(ctx: &mut UpdateContext<'_>) -> Task<Message> {
    if !check_camera_stream(ctx) {
        return Task::none();
    }
    if let Some(frame) = ctx.camera.viewfinder_frame() {
        *ctx.viewfinder = Some(image::Handle::from_rgba(
            frame.width(),
            frame.height(),
            frame.rgba_bytes().to_vec(),
        ));
    }
    Task::none()
}

fn handle_capture(ctx: &mut UpdateContext<'_>) -> Task<Message> {
    if !check_camera_stream(ctx) {
        return Task::none();
    }
    let Some(snapshot) = ctx.camera.capture_frame() else {
        // No frame yet
        return Task::none();
    };
    ctx.camera.stop();
    *ctx.viewfinder = None;

    Task::perform(
        async move {
            tokio::task::spawn_blocking(move || snapshot.encode_jpeg().map_err(|e| e.to_string()))
                .await
                .map_err(|e| e.to_string())
                .and_then(|encoded| encoded)
        },
        Message::CaptureEncoded,
    )
}

pub fn handle_capture_encoded(
    ctx: &mut UpdateContext<'_>,
    result: Result<Vec<u8>, String>,
) -> Task<Message> {
    match result {
        Ok(jpeg) => {
            let asset: &ImageAsset = ctx.image_source.set_from_capture(jpeg);
            tracing::info!(bytes = asset.file().len(), "photo captured");
        }
        Err(reason) => ctx.report(GradingError::CameraUnavailable(reason)),
    }
    Task::none()
}

// ==========================================================================
// Measurements and submission
// ==========================================================================

pub fn handle_measurement_message(
    ctx: &mut UpdateContext<'_>,
    message: measurement_panel::Message,
) -> Task<Message> {
    match message {
        measurement_panel::Message::Edited(field, text) => {
            ctx.form.edit(field, text);
            Task::none()
        }
        measurement_panel::Message::Submitted => handle_submit(ctx),
    }
}

/// Starts a submission, aborting the one it supersedes.
pub fn handle_submit(ctx: &mut UpdateContext<'_>) -> Task<Message> {
    ctx.abort_in_flight();

    let image = ctx.image_source.current().map(ImageAsset::file);
    let Ok(submission) = ctx.orchestrator.begin(image, &ctx.form.snapshot()) else {
        return Task::none();
    };

    let (task, handle) =
        Task::perform(submission.send(Arc::clone(ctx.api)), Message::PredictionCompleted)
            .abortable();
    *ctx.in_flight = Some(handle);
    task
}

pub fn handle_prediction_completed(
    ctx: &mut UpdateContext<'_>,
    completion: Completion,
) -> Task<Message> {
    if ctx.orchestrator.finish(completion) {
        *ctx.in_flight = None;
    }
    Task::none()
}

// ==========================================================================
// Language and window
// ==========================================================================

pub fn handle_language_selected(
    ctx: &mut UpdateContext<'_>,
    option: LanguageOption,
) -> Task<Message> {
    ctx.i18n.set_locale(option.locale.clone());
    ctx.config.general.language = Some(option.locale.to_string());
    if let Err(err) = config::save_with_override(ctx.config, ctx.config_dir.cloned()) {
        tracing::warn!(error = %err, "could not save language preference");
    }
    Task::none()
}

/// Releases the camera, the pending request and the preview, then closes.
pub fn handle_window_close(ctx: &mut UpdateContext<'_>, window_id: window::Id) -> Task<Message> {
    tracing::debug!("tearing down before exit");
    ctx.abort_in_flight();
    ctx.camera.stop();
    *ctx.viewfinder = None;
    ctx.image_source.clear();
    window::close(window_id)
}
