// SPDX-License-Identifier: MPL-2.0
//! Application root state and the wiring between panels, the application
//! layer and the adapters.
//!
//! The `App` struct owns the photo, the camera session, the measurement form
//! and the prediction orchestrator, and translates messages into side effects
//! like device opening, file reading, network requests or config persistence.

mod message;
pub mod paths;
mod subscription;
mod update;
mod view;

pub use message::{Flags, LanguageOption, Message};
pub use update::IMAGE_EXTENSIONS;

use crate::application::camera_session::CameraSession;
use crate::application::image_source::ImageSource;
use crate::application::measurement_form::MeasurementForm;
use crate::application::orchestrator::PredictionOrchestrator;
use crate::application::port::{
    ApiResponse, CaptureDevice, PredictionApi, PredictionForm, PreviewRegistry, TransportError,
};
use crate::config::{self, Config};
use crate::i18n::fluent::I18n;
use crate::infrastructure::{self, HttpPredictionApi, PreviewStore};
use futures_util::future::BoxFuture;
use iced::widget::image;
use iced::{task, window, Element, Subscription, Task, Theme};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

pub const WINDOW_DEFAULT_HEIGHT: u32 = 720;
pub const WINDOW_DEFAULT_WIDTH: u32 = 960;
pub const MIN_WINDOW_HEIGHT: u32 = 560;
pub const MIN_WINDOW_WIDTH: u32 = 720;

/// The adapters the application talks to.
pub struct Services {
    pub api: Arc<dyn PredictionApi>,
    pub camera: Arc<dyn CaptureDevice>,
    pub previews: Arc<PreviewStore>,
}

/// Root Iced application state.
pub struct App {
    pub i18n: I18n,
    config: Config,
    /// Explicit settings directory; `None` resolves through [`paths`].
    config_dir: Option<PathBuf>,
    previews: Arc<PreviewStore>,
    image_source: ImageSource,
    camera: CameraSession,
    viewfinder: Option<image::Handle>,
    form: MeasurementForm,
    orchestrator: PredictionOrchestrator,
    api: Arc<dyn PredictionApi>,
    in_flight: Option<task::Handle>,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("image_source", &self.image_source)
            .field("camera", &self.camera)
            .field("state", self.orchestrator.state())
            .finish()
    }
}

/// Builds the window settings.
///
/// Closing is handled by the app so the camera and previews are released
/// before the window goes away.
pub fn window_settings() -> window::Settings {
    window::Settings {
        size: iced::Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
        min_size: Some(iced::Size::new(
            MIN_WINDOW_WIDTH as f32,
            MIN_WINDOW_HEIGHT as f32,
        )),
        exit_on_close_request: false,
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    // iced 0.14 requires an `Fn` boot closure; flags are consumed once.
    let boot_state = RefCell::new(Some(flags));
    let boot = move || {
        let flags = boot_state.borrow_mut().take().unwrap_or_default();
        App::new(flags)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

impl App {
    /// Loads settings, builds the adapters and optionally preloads a photo.
    fn new(flags: Flags) -> (Self, Task<Message>) {
        let (config, config_warning) = config::load();
        if let Some(key) = config_warning {
            tracing::warn!(key, "settings not loaded");
        }

        let endpoint = flags
            .endpoint
            .clone()
            .unwrap_or_else(|| config.api.endpoint().to_string());
        let api: Arc<dyn PredictionApi> = match HttpPredictionApi::new(endpoint) {
            Ok(api) => {
                tracing::info!(endpoint = api.endpoint(), "prediction endpoint");
                Arc::new(api)
            }
            Err(err) => {
                tracing::error!(error = %err, "HTTP client unavailable");
                Arc::new(OfflineApi(err.0))
            }
        };

        let services = Services {
            api,
            camera: infrastructure::default_device(&config.camera),
            previews: Arc::new(PreviewStore::new()),
        };
        let i18n = I18n::new(flags.lang.clone(), &config);
        let app = Self::with_services(i18n, config, None, services);

        let task = match flags.file_path {
            Some(path) => update::read_image_file(path),
            None => Task::none(),
        };
        (app, task)
    }

    /// Assembles the application around the given adapters.
    pub fn with_services(
        i18n: I18n,
        config: Config,
        config_dir: Option<PathBuf>,
        services: Services,
    ) -> Self {
        let registry: Arc<dyn PreviewRegistry> = services.previews.clone();
        let camera = CameraSession::new(services.camera).with_jpeg_quality(config.camera.jpeg_quality());
        Self {
            i18n,
            config,
            config_dir,
            previews: services.previews,
            image_source: ImageSource::new(registry),
            camera,
            viewfinder: None,
            form: MeasurementForm::new(),
            orchestrator: PredictionOrchestrator::new(),
            api: services.api,
            in_flight: None,
        }
    }

    fn title(&self) -> String {
        self.i18n.tr("window-title")
    }

    fn theme(&self) -> Theme {
        Theme::Light
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            subscription::create_event_subscription(),
            subscription::create_viewfinder_subscription(self.camera.is_open()),
        ])
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        let mut ctx = update::UpdateContext {
            i18n: &mut self.i18n,
            config: &mut self.config,
            config_dir: self.config_dir.as_ref(),
            image_source: &mut self.image_source,
            camera: &mut self.camera,
            viewfinder: &mut self.viewfinder,
            form: &mut self.form,
            orchestrator: &mut self.orchestrator,
            api: &self.api,
            in_flight: &mut self.in_flight,
        };

        match message {
            Message::ImagePanel(panel_message) => {
                update::handle_image_panel_message(&mut ctx, panel_message)
            }
            Message::Measurements(panel_message) => {
                update::handle_measurement_message(&mut ctx, panel_message)
            }
            Message::Submit => update::handle_submit(&mut ctx),
            Message::OpenFileDialogResult(Some(path)) | Message::FileDropped(path) => {
                update::read_image_file(path)
            }
            // User cancelled the dialog
            Message::OpenFileDialogResult(None) => Task::none(),
            Message::ImageFileRead { path, result } => {
                update::handle_image_file_read(&mut ctx, path, result)
            }
            Message::CameraOpened(outcome) => update::handle_camera_opened(&mut ctx, outcome),
            Message::CameraTaskFailed(reason) => update::handle_camera_task_failed(&mut ctx, reason),
            Message::ViewfinderTick(_instant) => update::handle_viewfinder_tick(&mut ctx),
            Message::CaptureEncoded(result) => update::handle_capture_encoded(&mut ctx, result),
            Message::PredictionCompleted(completion) => {
                update::handle_prediction_completed(&mut ctx, completion)
            }
            Message::LanguageSelected(option) => update::handle_language_selected(&mut ctx, option),
            Message::WindowCloseRequested(window_id) => {
                update::handle_window_close(&mut ctx, window_id)
            }
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let asset = self.image_source.current();
        view::view(view::ViewContext {
            i18n: &self.i18n,
            asset,
            preview: asset.and_then(|asset| self.previews.handle(asset.preview_id())),
            camera: self.camera.state(),
            viewfinder: self.viewfinder.as_ref(),
            form: &self.form,
            state: self.orchestrator.state(),
        })
    }
}

/// Stand-in used when the HTTP client cannot be built; every request fails
/// with the construction error.
struct OfflineApi(String);

impl PredictionApi for OfflineApi {
    fn predict(&self, _form: PredictionForm) -> BoxFuture<'static, Result<ApiResponse, TransportError>> {
        let reason = self.0.clone();
        Box::pin(async move { Err(TransportError(reason)) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::camera_session::CameraState;
    use crate::application::port::{CameraError, Facing, VideoStream};
    use crate::domain::image::{Frame, CAPTURED_FILE_NAME};
    use crate::domain::measurement::MeasurementField;
    use crate::domain::prediction::RequestState;
    use crate::error::GradingError;
    use crate::ui::{image_panel, measurement_panel};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    #[derive(Default)]
    struct CountingApi {
        calls: AtomicUsize,
    }

    impl PredictionApi for CountingApi {
        fn predict(
            &self,
            _form: PredictionForm,
        ) -> BoxFuture<'static, Result<ApiResponse, TransportError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Ok(ApiResponse::new(503, "")) })
        }
    }

    struct SolidStream;

    impl VideoStream for SolidStream {
        fn resolution(&self) -> Option<(u32, u32)> {
            Some((4, 2))
        }

        fn latest_frame(&mut self) -> Option<Frame> {
            Frame::from_rgba(4, 2, vec![200; 4 * 2 * 4])
        }

        fn stop(&mut self) {}
    }

    struct SolidCamera;

    impl CaptureDevice for SolidCamera {
        fn open(&self, _facing: Facing) -> Result<Box<dyn VideoStream>, CameraError> {
            Ok(Box::new(SolidStream))
        }
    }

    struct BusyCamera;

    impl CaptureDevice for BusyCamera {
        fn open(&self, _facing: Facing) -> Result<Box<dyn VideoStream>, CameraError> {
            Err(CameraError::Device("busy".into()))
        }
    }

    struct DeadStream;

    impl VideoStream for DeadStream {
        fn resolution(&self) -> Option<(u32, u32)> {
            Some((4, 2))
        }

        fn latest_frame(&mut self) -> Option<Frame> {
            None
        }

        fn failure(&self) -> Option<CameraError> {
            Some(CameraError::Device("stream ended".into()))
        }

        fn stop(&mut self) {}
    }

    struct DyingCamera;

    impl CaptureDevice for DyingCamera {
        fn open(&self, _facing: Facing) -> Result<Box<dyn VideoStream>, CameraError> {
            Ok(Box::new(DeadStream))
        }
    }

    fn test_app(config_dir: Option<PathBuf>) -> (App, Arc<CountingApi>, Arc<PreviewStore>) {
        test_app_with_camera(config_dir, Arc::new(SolidCamera))
    }

    fn test_app_with_camera(
        config_dir: Option<PathBuf>,
        camera: Arc<dyn CaptureDevice>,
    ) -> (App, Arc<CountingApi>, Arc<PreviewStore>) {
        let api = Arc::new(CountingApi::default());
        let previews = Arc::new(PreviewStore::new());
        let services = Services {
            api: api.clone(),
            camera,
            previews: previews.clone(),
        };
        let i18n = I18n::new(Some("en-US".into()), &Config::default());
        let app = App::with_services(i18n, Config::default(), config_dir, services);
        (app, api, previews)
    }

    fn load_photo(app: &mut App) {
        let _ = app.update(Message::ImageFileRead {
            path: PathBuf::from("mango.png"),
            result: Ok(vec![1, 2, 3]),
        });
    }

    fn fill_measurements(app: &mut App) {
        for field in MeasurementField::ALL {
            let _ = app.update(Message::Measurements(measurement_panel::Message::Edited(
                field,
                "12.5".into(),
            )));
        }
    }

    #[test]
    fn new_app_starts_idle_without_photo() {
        let (app, _, _) = test_app(None);
        assert!(!app.image_source.has_image());
        assert_eq!(app.orchestrator.state(), &RequestState::Idle);
        assert_eq!(app.camera.state(), CameraState::Closed);
    }

    #[test]
    fn submit_without_photo_shows_missing_image_and_sends_nothing() {
        let (mut app, api, _) = test_app(None);
        fill_measurements(&mut app);

        let _ = app.update(Message::Submit);

        assert_eq!(
            app.orchestrator.state(),
            &RequestState::Failed(GradingError::MissingImage)
        );
        assert!(app.in_flight.is_none());
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn submit_with_everything_enters_loading() {
        let (mut app, _, _) = test_app(None);
        load_photo(&mut app);
        fill_measurements(&mut app);

        let _ = app.update(Message::Submit);

        assert!(app.orchestrator.is_loading());
        assert!(app.in_flight.is_some());
    }

    #[test]
    fn non_decimal_measurement_is_rejected() {
        let (mut app, _, _) = test_app(None);
        let _ = app.update(Message::Measurements(measurement_panel::Message::Edited(
            MeasurementField::Weight,
            "12a".into(),
        )));
        assert_eq!(app.form.value(MeasurementField::Weight), "");
    }

    #[test]
    fn unreadable_file_is_reported() {
        let (mut app, _, _) = test_app(None);
        let _ = app.update(Message::ImageFileRead {
            path: PathBuf::from("/missing.jpg"),
            result: Err("No such file or directory".into()),
        });
        assert!(matches!(
            app.orchestrator.state(),
            RequestState::Failed(GradingError::UnreadableImage(_))
        ));
        assert!(!app.image_source.has_image());
    }

    #[test]
    fn replacing_photo_keeps_one_live_preview() {
        let (mut app, _, previews) = test_app(None);
        for name in ["a.jpg", "b.jpg", "c.jpg"] {
            let _ = app.update(Message::ImageFileRead {
                path: PathBuf::from(name),
                result: Ok(vec![0xFF, 0xD8]),
            });
        }
        assert_eq!(previews.live_count(), 1);
        assert_eq!(
            app.image_source.current().map(|a| a.file().file_name()),
            Some("c.jpg")
        );

        let _ = app.update(Message::ImagePanel(image_panel::Message::Clear));
        assert_eq!(previews.live_count(), 0);
    }

    #[test]
    fn captured_photo_becomes_current_upload() {
        let (mut app, _, _) = test_app(None);
        let _ = app.update(Message::CaptureEncoded(Ok(vec![0xFF, 0xD8, 0xFF])));
        assert_eq!(
            app.image_source.current().map(|a| a.file().file_name()),
            Some(CAPTURED_FILE_NAME)
        );
    }

    #[test]
    fn capture_while_closed_does_nothing() {
        let (mut app, _, _) = test_app(None);
        let _ = app.update(Message::ImagePanel(image_panel::Message::Capture));
        assert!(!app.image_source.has_image());
        assert_eq!(app.orchestrator.state(), &RequestState::Idle);
    }

    #[test]
    fn opened_camera_feeds_viewfinder() {
        let (mut app, _, _) = test_app(None);
        let request = app.camera.start().expect("closed session starts");
        let _ = app.update(Message::CameraOpened(request.open()));
        assert_eq!(app.camera.state(), CameraState::Open);

        let _ = app.update(Message::ViewfinderTick(std::time::Instant::now()));
        assert!(app.viewfinder.is_some());

        let _ = app.update(Message::ImagePanel(image_panel::Message::ToggleCamera));
        assert_eq!(app.camera.state(), CameraState::Closed);
        assert!(app.viewfinder.is_none());
    }

    #[test]
    fn camera_task_failure_is_reported_and_closes_session() {
        let (mut app, _, _) = test_app(None);
        let _ = app.camera.start();
        let _ = app.update(Message::CameraTaskFailed("panicked".into()));
        assert_eq!(app.camera.state(), CameraState::Closed);
        assert!(matches!(
            app.orchestrator.state(),
            RequestState::Failed(GradingError::CameraUnavailable(_))
        ));
    }

    #[test]
    fn camera_failure_after_close_leaves_submission_running() {
        let (mut app, _, _) = test_app_with_camera(None, Arc::new(BusyCamera));
        let request = app.camera.start().expect("closed session starts");
        let _ = app.update(Message::ImagePanel(image_panel::Message::ToggleCamera));
        assert_eq!(app.camera.state(), CameraState::Closed);

        load_photo(&mut app);
        fill_measurements(&mut app);
        let _ = app.update(Message::Submit);
        assert!(app.orchestrator.is_loading());

        let _ = app.update(Message::CameraOpened(request.open()));

        assert!(app.orchestrator.is_loading());
        assert!(app.in_flight.is_some());
        assert_eq!(app.camera.state(), CameraState::Closed);
    }

    #[test]
    fn current_camera_failure_is_reported() {
        let (mut app, _, _) = test_app_with_camera(None, Arc::new(BusyCamera));
        let request = app.camera.start().expect("closed session starts");
        let _ = app.update(Message::CameraOpened(request.open()));
        assert_eq!(
            app.orchestrator.state(),
            &RequestState::Failed(GradingError::CameraUnavailable("device error: busy".into()))
        );
    }

    #[test]
    fn late_task_failure_after_close_is_ignored() {
        let (mut app, _, _) = test_app(None);
        let _ = app.camera.start();
        let _ = app.update(Message::ImagePanel(image_panel::Message::ToggleCamera));
        let _ = app.update(Message::CameraTaskFailed("cancelled".into()));
        assert_eq!(app.orchestrator.state(), &RequestState::Idle);
    }

    #[test]
    fn dead_stream_is_reported_on_next_tick() {
        let (mut app, _, _) = test_app_with_camera(None, Arc::new(DyingCamera));
        let request = app.camera.start().expect("closed session starts");
        let _ = app.update(Message::CameraOpened(request.open()));
        assert_eq!(app.camera.state(), CameraState::Open);

        let _ = app.update(Message::ViewfinderTick(std::time::Instant::now()));

        assert_eq!(app.camera.state(), CameraState::Closed);
        assert!(app.viewfinder.is_none());
        assert!(matches!(
            app.orchestrator.state(),
            RequestState::Failed(GradingError::CameraUnavailable(_))
        ));
    }

    #[test]
    fn capture_from_dead_stream_is_reported() {
        let (mut app, _, _) = test_app_with_camera(None, Arc::new(DyingCamera));
        let request = app.camera.start().expect("closed session starts");
        let _ = app.update(Message::CameraOpened(request.open()));

        let _ = app.update(Message::ImagePanel(image_panel::Message::Capture));

        assert_eq!(app.camera.state(), CameraState::Closed);
        assert!(!app.image_source.has_image());
        assert!(matches!(
            app.orchestrator.state(),
            RequestState::Failed(GradingError::CameraUnavailable(_))
        ));
    }

    #[test]
    fn language_switch_is_persisted() {
        let dir = tempdir().expect("temp dir");
        let (mut app, _, _) = test_app(Some(dir.path().to_path_buf()));
        let french = LanguageOption {
            locale: "fr".parse().unwrap(),
            label: "Français".into(),
        };

        let _ = app.update(Message::LanguageSelected(french));

        assert_eq!(app.i18n.current_locale().to_string(), "fr");
        let (saved, warning) = config::load_with_override(Some(dir.path().to_path_buf()));
        assert!(warning.is_none());
        assert_eq!(saved.general.language.as_deref(), Some("fr"));
    }

    #[test]
    fn window_close_releases_camera_and_preview() {
        let (mut app, _, previews) = test_app(None);
        let _ = app.update(Message::ImageFileRead {
            path: PathBuf::from("mango.jpg"),
            result: Ok(vec![1]),
        });
        let request = app.camera.start().expect("closed session starts");
        let _ = app.update(Message::CameraOpened(request.open()));

        let _ = app.update(Message::WindowCloseRequested(window::Id::unique()));

        assert_eq!(app.camera.state(), CameraState::Closed);
        assert_eq!(previews.live_count(), 0);
    }
}
