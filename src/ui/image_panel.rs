// SPDX-License-Identifier: MPL-2.0
//! Photo controls: upload, camera toggle, capture, clear, and the preview or
//! live viewfinder.

use crate::application::camera_session::CameraState;
use crate::application::image_source::ImageAsset;
use crate::domain::image::ImageOrigin;
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::styles;
use iced::widget::{button, column, container, image, row, text};
use iced::{Alignment, ContentFit, Element, Length};

#[derive(Debug, Clone)]
pub enum Message {
    Upload,
    ToggleCamera,
    Capture,
    Clear,
}

pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub asset: Option<&'a ImageAsset>,
    /// Preview of `asset`, if the registry still holds one.
    pub preview: Option<image::Handle>,
    pub camera: CameraState,
    /// Latest viewfinder frame while the camera is open.
    pub viewfinder: Option<&'a image::Handle>,
}

pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let i18n = ctx.i18n;

    let camera_label = match ctx.camera {
        CameraState::Closed => i18n.tr("camera-open-button"),
        CameraState::Opening => i18n.tr("camera-opening"),
        CameraState::Open => i18n.tr("camera-close-button"),
    };
    let camera_button = button(text(camera_label)).on_press_maybe(
        (ctx.camera != CameraState::Opening).then_some(Message::ToggleCamera),
    );

    let mut controls = row![
        button(text(i18n.tr("upload-button"))).on_press(Message::Upload),
        camera_button,
    ]
    .spacing(spacing::XS);

    if ctx.camera == CameraState::Open {
        controls = controls.push(
            button(text(i18n.tr("capture-button")))
                .on_press(Message::Capture)
                .style(styles::button::primary),
        );
    }
    if ctx.asset.is_some() && ctx.camera == CameraState::Closed {
        controls = controls.push(button(text(i18n.tr("clear-image-button"))).on_press(Message::Clear));
    }

    let surface: Element<'_, Message> = match (ctx.camera, ctx.viewfinder, ctx.preview) {
        (CameraState::Open, Some(frame), _) => image(frame.clone())
            .content_fit(ContentFit::Contain)
            .height(sizing::PREVIEW_HEIGHT)
            .into(),
        (CameraState::Closed, _, Some(preview)) => image(preview)
            .content_fit(ContentFit::Contain)
            .height(sizing::PREVIEW_HEIGHT)
            .into(),
        _ => container(text(i18n.tr("image-none")).size(typography::CAPTION))
            .center(Length::Fill)
            .height(sizing::PREVIEW_HEIGHT)
            .into(),
    };

    let caption = ctx.asset.map(|asset| {
        let file = asset.file();
        let size = format_size(file.len());
        let label = match file.origin() {
            ImageOrigin::Capture => i18n.tr_with_args("image-captured", &[("size", size.as_str())]),
            ImageOrigin::Upload => i18n.tr_with_args(
                "image-uploaded",
                &[("name", file.file_name()), ("size", size.as_str())],
            ),
        };
        text(label).size(typography::CAPTION)
    });

    let mut panel = column![
        text(i18n.tr("section-photo")).size(typography::TITLE_SM),
        controls,
        container(surface).width(Length::Fill),
    ]
    .spacing(spacing::SM)
    .align_x(Alignment::Start);
    if let Some(caption) = caption {
        panel = panel.push(caption);
    }
    panel.into()
}

/// Formats a byte count for display.
#[must_use]
pub fn format_size(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    let value = bytes as f64;
    if value >= MIB {
        format!("{:.1} MB", value / MIB)
    } else if value >= KIB {
        format!("{:.1} KB", value / KIB)
    } else {
        format!("{bytes} B")
    }
}
