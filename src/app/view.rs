// SPDX-License-Identifier: MPL-2.0
//! View rendering for the application.

use super::message::LanguageOption;
use super::Message;
use crate::application::camera_session::CameraState;
use crate::application::image_source::ImageAsset;
use crate::application::measurement_form::MeasurementForm;
use crate::domain::prediction::RequestState;
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::{image_panel, measurement_panel, result_panel, styles};
use iced::widget::{button, column, container, image, pick_list, row, scrollable, text};
use iced::{Alignment, Element, Length};

/// Context required to render the application view.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub asset: Option<&'a ImageAsset>,
    pub preview: Option<image::Handle>,
    pub camera: CameraState,
    pub viewfinder: Option<&'a image::Handle>,
    pub form: &'a MeasurementForm,
    pub state: &'a RequestState,
}

pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let i18n = ctx.i18n;
    let loading = ctx.state.is_loading();

    let photo = image_panel::view(image_panel::ViewContext {
        i18n,
        asset: ctx.asset,
        preview: ctx.preview,
        camera: ctx.camera,
        viewfinder: ctx.viewfinder,
    })
    .map(Message::ImagePanel);

    let measurements = measurement_panel::view(measurement_panel::ViewContext {
        i18n,
        form: ctx.form,
        enabled: !loading,
    })
    .map(Message::Measurements);

    let submit_label = if loading {
        i18n.tr("submit-loading")
    } else {
        i18n.tr("submit-button")
    };
    let submit = button(text(submit_label))
        .height(sizing::BUTTON_HEIGHT)
        .style(styles::button::primary)
        .on_press_maybe((!loading).then_some(Message::Submit));

    let inputs = container(
        column![photo, measurements, submit]
            .spacing(spacing::LG)
            .align_x(Alignment::Start),
    )
    .padding(spacing::MD)
    .width(Length::Fill)
    .style(styles::container::panel);

    let result = container(result_panel::view(ctx.state, i18n)).width(sizing::SIDEBAR_WIDTH);

    let content = column![
        header(i18n),
        row![inputs, result].spacing(spacing::MD),
    ]
    .spacing(spacing::MD)
    .padding(spacing::MD);

    scrollable(content).height(Length::Fill).into()
}

fn header(i18n: &I18n) -> Element<'_, Message> {
    let options: Vec<LanguageOption> = language_options(i18n);
    let selected = options
        .iter()
        .find(|option| &option.locale == i18n.current_locale())
        .cloned();

    row![
        text(i18n.tr("window-title"))
            .size(typography::TITLE_LG)
            .width(Length::Fill),
        text(i18n.tr("language-label")).size(typography::CAPTION),
        pick_list(options, selected, Message::LanguageSelected),
    ]
    .spacing(spacing::XS)
    .align_y(Alignment::Center)
    .into()
}

/// Picker entries, each labelled in its own language.
pub fn language_options(i18n: &I18n) -> Vec<LanguageOption> {
    i18n.available_locales
        .iter()
        .map(|locale| LanguageOption {
            locale: locale.clone(),
            label: i18n.tr(&format!("language-name-{locale}")),
        })
        .collect()
}
