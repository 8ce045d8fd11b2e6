// SPDX-License-Identifier: MPL-2.0
//! The four numeric measurement inputs.

use crate::application::measurement_form::MeasurementForm;
use crate::domain::measurement::MeasurementField;
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{sizing, spacing, typography};
use iced::widget::{column, row, text, text_input, Column};
use iced::{Alignment, Element, Length};

#[derive(Debug, Clone)]
pub enum Message {
    Edited(MeasurementField, String),
    /// Enter pressed in any field.
    Submitted,
}

pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub form: &'a MeasurementForm,
    pub enabled: bool,
}

pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let placeholder = ctx.i18n.tr("measurement-placeholder");

    let fields = MeasurementField::ALL.into_iter().fold(
        Column::new().spacing(spacing::XS),
        |col, field| {
            let mut input = text_input(&placeholder, ctx.form.value(field))
                .width(sizing::INPUT_WIDTH)
                .padding(spacing::XS);
            if ctx.enabled {
                input = input
                    .on_input(move |value| Message::Edited(field, value))
                    .on_submit(Message::Submitted);
            }

            col.push(
                row![
                    text(ctx.i18n.tr(field.i18n_key())).width(Length::Fill),
                    input,
                    text(field.unit()).size(typography::CAPTION).width(24.0),
                ]
                .spacing(spacing::XS)
                .align_y(Alignment::Center),
            )
        },
    );

    column![
        text(ctx.i18n.tr("section-measurements")).size(typography::TITLE_SM),
        fields,
    ]
    .spacing(spacing::SM)
    .into()
}
