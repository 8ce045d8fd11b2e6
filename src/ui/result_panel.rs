// SPDX-License-Identifier: MPL-2.0
//! Result panel: the prompt, progress text, error banner or grading result.

use crate::domain::prediction::{PredictionResult, RequestState};
use crate::error::GradingError;
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{spacing, typography};
use crate::ui::styles;
use iced::widget::{column, container, row, text, Column};
use iced::{Alignment, Element, Length};

/// One labelled value of a successful prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub label_key: &'static str,
    pub value: String,
}

/// What the panel shows for a given [`RequestState`].
#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    Prompt,
    Loading,
    Error(GradingError),
    Graded { grade: String, metrics: Vec<Metric> },
}

impl ResultView {
    #[must_use]
    pub fn project(state: &RequestState) -> Self {
        match state {
            RequestState::Idle => ResultView::Prompt,
            RequestState::Loading => ResultView::Loading,
            RequestState::Failed(error) => ResultView::Error(error.clone()),
            RequestState::Succeeded(result) => ResultView::graded(result),
        }
    }

    fn graded(result: &PredictionResult) -> Self {
        ResultView::Graded {
            grade: result.quality_grade.clone(),
            metrics: vec![
                Metric {
                    label_key: "result-sweetness",
                    value: format_brix(result.predicted_sweetness_brix),
                },
                Metric {
                    label_key: "result-defect",
                    value: format_percent(result.defect_pct),
                },
                Metric {
                    label_key: "result-volume",
                    value: format_volume(result.volume_cm3),
                },
            ],
        }
    }
}

#[must_use]
pub fn format_brix(value: f64) -> String {
    format!("{value:.2} °Brix")
}

#[must_use]
pub fn format_percent(value: f64) -> String {
    format!("{value:.2} %")
}

#[must_use]
pub fn format_volume(value: f64) -> String {
    format!("{value:.1} cm³")
}

pub fn view<'a, Message: 'a>(state: &RequestState, i18n: &I18n) -> Element<'a, Message> {
    let title = text(i18n.tr("result-title")).size(typography::TITLE_SM);

    let body: Element<'a, Message> = match ResultView::project(state) {
        ResultView::Prompt => text(i18n.tr("result-prompt")).size(typography::BODY).into(),
        ResultView::Loading => text(i18n.tr("result-loading")).size(typography::BODY).into(),
        ResultView::Error(error) => container(text(i18n.error_message(&error)))
            .padding(spacing::SM)
            .width(Length::Fill)
            .style(styles::container::error_banner)
            .into(),
        ResultView::Graded { grade, metrics } => {
            let badge = container(
                column![
                    text(i18n.tr("result-grade")).size(typography::CAPTION),
                    text(grade).size(typography::TITLE_LG),
                ]
                .align_x(Alignment::Center),
            )
            .padding(spacing::SM)
            .style(styles::container::grade_badge);

            let rows = metrics.into_iter().fold(
                Column::new().spacing(spacing::XS),
                |col, metric| {
                    col.push(
                        row![
                            text(i18n.tr(metric.label_key)).width(Length::Fill),
                            text(metric.value),
                        ]
                        .spacing(spacing::SM),
                    )
                },
            );

            column![badge, rows]
                .spacing(spacing::MD)
                .align_x(Alignment::Center)
                .into()
        }
    };

    container(column![title, body].spacing(spacing::SM))
        .padding(spacing::MD)
        .width(Length::Fill)
        .style(styles::container::panel)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grade_a() -> PredictionResult {
        PredictionResult {
            predicted_sweetness_brix: 18.5,
            defect_pct: 3.2,
            volume_cm3: 210.4,
            quality_grade: "Grade A".to_string(),
        }
    }

    #[test]
    fn idle_projects_to_prompt() {
        assert_eq!(ResultView::project(&RequestState::Idle), ResultView::Prompt);
    }

    #[test]
    fn loading_projects_to_progress() {
        assert_eq!(
            ResultView::project(&RequestState::Loading),
            ResultView::Loading
        );
    }

    #[test]
    fn success_is_formatted_with_units() {
        let view = ResultView::project(&RequestState::Succeeded(grade_a()));
        let ResultView::Graded { grade, metrics } = view else {
            panic!("expected a graded view");
        };
        assert_eq!(grade, "Grade A");
        let values: Vec<_> = metrics.iter().map(|m| m.value.as_str()).collect();
        assert_eq!(values, ["18.50 °Brix", "3.20 %", "210.4 cm³"]);
    }

    #[test]
    fn failure_carries_the_error() {
        let error = GradingError::RequestFailed("model unavailable".into());
        assert_eq!(
            ResultView::project(&RequestState::Failed(error.clone())),
            ResultView::Error(error)
        );
    }

    #[test]
    fn volume_rounds_to_one_decimal() {
        assert_eq!(format_volume(99.96), "100.0 cm³");
        assert_eq!(format_brix(12.0), "12.00 °Brix");
    }
}
