// SPDX-License-Identifier: MPL-2.0
//! Prediction results and the request lifecycle that produces them.

use crate::error::GradingError;

/// Quality metrics returned by the prediction API.
///
/// Stored exactly as received: no range check, rounding or unit conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    /// Predicted sweetness in degrees Brix.
    pub predicted_sweetness_brix: f64,
    /// Share of the surface with defects, in percent.
    pub defect_pct: f64,
    /// Estimated volume in cubic centimetres.
    pub volume_cm3: f64,
    /// Grade label chosen by the model (e.g. "Grade A").
    pub quality_grade: String,
}

/// State of the latest grading attempt.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState {
    /// Nothing submitted yet, or the last attempt was cleared.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The latest request returned a result.
    Succeeded(PredictionResult),
    /// The latest attempt failed; holds the single message to show.
    Failed(GradingError),
}

impl RequestState {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    #[must_use]
    pub fn result(&self) -> Option<&PredictionResult> {
        match self {
            RequestState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&GradingError> {
        match self {
            RequestState::Failed(error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_idle() {
        let state = RequestState::default();
        assert_eq!(state, RequestState::Idle);
        assert!(!state.is_loading());
        assert!(state.result().is_none());
        assert!(state.error().is_none());
    }

    #[test]
    fn accessors_expose_payloads() {
        let result = PredictionResult {
            predicted_sweetness_brix: 14.0,
            defect_pct: 1.0,
            volume_cm3: 300.0,
            quality_grade: "Grade B".into(),
        };
        let ok = RequestState::Succeeded(result.clone());
        assert_eq!(ok.result(), Some(&result));

        let failed = RequestState::Failed(GradingError::MissingImage);
        assert_eq!(failed.error(), Some(&GradingError::MissingImage));
    }
}
