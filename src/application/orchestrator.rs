// SPDX-License-Identifier: MPL-2.0
//! Prediction request orchestration.
//!
//! A submission runs in three steps so the UI can keep the network call off
//! its update loop:
//!
//! 1. [`PredictionOrchestrator::begin`] clears the previous outcome,
//!    validates the inputs and enters `Loading`.
//! 2. [`Submission::send`] performs the single request and interprets the
//!    response. It owns everything it needs and borrows nothing.
//! 3. [`PredictionOrchestrator::finish`] stores the outcome and leaves
//!    `Loading`, whatever the outcome was.
//!
//! [`PredictionOrchestrator::submit`] chains the three for callers that can
//! hold the orchestrator across an `.await`.
//!
//! # Overlapping submissions
//!
//! Every call to `begin` (and every [`report`](PredictionOrchestrator::report))
//! supersedes earlier attempts. Completions carry the ticket of the attempt
//! that produced them and are dropped by `finish` when that attempt is no
//! longer current, so the newest attempt always decides what is shown.

use crate::application::port::prediction::{ApiResponse, PredictionApi, PredictionForm};
use crate::domain::image::ImageFile;
use crate::domain::measurement::Measurements;
use crate::domain::prediction::{PredictionResult, RequestState};
use crate::error::GradingError;
use serde::Deserialize;
use std::future::Future;
use std::sync::Arc;

/// Identifies one submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// Wire shape of a successful response body.
#[derive(Debug, Deserialize)]
struct PredictionPayload {
    predicted_sweetness_brix: f64,
    defect_pct: f64,
    volume_cm3: f64,
    quality_grade: String,
}

impl From<PredictionPayload> for PredictionResult {
    fn from(payload: PredictionPayload) -> Self {
        PredictionResult {
            predicted_sweetness_brix: payload.predicted_sweetness_brix,
            defect_pct: payload.defect_pct,
            volume_cm3: payload.volume_cm3,
            quality_grade: payload.quality_grade,
        }
    }
}

/// Turns a raw response into a result or a user-facing error.
///
/// # Errors
///
/// - non-2xx status: `RequestFailed` with the body, or the status code when
///   the body is empty
/// - 2xx with a body that is not a prediction: `NetworkError`
pub fn interpret_response(response: ApiResponse) -> Result<PredictionResult, GradingError> {
    if !response.is_success() {
        return Err(GradingError::from_status(response.status, &response.body));
    }
    serde_json::from_str::<PredictionPayload>(&response.body)
        .map(PredictionResult::from)
        .map_err(|e| GradingError::network(format!("invalid prediction response: {e}")))
}

/// A validated request waiting to be sent.
#[derive(Debug, Clone)]
pub struct Submission {
    ticket: Ticket,
    form: PredictionForm,
}

impl Submission {
    #[must_use]
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    #[must_use]
    pub fn form(&self) -> &PredictionForm {
        &self.form
    }

    /// Sends the form once and interprets the answer.
    pub fn send(self, api: Arc<dyn PredictionApi>) -> impl Future<Output = Completion> + Send + 'static {
        let ticket = self.ticket;
        let request = api.predict(self.form);
        async move {
            let outcome = match request.await {
                Ok(response) => interpret_response(response),
                Err(err) => Err(GradingError::network(err.0)),
            };
            Completion { ticket, outcome }
        }
    }
}

/// Outcome of a sent [`Submission`].
#[derive(Debug, Clone)]
pub struct Completion {
    ticket: Ticket,
    outcome: Result<PredictionResult, GradingError>,
}

impl Completion {
    #[must_use]
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    #[must_use]
    pub fn outcome(&self) -> &Result<PredictionResult, GradingError> {
        &self.outcome
    }
}

/// Owner of the [`RequestState`] shown in the result panel.
#[derive(Debug, Default)]
pub struct PredictionOrchestrator {
    state: RequestState,
    issued: u64,
    in_flight: Option<Ticket>,
}

impl PredictionOrchestrator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &RequestState {
        &self.state
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Ticket of the request currently awaited, if any.
    #[must_use]
    pub fn in_flight(&self) -> Option<Ticket> {
        self.in_flight
    }

    /// Validates the inputs and enters `Loading`.
    ///
    /// The previous result or error is cleared first. Validation failures
    /// are stored as the new state and never enter `Loading`.
    ///
    /// # Errors
    ///
    /// `MissingImage` without a photo, `MissingMeasurements` when any field
    /// is empty.
    pub fn begin(
        &mut self,
        image: Option<&ImageFile>,
        measurements: &Measurements,
    ) -> Result<Submission, GradingError> {
        let ticket = self.supersede();

        let Some(image) = image else {
            return Err(self.fail(GradingError::MissingImage));
        };
        if !measurements.is_complete() {
            return Err(self.fail(GradingError::MissingMeasurements));
        }

        self.state = RequestState::Loading;
        self.in_flight = Some(ticket);
        tracing::info!(
            file = image.file_name(),
            bytes = image.len(),
            "submitting prediction request"
        );
        Ok(Submission {
            ticket,
            form: PredictionForm::new(image.clone(), measurements.clone()),
        })
    }

    /// Stores a completion and leaves `Loading`.
    ///
    /// Returns `false` (and changes nothing) when the completion belongs to
    /// a superseded attempt.
    pub fn finish(&mut self, completion: Completion) -> bool {
        if self.in_flight != Some(completion.ticket) {
            tracing::debug!(ticket = completion.ticket.0, "dropping superseded prediction");
            return false;
        }
        self.in_flight = None;
        self.state = match completion.outcome {
            Ok(result) => {
                tracing::info!(grade = %result.quality_grade, "prediction received");
                RequestState::Succeeded(result)
            }
            Err(err) => {
                tracing::warn!(error = %err, "prediction failed");
                RequestState::Failed(err)
            }
        };
        true
    }

    /// Shows an error raised outside a submission (camera, file reading).
    ///
    /// Replaces whatever was shown and supersedes an in-flight request.
    pub fn report(&mut self, error: GradingError) {
        self.supersede();
        tracing::warn!(error = %error, "reporting error");
        self.state = RequestState::Failed(error);
    }

    /// Runs a full submission: validate, send once, store the outcome.
    pub async fn submit(
        &mut self,
        image: Option<&ImageFile>,
        measurements: &Measurements,
        api: Arc<dyn PredictionApi>,
    ) -> &RequestState {
        if let Ok(submission) = self.begin(image, measurements) {
            let completion = submission.send(api).await;
            self.finish(completion);
        }
        &self.state
    }

    fn supersede(&mut self) -> Ticket {
        self.issued += 1;
        self.in_flight = None;
        self.state = RequestState::Idle;
        Ticket(self.issued)
    }

    fn fail(&mut self, error: GradingError) -> GradingError {
        tracing::debug!(error = %error, "submission rejected before sending");
        self.state = RequestState::Failed(error.clone());
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::port::prediction::TransportError;
    use futures_util::future::BoxFuture;
    use std::sync::Mutex;

    /// Records every form and answers with a canned response.
    struct StubApi {
        response: Result<ApiResponse, TransportError>,
        calls: Mutex<Vec<PredictionForm>>,
    }

    impl StubApi {
        fn answering(response: Result<ApiResponse, TransportError>) -> Arc<Self> {
            Arc::new(Self {
                response,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl PredictionApi for StubApi {
        fn predict(
            &self,
            form: PredictionForm,
        ) -> BoxFuture<'static, Result<ApiResponse, TransportError>> {
            self.calls.lock().unwrap().push(form);
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }

    const GRADE_A: &str = r#"{"predicted_sweetness_brix":18.5,"defect_pct":3.2,"volume_cm3":210.4,"quality_grade":"Grade A"}"#;

    fn photo() -> ImageFile {
        ImageFile::captured(vec![0xFF, 0xD8])
    }

    fn filled() -> Measurements {
        Measurements::new("120.5", "85.0", "70.2", "410.0")
    }

    #[tokio::test]
    async fn valid_input_sends_exactly_one_request_with_all_fields() {
        let api = StubApi::answering(Ok(ApiResponse::new(200, GRADE_A)));
        let mut orchestrator = PredictionOrchestrator::new();

        let state = orchestrator.submit(Some(&photo()), &filled(), api.clone()).await;
        assert!(matches!(state, RequestState::Succeeded(_)));

        let calls = api.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let names: Vec<_> = calls[0].field_names().collect();
        assert_eq!(
            names,
            ["image", "length_mm", "width_mm", "thickness_mm", "weight_g"]
        );
        assert_eq!(calls[0].measurements(), &filled());
    }

    #[tokio::test]
    async fn missing_image_never_reaches_network() {
        let api = StubApi::answering(Ok(ApiResponse::new(200, GRADE_A)));
        let mut orchestrator = PredictionOrchestrator::new();

        let state = orchestrator.submit(None, &filled(), api.clone()).await;
        assert_eq!(state, &RequestState::Failed(GradingError::MissingImage));
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn any_empty_field_is_missing_measurements() {
        let api = StubApi::answering(Ok(ApiResponse::new(200, GRADE_A)));
        let mut orchestrator = PredictionOrchestrator::new();

        for blank in 0..4 {
            let mut values = ["1", "2", "3", "4"];
            values[blank] = "";
            let measurements = Measurements::new(values[0], values[1], values[2], values[3]);
            let state = orchestrator.submit(Some(&photo()), &measurements, api.clone()).await;
            assert_eq!(state, &RequestState::Failed(GradingError::MissingMeasurements));
        }
        assert_eq!(api.call_count(), 0);
    }

    #[test]
    fn validation_failure_does_not_enter_loading() {
        let mut orchestrator = PredictionOrchestrator::new();
        let err = orchestrator.begin(None, &filled()).unwrap_err();
        assert_eq!(err, GradingError::MissingImage);
        assert!(!orchestrator.is_loading());
        assert!(orchestrator.in_flight().is_none());
    }

    #[test]
    fn begin_clears_previous_result_and_enters_loading() {
        let mut orchestrator = PredictionOrchestrator::new();
        orchestrator.report(GradingError::NetworkError("old".into()));

        let submission = orchestrator.begin(Some(&photo()), &filled()).unwrap();
        assert!(orchestrator.is_loading());
        assert_eq!(orchestrator.in_flight(), Some(submission.ticket()));
    }

    #[tokio::test]
    async fn success_body_is_stored_verbatim() {
        let api = StubApi::answering(Ok(ApiResponse::new(200, GRADE_A)));
        let mut orchestrator = PredictionOrchestrator::new();
        orchestrator.submit(Some(&photo()), &filled(), api).await;

        let result = orchestrator.state().result().expect("result stored");
        assert_eq!(result.quality_grade, "Grade A");
        assert_eq!(result.predicted_sweetness_brix, 18.5);
        assert_eq!(result.defect_pct, 3.2);
        assert_eq!(result.volume_cm3, 210.4);
        assert!(!orchestrator.is_loading());
    }

    #[tokio::test]
    async fn error_body_becomes_message() {
        let api = StubApi::answering(Ok(ApiResponse::new(500, "model unavailable")));
        let mut orchestrator = PredictionOrchestrator::new();
        let state = orchestrator.submit(Some(&photo()), &filled(), api).await;
        assert_eq!(
            state,
            &RequestState::Failed(GradingError::RequestFailed("model unavailable".into()))
        );
    }

    #[tokio::test]
    async fn empty_error_body_names_status() {
        let api = StubApi::answering(Ok(ApiResponse::new(503, "")));
        let mut orchestrator = PredictionOrchestrator::new();
        orchestrator.submit(Some(&photo()), &filled(), api).await;

        let err = orchestrator.state().error().expect("failed");
        assert!(matches!(err, GradingError::RequestFailed(_)));
        assert!(err.to_string().contains("503"));
        assert!(!orchestrator.is_loading());
    }

    #[tokio::test]
    async fn transport_failure_is_network_error() {
        let api = StubApi::answering(Err(TransportError("connection refused".into())));
        let mut orchestrator = PredictionOrchestrator::new();
        let state = orchestrator.submit(Some(&photo()), &filled(), api).await;
        assert_eq!(
            state,
            &RequestState::Failed(GradingError::NetworkError("connection refused".into()))
        );
    }

    #[tokio::test]
    async fn transport_failure_without_description_uses_fallback() {
        let api = StubApi::answering(Err(TransportError(String::new())));
        let mut orchestrator = PredictionOrchestrator::new();
        orchestrator.submit(Some(&photo()), &filled(), api).await;
        assert_eq!(
            orchestrator.state().error().map(ToString::to_string).as_deref(),
            Some(crate::error::GENERIC_NETWORK_ERROR)
        );
    }

    #[test]
    fn malformed_success_body_is_network_error() {
        let err = interpret_response(ApiResponse::new(200, "<html>")).unwrap_err();
        assert!(matches!(err, GradingError::NetworkError(msg) if msg.contains("invalid prediction response")));
    }

    #[test]
    fn extra_fields_in_success_body_are_ignored() {
        let body = r#"{"predicted_sweetness_brix":-1,"defect_pct":250,"volume_cm3":0,"quality_grade":"","model":"ann"}"#;
        let result = interpret_response(ApiResponse::new(200, body)).unwrap();
        assert_eq!(result.predicted_sweetness_brix, -1.0);
        assert_eq!(result.defect_pct, 250.0);
    }

    #[tokio::test]
    async fn superseded_completion_is_dropped() {
        let slow = StubApi::answering(Ok(ApiResponse::new(500, "stale")));
        let fast = StubApi::answering(Ok(ApiResponse::new(200, GRADE_A)));
        let mut orchestrator = PredictionOrchestrator::new();

        let first = orchestrator.begin(Some(&photo()), &filled()).unwrap();
        let second = orchestrator.begin(Some(&photo()), &filled()).unwrap();

        let second_done = second.send(fast).await;
        let first_done = first.send(slow).await;

        assert!(orchestrator.finish(second_done));
        assert!(!orchestrator.finish(first_done));
        assert_eq!(
            orchestrator.state().result().map(|r| r.quality_grade.as_str()),
            Some("Grade A")
        );
    }

    #[tokio::test]
    async fn report_supersedes_in_flight_request() {
        let api = StubApi::answering(Ok(ApiResponse::new(200, GRADE_A)));
        let mut orchestrator = PredictionOrchestrator::new();

        let submission = orchestrator.begin(Some(&photo()), &filled()).unwrap();
        orchestrator.report(GradingError::CameraUnavailable("busy".into()));
        let completion = submission.send(api).await;

        assert!(!orchestrator.finish(completion));
        assert_eq!(
            orchestrator.state(),
            &RequestState::Failed(GradingError::CameraUnavailable("busy".into()))
        );
    }
}
