// SPDX-License-Identifier: MPL-2.0
//! Prediction API adapter backed by `reqwest`.

use crate::application::port::{
    ApiResponse, PredictionApi, PredictionForm, TransportError, IMAGE_FIELD,
};
use futures_util::future::BoxFuture;
use reqwest::multipart::{Form, Part};
use std::time::Duration;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends grading forms as `multipart/form-data` `POST` requests.
#[derive(Debug, Clone)]
pub struct HttpPredictionApi {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpPredictionApi {
    /// Creates an adapter posting to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| TransportError(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Builds the five-part body. The image part carries its file name and type.
fn build_form(form: &PredictionForm) -> Result<Form, TransportError> {
    let image = form.image();
    let part = Part::bytes(image.bytes().to_vec())
        .file_name(image.file_name().to_string())
        .mime_str(image.mime_type())
        .map_err(|e| TransportError(e.to_string()))?;

    let multipart = form
        .measurements()
        .form_fields()
        .fold(Form::new().part(IMAGE_FIELD, part), |acc, (name, value)| {
            acc.text(name, value.to_string())
        });
    Ok(multipart)
}

impl PredictionApi for HttpPredictionApi {
    fn predict(
        &self,
        form: PredictionForm,
    ) -> BoxFuture<'static, Result<ApiResponse, TransportError>> {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        Box::pin(async move {
            let multipart = build_form(&form)?;
            tracing::debug!(
                %endpoint,
                file = form.image().file_name(),
                bytes = form.image().len(),
                "sending prediction request"
            );

            let response = client
                .post(&endpoint)
                .multipart(multipart)
                .send()
                .await
                .map_err(|e| TransportError(e.to_string()))?;

            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| TransportError(e.to_string()))?;
            tracing::debug!(status, "prediction response received");
            Ok(ApiResponse::new(status, body))
        })
    }
}
