//! GeminiClassifier - gesture recognition over the Gemini REST API.
//!
//! One `generateContent` call per round: a fixed instruction text part plus
//! the captured frame as inline data. The model answers with a single token
//! that parses into a [`Detection`].

use crate::config;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use reqwest::{Client, StatusCode};
use roshambo_core::{Detection, Frame, GestureClassifier, Result, RoshamboError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const INSTRUCTION: &str = "Analyze the user's hand gesture in this image. The user is playing \
Rock, Paper, Scissors. Respond with only one of the following words based on the most prominent \
hand gesture you see: 'ROCK', 'PAPER', 'SCISSORS'. If you cannot clearly identify one of these \
three gestures, respond with 'NONE'.";

/// Classifier backed by the Gemini HTTP API.
///
/// Without an API key the classifier still constructs, but every call
/// answers `Unrecognized`; the game degrades instead of crashing.
#[derive(Clone)]
pub struct GeminiClassifier {
    client: Client,
    api_key: Option<String>,
    model: String,
}

impl GeminiClassifier {
    /// Creates a classifier with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: Some(api_key.into()),
            model: model.into(),
        }
    }

    /// Loads credentials from the environment (`GEMINI_API_KEY`) or the
    /// secret file. A missing key logs one warning and yields a disabled
    /// classifier.
    pub fn from_env() -> Self {
        match config::resolve_credentials() {
            Some(credentials) => {
                let model = credentials
                    .model_name
                    .unwrap_or_else(|| DEFAULT_MODEL.to_string());
                Self::new(credentials.api_key, model)
            }
            None => {
                warn!(
                    "{} is not set and no secret file was found; every gesture \
                     will be reported as unrecognized",
                    config::API_KEY_ENV
                );
                Self::disabled()
            }
        }
    }

    /// A classifier with no credential. Always answers `Unrecognized`.
    pub fn disabled() -> Self {
        Self {
            client: Client::new(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    fn build_request(frame: &Frame) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![
                    Part::Text {
                        text: INSTRUCTION.to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineDataPayload {
                            mime_type: frame.mime_type.clone(),
                            data: BASE64_STANDARD.encode(&frame.bytes),
                        },
                    },
                ],
            }],
        }
    }

    async fn send_request(&self, api_key: &str, body: &GenerateContentRequest) -> Result<String> {
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            BASE_URL,
            model = self.model,
        );

        let response = self
            .client
            .post(url)
            .timeout(REQUEST_TIMEOUT)
            .json(body)
            .send()
            .await
            .map_err(|err| RoshamboError::classifier(format!("Gemini request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|err| {
            RoshamboError::classifier(format!("Failed to parse Gemini response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl GestureClassifier for GeminiClassifier {
    async fn classify(&self, frame: &Frame) -> Result<Detection> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(Detection::Unrecognized);
        };

        let request = Self::build_request(frame);
        let answer = self.send_request(api_key, &request).await?;
        debug!(model = %self.model, answer = %answer.trim(), "gemini answered");
        Ok(Detection::from_token(&answer))
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineDataPayload,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineDataPayload {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String> {
    response
        .candidates
        .and_then(|mut candidates| candidates.pop())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .ok_or_else(|| {
            RoshamboError::classifier("Gemini API returned no text in the response candidates")
        })
}

fn map_http_error(status: StatusCode, body: String) -> RoshamboError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    RoshamboError::classifier(format!("Gemini API error ({status}): {message}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use roshambo_core::Gesture;

    #[tokio::test]
    async fn keyless_classifier_degrades_to_unrecognized() {
        let classifier = GeminiClassifier::disabled();
        assert!(!classifier.is_enabled());

        let frame = Frame::jpeg(vec![1, 2, 3]);
        let detection = classifier.classify(&frame).await.unwrap();
        assert_eq!(detection, Detection::Unrecognized);
    }

    #[test]
    fn request_body_carries_instruction_and_inline_image() {
        let frame = Frame::new(vec![0xde, 0xad], "image/png");
        let body = serde_json::to_value(GeminiClassifier::build_request(&frame)).unwrap();

        let parts = &body["contents"][0]["parts"];
        assert_eq!(body["contents"][0]["role"], "user");
        assert!(
            parts[0]["text"]
                .as_str()
                .unwrap()
                .contains("'ROCK', 'PAPER', 'SCISSORS'")
        );
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/png");
        assert_eq!(
            parts[1]["inlineData"]["data"],
            BASE64_STANDARD.encode([0xde, 0xad])
        );
    }

    #[test]
    fn response_text_is_extracted_from_the_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": " scissors\n"}]}}]}"#,
        )
        .unwrap();
        let text = extract_text_response(response).unwrap();
        assert_eq!(
            Detection::from_token(&text),
            Detection::Gesture(Gesture::Scissors)
        );
    }

    #[test]
    fn empty_candidates_are_a_classifier_error() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(extract_text_response(response).is_err());
    }

    #[test]
    fn http_errors_surface_the_service_status_and_message() {
        let body = r#"{"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#;
        let err = map_http_error(StatusCode::TOO_MANY_REQUESTS, body.to_string());
        let text = err.to_string();
        assert!(text.contains("RESOURCE_EXHAUSTED: Quota exceeded"));

        let err = map_http_error(StatusCode::BAD_GATEWAY, "not json".to_string());
        assert!(err.to_string().contains("not json"));
    }
}
