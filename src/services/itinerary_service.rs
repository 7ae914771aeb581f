use std::collections::VecDeque;
use std::error::Error;
use std::fmt;

use futures::stream::{self, BoxStream, StreamExt};
use log::{error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::models::trip::TripRequest;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const GEMINI_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug)]
pub enum GenerationError {
    HttpError(reqwest::Error),
    EndpointError(url::ParseError),
    ApiResponseError { status_code: u16, message: String },
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::HttpError(err) => write!(f, "HTTP error: {}", err),
            GenerationError::EndpointError(err) => write!(f, "Endpoint error: {}", err),
            GenerationError::ApiResponseError {
                status_code,
                message,
            } => write!(f, "Generation API error {}: {}", status_code, message),
        }
    }
}

impl Error for GenerationError {}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        GenerationError::HttpError(err)
    }
}

impl From<url::ParseError> for GenerationError {
    fn from(err: url::ParseError) -> Self {
        GenerationError::EndpointError(err)
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ChunkContent>,
}

#[derive(Debug, Deserialize)]
struct ChunkContent {
    #[serde(default)]
    parts: Vec<ChunkPart>,
}

#[derive(Debug, Deserialize)]
struct ChunkPart {
    text: Option<String>,
}

/// Client for the Gemini `streamGenerateContent` endpoint.
///
/// One call per render cycle; the returned stream is finite and not
/// restartable. Dropping the stream closes the underlying response.
pub struct ItineraryService {
    http_client: Client,
    base_url: Url,
    api_key: String,
}

impl ItineraryService {
    pub fn new(api_key: &str) -> Self {
        Self::with_base_url(
            api_key,
            Url::parse(GEMINI_BASE_URL).expect("valid Gemini base URL"),
        )
    }

    /// Point the client at a different host (used by tests).
    pub fn with_base_url(api_key: &str, base_url: Url) -> Self {
        Self {
            http_client: Client::new(),
            base_url,
            api_key: api_key.to_string(),
        }
    }

    /// Prompt template mirroring the travel-companion form fields. The
    /// duration always appears as the exact (clamped) integer.
    pub fn build_prompt(request: &TripRequest) -> String {
        format!(
            "Create a detailed {}-day itinerary for {} to {} with a total budget of ₹{}.",
            request.clamped_duration_days(),
            request.travelers.as_str(),
            request.destination,
            request.budget_value()
        )
    }

    /// Issue one streamed generation request and expose the response as a lazy
    /// sequence of text fragments in arrival order.
    ///
    /// A failure after the stream has started is reported as an `Err` item;
    /// fragments already yielded are not rolled back.
    pub async fn generate(
        &self,
        request: &TripRequest,
    ) -> Result<BoxStream<'static, Result<String, GenerationError>>, GenerationError> {
        let prompt = Self::build_prompt(request);
        info!(
            "Requesting itinerary stream: {} days in {}",
            request.clamped_duration_days(),
            request.destination
        );

        let url = self.base_url.join(&format!(
            "/v1beta/models/{}:streamGenerateContent",
            GEMINI_MODEL
        ))?;
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .http_client
            .post(url)
            .query(&[("alt", "sse"), ("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!("Generation request rejected with status {}", status);
            return Err(GenerationError::ApiResponseError {
                status_code: status.as_u16(),
                message,
            });
        }

        let state = (response.bytes_stream(), SseParser::new(), VecDeque::new());
        let fragments =
            stream::try_unfold(state, |(mut bytes, mut parser, mut pending)| async move {
                loop {
                    if let Some(fragment) = pending.pop_front() {
                        return Ok(Some((fragment, (bytes, parser, pending))));
                    }
                    match bytes.next().await {
                        Some(Ok(chunk)) => {
                            for payload in parser.feed(&chunk) {
                                if let Some(text) = fragment_from_payload(&payload) {
                                    pending.push_back(text);
                                }
                            }
                        }
                        Some(Err(err)) => return Err(GenerationError::from(err)),
                        None => return Ok(None),
                    }
                }
            });

        Ok(fragments.boxed())
    }
}

/// Incremental parser for the `data:`-framed server-sent event lines Gemini
/// emits with `alt=sse`. Bytes are buffered until a full line is available, so
/// multi-byte characters split across network chunks survive intact.
struct SseParser {
    buffer: Vec<u8>,
}

impl SseParser {
    fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Feed one network chunk; returns the complete `data:` payloads it closed.
    fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut payloads = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end_matches(['\n', '\r']);
            if let Some(data) = line.strip_prefix("data:") {
                let data = data.trim();
                if !data.is_empty() {
                    payloads.push(data.to_string());
                }
            }
        }
        payloads
    }
}

/// Extract the concatenated text of the first candidate in one SSE payload.
/// Payloads without text (metadata-only chunks, `[DONE]` markers) yield `None`.
fn fragment_from_payload(payload: &str) -> Option<String> {
    let chunk: StreamChunk = serde_json::from_str(payload).ok()?;
    let content = chunk.candidates.into_iter().next()?.content?;
    let text: String = content
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::trip::TravelerProfile;

    fn request(days: u32) -> TripRequest {
        TripRequest {
            destination: "Goa".to_string(),
            budget: "50000".to_string(),
            duration_days: days,
            travelers: TravelerProfile::Solo,
        }
    }

    #[test]
    fn prompt_mentions_every_supported_duration() {
        for days in 1..=14 {
            let prompt = ItineraryService::build_prompt(&request(days));
            assert!(
                prompt.contains(&format!("{}-day", days)),
                "prompt missing duration {}: {}",
                days,
                prompt
            );
        }
    }

    #[test]
    fn prompt_embeds_all_trip_fields() {
        let prompt = ItineraryService::build_prompt(&TripRequest {
            destination: "Jaipur".to_string(),
            budget: "Rs 75,000".to_string(),
            duration_days: 5,
            travelers: TravelerProfile::Family,
        });
        assert!(prompt.contains("Jaipur"));
        assert!(prompt.contains("Family"));
        assert!(prompt.contains("₹75000"));
        assert!(prompt.contains("5-day"));
    }

    #[test]
    fn prompt_uses_clamped_duration() {
        let prompt = ItineraryService::build_prompt(&request(99));
        assert!(prompt.contains("14-day"));
        assert!(!prompt.contains("99"));
    }

    #[test]
    fn sse_parser_handles_chunk_boundaries() {
        let mut parser = SseParser::new();
        assert!(parser.feed(b"data: {\"a\":").is_empty());
        let payloads = parser.feed(b" 1}\n\ndata: {\"b\": 2}\n");
        assert_eq!(payloads, vec!["{\"a\": 1}", "{\"b\": 2}"]);
    }

    #[test]
    fn sse_parser_ignores_non_data_lines_and_crlf() {
        let mut parser = SseParser::new();
        let payloads = parser.feed(b": comment\r\nevent: ping\r\ndata: {}\r\n");
        assert_eq!(payloads, vec!["{}"]);
    }

    #[test]
    fn sse_parser_keeps_multibyte_text_across_chunks() {
        // Split the rupee sign's UTF-8 bytes across two network chunks.
        let line = "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"₹500\"}]}}]}\n";
        let bytes = line.as_bytes();
        let mut parser = SseParser::new();
        assert!(parser.feed(&bytes[..40]).is_empty());
        let payloads = parser.feed(&bytes[40..]);
        assert_eq!(payloads.len(), 1);
        assert_eq!(
            fragment_from_payload(&payloads[0]),
            Some("₹500".to_string())
        );
    }

    #[test]
    fn fragment_extraction_concatenates_parts() {
        let payload =
            r#"{"candidates":[{"content":{"parts":[{"text":"Day 1: "},{"text":"beach"}]}}]}"#;
        assert_eq!(
            fragment_from_payload(payload),
            Some("Day 1: beach".to_string())
        );
    }

    #[test]
    fn fragment_extraction_skips_metadata_chunks() {
        assert_eq!(
            fragment_from_payload(r#"{"usageMetadata":{"totalTokenCount":10}}"#),
            None
        );
        assert_eq!(
            fragment_from_payload(r#"{"candidates":[{"finishReason":"STOP"}]}"#),
            None
        );
        assert_eq!(fragment_from_payload("[DONE]"), None);
        assert_eq!(fragment_from_payload("not json"), None);
    }
}
