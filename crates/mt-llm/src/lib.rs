//! Claude API integration for daily-note time tracking.
//!
//! Sends a day's time blocks to the Messages API and returns a free-text
//! productivity analysis.

use std::fmt;
use std::time::Duration;

use mt_core::clock;
use mt_core::{LegacyEntry, TimeBlock};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const ANALYSIS_MAX_TOKENS: u32 = 1024;
const ANALYSIS_TEMPERATURE: f32 = 0.2;

const ANALYSIS_INSTRUCTIONS: &str = "\
You are a helpful assistant that analyzes time blocks for productivity.
The format of each time entry is 'Start time, Duration, Description'.
Categorize each time block into four types: management, creation, consumption, and ideation.
Treat entry descriptions containing the word 'Break' as a separate category.
Ignore any entries with '-' as the duration.
Treat entries with empty descriptions as if they were part of the previous entry.
Summarise the results in a table with the columns: Type, Time Spent, and Description.
End with the total time spent.";

/// LLM client errors.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The provided API key was invalid.
    #[error("invalid API key: {reason}")]
    InvalidApiKey { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// API returned an error response.
    #[error("API error: {message}")]
    Api { message: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Claude API client.
///
/// The client is safe to clone and share across threads; clones share the
/// underlying HTTP connection pool.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    api_key: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// One line of the analysis input: `start, duration, description`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayBlock {
    pub start: String,
    pub duration: String,
    pub description: String,
}

impl From<&TimeBlock> for DayBlock {
    fn from(block: &TimeBlock) -> Self {
        let description = if block.description.is_empty() {
            block.type_name().to_string()
        } else {
            let type_name = block.type_name();
            format!("{} ({type_name}, {})", block.description, block.project)
        };
        Self {
            start: clock::format_clock(block.start),
            duration: clock::format_hm(block.duration_minutes()),
            description,
        }
    }
}

impl From<&LegacyEntry> for DayBlock {
    fn from(entry: &LegacyEntry) -> Self {
        Self {
            start: clock::format_clock(entry.start),
            duration: entry.duration_label(),
            description: entry.activity.clone(),
        }
    }
}

impl Client {
    /// Creates a new client with the given API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or whitespace-only, or if
    /// the HTTP client fails to build.
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();

        if api_key.is_empty() {
            return Err(LlmError::InvalidApiKey {
                reason: "API key cannot be empty",
            });
        }
        if api_key.trim().is_empty() {
            return Err(LlmError::InvalidApiKey {
                reason: "API key cannot be whitespace-only",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(LlmError::ClientBuild)?;

        Ok(Self { http, api_key })
    }

    /// Asks the model to categorise a day's blocks and returns its answer.
    pub async fn analyze_day(&self, model: &str, blocks: &[DayBlock]) -> Result<String, LlmError> {
        let request = MessageRequest {
            model: model.to_string(),
            max_tokens: ANALYSIS_MAX_TOKENS,
            temperature: ANALYSIS_TEMPERATURE,
            system: ANALYSIS_INSTRUCTIONS,
            messages: vec![Message {
                role: "user",
                content: build_analysis_prompt(blocks),
            }],
        };

        let response = self
            .http
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(parse_api_error(&body).unwrap_or_else(|| LlmError::Api {
                message: format!("status {status}: {body}"),
            }));
        }

        let payload: MessageResponse = serde_json::from_str(&body)
            .map_err(|err| LlmError::InvalidResponse(err.to_string()))?;
        let text = extract_text(payload.content)?;
        Ok(text.trim().to_string())
    }
}

#[derive(Debug, Serialize)]
struct MessageRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    system: &'static str,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
    #[serde(other)]
    Other,
}

fn extract_text(blocks: Vec<ContentBlock>) -> Result<String, LlmError> {
    let pieces: Vec<String> = blocks
        .into_iter()
        .filter_map(|block| match block {
            ContentBlock::Text { text } => Some(text),
            ContentBlock::Other => None,
        })
        .collect();
    if pieces.is_empty() {
        return Err(LlmError::InvalidResponse(
            "missing text content".to_string(),
        ));
    }
    Ok(pieces.join("\n"))
}

fn parse_api_error(body: &str) -> Option<LlmError> {
    #[derive(Deserialize)]
    struct ErrorPayload {
        error: ErrorDetails,
    }

    #[derive(Deserialize)]
    struct ErrorDetails {
        message: String,
    }

    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .map(|payload| LlmError::Api {
            message: payload.error.message,
        })
}

fn build_analysis_prompt(blocks: &[DayBlock]) -> String {
    blocks
        .iter()
        .map(|row| format!("{}, {}, {}", row.start, row.duration, row.description))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_rejects_empty_api_key() {
        assert!(matches!(
            Client::new(""),
            Err(LlmError::InvalidApiKey { .. })
        ));
    }

    #[test]
    fn client_rejects_whitespace_api_key() {
        assert!(matches!(
            Client::new("   "),
            Err(LlmError::InvalidApiKey { .. })
        ));
    }

    #[test]
    fn client_accepts_valid_api_key() {
        assert!(Client::new("sk-ant-api03-valid-key").is_ok());
    }

    #[test]
    fn client_debug_redacts_api_key() {
        let client = Client::new("secret-key").unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn prompt_lists_one_row_per_block() {
        let work = TimeBlock::parse("08:00 - 09:30 T: #Project-Work Write report").unwrap();
        let rest = TimeBlock::parse("09:30 - 10:00 B:").unwrap();
        let prompt = build_analysis_prompt(&[DayBlock::from(&work), DayBlock::from(&rest)]);
        assert_eq!(
            prompt,
            "08:00, 1:30, Write report (Task, Work)\n09:30, 0:30, Break"
        );
    }

    #[test]
    fn legacy_rows_keep_missing_duration() {
        let entries = mt_core::parse_legacy_entries(&["08:00 Email", "09:00 Wrap up"]);
        let blocks: Vec<DayBlock> = entries.iter().map(DayBlock::from).collect();
        assert_eq!(blocks[0].duration, "1:00");
        assert_eq!(blocks[1].duration, "-");
    }

    #[test]
    fn extract_text_joins_text_blocks() {
        let response: MessageResponse = serde_json::from_str(
            r#"{"content":[{"type":"text","text":"a"},{"type":"tool_use"},{"type":"text","text":"b"}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(response.content).unwrap(), "a\nb");
    }

    #[test]
    fn extract_text_rejects_empty_content() {
        let err = extract_text(vec![]).unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponse(_)));
    }

    #[test]
    fn parse_api_error_reads_message() {
        let body = r#"{"error":{"type":"invalid_request_error","message":"bad model"}}"#;
        let Some(LlmError::Api { message }) = parse_api_error(body) else {
            panic!("expected an API error");
        };
        assert_eq!(message, "bad model");
        assert!(parse_api_error("not json").is_none());
    }
}
