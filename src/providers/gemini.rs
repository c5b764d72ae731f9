//! Google Gemini response provider.
//!
//! Maps the conversation transcript to a `generateContent` call and extracts
//! the first candidate's text as the bot reply.

use crate::providers::traits::ResponseProvider;
use crate::session::{Message, Speaker};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini provider. API key resolution: explicit key, then `GEMINI_API_KEY`,
/// then `GOOGLE_API_KEY`.
pub struct GeminiProvider {
    api_key: Option<String>,
    base_url: String,
    model: String,
    client: Client,
}

// ── API request/response types ───────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl GeminiProvider {
    pub fn new(api_key: Option<&str>, model: &str) -> Self {
        let resolved_key = api_key
            .map(String::from)
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok());

        Self {
            api_key: resolved_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.to_string(),
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .connect_timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Point the provider at a different base URL (local mock server in tests).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Gemini expects alternating `user` / `model` roles.
    fn contents_from(transcript: &[Message]) -> Vec<Content> {
        transcript
            .iter()
            .map(|m| Content {
                role: match m.speaker {
                    Speaker::User => "user".to_string(),
                    Speaker::Bot => "model".to_string(),
                },
                parts: vec![Part {
                    text: m.text.clone(),
                }],
            })
            .collect()
    }
}

#[async_trait]
impl ResponseProvider for GeminiProvider {
    async fn reply(&self, transcript: &[Message]) -> anyhow::Result<String> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            anyhow::anyhow!(
                "Gemini API key not found. Set GEMINI_API_KEY or get a key from \
                 https://aistudio.google.com/app/apikey"
            )
        })?;

        let request = GenerateContentRequest {
            contents: Self::contents_from(transcript),
        };

        let model_name = if self.model.starts_with("models/") {
            self.model.clone()
        } else {
            format!("models/{}", self.model)
        };

        let url = format!(
            "{}/{model_name}:generateContent?key={api_key}",
            self.base_url
        );

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error ({status}): {error_text}");
        }

        let result: GenerateContentResponse = response.json().await?;

        if let Some(err) = result.error {
            anyhow::bail!("Gemini API error: {}", err.message);
        }

        result
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text)
            .map(|t| t.trim().to_string())
            .ok_or_else(|| anyhow::anyhow!("No response from Gemini"))
    }
}
