//! Generative advisor API client
//!
//! One HTTP POST per personalized-recommendation request. The endpoint is a
//! plain text-generation service: the request carries a prompt plus a system
//! instruction, the response carries free text. Calls are best-effort and
//! carry an explicit client-side deadline; callers treat every failure as
//! "no advice".

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = "SkillForge/0.1.0 (https://github.com/skillforge/skillforge)";
/// Client-side deadline for one generation call
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Advisor client errors
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    #[serde(rename = "systemInstruction")]
    system_instruction: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    text: String,
}

/// Generative advisor API client
pub struct AdvisorClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AdvisorClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, AdvisorError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AdvisorError::Network(e.to_string()))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            http_client,
            base_url,
            api_key: api_key.into(),
        })
    }

    /// Run one text-generation round trip
    pub async fn generate(
        &self,
        prompt: &str,
        system_instruction: &str,
    ) -> Result<String, AdvisorError> {
        let url = format!("{}/generate", self.base_url);

        tracing::debug!(url = %url, prompt_chars = prompt.len(), "Querying advisor endpoint");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(&GenerateRequest {
                prompt,
                system_instruction,
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AdvisorError::Timeout
                } else {
                    AdvisorError::Network(e.to_string())
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AdvisorError::Api(status.as_u16(), error_text));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AdvisorError::Parse(e.to_string()))?;

        Ok(body.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation_trims_trailing_slash() {
        let client = AdvisorClient::new("https://advisor.example.com/v1/", "key").unwrap();
        assert_eq!(client.base_url, "https://advisor.example.com/v1");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(AdvisorError::Timeout.to_string(), "Request timed out");
        assert_eq!(
            AdvisorError::Api(503, "overloaded".to_string()).to_string(),
            "API error 503: overloaded"
        );
    }
}
