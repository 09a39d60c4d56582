use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::LlmConfig;
use crate::error::AnalysisError;
use crate::table::Table;

const PROMPT_TEMPLATE: &str = "You are a seasoned data analyst. Using your analytical skills, give a summary of the data.
Short descriptive min, max, mode and median statistics in text form.
Recommendations and nuances you notice. Try to identify any trends or patterns.

The data retrieved from the query is in JSON format:
{data}

Write only a plain text summary in one format.";

/// Fills the analysis prompt with the table serialized as JSON records.
pub fn build_prompt(table: Option<&Table>) -> Result<String, AnalysisError> {
    let table = table.ok_or(AnalysisError::NoTable)?;
    let data = table.to_records_json()?;
    Ok(PROMPT_TEMPLATE.replace("{data}", &data))
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Client for Ollama's `/api/generate` endpoint.
#[derive(Clone)]
pub struct AnalysisClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    max_tokens: u32,
    timeout: Duration,
    retries: u32,
}

impl AnalysisClient {
    pub fn from_config(cfg: &LlmConfig) -> Result<Self, AnalysisError> {
        let http = reqwest::Client::builder().timeout(cfg.timeout()).build()?;
        Ok(Self {
            http,
            endpoint: format!("{}/api/generate", cfg.base_url.trim_end_matches('/')),
            model: cfg.model.clone(),
            max_tokens: cfg.max_tokens,
            timeout: cfg.timeout(),
            retries: cfg.retries,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends the prompt, retrying transient failures up to the configured
    /// number of extra attempts.
    pub async fn generate(&self, prompt: &str) -> Result<String, AnalysisError> {
        let mut attempt = 0;
        loop {
            match self.generate_once(prompt).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_transient() && attempt < self.retries => {
                    attempt += 1;
                    warn!(error = %e, attempt, "analysis request failed, retrying");
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn generate_once(&self, prompt: &str) -> Result<String, AnalysisError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions { num_predict: self.max_tokens },
        };

        debug!(endpoint = %self.endpoint, prompt_len = prompt.len(), "sending analysis request");
        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Status { status: status.as_u16(), body });
        }

        let data: GenerateResponse = response.json().await.map_err(|e| self.classify(e))?;
        let text = data.response.trim();
        if text.is_empty() {
            return Err(AnalysisError::Malformed);
        }
        info!(model = %self.model, chars = text.len(), "analysis received");
        Ok(text.to_string())
    }

    fn classify(&self, err: reqwest::Error) -> AnalysisError {
        if err.is_timeout() {
            AnalysisError::Timeout(self.timeout)
        } else if err.is_decode() {
            AnalysisError::Malformed
        } else {
            AnalysisError::Transport(err)
        }
    }
}
