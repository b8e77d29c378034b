//! HTTP implementations of the collaborator traits.
//!
//! [`HttpApi`] talks to the assessment backend's JSON API and implements
//! both [`QuestionProvider`] and [`ResultSubmitter`]. It owns a
//! current-thread tokio runtime so the trait surface stays synchronous and
//! object-safe regardless of the caller's async context.
//!
//! Payload normalization happens here, at the boundary: unknown dimension
//! tags become untagged options, and string or non-finite weights fall back
//! to the default weight, so the rest of the crate never sees malformed
//! records.

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;
use uuid::Uuid;

use crate::error::{CoreError, ProviderError, SubmitError};
use crate::providers::traits::{
    QuestionProvider, ResultSubmitter, SubmissionRequest, SubmittedResult,
};
use crate::quiz::question::{AnswerOption, Question, QuestionSet, TestId};
use crate::scoring::Dimension;

/// Client for the question and result services.
pub struct HttpApi {
    base: Url,
    http: reqwest::Client,
    rt: tokio::runtime::Runtime,
}

impl HttpApi {
    /// Create a client for the API rooted at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, CoreError> {
        let mut base = base_url.trim_end_matches('/').to_string();
        base.push('/');
        let base = Url::parse(&base)
            .map_err(|e| CoreError::Custom(format!("invalid API base URL '{base_url}': {e}")))?;
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            base,
            http: reqwest::Client::new(),
            rt,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ProviderError> {
        self.base
            .join(path)
            .map_err(|e| ProviderError::Network(format!("invalid endpoint '{path}': {e}")))
    }
}

impl QuestionProvider for HttpApi {
    fn fetch(&self, test_id: &TestId) -> Result<QuestionSet, ProviderError> {
        let url = self.endpoint(&format!("tests/{test_id}/questions"))?;
        let dtos: Vec<QuestionDto> = self.rt.block_on(async {
            let response = self
                .http
                .get(url)
                .send()
                .await
                .map_err(|e| ProviderError::Network(e.to_string()))?;
            let status = response.status();
            if status == StatusCode::NOT_FOUND {
                return Err(ProviderError::NotFound {
                    test_id: test_id.clone(),
                });
            }
            if !status.is_success() {
                return Err(ProviderError::Network(format!(
                    "question service answered with status {status}"
                )));
            }
            response
                .json()
                .await
                .map_err(|e| ProviderError::Malformed(e.to_string()))
        })?;
        let questions = dtos.into_iter().map(QuestionDto::into_question).collect();
        QuestionSet::new(test_id.clone(), questions)
    }
}

impl ResultSubmitter for HttpApi {
    fn submit(&self, request: &SubmissionRequest) -> Result<SubmittedResult, SubmitError> {
        let url = self
            .endpoint("results")
            .map_err(|e| SubmitError::Network(e.to_string()))?;
        let dto: ResultDto = self.rt.block_on(async {
            let response = self
                .http
                .post(url)
                .json(request)
                .send()
                .await
                .map_err(|e| SubmitError::Network(e.to_string()))?;
            let status = response.status();
            if status == StatusCode::CONFLICT {
                return Err(SubmitError::DuplicateCompletion {
                    test_id: request.test_id.clone(),
                });
            }
            if !status.is_success() {
                return Err(SubmitError::Server {
                    status: status.as_u16(),
                });
            }
            response
                .json()
                .await
                .map_err(|e| SubmitError::Network(format!("undecodable result record: {e}")))
        })?;
        Ok(dto.into_result(&request.test_id))
    }
}

// ── Wire DTOs ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct QuestionDto {
    #[serde(default)]
    id: Option<Uuid>,
    text: String,
    #[serde(default)]
    section: Option<String>,
    #[serde(default)]
    options: Vec<OptionDto>,
}

impl QuestionDto {
    fn into_question(self) -> Question {
        Question {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            text: self.text,
            section: self.section,
            options: self.options.into_iter().map(OptionDto::into_option).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OptionDto {
    text: String,
    #[serde(default)]
    dimension: Option<String>,
    /// Weights arrive as numbers or numeric strings depending on the
    /// backend version.
    #[serde(default)]
    weight: Option<serde_json::Value>,
    #[serde(default)]
    order: Option<u32>,
}

impl OptionDto {
    fn into_option(self) -> AnswerOption {
        AnswerOption {
            dimension: self.dimension.as_deref().and_then(Dimension::from_tag),
            weight: self.weight.as_ref().and_then(coerce_weight),
            text: self.text,
            order: self.order,
        }
    }
}

fn coerce_weight(value: &serde_json::Value) -> Option<f64> {
    let weight = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    weight.filter(|w| w.is_finite())
}

#[derive(Debug, Deserialize)]
struct ResultDto {
    id: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    completed_at: Option<DateTime<Utc>>,
}

impl ResultDto {
    fn into_result(self, test_id: &TestId) -> SubmittedResult {
        SubmittedResult {
            id: self.id,
            test_id: test_id.clone(),
            code: self.code,
            completed_at: self.completed_at.unwrap_or_else(Utc::now),
        }
    }
}
