//! Promptbench API Client
//!
//! The sole point of network I/O: every operation takes plain ids and
//! values, issues one HTTP call, and returns a parsed payload or an
//! [`ApiError`]. No retries, no caching, no local state.

use std::collections::HashMap;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use promptbench::domain::{
    Evaluation, Input, InputSet, InputSetDetail, LlmModel, Prompt, PromptDetail, PromptVersion,
    Quality,
};
use promptbench::presentation::{InputHistory, ResultBundle};

/// Gateway errors: a non-2xx response with its normalized message, or a
/// transport failure
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },

    #[error("Failed to connect to the backend: {0}")]
    Transport(#[from] reqwest::Error),
}

/// API Client for the promptbench backend
pub struct ApiClient {
    client: Client,
    base_url: String,
}

// ============================================
// Request Types
// ============================================

#[derive(Debug, Serialize)]
struct CreateInputSetRequest<'a> {
    name: &'a str,
    description: &'a str,
}

#[derive(Debug, Serialize)]
pub struct UpdateInputSetRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateInputRequest<'a> {
    text: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct UpdateInputRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateModelRequest<'a> {
    name: &'a str,
    description: &'a str,
}

#[derive(Debug, Serialize)]
struct CreatePromptRequest<'a> {
    name: &'a str,
    template: &'a str,
    description: &'a str,
}

#[derive(Debug, Serialize)]
pub struct UpdatePromptRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreatePromptVersionRequest<'a> {
    template: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_prompt: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct ProcessRequest<'a> {
    text: &'a str,
    model_ids: &'a [i64],
    prompt_ids: &'a [i64],
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt_version_ids: Option<&'a HashMap<i64, i64>>,
}

#[derive(Debug, Serialize)]
struct BatchProcessRequest<'a> {
    texts: &'a [String],
    model_ids: &'a [i64],
    prompt_ids: &'a [i64],
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt_version_ids: Option<&'a HashMap<i64, i64>>,
}

#[derive(Debug, Serialize)]
struct ComparePromptsRequest<'a> {
    input_ids: &'a [i64],
    prompt_ids: &'a [i64],
    model_ids: &'a [i64],
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt_version_ids: Option<&'a HashMap<i64, i64>>,
}

#[derive(Debug, Serialize)]
struct CreateEvaluationRequest<'a> {
    output_id: i64,
    quality: Quality,
    notes: &'a str,
}

/// Error body convention: non-2xx responses carry a `detail` string
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    // ============================================
    // Request plumbing
    // ============================================

    async fn handle<T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        resp: reqwest::Response,
    ) -> Result<T, ApiError> {
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.detail)
                .unwrap_or_else(|| "An error occurred".to_string());
            error!(method, path, status, %message, "request failed");
            return Err(ApiError::Status { status, message });
        }
        Ok(resp.json().await?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!(path, "GET");
        let url = format!("{}{}", self.base_url, path);
        let resp = self.client.get(&url).send().await?;
        self.handle("GET", path, resp).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!(path, "POST");
        let url = format!("{}{}", self.base_url, path);
        let resp = self.client.post(&url).json(body).send().await?;
        self.handle("POST", path, resp).await
    }

    async fn put_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!(path, "PUT");
        let url = format!("{}{}", self.base_url, path);
        let resp = self.client.put(&url).json(body).send().await?;
        self.handle("PUT", path, resp).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        debug!(path, "DELETE");
        let url = format!("{}{}", self.base_url, path);
        let resp = self.client.delete(&url).send().await?;
        let _: serde_json::Value = self.handle("DELETE", path, resp).await?;
        Ok(())
    }

    // ============================================
    // Input Sets
    // ============================================

    pub async fn list_input_sets(&self) -> Result<Vec<InputSet>, ApiError> {
        self.get_json("/input-sets/").await
    }

    pub async fn create_input_set(
        &self,
        name: &str,
        description: &str,
    ) -> Result<InputSet, ApiError> {
        self.post_json("/input-sets/", &CreateInputSetRequest { name, description })
            .await
    }

    pub async fn get_input_set(&self, input_set_id: i64) -> Result<InputSetDetail, ApiError> {
        self.get_json(&format!("/input-sets/{}", input_set_id)).await
    }

    pub async fn update_input_set(
        &self,
        input_set_id: i64,
        update: &UpdateInputSetRequest,
    ) -> Result<InputSet, ApiError> {
        self.put_json(&format!("/input-sets/{}", input_set_id), update)
            .await
    }

    pub async fn delete_input_set(&self, input_set_id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/input-sets/{}", input_set_id)).await
    }

    pub async fn list_inputs_in_set(&self, input_set_id: i64) -> Result<Vec<Input>, ApiError> {
        self.get_json(&format!("/input-sets/{}/inputs", input_set_id))
            .await
    }

    pub async fn add_input_to_set(
        &self,
        input_set_id: i64,
        text: &str,
        name: &str,
    ) -> Result<Input, ApiError> {
        self.post_json(
            &format!("/input-sets/{}/inputs", input_set_id),
            &CreateInputRequest { text, name },
        )
        .await
    }

    // ============================================
    // Inputs
    // ============================================

    pub async fn list_inputs(&self) -> Result<Vec<Input>, ApiError> {
        self.get_json("/inputs/").await
    }

    pub async fn create_input(&self, text: &str, name: &str) -> Result<Input, ApiError> {
        self.post_json("/inputs/", &CreateInputRequest { text, name })
            .await
    }

    pub async fn get_input(&self, input_id: i64) -> Result<Input, ApiError> {
        self.get_json(&format!("/inputs/{}", input_id)).await
    }

    pub async fn update_input(
        &self,
        input_id: i64,
        update: &UpdateInputRequest,
    ) -> Result<Input, ApiError> {
        self.put_json(&format!("/inputs/{}", input_id), update).await
    }

    pub async fn delete_input(&self, input_id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/inputs/{}", input_id)).await
    }

    /// Historical results for one input
    pub async fn get_input_history(&self, input_id: i64) -> Result<InputHistory, ApiError> {
        self.get_json(&format!("/inputs/{}/history", input_id)).await
    }

    // ============================================
    // Models
    // ============================================

    pub async fn list_models(&self) -> Result<Vec<LlmModel>, ApiError> {
        self.get_json("/models/").await
    }

    pub async fn create_model(&self, name: &str, description: &str) -> Result<LlmModel, ApiError> {
        self.post_json("/models/", &CreateModelRequest { name, description })
            .await
    }

    // ============================================
    // Prompts
    // ============================================

    pub async fn list_prompts(&self) -> Result<Vec<Prompt>, ApiError> {
        self.get_json("/prompts/").await
    }

    pub async fn create_prompt(
        &self,
        name: &str,
        template: &str,
        description: &str,
    ) -> Result<Prompt, ApiError> {
        self.post_json(
            "/prompts/",
            &CreatePromptRequest {
                name,
                template,
                description,
            },
        )
        .await
    }

    pub async fn get_prompt(&self, prompt_id: i64) -> Result<PromptDetail, ApiError> {
        self.get_json(&format!("/prompts/{}", prompt_id)).await
    }

    pub async fn update_prompt(
        &self,
        prompt_id: i64,
        update: &UpdatePromptRequest,
    ) -> Result<Prompt, ApiError> {
        self.put_json(&format!("/prompts/{}", prompt_id), update).await
    }

    pub async fn delete_prompt(&self, prompt_id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/prompts/{}", prompt_id)).await
    }

    pub async fn list_prompt_versions(
        &self,
        prompt_id: i64,
    ) -> Result<Vec<PromptVersion>, ApiError> {
        self.get_json(&format!("/prompts/{}/versions", prompt_id))
            .await
    }

    /// A new version never mutates prior ones; the backend assigns the
    /// next version number
    pub async fn create_prompt_version(
        &self,
        prompt_id: i64,
        template: &str,
        system_prompt: Option<&str>,
    ) -> Result<PromptVersion, ApiError> {
        self.post_json(
            &format!("/prompts/{}/versions", prompt_id),
            &CreatePromptVersionRequest {
                template,
                system_prompt,
            },
        )
        .await
    }

    pub async fn get_prompt_version(&self, version_id: i64) -> Result<PromptVersion, ApiError> {
        self.get_json(&format!("/prompt-versions/{}", version_id))
            .await
    }

    // ============================================
    // Processing
    // ============================================

    /// Process one text with the selected models and prompts
    pub async fn process_text(
        &self,
        text: &str,
        model_ids: &[i64],
        prompt_ids: &[i64],
        prompt_version_ids: Option<&HashMap<i64, i64>>,
    ) -> Result<ResultBundle, ApiError> {
        self.post_json(
            "/process/",
            &ProcessRequest {
                text,
                model_ids,
                prompt_ids,
                prompt_version_ids,
            },
        )
        .await
    }

    /// Process several raw texts with the selected models and prompts
    pub async fn batch_process(
        &self,
        texts: &[String],
        model_ids: &[i64],
        prompt_ids: &[i64],
        prompt_version_ids: Option<&HashMap<i64, i64>>,
    ) -> Result<Vec<ResultBundle>, ApiError> {
        self.post_json(
            "/batch-process/",
            &BatchProcessRequest {
                texts,
                model_ids,
                prompt_ids,
                prompt_version_ids,
            },
        )
        .await
    }

    /// The preferred bulk path: N prompts x M models x K stored inputs in
    /// one round trip
    pub async fn compare_prompts(
        &self,
        input_ids: &[i64],
        prompt_ids: &[i64],
        model_ids: &[i64],
        prompt_version_ids: Option<&HashMap<i64, i64>>,
    ) -> Result<Vec<ResultBundle>, ApiError> {
        debug!(
            inputs = input_ids.len(),
            models = model_ids.len(),
            prompts = prompt_ids.len(),
            "bulk compare"
        );
        self.post_json(
            "/compare-prompts/",
            &ComparePromptsRequest {
                input_ids,
                prompt_ids,
                model_ids,
                prompt_version_ids,
            },
        )
        .await
    }

    // ============================================
    // Evaluations
    // ============================================

    /// Create or replace the evaluation for an output (upsert)
    pub async fn create_evaluation(
        &self,
        output_id: i64,
        quality: Quality,
        notes: &str,
    ) -> Result<Evaluation, ApiError> {
        self.post_json(
            "/evaluations/",
            &CreateEvaluationRequest {
                output_id,
                quality,
                notes,
            },
        )
        .await
    }

    pub async fn list_evaluations(&self) -> Result<Vec<Evaluation>, ApiError> {
        self.get_json("/evaluations/").await
    }
}
