use log::{debug, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::Token;
use crate::config::AuditConfig;
use crate::error::{Result, TaskLensError};

use super::types::{BuildDefinition, BuildDefinitionRef, ListResponse, Project, TaskVersion};

/// Azure DevOps REST client scoped to one organization.
///
/// Requests are sent one at a time with an explicit timeout. Organization-wide
/// lookups fail hard; project-scoped lookups degrade to empty results so one
/// broken project cannot stop an audit.
pub struct AzureDevOpsClient {
    client: Client,
    base_url: Url,
    organization: String,
    token: Token,
    api_version: String,
    tasks_api_version: String,
}

impl AzureDevOpsClient {
    pub fn new(config: &AuditConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("tasklens/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| TaskLensError::Config(format!("Failed to create HTTP client: {e}")))?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| TaskLensError::Config(format!("Invalid base URL: {e}")))?;

        if base_url.cannot_be_a_base() {
            return Err(TaskLensError::Config(format!(
                "Base URL cannot be used for API paths: {base_url}"
            )));
        }

        Ok(Self {
            client,
            base_url,
            organization: config.organization.clone(),
            token: config.token.clone(),
            api_version: config.api_version.clone(),
            tasks_api_version: config.tasks_api_version.clone(),
        })
    }

    /// Builds `{base}/{organization}/{segments...}?api-version=...` with every
    /// segment percent-encoded.
    fn endpoint(&self, segments: &[&str], api_version: &str) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs, so the path is always editable.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push(&self.organization).extend(segments);
        }
        url.query_pairs_mut().append_pair("api-version", api_version);
        url
    }

    async fn get(&self, url: Url) -> reqwest::Result<reqwest::Response> {
        debug!("GET {url}");
        self.client
            .get(url)
            .basic_auth("", Some(self.token.as_str()))
            .send()
            .await
    }

    /// GET whose failure aborts the run.
    async fn get_required<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.get(url).await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(TaskLensError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    /// GET whose failure is logged and reported as `None`.
    async fn get_optional<T: DeserializeOwned>(&self, url: Url) -> Option<T> {
        let response = match self.get(url.clone()).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Request to {url} failed: {e}");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("Request to {url} returned status {status}");
            return None;
        }

        match response.json().await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!("Failed to decode response from {url}: {e}");
                None
            }
        }
    }

    /// Lists every project in the organization.
    pub async fn fetch_projects(&self) -> Result<Vec<Project>> {
        let url = self.endpoint(&["_apis", "projects"], &self.api_version);
        let response: ListResponse<Project> = self.get_required(url).await?;
        Ok(response.value)
    }

    /// Lists every release of every task in the distributed task catalog.
    pub async fn fetch_task_catalog(&self) -> Result<Vec<TaskVersion>> {
        let url = self.endpoint(&["_apis", "distributedtask", "tasks"], &self.tasks_api_version);
        let response: ListResponse<TaskVersion> = self.get_required(url).await?;
        Ok(response.value)
    }

    /// Lists build definitions of a project; empty when the lookup fails.
    pub async fn fetch_build_definitions(&self, project: &str) -> Vec<BuildDefinitionRef> {
        let url = self.endpoint(&[project, "_apis", "build", "definitions"], &self.api_version);
        self.get_optional::<ListResponse<BuildDefinitionRef>>(url)
            .await
            .map(|response| response.value)
            .unwrap_or_default()
    }

    /// Fetches one build definition in full; `None` when the lookup fails.
    pub async fn fetch_build_definition(
        &self,
        project: &str,
        definition_id: i64,
    ) -> Option<BuildDefinition> {
        let id = definition_id.to_string();
        let url = self.endpoint(
            &[project, "_apis", "build", "definitions", id.as_str()],
            &self.api_version,
        );
        self.get_optional(url).await
    }
}
