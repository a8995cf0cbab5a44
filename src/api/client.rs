//! HTTP client for the upstream video API.

use super::types::*;
use crate::config::Settings;
use crate::error::{BridgeError, Result};
use reqwest::multipart::Form;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Immutable connection settings, built once at startup.
#[derive(Clone)]
pub struct ApiConfig {
    base_url: Url,
    api_key: String,
}

impl ApiConfig {
    /// Create a config from a base URL and API key.
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(BridgeError::Config(format!(
                "Base URL cannot carry a path: {}",
                base_url
            )));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            api_key: api_key.into(),
        })
    }

    /// Build the config from settings and the credential environment variable.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = Settings::api_key()?;
        Self::new(&settings.api.base_url, api_key)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Client for the upstream video API. One method per endpoint.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl ApiClient {
    /// Create a client using the transport's default timeouts.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("vidbridge/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    // === Indexes ===

    pub async fn create_index(&self, request: &CreateIndexRequest) -> Result<CreatedResource> {
        let url = self.endpoint(&["indexes"])?;
        self.execute("create_index", self.http.post(url).json(request))
            .await
    }

    pub async fn list_indexes(&self, query: &ListIndexesQuery) -> Result<Page<IndexRecord>> {
        let url = self.endpoint(&["indexes"])?;
        self.execute("list_indexes", self.http.get(url).query(query))
            .await
    }

    pub async fn get_index(&self, index_id: &str) -> Result<IndexRecord> {
        let url = self.endpoint(&["indexes", index_id])?;
        self.execute("get_index", self.http.get(url)).await
    }

    pub async fn update_index(&self, index_id: &str, request: &UpdateIndexRequest) -> Result<()> {
        let url = self.endpoint(&["indexes", index_id])?;
        self.send("update_index", self.http.put(url).json(request))
            .await
            .map(|_| ())
    }

    pub async fn delete_index(&self, index_id: &str) -> Result<()> {
        let url = self.endpoint(&["indexes", index_id])?;
        self.send("delete_index", self.http.delete(url))
            .await
            .map(|_| ())
    }

    // === Tasks ===

    /// Upload a video by URL. This is the only multipart endpoint.
    pub async fn create_task(&self, request: &UploadVideoRequest) -> Result<CreatedTask> {
        let url = self.endpoint(&["tasks"])?;
        let form = Form::new()
            .text("index_id", request.index_id.clone())
            .text("video_url", request.video_url.clone())
            .text(
                "enable_video_stream",
                request.enable_video_stream.to_string(),
            );
        self.execute("create_task", self.http.post(url).multipart(form))
            .await
    }

    pub async fn list_tasks(&self, query: &ListTasksQuery) -> Result<Page<TaskRecord>> {
        let url = self.endpoint(&["tasks"])?;
        self.execute("list_tasks", self.http.get(url).query(query))
            .await
    }

    pub async fn get_task(&self, task_id: &str) -> Result<TaskRecord> {
        let url = self.endpoint(&["tasks", task_id])?;
        self.execute("get_task", self.http.get(url)).await
    }

    pub async fn delete_task(&self, task_id: &str) -> Result<()> {
        let url = self.endpoint(&["tasks", task_id])?;
        self.send("delete_task", self.http.delete(url))
            .await
            .map(|_| ())
    }

    // === Search ===

    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let url = self.endpoint(&["search"])?;
        self.execute("search", self.http.post(url).json(request))
            .await
    }

    pub async fn search_page(&self, page_token: &str) -> Result<SearchResponse> {
        let url = self.endpoint(&["search", page_token])?;
        self.execute("search_page", self.http.get(url)).await
    }

    // === Generation ===

    pub async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        let url = self.endpoint(&["generate"])?;
        self.execute("generate", self.http.post(url).json(request))
            .await
    }

    pub async fn gist(&self, request: &GistRequest) -> Result<GistResponse> {
        let url = self.endpoint(&["gist"])?;
        self.execute("gist", self.http.post(url).json(request)).await
    }

    pub async fn summarize(&self, request: &SummarizeRequest) -> Result<SummarizeResponse> {
        let url = self.endpoint(&["summarize"])?;
        self.execute("summarize", self.http.post(url).json(request))
            .await
    }

    // === Integration imports ===

    pub async fn import_videos(
        &self,
        integration_id: &str,
        request: &ImportRequest,
    ) -> Result<ImportResponse> {
        let url = self.endpoint(&["tasks", "transfers", "import", integration_id])?;
        self.execute("import_videos", self.http.post(url).json(request))
            .await
    }

    pub async fn import_status(
        &self,
        integration_id: &str,
        query: &ImportStatusQuery,
    ) -> Result<ImportStatus> {
        let url = self.endpoint(&["tasks", "transfers", "import", integration_id, "status"])?;
        self.execute("import_status", self.http.get(url).query(query))
            .await
    }

    pub async fn import_logs(&self, integration_id: &str) -> Result<ImportLogs> {
        let url = self.endpoint(&["tasks", "transfers", "import", integration_id, "logs"])?;
        self.execute("import_logs", self.http.get(url)).await
    }

    // === Plumbing ===

    /// Append percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                BridgeError::Config(format!("Base URL cannot carry a path: {}", self.config.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and parse the success body as JSON.
    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T> {
        let body = self.send(operation, request).await?;
        parse_body(operation, &body)
    }

    /// Send a request with the API key and return the raw success body.
    ///
    /// Non-2xx statuses become [`BridgeError::Upstream`] with the body verbatim.
    #[instrument(skip(self, request))]
    async fn send(&self, operation: &'static str, request: RequestBuilder) -> Result<String> {
        let request = request
            .header(API_KEY_HEADER, &self.config.api_key)
            .build()?;
        info!("{} {}", request.method(), request.url().path());

        let response = self.http.execute(request).await.map_err(|e| {
            warn!("Request failed before a response arrived: {}", e);
            BridgeError::Http(e)
        })?;

        let status = response.status();
        let body = response.text().await?;
        info!(status = status.as_u16(), bytes = body.len(), "Upstream responded");

        if !status.is_success() {
            warn!(status = status.as_u16(), "Upstream returned an error status");
            return Err(BridgeError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

/// Parse a success body, reporting failures as a malformed response.
fn parse_body<T: DeserializeOwned>(operation: &str, body: &str) -> Result<T> {
    match serde_json::from_str(body) {
        Ok(value) => {
            debug!(operation, "Parsed upstream response");
            Ok(value)
        }
        Err(e) => {
            warn!(operation, "Could not parse upstream response: {}", e);
            Err(BridgeError::MalformedResponse(format!(
                "{} returned a body that is not the expected JSON ({}): {}",
                operation,
                e,
                truncate(body, 200)
            )))
        }
    }
}

/// Truncate text with ellipsis on a char boundary.
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}
