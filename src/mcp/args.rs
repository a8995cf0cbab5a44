//! Typed tool arguments with their defaults.

use serde::Deserialize;

pub const DEFAULT_TEMPERATURE: f64 = 0.2;
pub const DEFAULT_PAGE_LIMIT: u32 = 10;
pub const DEFAULT_OPERATOR: &str = "or";
pub const DEFAULT_SEARCH_OPTIONS: &[&str] = &["visual", "audio"];

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

fn default_page_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}

fn default_operator() -> String {
    DEFAULT_OPERATOR.to_string()
}

fn default_search_options() -> Vec<String> {
    DEFAULT_SEARCH_OPTIONS.iter().map(|s| s.to_string()).collect()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct CreateIndexArgs {
    pub index_name: String,
    #[serde(default)]
    pub addons: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct IndexIdArgs {
    pub index_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateIndexArgs {
    pub index_id: String,
    pub index_name: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadVideoArgs {
    pub index_id: String,
    pub video_url: String,
    #[serde(default = "default_true")]
    pub enable_video_stream: bool,
}

#[derive(Debug, Deserialize)]
pub struct SearchArgs {
    pub index_id: String,
    pub query: String,
    #[serde(default = "default_search_options")]
    pub search_options: Vec<String>,
    #[serde(default = "default_operator")]
    pub operator: String,
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
    #[serde(default)]
    pub threshold: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchPageArgs {
    pub page_token: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateTextArgs {
    pub video_id: String,
    pub prompt: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

#[derive(Debug, Deserialize)]
pub struct GistArgs {
    pub video_id: String,
    pub types: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeArgs {
    pub video_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

#[derive(Debug, Deserialize)]
pub struct TaskIdArgs {
    pub task_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ImportVideosArgs {
    pub integration_id: String,
    pub index_id: String,
    #[serde(default = "default_true")]
    pub incremental_import: bool,
}

#[derive(Debug, Deserialize)]
pub struct ImportStatusArgs {
    pub integration_id: String,
    pub index_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ImportLogsArgs {
    pub integration_id: String,
}
