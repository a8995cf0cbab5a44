//! Wire types for the upstream video API.
//!
//! Response structs default every field the API may omit: lists become empty,
//! nested objects become their empty form, scalars become `None`.

use crate::config::IndexModel;
use serde::{Deserialize, Deserializer, Serialize};

// === Requests ===

#[derive(Debug, Clone, Serialize)]
pub struct CreateIndexRequest {
    pub index_name: String,
    pub models: Vec<IndexModel>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub addons: Vec<String>,
}

/// Query parameters for `GET /indexes`. Doubles as the tool's argument shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListIndexesQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_option: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateIndexRequest {
    pub index_name: String,
}

/// Query parameters for `GET /tasks`. Doubles as the tool's argument shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListTasksQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_option: Option<String>,
}

/// Fields of the multipart `POST /tasks` upload.
#[derive(Debug, Clone)]
pub struct UploadVideoRequest {
    pub index_id: String,
    pub video_url: String,
    pub enable_video_stream: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    pub index_id: String,
    pub query_text: String,
    pub search_options: Vec<String>,
    pub operator: String,
    pub page_limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub video_id: String,
    pub prompt: String,
    pub temperature: f64,
    pub stream: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GistRequest {
    pub video_id: String,
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummarizeRequest {
    pub video_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    pub temperature: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportRequest {
    pub index_id: String,
    pub incremental_import: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportStatusQuery {
    pub index_id: String,
}

// === Responses ===

/// Read an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body returned by endpoints that create a resource.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedResource {
    #[serde(rename = "_id")]
    pub id: String,
}

/// Pagination block shared by list and search responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_per_page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_results: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_page_token: Option<String>,
}

/// A paginated list response.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_default")]
    pub data: Vec<T>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub page_info: PageInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub index_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub models: Vec<IndexModel>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub addons: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub video_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_duration: f64,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
}

/// Source video properties reported on a task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub index_id: Option<String>,
    #[serde(default)]
    pub video_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub estimated_time: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub system_metadata: VideoMetadata,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedTask {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<SearchClip>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub page_info: PageInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchClip {
    #[serde(default, deserialize_with = "null_as_default")]
    pub video_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub end: f64,
    #[serde(default)]
    pub confidence: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GistResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub topics: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hashtags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummarizeResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub chapters: Vec<Chapter>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub highlights: Vec<Highlight>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Chapter {
    #[serde(deserialize_with = "null_as_default")]
    pub chapter_number: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub start: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub end: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub chapter_title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub chapter_summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Highlight {
    #[serde(deserialize_with = "null_as_default")]
    pub start: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub end: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub highlight: String,
    #[serde(deserialize_with = "null_as_default")]
    pub highlight_summary: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub videos: Vec<ImportedVideo>,
    #[serde(deserialize_with = "null_as_default")]
    pub failed_files: Vec<FailedFile>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportedVideo {
    #[serde(deserialize_with = "null_as_default")]
    pub video_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub filename: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FailedFile {
    #[serde(deserialize_with = "null_as_default")]
    pub filename: String,
    #[serde(deserialize_with = "null_as_default")]
    pub error_message: String,
}

/// Per-status file lists for an integration import.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportStatus {
    #[serde(deserialize_with = "null_as_default")]
    pub ready: Vec<ImportedFile>,
    #[serde(deserialize_with = "null_as_default")]
    pub validating: Vec<ImportedFile>,
    #[serde(deserialize_with = "null_as_default")]
    pub pending: Vec<ImportedFile>,
    #[serde(deserialize_with = "null_as_default")]
    pub queued: Vec<ImportedFile>,
    #[serde(deserialize_with = "null_as_default")]
    pub indexing: Vec<ImportedFile>,
    #[serde(deserialize_with = "null_as_default")]
    pub failed: Vec<ImportedFile>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportedFile {
    pub video_id: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub filename: String,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ImportLogs {
    #[serde(deserialize_with = "null_as_default")]
    pub data: Vec<ImportLog>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportLog {
    pub index_id: Option<String>,
    pub index_name: Option<String>,
    pub created_at: Option<String>,
    pub ended_at: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub video_status: VideoStatusCounts,
    #[serde(deserialize_with = "null_as_default")]
    pub failed_files: Vec<FailedFile>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoStatusCounts {
    #[serde(deserialize_with = "null_as_default")]
    pub ready: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub validating: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub queued: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub pending: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub indexing: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub failed: u64,
}
