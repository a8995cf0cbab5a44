//! Normalized tool result shapes.
//!
//! Each tool returns one of these, serialized as pretty JSON text. Upstream
//! field names are renamed here (`_id` becomes `id`, `data` becomes a named list).

use crate::api::types::*;
use crate::config::IndexModel;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CreatedIndex {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct IndexSummary {
    pub id: String,
    pub name: Option<String>,
    pub models: Vec<IndexModel>,
    pub addons: Vec<String>,
    pub video_count: u64,
    pub total_duration: f64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub expires_at: Option<String>,
}

impl From<IndexRecord> for IndexSummary {
    fn from(record: IndexRecord) -> Self {
        Self {
            id: record.id,
            name: record.index_name,
            models: record.models,
            addons: record.addons,
            video_count: record.video_count,
            total_duration: record.total_duration,
            created_at: record.created_at,
            updated_at: record.updated_at,
            expires_at: record.expires_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IndexList {
    pub indexes: Vec<IndexSummary>,
    pub page_info: PageInfo,
}

impl From<Page<IndexRecord>> for IndexList {
    fn from(page: Page<IndexRecord>) -> Self {
        Self {
            indexes: page.data.into_iter().map(IndexSummary::from).collect(),
            page_info: page.page_info,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IndexUpdated {
    pub id: String,
    pub name: String,
    pub updated: bool,
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub id: String,
    pub deleted: bool,
}

#[derive(Debug, Serialize)]
pub struct UploadedVideo {
    pub task_id: String,
    pub video_id: Option<String>,
}

impl From<CreatedTask> for UploadedVideo {
    fn from(task: CreatedTask) -> Self {
        Self {
            task_id: task.id,
            video_id: task.video_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchHit {
    pub video_id: String,
    pub score: f64,
    pub start: f64,
    pub end: f64,
    pub confidence: Option<String>,
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub results: Vec<SearchHit>,
    pub page_info: PageInfo,
}

impl From<SearchResponse> for SearchResults {
    fn from(response: SearchResponse) -> Self {
        let results = response
            .data
            .into_iter()
            .map(|clip| SearchHit {
                video_id: clip.video_id,
                score: clip.score,
                start: clip.start,
                end: clip.end,
                confidence: clip.confidence,
                thumbnail_url: clip.thumbnail_url,
            })
            .collect();
        Self {
            results,
            page_info: response.page_info,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GeneratedText {
    pub id: String,
    pub text: String,
}

impl From<GenerateResponse> for GeneratedText {
    fn from(response: GenerateResponse) -> Self {
        Self {
            id: response.id,
            text: response.data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Gist {
    pub id: String,
    pub title: Option<String>,
    pub topics: Vec<String>,
    pub hashtags: Vec<String>,
}

impl From<GistResponse> for Gist {
    fn from(response: GistResponse) -> Self {
        Self {
            id: response.id,
            title: response.title,
            topics: response.topics,
            hashtags: response.hashtags,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub summary: Option<String>,
    pub chapters: Vec<Chapter>,
    pub highlights: Vec<Highlight>,
}

impl Summary {
    pub fn new(kind: String, response: SummarizeResponse) -> Self {
        Self {
            id: response.id,
            kind,
            summary: response.summary,
            chapters: response.chapters,
            highlights: response.highlights,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TaskSummary {
    pub id: String,
    pub index_id: Option<String>,
    pub video_id: Option<String>,
    pub status: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub estimated_time: Option<String>,
    pub metadata: VideoMetadata,
}

impl From<TaskRecord> for TaskSummary {
    fn from(record: TaskRecord) -> Self {
        Self {
            id: record.id,
            index_id: record.index_id,
            video_id: record.video_id,
            status: record.status,
            created_at: record.created_at,
            updated_at: record.updated_at,
            estimated_time: record.estimated_time,
            metadata: record.system_metadata,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TaskList {
    pub tasks: Vec<TaskSummary>,
    pub page_info: PageInfo,
}

impl From<Page<TaskRecord>> for TaskList {
    fn from(page: Page<TaskRecord>) -> Self {
        Self {
            tasks: page.data.into_iter().map(TaskSummary::from).collect(),
            page_info: page.page_info,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ImportHistory {
    pub logs: Vec<ImportLog>,
}

impl From<ImportLogs> for ImportHistory {
    fn from(logs: ImportLogs) -> Self {
        Self { logs: logs.data }
    }
}
