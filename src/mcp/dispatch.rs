//! Tool dispatcher: validates a call, runs its upstream request, shapes the result.

use super::args::*;
use super::protocol::{ToolCallResult, ToolDescriptor};
use super::results::*;
use super::schema;
use super::tools::{get_tools, DELETABLE_TASK_STATUSES};
use crate::api::types::*;
use crate::api::ApiClient;
use crate::config::ModelSettings;
use crate::error::{BridgeError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, info_span, warn, Instrument};

/// Executes tool invocations against the upstream API.
///
/// Holds no per-call state; one instance serves every call for the process lifetime.
pub struct Dispatcher {
    client: ApiClient,
    models: ModelSettings,
    tools: Vec<ToolDescriptor>,
}

impl Dispatcher {
    pub fn new(client: ApiClient, models: ModelSettings) -> Self {
        Self {
            client,
            models,
            tools: get_tools(),
        }
    }

    /// The registered tools, in listing order.
    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    /// Run one invocation end to end. Errors come back as an error-flagged result.
    pub async fn call(&self, name: &str, arguments: Option<Value>) -> ToolCallResult {
        let span = info_span!("tool_call", tool = %name);
        match self.try_call(name, arguments).instrument(span).await {
            Ok(text) => {
                info!(tool = %name, "Tool call succeeded");
                ToolCallResult::text(text)
            }
            Err(e) => {
                warn!(tool = %name, "Tool call failed: {}", e);
                ToolCallResult::error(e.to_string())
            }
        }
    }

    async fn try_call(&self, name: &str, arguments: Option<Value>) -> Result<String> {
        let descriptor = self
            .tools
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| BridgeError::UnknownTool(name.to_string()))?;

        let args = match arguments {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map,
            Some(other) => {
                return Err(BridgeError::InvalidInvocation(format!(
                    "Arguments must be an object, got {}",
                    other
                )))
            }
        };
        schema::validate(&descriptor.input_schema, &args)?;

        let value = match name {
            "create_index" => render(self.create_index(parse(args)?).await?),
            "list_indexes" => render(self.list_indexes(parse(args)?).await?),
            "get_index" => render(self.get_index(parse(args)?).await?),
            "update_index" => render(self.update_index(parse(args)?).await?),
            "delete_index" => render(self.delete_index(parse(args)?).await?),
            "upload_video" => render(self.upload_video(parse(args)?).await?),
            "search_videos" => render(self.search_videos(parse(args)?).await?),
            "search_next_page" => render(self.search_next_page(parse(args)?).await?),
            "generate_text" => render(self.generate_text(parse(args)?).await?),
            "generate_gist" => render(self.generate_gist(parse(args)?).await?),
            "summarize_video" => render(self.summarize_video(parse(args)?).await?),
            "list_tasks" => render(self.list_tasks(parse(args)?).await?),
            "get_task" => render(self.get_task(parse(args)?).await?),
            "delete_task" => render(self.delete_task(parse(args)?).await?),
            "import_videos" => render(self.import_videos(parse(args)?).await?),
            "get_import_status" => render(self.get_import_status(parse(args)?).await?),
            "get_import_logs" => render(self.get_import_logs(parse(args)?).await?),
            _ => Err(BridgeError::UnknownTool(name.to_string())),
        }?;

        Ok(value)
    }

    // === Indexes ===

    async fn create_index(&self, args: CreateIndexArgs) -> Result<CreatedIndex> {
        let request = CreateIndexRequest {
            index_name: args.index_name,
            models: self.models.index_models.clone(),
            addons: args.addons,
        };
        let created = self.client.create_index(&request).await?;
        Ok(CreatedIndex {
            id: created.id,
            name: request.index_name,
        })
    }

    async fn list_indexes(&self, query: ListIndexesQuery) -> Result<IndexList> {
        Ok(self.client.list_indexes(&query).await?.into())
    }

    async fn get_index(&self, args: IndexIdArgs) -> Result<IndexSummary> {
        Ok(self.client.get_index(&args.index_id).await?.into())
    }

    async fn update_index(&self, args: UpdateIndexArgs) -> Result<IndexUpdated> {
        let request = UpdateIndexRequest {
            index_name: args.index_name,
        };
        self.client.update_index(&args.index_id, &request).await?;
        Ok(IndexUpdated {
            id: args.index_id,
            name: request.index_name,
            updated: true,
        })
    }

    async fn delete_index(&self, args: IndexIdArgs) -> Result<Deleted> {
        self.client.delete_index(&args.index_id).await?;
        Ok(Deleted {
            id: args.index_id,
            deleted: true,
        })
    }

    // === Tasks ===

    async fn upload_video(&self, args: UploadVideoArgs) -> Result<UploadedVideo> {
        let request = UploadVideoRequest {
            index_id: args.index_id,
            video_url: args.video_url,
            enable_video_stream: args.enable_video_stream,
        };
        Ok(self.client.create_task(&request).await?.into())
    }

    async fn list_tasks(&self, query: ListTasksQuery) -> Result<TaskList> {
        Ok(self.client.list_tasks(&query).await?.into())
    }

    async fn get_task(&self, args: TaskIdArgs) -> Result<TaskSummary> {
        Ok(self.client.get_task(&args.task_id).await?.into())
    }

    /// Delete a task, but only once it has reached a terminal status.
    async fn delete_task(&self, args: TaskIdArgs) -> Result<Deleted> {
        let task = self.client.get_task(&args.task_id).await?;
        if !DELETABLE_TASK_STATUSES.contains(&task.status.as_str()) {
            return Err(BridgeError::InvalidState(format!(
                "Task {} has status '{}'; only tasks with status {} can be deleted",
                args.task_id,
                task.status,
                DELETABLE_TASK_STATUSES
                    .iter()
                    .map(|s| format!("'{}'", s))
                    .collect::<Vec<_>>()
                    .join(" or ")
            )));
        }
        self.client.delete_task(&args.task_id).await?;
        Ok(Deleted {
            id: args.task_id,
            deleted: true,
        })
    }

    // === Search ===

    async fn search_videos(&self, args: SearchArgs) -> Result<SearchResults> {
        let request = SearchRequest {
            index_id: args.index_id,
            query_text: args.query,
            search_options: args.search_options,
            operator: args.operator,
            page_limit: args.page_limit,
            threshold: args.threshold,
        };
        Ok(self.client.search(&request).await?.into())
    }

    async fn search_next_page(&self, args: SearchPageArgs) -> Result<SearchResults> {
        Ok(self.client.search_page(&args.page_token).await?.into())
    }

    // === Generation ===

    async fn generate_text(&self, args: GenerateTextArgs) -> Result<GeneratedText> {
        let request = GenerateRequest {
            video_id: args.video_id,
            prompt: args.prompt,
            temperature: args.temperature,
            stream: false,
        };
        Ok(self.client.generate(&request).await?.into())
    }

    async fn generate_gist(&self, args: GistArgs) -> Result<Gist> {
        let request = GistRequest {
            video_id: args.video_id,
            types: args.types,
        };
        Ok(self.client.gist(&request).await?.into())
    }

    async fn summarize_video(&self, args: SummarizeArgs) -> Result<Summary> {
        let request = SummarizeRequest {
            video_id: args.video_id,
            kind: args.kind,
            prompt: args.prompt,
            temperature: args.temperature,
        };
        let response = self.client.summarize(&request).await?;
        Ok(Summary::new(request.kind, response))
    }

    // === Integration imports ===

    async fn import_videos(&self, args: ImportVideosArgs) -> Result<ImportResponse> {
        let request = ImportRequest {
            index_id: args.index_id,
            incremental_import: args.incremental_import,
        };
        self.client
            .import_videos(&args.integration_id, &request)
            .await
    }

    async fn get_import_status(&self, args: ImportStatusArgs) -> Result<ImportStatus> {
        let query = ImportStatusQuery {
            index_id: args.index_id,
        };
        self.client
            .import_status(&args.integration_id, &query)
            .await
    }

    async fn get_import_logs(&self, args: ImportLogsArgs) -> Result<ImportHistory> {
        Ok(self.client.import_logs(&args.integration_id).await?.into())
    }
}

/// Deserialize validated arguments into a tool's typed argument struct.
///
/// Explicit nulls are dropped first so optional fields take their defaults.
fn parse<T: DeserializeOwned>(mut args: Map<String, Value>) -> Result<T> {
    args.retain(|_, value| !value.is_null());
    serde_json::from_value(Value::Object(args))
        .map_err(|e| BridgeError::InvalidInvocation(format!("Invalid arguments: {}", e)))
}

/// Render a result shape as the text payload of a success envelope.
fn render<T: Serialize>(result: T) -> Result<String> {
    Ok(serde_json::to_string_pretty(&result)?)
}
