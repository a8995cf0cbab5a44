//! MCP tool definitions for vidbridge.
//!
//! The order here is the order `tools/list` reports.

use super::protocol::ToolDescriptor;
use serde_json::{json, Value};

pub const TASK_STATUSES: &[&str] = &[
    "ready",
    "uploading",
    "validating",
    "pending",
    "queued",
    "indexing",
    "failed",
];

/// Task statuses that allow deletion.
pub const DELETABLE_TASK_STATUSES: &[&str] = &["ready", "failed"];

fn tool(name: &str, description: &str, input_schema: Value) -> ToolDescriptor {
    ToolDescriptor {
        name: name.to_string(),
        description: description.to_string(),
        input_schema,
    }
}

fn pagination_properties() -> Value {
    json!({
        "page": {
            "type": "integer",
            "description": "Page number to retrieve",
            "minimum": 1,
            "default": 1
        },
        "page_limit": {
            "type": "integer",
            "description": "Number of items per page",
            "minimum": 1,
            "maximum": 50,
            "default": 10
        },
        "sort_by": {
            "type": "string",
            "description": "Field to sort by",
            "enum": ["created_at", "updated_at"]
        },
        "sort_option": {
            "type": "string",
            "description": "Sort direction",
            "enum": ["asc", "desc"]
        }
    })
}

/// Merge extra properties into the shared pagination properties.
fn with_pagination(extra: Value) -> Value {
    let mut properties = pagination_properties();
    if let (Some(base), Value::Object(extra)) = (properties.as_object_mut(), extra) {
        base.extend(extra);
    }
    properties
}

/// Get all available tools.
pub fn get_tools() -> Vec<ToolDescriptor> {
    vec![
        tool(
            "create_index",
            "Create a new video index. The index uses the configured embedding and \
                generative model pairing. Returns the new index ID.",
            json!({
                "type": "object",
                "properties": {
                    "index_name": {
                        "type": "string",
                        "description": "Name of the index (must be unique in the account)"
                    },
                    "addons": {
                        "type": "array",
                        "description": "Optional index features to enable",
                        "items": { "type": "string", "enum": ["thumbnail"] }
                    }
                },
                "required": ["index_name"]
            }),
        ),
        tool(
            "list_indexes",
            "List the video indexes in the account, one page at a time.",
            json!({
                "type": "object",
                "properties": with_pagination(json!({
                    "index_name": {
                        "type": "string",
                        "description": "Only return indexes with this name"
                    }
                })),
                "required": []
            }),
        ),
        tool(
            "get_index",
            "Get details of a video index by its ID, including models and video count.",
            json!({
                "type": "object",
                "properties": {
                    "index_id": {
                        "type": "string",
                        "description": "The index ID"
                    }
                },
                "required": ["index_id"]
            }),
        ),
        tool(
            "update_index",
            "Rename a video index.",
            json!({
                "type": "object",
                "properties": {
                    "index_id": {
                        "type": "string",
                        "description": "The index ID"
                    },
                    "index_name": {
                        "type": "string",
                        "description": "New name for the index"
                    }
                },
                "required": ["index_id", "index_name"]
            }),
        ),
        tool(
            "delete_index",
            "Delete a video index and all videos in it. This cannot be undone.",
            json!({
                "type": "object",
                "properties": {
                    "index_id": {
                        "type": "string",
                        "description": "The index ID"
                    }
                },
                "required": ["index_id"]
            }),
        ),
        tool(
            "upload_video",
            "Upload a video to an index from a publicly reachable URL. \
                Returns an ingestion task ID; poll it with get_task until it is ready.",
            json!({
                "type": "object",
                "properties": {
                    "index_id": {
                        "type": "string",
                        "description": "The index to upload into"
                    },
                    "video_url": {
                        "type": "string",
                        "description": "Direct URL of the video file"
                    },
                    "enable_video_stream": {
                        "type": "boolean",
                        "description": "Make the video available for streaming playback",
                        "default": true
                    }
                },
                "required": ["index_id", "video_url"]
            }),
        ),
        tool(
            "search_videos",
            "Search the videos in an index with a natural language query. \
                Returns matching clips with timestamps and scores.",
            json!({
                "type": "object",
                "properties": {
                    "index_id": {
                        "type": "string",
                        "description": "The index to search"
                    },
                    "query": {
                        "type": "string",
                        "description": "Search query"
                    },
                    "search_options": {
                        "type": "array",
                        "description": "Modalities to search",
                        "items": { "type": "string", "enum": ["visual", "audio"] },
                        "default": ["visual", "audio"]
                    },
                    "operator": {
                        "type": "string",
                        "description": "How to combine results across search options",
                        "enum": ["or", "and"],
                        "default": "or"
                    },
                    "page_limit": {
                        "type": "integer",
                        "description": "Maximum number of results per page",
                        "minimum": 1,
                        "maximum": 50,
                        "default": 10
                    },
                    "threshold": {
                        "type": "string",
                        "description": "Minimum confidence level of returned clips",
                        "enum": ["high", "medium", "low", "none"]
                    }
                },
                "required": ["index_id", "query"]
            }),
        ),
        tool(
            "search_next_page",
            "Fetch the next page of a previous search using its next_page_token.",
            json!({
                "type": "object",
                "properties": {
                    "page_token": {
                        "type": "string",
                        "description": "The next_page_token from a search result"
                    }
                },
                "required": ["page_token"]
            }),
        ),
        tool(
            "generate_text",
            "Generate free-form text about a video from a prompt \
                (questions, descriptions, reports).",
            json!({
                "type": "object",
                "properties": {
                    "video_id": {
                        "type": "string",
                        "description": "The video ID"
                    },
                    "prompt": {
                        "type": "string",
                        "description": "Instructions for the text to generate"
                    },
                    "temperature": {
                        "type": "number",
                        "description": "Randomness of the output (0.0-1.0)",
                        "minimum": 0,
                        "maximum": 1,
                        "default": 0.2
                    }
                },
                "required": ["video_id", "prompt"]
            }),
        ),
        tool(
            "generate_gist",
            "Generate a title, topics and hashtags for a video.",
            json!({
                "type": "object",
                "properties": {
                    "video_id": {
                        "type": "string",
                        "description": "The video ID"
                    },
                    "types": {
                        "type": "array",
                        "description": "Which gist fields to generate",
                        "items": { "type": "string", "enum": ["title", "topic", "hashtag"] }
                    }
                },
                "required": ["video_id", "types"]
            }),
        ),
        tool(
            "summarize_video",
            "Generate a summary, chapter list or highlight list for a video.",
            json!({
                "type": "object",
                "properties": {
                    "video_id": {
                        "type": "string",
                        "description": "The video ID"
                    },
                    "type": {
                        "type": "string",
                        "description": "Kind of output to generate",
                        "enum": ["summary", "chapter", "highlight"]
                    },
                    "prompt": {
                        "type": "string",
                        "description": "Optional guidance for the generated output"
                    },
                    "temperature": {
                        "type": "number",
                        "description": "Randomness of the output (0.0-1.0)",
                        "minimum": 0,
                        "maximum": 1,
                        "default": 0.2
                    }
                },
                "required": ["video_id", "type"]
            }),
        ),
        tool(
            "list_tasks",
            "List video ingestion tasks, optionally filtered by index or status.",
            json!({
                "type": "object",
                "properties": with_pagination(json!({
                    "index_id": {
                        "type": "string",
                        "description": "Only return tasks for this index"
                    },
                    "status": {
                        "type": "string",
                        "description": "Only return tasks with this status",
                        "enum": TASK_STATUSES
                    },
                    "filename": {
                        "type": "string",
                        "description": "Only return tasks for this filename"
                    }
                })),
                "required": []
            }),
        ),
        tool(
            "get_task",
            "Get the status and details of a video ingestion task.",
            json!({
                "type": "object",
                "properties": {
                    "task_id": {
                        "type": "string",
                        "description": "The task ID"
                    }
                },
                "required": ["task_id"]
            }),
        ),
        tool(
            "delete_task",
            "Delete a video ingestion task. Only tasks with status 'ready' or 'failed' \
                can be deleted.",
            json!({
                "type": "object",
                "properties": {
                    "task_id": {
                        "type": "string",
                        "description": "The task ID"
                    }
                },
                "required": ["task_id"]
            }),
        ),
        tool(
            "import_videos",
            "Import videos into an index from a cloud storage integration.",
            json!({
                "type": "object",
                "properties": {
                    "integration_id": {
                        "type": "string",
                        "description": "The integration ID"
                    },
                    "index_id": {
                        "type": "string",
                        "description": "The index to import into"
                    },
                    "incremental_import": {
                        "type": "boolean",
                        "description": "Only import files added since the last import",
                        "default": true
                    }
                },
                "required": ["integration_id", "index_id"]
            }),
        ),
        tool(
            "get_import_status",
            "Get the per-status file lists of an integration import into an index.",
            json!({
                "type": "object",
                "properties": {
                    "integration_id": {
                        "type": "string",
                        "description": "The integration ID"
                    },
                    "index_id": {
                        "type": "string",
                        "description": "The index the import targets"
                    }
                },
                "required": ["integration_id", "index_id"]
            }),
        ),
        tool(
            "get_import_logs",
            "Get the history of imports performed through an integration.",
            json!({
                "type": "object",
                "properties": {
                    "integration_id": {
                        "type": "string",
                        "description": "The integration ID"
                    }
                },
                "required": ["integration_id"]
            }),
        ),
    ]
}
