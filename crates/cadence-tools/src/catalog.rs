//! # Built-in Catalog
//!
//! Specifications for every tool an agent ships with. Executors for the
//! memory tools and `message_chatgpt` are supplied by the host; the rest
//! have standard executors in this crate.

use cadence_core::{
    MAX_PAUSE_HEARTBEATS, PAUSE_TOOL_NAME, PropertyType, SchemaError, ToolRegistry,
    ToolSpecification,
};

const PAGE_DESCRIPTION: &str =
    "Allows you to page through results. Only use on a follow-up query. Defaults to 0 (first page).";
const UNICODE_CONTENT: &str =
    "Content to write to the memory. All unicode (including emojis) are supported.";
const MEMORY_SECTION: &str = "Section of the memory to be edited (persona or human).";
const START_DATE: &str = "The start of the date range to search, in the format 'YYYY-MM-DD'.";
const END_DATE: &str = "The end of the date range to search, in the format 'YYYY-MM-DD'.";

/// Tools for talking to the user and controlling heartbeats.
pub fn messaging_specifications() -> Vec<ToolSpecification> {
    vec![
        ToolSpecification::builder("send_message", "Sends a message to the human user.")
            .property(
                "message",
                PropertyType::String,
                "Message contents. All unicode (including emojis) are supported.",
            )
            .required("message")
            .build(),
        ToolSpecification::builder(
            PAUSE_TOOL_NAME,
            "Temporarily ignore timed heartbeats. You may still receive messages from manual heartbeats and other events.",
        )
        .property(
            "minutes",
            PropertyType::Integer,
            format!(
                "Number of minutes to ignore heartbeats for. Max value of {} minutes ({} hours).",
                MAX_PAUSE_HEARTBEATS,
                MAX_PAUSE_HEARTBEATS / 60
            ),
        )
        .required("minutes")
        .build(),
        ToolSpecification::builder(
            "message_chatgpt",
            "Send a message to a more basic AI, ChatGPT. A useful resource for asking questions. ChatGPT does not retain memory of previous interactions.",
        )
        .property(
            "message",
            PropertyType::String,
            "Message to send ChatGPT. Phrase your message as a full English sentence.",
        )
        .required("message")
        .with_heartbeat()
        .build(),
    ]
}

/// Core, recall and archival memory tools. Executors come from the host.
pub fn memory_specifications() -> Vec<ToolSpecification> {
    vec![
        ToolSpecification::builder("core_memory_append", "Append to the contents of core memory.")
            .property("name", PropertyType::String, MEMORY_SECTION)
            .property("content", PropertyType::String, UNICODE_CONTENT)
            .required_all(["name", "content"])
            .with_heartbeat()
            .build(),
        ToolSpecification::builder(
            "core_memory_replace",
            "Replace the contents of core memory. To delete memories, use an empty string for new_content.",
        )
        .property("name", PropertyType::String, MEMORY_SECTION)
        .property(
            "old_content",
            PropertyType::String,
            "String to replace. Must be an exact match.",
        )
        .property("new_content", PropertyType::String, UNICODE_CONTENT)
        .required_all(["name", "old_content", "new_content"])
        .with_heartbeat()
        .build(),
        ToolSpecification::builder(
            "recall_memory_search",
            "Search prior conversation history using a string.",
        )
        .property("query", PropertyType::String, "String to search for.")
        .property("page", PropertyType::Integer, PAGE_DESCRIPTION)
        .required_all(["query", "page"])
        .with_heartbeat()
        .build(),
        ToolSpecification::builder(
            "conversation_search",
            "Search prior conversation history using case-insensitive string matching.",
        )
        .property("query", PropertyType::String, "String to search for.")
        .property("page", PropertyType::Integer, PAGE_DESCRIPTION)
        .required("query")
        .with_heartbeat()
        .build(),
        ToolSpecification::builder(
            "recall_memory_search_date",
            "Search prior conversation history using a date range.",
        )
        .property("start_date", PropertyType::String, START_DATE)
        .property("end_date", PropertyType::String, END_DATE)
        .property("page", PropertyType::Integer, PAGE_DESCRIPTION)
        .required_all(["start_date", "end_date", "page"])
        .with_heartbeat()
        .build(),
        ToolSpecification::builder(
            "conversation_search_date",
            "Search prior conversation history using a date range.",
        )
        .property("start_date", PropertyType::String, START_DATE)
        .property("end_date", PropertyType::String, END_DATE)
        .property("page", PropertyType::Integer, PAGE_DESCRIPTION)
        .required_all(["start_date", "end_date"])
        .with_heartbeat()
        .build(),
        ToolSpecification::builder(
            "archival_memory_insert",
            "Add to archival memory. Make sure to phrase the memory contents such that it can be easily queried later.",
        )
        .property("content", PropertyType::String, UNICODE_CONTENT)
        .required("content")
        .with_heartbeat()
        .build(),
        ToolSpecification::builder(
            "archival_memory_search",
            "Search archival memory using semantic (embedding-based) search.",
        )
        .property("query", PropertyType::String, "String to search for.")
        .property("page", PropertyType::Integer, PAGE_DESCRIPTION)
        .required("query")
        .with_heartbeat()
        .build(),
    ]
}

/// Text file and HTTP tools.
pub fn io_specifications() -> Vec<ToolSpecification> {
    vec![
        ToolSpecification::builder("read_from_text_file", "Read lines from a text file.")
            .property("filename", PropertyType::String, "The name of the file to read.")
            .property("line_start", PropertyType::Integer, "Line to start reading from.")
            .property(
                "num_lines",
                PropertyType::Integer,
                "How many lines to read (defaults to 1).",
            )
            .required_all(["filename", "line_start"])
            .with_heartbeat()
            .build(),
        ToolSpecification::builder("append_to_text_file", "Append to a text file.")
            .property(
                "filename",
                PropertyType::String,
                "The name of the file to append to.",
            )
            .property("content", PropertyType::String, "Content to append to the file.")
            .required_all(["filename", "content"])
            .with_heartbeat()
            .build(),
        ToolSpecification::builder(
            "http_request",
            "Generates an HTTP request and returns the response.",
        )
        .property(
            "method",
            PropertyType::String,
            "The HTTP method (e.g., 'GET', 'POST').",
        )
        .property("url", PropertyType::String, "The URL for the request.")
        .property(
            "payload_json",
            PropertyType::String,
            "A JSON string representing the request payload.",
        )
        .required_all(["method", "url"])
        .with_heartbeat()
        .build(),
    ]
}

/// Issue tracker tools.
pub fn issue_specifications() -> Vec<ToolSpecification> {
    vec![
        ToolSpecification::builder(
            "get_jira",
            "Queries the user's JIRA instance for a given Jira issue key and returns details",
        )
        .property(
            "issue_key",
            PropertyType::String,
            "The JIRA key of the issue. KMS-1234 for example",
        )
        .required("issue_key")
        .with_heartbeat()
        .build(),
        ToolSpecification::builder(
            "get_jira_fields",
            "Queries the user's JIRA instance for a given Jira issue key and returns only the requested fields",
        )
        .property(
            "issue_key",
            PropertyType::String,
            "The JIRA key of the issue. KMS-1234 for example",
        )
        .property(
            "fields",
            PropertyType::String,
            "Comma separated field names, e.g. \"summary,status,assignee\"",
        )
        .required_all(["issue_key", "fields"])
        .with_heartbeat()
        .build(),
        ToolSpecification::builder(
            "query_jira",
            "Queries the user's JIRA instance. It takes a JQL and executes it on the instance. ",
        )
        .property(
            "jql",
            PropertyType::String,
            "JQL that is desired to run on the Jira instance. Make sure it's compatible with JIRA Cloud.",
        )
        .property(
            "max_results",
            PropertyType::Integer,
            "The maximum number of issues to return.",
        )
        .required("jql")
        .with_heartbeat()
        .build(),
        ToolSpecification::builder(
            "get_projects",
            "Makes a request to user's JIRA instance and returns the projects",
        )
        .with_heartbeat()
        .build(),
        ToolSpecification::builder(
            "get_boards",
            "Makes a request to user's JIRA instance and returns the boards",
        )
        .with_heartbeat()
        .build(),
        ToolSpecification::builder(
            "get_board_id",
            "Makes a request to user's JIRA instance and returns the board id",
        )
        .property("board_name", PropertyType::String, "the board name.")
        .required("board_name")
        .with_heartbeat()
        .build(),
        ToolSpecification::builder(
            "get_board",
            "Makes a request to user's JIRA instance and returns the board",
        )
        .property("board_id", PropertyType::Integer, "the board id.")
        .required("board_id")
        .with_heartbeat()
        .build(),
        ToolSpecification::builder(
            "get_sprints",
            "Makes a request to user's JIRA instance and returns the sprints",
        )
        .property("board_id", PropertyType::Integer, "the board id.")
        .required("board_id")
        .with_heartbeat()
        .build(),
        ToolSpecification::builder(
            "get_sprint",
            "Makes a request to user's JIRA instance and returns the sprint name",
        )
        .property("sprint_id", PropertyType::Integer, "the sprint id.")
        .required("sprint_id")
        .with_heartbeat()
        .build(),
    ]
}

/// Every built-in specification, in listing order.
pub fn builtin_specifications() -> Vec<ToolSpecification> {
    let mut specs = messaging_specifications();
    specs.extend(memory_specifications());
    specs.extend(io_specifications());
    specs.extend(issue_specifications());
    specs
}

/// A registry holding the built-in catalog.
pub fn builtin_registry() -> Result<ToolRegistry, SchemaError> {
    let mut registry = ToolRegistry::new();
    registry.register_all(builtin_specifications())?;
    Ok(registry)
}
