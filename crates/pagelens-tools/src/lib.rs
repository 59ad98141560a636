//! pagelens Tools - document retrieval tools for LLM agents
//!
//! A thin query facade over a pre-built vector store collection:
//! - `semantic_search`: nearest passages to a query
//! - `get_document_pages`: full content of specific pages
//! - `search_with_page_filter`: similarity search inside a page range
//! - `find_pages_by_keywords`: pages surfaced by a set of keywords
//!
//! Each operation returns free text and is exposed as a schema-described
//! tool through `ToolRegistry`.

pub mod format;
pub mod query;
pub mod registry;
pub mod tool;
pub mod tools;

pub use query::DocumentQueryTools;
pub use registry::ToolRegistry;
pub use tool::{Tool, ToolCall, ToolDefinition, ToolError, ToolResult};
pub use tools::{
    tool_definitions, FindPagesByKeywordsTool, GetDocumentPagesTool, SearchWithPageFilterTool,
    SemanticSearchTool,
};
