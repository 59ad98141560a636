//! The four document retrieval tools.
//!
//! Each record pairs a name, description and input schema with a handler
//! that parses the JSON input and delegates to `DocumentQueryTools`.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::query::{DocumentQueryTools, DEFAULT_RANGE_K, DEFAULT_SEMANTIC_K};
use crate::tool::{parse_input, Tool, ToolDefinition, ToolError};

pub const SEMANTIC_SEARCH: &str = "semantic_search";
pub const GET_DOCUMENT_PAGES: &str = "get_document_pages";
pub const SEARCH_WITH_PAGE_FILTER: &str = "search_with_page_filter";
pub const FIND_PAGES_BY_KEYWORDS: &str = "find_pages_by_keywords";

fn default_semantic_k() -> usize {
    DEFAULT_SEMANTIC_K
}

fn default_range_k() -> usize {
    DEFAULT_RANGE_K
}

/// Definitions of the four tools, in registration order.
///
/// Static: listing schemas never needs a store connection.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        semantic_search_definition(),
        get_document_pages_definition(),
        search_with_page_filter_definition(),
        find_pages_by_keywords_definition(),
    ]
}

// ============================================================================
// semantic_search
// ============================================================================

#[derive(Debug, Deserialize)]
struct SemanticSearchArgs {
    query: String,
    #[serde(default = "default_semantic_k")]
    k: usize,
}

/// Similarity search over the whole document.
pub struct SemanticSearchTool {
    tools: DocumentQueryTools,
}

impl SemanticSearchTool {
    pub fn new(tools: DocumentQueryTools) -> Self {
        Self { tools }
    }
}

pub fn semantic_search_definition() -> ToolDefinition {
    ToolDefinition {
        name: SEMANTIC_SEARCH.to_string(),
        description: "Search the document using semantic similarity. Returns the closest \
                      passages with their page numbers."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query to find relevant content"
                },
                "k": {
                    "type": "integer",
                    "description": "Number of results to return",
                    "default": DEFAULT_SEMANTIC_K,
                    "minimum": 0
                }
            },
            "required": ["query"]
        }),
    }
}

#[async_trait]
impl Tool for SemanticSearchTool {
    fn definition(&self) -> ToolDefinition {
        semantic_search_definition()
    }

    async fn execute(&self, input: Value) -> Result<String, ToolError> {
        let args: SemanticSearchArgs = parse_input(input)?;
        Ok(self.tools.semantic_search(&args.query, args.k).await?)
    }
}

// ============================================================================
// get_document_pages
// ============================================================================

#[derive(Debug, Deserialize)]
struct GetDocumentPagesArgs {
    pages: Vec<u32>,
}

/// Exact lookup of full page content.
pub struct GetDocumentPagesTool {
    tools: DocumentQueryTools,
}

impl GetDocumentPagesTool {
    pub fn new(tools: DocumentQueryTools) -> Self {
        Self { tools }
    }
}

pub fn get_document_pages_definition() -> ToolDefinition {
    ToolDefinition {
        name: GET_DOCUMENT_PAGES.to_string(),
        description: "Get the full content of specific document pages.".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "pages": {
                    "type": "array",
                    "items": { "type": "integer", "minimum": 0 },
                    "description": "List of page numbers to retrieve"
                }
            },
            "required": ["pages"]
        }),
    }
}

#[async_trait]
impl Tool for GetDocumentPagesTool {
    fn definition(&self) -> ToolDefinition {
        get_document_pages_definition()
    }

    async fn execute(&self, input: Value) -> Result<String, ToolError> {
        let args: GetDocumentPagesArgs = parse_input(input)?;
        Ok(self.tools.get_document_pages(&args.pages).await?)
    }
}

// ============================================================================
// search_with_page_filter
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchWithPageFilterArgs {
    query: String,
    start_page: u32,
    end_page: u32,
    #[serde(default = "default_range_k")]
    k: usize,
}

/// Similarity search restricted to a page range.
pub struct SearchWithPageFilterTool {
    tools: DocumentQueryTools,
}

impl SearchWithPageFilterTool {
    pub fn new(tools: DocumentQueryTools) -> Self {
        Self { tools }
    }
}

pub fn search_with_page_filter_definition() -> ToolDefinition {
    ToolDefinition {
        name: SEARCH_WITH_PAGE_FILTER.to_string(),
        description: "Search within a specific page range (inclusive). Best effort: \
                      only the top matches of the whole document are considered."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                },
                "start_page": {
                    "type": "integer",
                    "description": "Starting page number (inclusive)",
                    "minimum": 0
                },
                "end_page": {
                    "type": "integer",
                    "description": "Ending page number (inclusive)",
                    "minimum": 0
                },
                "k": {
                    "type": "integer",
                    "description": "Number of results to return",
                    "default": DEFAULT_RANGE_K,
                    "minimum": 0
                }
            },
            "required": ["query", "start_page", "end_page"]
        }),
    }
}

#[async_trait]
impl Tool for SearchWithPageFilterTool {
    fn definition(&self) -> ToolDefinition {
        search_with_page_filter_definition()
    }

    async fn execute(&self, input: Value) -> Result<String, ToolError> {
        let args: SearchWithPageFilterArgs = parse_input(input)?;
        Ok(self
            .tools
            .search_with_page_filter(&args.query, args.start_page, args.end_page, args.k)
            .await?)
    }
}

// ============================================================================
// find_pages_by_keywords
// ============================================================================

#[derive(Debug, Deserialize)]
struct FindPagesByKeywordsArgs {
    keywords: Vec<String>,
}

/// Map keywords to the pages where they most likely appear.
pub struct FindPagesByKeywordsTool {
    tools: DocumentQueryTools,
}

impl FindPagesByKeywordsTool {
    pub fn new(tools: DocumentQueryTools) -> Self {
        Self { tools }
    }
}

pub fn find_pages_by_keywords_definition() -> ToolDefinition {
    ToolDefinition {
        name: FIND_PAGES_BY_KEYWORDS.to_string(),
        description: "Find page numbers related to specific keywords. Uses semantic \
                      similarity, not exact text matching."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "keywords": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "List of keywords to search for"
                }
            },
            "required": ["keywords"]
        }),
    }
}

#[async_trait]
impl Tool for FindPagesByKeywordsTool {
    fn definition(&self) -> ToolDefinition {
        find_pages_by_keywords_definition()
    }

    async fn execute(&self, input: Value) -> Result<String, ToolError> {
        let args: FindPagesByKeywordsArgs = parse_input(input)?;
        Ok(self.tools.find_pages_by_keywords(&args.keywords).await?)
    }
}
