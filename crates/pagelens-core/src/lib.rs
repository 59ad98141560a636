//! pagelens Core - Domain models, traits, and shared types
//!
//! This crate defines the abstractions shared by the pagelens crates:
//! - Document chunks and their page metadata
//! - Exact page filters for structured lookups
//! - The `PageStore` trait implemented by vector store backends
//! - Common error types
//! - Configuration management

pub mod config;

pub use config::{
    AppConfig, ConfigError, EmbeddingConfig, EmbeddingProvider, LoggingConfig, StoreConfig,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for pagelens operations
#[derive(Error, Debug)]
pub enum PagelensError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Search error: {0}")]
    SearchError(String),

    #[error("Embedding error: {0}")]
    EmbeddingError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ConfigError> for PagelensError {
    fn from(err: ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PagelensError>;

// ============================================================================
// Document Models
// ============================================================================

/// Metadata attached to a stored chunk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Page number the chunk was taken from (if the ingester recorded one)
    pub page: Option<u32>,

    /// Originating file or URL
    pub source: Option<String>,
}

/// A chunk of document text as returned by the vector store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageChunk {
    /// Text content
    pub content: String,

    /// Chunk metadata
    pub metadata: ChunkMetadata,
}

impl PageChunk {
    /// Create a chunk with no page metadata
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: ChunkMetadata::default(),
        }
    }

    /// Set page number
    pub fn with_page(mut self, page: u32) -> Self {
        self.metadata.page = Some(page);
        self
    }

    /// Set source
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.metadata.source = Some(source.into());
        self
    }

    /// Page number, if present
    pub fn page(&self) -> Option<u32> {
        self.metadata.page
    }
}

// ============================================================================
// Filters
// ============================================================================

/// Exact metadata filter on the `page` field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageFilter {
    /// `page == n`
    Page(u32),
    /// `page == a OR page == b OR ...`
    AnyOf(Vec<u32>),
}

impl PageFilter {
    /// Build the filter for a requested page list.
    ///
    /// Returns `None` for an empty list; a single page becomes an exact
    /// match, anything longer a disjunction.
    pub fn for_pages(pages: &[u32]) -> Option<Self> {
        match pages {
            [] => None,
            [page] => Some(Self::Page(*page)),
            _ => Some(Self::AnyOf(pages.to_vec())),
        }
    }

    /// Check whether a chunk page satisfies the filter
    pub fn matches(&self, page: Option<u32>) -> bool {
        let Some(page) = page else {
            return false;
        };
        match self {
            Self::Page(p) => *p == page,
            Self::AnyOf(pages) => pages.contains(&page),
        }
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Read-only access to a pre-built chunk collection.
///
/// Ranking, distance metric and filter evaluation are owned by the backend.
#[async_trait::async_trait]
pub trait PageStore: Send + Sync {
    /// Return the `k` chunks nearest to `query`, best match first
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<PageChunk>>;

    /// Return every chunk whose metadata satisfies `filter`, in store order
    async fn get_by_filter(&self, filter: &PageFilter) -> Result<Vec<PageChunk>>;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

// ============================================================================
// Tests
// ============================================================================
