//! Document query facade
//!
//! Wraps one `PageStore` and turns four retrieval intents into store
//! calls plus human-readable text. Every operation is stateless; the only
//! shared state is the read-only store handle.

use pagelens_core::{AppConfig, PageChunk, PageFilter, PageStore, Result};
use pagelens_vector::{create_embedding_client, QdrantPageStore};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

use crate::format::{render_pages, render_passages, RANGE_PREVIEW_CHARS, SEMANTIC_PREVIEW_CHARS};
use crate::registry::ToolRegistry;
use crate::tools::{
    FindPagesByKeywordsTool, GetDocumentPagesTool, SearchWithPageFilterTool, SemanticSearchTool,
};

/// Default result count for `semantic_search`
pub const DEFAULT_SEMANTIC_K: usize = 5;

/// Default result count for `search_with_page_filter`
pub const DEFAULT_RANGE_K: usize = 3;

/// Over-fetch factor used to approximate range-filtered similarity search
pub const RANGE_OVERFETCH: usize = 3;

/// Per-keyword result count for `find_pages_by_keywords`
pub const KEYWORD_K: usize = 10;

/// Query facade over a pre-built document collection
#[derive(Clone)]
pub struct DocumentQueryTools {
    store: Arc<dyn PageStore>,
}

impl DocumentQueryTools {
    /// Create a facade over an existing store handle
    pub fn new(store: Arc<dyn PageStore>) -> Self {
        Self { store }
    }

    /// Connect the embedding model and the Qdrant collection from config
    pub async fn connect(config: &AppConfig) -> Result<Self> {
        let embedder = create_embedding_client(&config.embedding)?;
        let store = QdrantPageStore::new(&config.store, embedder)?;
        store.collection_exists().await?;
        Ok(Self::new(Arc::new(store)))
    }

    /// Build the four tools as one ordered collection
    pub fn create_tools(&self) -> ToolRegistry {
        ToolRegistry::from_tools(vec![
            Arc::new(SemanticSearchTool::new(self.clone())),
            Arc::new(GetDocumentPagesTool::new(self.clone())),
            Arc::new(SearchWithPageFilterTool::new(self.clone())),
            Arc::new(FindPagesByKeywordsTool::new(self.clone())),
        ])
    }

    /// Search the document by semantic similarity
    pub async fn semantic_search(&self, query: &str, k: usize) -> Result<String> {
        info!(backend = self.store.name(), k, "semantic_search");
        let results = self.store.similarity_search(query, k).await?;

        if results.is_empty() {
            return Ok("No results found for the query.".to_string());
        }

        let header = format!("Found {} relevant passages:", results.len());
        Ok(render_passages(&header, &results, SEMANTIC_PREVIEW_CHARS))
    }

    /// Fetch the full content of specific pages
    pub async fn get_document_pages(&self, pages: &[u32]) -> Result<String> {
        let Some(filter) = PageFilter::for_pages(pages) else {
            return Ok("No pages specified.".to_string());
        };

        info!(backend = self.store.name(), ?pages, "get_document_pages");
        let chunks = self.store.get_by_filter(&filter).await?;

        if chunks.is_empty() {
            return Ok(format!("No content found for pages: {pages:?}"));
        }

        Ok(render_pages(&chunks))
    }

    /// Similarity search restricted to an inclusive page range.
    ///
    /// Over-fetches `k * 3` results and filters locally, so an in-range
    /// match ranked below that cut is missed.
    pub async fn search_with_page_filter(
        &self,
        query: &str,
        start_page: u32,
        end_page: u32,
        k: usize,
    ) -> Result<String> {
        let fetch = k.saturating_mul(RANGE_OVERFETCH);
        info!(
            backend = self.store.name(),
            start_page,
            end_page,
            k,
            fetch,
            "search_with_page_filter"
        );
        let results = self.store.similarity_search(query, fetch).await?;
        let returned = results.len();

        let filtered = filter_page_range(results, start_page, end_page, k);
        debug!(returned, kept = filtered.len(), "Range filter applied");

        if filtered.is_empty() {
            return Ok(format!("No results found in pages {start_page}-{end_page}."));
        }

        let header = format!(
            "Found {} results in pages {start_page}-{end_page}:",
            filtered.len()
        );
        Ok(render_passages(&header, &filtered, RANGE_PREVIEW_CHARS))
    }

    /// Collect the pages surfaced by a similarity search for each keyword
    pub async fn find_pages_by_keywords(&self, keywords: &[String]) -> Result<String> {
        if keywords.is_empty() {
            return Ok("No keywords provided.".to_string());
        }

        info!(
            backend = self.store.name(),
            keywords = keywords.len(),
            "find_pages_by_keywords"
        );

        let mut all_pages = BTreeSet::new();
        for keyword in keywords {
            let results = self.store.similarity_search(keyword, KEYWORD_K).await?;
            let before = all_pages.len();
            all_pages.extend(results.iter().filter_map(PageChunk::page));
            debug!(keyword = %keyword, new_pages = all_pages.len() - before, "Keyword searched");
        }

        if all_pages.is_empty() {
            return Ok(format!("No pages found containing keywords: {keywords:?}"));
        }

        let sorted_pages: Vec<u32> = all_pages.into_iter().collect();
        Ok(format!(
            "Found {} pages containing keywords {keywords:?}:\nPages: {sorted_pages:?}",
            sorted_pages.len()
        ))
    }
}

/// Keep chunks whose page lies in `[start, end]`, preserving rank order,
/// and cut to `k`. Chunks without a page never match.
fn filter_page_range(chunks: Vec<PageChunk>, start: u32, end: u32, k: usize) -> Vec<PageChunk> {
    chunks
        .into_iter()
        .filter(|chunk| {
            chunk
                .page()
                .is_some_and(|page| (start..=end).contains(&page))
        })
        .take(k)
        .collect()
}
