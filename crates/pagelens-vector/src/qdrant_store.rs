//! Qdrant implementation of `PageStore`
//!
//! Reads a collection that was ingested elsewhere. Query text is embedded
//! with the configured `EmbeddingClient`; nearest-neighbour ranking and
//! metadata filtering happen inside Qdrant.

use async_trait::async_trait;
use pagelens_core::{
    ChunkMetadata, PageChunk, PageFilter, PageStore, PagelensError, Result, StoreConfig,
};
use qdrant_client::qdrant::{
    Condition, Filter, PointId, ScrollPointsBuilder, SearchPointsBuilder, Value,
};
use qdrant_client::Qdrant;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::embedding::EmbeddingClient;

/// Where chunk text and metadata live inside a point payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadLayout {
    /// Key holding the chunk text
    pub content_key: String,

    /// Key of the nested metadata object; empty means top-level fields
    pub metadata_key: String,
}

impl Default for PayloadLayout {
    fn default() -> Self {
        Self {
            content_key: "page_content".to_string(),
            metadata_key: "metadata".to_string(),
        }
    }
}

impl PayloadLayout {
    /// Build from store config
    pub fn from_config(config: &StoreConfig) -> Self {
        Self {
            content_key: config.content_key.clone(),
            metadata_key: config.metadata_key.clone(),
        }
    }

    /// Payload path of a metadata field, as used in filter conditions
    pub fn metadata_field(&self, name: &str) -> String {
        if self.metadata_key.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.metadata_key, name)
        }
    }

    /// Build the Qdrant filter for a page filter
    pub fn page_filter(&self, filter: &PageFilter) -> Filter {
        let field = self.metadata_field("page");
        match filter {
            PageFilter::Page(page) => Filter::must([Condition::matches(field, i64::from(*page))]),
            PageFilter::AnyOf(pages) => Filter::should(
                pages
                    .iter()
                    .map(|page| Condition::matches(field.clone(), i64::from(*page))),
            ),
        }
    }

    /// Convert a point payload into a chunk
    pub fn chunk_from_payload(&self, payload: &HashMap<String, Value>) -> PageChunk {
        let content = payload
            .get(&self.content_key)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let metadata = if self.metadata_key.is_empty() {
            metadata_from_fields(payload)
        } else {
            payload
                .get(&self.metadata_key)
                .and_then(|v| v.as_struct())
                .map(|s| metadata_from_fields(&s.fields))
                .unwrap_or_default()
        };

        PageChunk { content, metadata }
    }
}

fn metadata_from_fields(fields: &HashMap<String, Value>) -> ChunkMetadata {
    ChunkMetadata {
        page: fields.get("page").and_then(page_number),
        source: fields
            .get("source")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()),
    }
}

/// Pages may be stored as integers or integral floats
fn page_number(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_integer() {
        return u32::try_from(n).ok();
    }
    value
        .as_double()
        .filter(|d| d.fract() == 0.0 && *d >= 0.0 && *d <= f64::from(u32::MAX))
        .map(|d| d as u32)
}

/// Qdrant-backed page store
pub struct QdrantPageStore {
    client: Qdrant,
    collection: String,
    layout: PayloadLayout,
    scroll_batch_size: u32,
    embedder: Box<dyn EmbeddingClient>,
}

impl QdrantPageStore {
    /// Create a new Qdrant connection
    pub fn new(config: &StoreConfig, embedder: Box<dyn EmbeddingClient>) -> Result<Self> {
        let client = Qdrant::from_url(&config.url)
            .api_key(config.api_key.clone())
            .build()
            .map_err(|e| PagelensError::DatabaseError(format!("Qdrant connection failed: {e}")))?;

        info!(
            url = %config.url,
            collection = %config.collection_name,
            embedding_model = embedder.model(),
            "Connected page store"
        );

        Ok(Self {
            client,
            collection: config.collection_name.clone(),
            layout: PayloadLayout::from_config(config),
            scroll_batch_size: config.scroll_batch_size.max(1),
            embedder,
        })
    }

    /// Check that the configured collection exists
    pub async fn collection_exists(&self) -> Result<bool> {
        let exists = self
            .client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| PagelensError::DatabaseError(format!("Failed to check collection: {e}")))?;

        if !exists {
            warn!(collection = %self.collection, "Collection not found");
        }
        Ok(exists)
    }
}

#[async_trait]
impl PageStore for QdrantPageStore {
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<PageChunk>> {
        let vector = self.embedder.embed(query).await?;

        let results = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection, vector, k as u64).with_payload(true),
            )
            .await
            .map_err(|e| PagelensError::SearchError(format!("Vector search failed: {e}")))?;

        let chunks: Vec<PageChunk> = results
            .result
            .iter()
            .map(|point| self.layout.chunk_from_payload(&point.payload))
            .collect();

        debug!(k, returned = chunks.len(), "Similarity search completed");
        Ok(chunks)
    }

    async fn get_by_filter(&self, filter: &PageFilter) -> Result<Vec<PageChunk>> {
        let qdrant_filter = self.layout.page_filter(filter);
        let mut chunks = Vec::new();
        let mut offset: Option<PointId> = None;

        loop {
            let mut request = ScrollPointsBuilder::new(&self.collection)
                .filter(qdrant_filter.clone())
                .limit(self.scroll_batch_size)
                .with_payload(true);
            if let Some(next) = offset.take() {
                request = request.offset(next);
            }

            let response = self
                .client
                .scroll(request)
                .await
                .map_err(|e| PagelensError::SearchError(format!("Filtered scroll failed: {e}")))?;

            chunks.extend(
                response
                    .result
                    .iter()
                    .map(|point| self.layout.chunk_from_payload(&point.payload)),
            );

            match response.next_page_offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        debug!(?filter, returned = chunks.len(), "Filtered lookup completed");
        Ok(chunks)
    }

    fn name(&self) -> &str {
        "qdrant"
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> HashMap<String, Value> {
        value
            .as_object()
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(|(k, v)| (k, v.into()))
            .collect()
    }

    #[test]
    fn test_nested_metadata_payload() {
        let layout = PayloadLayout::default();
        let chunk = layout.chunk_from_payload(&payload(json!({
            "page_content": "Water withdrawal by source",
            "metadata": { "page": 12, "source": "esg.pdf" }
        })));

        assert_eq!(chunk.content, "Water withdrawal by source");
        assert_eq!(chunk.page(), Some(12));
        assert_eq!(chunk.metadata.source.as_deref(), Some("esg.pdf"));
    }

    #[test]
    fn test_flat_payload() {
        let layout = PayloadLayout {
            content_key: "content".to_string(),
            metadata_key: String::new(),
        };
        let chunk = layout.chunk_from_payload(&payload(json!({
            "content": "Board composition",
            "page": 3.0
        })));

        assert_eq!(chunk.content, "Board composition");
        assert_eq!(chunk.page(), Some(3));
    }

    #[test]
    fn test_missing_or_invalid_page() {
        let layout = PayloadLayout::default();

        let chunk = layout.chunk_from_payload(&payload(json!({
            "page_content": "Cover",
            "metadata": {}
        })));
        assert_eq!(chunk.page(), None);

        let chunk = layout.chunk_from_payload(&payload(json!({
            "page_content": "Appendix",
            "metadata": { "page": -1 }
        })));
        assert_eq!(chunk.page(), None);

        let chunk = layout.chunk_from_payload(&payload(json!({
            "page_content": "Half page",
            "metadata": { "page": 2.5 }
        })));
        assert_eq!(chunk.page(), None);

        let chunk = layout.chunk_from_payload(&payload(json!({ "metadata": { "page": 1 } })));
        assert_eq!(chunk.content, "");
        assert_eq!(chunk.page(), Some(1));
    }

    #[test]
    fn test_metadata_field_path() {
        assert_eq!(PayloadLayout::default().metadata_field("page"), "metadata.page");

        let flat = PayloadLayout {
            content_key: "text".to_string(),
            metadata_key: String::new(),
        };
        assert_eq!(flat.metadata_field("page"), "page");
    }

    #[test]
    fn test_page_filter_shapes() {
        let layout = PayloadLayout::default();

        let exact = layout.page_filter(&PageFilter::Page(7));
        assert_eq!(exact.must.len(), 1);
        assert!(exact.should.is_empty());

        let any = layout.page_filter(&PageFilter::AnyOf(vec![3, 5]));
        assert!(any.must.is_empty());
        assert_eq!(any.should.len(), 2);
    }
}
