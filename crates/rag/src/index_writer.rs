//! Index Writer
//!
//! Single write path into the dual index. Catalog ingestion pushes every
//! normalized document into the vector store, the full-text index, and the
//! in-process catalog store in one pass; FAQ ingestion chunks crawled pages
//! first. Read paths never write, so index state only changes here.

use std::collections::HashMap;
use std::sync::Arc;

use bedding_agent_core::CanonicalDocument;

use crate::catalog_store::CatalogStore;
use crate::chunker::TextChunker;
use crate::embeddings::Embedder;
use crate::sparse_search::SparseIndex;
use crate::vector_store::{DenseWriter, IndexDocument};
use crate::RagError;

/// Writer over one corpus pair plus the shared catalog store
pub struct IndexWriter {
    embedder: Arc<dyn Embedder>,
    product_vectors: Arc<dyn DenseWriter>,
    product_fulltext: Arc<SparseIndex>,
    qa_vectors: Arc<dyn DenseWriter>,
    qa_fulltext: Arc<SparseIndex>,
    catalog: Arc<CatalogStore>,
    chunker: TextChunker,
}

impl IndexWriter {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        product_vectors: Arc<dyn DenseWriter>,
        product_fulltext: Arc<SparseIndex>,
        qa_vectors: Arc<dyn DenseWriter>,
        qa_fulltext: Arc<SparseIndex>,
        catalog: Arc<CatalogStore>,
        chunker: TextChunker,
    ) -> Self {
        Self {
            embedder,
            product_vectors,
            product_fulltext,
            qa_vectors,
            qa_fulltext,
            catalog,
            chunker,
        }
    }

    /// Index a normalized catalog build into all three product-side targets.
    ///
    /// The catalog store is replaced wholesale and both indexes upsert by
    /// document id, so re-running ingestion converges instead of
    /// accumulating stale entries.
    pub async fn index_catalog(&self, documents: &[CanonicalDocument]) -> Result<(), RagError> {
        if documents.is_empty() {
            tracing::warn!("Catalog ingestion called with no documents");
            self.catalog.replace_all(Vec::new());
            return Ok(());
        }

        let index_docs: Vec<IndexDocument> = documents
            .iter()
            .map(|doc| {
                let mut metadata = HashMap::new();
                metadata.insert("product_name".to_string(), doc.product_name.clone());
                metadata.insert("category".to_string(), doc.category.clone());
                if let Some(min) = doc.price_range.min {
                    metadata.insert("price_min".to_string(), min.to_string());
                }
                if let Some(max) = doc.price_range.max {
                    metadata.insert("price_max".to_string(), max.to_string());
                }
                if let Some(pricing_type) = doc.pricing_type {
                    metadata.insert(
                        "pricing_type".to_string(),
                        pricing_type.as_str().to_string(),
                    );
                }
                IndexDocument {
                    id: doc.id.clone(),
                    content: doc.content.clone(),
                    metadata,
                }
            })
            .collect();

        let texts: Vec<String> = index_docs.iter().map(|d| d.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        self.product_vectors.upsert(&index_docs, &embeddings).await?;
        self.product_fulltext.index_documents(&index_docs)?;
        self.catalog.replace_all(documents.to_vec());

        tracing::info!(documents = documents.len(), "Catalog indexed");
        Ok(())
    }

    /// Chunk one crawled FAQ page and index the chunks into the QA corpus.
    ///
    /// Chunk ids derive from the source url and chunk position, so
    /// re-crawling a page replaces its previous chunks at the same ids.
    pub async fn index_qa_source(
        &self,
        source: &str,
        url: &str,
        text: &str,
    ) -> Result<usize, RagError> {
        let chunks = self.chunker.chunk(text);
        if chunks.is_empty() {
            tracing::warn!(source, url, "FAQ page produced no chunks");
            return Ok(0);
        }

        let index_docs: Vec<IndexDocument> = chunks
            .iter()
            .map(|chunk| {
                let mut metadata = HashMap::new();
                metadata.insert("source".to_string(), source.to_string());
                metadata.insert("url".to_string(), url.to_string());
                IndexDocument {
                    id: format!("{}#{}", url, chunk.index),
                    content: chunk.text.clone(),
                    metadata,
                }
            })
            .collect();

        let texts: Vec<String> = index_docs.iter().map(|d| d.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        self.qa_vectors.upsert(&index_docs, &embeddings).await?;
        self.qa_fulltext.index_documents(&index_docs)?;

        tracing::info!(source, url, chunks = index_docs.len(), "FAQ source indexed");
        Ok(index_docs.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bedding_agent_core::{PriceRange, Variant};
    use parking_lot::Mutex;

    use crate::chunker::ChunkConfig;
    use crate::embeddings::SimpleEmbedder;
    use crate::sparse_search::SparseConfig;

    /// Records upserted documents instead of talking to Qdrant
    #[derive(Default)]
    struct RecordingWriter {
        upserted: Mutex<Vec<IndexDocument>>,
    }

    #[async_trait]
    impl DenseWriter for RecordingWriter {
        async fn upsert(
            &self,
            documents: &[IndexDocument],
            embeddings: &[Vec<f32>],
        ) -> Result<(), RagError> {
            assert_eq!(documents.len(), embeddings.len());
            self.upserted.lock().extend(documents.iter().cloned());
            Ok(())
        }
    }

    fn doc(id: &str, category: &str) -> CanonicalDocument {
        let variants = vec![Variant::fixed("3*4", 750)];
        CanonicalDocument {
            id: id.to_string(),
            content: format!("類別: {} | 產品名稱: {} | 描述", category, id),
            product_name: id.to_string(),
            category: category.to_string(),
            price_range: PriceRange::from_variants(&variants),
            variants,
            pricing_type: None,
            availability_status: None,
        }
    }

    struct Fixture {
        writer: IndexWriter,
        product_vectors: Arc<RecordingWriter>,
        qa_vectors: Arc<RecordingWriter>,
        product_fulltext: Arc<SparseIndex>,
        qa_fulltext: Arc<SparseIndex>,
        catalog: Arc<CatalogStore>,
    }

    fn fixture() -> Fixture {
        let product_vectors = Arc::new(RecordingWriter::default());
        let qa_vectors = Arc::new(RecordingWriter::default());
        let product_fulltext = Arc::new(SparseIndex::new(SparseConfig::default()).unwrap());
        let qa_fulltext = Arc::new(SparseIndex::new(SparseConfig::default()).unwrap());
        let catalog = Arc::new(CatalogStore::new());

        let writer = IndexWriter::new(
            Arc::new(SimpleEmbedder::new(32)),
            product_vectors.clone(),
            product_fulltext.clone(),
            qa_vectors.clone(),
            qa_fulltext.clone(),
            catalog.clone(),
            TextChunker::new(ChunkConfig {
                chunk_size: 20,
                chunk_overlap: 5,
            }),
        );

        Fixture {
            writer,
            product_vectors,
            qa_vectors,
            product_fulltext,
            qa_fulltext,
            catalog,
        }
    }

    #[tokio::test]
    async fn catalog_ingestion_feeds_all_three_targets() {
        let f = fixture();
        let docs = vec![doc("康適被", "棉被"), doc("乳膠枕", "枕頭")];

        f.writer.index_catalog(&docs).await.unwrap();

        assert_eq!(f.product_vectors.upserted.lock().len(), 2);
        assert_eq!(f.product_fulltext.doc_count(), 2);
        assert_eq!(f.catalog.len(), 2);

        let upserted = f.product_vectors.upserted.lock();
        assert_eq!(upserted[0].metadata.get("category").unwrap(), "棉被");
        assert!(f.qa_vectors.upserted.lock().is_empty());
    }

    #[tokio::test]
    async fn reingestion_replaces_catalog_state() {
        let f = fixture();
        f.writer.index_catalog(&[doc("a", "棉被")]).await.unwrap();
        f.writer.index_catalog(&[doc("b", "枕頭")]).await.unwrap();

        assert_eq!(f.catalog.len(), 1);
        assert!(f.catalog.get("a").is_none());
        assert!(f.catalog.get("b").is_some());
        // Full-text upserts by id, so the old document stays searchable only
        // under its own id
        assert_eq!(f.product_fulltext.doc_count(), 2);
    }

    #[tokio::test]
    async fn qa_ingestion_chunks_and_tags_provenance() {
        let f = fixture();
        let text = "枕頭保養須知。".repeat(10);

        let count = f
            .writer
            .index_qa_source("保養指南", "https://example.com/care", &text)
            .await
            .unwrap();

        assert!(count > 1);
        assert_eq!(f.qa_fulltext.doc_count() as usize, count);

        let upserted = f.qa_vectors.upserted.lock();
        assert_eq!(upserted.len(), count);
        assert_eq!(upserted[0].id, "https://example.com/care#0");
        assert_eq!(upserted[0].metadata.get("source").unwrap(), "保養指南");
        assert_eq!(
            upserted[0].metadata.get("url").unwrap(),
            "https://example.com/care"
        );
    }

    #[tokio::test]
    async fn empty_inputs_are_benign() {
        let f = fixture();

        f.writer.index_catalog(&[]).await.unwrap();
        assert!(f.catalog.is_empty());

        let count = f
            .writer
            .index_qa_source("空白頁", "https://example.com/empty", "   ")
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
