//! Full-text Search using Tantivy (BM25)
//!
//! Keyword side of the hybrid retriever. The catalog and FAQ corpora are
//! bilingual (Traditional Chinese / English), so the registered tokenizer is
//! a plain unicode tokenizer with lowercasing and no stemmer; CJK runs index
//! as whole tokens.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::Path;
use tantivy::{
    collector::TopDocs,
    query::QueryParser,
    schema::{Field, OwnedValue, Schema, TextFieldIndexing, TextOptions, STORED, STRING},
    tokenizer::{LowerCaser, RemoveLongFilter, SimpleTokenizer, TextAnalyzer},
    Index, IndexReader, IndexWriter, TantivyDocument,
};

use crate::vector_store::IndexDocument;
use crate::RagError;

/// Metadata keys stored alongside the indexed text
const METADATA_FIELDS: [&str; 4] = ["product_name", "category", "source", "url"];

/// Full-text index configuration
#[derive(Debug, Clone, Default)]
pub struct SparseConfig {
    /// On-disk index path (RAM index when `None`)
    pub index_path: Option<String>,
}

/// One ranked candidate from a full-text search
#[derive(Debug, Clone)]
pub struct SparseHit {
    pub id: String,
    /// BM25 score
    pub score: f32,
    pub content: String,
    pub metadata: HashMap<String, String>,
}

/// Full-text index over one corpus
pub struct SparseIndex {
    index: Index,
    reader: IndexReader,
    writer: RwLock<IndexWriter>,
    id_field: Field,
    content_field: Field,
    metadata_fields: HashMap<&'static str, Field>,
}

impl SparseIndex {
    /// Create a new full-text index
    pub fn new(config: SparseConfig) -> Result<Self, RagError> {
        let mut schema_builder = Schema::builder();

        let text_options = TextOptions::default()
            .set_indexing_options(
                TextFieldIndexing::default()
                    .set_tokenizer("bilingual")
                    .set_index_option(tantivy::schema::IndexRecordOption::WithFreqsAndPositions),
            )
            .set_stored();

        let id_field = schema_builder.add_text_field("id", STRING | STORED);
        let content_field = schema_builder.add_text_field("content", text_options);

        let mut metadata_fields = HashMap::new();
        for name in METADATA_FIELDS {
            metadata_fields.insert(name, schema_builder.add_text_field(name, STRING | STORED));
        }

        let schema = schema_builder.build();

        let index = if let Some(ref path) = config.index_path {
            let dir = tantivy::directory::MmapDirectory::open(Path::new(path))
                .map_err(|e| RagError::Index(e.to_string()))?;
            Index::open_or_create(dir, schema).map_err(|e| RagError::Index(e.to_string()))?
        } else {
            Index::create_in_ram(schema)
        };

        let tokenizer = TextAnalyzer::builder(SimpleTokenizer::default())
            .filter(RemoveLongFilter::limit(100))
            .filter(LowerCaser)
            .build();
        index.tokenizers().register("bilingual", tokenizer);

        let reader = index.reader().map_err(|e| RagError::Index(e.to_string()))?;

        let writer = index
            .writer(50_000_000) // 50MB buffer
            .map_err(|e| RagError::Index(e.to_string()))?;

        Ok(Self {
            index,
            reader,
            writer: RwLock::new(writer),
            id_field,
            content_field,
            metadata_fields,
        })
    }

    /// Index a batch of documents and make them visible to searches.
    ///
    /// Documents are deleted by id first, so re-indexing the same id
    /// replaces rather than duplicates.
    pub fn index_documents(&self, documents: &[IndexDocument]) -> Result<(), RagError> {
        let mut writer = self.writer.write();

        for doc in documents {
            let term = tantivy::Term::from_field_text(self.id_field, &doc.id);
            writer.delete_term(term);

            let mut tantivy_doc = TantivyDocument::default();
            tantivy_doc.add_text(self.id_field, &doc.id);
            tantivy_doc.add_text(self.content_field, &doc.content);

            for (name, field) in &self.metadata_fields {
                if let Some(value) = doc.metadata.get(*name) {
                    tantivy_doc.add_text(*field, value);
                }
            }

            writer
                .add_document(tantivy_doc)
                .map_err(|e| RagError::Index(e.to_string()))?;
        }

        writer
            .commit()
            .map_err(|e| RagError::Index(e.to_string()))?;

        self.reader
            .reload()
            .map_err(|e| RagError::Index(e.to_string()))?;

        Ok(())
    }

    /// Ranked BM25 search over the content field
    pub fn search(&self, query: &str, top_k: usize) -> Result<Vec<SparseHit>, RagError> {
        let searcher = self.reader.searcher();
        let query_parser = QueryParser::for_index(&self.index, vec![self.content_field]);

        // User queries are free text; punctuation that breaks the query
        // grammar must degrade to a lenient parse, not an error.
        let (query, errors) = query_parser.parse_query_lenient(query);
        if !errors.is_empty() {
            tracing::debug!(?errors, "Lenient query parse");
        }

        let top_docs = searcher
            .search(&query, &TopDocs::with_limit(top_k))
            .map_err(|e| RagError::Search(e.to_string()))?;

        let mut results = Vec::with_capacity(top_docs.len());

        for (score, doc_address) in top_docs {
            let doc: TantivyDocument = searcher
                .doc(doc_address)
                .map_err(|e| RagError::Search(e.to_string()))?;

            let get_str = |field: Field| -> String {
                doc.get_first(field)
                    .and_then(|v| match v {
                        OwnedValue::Str(s) => Some(s.clone()),
                        _ => None,
                    })
                    .unwrap_or_default()
            };

            let mut metadata = HashMap::new();
            for (name, field) in &self.metadata_fields {
                let value = get_str(*field);
                if !value.is_empty() {
                    metadata.insert((*name).to_string(), value);
                }
            }

            results.push(SparseHit {
                id: get_str(self.id_field),
                score,
                content: get_str(self.content_field),
                metadata,
            });
        }

        Ok(results)
    }

    /// Number of searchable documents
    pub fn doc_count(&self) -> u64 {
        self.reader.searcher().num_docs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, content: &str, name: &str) -> IndexDocument {
        let mut metadata = HashMap::new();
        metadata.insert("product_name".to_string(), name.to_string());
        metadata.insert("category".to_string(), "棉被".to_string());
        IndexDocument {
            id: id.to_string(),
            content: content.to_string(),
            metadata,
        }
    }

    #[test]
    fn empty_index() {
        let index = SparseIndex::new(SparseConfig::default()).unwrap();
        assert_eq!(index.doc_count(), 0);
    }

    #[test]
    fn index_and_search() {
        let index = SparseIndex::new(SparseConfig::default()).unwrap();

        index
            .index_documents(&[
                doc("1", "類別: 棉被 | 產品名稱: 康適被 | breathable antibacterial quilt", "康適被"),
                doc("2", "類別: 枕頭 | 產品名稱: 乳膠枕 | latex pillow for side sleepers", "乳膠枕"),
            ])
            .unwrap();

        assert_eq!(index.doc_count(), 2);

        let results = index.search("antibacterial quilt", 10).unwrap();
        assert!(!results.is_empty());
        assert_eq!(results[0].id, "1");
        assert_eq!(results[0].metadata.get("category").unwrap(), "棉被");

        let results = index.search("乳膠枕", 10).unwrap();
        assert!(!results.is_empty());
        assert_eq!(results[0].id, "2");
    }

    #[test]
    fn reindexing_same_id_replaces() {
        let index = SparseIndex::new(SparseConfig::default()).unwrap();
        index
            .index_documents(&[doc("1", "old content quilt", "康適被")])
            .unwrap();
        index
            .index_documents(&[doc("1", "new content quilt", "康適被")])
            .unwrap();

        assert_eq!(index.doc_count(), 1);
        let results = index.search("quilt", 10).unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].content.contains("new"));
    }

    #[test]
    fn malformed_query_degrades() {
        let index = SparseIndex::new(SparseConfig::default()).unwrap();
        index
            .index_documents(&[doc("1", "breathable quilt", "康適被")])
            .unwrap();

        // Unbalanced quote would fail a strict parse
        let results = index.search("\"breathable quilt", 10);
        assert!(results.is_ok());
    }
}
