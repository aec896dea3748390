//! # Corpus Embeddings
//!
//! Reference [`EmbeddingProvider`](corpus_document_store::EmbeddingProvider)
//! implementations for the corpus document store.
//!
//! The store re-fits its provider over the whole corpus on every mutation,
//! so a provider here must be cheap to fit and strictly deterministic. The
//! bundled [`HashedTfIdf`] vectorizer needs no model files or network access,
//! which also makes it the backend of choice for tests.
//!
//! ## Example
//!
//! ```no_run
//! use corpus_document_store::{CosineDistance, Document, DocumentStore};
//! use corpus_embeddings::HashedTfIdf;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = DocumentStore::new(Arc::new(HashedTfIdf::new()), Arc::new(CosineDistance));
//!
//!     store.add(Document::new("1", "the cat sat")).await?;
//!     store.add(Document::new("2", "the dog ran")).await?;
//!
//!     for hit in store.retrieve("cat", 5).await? {
//!         println!("{}: {}", hit.id(), hit.document.content);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod hashed;

pub use hashed::{HashedTfIdf, DEFAULT_DIMENSION};
