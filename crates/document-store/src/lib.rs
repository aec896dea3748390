//! # Corpus Document Store
//!
//! In-process document storage with mutation and nearest-neighbor retrieval,
//! built around one consistency rule: every mutation re-fits the embedding
//! model over the **entire current corpus**, so every stored vector is always
//! a product of the same model state and comparable to every other.
//!
//! ## Features
//!
//! - **Corpus-consistent embeddings** — full re-fit on every add/update/delete
//! - **Injected capabilities** — embedding provider and similarity metric are
//!   constructor arguments, not baked-in backends
//! - **Batch mutation** — `add_many` appends a whole batch under one re-fit
//! - **Deterministic retrieval** — ascending distance, ties in insertion order
//! - **Optional deadlines** — provider fit/infer calls can be bounded
//!
//! ## Architecture
//!
//! ```text
//! Document[]
//!     │
//!     ├──> Embedding Provider (injected)
//!     │      └─> fit(corpus) -> Vector[D] per document
//!     │      └─> infer(query) -> Vector[D]
//!     │
//!     └──> Similarity Metric (injected)
//!            └─> ascending-distance top-K ranking
//! ```
//!
//! Mutations serialize through a single writer lock held across the re-fit;
//! readers always observe a fully consistent snapshot.

mod config;
mod error;
mod metric;
mod provider;
mod store;
mod types;

pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use metric::{CosineDistance, SimilarityMetric};
pub use provider::EmbeddingProvider;
pub use store::{DocumentStore, DEFAULT_TOP_K};
pub use types::{Document, EmbeddedDocument};
