use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A text document as handed to the store by the caller.
///
/// Identity is `id`; the store enforces uniqueness on every insertion path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            metadata: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: HashMap<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// A document paired with the vector the most recent corpus fit produced for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedDocument {
    pub document: Document,
    pub embedding: Vec<f32>,
}

impl EmbeddedDocument {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.document.id
    }
}
