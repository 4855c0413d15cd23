//! Document record and raw text block types

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Well-known metadata keys
pub mod keys {
    /// Source path of the file a record came from
    pub const FILE_NAME: &str = "file_name";
    /// Synthetic identifier assigned during normalization
    pub const DOC_ID: &str = "doc_id";
    /// 1-based page number for page-oriented extractors
    pub const PAGE_LABEL: &str = "page_label";
    /// Kind of chunk produced by the extractor (e.g. "image", "para")
    pub const CHUNK_TYPE: &str = "chunk_type";
}

/// Raw output of a format loader: text plus optional per-block metadata.
///
/// Loaders cannot set visibility; that is derived later by the normalizer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub text: String,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl TextBlock {
    /// Create a block with no metadata
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: HashMap::new(),
        }
    }

    /// Add a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Which consumer the metadata is being rendered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataMode {
    /// Every metadata key
    #[default]
    All,
    /// Semantic ranking / embedding input
    Embed,
    /// Generation context input
    Llm,
    /// No metadata at all
    None,
}

/// Normalized output unit of the pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentRecord {
    pub text: String,
    pub metadata: HashMap<String, serde_json::Value>,
    excluded_embed_metadata_keys: BTreeSet<String>,
    excluded_llm_metadata_keys: BTreeSet<String>,
    #[serde(skip)]
    doc_id_assigned: bool,
}

impl DocumentRecord {
    /// Create a record with empty visibility sets
    pub fn new(text: impl Into<String>) -> Self {
        Self::from(TextBlock::new(text))
    }

    /// Synthetic identifier, present once the record has been normalized
    pub fn doc_id(&self) -> Option<&str> {
        self.metadata.get(keys::DOC_ID).and_then(|v| v.as_str())
    }

    pub fn file_name(&self) -> Option<&str> {
        self.metadata.get(keys::FILE_NAME).and_then(|v| v.as_str())
    }

    pub fn page_label(&self) -> Option<u64> {
        self.metadata.get(keys::PAGE_LABEL).and_then(|v| v.as_u64())
    }

    /// Keys hidden from semantic ranking
    pub fn excluded_embed_metadata_keys(&self) -> &BTreeSet<String> {
        &self.excluded_embed_metadata_keys
    }

    /// Keys hidden from the generation context
    pub fn excluded_llm_metadata_keys(&self) -> &BTreeSet<String> {
        &self.excluded_llm_metadata_keys
    }

    /// Overwrite `doc_id` with a synthetic identifier, replacing any value a
    /// loader may have written
    pub(crate) fn assign_doc_id(&mut self, doc_id: impl Into<String>) {
        self.metadata
            .insert(keys::DOC_ID.to_string(), doc_id.into().into());
        self.doc_id_assigned = true;
    }

    /// Whether `doc_id` came from [`assign_doc_id`](Self::assign_doc_id)
    pub(crate) fn has_assigned_doc_id(&self) -> bool {
        self.doc_id_assigned
    }

    pub(crate) fn set_visibility(&mut self, embed: BTreeSet<String>, llm: BTreeSet<String>) {
        self.excluded_embed_metadata_keys = embed;
        self.excluded_llm_metadata_keys = llm;
    }

    /// Metadata visible to the given consumer, ordered by key
    pub fn metadata_for(&self, mode: MetadataMode) -> BTreeMap<&str, &serde_json::Value> {
        let excluded = match mode {
            MetadataMode::All => None,
            MetadataMode::Embed => Some(&self.excluded_embed_metadata_keys),
            MetadataMode::Llm => Some(&self.excluded_llm_metadata_keys),
            MetadataMode::None => return BTreeMap::new(),
        };

        self.metadata
            .iter()
            .filter(|(key, _)| excluded.is_none_or(|set| !set.contains(key.as_str())))
            .map(|(key, value)| (key.as_str(), value))
            .collect()
    }

    /// Render visible metadata as `key: value` lines followed by the text
    pub fn content_for(&self, mode: MetadataMode) -> String {
        let header = self
            .metadata_for(mode)
            .into_iter()
            .map(|(key, value)| match value {
                serde_json::Value::String(s) => format!("{}: {}", key, s),
                other => format!("{}: {}", key, other),
            })
            .collect::<Vec<_>>()
            .join("\n");

        if header.is_empty() {
            self.text.clone()
        } else {
            format!("{}\n\n{}", header, self.text)
        }
    }
}

impl From<TextBlock> for DocumentRecord {
    fn from(block: TextBlock) -> Self {
        Self {
            text: block.text,
            metadata: block.metadata,
            excluded_embed_metadata_keys: BTreeSet::new(),
            excluded_llm_metadata_keys: BTreeSet::new(),
            doc_id_assigned: false,
        }
    }
}
