//! Post-extraction identity and metadata visibility

use std::collections::BTreeSet;

use crate::domain::{keys, DocumentRecord};

/// Assigns a synthetic `doc_id`, replacing anything a loader set, and derives
/// the metadata exclusion sets.
///
/// Ranking input hides `doc_id`; generation input hides `doc_id` and
/// `page_label` whether or not the record has a page label.
#[derive(Debug, Clone, Default)]
pub struct MetadataNormalizer;

impl MetadataNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, records: &mut [DocumentRecord]) {
        tracing::debug!(records = records.len(), "Normalizing document metadata");

        for record in records.iter_mut() {
            if !record.has_assigned_doc_id() {
                record.assign_doc_id(uuid::Uuid::new_v4().to_string());
            }

            let embed = BTreeSet::from([keys::DOC_ID.to_string()]);
            let llm = BTreeSet::from([keys::DOC_ID.to_string(), keys::PAGE_LABEL.to_string()]);
            record.set_visibility(embed, llm);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MetadataMode, TextBlock};
    use std::collections::HashSet;

    #[test]
    fn test_assigns_unique_doc_ids() {
        let mut records = vec![
            DocumentRecord::new("same"),
            DocumentRecord::new("same"),
            DocumentRecord::new("other"),
        ];

        MetadataNormalizer::new().normalize(&mut records);

        let ids: HashSet<_> = records.iter().map(|r| r.doc_id().unwrap().to_string()).collect();
        assert_eq!(ids.len(), 3);
        for id in &ids {
            assert!(uuid::Uuid::parse_str(id).is_ok());
        }
    }

    #[test]
    fn test_exclusion_sets() {
        let mut records = vec![
            DocumentRecord::new("no page"),
            DocumentRecord::from(TextBlock::new("paged").with_metadata(keys::PAGE_LABEL, 2)),
        ];

        MetadataNormalizer::new().normalize(&mut records);

        for record in &records {
            let embed: Vec<_> = record.excluded_embed_metadata_keys().iter().cloned().collect();
            let llm: Vec<_> = record.excluded_llm_metadata_keys().iter().cloned().collect();
            assert_eq!(embed, vec!["doc_id"]);
            assert_eq!(llm, vec!["doc_id", "page_label"]);
        }

        let llm_view = records[1].metadata_for(MetadataMode::Llm);
        assert!(!llm_view.contains_key("page_label"));
        assert!(records[1].metadata_for(MetadataMode::Embed).contains_key("page_label"));
    }

    #[test]
    fn test_normalize_is_stable_for_a_record() {
        let mut records = vec![DocumentRecord::new("text")];
        let normalizer = MetadataNormalizer::new();

        normalizer.normalize(&mut records);
        let first = records[0].doc_id().unwrap().to_string();
        normalizer.normalize(&mut records);

        assert_eq!(records[0].doc_id(), Some(first.as_str()));
    }

    #[test]
    fn test_loader_supplied_doc_ids_are_replaced() {
        let mut records = vec![
            DocumentRecord::from(TextBlock::new("a").with_metadata(keys::DOC_ID, "dup")),
            DocumentRecord::from(TextBlock::new("b").with_metadata(keys::DOC_ID, "dup")),
        ];

        MetadataNormalizer::new().normalize(&mut records);

        assert_ne!(records[0].doc_id(), Some("dup"));
        assert_ne!(records[1].doc_id(), Some("dup"));
        assert_ne!(records[0].doc_id(), records[1].doc_id());
    }

    #[test]
    fn test_normalize_empty() {
        let mut records: Vec<DocumentRecord> = Vec::new();
        MetadataNormalizer::new().normalize(&mut records);
        assert!(records.is_empty());
    }
}
