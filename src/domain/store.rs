//! Published configuration snapshots
//!
//! A [`DocumentStore`] holds the currently published document. Publishing
//! validates the candidate first and swaps in a new [`Snapshot`] only when
//! the report is clean. Readers clone the `Arc` they were handed and keep a
//! consistent view for as long as they hold it, whatever is published after.

use super::document::ConfigurationDocument;
use crate::codec::Codec;
use crate::errors::{MuleConfigError, Result};
use crate::validation::{ValidationReport, Validator};
use chrono::{DateTime, Utc};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, warn};
use uuid::Uuid;

/// An immutable, validated document.
#[derive(Debug)]
pub struct Snapshot {
    pub revision: Uuid,
    pub published_at: DateTime<Utc>,
    pub document: ConfigurationDocument,
    /// Report the document passed with (warnings only).
    pub report: ValidationReport,
}

#[derive(Debug, Default)]
pub struct DocumentStore {
    current: RwLock<Option<Arc<Snapshot>>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest published snapshot.
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.current.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Validate and publish a document. Invalid documents are rejected with
    /// their report and the current snapshot stays in place.
    pub fn publish(&self, document: ConfigurationDocument, validator: &Validator<'_>) -> Result<Arc<Snapshot>> {
        let report = validator.validate(&document);
        if !report.is_valid() {
            warn!(
                errors = report.error_count(),
                warnings = report.warning_count(),
                "Rejected configuration document"
            );
            return Err(MuleConfigError::rejected(report));
        }

        let snapshot = Arc::new(Snapshot {
            revision: Uuid::new_v4(),
            published_at: Utc::now(),
            document,
            report,
        });

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&snapshot));
        info!(
            revision = %snapshot.revision,
            document_id = snapshot.document.id().unwrap_or("-"),
            warnings = snapshot.report.warning_count(),
            "Published configuration document"
        );
        Ok(snapshot)
    }

    /// Parse `text` and publish the result.
    pub fn reload(&self, text: &str, codec: &Codec<'_>, validator: &Validator<'_>) -> Result<Arc<Snapshot>> {
        let document = codec.parse(text)?;
        self.publish(document, validator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DocumentBuilder, Node};
    use crate::schema::NodeKind;

    fn valid_document(id: &str) -> ConfigurationDocument {
        DocumentBuilder::standard().with_id(id).expect("id").build()
    }

    fn invalid_document() -> ConfigurationDocument {
        let mut builder = DocumentBuilder::standard();
        builder.push("connector", Node::standard(NodeKind::Connector)).expect("connector");
        builder.build()
    }

    #[test]
    fn publishes_valid_documents() {
        let store = DocumentStore::new();
        assert!(store.current().is_none());

        let snapshot = store.publish(valid_document("first"), &Validator::standard()).expect("valid");
        assert_eq!(snapshot.document.id(), Some("first"));
        assert_eq!(store.current().map(|current| current.revision), Some(snapshot.revision));
    }

    #[test]
    fn rejects_invalid_documents_and_keeps_current() {
        let store = DocumentStore::new();
        let validator = Validator::standard();
        let first = store.publish(valid_document("first"), &validator).expect("valid");

        let err = store.publish(invalid_document(), &validator).unwrap_err();
        match err {
            MuleConfigError::Rejected { report } => assert!(report.error_count() >= 2),
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(store.current().map(|current| current.revision), Some(first.revision));
    }

    #[test]
    fn old_snapshots_survive_reloads() {
        let store = DocumentStore::new();
        let validator = Validator::standard();
        let held = store.publish(valid_document("first"), &validator).expect("valid");
        store.publish(valid_document("second"), &validator).expect("valid");

        assert_eq!(held.document.id(), Some("first"));
        assert_eq!(store.current().and_then(|c| c.document.id().map(str::to_string)), Some("second".to_string()));
        assert_ne!(store.current().map(|c| c.revision), Some(held.revision));
    }

    #[test]
    fn reload_parses_then_publishes() {
        let store = DocumentStore::new();
        let codec = Codec::standard();
        let validator = Validator::standard();

        let snapshot = store
            .reload(r#"<mule-configuration id="reloaded" version="1.0"/>"#, &codec, &validator)
            .expect("reload");
        assert_eq!(snapshot.document.id(), Some("reloaded"));

        let err = store.reload("<mule-configuration", &codec, &validator).unwrap_err();
        assert!(matches!(err, MuleConfigError::MalformedDocument { .. }));
        assert_eq!(store.current().map(|c| c.revision), Some(snapshot.revision));
    }
}
