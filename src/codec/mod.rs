//! # XML Codec
//!
//! Reads and writes `mule-configuration` documents. Element names map to
//! child roles and attribute names to attribute slots through the
//! [`SchemaRegistry`], so the codec carries no knowledge of individual kinds.
//!
//! The tri-state attribute model survives the trip through text: absent
//! attributes stay in the `Default` state, and explicitly unset attributes
//! are listed in the codec-owned `mc:unset` attribute.

mod reader;
mod writer;

use crate::domain::ConfigurationDocument;
use crate::errors::Result;
use crate::schema::SchemaRegistry;
use tracing::debug;

/// Namespace of the codec-owned attributes.
pub const CODEC_NAMESPACE: &str = "urn:mule-config:codec";
/// Prefix bound to [`CODEC_NAMESPACE`].
pub const CODEC_PREFIX: &str = "mc";
/// Attribute listing the explicitly unset attributes of an element.
pub const UNSET_ATTRIBUTE: &str = "mc:unset";
/// Deepest element nesting the codec reads or writes, root included.
pub const MAX_NESTING_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    /// Spaces per nesting level; zero writes everything on one line.
    pub indent: usize,
    /// Fail on attribute literals outside their type or domain. When off the
    /// literal is stored as is and left for the validator to report.
    pub strict_values: bool,
    /// Write the document's XML declaration.
    pub emit_declaration: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self { indent: 4, strict_values: true, emit_declaration: true }
    }
}

/// Parser and serializer bound to a schema registry.
#[derive(Debug, Clone, Copy)]
pub struct Codec<'r> {
    registry: &'r SchemaRegistry,
    options: CodecOptions,
}

impl Codec<'static> {
    pub fn standard() -> Self {
        Self::new(SchemaRegistry::standard())
    }
}

impl<'r> Codec<'r> {
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self { registry, options: CodecOptions::default() }
    }

    pub fn with_options(mut self, options: CodecOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> CodecOptions {
        self.options
    }

    pub fn registry(&self) -> &'r SchemaRegistry {
        self.registry
    }

    /// Parse XML text into a document. Any structural problem fails the whole
    /// parse; no partial document is returned.
    pub fn parse(&self, text: &str) -> Result<ConfigurationDocument> {
        let span = crate::codec_span!("parse", bytes = text.len());
        let _guard = span.enter();

        let document = reader::read_document(text, self.registry, &self.options)?;
        debug!(
            document_id = document.id().unwrap_or("-"),
            descriptors = document.descriptors().len(),
            "Parsed configuration document"
        );
        Ok(document)
    }

    /// Write a document as XML text.
    pub fn serialize(&self, document: &ConfigurationDocument) -> Result<String> {
        let span = crate::codec_span!("serialize", document_id = document.id().unwrap_or("-"));
        let _guard = span.enter();

        let text = writer::write_document(document, &self.options)?;
        debug!(bytes = text.len(), "Serialized configuration document");
        Ok(text)
    }
}
