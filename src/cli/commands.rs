//! Handlers for the document commands
//!
//! Each handler reads a configuration file, runs it through the codec and the
//! validator configured from [`Settings`], and renders the outcome.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use super::output::{print_structured, render_report, truncate, OutputFormat, Table};
use crate::codec::{Codec, CodecOptions};
use crate::config::Settings;
use crate::domain::{ConfigurationDocument, EndpointTarget};
use crate::schema::ReferenceKind;
use crate::validation::{Validator, ValidatorOptions};

fn read_file(file: &Path) -> Result<String> {
    std::fs::read_to_string(file).with_context(|| format!("Failed to read file: {}", file.display()))
}

fn codec(settings: &Settings) -> Codec<'static> {
    Codec::standard().with_options(CodecOptions::from(&settings.codec))
}

fn load_document(file: &Path, codec: &Codec<'_>) -> Result<ConfigurationDocument> {
    let text = read_file(file)?;
    codec.parse(&text).with_context(|| format!("Failed to parse {}", file.display()))
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

pub fn validate(settings: &Settings, file: &Path, output: &str, lenient: bool) -> Result<()> {
    let format = OutputFormat::parse(output)?;
    let mut options = CodecOptions::from(&settings.codec);
    if lenient {
        options.strict_values = false;
    }
    let codec = Codec::standard().with_options(options);
    let document = load_document(file, &codec)?;

    let validator = Validator::standard().with_options(ValidatorOptions::from(&settings.validation));
    let report = validator.validate(&document);

    if format.is_structured() {
        print_structured(&report, format)?;
    } else {
        println!("{}", render_report(file, &report));
    }

    if !report.is_valid() {
        anyhow::bail!("{} is invalid: {} error(s)", file.display(), report.error_count());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// format
// ---------------------------------------------------------------------------

pub fn format(settings: &Settings, file: &Path, write: bool) -> Result<()> {
    let codec = codec(settings);
    let document = load_document(file, &codec)?;
    let text = codec.serialize(&document).context("Failed to serialize document")?;

    if write {
        std::fs::write(file, format!("{}\n", text))
            .with_context(|| format!("Failed to write file: {}", file.display()))?;
        println!("Formatted {}", file.display());
    } else {
        println!("{}", text);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// inspect
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct CatalogSummary {
    pub kind: ReferenceKind,
    pub names: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DescriptorSummary {
    pub name: Option<String>,
    pub implementation: Option<String>,
    pub inbound: Option<String>,
    pub outbound: Option<String>,
    pub initial_state: String,
}

#[derive(Debug, Serialize)]
pub struct DocumentSummary {
    pub id: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub model: Option<String>,
    pub catalogs: Vec<CatalogSummary>,
    pub descriptors: Vec<DescriptorSummary>,
}

impl DocumentSummary {
    pub fn of(document: &ConfigurationDocument) -> Self {
        let catalogs = ReferenceKind::ALL
            .iter()
            .map(|kind| CatalogSummary {
                kind: *kind,
                names: document
                    .catalog(*kind)
                    .iter()
                    .filter_map(|entry| entry.get_str("name"))
                    .map(str::to_string)
                    .collect(),
            })
            .filter(|catalog| !catalog.names.is_empty())
            .collect();

        let descriptors = document
            .descriptors()
            .iter()
            .map(|descriptor| DescriptorSummary {
                name: descriptor.name().map(str::to_string),
                implementation: descriptor.implementation().map(str::to_string),
                inbound: descriptor.node().get_str("inboundEndpoint").map(str::to_string),
                outbound: descriptor.node().get_str("outboundEndpoint").map(str::to_string),
                initial_state: descriptor.initial_state().to_string(),
            })
            .collect();

        Self {
            id: document.id().map(str::to_string),
            version: document.version().map(|version| version.to_string()),
            description: document.description().map(str::to_string),
            model: document.model().and_then(|model| model.name()).map(str::to_string),
            catalogs,
            descriptors,
        }
    }
}

pub fn inspect(settings: &Settings, file: &Path, output: &str) -> Result<()> {
    let format = OutputFormat::parse(output)?;
    let document = load_document(file, &codec(settings))?;
    let summary = DocumentSummary::of(&document);

    if format.is_structured() {
        return print_structured(&summary, format);
    }

    println!("Configuration: {}", summary.id.as_deref().unwrap_or("-"));
    println!("Version:       {}", summary.version.as_deref().unwrap_or("-"));
    if let Some(description) = &summary.description {
        println!("Description:   {}", truncate(description, 60));
    }
    println!("Model:         {}", summary.model.as_deref().unwrap_or("-"));

    for catalog in &summary.catalogs {
        println!("{} ({}): {}", catalog.kind, catalog.names.len(), catalog.names.join(", "));
    }

    if summary.descriptors.is_empty() {
        println!("No descriptors found");
        return Ok(());
    }
    let mut table = Table::new(["Name", "Implementation", "Inbound", "Outbound", "State"]);
    for descriptor in &summary.descriptors {
        table.row([
            descriptor.name.as_deref().unwrap_or("-"),
            descriptor.implementation.as_deref().unwrap_or("-"),
            descriptor.inbound.as_deref().unwrap_or("-"),
            descriptor.outbound.as_deref().unwrap_or("-"),
            descriptor.initial_state.as_str(),
        ]);
    }
    println!();
    println!("{}", table.render());
    Ok(())
}

// ---------------------------------------------------------------------------
// resolve
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ResolvedEndpoint {
    pub endpoint: String,
    pub address: Option<String>,
    pub connector: Option<String>,
    pub synchronous: bool,
    pub transformers: Vec<String>,
}

impl ResolvedEndpoint {
    pub fn resolve(document: &ConfigurationDocument, endpoint: &str) -> Result<Self> {
        let resolver = document.resolver();
        let target = resolver.resolve_endpoint_target(endpoint)?;
        let resolved = match target {
            EndpointTarget::Address(address) => Self {
                endpoint: endpoint.to_string(),
                address: Some(address.to_string()),
                connector: None,
                synchronous: false,
                transformers: Vec::new(),
            },
            EndpointTarget::Catalog(entry) => {
                let chain = resolver.transformer_chain(entry.get_names("transformers"))?;
                Self {
                    endpoint: endpoint.to_string(),
                    address: entry.get_str("address").map(str::to_string),
                    connector: entry.get_str("connector").map(str::to_string),
                    synchronous: entry.get_bool("synchronous").unwrap_or(false),
                    transformers: chain
                        .iter()
                        .filter_map(|transformer| transformer.get_str("className"))
                        .map(str::to_string)
                        .collect(),
                }
            }
        };
        Ok(resolved)
    }
}

pub fn resolve(settings: &Settings, file: &Path, endpoint: &str, output: &str) -> Result<()> {
    let format = OutputFormat::parse(output)?;
    let document = load_document(file, &codec(settings))?;
    let resolved = ResolvedEndpoint::resolve(&document, endpoint)?;

    if format.is_structured() {
        return print_structured(&resolved, format);
    }

    println!("Endpoint:     {}", resolved.endpoint);
    println!("Address:      {}", resolved.address.as_deref().unwrap_or("-"));
    println!("Connector:    {}", resolved.connector.as_deref().unwrap_or("-"));
    println!("Synchronous:  {}", resolved.synchronous);
    if resolved.transformers.is_empty() {
        println!("Transformers: -");
    } else {
        println!("Transformers: {}", resolved.transformers.join(" -> "));
    }
    Ok(())
}
