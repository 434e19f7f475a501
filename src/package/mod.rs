//! In-memory OPC package: parts, relationships and content types.
//!
//! A [`Package`] is assembled completely in memory and only then handed to
//! [`crate::container`] for writing, so a build either produces every part or
//! nothing usable at all.

mod assembler;
mod visio;
pub mod xml;

use std::collections::{BTreeMap, HashSet};

use thiserror::Error;

pub use assembler::*;

use self::xml::Element;

/// Source key for package-level relationships (`/_rels/.rels`).
pub const ROOT: &str = "/";

pub const DOCUMENT_URI: &str = "/visio/document.xml";
pub const PAGE_URI: &str = "/visio/pages/page1.xml";
pub const RECTANGLE_MASTER_URI: &str = "/visio/masters/master1.xml";
pub const CONNECTOR_MASTER_URI: &str = "/visio/masters/master2.xml";
pub const WINDOWS_URI: &str = "/visio/windows.xml";
pub const APP_PROPERTIES_URI: &str = "/docProps/app.xml";
pub const CORE_PROPERTIES_URI: &str = "/docProps/core.xml";

pub mod content_type {
    pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
    pub const XML: &str = "application/xml";
    pub const DOCUMENT: &str = "application/vnd.ms-visio.drawing.main+xml";
    pub const PAGE: &str = "application/vnd.ms-visio.page+xml";
    pub const MASTER: &str = "application/vnd.ms-visio.master+xml";
    pub const WINDOWS: &str = "application/vnd.ms-visio.windows+xml";
    pub const APP_PROPERTIES: &str =
        "application/vnd.openxmlformats-officedocument.extended-properties+xml";
    pub const CORE_PROPERTIES: &str = "application/vnd.openxmlformats-package.core-properties+xml";
}

pub mod rel_type {
    pub const DOCUMENT: &str = "http://schemas.microsoft.com/visio/2010/relationships/document";
    pub const PAGE: &str = "http://schemas.microsoft.com/visio/2010/relationships/page";
    pub const MASTER: &str = "http://schemas.microsoft.com/visio/2010/relationships/master";
    pub const WINDOWS: &str = "http://schemas.microsoft.com/visio/2010/relationships/windows";
    pub const APP_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
    pub const CORE_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
}

const NS_RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

/// Structural problems that make a package unusable.
#[derive(Debug, Error, PartialEq)]
pub enum PackageError {
    #[error("Part {0} has no content type")]
    MissingContentType(String),

    #[error("Relationship id {id} is used twice by {source_uri}")]
    DuplicateRelationshipId { source_uri: String, id: String },

    #[error("Relationship {id} of {source_uri} points at missing part {target}")]
    DanglingRelationship {
        source_uri: String,
        id: String,
        target: String,
    },

    #[error("Relationship source {0} is not a part")]
    UnknownSource(String),

    #[error("Expected {expected} relationship(s) of type {rel_type} from {source_uri}, found {found}")]
    RelationshipCount {
        source_uri: String,
        rel_type: String,
        expected: usize,
        found: usize,
    },
}

/// One named resource inside the package.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub uri: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

/// A typed link from a part (or the package root) to another part.
///
/// Targets are stored as absolute part uris and written relative to the
/// source part.
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
}

/// `[Content_Types].xml`: extension defaults plus per-part overrides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentTypes {
    defaults: BTreeMap<String, String>,
    overrides: BTreeMap<String, String>,
}

impl ContentTypes {
    pub fn add_default(&mut self, extension: &str, content_type: &str) {
        self.defaults
            .insert(extension.to_string(), content_type.to_string());
    }

    pub fn add_override(&mut self, uri: &str, content_type: &str) {
        self.overrides
            .insert(uri.to_string(), content_type.to_string());
    }

    /// Content type a consumer would resolve for `uri`.
    pub fn resolve(&self, uri: &str) -> Option<&str> {
        if let Some(ct) = self.overrides.get(uri) {
            return Some(ct.as_str());
        }
        let extension = uri.rsplit_once('.').map(|(_, ext)| ext)?;
        self.defaults
            .get(&extension.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn to_xml(&self) -> String {
        let defaults = self.defaults.iter().map(|(ext, ct)| {
            Element::new("Default")
                .attr("Extension", ext)
                .attr("ContentType", ct)
        });
        let overrides = self.overrides.iter().map(|(uri, ct)| {
            Element::new("Override")
                .attr("PartName", uri)
                .attr("ContentType", ct)
        });
        Element::new("Types")
            .attr("xmlns", NS_CONTENT_TYPES)
            .children(defaults)
            .children(overrides)
            .to_document()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    parts: BTreeMap<String, Part>,
    relationships: BTreeMap<String, Vec<Relationship>>,
    content_types: ContentTypes,
}

impl Package {
    pub fn new() -> Self {
        let mut content_types = ContentTypes::default();
        content_types.add_default("rels", content_type::RELATIONSHIPS);
        content_types.add_default("xml", content_type::XML);
        Self {
            parts: BTreeMap::new(),
            relationships: BTreeMap::new(),
            content_types,
        }
    }

    /// Add a part and declare its content type.
    pub fn add_part(&mut self, uri: &str, content_type: &str, content: impl Into<Vec<u8>>) {
        self.content_types.add_override(uri, content_type);
        self.parts.insert(
            uri.to_string(),
            Part {
                uri: uri.to_string(),
                content_type: content_type.to_string(),
                content: content.into(),
            },
        );
    }

    /// Add a relationship and return its id, unique within `source`.
    pub fn relate(&mut self, source: &str, rel_type: &str, target: &str) -> String {
        let list = self.relationships.entry(source.to_string()).or_default();
        let id = format!("rId{}", list.len() + 1);
        list.push(Relationship {
            id: id.clone(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
        });
        id
    }

    pub fn part(&self, uri: &str) -> Option<&Part> {
        self.parts.get(uri)
    }

    /// Parts in uri order.
    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.parts.values()
    }

    pub fn relationships(&self, source: &str) -> &[Relationship] {
        self.relationships
            .get(source)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn content_types(&self) -> &ContentTypes {
        &self.content_types
    }

    /// Relationships XML for `source`, or `None` when it has no relationships.
    pub fn relationships_xml(&self, source: &str) -> Option<String> {
        let list = self.relationships.get(source)?;
        if list.is_empty() {
            return None;
        }
        let entries = list.iter().map(|rel| {
            Element::new("Relationship")
                .attr("Id", &rel.id)
                .attr("Type", &rel.rel_type)
                .attr("Target", relative_target(source, &rel.target))
        });
        Some(
            Element::new("Relationships")
                .attr("xmlns", NS_RELATIONSHIPS)
                .children(entries)
                .to_document(),
        )
    }

    /// Sources that own at least one relationship, root first.
    pub fn relationship_sources(&self) -> impl Iterator<Item = &str> {
        self.relationships
            .iter()
            .filter(|(_, list)| !list.is_empty())
            .map(|(source, _)| source.as_str())
    }

    /// Check the structural invariants a consuming application relies on.
    pub fn validate(&self) -> Result<(), PackageError> {
        for part in self.parts.values() {
            if self.content_types.resolve(&part.uri).is_none() {
                return Err(PackageError::MissingContentType(part.uri.clone()));
            }
        }

        for (source, list) in &self.relationships {
            if source != ROOT && !self.parts.contains_key(source) {
                return Err(PackageError::UnknownSource(source.clone()));
            }
            let mut seen = HashSet::new();
            for rel in list {
                if !seen.insert(rel.id.as_str()) {
                    return Err(PackageError::DuplicateRelationshipId {
                        source_uri: source.clone(),
                        id: rel.id.clone(),
                    });
                }
                if !self.parts.contains_key(&rel.target) {
                    return Err(PackageError::DanglingRelationship {
                        source_uri: source.clone(),
                        id: rel.id.clone(),
                        target: rel.target.clone(),
                    });
                }
            }
        }

        self.expect_count(ROOT, rel_type::DOCUMENT, 1)?;
        self.expect_count(DOCUMENT_URI, rel_type::PAGE, 1)?;
        self.expect_count(DOCUMENT_URI, rel_type::WINDOWS, 1)?;
        self.expect_count(DOCUMENT_URI, rel_type::MASTER, 2)?;
        Ok(())
    }

    fn expect_count(
        &self,
        source: &str,
        rel_type: &str,
        expected: usize,
    ) -> Result<(), PackageError> {
        let found = self
            .relationships(source)
            .iter()
            .filter(|r| r.rel_type == rel_type)
            .count();
        if found != expected {
            return Err(PackageError::RelationshipCount {
                source_uri: source.to_string(),
                rel_type: rel_type.to_string(),
                expected,
                found,
            });
        }
        Ok(())
    }
}

impl Default for Package {
    fn default() -> Self {
        Self::new()
    }
}

/// Archive entry name of a part uri (no leading slash).
pub fn entry_name(uri: &str) -> &str {
    uri.trim_start_matches('/')
}

/// Archive entry holding the relationships of `source`.
///
/// `/` maps to `_rels/.rels`; `/visio/document.xml` maps to
/// `visio/_rels/document.xml.rels`.
pub fn relationships_entry_name(source: &str) -> String {
    if source == ROOT {
        return "_rels/.rels".to_string();
    }
    match entry_name(source).rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", entry_name(source)),
    }
}

/// Path of `target` relative to the folder holding `source`.
fn relative_target(source: &str, target: &str) -> String {
    let base: Vec<&str> = if source == ROOT {
        Vec::new()
    } else {
        let mut segments: Vec<&str> = entry_name(source).split('/').collect();
        segments.pop();
        segments
    };
    let target: Vec<&str> = entry_name(target).split('/').collect();

    let dirs = target.len().saturating_sub(1);
    let common = base
        .iter()
        .zip(&target[..dirs])
        .take_while(|(a, b)| a == b)
        .count();

    let mut path: Vec<&str> = vec![".."; base.len() - common];
    path.extend(&target[common..]);
    path.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_targets() {
        assert_eq!(relative_target(ROOT, DOCUMENT_URI), "visio/document.xml");
        assert_eq!(relative_target(DOCUMENT_URI, PAGE_URI), "pages/page1.xml");
        assert_eq!(relative_target(DOCUMENT_URI, WINDOWS_URI), "windows.xml");
        assert_eq!(
            relative_target(PAGE_URI, RECTANGLE_MASTER_URI),
            "../masters/master1.xml"
        );
        assert_eq!(relative_target(PAGE_URI, APP_PROPERTIES_URI), "../../docProps/app.xml");
    }

    #[test]
    fn test_relationships_entry_names() {
        assert_eq!(relationships_entry_name(ROOT), "_rels/.rels");
        assert_eq!(
            relationships_entry_name(DOCUMENT_URI),
            "visio/_rels/document.xml.rels"
        );
        assert_eq!(
            relationships_entry_name(PAGE_URI),
            "visio/pages/_rels/page1.xml.rels"
        );
    }

    #[test]
    fn test_relationship_ids_are_scoped_per_source() {
        let mut package = Package::new();
        assert_eq!(package.relate(ROOT, rel_type::DOCUMENT, DOCUMENT_URI), "rId1");
        assert_eq!(package.relate(ROOT, rel_type::APP_PROPERTIES, APP_PROPERTIES_URI), "rId2");
        assert_eq!(package.relate(DOCUMENT_URI, rel_type::PAGE, PAGE_URI), "rId1");
    }

    #[test]
    fn test_content_type_resolution() {
        let mut package = Package::new();
        package.add_part(PAGE_URI, content_type::PAGE, "<x/>");
        let types = package.content_types();
        assert_eq!(types.resolve(PAGE_URI), Some(content_type::PAGE));
        assert_eq!(types.resolve("/other/thing.xml"), Some(content_type::XML));
        assert_eq!(types.resolve("/_rels/.rels"), Some(content_type::RELATIONSHIPS));
        assert_eq!(types.resolve("/image.png"), None);
    }

    #[test]
    fn test_validate_reports_dangling_target() {
        let mut package = Package::new();
        package.relate(ROOT, rel_type::DOCUMENT, DOCUMENT_URI);
        assert_eq!(
            package.validate(),
            Err(PackageError::DanglingRelationship {
                source_uri: ROOT.to_string(),
                id: "rId1".to_string(),
                target: DOCUMENT_URI.to_string(),
            })
        );
    }

    #[test]
    fn test_validate_requires_document_links() {
        let mut package = Package::new();
        package.add_part(DOCUMENT_URI, content_type::DOCUMENT, "<x/>");
        package.relate(ROOT, rel_type::DOCUMENT, DOCUMENT_URI);
        assert!(matches!(
            package.validate(),
            Err(PackageError::RelationshipCount { .. })
        ));
    }
}
