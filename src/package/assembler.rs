use chrono::{DateTime, Utc};

use super::visio::{self, DocumentRefs};
use super::*;
use crate::config::DiagramConfig;
use crate::models::{Edge, Shape, Size};

const APPLICATION: &str = "featuremap";

/// Metadata written to `docProps/`. The timestamp is injected so that two
/// builds of the same input can be compared byte for byte.
#[derive(Debug, Clone)]
pub struct PackageMetadata {
    pub created: DateTime<Utc>,
    pub application: String,
}

impl PackageMetadata {
    pub fn at(created: DateTime<Utc>) -> Self {
        Self {
            created,
            application: APPLICATION.to_string(),
        }
    }
}

impl Default for PackageMetadata {
    fn default() -> Self {
        Self::at(Utc::now())
    }
}

/// Physical page of the diagram.
#[derive(Debug, Clone)]
pub struct PageSetup {
    pub name: String,
    pub size: Size,
}

impl PageSetup {
    pub fn from_config(config: &DiagramConfig) -> Self {
        Self {
            name: config.page_name.clone(),
            size: Size::new(config.layout.page_width, config.layout.page_height),
        }
    }
}

impl Default for PageSetup {
    fn default() -> Self {
        Self::from_config(&DiagramConfig::default())
    }
}

/// Lays out the parts of a `.vsdx` package and links them together.
pub struct PackageAssembler {
    metadata: PackageMetadata,
    page: PageSetup,
}

impl PackageAssembler {
    pub fn new(metadata: PackageMetadata, page: PageSetup) -> Self {
        Self { metadata, page }
    }

    pub fn assemble(&self, shapes: &[Shape], edges: &[Edge], feature_name: &str) -> Package {
        let mut package = Package::new();

        package.relate(ROOT, rel_type::DOCUMENT, DOCUMENT_URI);
        package.relate(ROOT, rel_type::APP_PROPERTIES, APP_PROPERTIES_URI);
        package.relate(ROOT, rel_type::CORE_PROPERTIES, CORE_PROPERTIES_URI);

        // The document addresses its page and masters by these ids, so they
        // are allocated before the document is rendered.
        let page = package.relate(DOCUMENT_URI, rel_type::PAGE, PAGE_URI);
        package.relate(DOCUMENT_URI, rel_type::WINDOWS, WINDOWS_URI);
        let refs = DocumentRefs {
            page,
            rectangle_master: package.relate(DOCUMENT_URI, rel_type::MASTER, RECTANGLE_MASTER_URI),
            connector_master: package.relate(DOCUMENT_URI, rel_type::MASTER, CONNECTOR_MASTER_URI),
        };

        package.add_part(
            DOCUMENT_URI,
            content_type::DOCUMENT,
            visio::document(&refs, &self.page.name).to_document(),
        );
        package.add_part(
            PAGE_URI,
            content_type::PAGE,
            visio::page(shapes, edges, self.page.size).to_document(),
        );
        package.add_part(
            RECTANGLE_MASTER_URI,
            content_type::MASTER,
            visio::rectangle_master().to_document(),
        );
        package.add_part(
            CONNECTOR_MASTER_URI,
            content_type::MASTER,
            visio::connector_master().to_document(),
        );
        package.add_part(
            WINDOWS_URI,
            content_type::WINDOWS,
            visio::windows(self.page.size).to_document(),
        );
        package.add_part(
            APP_PROPERTIES_URI,
            content_type::APP_PROPERTIES,
            visio::app_properties(&self.metadata.application).to_document(),
        );
        package.add_part(
            CORE_PROPERTIES_URI,
            content_type::CORE_PROPERTIES,
            visio::core_properties(
                feature_name,
                &self.metadata.application,
                self.metadata.created,
            )
            .to_document(),
        );

        tracing::debug!(
            shapes = shapes.len(),
            connectors = edges.len(),
            "Assembled diagram package"
        );
        package
    }
}

impl Default for PackageAssembler {
    fn default() -> Self {
        Self::new(PackageMetadata::default(), PageSetup::default())
    }
}
