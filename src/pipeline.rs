//! The full build: text → tree → layout → geometry → package → archive.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::DiagramConfig;
use crate::container;
use crate::error::DiagramError;
use crate::geometry::GeometryBuilder;
use crate::layout::LayoutEngine;
use crate::models::{Feature, Geometry};
use crate::package::{Package, PackageAssembler, PackageMetadata, PageSetup};
use crate::parser;

/// What a successful build produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagramSummary {
    pub feature: String,
    pub shapes: usize,
    pub connectors: usize,
    pub output: PathBuf,
}

/// Read a feature file and parse it.
pub fn read_feature(input: &Path) -> Result<Feature, DiagramError> {
    let text = fs::read_to_string(input).map_err(|source| DiagramError::InputNotFound {
        path: input.to_path_buf(),
        source,
    })?;
    Ok(parser::parse(&text))
}

/// Lay out `feature` and turn it into shapes and connectors.
pub fn build_geometry(
    feature: &Feature,
    config: &DiagramConfig,
) -> Result<Geometry, DiagramError> {
    let count = feature.node_count();
    if count > config.max_nodes {
        return Err(DiagramError::TooManyNodes {
            count,
            limit: config.max_nodes,
        });
    }

    let nodes = LayoutEngine::new(config.layout.clone()).layout(feature);
    Ok(GeometryBuilder::new(config.label_max_chars).build(&nodes, feature))
}

/// Build the complete, validated package for `feature` in memory.
pub fn build_package(
    feature: &Feature,
    config: &DiagramConfig,
    metadata: PackageMetadata,
) -> Result<Package, DiagramError> {
    let geometry = build_geometry(feature, config)?;
    assemble(feature, &geometry, config, metadata)
}

fn assemble(
    feature: &Feature,
    geometry: &Geometry,
    config: &DiagramConfig,
    metadata: PackageMetadata,
) -> Result<Package, DiagramError> {
    let assembler = PackageAssembler::new(metadata, PageSetup::from_config(config));
    let package = assembler.assemble(&geometry.shapes, &geometry.edges, &feature.name);
    package.validate()?;
    Ok(package)
}

/// Turn the feature file at `input` into a diagram package at `output`.
///
/// Any existing file at `output` is replaced. On error the output path must
/// be treated as garbage.
pub fn generate_diagram(
    input: &Path,
    output: &Path,
    config: &DiagramConfig,
) -> Result<DiagramSummary, DiagramError> {
    let feature = read_feature(input)?;
    let geometry = build_geometry(&feature, config)?;
    let package = assemble(&feature, &geometry, config, PackageMetadata::default())?;
    container::write(&package, output)?;

    let summary = DiagramSummary {
        feature: feature.name,
        shapes: geometry.shapes.len(),
        connectors: geometry.edges.len(),
        output: output.to_path_buf(),
    };
    tracing::info!(
        feature = %summary.feature,
        shapes = summary.shapes,
        connectors = summary.connectors,
        output = %output.display(),
        "Wrote diagram"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_limit_is_enforced() {
        let feature = parser::parse("Feature: F\nScenario: S\nGiven a\nWhen b");
        let config = DiagramConfig {
            max_nodes: 3,
            ..DiagramConfig::default()
        };
        let err = build_geometry(&feature, &config).unwrap_err();
        assert!(matches!(
            err,
            DiagramError::TooManyNodes { count: 4, limit: 3 }
        ));
    }

    #[test]
    fn test_missing_input_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("missing.feature");
        let output = dir.path().join("out.vsdx");
        let err = generate_diagram(&input, &output, &DiagramConfig::default()).unwrap_err();
        assert!(matches!(err, DiagramError::InputNotFound { .. }));
        assert!(!output.exists());
    }
}
