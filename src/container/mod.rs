//! Writes an assembled [`Package`] into a zip archive.

use std::fs::{self, File};
use std::io::{self, BufWriter, Seek, Write};
use std::path::Path;

use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::package::{entry_name, relationships_entry_name, Package, ROOT};

pub const CONTENT_TYPES_ENTRY: &str = "[Content_Types].xml";

/// Failures while producing the archive. The destination file must not be
/// used after any of these.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Replace whatever is at `path` with a new archive holding `package`.
pub fn write(package: &Package, path: &Path) -> Result<(), ContainerError> {
    match fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "Removed existing output"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    let file = File::create(path)?;
    let mut writer = write_to(package, BufWriter::new(file))?;
    writer.flush()?;
    Ok(())
}

/// Write `package` as a zip archive into `sink`, returning the sink.
///
/// Order: content types, package relationships, then every part followed by
/// its own relationships entry if it has one.
pub fn write_to<W: Write + Seek>(package: &Package, sink: W) -> Result<W, ContainerError> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(sink);

    zip.start_file(CONTENT_TYPES_ENTRY, options)?;
    zip.write_all(package.content_types().to_xml().as_bytes())?;

    if let Some(rels) = package.relationships_xml(ROOT) {
        zip.start_file(relationships_entry_name(ROOT), options)?;
        zip.write_all(rels.as_bytes())?;
    }

    for part in package.parts() {
        zip.start_file(entry_name(&part.uri), options)?;
        zip.write_all(&part.content)?;

        if let Some(rels) = package.relationships_xml(&part.uri) {
            zip.start_file(relationships_entry_name(&part.uri), options)?;
            zip.write_all(rels.as_bytes())?;
        }
    }

    Ok(zip.finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::{content_type, rel_type, DOCUMENT_URI};
    use std::io::{Cursor, Read};

    fn small_package() -> Package {
        let mut package = Package::new();
        package.add_part(DOCUMENT_URI, content_type::DOCUMENT, "<VisioDocument/>");
        package.relate(ROOT, rel_type::DOCUMENT, DOCUMENT_URI);
        package
    }

    #[test]
    fn test_entries_are_written_in_order() {
        let cursor = write_to(&small_package(), Cursor::new(Vec::new())).expect("write");
        let mut archive = zip::ZipArchive::new(cursor).expect("valid zip");
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).expect("entry").name().to_string())
            .collect();
        assert_eq!(
            names,
            vec![CONTENT_TYPES_ENTRY, "_rels/.rels", "visio/document.xml"]
        );

        let mut body = String::new();
        archive
            .by_name("visio/document.xml")
            .expect("document")
            .read_to_string(&mut body)
            .expect("read");
        assert_eq!(body, "<VisioDocument/>");
    }

    #[test]
    fn test_existing_file_is_replaced() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.vsdx");
        fs::write(&path, b"not a zip").expect("seed file");

        write(&small_package(), &path).expect("write");

        let archive = zip::ZipArchive::new(File::open(&path).expect("open")).expect("valid zip");
        assert!(archive.file_names().any(|n| n == CONTENT_TYPES_ENTRY));
    }

    #[test]
    fn test_missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing").join("out.vsdx");
        let err = write(&small_package(), &path).unwrap_err();
        assert!(matches!(err, ContainerError::Io(_)));
    }
}
