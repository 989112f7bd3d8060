//! Archive packaging
//!
//! Every export format is ultimately delivered as a single in-memory
//! archive or document. [`ZipBundle`] wraps the zip writer with the entry
//! bookkeeping the exporters need; thumbnail packaging deliberately logs
//! and carries on when the imagery is missing, since a broken thumbnail
//! must never sink an otherwise complete archive.

pub mod response;

use crate::domain::errors::CatalogueError;
use crate::domain::result::Result;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub use response::{content_types, DownloadPayload};

/// In-memory zip archive under construction
pub struct ZipBundle {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    entry_count: usize,
}

impl ZipBundle {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            entry_count: 0,
        }
    }

    fn options() -> SimpleFileOptions {
        SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
    }

    /// Add an entry from a byte slice
    pub fn add_bytes(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        self.writer.start_file(name, Self::options())?;
        self.writer.write_all(bytes)?;
        self.entry_count += 1;
        Ok(())
    }

    /// Add an entry read from disk.
    ///
    /// # Errors
    ///
    /// A missing or unreadable source file is a packaging error.
    pub fn add_file(&mut self, name: &str, path: &Path) -> Result<()> {
        let mut file = std::fs::File::open(path).map_err(|e| {
            CatalogueError::Packaging(format!(
                "Cannot read archive member {}: {e}",
                path.display()
            ))
        })?;
        self.writer.start_file(name, Self::options())?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;
        self.writer.write_all(&buffer)?;
        self.entry_count += 1;
        Ok(())
    }

    /// Add a `README.txt` entry
    pub fn add_readme(&mut self, text: &str) -> Result<()> {
        self.add_bytes("README.txt", text.as_bytes())
    }

    /// Number of entries written so far
    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    /// Finish the archive and return its bytes
    pub fn finish(self) -> Result<Vec<u8>> {
        let cursor = self.writer.finish()?;
        Ok(cursor.into_inner())
    }
}

impl Default for ZipBundle {
    fn default() -> Self {
        Self::new()
    }
}

/// Add a product's georeferenced thumbnail and its world file to a bundle.
///
/// Returns true when both files were packaged. A missing or unreadable
/// thumbnail is logged and skipped; it never fails the export.
pub fn write_thumb_pair(bundle: &mut ZipBundle, image_path: &Path, product_id: &str) -> bool {
    let world_path = image_path.with_extension("wld");
    let image_name = format!("{product_id}.jpg");
    let world_name = format!("{product_id}.wld");

    match bundle.add_file(&image_name, image_path) {
        Ok(()) => {}
        Err(e) => {
            tracing::warn!(
                product_id,
                path = %image_path.display(),
                error = %e,
                "Thumbnail not packaged"
            );
            return false;
        }
    }
    match bundle.add_file(&world_name, &world_path) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(
                product_id,
                path = %world_path.display(),
                error = %e,
                "Thumbnail world file not packaged"
            );
            false
        }
    }
}
