//! Package extraction and repacking.
//!
//! The whole archive is held in memory as an ordered part list; the batch
//! mutates parts in place and nothing touches the filesystem until
//! [`Package::write`] materializes the finished package in one go. A failed
//! batch therefore never leaves a partial output file.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use thiserror::Error;
use tracing::debug;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// The body part.
pub const DOCUMENT_PART: &str = "word/document.xml";
/// The comments side-car part.
pub const COMMENTS_PART: &str = "word/comments.xml";
/// The body part's relationship graph.
pub const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";
/// The package content-type registry; must be the archive's first entry.
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
/// Document settings.
pub const SETTINGS_PART: &str = "word/settings.xml";
/// Core properties (author metadata).
pub const CORE_PROPS_PART: &str = "docProps/core.xml";

#[derive(Debug, Error)]
pub enum PackageError {
    #[error("failed to read package archive: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("package part {0} is not valid UTF-8")]
    NonUtf8Part(String),
    #[error("package has no {0} part")]
    MissingPart(&'static str),
}

/// An open package: every part read into memory, in archive order.
pub struct Package {
    parts: Vec<(String, Vec<u8>)>,
}

impl Package {
    /// Read every part of the archive at `path` into memory.
    pub fn read(path: &Path) -> Result<Self, PackageError> {
        let file = File::open(path)?;
        let mut archive = ZipArchive::new(file)?;

        let mut parts = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            if entry.is_dir() {
                continue;
            }
            let mut bytes = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut bytes)?;
            parts.push((entry.name().to_string(), bytes));
        }
        debug!(parts = parts.len(), path = %path.display(), "package read");
        Ok(Self { parts })
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|(part_name, _)| part_name == name)
            .map(|(_, bytes)| bytes.as_slice())
    }

    /// A part decoded as UTF-8 text, `None` when the part is absent.
    pub fn part_str(&self, name: &str) -> Result<Option<String>, PackageError> {
        match self.part(name) {
            None => Ok(None),
            Some(bytes) => String::from_utf8(bytes.to_vec())
                .map(Some)
                .map_err(|_| PackageError::NonUtf8Part(name.to_string())),
        }
    }

    /// Like [`Package::part_str`] but the part must exist.
    pub fn required_part_str(&self, name: &'static str) -> Result<String, PackageError> {
        self.part_str(name)?.ok_or(PackageError::MissingPart(name))
    }

    /// Replace a part's content, or append a new part at the end of the
    /// archive order.
    pub fn set_part(&mut self, name: &str, bytes: Vec<u8>) {
        match self.parts.iter_mut().find(|(part_name, _)| part_name == name) {
            Some((_, existing)) => *existing = bytes,
            None => self.parts.push((name.to_string(), bytes)),
        }
    }

    /// Write the package to `path`, `[Content_Types].xml` first (readers
    /// require it as the leading entry), every other part in original order.
    pub fn write(&self, path: &Path) -> Result<(), PackageError> {
        let file = File::create(path)?;
        let mut writer = ZipWriter::new(file);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        if let Some(bytes) = self.part(CONTENT_TYPES_PART) {
            writer.start_file(CONTENT_TYPES_PART, options)?;
            writer.write_all(bytes)?;
        }
        for (name, bytes) in &self.parts {
            if name == CONTENT_TYPES_PART {
                continue;
            }
            writer.start_file(name.as_str(), options)?;
            writer.write_all(bytes)?;
        }
        writer.finish()?;
        debug!(path = %path.display(), "package written");
        Ok(())
    }
}
