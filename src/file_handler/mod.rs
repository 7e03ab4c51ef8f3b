//! Reading Markdown documents from disk
//!
//! Documents are decoded from UTF-8 (with or without BOM) or BOM-marked
//! UTF-16. Anything else is rejected rather than annotated as garbage.

use crate::error::{FileError, FileResult};
use std::path::Path;

/// Detected encoding of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileEncoding {
    /// UTF-8 without BOM
    #[default]
    Utf8,
    /// UTF-8 with BOM
    Utf8Bom,
    /// UTF-16 Little Endian with BOM
    Utf16Le,
    /// UTF-16 Big Endian with BOM
    Utf16Be,
}

/// Result of reading a document
#[derive(Debug, Clone)]
pub struct FileReadResult {
    pub content: String,
    pub encoding: FileEncoding,
    /// Size on disk in bytes
    pub size_bytes: u64,
}

/// Detect encoding from the leading bytes
fn detect_encoding(bytes: &[u8]) -> FileEncoding {
    match bytes {
        [0xEF, 0xBB, 0xBF, ..] => FileEncoding::Utf8Bom,
        [0xFF, 0xFE, ..] => FileEncoding::Utf16Le,
        [0xFE, 0xFF, ..] => FileEncoding::Utf16Be,
        _ => FileEncoding::Utf8,
    }
}

fn decode_utf16(bytes: &[u8], from_bytes: fn([u8; 2]) -> u16) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }
    let units = bytes.chunks_exact(2).map(|c| from_bytes([c[0], c[1]]));
    char::decode_utf16(units).collect::<Result<String, _>>().ok()
}

/// Decode raw bytes, returning `None` when they are not valid text
fn decode_content(bytes: &[u8], encoding: FileEncoding) -> Option<String> {
    match encoding {
        FileEncoding::Utf8 => String::from_utf8(bytes.to_vec()).ok(),
        FileEncoding::Utf8Bom => String::from_utf8(bytes[3..].to_vec()).ok(),
        FileEncoding::Utf16Le => decode_utf16(&bytes[2..], u16::from_le_bytes),
        FileEncoding::Utf16Be => decode_utf16(&bytes[2..], u16::from_be_bytes),
    }
}

/// Read a document, enforcing a maximum size
pub fn read_document(path: impl AsRef<Path>, max_size: u64) -> FileResult<FileReadResult> {
    let path = path.as_ref();
    let metadata = std::fs::metadata(path).map_err(|e| FileError::from_io(path.to_path_buf(), e))?;

    if !metadata.is_file() {
        return Err(FileError::NotAFile {
            path: path.to_path_buf(),
        });
    }

    let size_bytes = metadata.len();
    if size_bytes > max_size {
        return Err(FileError::TooLarge {
            path: path.to_path_buf(),
            size: size_bytes,
            max_size,
        });
    }

    let bytes = std::fs::read(path).map_err(|e| FileError::from_io(path.to_path_buf(), e))?;
    let encoding = detect_encoding(&bytes);
    let content = decode_content(&bytes, encoding).ok_or_else(|| FileError::EncodingError {
        path: path.to_path_buf(),
    })?;

    log::debug!("Read {} ({:?}, {} bytes)", path.display(), encoding, size_bytes);
    Ok(FileReadResult {
        content,
        encoding,
        size_bytes,
    })
}
