pub mod files;
pub mod processing;

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use processing::{AutoTextSource, PdfTextSource, PlainTextSource};

const PDF_MAGIC: &[u8] = b"%PDF";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("file does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("not a PDF: {}", .0.display())]
    NotPdf(PathBuf),

    #[error("file too large ({size_mb:.2} MB, limit {limit_mb} MB): {}", .path.display())]
    TooLarge { path: PathBuf, size_mb: f64, limit_mb: u64 },

    #[error("missing %PDF header: {}", .0.display())]
    InvalidHeader(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("text extraction failed for {}: {reason}", .path.display())]
    Extraction { path: PathBuf, reason: String },

    #[error("extracted text is empty: {}", .0.display())]
    Empty(PathBuf),
}

/// Turns a document on disk into plain text for comparison.
pub trait TextSource: Send + Sync {
    fn extract(&self, path: &Path) -> Result<String, ExtractError>;
}

pub fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case("pdf"))
}

/// PDF files directly inside `dir`, sorted by file name. A missing folder
/// has no PDFs.
pub fn list_pdfs(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }
    walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| has_pdf_extension(p))
        .collect()
}

/// Checks that `path` is an existing `.pdf` no larger than `max_size_mb`
/// that starts with the PDF magic bytes.
pub fn validate_pdf(path: &Path, max_size_mb: u64) -> Result<(), ExtractError> {
    if !path.exists() {
        return Err(ExtractError::NotFound(path.to_path_buf()));
    }
    if !has_pdf_extension(path) {
        return Err(ExtractError::NotPdf(path.to_path_buf()));
    }

    let size = std::fs::metadata(path)?.len();
    let size_mb = size as f64 / (1024.0 * 1024.0);
    if size_mb > max_size_mb as f64 {
        return Err(ExtractError::TooLarge {
            path: path.to_path_buf(),
            size_mb,
            limit_mb: max_size_mb,
        });
    }

    let mut header = [0u8; 4];
    let mut file = File::open(path)?;
    let read = file.read(&mut header)?;
    if read < PDF_MAGIC.len() || &header[..] != PDF_MAGIC {
        return Err(ExtractError::InvalidHeader(path.to_path_buf()));
    }
    Ok(())
}

/// Hex SHA-256 of the file's bytes.
pub fn content_hash(path: &Path) -> std::io::Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Whether two paths name the same file on disk.
pub fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
