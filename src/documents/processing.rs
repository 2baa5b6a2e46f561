use std::path::{Path, PathBuf};
use std::process::Command;

use super::{ExtractError, TextSource};

const START_MARKER: &str = "<<<START_CONTENT>>>";
const END_MARKER: &str = "<<<END_CONTENT>>>";

/// Normalize text extracted from PDFs - fix ligatures and other Unicode issues
pub fn normalize_text(text: &str) -> String {
    text
        // Common ligatures
        .replace('\u{FB00}', "ff")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl")
        .replace('\u{FB05}', "st")
        .replace('\u{FB06}', "st")
        .replace('\u{0152}', "OE")
        .replace('\u{0153}', "oe")
        .replace('\u{00C6}', "AE")
        .replace('\u{00E6}', "ae")
        // Typographic punctuation
        .replace(['\u{2018}', '\u{2019}'], "'")
        .replace(['\u{201C}', '\u{201D}', '\u{201E}'], "\"")
        .replace(['\u{2013}', '\u{2014}'], "-")
        .replace('\u{2026}', "...")
        .replace('\u{00AD}', "")
        .replace('\u{00A0}', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Wrap extracted text so the parent can find it among whatever the PDF
/// library prints on its own.
pub fn frame_content(text: &str) -> String {
    format!("{}{}{}", START_MARKER, text, END_MARKER)
}

/// Pull the framed text back out of a child's stdout.
pub fn unframe_content(stdout: &str) -> Option<&str> {
    let start = stdout.find(START_MARKER)? + START_MARKER.len();
    let end = stdout[start..].find(END_MARKER)? + start;
    Some(&stdout[start..end])
}

/// Runs `pdf-extract` in a child process of this binary (`extract-pdf`
/// subcommand) so a panic or stray output on a malformed PDF stays contained.
#[derive(Clone, Debug)]
pub struct PdfTextSource {
    exe: PathBuf,
}

impl PdfTextSource {
    /// Extract through the running executable. Only valid inside the `docsim`
    /// binary, which answers the `extract-pdf` subcommand; library users
    /// point [`with_extractor`](Self::with_extractor) at that binary instead.
    pub fn new() -> Result<Self, ExtractError> {
        Ok(Self::with_extractor(std::env::current_exe()?))
    }

    /// Extract through `exe extract-pdf <path>`.
    pub fn with_extractor(exe: impl Into<PathBuf>) -> Self {
        Self { exe: exe.into() }
    }

    pub fn extractor(&self) -> &Path {
        &self.exe
    }
}

impl TextSource for PdfTextSource {
    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        if !path.exists() {
            return Err(ExtractError::NotFound(path.to_path_buf()));
        }
        tracing::debug!("Extracting text: {:?}", path.file_name());

        let out = Command::new(&self.exe)
            .arg("extract-pdf")
            .arg(path)
            .output()?;

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(ExtractError::Extraction {
                path: path.to_path_buf(),
                reason: stderr.trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&out.stdout);
        let text = unframe_content(&stdout).ok_or_else(|| ExtractError::Extraction {
            path: path.to_path_buf(),
            reason: "no content markers in extractor output".to_string(),
        })?;

        let normalized = normalize_text(text);
        if normalized.is_empty() {
            return Err(ExtractError::Empty(path.to_path_buf()));
        }
        tracing::debug!("Extracted {} chars from {:?}", normalized.len(), path.file_name());
        Ok(normalized)
    }
}

/// Reads the file as UTF-8 text. Used for `.txt` inputs to `compare`.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainTextSource;

impl TextSource for PlainTextSource {
    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        if !path.exists() {
            return Err(ExtractError::NotFound(path.to_path_buf()));
        }
        let bytes = std::fs::read(path)?;
        let text = normalize_text(&String::from_utf8_lossy(&bytes));
        if text.is_empty() {
            return Err(ExtractError::Empty(path.to_path_buf()));
        }
        Ok(text)
    }
}

/// Picks the PDF extractor for `.pdf` files and reads anything else as text.
#[derive(Clone, Debug)]
pub struct AutoTextSource {
    pdf: PdfTextSource,
}

impl AutoTextSource {
    pub fn new() -> Result<Self, ExtractError> {
        Ok(Self { pdf: PdfTextSource::new()? })
    }
}

impl TextSource for AutoTextSource {
    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        if super::has_pdf_extension(path) {
            self.pdf.extract(path)
        } else {
            PlainTextSource.extract(path)
        }
    }
}

/// Body of the hidden `extract-pdf` subcommand. Returns the process exit code.
pub fn extract_pdf_main(path: &Path) -> i32 {
    match std::panic::catch_unwind(|| pdf_extract::extract_text(path)) {
        Ok(Ok(text)) => {
            println!("{}", frame_content(&text));
            0
        }
        Ok(Err(e)) => {
            eprintln!("Error: {}", e);
            1
        }
        Err(_) => {
            eprintln!("Panic during extraction");
            2
        }
    }
}
