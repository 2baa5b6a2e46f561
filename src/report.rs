use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt::{self, Write};
use std::path::{Path, PathBuf};

use crate::config::ReportFormat;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Name, location, size and mtime of one side of a duplicate pair. Taken
/// before the incoming file is moved.
#[derive(Serialize, Clone, Debug)]
pub struct FileFacts {
    pub filename: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub last_modified: DateTime<Local>,
}

impl FileFacts {
    pub fn from_path(path: &Path) -> Result<Self> {
        let meta = std::fs::metadata(path)
            .with_context(|| format!("Failed to stat {}", path.display()))?;
        let modified = meta.modified()?;
        Ok(Self {
            filename: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            path: path.to_path_buf(),
            size_bytes: meta.len(),
            last_modified: DateTime::<Local>::from(modified),
        })
    }

    fn size_kb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct DuplicateReport {
    pub created: DateTime<Local>,
    pub duplicate: FileFacts,
    pub original: FileFacts,
    pub similarity: f64,
    pub shared_tokens: usize,
    pub exact_match: bool,
    /// Where the duplicate ended up, if it was moved.
    pub moved_to: Option<PathBuf>,
}

impl DuplicateReport {
    pub fn size_difference_bytes(&self) -> u64 {
        self.duplicate.size_bytes.abs_diff(self.original.size_bytes)
    }

    pub fn time_difference_hours(&self) -> f64 {
        let delta = self.original.last_modified - self.duplicate.last_modified;
        (delta.num_milliseconds() as f64 / 3_600_000.0).abs()
    }

    pub fn render(&self, format: ReportFormat) -> Result<String> {
        let mut out = String::new();
        match format {
            ReportFormat::Json => return self.render_json(),
            ReportFormat::Text => self.write_text(&mut out)?,
            ReportFormat::Html => self.write_html(&mut out)?,
        }
        Ok(out)
    }

    fn action_line(&self) -> String {
        match &self.moved_to {
            Some(path) => format!("Duplicate moved to {}", path.display()),
            None => "No files were moved".to_string(),
        }
    }

    fn write_text(&self, out: &mut impl Write) -> fmt::Result {
        writeln!(out, "=== Duplicate report ===")?;
        writeln!(out, "Created: {}", self.created.format(TIME_FORMAT))?;
        writeln!(out)?;
        for (title, facts) in [("Duplicate", &self.duplicate), ("Original", &self.original)] {
            writeln!(out, "== {} ==", title)?;
            writeln!(out, "Name: {}", facts.filename)?;
            writeln!(out, "Path: {}", facts.path.display())?;
            writeln!(out, "Size: {:.2} KB", facts.size_kb())?;
            writeln!(out, "Modified: {}", facts.last_modified.format(TIME_FORMAT))?;
            writeln!(out)?;
        }
        writeln!(out, "== Comparison ==")?;
        writeln!(out, "Similarity: {:.4}{}", self.similarity, if self.exact_match { " (identical bytes)" } else { "" })?;
        writeln!(out, "Shared tokens: {}", self.shared_tokens)?;
        writeln!(out, "Size difference: {:.2} KB", self.size_difference_bytes() as f64 / 1024.0)?;
        writeln!(out, "Time difference: {:.2} hours", self.time_difference_hours())?;
        writeln!(out)?;
        writeln!(out, "== Action ==")?;
        writeln!(out, "{}", self.action_line())
    }

    fn render_json(&self) -> Result<String> {
        let file = |f: &FileFacts| {
            serde_json::json!({
                "filename": f.filename,
                "path": f.path,
                "size_bytes": f.size_bytes,
                "size_kb": round2(f.size_kb()),
                "last_modified": f.last_modified.format(TIME_FORMAT).to_string(),
            })
        };
        let value = serde_json::json!({
            "report_type": "duplicate_detection",
            "timestamp": self.created.format(TIME_FORMAT).to_string(),
            "duplicate_file": file(&self.duplicate),
            "original_file": file(&self.original),
            "comparison": {
                "similarity": self.similarity,
                "exact_match": self.exact_match,
                "shared_tokens": self.shared_tokens,
                "size_difference_bytes": self.size_difference_bytes(),
                "time_difference_hours": round2(self.time_difference_hours()),
            },
            "actions": {
                "duplicate_moved": self.moved_to.is_some(),
                "moved_to": self.moved_to,
            },
        });
        Ok(serde_json::to_string_pretty(&value)?)
    }

    fn write_html(&self, out: &mut impl Write) -> fmt::Result {
        writeln!(out, "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">")?;
        writeln!(out, "<title>Duplicate report</title>")?;
        writeln!(out, "<style>body{{font-family:sans-serif;max-width:900px;margin:auto}}td,th{{padding:6px;text-align:left;border-bottom:1px solid #ddd}}</style>")?;
        writeln!(out, "</head>\n<body>\n<h1>Duplicate report</h1>")?;
        writeln!(out, "<p>Created: {}</p>", self.created.format(TIME_FORMAT))?;
        writeln!(out, "<table>\n<tr><th></th><th>Duplicate</th><th>Original</th></tr>")?;
        let rows: [(&str, String, String); 4] = [
            ("Name", escape(&self.duplicate.filename), escape(&self.original.filename)),
            (
                "Path",
                escape(&self.duplicate.path.display().to_string()),
                escape(&self.original.path.display().to_string()),
            ),
            (
                "Size",
                format!("{:.2} KB", self.duplicate.size_kb()),
                format!("{:.2} KB", self.original.size_kb()),
            ),
            (
                "Modified",
                self.duplicate.last_modified.format(TIME_FORMAT).to_string(),
                self.original.last_modified.format(TIME_FORMAT).to_string(),
            ),
        ];
        for (label, dup, orig) in rows {
            writeln!(out, "<tr><th>{}</th><td>{}</td><td>{}</td></tr>", label, dup, orig)?;
        }
        writeln!(out, "</table>")?;
        writeln!(out, "<h2>Comparison</h2>\n<ul>")?;
        writeln!(out, "<li>Similarity: {:.4}</li>", self.similarity)?;
        writeln!(out, "<li>Shared tokens: {}</li>", self.shared_tokens)?;
        writeln!(out, "<li>Size difference: {:.2} KB</li>", self.size_difference_bytes() as f64 / 1024.0)?;
        writeln!(out, "<li>Time difference: {:.2} hours</li>", self.time_difference_hours())?;
        writeln!(out, "</ul>\n<h2>Action</h2>\n<p>{}</p>", escape(&self.action_line()))?;
        writeln!(out, "</body>\n</html>")
    }

    /// `duplicate_report_<timestamp>_<stem>.<ext>`
    pub fn file_name(&self, stem: &str, format: ReportFormat) -> String {
        format!(
            "duplicate_report_{}_{}.{}",
            self.created.format("%Y%m%d-%H%M%S"),
            stem,
            format.extension()
        )
    }

    /// Render and write into `dir`, creating it if needed. Returns the path.
    pub fn write(&self, dir: &Path, stem: &str, format: ReportFormat) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create report dir {}", dir.display()))?;
        let path = dir.join(self.file_name(stem, format));
        std::fs::write(&path, self.render(format)?)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        tracing::info!("Duplicate report written: {:?}", path);
        Ok(path)
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
