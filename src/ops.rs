use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::documents::{self, files, TextSource};
use crate::report::{DuplicateReport, FileFacts};
use crate::similarity::{self, Comparison, DuplicateDetector};

/// An incoming document judged to duplicate one already filed.
#[derive(Clone, Debug)]
pub struct DuplicateMatch {
    pub incoming: PathBuf,
    pub original: PathBuf,
    pub score: f64,
    /// `None` when the match came from identical bytes and no text was compared.
    pub comparison: Option<Comparison>,
}

impl DuplicateMatch {
    pub fn is_exact(&self) -> bool {
        self.comparison.is_none()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Prefix of the stdout marker line. Existing callers match on it verbatim.
pub const MARKER_PREFIX: &str = "DUPLIKAT_ERKANNT";

/// Marker line for callers that parse stdout.
impl fmt::Display for DuplicateMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{:.2}",
            MARKER_PREFIX,
            file_name(&self.original),
            file_name(&self.incoming),
            self.score
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SkipReason {
    Disabled,
    NoOutputDir,
    TextTooShort { len: usize, min: usize },
}

#[derive(Clone, Debug)]
pub enum CheckOutcome {
    Duplicate(DuplicateMatch),
    Distinct { compared: usize, best_score: Option<f64> },
    /// Not compared; the document counts as distinct.
    Skipped(SkipReason),
}

impl CheckOutcome {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, CheckOutcome::Duplicate(_))
    }
}

/// First candidate whose bytes equal `incoming`'s.
fn find_identical(incoming: &Path, candidates: &[PathBuf]) -> Result<Option<PathBuf>> {
    let hash = documents::content_hash(incoming)
        .with_context(|| format!("Failed to hash {}", incoming.display()))?;
    for candidate in candidates {
        match documents::content_hash(candidate) {
            Ok(h) if h == hash => return Ok(Some(candidate.clone())),
            Ok(_) => {}
            Err(e) => tracing::warn!("Failed to hash {:?}: {}", candidate, e),
        }
    }
    Ok(None)
}

/// Decide whether `path` duplicates a PDF already in the output folder.
pub async fn check_document(
    path: &Path,
    config: &Config,
    source: Arc<dyn TextSource>,
) -> Result<CheckOutcome> {
    let settings = &config.duplicate_detection;
    if !settings.enabled {
        return Ok(CheckOutcome::Skipped(SkipReason::Disabled));
    }

    let output_dir = &config.paths.output_dir;
    if !settings.check_in_output_dir || !output_dir.is_dir() {
        tracing::debug!("Output folder not checked: {:?}", output_dir);
        return Ok(CheckOutcome::Skipped(SkipReason::NoOutputDir));
    }

    // re-processing a file that already sits in the output folder
    let candidates: Vec<PathBuf> = documents::list_pdfs(output_dir)
        .into_iter()
        .filter(|c| !documents::same_file(path, c))
        .collect();

    if settings.hash_check && !candidates.is_empty() {
        let incoming = path.to_path_buf();
        let pool = candidates.clone();
        if let Some(original) =
            tokio::task::spawn_blocking(move || find_identical(&incoming, &pool)).await??
        {
            tracing::info!("Exact duplicate (hash match): {:?}", original.file_name());
            return Ok(CheckOutcome::Duplicate(DuplicateMatch {
                incoming: path.to_path_buf(),
                original,
                score: 1.0,
                comparison: None,
            }));
        }
    }

    let text = {
        let source = source.clone();
        let incoming = path.to_path_buf();
        tokio::task::spawn_blocking(move || source.extract(&incoming))
            .await?
            .with_context(|| format!("Cannot compare {}", path.display()))?
    };

    let len = text.chars().count();
    if len < settings.min_text_length {
        tracing::warn!("Text too short for a reliable comparison ({} chars): {:?}", len, path);
        return Ok(CheckOutcome::Skipped(SkipReason::TextTooShort {
            len,
            min: settings.min_text_length,
        }));
    }

    let detector = DuplicateDetector::new(settings.stopwords);
    let incoming = Arc::new(detector.token_set(&text));
    let threshold = config.document_processing.similarity_threshold;

    let results = stream::iter(candidates.into_iter().enumerate())
        .map(|(idx, candidate)| {
            let source = source.clone();
            let incoming = incoming.clone();
            tokio::task::spawn_blocking(move || match source.extract(&candidate) {
                Ok(text) => {
                    let cmp = similarity::compare_sets(&incoming, &detector.token_set(&text));
                    (idx, candidate, Some(cmp))
                }
                Err(e) => {
                    tracing::warn!("Skipping candidate {:?}: {}", candidate.file_name(), e);
                    (idx, candidate, None)
                }
            })
        })
        .buffer_unordered(settings.max_parallel)
        .collect::<Vec<_>>()
        .await;

    let mut compared = 0;
    let mut best_score: Option<f64> = None;
    let mut best: Option<(usize, PathBuf, Comparison)> = None;

    for result in results {
        let (idx, candidate, cmp) = result?;
        let Some(cmp) = cmp else { continue };

        compared += 1;
        tracing::debug!("Similarity with {:?}: {:.4}", candidate.file_name(), cmp.score);
        best_score = Some(best_score.map_or(cmp.score, |b| b.max(cmp.score)));

        if cmp.score < threshold {
            continue;
        }
        let better = match &best {
            None => true,
            Some((best_idx, _, best_cmp)) => {
                cmp.score > best_cmp.score || (cmp.score == best_cmp.score && idx < *best_idx)
            }
        };
        if better {
            best = Some((idx, candidate, cmp));
        }
    }

    Ok(match best {
        Some((_, original, cmp)) => {
            tracing::info!(
                "Duplicate detected: {:?} ~ {:?} ({:.2})",
                path.file_name(),
                original.file_name(),
                cmp.score
            );
            CheckOutcome::Duplicate(DuplicateMatch {
                incoming: path.to_path_buf(),
                original,
                score: cmp.score,
                comparison: Some(cmp),
            })
        }
        None => CheckOutcome::Distinct { compared, best_score },
    })
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ScanOptions {
    pub dry_run: bool,
    pub force: bool,
    /// Print a `DUPLIKAT_ERKANNT|...` line per duplicate on stdout.
    pub porcelain: bool,
}

#[derive(Debug, Default)]
pub struct ScanSummary {
    pub processed: usize,
    pub distinct: usize,
    pub skipped: usize,
    pub errors: usize,
    pub duplicates: Vec<DuplicateMatch>,
    /// Duplicates, at their new place in the trash folder.
    pub moved: Vec<PathBuf>,
    /// Distinct documents, at their new place in the output folder.
    pub filed: Vec<PathBuf>,
    pub reports: Vec<PathBuf>,
}

/// Move a confirmed duplicate to the trash folder and, if configured,
/// write a report about it.
fn file_duplicate(m: &DuplicateMatch, config: &Config, opts: &ScanOptions, summary: &mut ScanSummary) -> Result<()> {
    let settings = &config.duplicate_detection;

    // stat both files before the move
    let facts = if settings.generate_report {
        Some((FileFacts::from_path(&m.incoming)?, FileFacts::from_path(&m.original)?))
    } else {
        None
    };

    let name = format!("DUPLICATE_{}", file_name(&m.incoming));
    let moved = files::move_file(&m.incoming, &config.paths.trash_dir, &name, opts.force)?;
    summary.moved.push(moved.clone());

    if let Some((duplicate, original)) = facts {
        let report = DuplicateReport {
            created: chrono::Local::now(),
            duplicate,
            original,
            similarity: m.score,
            shared_tokens: m.comparison.as_ref().map_or(0, |c| c.shared),
            exact_match: m.is_exact(),
            moved_to: Some(moved),
        };
        let stem = m
            .incoming
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        match report.write(&config.report_dir(), &stem, settings.report_format) {
            Ok(path) => summary.reports.push(path),
            Err(e) => tracing::warn!("Failed to write duplicate report: {}", e),
        }
    }
    Ok(())
}

/// Move a distinct document into the output folder under its own name, so
/// later documents in the same scan are checked against it.
fn file_distinct(path: &Path, config: &Config, opts: &ScanOptions) -> Result<PathBuf> {
    files::move_file(path, &config.paths.output_dir, &file_name(path), opts.force)
}

fn file_or_keep(path: &Path, config: &Config, opts: &ScanOptions, summary: &mut ScanSummary) {
    if opts.dry_run {
        tracing::info!("[dry run] Would file {:?} in {:?}", path.file_name(), config.paths.output_dir);
        summary.distinct += 1;
        return;
    }
    match file_distinct(path, config, opts) {
        Ok(target) => {
            summary.distinct += 1;
            summary.filed.push(target);
        }
        Err(e) => {
            tracing::error!("Failed to file {:?}: {:#}", path.file_name(), e);
            summary.errors += 1;
        }
    }
}

/// Check every PDF in the input folder against the output folder. Duplicates
/// go to the trash folder and everything else is filed into the output
/// folder, one document at a time, so copies within the inbox are caught too.
pub async fn run_scan(config: &Config, opts: ScanOptions, source: Arc<dyn TextSource>) -> Result<ScanSummary> {
    let input_dir = &config.paths.input_dir;
    if !input_dir.is_dir() {
        anyhow::bail!("Input folder does not exist: {}", input_dir.display());
    }

    let inbox = documents::list_pdfs(input_dir);
    tracing::info!("Scanning {} PDFs in {:?}", inbox.len(), input_dir);

    let mut summary = ScanSummary::default();
    for path in inbox {
        summary.processed += 1;

        if let Err(e) = documents::validate_pdf(&path, config.document_processing.max_file_size_mb) {
            tracing::warn!("Skipping {:?}: {}", path.file_name(), e);
            summary.skipped += 1;
            continue;
        }

        let outcome = match check_document(&path, config, source.clone()).await {
            Ok(o) => o,
            Err(e) => {
                tracing::error!("Duplicate check failed for {:?}: {:#}", path.file_name(), e);
                summary.errors += 1;
                continue;
            }
        };

        let m = match outcome {
            CheckOutcome::Duplicate(m) => m,
            CheckOutcome::Skipped(reason) => {
                tracing::debug!("Not compared ({:?}): {:?}", reason, path.file_name());
                file_or_keep(&path, config, &opts, &mut summary);
                continue;
            }
            CheckOutcome::Distinct { compared, best_score } => {
                tracing::debug!(
                    "Distinct: {:?} (compared {}, best {:?})",
                    path.file_name(),
                    compared,
                    best_score
                );
                file_or_keep(&path, config, &opts, &mut summary);
                continue;
            }
        };

        if opts.dry_run {
            tracing::info!(
                "[dry run] Would move {:?} to {:?} (duplicate of {:?})",
                path.file_name(),
                config.paths.trash_dir,
                m.original.file_name()
            );
        } else if let Err(e) = file_duplicate(&m, config, &opts, &mut summary) {
            tracing::error!("Failed to file duplicate {:?}: {:#}", path.file_name(), e);
            summary.errors += 1;
            continue;
        }

        if opts.porcelain {
            println!("{}", m);
        }
        summary.duplicates.push(m);
    }

    tracing::info!(
        "Scan complete: {} processed, {} duplicates, {} skipped, {} errors",
        summary.processed,
        summary.duplicates.len(),
        summary.skipped,
        summary.errors
    );
    Ok(summary)
}

/// Compare two files of any supported kind.
pub async fn run_compare(
    a: &Path,
    b: &Path,
    detector: DuplicateDetector,
    source: Arc<dyn TextSource>,
) -> Result<Comparison> {
    let extract = |path: &Path| {
        let source = source.clone();
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || {
            source
                .extract(&path)
                .with_context(|| format!("Failed to read {}", path.display()))
        })
    };
    let (left, right) = tokio::try_join!(extract(a), extract(b))?;
    Ok(detector.compare(&left?, &right?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportFormat;
    use crate::documents::PlainTextSource;
    use tempfile::TempDir;

    const INVOICE: &str = "%PDF-1.4 Rechnung Nummer 4711 Beratungsleistung Januar \
        Stundensatz Mehrwertsteuer Gesamtbetrag Zahlungsziel Bankverbindung Musterfirma";
    const INVOICE_RESCAN: &str = "%PDF-1.4 Rechnung Nummer 4711 Beratungsleistung Januar \
        Stundensatz Mehrwertsteuer Gesamtbetrag Zahlungsziel Bankverbindung Musterfirma Seite";
    const CONTRACT: &str = "%PDF-1.4 Mietvertrag Wohnung Hauptstrasse Kaution Nebenkosten Vermieter";

    struct Folders {
        _root: TempDir,
        config: Config,
    }

    fn folders() -> Folders {
        let root = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.paths.input_dir = root.path().join("inbox");
        config.paths.output_dir = root.path().join("final");
        config.paths.trash_dir = root.path().join("trash");
        config.paths.log_dir = None;
        std::fs::create_dir_all(&config.paths.input_dir).unwrap();
        std::fs::create_dir_all(&config.paths.output_dir).unwrap();
        Folders { _root: root, config }
    }

    fn source() -> Arc<dyn TextSource> {
        Arc::new(PlainTextSource)
    }

    fn put(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, text).unwrap();
        path
    }

    #[tokio::test]
    async fn near_copy_is_a_duplicate() {
        let f = folders();
        put(&f.config.paths.output_dir, "contract.pdf", CONTRACT);
        let original = put(&f.config.paths.output_dir, "invoice.pdf", INVOICE);
        let incoming = put(&f.config.paths.input_dir, "scan.pdf", INVOICE_RESCAN);

        let outcome = check_document(&incoming, &f.config, source()).await.unwrap();

        let CheckOutcome::Duplicate(m) = outcome else { panic!("expected duplicate") };
        assert_eq!(m.original, original);
        assert!(!m.is_exact());
        assert!(m.score >= 0.85 && m.score < 1.0);
        assert_eq!(m.to_string(), format!("DUPLIKAT_ERKANNT|invoice.pdf|scan.pdf|{:.2}", m.score));
    }

    #[tokio::test]
    async fn unrelated_document_is_distinct() {
        let f = folders();
        put(&f.config.paths.output_dir, "invoice.pdf", INVOICE);
        let incoming = put(&f.config.paths.input_dir, "contract.pdf", CONTRACT);

        let outcome = check_document(&incoming, &f.config, source()).await.unwrap();

        match outcome {
            CheckOutcome::Distinct { compared, best_score } => {
                assert_eq!(compared, 1);
                assert!(best_score.unwrap() < 0.85);
            }
            other => panic!("expected distinct, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn identical_bytes_match_without_text() {
        let f = folders();
        put(&f.config.paths.output_dir, "invoice.pdf", INVOICE);
        let incoming = put(&f.config.paths.input_dir, "copy.pdf", INVOICE);

        let outcome = check_document(&incoming, &f.config, source()).await.unwrap();

        let CheckOutcome::Duplicate(m) = outcome else { panic!("expected duplicate") };
        assert!(m.is_exact());
        assert_eq!(m.score, 1.0);
    }

    #[tokio::test]
    async fn threshold_is_inclusive() {
        let mut f = folders();
        put(&f.config.paths.output_dir, "a.pdf", "alpha bravo charlie delta");
        let incoming = put(&f.config.paths.input_dir, "b.pdf", "alpha bravo charlie echo");
        // 3 shared of 5
        f.config.document_processing.similarity_threshold = 0.6;

        let outcome = check_document(&incoming, &f.config, source()).await.unwrap();
        assert!(outcome.is_duplicate());

        f.config.document_processing.similarity_threshold = 0.61;
        let outcome = check_document(&incoming, &f.config, source()).await.unwrap();
        assert!(!outcome.is_duplicate());
    }

    #[tokio::test]
    async fn highest_score_wins_then_name_order() {
        let mut f = folders();
        f.config.document_processing.similarity_threshold = 0.5;
        f.config.duplicate_detection.max_parallel = 2;
        put(&f.config.paths.output_dir, "a_weak.pdf", "alpha bravo charlie delta echo foxtrot");
        put(&f.config.paths.output_dir, "b_strong.pdf", "alpha bravo charlie delta echo");
        put(&f.config.paths.output_dir, "c_strong.pdf", "alpha bravo charlie delta echo");
        let incoming = put(&f.config.paths.input_dir, "in.pdf", "alpha bravo charlie delta echo golf");

        let CheckOutcome::Duplicate(m) = check_document(&incoming, &f.config, source()).await.unwrap() else {
            panic!("expected duplicate")
        };
        // b and c tie at 5/6 and beat a at 5/7; b comes first by name
        assert_eq!(m.original.file_name().unwrap(), "b_strong.pdf");
        assert!((m.score - 5.0 / 6.0).abs() < 1e-12);
    }

    #[tokio::test]
    async fn file_already_in_output_folder_is_not_its_own_duplicate() {
        let f = folders();
        let filed = put(&f.config.paths.output_dir, "invoice.pdf", INVOICE);

        let outcome = check_document(&filed, &f.config, source()).await.unwrap();
        assert!(matches!(outcome, CheckOutcome::Distinct { compared: 0, best_score: None }));
    }

    #[tokio::test]
    async fn unreadable_candidates_are_skipped() {
        let f = folders();
        put(&f.config.paths.output_dir, "blank.pdf", "   ");
        put(&f.config.paths.output_dir, "contract.pdf", CONTRACT);
        let incoming = put(&f.config.paths.input_dir, "in.pdf", INVOICE);

        let outcome = check_document(&incoming, &f.config, source()).await.unwrap();
        assert!(matches!(outcome, CheckOutcome::Distinct { compared: 1, .. }));
    }

    #[tokio::test]
    async fn disabled_or_missing_output_skips() {
        let mut f = folders();
        let incoming = put(&f.config.paths.input_dir, "in.pdf", INVOICE);

        f.config.duplicate_detection.enabled = false;
        let outcome = check_document(&incoming, &f.config, source()).await.unwrap();
        assert!(matches!(outcome, CheckOutcome::Skipped(SkipReason::Disabled)));

        f.config.duplicate_detection.enabled = true;
        f.config.paths.output_dir = f.config.paths.output_dir.join("missing");
        let outcome = check_document(&incoming, &f.config, source()).await.unwrap();
        assert!(matches!(outcome, CheckOutcome::Skipped(SkipReason::NoOutputDir)));
    }

    #[tokio::test]
    async fn short_text_is_not_compared() {
        let mut f = folders();
        f.config.duplicate_detection.min_text_length = 100;
        put(&f.config.paths.output_dir, "x.pdf", "Rechnung Januar extra");
        let incoming = put(&f.config.paths.input_dir, "in.pdf", "Rechnung Januar");

        let outcome = check_document(&incoming, &f.config, source()).await.unwrap();
        assert!(matches!(
            outcome,
            CheckOutcome::Skipped(SkipReason::TextTooShort { len: 15, min: 100 })
        ));
    }

    #[tokio::test]
    async fn unreadable_incoming_is_an_error() {
        let f = folders();
        put(&f.config.paths.output_dir, "invoice.pdf", INVOICE);
        let incoming = put(&f.config.paths.input_dir, "blank.pdf", "  ");

        assert!(check_document(&incoming, &f.config, source()).await.is_err());
    }

    #[tokio::test]
    async fn scan_moves_duplicates_and_writes_reports() {
        let mut f = folders();
        f.config.duplicate_detection.generate_report = true;
        f.config.duplicate_detection.report_format = ReportFormat::Json;
        put(&f.config.paths.output_dir, "invoice.pdf", INVOICE);
        put(&f.config.paths.output_dir, "contract.pdf", "Kontoauszug Februar Girokonto");
        let dup = put(&f.config.paths.input_dir, "scan.pdf", INVOICE_RESCAN);
        let fresh = put(&f.config.paths.input_dir, "contract.pdf", CONTRACT);
        let broken = put(&f.config.paths.input_dir, "broken.pdf", "not a pdf at all");
        put(&f.config.paths.input_dir, "notes.txt", INVOICE);

        let summary = run_scan(&f.config, ScanOptions::default(), source()).await.unwrap();

        assert_eq!(summary.processed, 3);
        assert_eq!(summary.distinct, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.errors, 0);
        assert_eq!(summary.duplicates.len(), 1);
        assert!(!dup.exists());
        assert!(!fresh.exists());
        assert!(broken.exists());
        assert_eq!(summary.moved, vec![f.config.paths.trash_dir.join("DUPLICATE_scan.pdf")]);
        assert!(summary.moved[0].exists());
        // name taken in the output folder, so the filed copy gets a suffix
        assert_eq!(summary.filed, vec![f.config.paths.output_dir.join("contract_1.pdf")]);
        assert_eq!(std::fs::read_to_string(&summary.filed[0]).unwrap(), CONTRACT);

        assert_eq!(summary.reports.len(), 1);
        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&summary.reports[0]).unwrap()).unwrap();
        assert_eq!(report["duplicate_file"]["filename"], "scan.pdf");
        assert_eq!(report["original_file"]["filename"], "invoice.pdf");
        assert!(summary.reports[0].starts_with(&f.config.paths.trash_dir));
    }

    #[tokio::test]
    async fn dry_run_touches_nothing() {
        let f = folders();
        put(&f.config.paths.output_dir, "invoice.pdf", INVOICE);
        let dup = put(&f.config.paths.input_dir, "scan.pdf", INVOICE_RESCAN);
        let fresh = put(&f.config.paths.input_dir, "contract.pdf", CONTRACT);

        let opts = ScanOptions { dry_run: true, ..Default::default() };
        let summary = run_scan(&f.config, opts, source()).await.unwrap();

        assert_eq!(summary.duplicates.len(), 1);
        assert_eq!(summary.distinct, 1);
        assert!(summary.moved.is_empty());
        assert!(summary.filed.is_empty());
        assert!(dup.exists());
        assert!(fresh.exists());
        assert!(!f.config.paths.trash_dir.exists());
        assert!(!f.config.paths.output_dir.join("contract.pdf").exists());
    }

    #[tokio::test]
    async fn copies_within_the_inbox_are_caught() {
        let f = folders();
        put(&f.config.paths.input_dir, "a.pdf", INVOICE);
        let second = put(&f.config.paths.input_dir, "b.pdf", INVOICE);

        let summary = run_scan(&f.config, ScanOptions::default(), source()).await.unwrap();

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.distinct, 1);
        assert_eq!(summary.filed, vec![f.config.paths.output_dir.join("a.pdf")]);
        assert_eq!(summary.duplicates.len(), 1);
        assert_eq!(summary.duplicates[0].incoming, second);
        assert_eq!(summary.duplicates[0].original, f.config.paths.output_dir.join("a.pdf"));
        assert!(summary.duplicates[0].is_exact());

        let again = run_scan(&f.config, ScanOptions::default(), source()).await.unwrap();
        assert_eq!(again.processed, 0);
    }

    #[tokio::test]
    async fn duplicate_that_cannot_be_moved_is_only_an_error() {
        let mut f = folders();
        // a file where the trash folder should be
        let blocker = f.config.paths.input_dir.parent().unwrap().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        f.config.paths.trash_dir = blocker;
        put(&f.config.paths.output_dir, "invoice.pdf", INVOICE);
        let dup = put(&f.config.paths.input_dir, "scan.pdf", INVOICE_RESCAN);

        let summary = run_scan(&f.config, ScanOptions::default(), source()).await.unwrap();

        assert_eq!(summary.errors, 1);
        assert!(summary.duplicates.is_empty());
        assert!(summary.moved.is_empty());
        assert!(dup.exists());
    }

    #[tokio::test]
    async fn scan_requires_input_folder() {
        let mut f = folders();
        f.config.paths.input_dir = f.config.paths.input_dir.join("missing");
        assert!(run_scan(&f.config, ScanOptions::default(), source()).await.is_err());
    }

    #[tokio::test]
    async fn compare_reads_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = put(dir.path(), "a.txt", "Rechnung über 500 Euro für Beratungsleistung im Januar");
        let b = put(dir.path(), "b.txt", "RECHNUNG Euro Januar");

        let cmp = run_compare(&a, &b, DuplicateDetector::default(), source()).await.unwrap();
        assert_eq!(cmp.shared, 3);
        assert_eq!(cmp.union, 4);
        assert_eq!(cmp.score, 0.75);

        assert!(run_compare(&a, &dir.path().join("missing.txt"), DuplicateDetector::default(), source())
            .await
            .is_err());
    }
}
