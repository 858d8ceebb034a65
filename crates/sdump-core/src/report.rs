//! Unused-script report
//!
//! One CSV row per finding, no header: `guid,metaPath,category,reason`.
//! `reason` is only filled for inconclusive rows. Written by a single writer
//! after every sidecar has been classified.

use crate::config::ReportMode;
use crate::error::DumpError;
use sdump_usage::{Finding, FindingKind};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Report columns for one finding
#[must_use]
pub fn report_record(finding: &Finding) -> [String; 4] {
    let reason = match &finding.kind {
        FindingKind::Inconclusive { reason } => reason.clone(),
        FindingKind::NeverInstantiated | FindingKind::NoExposedState => String::new(),
    };
    [
        finding.guid.as_ref().map(ToString::to_string).unwrap_or_default(),
        finding.meta_path.to_string_lossy().into_owned(),
        finding.kind.category().to_string(),
        reason,
    ]
}

/// Write findings as CSV rows to any writer
///
/// # Errors
/// Propagates writer failures.
pub fn write_findings<W: Write>(out: W, findings: &[Finding]) -> csv::Result<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    for finding in findings {
        writer.write_record(report_record(finding))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write every finding to `path`
///
/// # Errors
/// [`DumpError::Io`] when the file cannot be opened, [`DumpError::Report`]
/// when rows cannot be written.
pub fn write_report(path: &Path, findings: &[Finding], mode: ReportMode) -> Result<(), DumpError> {
    let file = match mode {
        ReportMode::Truncate => OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path),
        ReportMode::Append => OpenOptions::new().create(true).append(true).open(path),
    }
    .map_err(|e| DumpError::io_error(path, e))?;

    write_findings(file, findings).map_err(|source| DumpError::Report {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(report = %path.display(), findings = findings.len(), ?mode, "report written");
    Ok(())
}
