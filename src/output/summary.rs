// src/output/summary.rs

use crate::applier::UndoReport;
use crate::Organized;
use anyhow::Result;
use log::debug;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Writes the closing summary of an organize run.
pub fn write_summary(writer: &mut dyn Write, organized: &Organized) -> Result<()> {
    debug!("Writing summary for {} file(s)...", organized.num_files());
    writeln!(writer, "\n--- Summary ---")?;
    writeln!(writer, "Processed {} files.", organized.num_files())?;
    match organized {
        Organized::Applied(report) => {
            writeln!(writer, "Status: Plan APPLIED successfully.")?;
            match &report.audit_log {
                Some(path) => writeln!(writer, "Metadata saved to: {}", path.display())?,
                None => writeln!(writer, "Nothing was renamed; no metadata written.")?,
            }
        }
        Organized::DryRun(_) => {
            writeln!(writer, "Status: Dry run complete. No files were changed.")?;
            writeln!(writer, "To apply these changes, run with the --apply flag.")?;
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonResult<'a, T: Serialize> {
    applied: bool,
    num_files: usize,
    metadata_path: Option<&'a Path>,
    plan: &'a [T],
}

/// Writes the run as one JSON object: `applied`, `num_files`, `metadata_path`, `plan`.
pub fn write_json(writer: &mut dyn Write, organized: &Organized) -> Result<()> {
    match organized {
        Organized::DryRun(plan) => serde_json::to_writer_pretty(
            &mut *writer,
            &JsonResult {
                applied: false,
                num_files: plan.len(),
                metadata_path: None,
                plan,
            },
        )?,
        Organized::Applied(report) => serde_json::to_writer_pretty(
            &mut *writer,
            &JsonResult {
                applied: true,
                num_files: report.entries.len(),
                metadata_path: report.audit_log.as_deref(),
                plan: &report.entries,
            },
        )?,
    }
    writeln!(writer)?;
    Ok(())
}

/// Writes the result of an undo.
pub fn write_undo_report(writer: &mut dyn Write, report: &UndoReport) -> Result<()> {
    writeln!(writer, "--- Undo ---")?;
    writeln!(writer, "Restored {} file(s).", report.files_restored)?;
    if report.files_skipped > 0 {
        writeln!(
            writer,
            "Skipped {} file(s) that were no longer at their organized location.",
            report.files_skipped
        )?;
    }
    if report.files_failed > 0 {
        writeln!(
            writer,
            "Failed to move back {} file(s); see the log above.",
            report.files_failed
        )?;
    }
    Ok(())
}
