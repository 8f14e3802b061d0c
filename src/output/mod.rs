// src/output/mod.rs

//! Human-readable and JSON rendering of plans, apply results and undo reports.

use crate::Organized;
use anyhow::Result;
use std::io::Write;
use std::path::Path;

pub mod formatter;
pub mod plan_table;
pub mod summary;

pub use plan_table::{write_applied, write_plan};
pub use summary::{write_json, write_summary, write_undo_report};

/// Writes the full report of an organize run: the plan (or where files went) and the summary.
pub fn write_report(writer: &mut dyn Write, organized: &Organized, directory: &Path) -> Result<()> {
    match organized {
        Organized::DryRun(plan) => write_plan(writer, plan, directory)?,
        Organized::Applied(report) => write_applied(writer, &report.entries, directory)?,
    }
    write_summary(writer, organized)?;
    writer.flush()?;
    Ok(())
}
