// src/output/plan_table.rs

use crate::output::formatter::{display_relative, percent};
use crate::plan::{AppliedEntry, PlanEntry};
use anyhow::Result;
use std::io::Write;
use std::path::Path;

const PLAN_HEADER: &str = "--- Organization Plan ---";

/// Writes one line per proposed rename, sorted by original name.
///
/// Failed entries are marked as left in place together with the failure reason.
pub fn write_plan(writer: &mut dyn Write, plan: &[PlanEntry], directory: &Path) -> Result<()> {
    writeln!(writer, "{}", PLAN_HEADER)?;
    if plan.is_empty() {
        writeln!(writer, "No files found or processed.")?;
        return Ok(());
    }

    let mut sorted: Vec<&PlanEntry> = plan.iter().collect();
    sorted.sort_by(|a, b| a.old_name.cmp(&b.old_name));
    for entry in sorted {
        if entry.is_failed() {
            writeln!(
                writer,
                "  '{}' -> (left in place) [{}]",
                entry.old_name,
                entry.description()
            )?;
        } else {
            writeln!(
                writer,
                "  '{}' -> '{}' (Category: {}, {})",
                entry.old_name,
                display_relative(&entry.suggested_new_path, directory),
                entry.category(),
                percent(entry.confidence())
            )?;
        }
    }
    Ok(())
}

/// Writes where each file actually ended up after an apply, in plan order.
pub fn write_applied(
    writer: &mut dyn Write,
    entries: &[AppliedEntry],
    directory: &Path,
) -> Result<()> {
    writeln!(writer, "{}", PLAN_HEADER)?;
    if entries.is_empty() {
        writeln!(writer, "No files found or processed.")?;
        return Ok(());
    }

    for applied in entries {
        let destination = display_relative(&applied.final_new_path, directory);
        if !applied.was_moved() {
            writeln!(writer, "  '{}' (not moved)", applied.entry.old_name)?;
        } else if applied.final_new_path != applied.entry.suggested_new_path {
            writeln!(
                writer,
                "  '{}' -> '{}' (name taken, suffix added)",
                applied.entry.old_name, destination
            )?;
        } else {
            writeln!(writer, "  '{}' -> '{}'", applied.entry.old_name, destination)?;
        }
    }
    Ok(())
}
