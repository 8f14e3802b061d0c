use crate::errors::{io_error_with_path, Error, Result};
use crate::plan::AppliedEntry;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

/// Writes `entries` to `path` as a JSON array with 4-space indentation.
///
/// The file is written next to its destination and then moved into place, so a
/// reader never sees a partially written log. An existing file is only replaced
/// when it is itself an audit log.
pub fn write_audit_log(path: &Path, entries: &[AppliedEntry]) -> Result<()> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    entries.serialize(&mut serializer).map_err(Error::Serialize)?;
    buffer.push(b'\n');

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = tempfile::Builder::new()
        .prefix(".docsort-log")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| io_error_with_path(e, dir))?;
    temp.write_all(&buffer)
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| io_error_with_path(e, temp.path()))?;
    let persisted = if check_log_target(path)? {
        temp.persist(path)
    } else {
        temp.persist_noclobber(path)
    };
    persisted.map_err(|e| io_error_with_path(e.error, path))?;

    log::info!(
        "Audit log with {} record(s) written to '{}'",
        entries.len(),
        path.display()
    );
    Ok(())
}

/// Checks that the log can be written to `path`.
///
/// Returns `true` when an earlier audit log is there to be replaced and `false`
/// when nothing is. Any other file yields `Error::AuditLogConflict`.
pub(crate) fn check_log_target(path: &Path) -> Result<bool> {
    match fs::symlink_metadata(path) {
        Ok(_) => match read_audit_log(path) {
            Ok(_) => Ok(true),
            Err(_) => Err(Error::AuditLogConflict(path.to_path_buf())),
        },
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(io_error_with_path(e, path)),
    }
}

/// Reads the audit log at `path`.
///
/// # Errors
/// `Error::AuditLogNotFound` when the file does not exist and
/// `Error::AuditLogCorrupt` when it is not a valid log.
pub fn read_audit_log(path: &Path) -> Result<Vec<AppliedEntry>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::AuditLogNotFound(path.to_path_buf()))
        }
        Err(e) => return Err(io_error_with_path(e, path)),
    };
    serde_json::from_str(&content).map_err(|source| Error::AuditLogCorrupt {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{Classification, Outcome};
    use crate::plan::PlanEntry;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn applied(dir: &Path) -> AppliedEntry {
        AppliedEntry {
            entry: PlanEntry {
                old_path: dir.join("note.txt"),
                old_name: "note.txt".to_string(),
                extension: ".txt".to_string(),
                outcome: Outcome::Classified(Classification {
                    category: "other".to_string(),
                    suggested_basename: "note".to_string(),
                    confidence: 0.7,
                    date: None,
                    description: "A note".to_string(),
                    notes: String::new(),
                }),
                suggested_new_name: "note.txt".to_string(),
                suggested_new_path: dir.join("other/note.txt"),
            },
            final_new_path: dir.join("other/note.txt"),
            final_new_name: "note.txt".to_string(),
        }
    }

    #[test]
    fn test_write_then_read() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let path = temp.path().join("metadata.json");
        let entries = vec![applied(temp.path())];

        write_audit_log(&path, &entries)?;
        let read = read_audit_log(&path)?;

        assert_eq!(read, entries);
        let text = fs::read_to_string(&path)?;
        assert!(text.starts_with("[\n    {\n        \"old_path\""));
        Ok(())
    }

    #[test]
    fn test_no_temp_files_left_behind() -> anyhow::Result<()> {
        let temp = tempdir()?;
        write_audit_log(&temp.path().join("metadata.json"), &[applied(temp.path())])?;

        let names: Vec<PathBuf> = fs::read_dir(temp.path())?
            .map(|e| e.map(|e| e.path()))
            .collect::<std::io::Result<_>>()?;

        assert_eq!(names, vec![temp.path().join("metadata.json")]);
        Ok(())
    }

    #[test]
    fn test_previous_log_is_replaced() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let path = temp.path().join("metadata.json");
        write_audit_log(&path, &[])?;

        write_audit_log(&path, &[applied(temp.path())])?;

        assert_eq!(read_audit_log(&path)?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_foreign_file_is_never_overwritten() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let path = temp.path().join("notes");
        fs::write(&path, "my precious notes")?;

        let result = write_audit_log(&path, &[applied(temp.path())]);

        assert!(matches!(result, Err(Error::AuditLogConflict(_))));
        assert_eq!(fs::read_to_string(&path)?, "my precious notes");
        let leftovers = fs::read_dir(temp.path())?.count();
        assert_eq!(leftovers, 1);
        Ok(())
    }

    #[test]
    fn test_missing_log() {
        let result = read_audit_log(Path::new("/no/such/dir/metadata.json"));
        assert!(matches!(result, Err(Error::AuditLogNotFound(_))));
    }

    #[test]
    fn test_corrupt_log() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let path = temp.path().join("metadata.json");
        fs::write(&path, "{ not json")?;

        let result = read_audit_log(&path);

        assert!(matches!(result, Err(Error::AuditLogCorrupt { .. })));
        Ok(())
    }
}
