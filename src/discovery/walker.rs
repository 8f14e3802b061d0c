use ignore::WalkBuilder;
use log::debug;
use std::path::Path;

/// Builds a single-level walker over `directory`.
///
/// Only the immediate children are visited. Hidden entries are skipped and no
/// ignore files are consulted: a document folder is organized as the user sees it.
pub(super) fn build_walker(directory: &Path) -> ignore::Walk {
    let mut walker_builder = WalkBuilder::new(directory);
    walker_builder
        .standard_filters(false)
        .hidden(true)
        .follow_links(false)
        .max_depth(Some(1))
        .sort_by_file_name(|a, b| a.cmp(b));
    debug!(
        "Configuring WalkBuilder for '{}': depth 1, hidden entries skipped.",
        directory.display()
    );
    walker_builder.build()
}
