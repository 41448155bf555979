use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

/// Collects the `.xlsx` files named by the inputs, in a reproducible order.
///
/// File inputs are taken as-is; directory inputs are walked (one level deep
/// unless `recursive`), with entries visited in file-name order so repeated
/// runs see the same sequence. Duplicates are dropped, first occurrence kept.
pub fn find_excel_files(inputs: &[PathBuf], recursive: bool) -> Vec<PathBuf> {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let max_depth = if recursive { usize::MAX } else { 1 };
            for entry in WalkDir::new(input)
                .max_depth(max_depth)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| entry.ok())
            {
                if entry.file_type().is_file() && is_xlsx(entry.path()) {
                    let path = entry.into_path();
                    if seen.insert(path.clone()) {
                        files.push(path);
                    }
                }
            }
        } else if input.is_file() && is_xlsx(input) {
            if seen.insert(input.clone()) {
                files.push(input.clone());
            }
        } else {
            debug!(input = %input.display(), "input is not an .xlsx file or directory, ignored");
        }
    }

    files
}

fn is_xlsx(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("xlsx"))
        .unwrap_or(false)
}
