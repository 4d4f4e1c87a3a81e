// file_dialogs.rs
use rfd::FileDialog;
use std::collections::HashSet;
use std::path::PathBuf;

pub fn select_images() -> Option<Vec<PathBuf>> {
    FileDialog::new()
        .add_filter("Images", &["png", "jpg", "jpeg", "gif", "bmp", "webp"])
        .pick_files()
}

/// Collapses duplicate paths to a single entry; the resulting order is
/// unspecified.
pub fn dedup_selection(files: Vec<PathBuf>) -> Vec<PathBuf> {
    let unique: HashSet<_> = files.into_iter().collect();
    unique.into_iter().collect()
}
