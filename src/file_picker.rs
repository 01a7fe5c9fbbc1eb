use std::path::{Path, PathBuf};

/// Image formats offered by the texture picker.
pub const TEXTURE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "ktx2", "dds"];

/// Effect documents are `*.pfx.ron`; dialogs can only filter on the last
/// extension.
pub const EFFECT_EXTENSIONS: &[&str] = &["ron"];

/// Blocking "open file" dialog. Returns `None` when cancelled.
pub trait FilePicker: Send + Sync {
    fn pick_file(&self, title: &str, start_dir: &Path, extensions: &[&str]) -> Option<PathBuf>;
}

/// Native OS dialog.
#[derive(Default)]
pub struct NativeFilePicker;

impl FilePicker for NativeFilePicker {
    fn pick_file(&self, title: &str, start_dir: &Path, extensions: &[&str]) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title(title)
            .set_directory(start_dir)
            .add_filter("Supported files", extensions)
            .pick_file()
    }
}
