//! Reading and writing effect documents.

use std::fs;
use std::path::Path;

use bevy_emitter_data::{DocElement, from_ron, to_ron};

use crate::error::{EditorError, Result};

/// File suffix of effect documents.
pub const EFFECT_SUFFIX: &str = ".pfx.ron";

/// Storage for whole effect documents.
pub trait DocumentStore: Send + Sync {
    fn read(&self, path: &Path) -> Result<DocElement>;

    /// Replace the document at `path`. Nothing is written if encoding fails.
    fn write(&self, path: &Path, root: &DocElement) -> Result<()>;
}

/// Stores the element tree as pretty-printed RON text.
#[derive(Default, Clone, Copy)]
pub struct RonDocumentStore;

impl DocumentStore for RonDocumentStore {
    fn read(&self, path: &Path) -> Result<DocElement> {
        let text = fs::read_to_string(path).map_err(|e| EditorError::io(path, e))?;
        Ok(from_ron(&text)?)
    }

    fn write(&self, path: &Path, root: &DocElement) -> Result<()> {
        let text = to_ron(root)?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| EditorError::io(parent, e))?;
        }
        fs::write(path, text).map_err(|e| EditorError::io(path, e))
    }
}

/// `<dir>/<name>.pfx.ron`
pub fn effect_path(dir: &Path, name: &str) -> std::path::PathBuf {
    dir.join(format!("{name}{EFFECT_SUFFIX}"))
}

/// Effect name of a document path, without the suffix.
pub fn effect_name(path: &Path) -> String {
    let file = path.file_name().map(|f| f.to_string_lossy().into_owned()).unwrap_or_default();
    file.strip_suffix(EFFECT_SUFFIX).map(str::to_string).unwrap_or(file)
}

#[cfg(test)]
mod tests {
    use bevy_emitter_data::{DocumentError, tags};

    use super::*;

    #[test]
    fn write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = effect_path(&dir.path().join("effects"), "sparks");
        let root = DocElement::new(tags::PARTICLE_SYSTEM)
            .with_child(DocElement::new(tags::EMITTER_DATA).with_attr("name", "Sparks"));

        RonDocumentStore.write(&path, &root).unwrap();
        assert_eq!(RonDocumentStore.read(&path).unwrap(), root);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = RonDocumentStore.read(&dir.path().join("nope.pfx.ron")).unwrap_err();
        assert!(matches!(err, EditorError::Io { .. }));
    }

    #[test]
    fn garbage_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.pfx.ron");
        fs::write(&path, "not ron {").unwrap();
        let err = RonDocumentStore.read(&path).unwrap_err();
        assert!(matches!(err, EditorError::Document(DocumentError::Parse(_))));
    }

    #[test]
    fn names_strip_suffix() {
        assert_eq!(effect_name(Path::new("fx/smoke.pfx.ron")), "smoke");
        assert_eq!(effect_name(Path::new("fx/other.txt")), "other.txt");
    }
}
