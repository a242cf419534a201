use super::Document;
use crate::error::{Result, TallyError};
use crate::storage::{read_csv, write_csv};
use std::path::{Path, PathBuf};

impl Document {
    /// Save to current file path.
    /// Returns the path saved to.
    pub fn save_file(&mut self) -> Result<PathBuf> {
        let Some(path) = self.file_path.clone() else {
            return Err(TallyError::NoFilePath);
        };

        write_csv(&path, &self.grid)?;
        self.modified = false;
        Ok(path)
    }

    /// Save to `path` and make it the current file.
    pub fn save_as(&mut self, path: &Path) -> Result<PathBuf> {
        write_csv(path, &self.grid)?;
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(path.to_path_buf())
    }

    /// Load from file, replacing the grid and clearing history.
    /// On failure the document is left untouched.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        self.grid = read_csv(path)?;
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        self.undo_stack.clear();
        self.redo_stack.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tallysheet_engine::engine::Location;

    #[test]
    fn test_save_without_path_fails() {
        let mut doc = Document::new();
        assert!(matches!(doc.save_file(), Err(TallyError::NoFilePath)));
    }

    #[test]
    fn test_save_as_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let mut doc = Document::new();
        doc.set_cell_from_input(Location::new(0, 0), "4");
        doc.set_cell_from_input(Location::new(1, 0), "=A1 ^ 2");
        doc.save_as(&path).unwrap();
        assert!(!doc.modified);
        assert_eq!(doc.file_path.as_deref(), Some(path.as_path()));

        let mut other = Document::new();
        other.set_cell_from_input(Location::new(5, 5), "stale");
        other.load_file(&path).unwrap();
        assert_eq!(other.real_value(Location::new(1, 0)), "=A1 ^ 2");
        assert_eq!(other.display(Location::new(1, 0), 3), " 16");
        assert_eq!(other.real_value(Location::new(5, 5)), "");
        assert!(other.undo_stack.is_empty());
        assert!(matches!(other.undo(), Err(TallyError::NothingToUndo)));
    }

    #[test]
    fn test_undo_after_save_marks_document_modified() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = Document::new();
        doc.file_path = Some(dir.path().join("undo.csv"));
        doc.set_cell_from_input(Location::new(0, 0), "1");
        doc.save_file().unwrap();
        assert!(!doc.modified);

        doc.undo().unwrap();
        assert!(doc.modified);
    }

    #[test]
    fn test_failed_load_keeps_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "1,\"unterminated\n").unwrap();

        let mut doc = Document::new();
        doc.set_cell_from_input(Location::new(0, 0), "keep");
        assert!(matches!(doc.load_file(&path), Err(TallyError::Parse { .. })));
        assert_eq!(doc.real_value(Location::new(0, 0)), "keep");
        assert!(doc.file_path.is_none());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = Document::new();
        let err = doc.load_file(&dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, TallyError::Io(_)));
    }
}
