use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("export file name is empty")]
    MissingFileName,
    #[error("export file name must not contain path components: {0}")]
    InvalidFileName(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Writes exported buffers into one output directory under caller-supplied names.
#[derive(Debug, Clone)]
pub struct ExportStorage {
    output_dir: PathBuf,
}

impl ExportStorage {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn validate_file_name(file_name: &str) -> StorageResult<()> {
        if file_name.trim().is_empty() {
            return Err(StorageError::MissingFileName);
        }
        let mut components = Path::new(file_name).components();
        let is_plain = matches!(
            (components.next(), components.next()),
            (Some(std::path::Component::Normal(_)), None)
        );
        if !is_plain {
            return Err(StorageError::InvalidFileName(file_name.to_string()));
        }
        Ok(())
    }

    pub fn target_path(&self, file_name: &str) -> StorageResult<PathBuf> {
        Self::validate_file_name(file_name)?;
        Ok(self.output_dir.join(file_name))
    }

    /// Writes `bytes`, replacing any existing file with the same name.
    pub fn write(&self, file_name: &str, bytes: &[u8]) -> StorageResult<PathBuf> {
        let target = self.target_path(file_name)?;
        fs::create_dir_all(&self.output_dir)?;
        fs::write(&target, bytes)?;
        tracing::info!(path = %target.display(), bytes = bytes.len(), "wrote export");
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_path_joins_output_dir_and_file_name() {
        let storage = ExportStorage::new("/home/test/Pictures");
        let path = storage.target_path("edited.png").unwrap();
        assert_eq!(path, PathBuf::from("/home/test/Pictures/edited.png"));
    }

    #[test]
    fn rejects_empty_and_path_carrying_names() {
        let storage = ExportStorage::new("/tmp");
        assert!(matches!(
            storage.target_path("  "),
            Err(StorageError::MissingFileName)
        ));
        for name in ["../escape.png", "nested/file.png", "/abs.png", ".."] {
            assert!(
                matches!(storage.target_path(name), Err(StorageError::InvalidFileName(_))),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn write_creates_directory_and_overwrites_existing_file() {
        let dir = std::env::temp_dir().join(format!("flexora-storage-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        let storage = ExportStorage::new(&dir);

        let path = storage.write("out.bin", b"first").unwrap();
        storage.write("out.bin", b"second").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"second");
        let _ = fs::remove_dir_all(dir);
    }
}
