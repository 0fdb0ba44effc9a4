use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::{Error, Result};

/// A module source file held in memory between read and write-back.
#[derive(Debug, Clone)]
pub struct ModuleFile {
    path: PathBuf,
    content: String,
}

impl ModuleFile {
    /// Read a module file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        Ok(Self { path, content })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Label used for diagnostics.
    pub fn display_name(&self) -> String {
        self.path.display().to_string()
    }

    pub fn set_content(&mut self, content: String) {
        self.content = content;
    }

    /// Replace the file on disk with the current content.
    ///
    /// The content goes to a temporary file in the same directory which is
    /// then renamed over the original, so readers never see a partial write.
    pub fn save(&self) -> Result<()> {
        let dir = self.path.parent().unwrap_or(Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
        tmp.write_all(self.content.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| Error::io(tmp.path(), e))?;
        // Temp files are created owner-only; keep the original mode
        if let Ok(meta) = std::fs::metadata(&self.path) {
            tmp.as_file()
                .set_permissions(meta.permissions())
                .map_err(|e| Error::io(tmp.path(), e))?;
        }
        tmp.persist(&self.path)
            .map_err(|e| Error::io(&self.path, e.error))?;
        Ok(())
    }
}
