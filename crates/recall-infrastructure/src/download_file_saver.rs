//! FileSaver that writes exported documents into the downloads directory.

use async_trait::async_trait;
use recall_core::error::{RecallError, Result};
use recall_core::platform::FileSaver;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Upper bound on ` (n)` suffixes tried before giving up.
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Saves documents into a fixed directory without overwriting existing files.
///
/// A name that is already taken gets a ` (n)` suffix before its extension,
/// the way browsers name repeated downloads.
pub struct DownloadDirFileSaver {
    dir: PathBuf,
}

impl DownloadDirFileSaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn candidate(&self, filename: &str, attempt: u32) -> PathBuf {
        if attempt == 0 {
            return self.dir.join(filename);
        }
        let path = Path::new(filename);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        match path.extension() {
            Some(ext) => self
                .dir
                .join(format!("{} ({}).{}", stem, attempt, ext.to_string_lossy())),
            None => self.dir.join(format!("{} ({})", stem, attempt)),
        }
    }
}

#[async_trait]
impl FileSaver for DownloadDirFileSaver {
    async fn save_text_file(&self, filename: &str, content: &str) -> Result<PathBuf> {
        if filename.is_empty() || filename.contains(['/', '\\']) {
            return Err(RecallError::export(format!("Invalid filename: {:?}", filename)));
        }
        fs::create_dir_all(&self.dir).await.map_err(|e| {
            RecallError::export(format!("Cannot create {}: {}", self.dir.display(), e))
        })?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let path = self.candidate(filename, attempt);
            let file = fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await;

            match file {
                Ok(mut file) => {
                    file.write_all(content.as_bytes())
                        .await
                        .map_err(|e| RecallError::export(e.to_string()))?;
                    file.flush()
                        .await
                        .map_err(|e| RecallError::export(e.to_string()))?;
                    return Ok(path);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(RecallError::export(format!(
                        "Cannot write {}: {}",
                        path.display(),
                        e
                    )));
                }
            }
        }

        Err(RecallError::export(format!(
            "No free filename for {} in {}",
            filename,
            self.dir.display()
        )))
    }
}
