//! Local cache for remote resources such as schema files.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::http::Fetcher;

/// Source of text resources by URL.
pub trait ResourceCache {
    /// Get the resource, downloading it if it is not cached or `force` is set.
    fn get(&self, url: &str, force: bool) -> Result<String>;
}

/// Caches downloads as files in a directory, one file per URL.
pub struct FileCache {
    dir: PathBuf,
    fetcher: Fetcher,
}

impl FileCache {
    /// Create a cache rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            dir: dir.into(),
            fetcher: Fetcher::new()?,
        })
    }

    /// Replace the downloader, e.g. to change the retry policy.
    pub fn with_fetcher(mut self, fetcher: Fetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Cache file for a URL: the percent-encoded URL as file name.
    pub fn path_for(&self, url: &str) -> PathBuf {
        self.dir.join(urlencoding::encode(url).into_owned())
    }

    fn store(&self, path: &Path, content: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let temp_file = self.dir.join(format!(".{file_name}.tmp"));
        {
            let mut file = File::create(&temp_file)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
        }

        #[cfg(target_os = "windows")]
        if path.exists() {
            fs::remove_file(path)?;
        }

        fs::rename(&temp_file, path)?;
        Ok(())
    }
}

impl ResourceCache for FileCache {
    fn get(&self, url: &str, force: bool) -> Result<String> {
        let path = self.path_for(url);
        if !force && path.is_file() {
            tracing::debug!(%url, path = %path.display(), "Cache hit");
            return Ok(fs::read_to_string(&path)?);
        }

        tracing::debug!(%url, force, "Cache miss, downloading");
        let content = self.fetcher.fetch_text(url)?;
        self.store(&path, &content)?;
        tracing::info!(%url, path = %path.display(), "Cached resource");
        Ok(content)
    }
}
