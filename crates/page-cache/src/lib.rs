//! # page-cache
//!
//! A transparent on-disk cache of HTTP response bodies, keyed by URL, so that
//! repeated scraper runs do not hit the remote site again.
//!
//! ## How it works
//!
//! Each URL maps to exactly one file inside the cache directory. The file
//! name is an injective encoding of the URL (see [`cache_key`]), so no index
//! file is needed and entries can be inspected or deleted by hand.
//!
//! 1. [`PageCache::load`] returns the stored body, or `None` when the entry
//!    is missing or older than the configured max age.
//! 2. [`PageCache::store`] writes the body to a temporary file in the same
//!    directory and renames it into place, so readers never see a partial
//!    entry.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use page_cache::PageCache;
//! use std::time::Duration;
//!
//! let cache = PageCache::open_default().with_max_age(Duration::from_secs(86_400));
//! let url = "https://example.com/page";
//! let body = match cache.load(url)? {
//!     Some(body) => body,
//!     None => {
//!         let body = String::from("<html>…</html>"); // fetch it
//!         cache.store(url, &body)?;
//!         body
//!     }
//! };
//! # Ok::<(), page_cache::CacheError>(())
//! ```
//!
//! ## Environment variable overrides
//!
//! - `DOS2_SKILLS_CACHE_DIR` — override the default cache directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

// ── Public constants ─────────────────────────────────────────────────────────

/// Environment variable that overrides [`default_cache_dir`].
pub const CACHE_DIR_ENV: &str = "DOS2_SKILLS_CACHE_DIR";

/// File extension of cache entries.
const ENTRY_EXT: &str = "body";

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned by page-cache operations.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Could not create or list the cache directory.
    #[error("Cache directory error for '{path}': {source}")]
    CacheDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading an entry failed for a reason other than "not found".
    #[error("Failed to read cache entry '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing or renaming an entry failed.
    #[error("Failed to write cache entry '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ── Cache directory resolution ───────────────────────────────────────────────

/// Returns the default directory for cached pages.
///
/// Default locations:
/// - **macOS**: `~/Library/Caches/dos2-skills/pages/`
/// - **Linux**: `~/.cache/dos2-skills/pages/`
/// - **Windows**: `%LOCALAPPDATA%\dos2-skills\pages\`
///
/// Override by setting `DOS2_SKILLS_CACHE_DIR`.
pub fn default_cache_dir() -> PathBuf {
    if let Ok(override_dir) = std::env::var(CACHE_DIR_ENV) {
        if !override_dir.is_empty() {
            return PathBuf::from(override_dir);
        }
    }

    let base = dirs::cache_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
        .unwrap_or_else(std::env::temp_dir);

    base.join("dos2-skills").join("pages")
}

/// Encode a URL as a file name.
///
/// ASCII alphanumerics, `-` and `.` are kept; every other byte becomes `_`
/// followed by two lowercase hex digits. The mapping is injective, so two
/// different URLs never share an entry.
pub fn cache_key(url: &str) -> String {
    let mut key = String::with_capacity(url.len() + 16);
    for b in url.bytes() {
        if b.is_ascii_alphanumeric() || b == b'-' || b == b'.' {
            key.push(b as char);
        } else {
            key.push('_');
            key.push_str(&format!("{b:02x}"));
        }
    }
    key
}

// ── PageCache ────────────────────────────────────────────────────────────────

/// A directory of cached response bodies.
#[derive(Debug, Clone)]
pub struct PageCache {
    dir: PathBuf,
    max_age: Option<Duration>,
}

impl PageCache {
    /// A cache rooted at `dir`. The directory is created lazily on first store.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            max_age: None,
        }
    }

    /// A cache rooted at [`default_cache_dir`].
    pub fn open_default() -> Self {
        Self::new(default_cache_dir())
    }

    /// Treat entries older than `max_age` (by file mtime) as missing.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_age(&self) -> Option<Duration> {
        self.max_age
    }

    /// Path of the entry for `url`, whether or not it exists.
    pub fn entry_path(&self, url: &str) -> PathBuf {
        self.dir.join(format!("{}.{ENTRY_EXT}", cache_key(url)))
    }

    /// Return the cached body for `url`, or `None` on a miss or a stale entry.
    pub fn load(&self, url: &str) -> Result<Option<String>, CacheError> {
        let path = self.entry_path(url);

        if let Some(max_age) = self.max_age {
            match fs::metadata(&path) {
                Ok(meta) => {
                    // An mtime in the future counts as fresh.
                    let age = meta
                        .modified()
                        .ok()
                        .and_then(|m| m.elapsed().ok())
                        .unwrap_or_default();
                    if age > max_age {
                        return Ok(None);
                    }
                }
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
                Err(source) => return Err(CacheError::Read { path, source }),
            }
        }

        match fs::read_to_string(&path) {
            Ok(body) => Ok(Some(body)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(CacheError::Read { path, source }),
        }
    }

    /// Store `body` as the entry for `url`, replacing any previous entry.
    ///
    /// Returns the path of the written entry.
    pub fn store(&self, url: &str, body: &str) -> Result<PathBuf, CacheError> {
        fs::create_dir_all(&self.dir).map_err(|source| CacheError::CacheDir {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.entry_path(url);
        let tmp_path = path.with_extension(format!("{ENTRY_EXT}.tmp"));

        fs::write(&tmp_path, body).map_err(|source| CacheError::Write {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &path).map_err(|source| CacheError::Write {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }

    /// Remove the entry for `url`. Returns `true` if an entry existed.
    pub fn remove(&self, url: &str) -> Result<bool, CacheError> {
        let path = self.entry_path(url);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(CacheError::Write { path, source }),
        }
    }

    /// Delete every entry in the cache directory. Returns the number removed.
    ///
    /// Files that are not cache entries are left alone.
    pub fn clear(&self) -> Result<usize, CacheError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(source) => {
                return Err(CacheError::CacheDir {
                    path: self.dir.clone(),
                    source,
                })
            }
        };

        let mut removed = 0;
        for entry in entries {
            let entry = entry.map_err(|source| CacheError::CacheDir {
                path: self.dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(ENTRY_EXT) {
                continue;
            }
            fs::remove_file(&path).map_err(|source| CacheError::Write {
                path: path.clone(),
                source,
            })?;
            removed += 1;
        }

        Ok(removed)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://divinityoriginalsin2.wiki.fextralife.com/Aerotheurge+Skills";

    #[test]
    fn cache_key_keeps_safe_bytes() {
        assert_eq!(cache_key("abc-1.2"), "abc-1.2");
        assert_eq!(cache_key("a/b"), "a_2fb");
        assert_eq!(cache_key("a_b"), "a_5fb");
    }

    #[test]
    fn cache_key_is_injective_on_lookalikes() {
        assert_ne!(cache_key("a+b"), cache_key("a b"));
        assert_ne!(cache_key("a_2fb"), cache_key("a/b"));
    }

    #[test]
    fn miss_then_hit() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PageCache::new(dir.path().join("pages"));

        assert_eq!(cache.load(URL).unwrap(), None);
        let path = cache.store(URL, "<html>ok</html>").unwrap();
        assert!(path.starts_with(cache.dir()));
        assert_eq!(cache.load(URL).unwrap().as_deref(), Some("<html>ok</html>"));
    }

    #[test]
    fn store_replaces_previous_entry() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PageCache::new(dir.path());
        cache.store(URL, "old").unwrap();
        cache.store(URL, "new").unwrap();
        assert_eq!(cache.load(URL).unwrap().as_deref(), Some("new"));
    }

    #[test]
    fn zero_max_age_treats_entries_as_stale() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PageCache::new(dir.path());
        cache.store(URL, "body").unwrap();
        std::thread::sleep(Duration::from_millis(20));

        let stale = cache.clone().with_max_age(Duration::ZERO);
        assert_eq!(stale.load(URL).unwrap(), None);

        let fresh = cache.with_max_age(Duration::from_secs(3600));
        assert_eq!(fresh.load(URL).unwrap().as_deref(), Some("body"));
    }

    #[test]
    fn remove_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PageCache::new(dir.path());
        cache.store(URL, "a").unwrap();
        cache.store("https://example.com/b", "b").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "keep me").unwrap();

        assert!(cache.remove(URL).unwrap());
        assert!(!cache.remove(URL).unwrap());
        assert_eq!(cache.clear().unwrap(), 1);
        assert!(dir.path().join("notes.txt").exists());
    }

    #[test]
    fn clear_on_missing_dir_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PageCache::new(dir.path().join("never-created"));
        assert_eq!(cache.clear().unwrap(), 0);
    }

    #[test]
    fn cache_dir_override_via_env() {
        std::env::set_var(CACHE_DIR_ENV, "/tmp/test_dos2_skills_override");
        let d = default_cache_dir();
        std::env::remove_var(CACHE_DIR_ENV);
        assert_eq!(d, PathBuf::from("/tmp/test_dos2_skills_override"));
    }
}
