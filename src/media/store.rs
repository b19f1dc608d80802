//! In-memory data-URL cache.
//!
//! Files are read whole, base64-encoded and kept as `data:` URLs for the rest
//! of the process lifetime. Entries are never refreshed or evicted.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use dashmap::DashMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::Path;
use std::sync::Arc;

use super::{FsReader, MediaKind, MediaReader, MediaRoot};
use crate::error::Result;

/// Cache key: media kind plus filename as listed or requested.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaKey {
    pub kind: MediaKind,
    pub filename: String,
}

impl MediaKey {
    pub fn new(kind: MediaKind, filename: impl Into<String>) -> Self {
        Self {
            kind,
            filename: filename.into(),
        }
    }
}

impl fmt::Display for MediaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.filename)
    }
}

/// Snapshot of every readable media file, keyed by filename.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MediaCatalog {
    pub videos: BTreeMap<String, Arc<str>>,
    pub audio: BTreeMap<String, Arc<str>>,
}

impl MediaCatalog {
    fn entries_mut(&mut self, kind: MediaKind) -> &mut BTreeMap<String, Arc<str>> {
        match kind {
            MediaKind::Video => &mut self.videos,
            MediaKind::Audio => &mut self.audio,
        }
    }

    /// Total number of files in the snapshot.
    pub fn len(&self) -> usize {
        self.videos.len() + self.audio.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolved media directories plus the insert-only data-URL cache.
///
/// Built once at startup and shared through [`crate::server::AppContext`].
#[derive(Debug)]
pub struct MediaStore {
    root: MediaRoot,
    reader: Arc<dyn MediaReader>,
    cache: DashMap<MediaKey, Arc<str>>,
}

impl MediaStore {
    /// Create a store that reads from disk.
    pub fn new(root: MediaRoot) -> Self {
        Self::with_reader(root, Arc::new(FsReader))
    }

    /// Create a store with a custom reader.
    pub fn with_reader(root: MediaRoot, reader: Arc<dyn MediaReader>) -> Self {
        Self {
            root,
            reader,
            cache: DashMap::new(),
        }
    }

    pub fn root(&self) -> &MediaRoot {
        &self.root
    }

    /// Number of cached data URLs.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Return `filename` of `kind` as a data URL, reading it on first use.
    ///
    /// Missing and unreadable files both yield `None` and leave the cache
    /// untouched.
    pub async fn data_url(&self, kind: MediaKind, filename: &str) -> Option<Arc<str>> {
        let key = MediaKey::new(kind, filename);

        if let Some(hit) = self.cache.get(&key) {
            tracing::trace!(key = %key, "Data URL cache hit");
            return Some(Arc::clone(hit.value()));
        }

        if !is_dir(self.root.dir(kind)).await {
            tracing::debug!(key = %key, "Media directory missing");
            return None;
        }

        let path = self.root.file_path(kind, filename)?;
        if !is_file(&path).await {
            tracing::debug!(key = %key, "Media file not found");
            return None;
        }

        let bytes = match self.reader.read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(path = %path.display(), "Failed to read media file: {}", e);
                return None;
            }
        };

        let url: Arc<str> = encode_data_url(kind.mime_type(filename), &bytes).into();
        tracing::debug!(key = %key, bytes = bytes.len(), "Cached data URL");

        // A concurrent miss may insert the same value first; either copy is fine.
        self.cache.insert(key, Arc::clone(&url));
        Some(url)
    }

    /// Load every recognized file in both directories as data URLs.
    ///
    /// Files that cannot be read are left out of the result. A directory that
    /// exists but cannot be listed is an error.
    pub async fn all_media(&self) -> Result<MediaCatalog> {
        let mut catalog = MediaCatalog::default();

        for kind in MediaKind::ALL {
            for filename in self.list(kind).await? {
                if let Some(url) = self.data_url(kind, &filename).await {
                    catalog.entries_mut(kind).insert(filename, url);
                }
            }
        }

        tracing::debug!(
            videos = catalog.videos.len(),
            audio = catalog.audio.len(),
            cached = self.cached_len(),
            "Built media catalog"
        );

        Ok(catalog)
    }

    /// Filenames in the directory for `kind` with a recognized extension.
    pub async fn list(&self, kind: MediaKind) -> Result<Vec<String>> {
        let dir = self.root.dir(kind);
        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if !kind.accepts(&name) {
                continue;
            }
            // Follow symlinks so the listing agrees with data_url and streaming
            if is_file(&entry.path()).await {
                names.push(name);
            }
        }

        names.sort();
        Ok(names)
    }
}

/// Format `bytes` as a `data:` URL.
pub(crate) fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::{tempdir, TempDir};

    /// Disk reader that counts how often it is called.
    #[derive(Debug, Default)]
    struct CountingReader {
        reads: AtomicUsize,
    }

    #[async_trait]
    impl MediaReader for CountingReader {
        async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            FsReader.read(path).await
        }
    }

    /// Reader that always fails, as for a file without read permission.
    #[derive(Debug)]
    struct FailingReader;

    #[async_trait]
    impl MediaReader for FailingReader {
        async fn read(&self, _path: &Path) -> io::Result<Vec<u8>> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    fn fixture_root() -> TempDir {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("videos")).unwrap();
        std::fs::create_dir_all(dir.path().join("audio")).unwrap();
        std::fs::write(dir.path().join("videos/demo.mp4"), [0xDE, 0xAD, 0xBE, 0xEF]).unwrap();
        dir
    }

    #[test]
    fn test_key_display() {
        assert_eq!(
            MediaKey::new(MediaKind::Video, "demo.mp4").to_string(),
            "video:demo.mp4"
        );
        assert_eq!(
            MediaKey::new(MediaKind::Audio, "a.mp3").to_string(),
            "audio:a.mp3"
        );
    }

    #[test]
    fn test_encode_data_url() {
        assert_eq!(
            encode_data_url("video/mp4", &[0xDE, 0xAD, 0xBE, 0xEF]),
            "data:video/mp4;base64,3q2+7w=="
        );
    }

    #[tokio::test]
    async fn test_second_lookup_is_served_from_cache() {
        let dir = fixture_root();
        let reader = Arc::new(CountingReader::default());
        let store = MediaStore::with_reader(MediaRoot::from_root(dir.path()), reader.clone());

        let first = store.data_url(MediaKind::Video, "demo.mp4").await.unwrap();
        let second = store.data_url(MediaKind::Video, "demo.mp4").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(reader.reads.load(Ordering::SeqCst), 1);
        assert_eq!(store.cached_len(), 1);
    }

    #[tokio::test]
    async fn test_payload_decodes_to_original_bytes() {
        let dir = fixture_root();
        let original: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        std::fs::write(dir.path().join("audio/voice.mp3"), &original).unwrap();
        let store = MediaStore::new(MediaRoot::from_root(dir.path()));

        let url = store.data_url(MediaKind::Audio, "voice.mp3").await.unwrap();
        let payload = url.strip_prefix("data:audio/mpeg;base64,").unwrap();

        assert_eq!(STANDARD.decode(payload).unwrap(), original);
    }

    #[tokio::test]
    async fn test_missing_file_is_not_cached() {
        let dir = fixture_root();
        let store = MediaStore::new(MediaRoot::from_root(dir.path()));

        assert!(store.data_url(MediaKind::Video, "missing.mp4").await.is_none());
        assert!(store.data_url(MediaKind::Audio, "../videos/demo.mp4").await.is_none());
        assert_eq!(store.cached_len(), 0);
    }

    #[tokio::test]
    async fn test_missing_directory_yields_none() {
        let dir = tempdir().unwrap();
        let store = MediaStore::new(MediaRoot::from_root(dir.path().join("nope")));

        assert!(store.data_url(MediaKind::Video, "demo.mp4").await.is_none());
        assert!(store.all_media().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_file_is_omitted() {
        let dir = fixture_root();
        let store =
            MediaStore::with_reader(MediaRoot::from_root(dir.path()), Arc::new(FailingReader));

        assert!(store.data_url(MediaKind::Video, "demo.mp4").await.is_none());

        let catalog = store.all_media().await.unwrap();
        assert!(catalog.videos.is_empty());
        assert_eq!(store.cached_len(), 0);
    }

    #[tokio::test]
    async fn test_all_media_catalog() {
        let dir = fixture_root();
        std::fs::write(dir.path().join("videos/notes.txt"), b"skip").unwrap();
        std::fs::write(dir.path().join("audio/podcast.aac"), b"aac").unwrap();
        std::fs::create_dir(dir.path().join("videos/nested.mp4")).unwrap();
        let store = MediaStore::new(MediaRoot::from_root(dir.path()));

        let catalog = store.all_media().await.unwrap();

        assert_eq!(catalog.videos.len(), 1);
        assert_eq!(
            &*catalog.videos["demo.mp4"],
            "data:video/mp4;base64,3q2+7w=="
        );
        assert_eq!(catalog.audio.len(), 1);
        assert!(catalog.audio["podcast.aac"].starts_with("data:audio/aac;base64,"));
        assert_eq!(store.cached_len(), 2);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinked_file_is_listed() {
        let dir = fixture_root();
        let outside = tempdir().unwrap();
        let target = outside.path().join("shared.mp4");
        std::fs::write(&target, [0x01, 0x02]).unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("videos/linked.mp4")).unwrap();
        let store = MediaStore::new(MediaRoot::from_root(dir.path()));

        let names = store.list(MediaKind::Video).await.unwrap();
        assert_eq!(names, vec!["demo.mp4".to_string(), "linked.mp4".to_string()]);

        let catalog = store.all_media().await.unwrap();
        assert_eq!(&*catalog.videos["linked.mp4"], "data:video/mp4;base64,AQI=");
    }

    #[tokio::test]
    async fn test_cache_is_not_refreshed_when_file_changes() {
        let dir = fixture_root();
        let store = MediaStore::new(MediaRoot::from_root(dir.path()));

        let before = store.data_url(MediaKind::Video, "demo.mp4").await.unwrap();
        std::fs::write(dir.path().join("videos/demo.mp4"), b"changed").unwrap();
        let after = store.data_url(MediaKind::Video, "demo.mp4").await.unwrap();

        assert_eq!(before, after);
    }
}
