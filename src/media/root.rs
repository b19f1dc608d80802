//! Public root resolution.
//!
//! The site is deployed in a few different layouts (build output, dev
//! checkout, client folder), so the root is found by trying an ordered list of
//! [`RootStrategy`] values and keeping the first directory that exists.

use std::path::{Component, Path, PathBuf};

use super::MediaKind;

/// One way of producing a candidate public root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootStrategy {
    /// A path taken from configuration, used as given.
    Configured(PathBuf),
    /// A path relative to the directory containing the running executable.
    ExecutableRelative(PathBuf),
    /// A path relative to the process working directory.
    WorkingDirRelative(PathBuf),
}

impl RootStrategy {
    /// Produce the candidate path, if the base it depends on is available.
    pub fn candidate(&self) -> Option<PathBuf> {
        match self {
            RootStrategy::Configured(path) => Some(path.clone()),
            RootStrategy::ExecutableRelative(rel) => std::env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(|dir| dir.join(rel))),
            RootStrategy::WorkingDirRelative(rel) => {
                std::env::current_dir().ok().map(|cwd| cwd.join(rel))
            }
        }
    }
}

/// Build the standard strategy list.
///
/// Configured roots come first, then `public/` beside the binary, then the
/// build output, development and client public folders under the working
/// directory.
pub fn default_strategies(configured: &[PathBuf]) -> Vec<RootStrategy> {
    let mut strategies: Vec<RootStrategy> = configured
        .iter()
        .cloned()
        .map(RootStrategy::Configured)
        .collect();

    strategies.push(RootStrategy::ExecutableRelative("public".into()));
    strategies.extend(
        ["dist/public", "public", "client/public"]
            .into_iter()
            .map(|rel| RootStrategy::WorkingDirRelative(rel.into())),
    );

    strategies
}

/// A candidate root together with whether it existed at resolution time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub exists: bool,
}

/// The resolved public root and its media directories.
#[derive(Debug, Clone)]
pub struct MediaRoot {
    root: PathBuf,
    videos_dir: PathBuf,
    audio_dir: PathBuf,
    found: bool,
    candidates: Vec<Candidate>,
}

impl MediaRoot {
    /// Resolve the root from an ordered strategy list.
    ///
    /// Never fails: when no candidate exists the first one is used anyway and
    /// the media directories simply read as empty.
    pub fn resolve(strategies: &[RootStrategy]) -> Self {
        let candidates: Vec<Candidate> = strategies
            .iter()
            .filter_map(RootStrategy::candidate)
            .map(|path| {
                let exists = path.is_dir();
                Candidate { path, exists }
            })
            .collect();

        for candidate in &candidates {
            tracing::debug!(
                path = %candidate.path.display(),
                exists = candidate.exists,
                "Probed public root candidate"
            );
        }

        let chosen = candidates.iter().find(|c| c.exists).or(candidates.first());

        let (root, found) = match chosen {
            Some(c) => (c.path.clone(), c.exists),
            None => (PathBuf::from("public"), false),
        };

        if found {
            tracing::info!("Using public root {}", root.display());
        } else {
            tracing::warn!(
                "No public root candidate exists; falling back to {} (media will be empty)",
                root.display()
            );
        }

        let mut resolved = Self::from_root(root);
        resolved.found = found;
        resolved.candidates = candidates;
        resolved
    }

    /// Use `root` directly, without probing.
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            videos_dir: root.join(MediaKind::Video.subdir()),
            audio_dir: root.join(MediaKind::Audio.subdir()),
            found: root.is_dir(),
            candidates: Vec::new(),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the chosen root existed when it was resolved.
    pub fn is_found(&self) -> bool {
        self.found
    }

    /// Every candidate checked during [`MediaRoot::resolve`], in order.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Directory holding files of `kind`.
    pub fn dir(&self, kind: MediaKind) -> &Path {
        match kind {
            MediaKind::Video => &self.videos_dir,
            MediaKind::Audio => &self.audio_dir,
        }
    }

    /// Join `filename` onto the directory for `kind`.
    ///
    /// Returns `None` unless `filename` is a single plain path component, so
    /// request parameters cannot escape the media directory.
    pub fn file_path(&self, kind: MediaKind, filename: &str) -> Option<PathBuf> {
        let mut components = Path::new(filename).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) if name == filename => {
                Some(self.dir(kind).join(name))
            }
            _ => None,
        }
    }
}
