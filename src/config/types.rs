use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub media: MediaConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Serve the public root as a static site, with `index.html` fallback
    #[serde(default = "default_serve_site")]
    pub serve_site: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_serve_site() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            serve_site: default_serve_site(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaConfig {
    /// Public root tried before any built-in location
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Additional roots tried after `root`, in order
    #[serde(default)]
    pub extra_roots: Vec<PathBuf>,

    /// Bytes read per chunk when streaming a file
    #[serde(default = "default_stream_chunk_size")]
    pub stream_chunk_size: usize,

    /// `Cache-Control` max-age for streamed files (0 = no header)
    #[serde(default = "default_cache_max_age")]
    pub cache_max_age_secs: u64,
}

fn default_stream_chunk_size() -> usize {
    64 * 1024
}
fn default_cache_max_age() -> u64 {
    86_400
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: None,
            extra_roots: Vec::new(),
            stream_chunk_size: default_stream_chunk_size(),
            cache_max_age_secs: default_cache_max_age(),
        }
    }
}

impl MediaConfig {
    /// Configured roots in lookup order, with `~` expanded.
    pub fn configured_roots(&self) -> Vec<PathBuf> {
        self.root
            .iter()
            .chain(self.extra_roots.iter())
            .map(|p| PathBuf::from(shellexpand::tilde(&p.to_string_lossy()).into_owned()))
            .collect()
    }
}
