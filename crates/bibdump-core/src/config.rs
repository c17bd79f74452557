use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Dump set listing used when nothing else is configured.
pub const DEFAULT_INDEX_URL: &str = "https://bibdata.princeton.edu/dumps/12645.json";
pub const DEFAULT_OUT_DIR: &str = "/tmp/full_dump";
pub const DEFAULT_START: usize = 1;
pub const DEFAULT_LIMIT: usize = 20;
/// Bytes requested per write callback while streaming a dump file to disk.
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

/// HTTP transfer settings (optional `[http]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Seconds allowed for the TCP/TLS connect phase.
    pub connect_timeout_secs: u64,
    /// Seconds allowed for a whole request, body included.
    pub timeout_secs: u64,
    /// Receive buffer size handed to libcurl.
    pub chunk_size: usize,
    /// Optional User-Agent header.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            timeout_secs: 3600,
            chunk_size: DEFAULT_CHUNK_SIZE,
            user_agent: None,
        }
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Global configuration loaded from `~/.config/bibdump/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BibdumpConfig {
    /// JSON listing of dump files.
    pub index_url: String,
    /// Where dumps are downloaded, extracted and renamed.
    pub out_dir: PathBuf,
    /// 1-based position of the first file to fetch.
    pub start: usize,
    /// Number of files to fetch. Must be set here or on the command line.
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub http: HttpConfig,
}

impl Default for BibdumpConfig {
    fn default() -> Self {
        Self {
            index_url: DEFAULT_INDEX_URL.to_string(),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            start: DEFAULT_START,
            limit: Some(DEFAULT_LIMIT),
            http: HttpConfig::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("bibdump")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<BibdumpConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = BibdumpConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: BibdumpConfig = toml::from_str(&data)?;
    Ok(cfg)
}
