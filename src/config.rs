use std::path::PathBuf;

use clap::Args;

/// Server settings. Every flag can also come from the environment.
#[derive(Args, Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(short = 'a', long, env = "RAMBLOG_ADDR", default_value = "127.0.0.1:3000")]
    pub addr: String,

    /// Data directory (memos are stored in <data>/memos)
    #[arg(short = 'd', long = "data", env = "RAMBLOG_DATA_DIR", default_value = "./data")]
    pub data_dir: PathBuf,

    /// Enable debug logging
    #[arg(short = 'D', long, env = "RAMBLOG_DEBUG")]
    pub debug: bool,

    /// Directory with the built frontend, served for every non-API path
    #[arg(long, env = "RAMBLOG_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Largest accepted upload, in megabytes
    #[arg(long, env = "RAMBLOG_MAX_UPLOAD_MB", default_value_t = 32)]
    pub max_upload_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:3000".to_string(),
            data_dir: PathBuf::from("./data"),
            debug: false,
            static_dir: None,
            max_upload_mb: 32,
        }
    }
}

impl ServerConfig {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

/// Default `tracing` filter when `RUST_LOG` is not set.
pub fn log_filter(debug: bool) -> &'static str {
    if debug {
        "ramblog=debug,tower_http=debug"
    } else {
        "ramblog=info,tower_http=info"
    }
}
