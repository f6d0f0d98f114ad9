use std::env;
use std::fs;
use std::path::PathBuf;

/// Filesystem locations the engine reads from and logs to.
///
/// The vector index lives at a fixed on-disk location agreed upon with the
/// indexing pipeline; this process only ever reads it.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub index_path: PathBuf,
}

impl AppPaths {
    pub fn new() -> Self {
        let data_dir = discover_data_dir();
        let log_dir = data_dir.join("logs");
        let index_path = data_dir.join("index.db");

        for dir in [&data_dir, &log_dir] {
            let _ = fs::create_dir_all(dir);
        }

        AppPaths {
            data_dir,
            log_dir,
            index_path,
        }
    }

    pub fn config_path() -> PathBuf {
        if let Ok(path) = env::var("RAGLINE_CONFIG_PATH") {
            return PathBuf::from(path);
        }

        let cwd_config = PathBuf::from("config.yml");
        if cwd_config.exists() {
            return cwd_config;
        }

        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config.yml")
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

fn discover_data_dir() -> PathBuf {
    if let Ok(dir) = env::var("RAGLINE_DATA_DIR") {
        return PathBuf::from(dir);
    }

    env::current_dir()
        .map(|cwd| cwd.join("data"))
        .unwrap_or_else(|_| PathBuf::from("data"))
}
