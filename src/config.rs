use crate::error::{Result, TrainerError};
use crate::language::SelectionPolicy;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub dictionary_path: PathBuf,
    pub host: String,
    pub port: u16,
    /// serve uniformly random batches instead of adaptive ones
    pub random_words: bool,
    pub selection: SelectionPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dictionary_path: PathBuf::from("dict/common_words.txt"),
            host: "127.0.0.1".to_string(),
            port: 5007,
            random_words: false,
            selection: SelectionPolicy::default(),
        }
    }
}

impl Config {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub trait ConfigStore {
    fn load(&self) -> Result<Config>;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
    required: bool,
}

impl FileConfigStore {
    /// Platform config dir; a missing file there just means defaults
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "letterdrill") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("letterdrill_config.json")
        };
        Self {
            path,
            required: false,
        }
    }

    /// An explicitly chosen file, which must exist and parse
    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
            required: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Result<Config> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !self.required => {
                return Ok(Config::default());
            }
            Err(e) => {
                return Err(TrainerError::Config(format!(
                    "{}: {e}",
                    self.path.display()
                )))
            }
        };
        serde_json::from_slice::<Config>(&bytes)
            .map_err(|e| TrainerError::Config(format!("{}: {e}", self.path.display())))
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
