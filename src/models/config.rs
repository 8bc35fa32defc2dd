use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ForcesError, Result};

pub const CONFIG_DIR_ENV: &str = "FORCES_CONFIG_DIR";

const SETTINGS_FILE: &str = "config.json";
const TEMPLATES_FILE: &str = "templates.json";
const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub host: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Wall-clock limit for one sample run of a solution.
    pub run_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "codeforces.com".to_string(),
            timeout_secs: 30,
            user_agent: concat!("forces/", env!("CARGO_PKG_VERSION")).to_string(),
            run_timeout_secs: 10,
        }
    }
}

/// Location of every file forces keeps outside the contest directory.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    root: PathBuf,
}

impl ConfigPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve() -> Result<Self> {
        if let Some(dir) = env::var_os(CONFIG_DIR_ENV) {
            return Ok(Self::new(dir));
        }
        let base = dirs::config_dir()
            .ok_or_else(|| ForcesError::NotFound("user config directory".to_string()))?;
        Ok(Self::new(base.join("forces")))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }

    pub fn templates(&self) -> PathBuf {
        self.root.join(TEMPLATES_FILE)
    }

    pub fn session(&self) -> PathBuf {
        self.root.join(SESSION_FILE)
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Creates the directory (owner-only on unix) if it is missing.
    pub fn ensure_dir(&self) -> Result<()> {
        if self.root.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(&self.root).map_err(|e| ForcesError::file(&self.root, e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.root, fs::Permissions::from_mode(0o700))
                .map_err(|e| ForcesError::file(&self.root, e))?;
        }

        Ok(())
    }
}

pub fn load_settings(paths: &ConfigPaths) -> Result<Settings> {
    Ok(read_json(&paths.settings())?.unwrap_or_default())
}

/// Reads and parses a JSON file. `Ok(None)` only when the file does not exist;
/// any other read or parse failure is an error.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ForcesError::file(path, e)),
    };
    let value = serde_json::from_str(&contents).map_err(|e| {
        ForcesError::file(path, std::io::Error::new(ErrorKind::InvalidData, e))
    })?;
    Ok(Some(value))
}

/// Replaces `path` with the pretty-printed JSON of `value` through a sibling
/// temp file, so readers never observe a half-written file.
pub fn write_json<T: Serialize>(paths: &ConfigPaths, path: &Path, value: &T) -> Result<()> {
    paths.ensure_dir()?;
    let contents = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, contents).map_err(|e| ForcesError::file(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| ForcesError::file(path, e))?;
    debug!("wrote {}", path.display());
    Ok(())
}
