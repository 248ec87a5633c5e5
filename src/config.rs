use crate::error::{GitweekError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const AUTHOR_AUTO: &str = "auto";

/// One trackable repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoConfig {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    #[serde(rename = "markdown")]
    Markdown,
}

/// Persisted tool configuration, loaded once per run and read-only after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub repos: Vec<RepoConfig>,
    #[serde(default = "default_author")]
    pub default_author: String,
    #[serde(default)]
    pub output_format: OutputFormat,
}

fn default_author() -> String {
    AUTHOR_AUTO.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repos: Vec::new(),
            default_author: default_author(),
            output_format: OutputFormat::Markdown,
        }
    }
}

impl Config {
    /// Load from `path`. A missing file yields the defaults; a file that
    /// exists but does not parse is a fatal configuration error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| GitweekError::Config(format!("cannot read {}: {e}", path.display())))?;
        serde_json::from_str(&text)
            .map_err(|e| GitweekError::Config(format!("malformed {}: {e}", path.display())))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text + "\n")?;
        Ok(())
    }

    /// Add a repository, updating the path if the name already exists.
    /// Returns `true` when an existing entry was replaced.
    pub fn add_repo(&mut self, name: &str, path: PathBuf) -> bool {
        for repo in &mut self.repos {
            if repo.name == name {
                repo.path = path;
                return true;
            }
        }
        self.repos.push(RepoConfig {
            name: name.to_string(),
            path,
        });
        false
    }

    /// Returns `true` when an entry was removed.
    pub fn remove_repo(&mut self, name: &str) -> bool {
        let before = self.repos.len();
        self.repos.retain(|r| r.name != name);
        self.repos.len() != before
    }
}

/// Config file location under the reports root.
pub fn config_path(root: &Path) -> PathBuf {
    root.join("config.json")
}

/// Checks that `path` points at a readable git repository.
pub fn validate_repo_path(name: &str, path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(GitweekError::RepoAccess {
            repo: name.to_string(),
            message: format!("path does not exist: {}", path.display()),
        });
    }
    if !path.is_dir() {
        return Err(GitweekError::RepoAccess {
            repo: name.to_string(),
            message: format!("not a directory: {}", path.display()),
        });
    }
    gix::discover(path).map_err(|e| GitweekError::RepoAccess {
        repo: name.to_string(),
        message: format!("not a git repository: {e}"),
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load(&dir.path().join("config.json")).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.default_author, AUTHOR_AUTO);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, GitweekError::Config(_)));
    }

    #[test]
    fn save_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut cfg = Config::default();
        cfg.add_repo("alpha", PathBuf::from("/tmp/alpha"));
        cfg.save(&path).unwrap();
        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn add_repo_upserts_by_name() {
        let mut cfg = Config::default();
        assert!(!cfg.add_repo("alpha", PathBuf::from("/a")));
        assert!(cfg.add_repo("alpha", PathBuf::from("/b")));
        assert_eq!(cfg.repos.len(), 1);
        assert_eq!(cfg.repos[0].path, PathBuf::from("/b"));
    }

    #[test]
    fn remove_repo_reports_presence() {
        let mut cfg = Config::default();
        cfg.add_repo("alpha", PathBuf::from("/a"));
        assert!(cfg.remove_repo("alpha"));
        assert!(!cfg.remove_repo("alpha"));
        assert!(cfg.repos.is_empty());
    }

    #[test]
    fn unknown_output_format_fails_to_parse() {
        let err = serde_json::from_str::<Config>(r#"{"output_format": "html"}"#);
        assert!(err.is_err());
    }
}
