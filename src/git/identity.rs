use crate::config::{Config, AUTHOR_AUTO};
use crate::error::{GitweekError, Result};
use log::debug;
use std::path::Path;

/// Matches a commit author by display name or email.
///
/// Holds one or more case-insensitive substring needles; a commit is the
/// user's when any needle occurs in either field. Keeping this a structured
/// value (rather than a regex handed to git) keeps the matching semantics
/// auditable and testable.
#[derive(Debug, Clone)]
pub struct AuthorPattern {
    needles: Vec<String>,
}

impl AuthorPattern {
    /// A single explicit needle, e.g. from config or `--author`.
    pub fn literal(needle: &str) -> Self {
        Self {
            needles: vec![needle.trim().to_lowercase()],
        }
    }

    /// One needle per known identity part.
    pub fn from_identity(name: Option<String>, email: Option<String>) -> Option<Self> {
        let needles: Vec<String> = [name, email]
            .into_iter()
            .flatten()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        if needles.is_empty() {
            None
        } else {
            Some(Self { needles })
        }
    }

    pub fn matches(&self, author_name: &str, author_email: &str) -> bool {
        let name = author_name.to_lowercase();
        let email = author_email.to_lowercase();
        self.needles
            .iter()
            .any(|n| name.contains(n) || email.contains(n))
    }

    pub fn describe(&self) -> String {
        self.needles.join(" | ")
    }
}

/// Resolve the author pattern before the pipeline runs.
///
/// Precedence: CLI override, explicit `default_author`, then `"auto"` —
/// the local git identity of the repository containing the current
/// directory, falling back to each configured repository in order.
pub fn resolve_author(config: &Config, cli_override: Option<&str>) -> Result<AuthorPattern> {
    if let Some(pattern) = cli_override {
        if !pattern.trim().is_empty() {
            return Ok(AuthorPattern::literal(pattern));
        }
    }

    if config.default_author != AUTHOR_AUTO && !config.default_author.trim().is_empty() {
        return Ok(AuthorPattern::literal(&config.default_author));
    }

    if let Ok(cwd) = std::env::current_dir() {
        if let Some(pattern) = identity_from(&cwd) {
            return Ok(pattern);
        }
    }
    for repo in &config.repos {
        if let Some(pattern) = identity_from(&repo.path) {
            debug!("resolved author identity from '{}'", repo.name);
            return Ok(pattern);
        }
    }

    Err(GitweekError::Config(
        "cannot resolve author identity: no usable user.name/user.email found; \
         set default_author in the config or pass --author"
            .to_string(),
    ))
}

fn identity_from(path: &Path) -> Option<AuthorPattern> {
    let repo = gix::discover(path).ok()?;
    let snapshot = repo.config_snapshot();
    let name = snapshot.string("user.name").map(|v| v.to_string());
    let email = snapshot.string("user.email").map(|v| v.to_string());
    AuthorPattern::from_identity(name, email)
}
