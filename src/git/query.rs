use crate::config::RepoConfig;
use crate::daterange::DateRange;
use crate::error::{GitweekError, Result};
use crate::git::AuthorPattern;
use crate::model::Commit;
use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};
use std::collections::VecDeque;
use std::process::Command;
use std::sync::Mutex;

/// ASCII unit separator; cannot occur in a commit subject line.
const FIELD_SEP: char = '\u{1f}';
const LOG_FORMAT: &str = "--pretty=format:%H%x1f%s%x1f%an%x1f%ae%x1f%ad";

/// Repositories are independent read-only queries, so a few may run at once.
const MAX_WORKERS: usize = 4;

/// Commits of one repository, chronologically ascending.
#[derive(Debug)]
pub struct RepoCommits {
    pub repo: RepoConfig,
    pub commits: Vec<Commit>,
}

/// A recoverable per-repository failure, surfaced alongside the results.
#[derive(Debug)]
pub struct CollectWarning {
    pub repo: String,
    pub message: String,
}

impl std::fmt::Display for CollectWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.repo, self.message)
    }
}

#[derive(Debug, Default)]
pub struct CollectionOutcome {
    /// Per-repository commit groups, in configured repository order.
    pub groups: Vec<RepoCommits>,
    pub warnings: Vec<CollectWarning>,
}

/// Query all configured repositories for commits in `range` authored by the
/// user.
///
/// Every local and remote-tracking branch present in the repository is
/// searched; the collector never fetches, so stale remote refs reduce
/// accuracy until the caller fetches. Failing repositories are skipped with
/// a warning; an empty result is not an error.
pub fn collect(
    repos: &[RepoConfig],
    range: &DateRange,
    author: &AuthorPattern,
) -> CollectionOutcome {
    let queue: Mutex<VecDeque<(usize, &RepoConfig)>> =
        Mutex::new(repos.iter().enumerate().collect());
    let results: Mutex<Vec<(usize, Result<Vec<Commit>>)>> = Mutex::new(Vec::new());

    let pb = ProgressBar::new(repos.len() as u64);
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message("Collecting commits...");

    let workers = repos.len().min(MAX_WORKERS);
    std::thread::scope(|s| {
        for _ in 0..workers {
            s.spawn(|| loop {
                let job = queue.lock().expect("queue lock").pop_front();
                let Some((index, repo)) = job else { break };
                let collected = collect_one(repo, range, author);
                results.lock().expect("results lock").push((index, collected));
                pb.inc(1);
            });
        }
    });
    pb.finish_and_clear();

    let mut results = results.into_inner().expect("results lock");
    results.sort_by_key(|(index, _)| *index);

    let mut outcome = CollectionOutcome::default();
    for (index, result) in results {
        match result {
            Ok(commits) => outcome.groups.push(RepoCommits {
                repo: repos[index].clone(),
                commits,
            }),
            Err(err) => {
                warn!("skipping repository '{}': {err}", repos[index].name);
                outcome.warnings.push(CollectWarning {
                    repo: repos[index].name.clone(),
                    message: err.to_string(),
                });
            }
        }
    }
    outcome
}

fn collect_one(repo: &RepoConfig, range: &DateRange, author: &AuthorPattern) -> Result<Vec<Commit>> {
    gix::discover(&repo.path).map_err(|e| GitweekError::RepoAccess {
        repo: repo.name.clone(),
        message: e.to_string(),
    })?;

    debug!(
        "git log --branches --remotes --since='{}' --until='{}' in {}",
        range.since_arg(),
        range.until_arg(),
        repo.path.display()
    );
    let output = Command::new("git")
        .arg("log")
        .arg("--branches")
        .arg("--remotes")
        .arg("--reverse")
        .arg("--date=short")
        .arg(format!("--since={}", range.since_arg()))
        .arg(format!("--until={}", range.until_arg()))
        .arg(LOG_FORMAT)
        .current_dir(&repo.path)
        .output()
        .map_err(|e| GitweekError::VcsQuery {
            repo: repo.name.clone(),
            message: format!("failed to run git: {e}"),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GitweekError::VcsQuery {
            repo: repo.name.clone(),
            message: stderr.trim().to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut commits = Vec::new();
    for line in stdout.lines() {
        let Some(commit) = parse_record(line, &repo.name) else {
            if !line.trim().is_empty() {
                debug!("skipping unparsable log record in '{}': {line}", repo.name);
            }
            continue;
        };
        if author.matches(&commit.author_name, &commit.author_email) {
            commits.push(commit);
        }
    }
    Ok(commits)
}

fn parse_record(line: &str, repo: &str) -> Option<Commit> {
    let mut fields = line.split(FIELD_SEP);
    let hash = fields.next()?.trim();
    let subject = fields.next()?.trim();
    let author_name = fields.next()?.trim();
    let author_email = fields.next()?.trim();
    let date = NaiveDate::parse_from_str(fields.next()?.trim(), "%Y-%m-%d").ok()?;
    if hash.is_empty() {
        return None;
    }
    Some(Commit {
        hash: hash.to_string(),
        subject: subject.to_string(),
        author_name: author_name.to_string(),
        author_email: author_email.to_string(),
        date,
        repo: repo.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(hash: &str, subject: &str, name: &str, email: &str, date: &str) -> String {
        [hash, subject, name, email, date].join("\u{1f}")
    }

    #[test]
    fn parses_a_delimited_record() {
        let line = record("abc123", "feat: add api", "Jane Doe", "jane@work.dev", "2026-01-07");
        let commit = parse_record(&line, "alpha").unwrap();
        assert_eq!(commit.hash, "abc123");
        assert_eq!(commit.subject, "feat: add api");
        assert_eq!(commit.author_name, "Jane Doe");
        assert_eq!(commit.author_email, "jane@work.dev");
        assert_eq!(commit.date.to_string(), "2026-01-07");
        assert_eq!(commit.repo, "alpha");
    }

    #[test]
    fn rejects_malformed_records() {
        assert!(parse_record("", "alpha").is_none());
        assert!(parse_record("abc123", "alpha").is_none());
        let bad_date = record("abc123", "subject", "name", "mail", "last tuesday");
        assert!(parse_record(&bad_date, "alpha").is_none());
    }

    #[test]
    fn missing_repository_is_a_recoverable_warning() {
        let repos = vec![RepoConfig {
            name: "ghost".to_string(),
            path: std::path::PathBuf::from("/nonexistent/ghost"),
        }];
        let range = crate::daterange::current_week(
            NaiveDate::from_ymd_opt(2026, 1, 8).unwrap(),
        );
        let author = AuthorPattern::literal("jane");
        let outcome = collect(&repos, &range, &author);
        assert!(outcome.groups.is_empty());
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].repo, "ghost");
    }
}
