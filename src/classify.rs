//! Commit significance classification.
//!
//! Subject lines are matched against an ordered rule table; any hit marks
//! the commit trivial. This is a best-effort heuristic over free-form text:
//! false positives and false negatives are expected and acceptable. The
//! rules are data, not branching logic, so each one is independently
//! testable.

use crate::model::{ClassifiedCommit, Commit};
use regex::Regex;
use similar::TextDiff;
use std::sync::OnceLock;

/// Normalized subjects at or above this ratio are near-duplicates.
pub const DEDUP_THRESHOLD: f32 = 0.9;

pub struct TrivialRule {
    pub pattern: Regex,
    pub reason: &'static str,
}

fn rule(pattern: &str, reason: &'static str) -> TrivialRule {
    TrivialRule {
        pattern: Regex::new(&format!("(?i){pattern}")).expect("valid rule pattern"),
        reason,
    }
}

/// Ordered rule table; first match wins.
fn rules() -> &'static [TrivialRule] {
    static RULES: OnceLock<Vec<TrivialRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        vec![
            rule(r"^merge\s+(branch|pull\s+request|remote)", "merge commit"),
            rule(r"^(fix(e[sd])?\s+)?typos?\b", "typo fix"),
            rule(r"^wip\b", "work in progress"),
            rule(r"^(style|format(ting)?|reformat|lint)\b", "formatting only"),
            rule(r"^update\s+(the\s+)?(readme|changelog|docs?)\b", "doc touch-up"),
            rule(r"^chore\(deps[^)]*\):", "dependency bump"),
            rule(r"^bump\s+\S+\s+(from|to)\b", "dependency bump"),
            rule(r"^update\s+dependenc(y|ies)\b", "dependency bump"),
        ]
    })
}

/// The matched rule's reason, or `None` for a substantive subject.
pub fn trivial_reason(subject: &str) -> Option<&'static str> {
    let subject = subject.trim();
    rules()
        .iter()
        .find(|r| r.pattern.is_match(subject))
        .map(|r| r.reason)
}

/// Case-fold, strip punctuation, collapse whitespace.
pub fn normalize(subject: &str) -> String {
    let mut out = String::with_capacity(subject.len());
    let mut pending_space = false;
    for c in subject.to_lowercase().chars() {
        if c.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }
    out
}

/// Character-level similarity ratio in `[0, 1]`.
pub fn similarity(a: &str, b: &str) -> f32 {
    if a == b {
        return 1.0;
    }
    TextDiff::from_chars(a, b).ratio()
}

/// Label every commit and link near-duplicate substantive subjects.
///
/// Near-duplicates are only linked within one repository: the same subject
/// appearing in two repositories is two pieces of reportable work.
/// Deterministic: input order fully decides group identity, so the same
/// commit set always yields the same partition, and reclassification is
/// idempotent.
pub fn classify(commits: Vec<Commit>) -> Vec<ClassifiedCommit> {
    let mut classified: Vec<ClassifiedCommit> = commits
        .into_iter()
        .map(|commit| {
            let trivial = trivial_reason(&commit.subject);
            ClassifiedCommit {
                commit,
                trivial,
                dedup_group: None,
            }
        })
        .collect();

    // Group anchors: the repo and normalized subject of each group's first
    // member.
    let mut anchors: Vec<(String, String)> = Vec::new();
    let mut group_sizes: Vec<usize> = Vec::new();
    for entry in classified.iter_mut().filter(|c| !c.is_trivial()) {
        let norm = normalize(&entry.commit.subject);
        let group = anchors.iter().position(|(repo, anchor)| {
            *repo == entry.commit.repo && similarity(anchor, &norm) >= DEDUP_THRESHOLD
        });
        let group = match group {
            Some(id) => {
                group_sizes[id] += 1;
                id
            }
            None => {
                anchors.push((entry.commit.repo.clone(), norm));
                group_sizes.push(1);
                anchors.len() - 1
            }
        };
        entry.dedup_group = Some(group);
    }

    // A group is only meaningful with at least two members.
    for entry in &mut classified {
        if let Some(id) = entry.dedup_group {
            if group_sizes[id] < 2 {
                entry.dedup_group = None;
            }
        }
    }
    classified
}
