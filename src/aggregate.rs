//! Folds classified commits into per-project report sections.
//!
//! Grouping preserves the configured repository order; commits from
//! unconfigured repositories land in the synthetic "其他" section, which is
//! always last. Headline and folding policies are heuristics chosen for
//! readable reports, not exact reconstruction of the commit log.

use crate::classify::{normalize, similarity};
use crate::config::Config;
use crate::model::{ClassifiedCommit, Commit, ProjectSection, WorkItem, OTHER_SECTION};
use regex::Regex;
use std::sync::OnceLock;

/// Representatives this similar describe related work and fold into one
/// item with sub-points. Near-duplicates (>= 0.9) were already collapsed by
/// classification.
const RELATED_THRESHOLD: f32 = 0.6;

/// Headlines stay a short phrase; overflow detail belongs in sub-points.
const MAX_HEADLINE_CHARS: usize = 48;

/// One dedup group collapsed to its representative, plus the distinct
/// member subjects worth keeping as detail.
#[derive(Clone)]
struct Candidate {
    repo: String,
    subject: String,
    details: Vec<String>,
}

/// Strip a conventional-commit prefix like `feat(scope): `.
fn clean_subject(subject: &str) -> String {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    let prefix = PREFIX
        .get_or_init(|| Regex::new(r"^\w+(\([^)]*\))?\s*[:：]\s*").expect("valid prefix pattern"));
    prefix.replace(subject.trim(), "").trim().to_string()
}

fn concise(headline: &str) -> String {
    if headline.chars().count() <= MAX_HEADLINE_CHARS {
        return headline.to_string();
    }
    let cut: String = headline.chars().take(MAX_HEADLINE_CHARS - 3).collect();
    format!("{}...", cut.trim_end())
}

/// First-occurrence dedup keyed by normalized form.
fn push_distinct(details: &mut Vec<String>, seen: &mut Vec<String>, text: String) {
    let key = normalize(&text);
    if text.is_empty() || seen.iter().any(|s| *s == key) {
        return;
    }
    seen.push(key);
    details.push(text);
}

/// The most detailed subject wins; ties go to the earliest member.
fn representative<'a>(members: &[&'a Commit]) -> &'a Commit {
    members
        .iter()
        .copied()
        .enumerate()
        .max_by_key(|(i, c)| (c.subject.chars().count(), std::cmp::Reverse(*i)))
        .map(|(_, c)| c)
        .expect("group has at least one member")
}

fn candidates(classified: &[ClassifiedCommit]) -> Vec<Candidate> {
    let survivors: Vec<&ClassifiedCommit> =
        classified.iter().filter(|c| !c.is_trivial()).collect();

    // Collect dedup groups in first-appearance order.
    let mut ordered_keys: Vec<Option<usize>> = Vec::new();
    for entry in &survivors {
        let key = entry.dedup_group;
        if key.is_none() || !ordered_keys.contains(&key) {
            ordered_keys.push(key);
        }
    }

    let mut out = Vec::new();
    let mut singles = survivors.iter().filter(|c| c.dedup_group.is_none());
    for key in ordered_keys {
        let members: Vec<&Commit> = match key {
            Some(id) => survivors
                .iter()
                .filter(|c| c.dedup_group == Some(id))
                .map(|c| &c.commit)
                .collect(),
            // `None` keys appear once per singleton, in order.
            None => match singles.next() {
                Some(entry) => vec![&entry.commit],
                None => continue,
            },
        };

        let lead = representative(&members);
        let mut details = Vec::new();
        let mut seen = Vec::new();
        if members.len() > 1 {
            for member in &members {
                push_distinct(&mut details, &mut seen, clean_subject(&member.subject));
            }
            if details.len() < 2 {
                details.clear();
            }
        }
        out.push(Candidate {
            repo: lead.repo.clone(),
            subject: clean_subject(&lead.subject),
            details,
        });
    }
    out
}

fn fold_into_items(candidates: Vec<Candidate>) -> Vec<WorkItem> {
    // Per item: normalized anchor, headline, and detail accumulation state.
    let mut anchors: Vec<String> = Vec::new();
    let mut items: Vec<WorkItem> = Vec::new();
    let mut detail_keys: Vec<Vec<String>> = Vec::new();

    for cand in candidates {
        let norm = normalize(&cand.subject);
        let slot = anchors
            .iter()
            .position(|anchor| similarity(anchor, &norm) >= RELATED_THRESHOLD);
        let slot = match slot {
            Some(i) => i,
            None => {
                anchors.push(norm);
                items.push(WorkItem {
                    headline: concise(&cand.subject),
                    sub_points: Vec::new(),
                });
                detail_keys.push(Vec::new());
                items.len() - 1
            }
        };
        let item = &mut items[slot];
        let seen = &mut detail_keys[slot];
        if cand.details.is_empty() {
            push_distinct(&mut item.sub_points, seen, cand.subject);
        } else {
            for detail in cand.details {
                push_distinct(&mut item.sub_points, seen, detail);
            }
        }
    }

    // An item describing a single distinct piece of work needs no sub-points.
    for item in &mut items {
        if item.sub_points.len() < 2 {
            item.sub_points.clear();
        }
    }
    items
}

/// Group surviving commits into ordered project sections.
pub fn aggregate(classified: &[ClassifiedCommit], config: &Config) -> Vec<ProjectSection> {
    let all = candidates(classified);

    let mut sections = Vec::new();
    for repo in &config.repos {
        let own: Vec<Candidate> = all
            .iter()
            .filter(|c| c.repo == repo.name)
            .cloned()
            .collect();
        let items = fold_into_items(own);
        if !items.is_empty() {
            sections.push(ProjectSection {
                project_name: repo.name.clone(),
                items,
            });
        }
    }

    let known: Vec<&str> = config.repos.iter().map(|r| r.name.as_str()).collect();
    let other: Vec<Candidate> = all
        .into_iter()
        .filter(|c| !known.contains(&c.repo.as_str()))
        .collect();
    let other_items = fold_into_items(other);
    if !other_items.is_empty() {
        sections.push(ProjectSection {
            project_name: OTHER_SECTION.to_string(),
            items: other_items,
        });
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn commit(repo: &str, subject: &str) -> Commit {
        Commit {
            hash: format!("{:08x}", subject.len() + repo.len()),
            subject: subject.to_string(),
            author_name: "Jane Doe".to_string(),
            author_email: "jane@work.dev".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 1, 7).unwrap(),
            repo: repo.to_string(),
        }
    }

    fn config(names: &[&str]) -> Config {
        let mut cfg = Config::default();
        for name in names {
            cfg.add_repo(name, PathBuf::from(format!("/tmp/{name}")));
        }
        cfg
    }

    #[test]
    fn sections_follow_config_order() {
        let classified = classify(vec![
            commit("beta", "improve sync engine"),
            commit("alpha", "feat: add login api"),
        ]);
        let sections = aggregate(&classified, &config(&["alpha", "beta"]));
        let names: Vec<&str> = sections.iter().map(|s| s.project_name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "beta"]);
    }

    #[test]
    fn unknown_repositories_fall_into_other_last() {
        let classified = classify(vec![
            commit("scratch", "prototype importer"),
            commit("alpha", "feat: add login api"),
        ]);
        let sections = aggregate(&classified, &config(&["alpha"]));
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[1].project_name, OTHER_SECTION);
        assert_eq!(sections[1].items[0].headline, "prototype importer");
    }

    #[test]
    fn trivial_commits_are_dropped_and_empty_sections_omitted() {
        let classified = classify(vec![
            commit("alpha", "fix typo in README"),
            commit("beta", "Merge branch 'main' into feature"),
        ]);
        let sections = aggregate(&classified, &config(&["alpha", "beta"]));
        assert!(sections.is_empty());
    }

    #[test]
    fn near_duplicates_collapse_to_one_headline() {
        let classified = classify(vec![
            commit("alpha", "Add user login."),
            commit("alpha", "add user login"),
        ]);
        let sections = aggregate(&classified, &config(&["alpha"]));
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].items.len(), 1);
        assert_eq!(sections[0].items[0].headline, "Add user login.");
        assert!(sections[0].items[0].sub_points.is_empty());
    }

    #[test]
    fn related_work_folds_into_sub_points() {
        let classified = classify(vec![
            commit("alpha", "feat: rework retry backoff"),
            commit("alpha", "fix: rework retry backoff edge cases"),
        ]);
        let sections = aggregate(&classified, &config(&["alpha"]));
        assert_eq!(sections[0].items.len(), 1);
        let item = &sections[0].items[0];
        assert_eq!(item.headline, "rework retry backoff");
        assert_eq!(
            item.sub_points,
            vec![
                "rework retry backoff".to_string(),
                "rework retry backoff edge cases".to_string()
            ]
        );
    }

    #[test]
    fn unrelated_work_stays_separate() {
        let classified = classify(vec![
            commit("alpha", "feat: add login api"),
            commit("alpha", "migrate storage layer to sqlite"),
        ]);
        let sections = aggregate(&classified, &config(&["alpha"]));
        assert_eq!(sections[0].items.len(), 2);
        assert!(sections[0].items.iter().all(|i| i.sub_points.is_empty()));
    }

    #[test]
    fn long_headlines_are_truncated_with_ellipsis() {
        let long = "refactor the entire configuration subsystem to support layered overrides";
        let classified = classify(vec![commit("alpha", long)]);
        let sections = aggregate(&classified, &config(&["alpha"]));
        let headline = &sections[0].items[0].headline;
        assert!(headline.chars().count() <= MAX_HEADLINE_CHARS);
        assert!(headline.ends_with("..."));
    }

    #[test]
    fn conventional_prefixes_are_stripped() {
        assert_eq!(clean_subject("feat(auth): add login api"), "add login api");
        assert_eq!(clean_subject("fix: 修复缓存失效"), "修复缓存失效");
        assert_eq!(clean_subject("plain subject"), "plain subject");
    }
}
