use crate::daterange::DateRange;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Section name for work that cannot be attributed to a configured
/// repository, and for free-text supplements. Always rendered last.
pub const OTHER_SECTION: &str = "其他";

/// One commit as retrieved from a repository's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    pub hash: String,
    pub subject: String,
    pub author_name: String,
    pub author_email: String,
    pub date: NaiveDate,
    /// Configured name of the repository the commit came from.
    pub repo: String,
}

/// A commit after trivial/substantive classification.
#[derive(Debug, Clone)]
pub struct ClassifiedCommit {
    pub commit: Commit,
    /// Reason from the matched trivial rule; `None` means substantive.
    pub trivial: Option<&'static str>,
    /// Identifier shared by near-duplicate commits; `None` when the commit
    /// has no near-duplicates.
    pub dedup_group: Option<usize>,
}

impl ClassifiedCommit {
    pub fn is_trivial(&self) -> bool {
        self.trivial.is_some()
    }
}

/// One reported unit of work: a concise headline with optional detail lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    pub headline: String,
    pub sub_points: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSection {
    pub project_name: String,
    pub items: Vec<WorkItem>,
}

/// The finished report, ready for rendering and persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub range: DateRange,
    pub sections: Vec<ProjectSection>,
    pub supplement: Option<String>,
}

/// Selects the report title and the storage path template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportKind {
    Weekly,
    Period,
}

impl ReportKind {
    pub fn title(self) -> &'static str {
        match self {
            ReportKind::Weekly => "周报",
            ReportKind::Period => "工作总结",
        }
    }
}
