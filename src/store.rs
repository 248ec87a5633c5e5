use crate::daterange::DateRange;
use crate::error::{GitweekError, Result};
use crate::model::{Report, ReportKind};
use crate::render;
use chrono::{Datelike, NaiveDate};
use log::debug;
use std::path::{Path, PathBuf};

/// Persists rendered reports under a fixed root directory.
///
/// The root is resolved once at process start (`--root` or `~/.gitweek`)
/// and never re-derived during a run.
pub struct ReportStore {
    root: PathBuf,
}

/// One stored report found on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredReport {
    pub label: String,
    pub path: PathBuf,
}

impl ReportStore {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let root = match root {
            Some(path) => path,
            None => dirs::home_dir()
                .map(|home| home.join(".gitweek"))
                .ok_or_else(|| {
                    GitweekError::Storage("cannot determine home directory".to_string())
                })?,
        };
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `{root}/{iso-year}/week-{week:02}.md`, from the range's start date.
    pub fn weekly_path(&self, range: &DateRange) -> PathBuf {
        let week = range.start.iso_week();
        self.root
            .join(week.year().to_string())
            .join(format!("week-{:02}.md", week.week()))
    }

    /// `{root}/periods/{start}_to_{end}.md`.
    pub fn period_path(&self, range: &DateRange) -> PathBuf {
        self.root
            .join("periods")
            .join(format!("{}_to_{}.md", range.start, range.end))
    }

    /// Render and write `report`, replacing any previous report for the
    /// same period in full. Last-writer-wins keeps re-runs idempotent.
    pub fn store(&self, report: &Report, kind: ReportKind) -> Result<PathBuf> {
        let text = render::render(report, kind)?;
        let path = match kind {
            ReportKind::Weekly => self.weekly_path(&report.range),
            ReportKind::Period => self.period_path(&report.range),
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                GitweekError::Storage(format!("cannot create {}: {e}", parent.display()))
            })?;
        }
        std::fs::write(&path, text)
            .map_err(|e| GitweekError::Storage(format!("cannot write {}: {e}", path.display())))?;
        debug!("stored report at {}", path.display());
        Ok(path)
    }

    /// Stored weekly reports, newest first.
    pub fn list_weekly(&self) -> Result<Vec<StoredReport>> {
        let mut found: Vec<(i32, u32, PathBuf)> = Vec::new();
        for year_entry in read_dir_or_empty(&self.root)? {
            let year_path = year_entry.path();
            let Some(year) = year_entry
                .file_name()
                .to_str()
                .and_then(|n| n.parse::<i32>().ok())
            else {
                continue;
            };
            if !year_path.is_dir() {
                continue;
            }
            for entry in read_dir_or_empty(&year_path)? {
                let name = entry.file_name();
                let Some(week) = name
                    .to_str()
                    .and_then(|n| n.strip_prefix("week-"))
                    .and_then(|n| n.strip_suffix(".md"))
                    .and_then(|n| n.parse::<u32>().ok())
                else {
                    continue;
                };
                found.push((year, week, entry.path()));
            }
        }
        found.sort_by(|a, b| (b.0, b.1).cmp(&(a.0, a.1)));
        Ok(found
            .into_iter()
            .map(|(year, week, path)| StoredReport {
                label: format!("{year} week {week:02}"),
                path,
            })
            .collect())
    }

    /// Stored period reports, newest first by start date.
    pub fn list_periods(&self) -> Result<Vec<StoredReport>> {
        let mut found: Vec<(NaiveDate, NaiveDate, PathBuf)> = Vec::new();
        for entry in read_dir_or_empty(&self.root.join("periods"))? {
            let name = entry.file_name();
            let Some(stem) = name.to_str().and_then(|n| n.strip_suffix(".md")) else {
                continue;
            };
            let Some((start, end)) = stem.split_once("_to_") else {
                continue;
            };
            let (Ok(start), Ok(end)) = (
                NaiveDate::parse_from_str(start, "%Y-%m-%d"),
                NaiveDate::parse_from_str(end, "%Y-%m-%d"),
            ) else {
                continue;
            };
            found.push((start, end, entry.path()));
        }
        found.sort_by(|a, b| (b.0, b.1).cmp(&(a.0, a.1)));
        Ok(found
            .into_iter()
            .map(|(start, end, path)| StoredReport {
                label: format!("{start} ~ {end}"),
                path,
            })
            .collect())
    }
}

fn read_dir_or_empty(path: &Path) -> Result<Vec<std::fs::DirEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut entries: Vec<std::fs::DirEntry> = std::fs::read_dir(path)?
        .collect::<std::io::Result<_>>()?;
    entries.sort_by_key(|e| e.file_name());
    Ok(entries)
}
