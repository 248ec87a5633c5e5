//! Markdown rendering of a finished report.
//!
//! Pure function of the report value: no I/O, no clock, no randomness.
//! Rendering the same report twice yields byte-identical text.

use crate::error::{GitweekError, Result};
use crate::model::{ProjectSection, Report, ReportKind, WorkItem, OTHER_SECTION};

/// Serialize `report` into the fixed markdown grammar.
///
/// The supplement, if any, renders as extra items of the trailing
/// "其他" section, creating it when absent. A report with no sections and
/// no supplement yields a header-only document.
pub fn render(report: &Report, kind: ReportKind) -> Result<String> {
    let mut sections = report.sections.clone();
    if let Some(items) = supplement_items(report.supplement.as_deref()) {
        match sections.last_mut() {
            Some(last) if last.project_name == OTHER_SECTION => {
                last.items.extend(items);
            }
            _ => sections.push(ProjectSection {
                project_name: OTHER_SECTION.to_string(),
                items,
            }),
        }
    }
    validate(&sections)?;

    let mut lines = vec![format!("# {} ({})", kind.title(), report.range.label)];
    for section in &sections {
        lines.push(String::new());
        lines.push(section.project_name.clone());
        for item in &section.items {
            lines.push(format!("  - {}", item.headline));
            for sub in &item.sub_points {
                lines.push(format!("    - {sub}"));
            }
        }
    }
    Ok(lines.join("\n") + "\n")
}

fn supplement_items(supplement: Option<&str>) -> Option<Vec<WorkItem>> {
    let items: Vec<WorkItem> = supplement?
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| WorkItem {
            headline: l.to_string(),
            sub_points: Vec::new(),
        })
        .collect();
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

/// Malformed intermediates indicate an upstream bug, not bad user input.
fn validate(sections: &[ProjectSection]) -> Result<()> {
    for section in sections {
        if section.project_name.trim().is_empty() {
            return Err(GitweekError::Render("section with empty name".to_string()));
        }
        if section.items.is_empty() {
            return Err(GitweekError::Render(format!(
                "section '{}' has no items",
                section.project_name
            )));
        }
        for item in &section.items {
            if item.headline.trim().is_empty() {
                return Err(GitweekError::Render(format!(
                    "empty headline in section '{}'",
                    section.project_name
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::daterange;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn sample_report(supplement: Option<&str>) -> Report {
        let range = daterange::current_week(NaiveDate::from_ymd_opt(2025, 1, 8).unwrap());
        Report {
            range,
            sections: vec![
                ProjectSection {
                    project_name: "alpha".to_string(),
                    items: vec![
                        WorkItem {
                            headline: "rework retry backoff".to_string(),
                            sub_points: vec![
                                "rework retry backoff".to_string(),
                                "rework retry backoff edge cases".to_string(),
                            ],
                        },
                        WorkItem {
                            headline: "add login api".to_string(),
                            sub_points: vec![],
                        },
                    ],
                },
                ProjectSection {
                    project_name: "其他".to_string(),
                    items: vec![WorkItem {
                        headline: "prototype importer".to_string(),
                        sub_points: vec![],
                    }],
                },
            ],
            supplement: supplement.map(str::to_string),
        }
    }

    #[test]
    fn renders_the_fixed_grammar() {
        let text = render(&sample_report(None), ReportKind::Weekly).unwrap();
        let expected = "\
# 周报 (2025-01-06 ~ 2025-01-12)

alpha
  - rework retry backoff
    - rework retry backoff
    - rework retry backoff edge cases
  - add login api

其他
  - prototype importer
";
        assert_eq!(text, expected);
    }

    #[test]
    fn period_reports_use_the_period_title() {
        let text = render(&sample_report(None), ReportKind::Period).unwrap();
        assert!(text.starts_with("# 工作总结 (2025-01-06 ~ 2025-01-12)"));
    }

    #[test]
    fn rendering_is_idempotent() {
        let report = sample_report(Some("参加架构评审"));
        let once = render(&report, ReportKind::Weekly).unwrap();
        let twice = render(&report, ReportKind::Weekly).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn supplement_joins_the_existing_other_section() {
        let text = render(&sample_report(Some("参加架构评审")), ReportKind::Weekly).unwrap();
        assert_eq!(text.matches("其他").count(), 1);
        assert!(text.ends_with("其他\n  - prototype importer\n  - 参加架构评审\n"));
    }

    #[test]
    fn supplement_creates_other_when_absent() {
        let range = daterange::current_week(NaiveDate::from_ymd_opt(2025, 1, 8).unwrap());
        let report = Report {
            range,
            sections: vec![],
            supplement: Some("整理季度 OKR\n\n评审新人代码".to_string()),
        };
        let text = render(&report, ReportKind::Weekly).unwrap();
        let expected = "\
# 周报 (2025-01-06 ~ 2025-01-12)

其他
  - 整理季度 OKR
  - 评审新人代码
";
        assert_eq!(text, expected);
    }

    #[test]
    fn empty_report_is_header_only() {
        let range = daterange::current_week(NaiveDate::from_ymd_opt(2025, 1, 8).unwrap());
        let report = Report {
            range,
            sections: vec![],
            supplement: None,
        };
        let text = render(&report, ReportKind::Weekly).unwrap();
        assert_eq!(text, "# 周报 (2025-01-06 ~ 2025-01-12)\n");
    }

    #[test]
    fn malformed_sections_are_render_errors() {
        let mut report = sample_report(None);
        report.sections[0].items.clear();
        let err = render(&report, ReportKind::Weekly).unwrap_err();
        assert!(matches!(err, GitweekError::Render(_)));

        let mut report = sample_report(None);
        report.sections[0].items[0].headline = "  ".to_string();
        assert!(render(&report, ReportKind::Weekly).is_err());
    }
}
