use crate::cli::CommonArgs;
use crate::config::{self, Config};
use crate::daterange::{self, DateRange};
use crate::error::{GitweekError, Result};
use crate::git;
use crate::model::{Report, ReportKind};
use crate::store::ReportStore;
use crate::{aggregate, classify, render};
use anyhow::Context;
use chrono::{Local, NaiveDate};
use console::style;
use std::path::PathBuf;

pub fn exec_weekly(
    common: CommonArgs,
    last: bool,
    monday: Option<String>,
    supplement: Vec<String>,
    json: bool,
) -> anyhow::Result<()> {
    let today = Local::now().date_naive();
    let range = match monday {
        Some(monday) => daterange::custom_week(parse_date(&monday)?)?,
        None if last => daterange::last_week(today),
        None => daterange::current_week(today),
    };
    run(common, range, ReportKind::Weekly, supplement, json)
}

pub fn exec_period(
    common: CommonArgs,
    start: Option<String>,
    half_year: bool,
    supplement: Vec<String>,
    json: bool,
) -> anyhow::Result<()> {
    let today = Local::now().date_naive();
    let range = match start {
        Some(start) => daterange::custom_period(parse_date(&start)?, today)?,
        None if half_year => daterange::half_year(today),
        // clap enforces one of the two; keep the invariant visible.
        None => anyhow::bail!("pass --start or --half-year"),
    };
    run(common, range, ReportKind::Period, supplement, json)
}

fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| GitweekError::InvalidDate(format!("expected YYYY-MM-DD, got '{input}'")))
}

/// Resolve the store, config path, and config for a command invocation.
pub(crate) fn load_context(common: &CommonArgs) -> anyhow::Result<(ReportStore, PathBuf, Config)> {
    let store =
        ReportStore::new(common.root.clone()).context("Failed to resolve reports root")?;
    let config_path = common
        .config
        .clone()
        .unwrap_or_else(|| config::config_path(store.root()));
    let config = Config::load(&config_path).context("Failed to load configuration")?;
    Ok((store, config_path, config))
}

fn run(
    common: CommonArgs,
    range: DateRange,
    kind: ReportKind,
    supplement: Vec<String>,
    json: bool,
) -> anyhow::Result<()> {
    let (store, _config_path, config) = load_context(&common)?;
    if config.repos.is_empty() {
        eprintln!(
            "{} no repositories configured, the report will be empty (try `gitweek repos add`)",
            style("warning:").yellow().bold()
        );
    }

    let author = git::resolve_author(&config, common.author.as_deref())
        .context("Failed to resolve author identity")?;
    log::debug!("author pattern: {}", author.describe());

    let outcome = git::collect(&config.repos, &range, &author);
    for warning in &outcome.warnings {
        eprintln!("{} {warning}", style("warning:").yellow().bold());
    }

    let commits: Vec<_> = outcome
        .groups
        .into_iter()
        .flat_map(|group| group.commits)
        .collect();
    let classified = classify::classify(commits);
    let sections = aggregate::aggregate(&classified, &config);
    let supplement = if supplement.is_empty() {
        None
    } else {
        Some(supplement.join("\n"))
    };
    let report = Report {
        range,
        sections,
        supplement,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render::render(&report, kind)?);
    }

    let path = store.store(&report, kind).context("Failed to store report")?;
    eprintln!("{} {}", style("Saved").green().bold(), path.display());
    Ok(())
}
