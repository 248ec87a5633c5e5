use crate::cli::{CommonArgs, RepoAction};
use crate::config;
use crate::report::load_context;
use anyhow::Context;
use console::style;

pub fn exec(common: CommonArgs, action: RepoAction) -> anyhow::Result<()> {
    let (_store, config_path, mut config) = load_context(&common)?;
    match action {
        RepoAction::Add { name, path } => {
            config::validate_repo_path(&name, &path).context("Refusing to add repository")?;
            let replaced = config.add_repo(&name, path.clone());
            config.save(&config_path).context("Failed to save configuration")?;
            let verb = if replaced { "Updated" } else { "Added" };
            println!("{} {} -> {}", style(verb).green().bold(), name, path.display());
        }
        RepoAction::Remove { name } => {
            if !config.remove_repo(&name) {
                anyhow::bail!("no repository named '{name}'");
            }
            config.save(&config_path).context("Failed to save configuration")?;
            println!("{} {}", style("Removed").green().bold(), name);
        }
        RepoAction::List => {
            if config.repos.is_empty() {
                println!("No repositories configured.");
            }
            for repo in &config.repos {
                println!("{:<24} {}", repo.name, style(repo.path.display()).dim());
            }
        }
    }
    Ok(())
}

pub fn exec_list(common: CommonArgs, periods: bool) -> anyhow::Result<()> {
    let (store, _config_path, _config) = load_context(&common)?;
    let reports = if periods {
        store.list_periods()?
    } else {
        store.list_weekly()?
    };
    if reports.is_empty() {
        println!("No stored reports.");
        return Ok(());
    }
    for report in &reports {
        println!("{:<24} {}", report.label, style(report.path.display()).dim());
    }
    Ok(())
}
