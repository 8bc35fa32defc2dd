use std::env;

use crate::assembler::assemble;
use crate::error::Result;
use crate::models::config::{load_settings, ConfigPaths};
use crate::models::TemplateRegistry;
use crate::scrape::HttpFetcher;
use crate::workspace::{populate, SolutionPolicy};

pub fn train(contest_id: &str, problem_ids: &[String], template: Option<&str>, force: bool) -> Result<()> {
    let paths = ConfigPaths::resolve()?;
    let settings = load_settings(&paths)?;
    let registry = TemplateRegistry::load_or_init(&paths)?;
    let template = registry.resolve(template)?;

    println!("Scraping contest {} from {}...", contest_id, settings.host);
    let fetcher = HttpFetcher::new(&settings)?;
    let contest = assemble(&fetcher, &settings.host, contest_id, problem_ids)?;

    let contest_dir = env::current_dir()?.join(&contest.id);
    let policy = if force {
        SolutionPolicy::Overwrite
    } else {
        SolutionPolicy::KeepExisting
    };
    let session = populate(&contest, template, &contest_dir, &settings.host, policy)?;
    session.save(&paths)?;

    for problem in &contest.problems {
        println!(
            "  {:<4} {} ({} sample tests)",
            problem.id,
            problem.name.trim(),
            problem.tests.len()
        );
    }
    println!();
    println!("To get started:");
    println!();
    println!("  cd {}", contest_dir.display());
    println!("  forces test <problem>");

    Ok(())
}
