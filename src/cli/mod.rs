mod cd;
mod status;
mod template;
mod train;

use clap::{ArgAction, Parser, Subcommand};

use crate::models::Language;

#[derive(Parser)]
#[command(name = "forces")]
#[command(about = "Scrape contest problems into local tests and solution stubs", long_about = None)]
pub struct Cli {
    /// -v for info, -vv for debug logging
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scrape a contest (or some of its problems) into ./<contest>
    Train {
        contest: String,
        problems: Vec<String>,
        /// Template to generate solutions from (defaults to the starter)
        #[arg(short, long)]
        template: Option<String>,
        /// Overwrite solution files that already exist
        #[arg(short, long)]
        force: bool,
    },
    /// Run a solution against its sample tests (defaults to the last edited one)
    Test { problem: Option<String> },
    /// Show the current session
    Status,
    /// Print the current contest directory
    Cd,
    /// Manage solution templates
    Template {
        #[command(subcommand)]
        command: TemplateCommands,
    },
}

#[derive(Subcommand)]
pub enum TemplateCommands {
    List,
    Add {
        name: String,
        path: String,
        #[arg(long, value_enum)]
        lang: Option<Language>,
        #[arg(long)]
        run: Option<String>,
        #[arg(long)]
        build: Option<String>,
    },
    Remove { name: String },
    /// Make a template the default for `forces train`
    Starter { name: String },
}

pub fn run(cli: Cli) {
    let result = match cli.command {
        Commands::Train {
            contest,
            problems,
            template,
            force,
        } => train::train(&contest, &problems, template.as_deref(), force),
        Commands::Test { problem } => test::test_solution(problem.as_deref()),
        Commands::Status => status::show_status(),
        Commands::Cd => cd::print_working_directory(),
        Commands::Template { command } => template::handle_template(command),
    };

    if let Err(e) = result {
        log::debug!("{:?}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
