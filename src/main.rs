use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use gitgrade::config::{Config, ModelProvider};
use gitgrade::{github, logging, report, AnalysisOutcome, Pipeline, Session};
use log::info;
use std::path::PathBuf;
use std::process;

mod cli;
use cli::Command;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Repository to analyze directly (skip interactive mode)
    #[arg(short, long)]
    url: Option<String>,

    /// Print the result as JSON instead of a report
    #[arg(long)]
    json: bool,

    /// Configuration file (defaults to <config dir>/gitgrade/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Model backend: gemini or openai
    #[arg(short, long)]
    provider: Option<String>,

    /// Model name override
    #[arg(short, long)]
    model: Option<String>,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        cli::print_error(&format!("{:#}", e));
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    logging::init(&cli.log_level)?;
    let config = load_config(&cli)?;

    match &cli.url {
        Some(url) => analyze_once(&config, url, cli.json).await,
        None => run_interactive(&config).await,
    }
}

/// File settings first, then command line, then environment keys
fn load_config(cli: &Cli) -> Result<Config> {
    let path = cli.config.clone().or_else(Config::default_path);
    let mut config = match path {
        Some(path) if path.exists() => Config::from_file(&path)?,
        Some(path) if cli.config.is_some() => {
            anyhow::bail!("Config file not found: {}", path.display())
        }
        _ => Config::default(),
    };

    if let Some(provider) = &cli.provider {
        config.set_provider(provider.parse::<ModelProvider>()?);
    }
    if let Some(model) = &cli.model {
        config.model.model = Some(model.clone());
    }
    Ok(config.apply_env())
}

async fn analyze_once(config: &Config, url: &str, json: bool) -> Result<()> {
    // Reject bad input before asking for credentials
    github::resolve(url)?;
    let pipeline = Pipeline::from_config(config).context("Failed to configure the analyzer")?;

    let pb = cli::spinner(format!("Analyzing {}", url.trim()));
    let result = pipeline.run(url).await;
    pb.finish_and_clear();

    let outcome = result.map_err(|e| anyhow::anyhow!(e.user_message()))?;
    print_outcome(&outcome, json)?;
    Ok(())
}

async fn run_interactive(config: &Config) -> Result<()> {
    let pipeline = Pipeline::from_config(config).context("Failed to configure the analyzer")?;
    let session = Session::new();
    info!("Using model {} ({})", config.model_name(), config.model.provider);

    cli::print_banner();
    cli::print_examples();

    loop {
        let line = cli::prompt_input()?;
        let Some(command) = Command::parse(&line) else {
            continue;
        };

        match command {
            Command::Quit => {
                println!("{}", "Thanks for using GitGrade!".bright_green());
                break;
            }
            Command::Help => cli::print_help(),
            Command::Examples => cli::print_examples(),
            Command::Reset => {
                session.reset().await;
                println!("{}", "Analyze another repository.".bright_cyan());
            }
            Command::Analyze(input) => {
                let pb = cli::spinner(format!("Analyzing {}", input));
                let state = session.submit(&pipeline, &input).await;
                pb.finish_and_clear();

                if let Some(outcome) = &state.result {
                    print_outcome(outcome, false)?;
                    println!(
                        "{}",
                        "Enter another repository, 'new' to start over or 'q' to quit.".bright_cyan()
                    );
                } else if let Some(error) = &state.error {
                    cli::print_error(error);
                    println!("{}", "Try 'examples' to see valid inputs.".bright_cyan());
                }
            }
        }
    }

    Ok(())
}

fn print_outcome(outcome: &AnalysisOutcome, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
    } else {
        print!("{}", report::render(&outcome.metadata, &outcome.analysis));
    }
    Ok(())
}
