// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use cran_search::utils::logging::{format_step, format_success, format_warning};
use cran_search::{Config, PipelineOrchestrator, PipelineStats};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "cran_search")]
#[command(version)]
#[command(about = "Batch BM25 retrieval over the Cranfield collection", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from the document collection
    Index,

    /// Answer the query batch against an existing index
    Evaluate(EvaluationArgs),

    /// Index, then evaluate
    Run(EvaluationArgs),
}

#[derive(Args)]
struct EvaluationArgs {
    /// Run file to write, overriding evaluation.run_path
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Results kept per query, overriding evaluation.result_depth
    #[arg(long, value_name = "NUM")]
    depth: Option<usize>,

    /// Concurrent searches, overriding evaluation.parallel_workers
    #[arg(long, value_name = "NUM")]
    workers: Option<usize>,
}

impl EvaluationArgs {
    fn apply(self, config: &mut Config) {
        if let Some(output) = self.output {
            config.evaluation.run_path = output;
        }
        if let Some(depth) = self.depth {
            config.evaluation.result_depth = depth;
        }
        if let Some(workers) = self.workers {
            config.evaluation.parallel_workers = workers;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    cran_search::utils::logging::init_logger(cli.color, cli.verbose);
    colored::control::set_override(cli.color);

    info!("Cranfield batch retrieval");
    info!("Loading configuration from: {}", cli.config.display());

    let config_path = if cli.config.exists() {
        Some(cli.config.as_path())
    } else {
        warn!(
            "Config file {} not found, using built-in defaults and environment",
            cli.config.display()
        );
        None
    };
    let mut config = Config::load(config_path).context("Failed to load configuration")?;

    match cli.command {
        Commands::Index => cmd_index(config, cli.color).await,
        Commands::Evaluate(args) => {
            args.apply(&mut config);
            config.validate().context("Invalid evaluation options")?;
            cmd_evaluate(config, cli.color).await
        }
        Commands::Run(args) => {
            args.apply(&mut config);
            config.validate().context("Invalid evaluation options")?;
            cmd_run(config, cli.color).await
        }
    }
}

async fn cmd_index(config: Config, colored: bool) -> Result<()> {
    let index_path = config.index.path.clone();
    let orchestrator = PipelineOrchestrator::new(config).with_color(colored);

    let stats = orchestrator
        .run_indexing()
        .await
        .context("indexing phase failed")?;

    println!(
        "{}",
        format_success(&format!(
            "Indexed {} documents into {}",
            stats.documents_indexed,
            index_path.display()
        ))
    );
    Ok(())
}

async fn cmd_evaluate(config: Config, colored: bool) -> Result<()> {
    let run_path = config.evaluation.run_path.clone();
    let orchestrator = PipelineOrchestrator::new(config).with_color(colored);

    let stats = orchestrator
        .run_query_batch()
        .await
        .context("query batch phase failed")?;

    print_run_summary(&stats, &run_path);
    Ok(())
}

async fn cmd_run(config: Config, colored: bool) -> Result<()> {
    let run_path = config.evaluation.run_path.clone();
    let orchestrator = PipelineOrchestrator::new(config).with_color(colored);

    println!("{}", format_step(1, 2, "Building index"));
    let indexing = orchestrator
        .run_indexing()
        .await
        .context("indexing phase failed")?;
    println!(
        "{}",
        format_success(&format!("Indexed {} documents", indexing.documents_indexed))
    );

    println!("{}", format_step(2, 2, "Evaluating query batch"));
    let stats = orchestrator
        .run_query_batch()
        .await
        .context("query batch phase failed")?;

    print_run_summary(&stats, &run_path);
    Ok(())
}

fn print_run_summary(stats: &PipelineStats, run_path: &std::path::Path) {
    println!(
        "{}",
        format_success(&format!(
            "Wrote {} result lines for {} queries to {}",
            stats.result_lines,
            stats.queries_evaluated,
            run_path.display()
        ))
    );

    if stats.queries_without_results > 0 {
        println!(
            "{}",
            format_warning(&format!(
                "{} queries returned no results",
                stats.queries_without_results
            ))
        );
    }
}
