mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Reports go to stdout, logs to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Ingest { records, out } => commands::ingest::run(&records, &out),
        Commands::Model {
            dir,
            prefix,
            mode,
            documents,
            smoothing,
        } => commands::model::run(&dir, &prefix, mode, documents, smoothing, config),
        Commands::Train {
            corpus,
            prefix,
            smoothing,
        } => commands::classify::run_train(&corpus, &prefix, smoothing, config),
        Commands::Evaluate {
            corpus,
            prefix,
            json,
        } => commands::classify::run_evaluate(&corpus, &prefix, json, config),
        Commands::CrossValidate {
            corpus,
            smoothing,
            json,
        } => commands::classify::run_cross_validate(&corpus, smoothing, json, config),
        Commands::Rank {
            query,
            collection,
            models,
            weight,
            cutoff,
            output,
        } => commands::rank::run(
            &query,
            &collection,
            &models,
            weight,
            cutoff,
            output.as_deref(),
            config,
        ),
        Commands::Summarize {
            report,
            model,
            origin,
            collection,
        } => commands::summarize::run(
            report.as_deref(),
            model.as_deref(),
            origin.as_deref(),
            collection.as_deref(),
        ),
    }
}
