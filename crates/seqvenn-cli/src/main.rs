//! seqvenn CLI - Main entry point

use clap::Parser;
use seqvenn_cli::commands::{self, blast::BlastOptions, compare::CompareArgs, Context};
use seqvenn_cli::config::{self, LimitFlags};
use seqvenn_cli::output::determine_format;
use seqvenn_cli::{Cli, Commands};
use seqvenn_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use std::process;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

#[tokio::main]
async fn main() {
    // .env is optional
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let log_config = LogConfig::builder()
        .level(if cli.verbose { LogLevel::Debug } else { LogLevel::Warn })
        .output(LogOutput::Console)
        .log_file_prefix("seqvenn")
        .build();

    // Environment variables take precedence over the flag
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    // The CLI works without logging
    let _ = init_logging(&log_config);

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    if let Err(e) = execute_command(&cli, cancel).await {
        if e.is_cancelled() {
            warn!("Interrupted by user");
        } else {
            error!(error = %e, "Command failed");
        }
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Cancel the active job on Ctrl-C
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });
}

async fn execute_command(cli: &Cli, cancel: CancellationToken) -> seqvenn_cli::Result<()> {
    let flags = LimitFlags {
        max_wait_secs: cli.max_wait,
        max_polls: cli.max_polls,
    };

    let ctx = Context {
        config: config::load(cli.config.as_deref(), flags)?,
        format: determine_format(cli.format.as_deref())?,
        output: cli.output.clone(),
        cancel,
    };

    match &cli.command {
        Commands::Phmmer { fasta, database } => commands::phmmer::run(&ctx, fasta, database).await,

        Commands::Blast {
            program,
            fasta,
            database,
            expect,
            hitlist_size,
            entrez_query,
        } => {
            let options = BlastOptions {
                expect: *expect,
                hitlist_size: *hitlist_size,
                entrez_query: entrez_query.clone(),
            };
            commands::blast::run(&ctx, program, fasta, database, &options).await
        },

        Commands::Map {
            from,
            to,
            ids,
            ids_file,
        } => commands::map::run(&ctx, from, to, ids, ids_file.as_deref()).await,

        Commands::Compare {
            fasta,
            hmmer_database,
            blast_programs,
            blast_database,
            output_dir,
        } => {
            let args = CompareArgs {
                fasta,
                hmmer_database,
                blast_programs,
                blast_database,
                output_dir,
            };
            commands::compare::run(&ctx, args).await
        },
    }
}
