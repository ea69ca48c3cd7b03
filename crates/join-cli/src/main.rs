mod cli;
mod context;
mod handlers;
mod output;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Commands};
use context::CliContext;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Ok(log_path) = std::env::var("JOINBOARD_DEBUG_LOG") {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .init();
    }

    let cli = Cli::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = Cli::command();
        generate(*shell, &mut cmd, "joinboard", &mut std::io::stdout());
        return Ok(());
    }

    let file_path = match cli.file {
        Some(file) => file,
        None => join_core::AppConfig::load().data_file.ok_or_else(|| {
            anyhow::anyhow!(
                "a board file is required: pass FILE, set JOINBOARD_FILE, or configure data_file"
            )
        })?,
    };

    let mut ctx = CliContext::load(&file_path).await?;

    match cli.command {
        Commands::Task(task_cmd) => {
            handlers::task::handle(&mut ctx, task_cmd.action).await?;
        }
        Commands::Contact(contact_cmd) => {
            handlers::contact::handle(&ctx, contact_cmd.action).await?;
        }
        Commands::Summary => {
            handlers::summary::handle(&ctx)?;
        }
        Commands::Completions { .. } => unreachable!(),
    }

    Ok(())
}
