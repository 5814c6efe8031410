use anyhow::{anyhow, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

use quality_checker::cli_args::Cli;
use quality_checker::config::Config;
use quality_checker::{logging, score, setup};

fn progress_bar(cli: &Cli) -> ProgressBar {
    if cli.no_progress {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(100);
    match ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos:>3}%") {
        Ok(style) => bar.set_style(style.progress_chars("=> ")),
        Err(e) => log::debug!("Falling back to default progress style: {e}"),
    }
    bar.set_message(cli.size.label());
    bar
}

/// Cancel `token` when the user presses Ctrl-C.
fn cancel_on_interrupt(token: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                log::warn!("Interrupt received, cancelling review");
                token.cancel();
            }
            Err(e) => log::debug!("Failed to listen for ctrl+c signal: {e}"),
        }
    });
}

async fn run(cli: &Cli) -> Result<()> {
    let cfg = Config::from_sources(cli)?;
    let service = setup::build_repository_service(&cfg)?;

    let (kind, repo, sha) = cli.command.target();
    log::info!(
        "Reviewing {} {sha} in {repo} with {} ({})",
        kind.as_str(),
        cfg.provider.as_str(),
        cli.size.as_str()
    );

    let bar = progress_bar(cli);
    let on_progress: &(dyn Fn(u8) + Sync) = &|value| bar.set_position(u64::from(value));
    let cancel = CancellationToken::new();
    cancel_on_interrupt(cancel.clone());

    let outcome = service
        .analyze(
            kind,
            &repo.owner,
            &repo.name,
            sha,
            cli.size,
            Some(on_progress),
            &cancel,
        )
        .await;
    bar.finish_and_clear();
    let report = outcome?;

    println!("{report}");

    if let Some(min) = cli.min_score {
        match score::quality_score(&report) {
            Some(value) if value >= min => log::info!("Quality score {value} meets minimum {min}"),
            Some(value) => return Err(anyhow!("Quality score {value} is below the required minimum {min}")),
            None => return Err(anyhow!("The report does not contain a quality score")),
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // The top-level message is the user-facing one; causes were already logged.
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
