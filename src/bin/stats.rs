use anyhow::Context;
use clap::Parser;
use recipe_etl::utils::{logger, output};
use recipe_etl::{read_samples, Summary};
use std::io::Write;

/// Reads integers from stdin, one per line, and prints their mean, median,
/// mode and spread. Input ends at a blank line or end of stream.
#[derive(Debug, Parser)]
#[command(name = "stats")]
#[command(about = "Summary statistics for integers read from stdin")]
struct Args {
    #[arg(short, long, help = "Enable verbose output")]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let stdin = std::io::stdin();
    let samples = read_samples(stdin.lock());
    tracing::debug!("Read {} numbers: {:?}", samples.values.len(), samples.values);

    if let Some(e) = &samples.halt {
        tracing::warn!("⚠️ Stopped reading input: {}", e);
        output::error(&e.user_friendly_message());
    }

    let mut stdout = std::io::stdout().lock();
    match Summary::from_values(&samples.values) {
        Some(summary) => writeln!(stdout, "{}", summary),
        None => writeln!(stdout, "No data"),
    }
    .context("failed to write summary to stdout")?;

    // 輸入錯誤只是警告；讀取失敗才以非零碼結束
    if let Some(code) = samples.halt.as_ref().map(|e| e.exit_code()).filter(|&c| c > 0) {
        std::process::exit(code);
    }

    Ok(())
}
