mod cards;
mod config;
mod errors;
mod fonts;
mod layout;
mod render;

use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cards::{parse_export_file, ParseStats};
use crate::config::{Command, Config, USAGE};
use crate::errors::AppError;
use crate::fonts::setup_fonts;
use crate::layout::LayoutSettings;
use crate::render::create_pdf;

fn main() -> Result<ExitCode> {
    let config = match Config::from_args(std::env::args().skip(1)) {
        Ok(Command::Run(config)) => config,
        Ok(Command::Help) => {
            println!("{USAGE}");
            return Ok(ExitCode::SUCCESS);
        }
        Err(e) => {
            eprintln!("{e}\n\n{USAGE}");
            return Ok(ExitCode::from(2));
        }
    };

    // Logs go to stderr; stdout carries only the run summary lines.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    run(&config)?;
    Ok(ExitCode::SUCCESS)
}

fn run(config: &Config) -> Result<()> {
    if !config.input.exists() {
        return Err(AppError::InputNotFound(config.input.clone()).into());
    }

    let book = setup_fonts(&config.fonts);

    let (cards, stats) = parse_export_file(&config.input, book.config().symbols.as_ref())
        .with_context(|| format!("Failed to read {}", config.input.display()))?;
    log_stats(&stats);
    println!("Found {} cards.", cards.len());
    if cards.is_empty() {
        warn!("No cards in export; the PDF will have no pages");
    }

    let settings = LayoutSettings::default();
    create_pdf(&cards, &config.output, &book, &settings)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;
    println!("PDF created: {}", config.output.display());
    Ok(())
}

fn log_stats(stats: &ParseStats) {
    info!(
        cards = stats.cards,
        comments = stats.comments,
        malformed = stats.malformed,
        "Export parsed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FontPaths;

    fn config(input: std::path::PathBuf, output: std::path::PathBuf) -> Config {
        Config {
            input,
            output,
            fonts: FontPaths::from_env(),
            rust_log: "info".to_string(),
        }
    }

    #[test]
    fn test_missing_input_stops_before_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("cards.pdf");
        let err = run(&config(dir.path().join("missing.txt"), output.clone())).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::InputNotFound(_))
        ));
        assert!(!output.exists());
    }

    #[test]
    fn test_run_writes_pdf_for_export() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("deck.txt");
        let output = dir.path().join("cards.pdf");
        std::fs::write(
            &input,
            "#separator:tab\ng1\tBasic\tLang::Verbs\tgehen\tto go\ng2\tBasic\tLang::Nouns\tder Hund\tthe dog\n",
        )
        .unwrap();

        run(&config(input, output.clone())).unwrap();
        let bytes = std::fs::read(&output).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }
}
