use std::path::PathBuf;

use crate::errors::AppError;

const NOTO_DIR: &str = "/usr/share/fonts/truetype/noto";

pub const USAGE: &str = "Usage: anki2pdf <input> <output>\n\n\
    Convert an Anki plain-text export to a double-sided flashcard PDF.\n\n\
    Arguments:\n  \
    <input>   Path to Anki export text file\n  \
    <output>  Path to output PDF file";

/// Paths of the optional external fonts. Any missing file switches the run to
/// the built-in Helvetica family.
#[derive(Debug, Clone, PartialEq)]
pub struct FontPaths {
    pub regular: PathBuf,
    pub bold: PathBuf,
    pub symbols: PathBuf,
    pub symbols2: PathBuf,
}

impl FontPaths {
    pub fn from_env() -> Self {
        FontPaths {
            regular: env_path("ANKI2PDF_FONT_REGULAR", "NotoSans-Regular.ttf"),
            bold: env_path("ANKI2PDF_FONT_BOLD", "NotoSans-Bold.ttf"),
            symbols: env_path("ANKI2PDF_FONT_SYMBOLS", "NotoSansSymbols-Regular.ttf"),
            symbols2: env_path("ANKI2PDF_FONT_SYMBOLS2", "NotoSansSymbols2-Regular.ttf"),
        }
    }
}

/// Outcome of command-line parsing.
#[derive(Debug)]
pub enum Command {
    Run(Config),
    Help,
}

/// Run configuration: positional paths from the command line, everything
/// else from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub fonts: FontPaths,
    pub rust_log: String,
}

impl Config {
    /// Parses the arguments following the program name.
    pub fn from_args<I>(args: I) -> Result<Command, AppError>
    where
        I: IntoIterator<Item = String>,
    {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let args: Vec<String> = args.into_iter().collect();
        if args.iter().any(|a| a == "-h" || a == "--help") {
            return Ok(Command::Help);
        }

        match args.as_slice() {
            [input, output] => Ok(Command::Run(Config {
                input: PathBuf::from(input),
                output: PathBuf::from(output),
                fonts: FontPaths::from_env(),
                rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            })),
            _ => Err(AppError::InvalidArgs(format!(
                "expected 2 positional arguments, got {}",
                args.len()
            ))),
        }
    }
}

fn env_path(key: &str, file_name: &str) -> PathBuf {
    std::env::var(key)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(NOTO_DIR).join(file_name))
}
