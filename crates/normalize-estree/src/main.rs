use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use normalize_estree::{ConvertOptions, EcmaTarget, SourceType, check_and_convert, diff};

#[derive(Parser, Debug)]
#[command(name = "normalize-estree", version, about = "Convert TypeScript to an ESTree JSON tree")]
struct Cli {
    /// Source file, or `-` for stdin
    input: PathBuf,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pretty: bool,

    /// Mark the program as a script instead of a module
    #[arg(long)]
    script: bool,

    /// Language version the source targets
    #[arg(long, value_enum)]
    target: Option<EcmaTarget>,

    /// TOML file with conversion options
    #[arg(long)]
    config: Option<PathBuf>,

    /// Compare against a reference ESTree JSON file instead of printing
    #[arg(long, value_name = "JSON")]
    compare: Option<PathBuf>,
}

fn main() -> ExitCode {
    init_tracing();
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut options = match &cli.config {
        Some(path) => load_options(path)?,
        None => ConvertOptions::default(),
    };
    if cli.input != Path::new("-") {
        options.file_name = cli.input.display().to_string();
    }
    if cli.script {
        options.source_type = SourceType::Script;
    }
    if let Some(target) = cli.target {
        options.target = target;
    }

    let source = read_source(&cli.input)?;
    let program = check_and_convert(&source, &options)?;

    if let Some(reference) = &cli.compare {
        let text = std::fs::read_to_string(reference)
            .with_context(|| format!("failed to read {}", reference.display()))?;
        let expected: serde_json::Value = serde_json::from_str(&text)
            .with_context(|| format!("invalid JSON in {}", reference.display()))?;
        let actual = serde_json::to_value(&program)?;
        let differences = diff(&expected, &actual);
        if differences.is_empty() {
            return Ok(ExitCode::SUCCESS);
        }
        for difference in &differences {
            println!("{}", difference);
        }
        return Ok(ExitCode::FAILURE);
    }

    let json = if cli.pretty {
        serde_json::to_string_pretty(&program)?
    } else {
        serde_json::to_string(&program)?
    };
    println!("{}", json);
    Ok(ExitCode::SUCCESS)
}

fn load_options(path: &Path) -> anyhow::Result<ConvertOptions> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn read_source(input: &Path) -> anyhow::Result<String> {
    if input == Path::new("-") {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("failed to read stdin")?;
        return Ok(source);
    }
    std::fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))
}

/// Log to stderr, only when `NORMALIZE_LOG` or `RUST_LOG` is set.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let Some(directives) = std::env::var("NORMALIZE_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok()
    else {
        return;
    };
    let filter = EnvFilter::builder().parse_lossy(directives);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
