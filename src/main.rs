use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use funasr_client::FunasrClient;
use funasr_client::cli::{Cli, Commands, ConfigAction};
use funasr_client::config::Config;
use funasr_client::diagnostics::check_dependencies;
use funasr_client::output::{print_transcript, write_json};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        None => transcribe(&cli).await,
        Some(Commands::Check) => {
            let (config, source) = load_config(cli.config.as_deref())?;
            check_dependencies(&config, source.as_deref());
            Ok(())
        }
        Some(Commands::Config { action }) => handle_config_command(action, &cli),
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(
                *shell,
                &mut Cli::command(),
                "funasr-client",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}

/// Stream the audio file and print the transcript.
async fn transcribe(cli: &Cli) -> Result<()> {
    let Some(audio_file) = cli.audio_file.as_deref() else {
        Cli::command()
            .error(
                clap::error::ErrorKind::MissingRequiredArgument,
                "--audio-file is required",
            )
            .exit();
    };

    let (config, _) = load_config(cli.config.as_deref())?;
    let session = cli.session(config)?;
    let client = FunasrClient::new(session);

    let result = client
        .transcribe_file(audio_file)
        .await
        .with_context(|| format!("transcribing {}", audio_file.display()))?;

    print_transcript(&result.text)?;

    if let Some(path) = &cli.output {
        write_json(path, &result)
            .with_context(|| format!("writing results to {}", path.display()))?;
        println!("Results saved to: {}", path.display());
    }

    Ok(())
}

fn handle_config_command(action: &ConfigAction, cli: &Cli) -> Result<()> {
    match action {
        ConfigAction::Dump => {
            let (mut config, _) = load_config(cli.config.as_deref())?;
            cli.apply_to(&mut config);
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Path => match cli.config.clone().or_else(Config::default_path) {
            Some(path) => println!("{}", path.display()),
            None => anyhow::bail!("could not determine the configuration directory"),
        },
    }
    Ok(())
}

/// Load the configuration file and apply environment overrides.
///
/// An explicit `--config` path must exist; the default path may be missing.
/// Returns the config together with the file it was read from.
fn load_config(custom_path: Option<&Path>) -> Result<(Config, Option<PathBuf>)> {
    let (config, source) = match custom_path {
        Some(path) => (Config::load(path)?, Some(path.to_path_buf())),
        None => match Config::default_path() {
            Some(path) => (Config::load_or_default(&path)?, Some(path)),
            None => (Config::default(), None),
        },
    };

    Ok((config.with_env_overrides(), source))
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `-q` shows errors only, the default
/// shows warnings, `-v` adds session progress and `-vv` per-chunk details.
fn init_tracing(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install tracing subscriber: {err}");
    }
}
