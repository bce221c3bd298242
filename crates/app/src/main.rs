use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use ring_sequencer_core::{AppConfig, Script, Sequence};
use tracing_subscriber::EnvFilter;

mod demo;

fn main() -> ring_sequencer_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Compile {
            script,
            output,
            strict,
        } => run_compile(&config, &script, output.as_deref(), strict),
        Commands::Inspect { script } => run_inspect(&config, &script),
        Commands::Demo { output } => run_demo(&config, output.as_deref()),
    }
}

fn run_compile(
    config: &AppConfig,
    script: &Path,
    output: Option<&Path>,
    strict: bool,
) -> ring_sequencer_core::Result<()> {
    tracing::info!(?script, strict, "compiling script");

    let animation = Script::from_path(script)?.compile(&config.stage)?;
    let sequence = animation.sequence();
    if strict {
        config.stage.validate(&sequence)?;
    }
    write_sequence(config, &sequence, output)
}

fn run_inspect(config: &AppConfig, script: &Path) -> ring_sequencer_core::Result<()> {
    let animation = Script::from_path(script)?.compile(&config.stage)?;
    tracing::info!(
        name = animation.name(),
        bpm = animation.bpm(),
        duration_seconds = animation.total_duration_seconds(),
        start_offset_seconds = animation.start_offset_seconds(),
        recorded = animation.recorded().len(),
        "animation"
    );

    for (id, element) in animation.sequence().iter() {
        let kinds: Vec<&str> = element.effects.iter().map(|e| e.kind.name()).collect();
        tracing::info!(
            element = %id,
            effects = element.effects.len(),
            duration_ms = element.duration_ms,
            kinds = ?kinds,
            "element"
        );
    }
    Ok(())
}

fn run_demo(config: &AppConfig, output: Option<&Path>) -> ring_sequencer_core::Result<()> {
    tracing::info!("building demo animation");
    let animation = demo::sandstorm()?;
    let sequence = animation.sequence();
    config.stage.validate(&sequence)?;
    write_sequence(config, &sequence, output)
}

fn write_sequence(
    config: &AppConfig,
    sequence: &Sequence,
    output: Option<&Path>,
) -> ring_sequencer_core::Result<()> {
    let json = sequence.to_json(config.output.pretty)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            tracing::info!(?path, elements = sequence.len(), "wrote sequence");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> ring_sequencer_core::Result<AppConfig> {
    match path {
        Some(path) => {
            tracing::debug!(?path, "loading configuration");
            AppConfig::from_path(path)
        }
        None => Ok(AppConfig::default()),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Compile beat-synchronized LED ring animations", long_about = None)]
struct Cli {
    /// Optional JSON configuration describing the stage and output format.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile an animation script into a per-ring sequence.
    Compile {
        /// Path to the JSON animation script.
        script: PathBuf,
        /// Where to write the sequence. Printed to stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Reject rings and segments the stage does not define.
        #[arg(long)]
        strict: bool,
    },
    /// Compile a script and log a summary of every ring's effects.
    Inspect {
        /// Path to the JSON animation script.
        script: PathBuf,
    },
    /// Emit the sequence of the built-in demo animation.
    Demo {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
