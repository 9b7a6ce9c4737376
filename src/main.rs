//! HighScore CLI
//!
//! Main entry point for the `hsc` command.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result, WrapErr};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use highscore::config::Config;
use highscore::{Interpreter, SourceFile, blocks, parse_expression};

#[derive(Parser)]
#[command(name = "hsc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "The HighScore music scripting language", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a HighScore script
    Run {
        /// Script file; `.hsc` is appended when missing
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output folder for renders and the output log
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Playback tempo in quarter notes per minute
        #[arg(long, value_name = "BPM")]
        tempo: Option<u32>,

        /// Sound font used to synthesize audio next to each MIDI file
        #[arg(long, value_name = "PATH")]
        soundfont: Option<PathBuf>,

        /// Configuration file (defaults to ./highscore.toml when present)
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Print the block structure of a script as JSON
    Blocks {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Evaluate a single expression
    Eval {
        #[arg(value_name = "EXPR")]
        expression: String,
    },

    /// Start the interactive REPL
    Repl,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    match cli.command {
        Commands::Run {
            input,
            output,
            tempo,
            soundfont,
            config,
        } => run(&input, output, tempo, soundfont, config.as_deref()),
        Commands::Blocks { input } => dump_blocks(&input),
        Commands::Eval { expression } => eval(&expression),
        Commands::Repl => highscore::repl::run_repl(),
    }
}

/// `song` and `song.hsc` both name `song.hsc`
fn script_path(input: &Path) -> PathBuf {
    if input.extension().is_some_and(|e| e == "hsc") {
        return input.to_path_buf();
    }
    let mut name = OsString::from(input.as_os_str());
    name.push(".hsc");
    PathBuf::from(name)
}

fn read_script(input: &Path) -> Result<SourceFile> {
    let path = script_path(input);
    let content = fs::read_to_string(&path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
    Ok(SourceFile::new(path.display().to_string(), content))
}

fn prepare_output_dir(dir: Option<PathBuf>) -> Result<PathBuf> {
    let dir = match dir {
        Some(dir) => dir,
        None => {
            let generated = PathBuf::from((rand::random::<u64>() % 10_000_000_000).to_string());
            warn!(
                "No output folder provided. Reverting to randomly-generated ./{}/",
                generated.display()
            );
            generated
        }
    };

    if dir.is_dir() {
        let occupied = fs::read_dir(&dir).into_diagnostic()?.next().is_some();
        if occupied {
            warn!(
                "The output folder ./{}/ is not empty. Resulting files will be overwritten.",
                dir.display()
            );
        }
    } else {
        fs::create_dir_all(&dir)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to create {}", dir.display()))?;
    }
    Ok(dir)
}

fn run(
    input: &Path,
    output: Option<PathBuf>,
    tempo: Option<u32>,
    soundfont: Option<PathBuf>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = Config::load(config_path)?;
    if let Some(tempo) = tempo {
        config.tempo = tempo;
    }
    if soundfont.is_some() {
        config.synth.soundfont = soundfont;
    }

    let file = read_script(input)?;
    let dir = prepare_output_dir(output.or_else(|| config.output_dir.clone()))?;
    info!(script = %file.name, output = %dir.display(), "running");

    let mut interpreter = Interpreter::with_renderer(config.exporter()?)?.with_output_dir(&dir);
    let log = interpreter
        .run(&file.content)
        .map_err(|e| file.report(e))?
        .iter()
        .enumerate()
        .map(|(i, entry)| format!("\t[{}]: {entry}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    let log_path = dir.join("log.txt");
    fs::write(&log_path, &log)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to write {}", log_path.display()))?;

    info!("completed successfully");
    println!("{log}");
    Ok(())
}

fn dump_blocks(input: &Path) -> Result<()> {
    let file = read_script(input)?;
    let forest = blocks::structure(&file.content);
    println!("{}", serde_json::to_string_pretty(&forest).into_diagnostic()?);
    Ok(())
}

fn eval(expression: &str) -> Result<()> {
    let file = SourceFile::new("<expression>", expression);
    let value = parse_expression(expression).map_err(|e| file.report(e.at_line(1)))?;
    println!("{}", value.identity());
    Ok(())
}
