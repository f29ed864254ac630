//! lint-layers CLI
//!
//! Entry point for the `lint-layers` command-line tool.

use clap::{Args, Parser, Subcommand};
use lint_layers::config::{load_file, BundleRegistry, ConfigError, LoadedConfig, Preset};
use lint_layers::explain::{effective_to_human, ExplainOutput};
use lint_layers::logging::init_tracing;
use std::env;
use std::path::{Path, PathBuf};
use std::process;

/// Config file used when neither --preset nor --config is given
const DEFAULT_CONFIG: &str = "lint-layers.json";

#[derive(Parser)]
#[command(name = "lint-layers")]
#[command(about = "Resolve layered lint configuration per file", version)]
struct Cli {
    /// Log level, overridden by RUST_LOG
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Built-in configuration set (backend, frontend)
    #[arg(long, short = 'p', conflicts_with = "config")]
    preset: Option<Preset>,

    /// Path to config file (default: lint-layers.json)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Directory of bundle definitions (*.json)
    #[arg(long, short = 'b')]
    bundles: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective config for a file
    Resolve {
        #[command(flatten)]
        source: SourceArgs,

        /// Output in human-readable format instead of JSON
        #[arg(long)]
        human: bool,

        /// File to resolve
        path: PathBuf,
    },

    /// Show which layers apply to a file and what they fold into
    Explain {
        #[command(flatten)]
        source: SourceArgs,

        /// Output in human-readable format instead of JSON
        #[arg(long)]
        human: bool,

        /// File to explain
        path: PathBuf,
    },

    /// Load and compile a configuration set without resolving anything
    Verify {
        #[command(flatten)]
        source: SourceArgs,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Resolve {
            source,
            human,
            path,
        } => run_resolve(&source, human, &path),
        Commands::Explain {
            source,
            human,
            path,
        } => run_explain(&source, human, &path),
        Commands::Verify { source } => run_verify(&source),
    }
}

fn run_resolve(source: &SourceArgs, human: bool, path: &Path) {
    let loaded = load_or_exit(source);
    let target = absolute(path);

    let effective = match loaded.set.resolve(&target) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    if human {
        println!("{}", effective_to_human(&effective));
    } else {
        print_json(effective.to_json());
    }
}

fn run_explain(source: &SourceArgs, human: bool, path: &Path) {
    let loaded = load_or_exit(source);
    let target = absolute(path);

    let explanation = match ExplainOutput::build(&loaded.set, &target) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    if human {
        println!("{}", explanation.to_human());
    } else {
        print_json(explanation.to_json());
    }
}

fn run_verify(source: &SourceArgs) {
    let loaded = load_or_exit(source);

    if loaded.set.is_empty() {
        eprintln!("Configuration error: {} has no layers", loaded.source.name);
        process::exit(1);
    }

    println!("Configuration valid: {}", loaded.source.name);
    println!();
    println!("  Layers: {}", loaded.set.len());
    if !loaded.bundles.is_empty() {
        println!("  Bundles: {}", loaded.bundles.join(", "));
    }
    let scoped = loaded.set.layers().filter(|l| !l.is_unconditional()).count();
    println!("  Scoped layers: {}", scoped);
    if let Some(ref digest) = loaded.source.digest {
        println!("  Digest: sha256:{}", digest);
    }
}

fn load_or_exit(source: &SourceArgs) -> LoadedConfig {
    match load_source(source) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            process::exit(1);
        }
    }
}

fn load_source(source: &SourceArgs) -> Result<LoadedConfig, ConfigError> {
    let mut registry = BundleRegistry::default();
    if let Some(ref dir) = source.bundles {
        registry = registry.load_dir(dir)?;
    }

    match source.preset {
        Some(preset) => Ok(preset.build(&registry)?.with_base_path(env::current_dir()?)),
        None => {
            let path = source
                .config
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
            load_file(&path, &registry)
        }
    }
}

/// Anchor a relative path at the working directory so it can be compared
/// with the config base.
fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}

fn print_json(result: Result<String, serde_json::Error>) {
    match result {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}
