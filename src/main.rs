//! deepmix CLI
//!
//! Entry point for the `deepmix` command-line tool.

use clap::{Parser, Subcommand};
use deepmix::config::{default_host_config_path, REPO_CONFIG_PATH};
use deepmix::input::{collect_layer_files, load_value};
use deepmix::output::{digest, render};
use deepmix::{classify, deep_clone, mixin, EffectiveConfig, OperationKind, Value};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "deepmix")]
#[command(about = "Deep clone and deep mixin for JSON/TOML value trees", version)]
struct Cli {
    /// Path to project config file (default: .deepmix.toml)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Print single-line JSON
    #[arg(long, global = true)]
    compact: bool,

    /// Print RFC 8785 canonical JSON
    #[arg(long, global = true)]
    canonical: bool,

    /// Bind an operation to an identifier, e.g. `--bind mixin=merge`
    #[arg(long = "bind", value_name = "OP=IDENT", global = true)]
    bindings: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge files onto the first one; later files win
    Mixin {
        /// Base file followed by source files
        files: Vec<PathBuf>,

        /// Directory of additional layers, applied in sorted path order
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Print the SHA-256 of the canonical result instead of the result
        #[arg(long)]
        digest: bool,
    },

    /// Deep-clone a file's value and print it
    Clone {
        file: PathBuf,
    },

    /// Print the type tag of a file's value
    Classify {
        file: PathBuf,
    },

    /// Invoke an operation by its bound identifier
    Call {
        /// Identifier, e.g. `getType` or a name configured via --bind
        identifier: String,

        /// Argument files
        files: Vec<PathBuf>,
    },

    /// Print the effective configuration
    Config,
}

fn main() {
    env_logger::Builder::from_default_env().init();

    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Mixin { files, dir, digest } => run_mixin(&config, files, dir, digest),
        Commands::Clone { file } => run_clone(&config, file),
        Commands::Classify { file } => run_classify(file),
        Commands::Call { identifier, files } => run_call(&config, &identifier, files),
        Commands::Config => run_config(&config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<EffectiveConfig, String> {
    let host_path = default_host_config_path();
    let repo_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(REPO_CONFIG_PATH));
    let overrides = cli_overrides(cli)?;

    EffectiveConfig::build(host_path.as_deref(), Some(&repo_path), overrides)
        .map_err(|e| e.to_string())
}

/// Translate CLI flags into the highest-precedence config layer
fn cli_overrides(cli: &Cli) -> Result<Option<Value>, String> {
    let mut output = serde_json::Map::new();
    if cli.compact {
        output.insert("pretty".to_string(), false.into());
    }
    if cli.canonical {
        output.insert("canonical".to_string(), true.into());
    }

    let mut namespace = serde_json::Map::new();
    for binding in &cli.bindings {
        let (op, identifier) = binding
            .split_once('=')
            .ok_or_else(|| format!("Invalid --bind '{}': expected OP=IDENT", binding))?;
        let kind = OperationKind::ALL
            .into_iter()
            .find(|k| k.as_str() == op || k.default_identifier() == op)
            .ok_or_else(|| {
                format!(
                    "Unknown operation '{}'. Valid: is_object, classify, clone, mixin",
                    op
                )
            })?;
        namespace.insert(kind.as_str().to_string(), identifier.into());
    }

    if output.is_empty() && namespace.is_empty() {
        return Ok(None);
    }
    Ok(Some(Value::from(serde_json::json!({
        "output": output,
        "namespace": namespace,
    }))))
}

fn load_all(files: &[PathBuf]) -> Result<Vec<Value>, String> {
    files
        .iter()
        .map(|path| load_value(path).map_err(|e| e.to_string()))
        .collect()
}

fn print_value(config: &EffectiveConfig, value: &Value) -> Result<(), String> {
    let text = render(value, &config.settings.output).map_err(|e| e.to_string())?;
    println!("{}", text);
    Ok(())
}

fn run_mixin(
    config: &EffectiveConfig,
    mut files: Vec<PathBuf>,
    dir: Option<PathBuf>,
    print_digest: bool,
) -> Result<(), String> {
    if let Some(dir) = dir {
        files.extend(collect_layer_files(&dir).map_err(|e| e.to_string())?);
    }
    if files.is_empty() {
        return Err("mixin needs at least one input file".to_string());
    }

    let values = load_all(&files)?;
    log::info!("merging {} layer(s)", values.len());
    let merged = mixin(&values[0], &values[1..]).map_err(|e| e.to_string())?;

    if print_digest {
        println!("{}", digest(&merged).map_err(|e| e.to_string())?);
        return Ok(());
    }
    print_value(config, &merged)
}

fn run_clone(config: &EffectiveConfig, file: PathBuf) -> Result<(), String> {
    let value = load_value(&file).map_err(|e| e.to_string())?;
    let cloned = deep_clone(&value).map_err(|e| e.to_string())?;
    print_value(config, &cloned)
}

fn run_classify(file: PathBuf) -> Result<(), String> {
    let value = load_value(&file).map_err(|e| e.to_string())?;
    println!("{}", classify(&value));
    Ok(())
}

fn run_call(config: &EffectiveConfig, identifier: &str, files: Vec<PathBuf>) -> Result<(), String> {
    let namespace = config.namespace().map_err(|e| e.to_string())?;
    let args = load_all(&files)?;
    let result = namespace
        .invoke(identifier, &args)
        .map_err(|e| e.to_string())?;
    print_value(config, &result)
}

fn run_config(config: &EffectiveConfig) -> Result<(), String> {
    let json = config.to_json().map_err(|e| e.to_string())?;
    println!("{}", json);
    Ok(())
}
