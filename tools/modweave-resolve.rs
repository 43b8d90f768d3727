//! Resolve a modules directory and print the effective module order
//!
//! Discovers `*/module.toml` manifests, resolves overrides and prints one
//! line per effective module. Structural errors are printed to stderr and
//! the process exits non-zero.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use serde_json::json;

use modweave::utils::init_logging_from_config;
use modweave::{Bootstrap, BootstrapConfig, EffectiveModule, LoggingConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "modweave-resolve", version, about = "Resolve module overrides and print the load order")]
struct Args {
    /// Bootstrap config file (.json or .toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Modules directory (overrides the config file)
    #[arg(short, long)]
    modules_dir: Option<PathBuf>,

    /// Log filter (e.g. "debug", "modweave=trace")
    #[arg(long)]
    log: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

fn load_config(args: &Args) -> anyhow::Result<BootstrapConfig> {
    let mut config = match &args.config {
        Some(path) => BootstrapConfig::from_file(path)?,
        None => BootstrapConfig::default(),
    };
    config.apply_env_overrides();

    if let Some(dir) = &args.modules_dir {
        config.modules.modules_dir = dir.display().to_string();
        config.modules.auto_load = true;
    }
    if let Some(filter) = &args.log {
        config.logging.get_or_insert_with(LoggingConfig::default).filter = Some(filter.clone());
    }

    config.validate()?;
    Ok(config)
}

fn render_text(modules: &[EffectiveModule]) -> String {
    modules
        .iter()
        .map(|m| {
            let mut line = format!("{} [{}]", m.name, m.provider_name);
            let layers = m.layers();
            if let Some((_, bases)) = layers.split_last() {
                if !bases.is_empty() {
                    line.push_str(" <- ");
                    line.push_str(&bases.join(", "));
                }
            }
            if m.deprecated {
                line.push_str(" (deprecated)");
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_json(modules: &[EffectiveModule]) -> anyhow::Result<String> {
    let rendered: Vec<serde_json::Value> = modules
        .iter()
        .map(|m| {
            json!({
                "name": m.name,
                "provider": m.provider_name,
                "description": m.description,
                "deprecated": m.deprecated,
                "layers": m.layers(),
                "configs": m.config_paths,
            })
        })
        .collect();
    Ok(serde_json::to_string_pretty(&rendered)?)
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {:#}", e);
            return ExitCode::from(2);
        }
    };
    init_logging_from_config(config.logging.as_ref());

    let modules = match Bootstrap::from_config(&config).resolve() {
        Ok(modules) => modules,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(e.exit_code().clamp(1, 255) as u8);
        }
    };

    let output = match args.format {
        OutputFormat::Text => Ok(render_text(&modules)),
        OutputFormat::Json => render_json(&modules),
    };
    match output {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to render output: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
