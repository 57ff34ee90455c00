mod config;
mod generate_cmd;
mod page;
mod profile_args;
mod serve_cmd;
#[cfg(test)]
mod test_util;

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use fitplan_core::model::GeminiClient;
use fitplan_core::pipeline::PlanPipeline;

use config::FitplanConfig;
use profile_args::ProfileArgs;

#[derive(Parser)]
#[command(name = "fitplan", about = "Personalized training and nutrition plans from an LLM")]
struct Cli {
    /// Model name (overrides FITPLAN_MODEL env var and config file)
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a fitplan config file
    Init {
        /// Model API key to store (otherwise GOOGLE_API_KEY is required at runtime)
        #[arg(long)]
        api_key: Option<String>,
        /// Port for `fitplan serve`
        #[arg(long)]
        port: Option<u16>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Serve the plan form as a web page
    Serve {
        /// Address to bind (overrides config file)
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the prompt a profile produces, without calling the model
    Prompt {
        #[command(flatten)]
        profile: ProfileArgs,
    },
    /// Generate one plan and print it
    Generate {
        #[command(flatten)]
        profile: ProfileArgs,
        /// Print rendered HTML instead of markdown
        #[arg(long)]
        html: bool,
    },
}

/// Execute the `fitplan init` command: write config file.
fn cmd_init(
    model: Option<&str>,
    api_key: Option<String>,
    port: Option<u16>,
    force: bool,
) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let has_key = api_key.is_some();
    let cfg = config::ConfigFile {
        provider: config::ProviderSection {
            api_key,
            model: model.map(str::to_owned),
            ..Default::default()
        },
        server: config::ServerSection { bind: None, port },
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    if let Some(model) = model {
        println!("  provider.model = {model}");
    }
    if has_key {
        println!("  provider.api_key = <stored>");
    } else {
        println!(
            "  no API key stored; set {} in the environment or a .env file",
            config::API_KEY_ENV
        );
    }
    println!();
    println!("Next: run `fitplan serve` and open the printed address.");

    Ok(())
}

/// Build the model client and pipeline once for the process.
fn build_pipeline(resolved: &FitplanConfig) -> anyhow::Result<Arc<PlanPipeline>> {
    let client = GeminiClient::new(resolved.gemini.clone()).context("failed to create model client")?;
    Ok(Arc::new(PlanPipeline::new(Arc::new(client))))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            tracing::warn!(error = %e, "failed to load .env file");
        }
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            api_key,
            port,
            force,
        } => {
            cmd_init(cli.model.as_deref(), api_key, port, force)?;
        }
        Commands::Serve { bind, port } => {
            let resolved = FitplanConfig::resolve(cli.model.as_deref())?;
            let pipeline = build_pipeline(&resolved)?;
            let bind = bind.unwrap_or_else(|| resolved.bind.clone());
            let port = port.unwrap_or(resolved.port);
            serve_cmd::run_serve(pipeline, &bind, port).await?;
        }
        Commands::Prompt { profile } => {
            let mut stdout = std::io::stdout().lock();
            generate_cmd::run_prompt(&profile, &mut stdout)?;
        }
        Commands::Generate { profile, html } => {
            let resolved = FitplanConfig::resolve(cli.model.as_deref())?;
            let pipeline = build_pipeline(&resolved)?;
            let mut stdout = std::io::stdout();
            generate_cmd::run_generate(&pipeline, &profile, html, &mut stdout).await?;
        }
    }

    Ok(())
}
