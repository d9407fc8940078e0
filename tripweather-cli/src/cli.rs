use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use tracing::info;
use tripweather_core::{Config, Itinerary, OpenMeteoProvider, pipeline, present};

use crate::server::{self, AppState};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "tripweather", version, about = "Weather report for a travel itinerary")]
pub struct Cli {
    /// Config file; defaults to the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Itinerary file; overrides the configured location.
    #[arg(long, global = true)]
    pub itinerary: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Defaults to `show`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print one line per visit date, in date order.
    Show {
        /// Print the JSON report instead.
        #[arg(long)]
        json: bool,
    },

    /// Serve the JSON report on `GET /`.
    Serve {
        /// Overrides `server.host`.
        #[arg(long)]
        host: Option<String>,

        /// Overrides `server.port`.
        #[arg(long)]
        port: Option<u16>,
    },

    /// Show the config file location and effective settings.
    Config {
        /// Write the effective settings to the config file.
        #[arg(long)]
        init: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = self.load_config()?;

        match self.command.unwrap_or(Command::Show { json: false }) {
            Command::Show { json } => {
                let itinerary = load_itinerary(&config, self.itinerary)?;
                let provider = OpenMeteoProvider::from_config(&config)?;
                let options = config.report_options();

                let summaries = pipeline::run(&itinerary, &provider).await?;

                if json {
                    println!("{}", present::to_json(&summaries, &options)?);
                } else {
                    for line in present::render_lines(&summaries, &options) {
                        println!("{line}");
                    }
                }
            }
            Command::Serve { host, port } => {
                let itinerary = load_itinerary(&config, self.itinerary)?;
                let provider = OpenMeteoProvider::from_config(&config)?;

                let state = AppState {
                    itinerary: Arc::new(itinerary),
                    provider: Arc::new(provider),
                    options: config.report_options(),
                };
                let addr = format!(
                    "{}:{}",
                    host.unwrap_or_else(|| config.server.host.clone()),
                    port.unwrap_or(config.server.port)
                );

                server::serve(&addr, state).await?;
            }
            Command::Config { init } => {
                let path = match &self.config {
                    Some(path) => path.clone(),
                    None => Config::config_file_path()?,
                };

                if init {
                    config.save_to(&path)?;
                    info!(path = %path.display(), "Configuration written");
                }

                println!("# {}", path.display());
                print!("{}", config.to_toml()?);
            }
        }

        Ok(())
    }

    fn load_config(&self) -> anyhow::Result<Config> {
        match &self.config {
            Some(path) if self.initializing_config() && !path.exists() => Ok(Config::default()),
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }

    /// `config --init` may target a file that does not exist yet.
    fn initializing_config(&self) -> bool {
        matches!(self.command, Some(Command::Config { init: true }))
    }
}

/// Resolve the itinerary before any network activity; failure here is fatal.
fn load_itinerary(config: &Config, explicit: Option<PathBuf>) -> anyhow::Result<Itinerary> {
    let itinerary = match explicit {
        Some(path) => Itinerary::load(&path),
        None => {
            let (primary, fallback) = config.itinerary_paths();
            Itinerary::load_with_fallback(&primary, fallback.as_deref())
        }
    };

    itinerary.context("Could not load itinerary")
}
