use anyhow::Context;
use chrono::Local;
use clap::Parser;
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    process::ExitCode,
};

use meteo_core::{Config, Pipeline, Report};

pub const PROMPT: &str = "Enter city name: ";

const EXIT_STATUS_HELP: &str = "Exit status: 0 when the report is printed, 1 when the city \
is not found or a request fails (the diagnostic goes to stderr).";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "meteo",
    version,
    about = "Current weather for a city",
    after_help = EXIT_STATUS_HELP
)]
pub struct Cli {
    /// City name; prompted for on stdin when omitted.
    pub city: Option<String>,

    /// Config file to use instead of the platform default.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        let pipeline = Pipeline::from_config(&config).context("Failed to build HTTP client")?;

        let city = match self.city {
            Some(city) => city,
            None => prompt_city()?,
        };

        match pipeline.lookup(&city).await {
            Ok(observation) => {
                println!("{}", Report::new(&observation.conditions, &Local));
                Ok(ExitCode::SUCCESS)
            }
            Err(err) => {
                tracing::debug!(stage = %err.stage(), "lookup failed: {err:?}");
                eprintln!("{err}");
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

fn prompt_city() -> anyhow::Result<String> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "{PROMPT}").context("Failed to write prompt")?;
    stdout.flush().context("Failed to write prompt")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read city name from stdin")?;

    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
