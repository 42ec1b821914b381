use std::{collections::HashMap, time::Duration};

use anyhow::{Context, bail};
use chrono::{DateTime, Local};
use clap::{ArgAction, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use owm_core::{Config, CurrentWeather, Device, OpenWeatherProvider};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "owm-current", version, about = "OpenWeatherMap current-weather device")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Enter the API key and city id interactively.
    Configure,

    /// Fetch once and print the current conditions.
    Show {
        /// Print the state as JSON instead of the summary line.
        #[arg(long)]
        json: bool,
    },

    /// Poll on an interval and print each new event batch as a JSON line.
    Poll {
        /// Seconds between updates.
        #[arg(long, default_value_t = 600)]
        interval: u64,

        /// Stop after this many updates.
        #[arg(long)]
        count: Option<u64>,
    },

    /// Describe the device: init fields and emitted events.
    Describe,
}

pub fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { json } => show(json).await,
            Command::Poll { interval, count } => poll(interval, count).await,
            Command::Describe => describe(),
        }
    }
}

/// Init data as the host would hand it to the device.
fn init_data(cfg: &Config) -> HashMap<String, String> {
    cfg.device.values().into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

/// Build the device from the stored config, the same way a host restores it.
fn load_device() -> anyhow::Result<CurrentWeather<OpenWeatherProvider>> {
    let cfg = Config::load()?;

    let provider = match &cfg.base_url {
        Some(url) => OpenWeatherProvider::with_base_url(url.as_str())?,
        None => OpenWeatherProvider::new()?,
    };

    let mut device = CurrentWeather::new(provider);
    device.init(&cfg.hwid, &init_data(&cfg));

    if !device.config().is_complete() {
        bail!(
            "Device is not configured.\n\
             Hint: run `owm-current configure` and enter your API key and city id."
        );
    }

    Ok(device)
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let api_key = Password::new("OpenWeatherMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let mut city_prompt = Text::new("City id:");
    if let Some(current) = cfg.device.city_id.as_deref() {
        city_prompt = city_prompt.with_initial_value(current);
    }
    let city_id = city_prompt.prompt().context("Failed to read city id")?;

    cfg.device.apply("api_key", api_key.trim())?;
    cfg.device.apply("city_id", city_id.trim())?;
    cfg.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(json: bool) -> anyhow::Result<()> {
    let mut device = load_device()?;

    device.try_update().await.context("Failed to fetch current weather")?;

    if json {
        let state = serde_json::to_string_pretty(&device.state())
            .context("Failed to serialize device state")?;
        println!("{state}");
    } else {
        println!("{device}");
        if let Some(at) = device.observed_at() {
            println!("Observed at {}", DateTime::<Local>::from(at).format("%Y-%m-%d %H:%M"));
        }
    }

    Ok(())
}

async fn poll(interval: u64, count: Option<u64>) -> anyhow::Result<()> {
    let mut device = load_device()?;
    let mut ticker = tokio::time::interval(Duration::from_secs(interval.max(1)));
    let mut polls = 0u64;

    loop {
        ticker.tick().await;

        if device.update().await {
            info!(hwid = device.hwid(), timestamp = device.last_update(), "new reading");
        }

        if let Some(events) = device.take_events() {
            let line = serde_json::json!({
                "hwid": device.hwid(),
                "timestamp": device.last_update(),
                "events": events,
            });
            println!("{line}");
        }

        polls += 1;
        if count.is_some_and(|n| polls >= n) {
            return Ok(());
        }
    }
}

fn describe() -> anyhow::Result<()> {
    let cfg = Config::load()?;
    let mut device = CurrentWeather::new(OpenWeatherProvider::new()?);
    device.init(&cfg.hwid, &init_data(&cfg));

    let values: HashMap<_, _> = device.init_data_values().into_iter().collect();

    println!("{} ({})", device.description(), device.hwid());
    println!("Init data:");
    for (key, label) in device.init_data_list() {
        let value = match values.get(key) {
            Some(_) if *key == "api_key" => "<set>",
            Some(v) => v.as_str(),
            None => "<unset>",
        };
        println!("  {key:<8} {label}: {value}");
    }

    let events: Vec<_> = device.events_list().iter().map(|e| e.as_str()).collect();
    println!("Events: {}", events.join(", "));

    Ok(())
}
