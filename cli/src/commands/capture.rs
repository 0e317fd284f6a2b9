//! Capture command: create a client, send one event, flush

use anyhow::{Context, Result};
use clap::Args;
use posthog_wasm_runtime::{capture_once, ExtismPlugin, PluginSettings};
use posthog_wasm_shared::{ClientConfig, PosthogEvent};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::output;

/// Event sent when no event flags are given
pub const DEMO_EVENT: &str = "web assembly event";

#[derive(Args, Debug)]
pub struct CaptureArgs {
    /// Project API key
    #[arg(long, env = "POSTHOG_API_KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,

    /// Telemetry host the plugin delivers to
    #[arg(long, env = "POSTHOG_HOST", default_value = "")]
    pub host: String,

    /// Path to the plugin module (overrides the settings file)
    #[arg(long, env = "POSTHOG_WASM_PLUGIN")]
    pub plugin: Option<PathBuf>,

    /// TOML file with plugin settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Skip checking the module's exports before loading it
    #[arg(long)]
    pub skip_verify: bool,

    /// Event name (default: the demonstration event)
    #[arg(short, long)]
    pub event: Option<String>,

    /// Event property as KEY=VALUE; VALUE is parsed as JSON, else kept as a string
    #[arg(short = 'p', long = "property", value_parser = parse_property)]
    pub properties: Vec<(String, Value)>,

    /// Value of the `distinct_id` property
    #[arg(long)]
    pub distinct_id: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn run(args: CaptureArgs) -> Result<()> {
    let settings = load_settings(&args)?;
    let event = build_event(&args);
    let config = ClientConfig::new(args.api_key, args.host);

    info!(
        "Sending '{}' through {}",
        event.event,
        settings.wasm_path.display()
    );

    let plugin = ExtismPlugin::load(&settings).context("Failed to load telemetry plugin")?;
    let handle = capture_once(plugin, config, &event).context("Failed to capture event")?;

    info!("Client {} flushed", handle);
    output::success("Event captured successfully");
    Ok(())
}

fn load_settings(args: &CaptureArgs) -> Result<PluginSettings> {
    let (mut settings, origin) = match &args.config {
        Some(path) => (
            PluginSettings::from_toml_file(path).context("Failed to read plugin settings")?,
            path.as_path(),
        ),
        None => (PluginSettings::default(), Path::new("<command line>")),
    };

    if let Some(path) = &args.plugin {
        settings.wasm_path = path.clone();
    }
    if args.skip_verify {
        settings.verify_exports = false;
    }

    settings.validate(origin)?;
    Ok(settings)
}

/// The demonstration event, with any flags applied on top
fn build_event(args: &CaptureArgs) -> PosthogEvent {
    let mut event = match &args.event {
        Some(name) => PosthogEvent::new(name.as_str()),
        None => demo_event(),
    };

    if let Some(id) = &args.distinct_id {
        event = event.with_distinct_id(id.as_str());
    }
    for (key, value) in &args.properties {
        event = event.with_property(key.as_str(), value.clone());
    }
    event
}

pub fn demo_event() -> PosthogEvent {
    PosthogEvent::new(DEMO_EVENT)
        .with_property("$lib", "posthog-wasm")
        .with_property("$lib_version", "0.1.0")
        .with_property("$geoip_disabled", true)
        .with_distinct_id("123412323")
}

fn parse_property(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("property key is empty in '{raw}'"));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}
